//! Logging facilities for Lattice Grid.
//!
//! Lattice Grid uses the `tracing` crate for instrumentation. To see logs,
//! install a tracing subscriber in your application:
//!
//! ```ignore
//! use tracing_subscriber;
//!
//! fn main() {
//!     // Initialize tracing (you can customize this)
//!     tracing_subscriber::fmt::init();
//!
//!     // Your application code...
//! }
//! ```
//!
//! The binding layer is chatty at `trace` level (every list event that
//! reaches the data connection is traced with its classification) and quiet
//! at `debug` (transaction boundaries only). A useful filter while debugging
//! add-new or delete transactions is:
//!
//! ```text
//! RUST_LOG=lattice_grid::connection=debug,lattice_grid::adapter=debug
//! ```

/// Span names used throughout Lattice Grid for tracing.
///
/// These constants can be used to filter traces for specific subsystems.
pub mod span_names {
    /// Data connection list-changed dispatch span.
    pub const LIST_CHANGED: &str = "lattice_grid::list_changed";
    /// Data connection position-changed dispatch span.
    pub const POSITION_CHANGED: &str = "lattice_grid::position_changed";
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Signal/slot system target.
    pub const SIGNAL: &str = "lattice_grid_core::signal";
    /// Data connection (binding state machine) target.
    pub const CONNECTION: &str = "lattice_grid::connection";
    /// List position and change adapter target.
    pub const ADAPTER: &str = "lattice_grid::adapter";
    /// In-memory list provider target.
    pub const LIST: &str = "lattice_grid::list";
    /// Grid row/column collection target.
    pub const GRID: &str = "lattice_grid::grid";
}
