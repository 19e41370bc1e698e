//! Core systems for Lattice Grid.
//!
//! This crate provides the foundational pieces the grid data layer is built on:
//!
//! - **Signal/Slot System**: Type-safe, synchronous, re-entrant notifications
//! - **Logging**: `tracing` targets and span names for every grid subsystem
//!
//! # Signal/Slot Example
//!
//! ```
//! use lattice_grid_core::Signal;
//!
//! // Create a signal that notifies when a row count changes
//! let count_changed = Signal::<usize>::new();
//!
//! // Connect a slot to handle the signal
//! let conn_id = count_changed.connect(|count| {
//!     println!("Row count is now: {}", count);
//! });
//!
//! // Emit the signal
//! count_changed.emit(42);
//!
//! // Disconnect when done
//! count_changed.disconnect(conn_id);
//! ```

pub mod logging;
pub mod signal;

pub use signal::{ConnectionGuard, ConnectionId, Signal};
