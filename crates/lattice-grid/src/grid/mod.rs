//! The grid side of binding.
//!
//! - `DataConnection`: keeps a grid's rows and current cell in step with a
//!   bound list and runs the list's row transactions
//! - `ConnectionState`: what the connection is in the middle of
//! - `GridHost`: what the connection needs from the grid that owns it
//! - `DataGrid`: a headless grid implementing `GridHost`
//! - `Column` / `CellKind`: column descriptions and the cell data contract
//! - `DataErrorEvent`: data-access failures routed to the grid's handler
//! - `GridConfig`: behavior switches loaded from TOML

mod cell;
mod column;
mod config;
mod connection;
mod data_error;
mod host;
mod state;
mod view;

pub use cell::{CellKind, CellStyle, ComboBoxItems, FormattedValue};
pub use column::{Column, SortMode, SortOrder};
pub use config::GridConfig;
pub use connection::DataConnection;
pub use data_error::{DataErrorContext, DataErrorEvent};
pub use host::{CellAddress, GridHost};
pub use state::{AddNewPhase, ConnectionState, DeletePhase, PositionSync, RowCancel};
pub use view::{DataErrorHandler, DataGrid, GridSignals, Invalidation};
