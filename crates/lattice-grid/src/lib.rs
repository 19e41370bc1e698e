//! Lattice Grid - the data layer of a data-bound grid control.
//!
//! This crate binds a grid's rows and columns to an external list:
//!
//! - [`model`]: values, bound properties, the list contract and an in-memory
//!   list
//! - [`binding`]: the list adapter that tracks the current position, and the
//!   binding context that shares adapters between grids
//! - [`grid`]: the data connection state machine, columns, cells and a
//!   headless grid
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use lattice_grid::grid::{DataGrid, GridHost};
//! use lattice_grid::model::{CellValue, DataSource, Field, ValueType, VecBindingList};
//!
//! #[derive(Clone, Default)]
//! struct Order {
//!     qty: i64,
//! }
//!
//! let orders = Arc::new(
//!     VecBindingList::new(vec![Order { qty: 1 }])
//!         .with_field(
//!             Field::new("Qty", ValueType::Int, |o: &Order| o.qty.into()).with_setter(|o, v| {
//!                 o.qty = v.as_int().unwrap_or_default();
//!                 Ok(())
//!             }),
//!         )
//!         .with_factory(Order::default),
//! );
//!
//! let grid = DataGrid::new();
//! grid.set_data_source(Some(DataSource::from_list(orders.clone())))?;
//!
//! // Text typed into an integer column is converted on the way in.
//! grid.set_cell_value(0, 0, "42".into())?;
//! assert_eq!(grid.cell_value(0, 0)?, Some(CellValue::Int(42)));
//! assert_eq!(grid.row_count(), 2);
//! # Ok::<(), lattice_grid::GridError>(())
//! ```

pub mod binding;
pub mod error;
pub mod grid;
pub mod model;

pub use error::{BindingError, ConversionError, GridError, ListError, Result};
pub use lattice_grid_core::{ConnectionGuard, ConnectionId, Signal, logging};
