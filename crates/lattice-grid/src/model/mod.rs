//! The data side of grid binding.
//!
//! This module provides everything a grid binds *to*:
//!
//! - `CellValue` / `ValueType`: the values read from and written to list items
//! - `ValueConverter`: conversions between value types
//! - `PropertyDescriptor`: describes one bindable field of a list item
//! - `BindingList`: the external list contract, with its change notifications
//! - `VecBindingList`: an in-memory list implementing the whole contract
//! - `DataSource` / `ListSource` / `DataSet`: what a grid's data source can be
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────┐ list_changed ┌─────────────┐  events   ┌────────────────┐
//! │ BindingList │─────────────>│ ListAdapter │──────────>│ DataConnection │
//! │             │<─────────────│ (position)  │<──────────│   (grid side)  │
//! └─────────────┘   add/remove └─────────────┘  add/edit └────────────────┘
//! ```
//!
//! Lists raise a `ListChangedEvent` after each mutation. The list adapter
//! (see [`crate::binding`]) tracks the current position and re-raises the
//! events to the grid's data connection.

mod convert;
mod list;
mod property;
mod source;
mod value;
mod vec_list;

pub use convert::{
    DATE_TIME_FORMATS, StandardConverter, ValueConverter, can_convert, convert_value,
    parse_date_time, standard_converter,
};
pub use list::{
    BindingList, ListChangedEvent, ListChangedKind, ListSignals, ListSortDirection,
    SortDescription, check_row,
};
pub use property::{PropertyDescriptor, PropertyDescriptors};
pub use source::{DataSet, DataSource, ListSource, SupportInitializeNotification};
pub use value::{CellValue, CheckState, ValueType};
pub use vec_list::{ErrorExtractor, Field, FieldGetter, FieldSetter, ItemFactory, VecBindingList};
