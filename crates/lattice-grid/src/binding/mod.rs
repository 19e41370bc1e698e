//! List adapters and binding contexts.
//!
//! - `ListAdapter`: wraps a bound list with a current position and re-raises
//!   its change notifications
//! - `BindingContext`: shares one adapter per `(data source, data member)`

mod adapter;
mod context;

pub use adapter::ListAdapter;
pub use context::BindingContext;
