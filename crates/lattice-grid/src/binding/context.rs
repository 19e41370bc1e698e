//! Binding contexts.
//!
//! A [`BindingContext`] hands out one [`ListAdapter`] per `(data source,
//! data member)` pair. Grids that share a context and bind to the same list
//! share its adapter, and so its current position.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use lattice_grid_core::logging::targets;

use super::adapter::ListAdapter;
use crate::error::BindingError;
use crate::model::DataSource;

struct Entry {
    // Keeps the source alive so its address cannot be reused by another key.
    _source: DataSource,
    adapter: Arc<ListAdapter>,
}

/// Resolves data sources to shared list adapters.
#[derive(Default)]
pub struct BindingContext {
    adapters: Mutex<HashMap<(usize, String), Entry>>,
}

impl BindingContext {
    /// Creates an empty context.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Returns the adapter for `member` of `source`, creating it on first use.
    ///
    /// Members compare case-insensitively.
    pub fn adapter(
        &self,
        source: &DataSource,
        member: &str,
    ) -> Result<Arc<ListAdapter>, BindingError> {
        let key = (source.identity(), member.to_lowercase());
        if let Some(entry) = self.adapters.lock().get(&key) {
            return Ok(entry.adapter.clone());
        }

        let list = source.resolve(member)?;
        let mut adapters = self.adapters.lock();
        let entry = adapters.entry(key).or_insert_with(|| {
            tracing::debug!(target: targets::ADAPTER, member, "list adapter created");
            Entry {
                _source: source.clone(),
                adapter: ListAdapter::new(list),
            }
        });
        Ok(entry.adapter.clone())
    }

    /// Returns `true` if an adapter for the pair already exists.
    pub fn contains(&self, source: &DataSource, member: &str) -> bool {
        self.adapters
            .lock()
            .contains_key(&(source.identity(), member.to_lowercase()))
    }

    /// Number of cached adapters.
    pub fn len(&self) -> usize {
        self.adapters.lock().len()
    }

    /// Returns `true` if no adapter has been created.
    pub fn is_empty(&self) -> bool {
        self.adapters.lock().is_empty()
    }
}
