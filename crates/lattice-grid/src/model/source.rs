//! Data sources.
//!
//! A grid binds to a [`DataSource`] plus a data member. The source is either
//! a single [`BindingList`] (the member must be empty) or a [`ListSource`], a
//! container of named lists such as [`DataSet`]. Sources that load in bulk
//! can report that they are not initialized yet through
//! [`SupportInitializeNotification`]; binding is then deferred until they
//! raise `initialized`.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;

use lattice_grid_core::Signal;
use lattice_grid_core::logging::targets;

use super::list::BindingList;
use crate::error::BindingError;

/// Optional capability of sources that are populated in a bulk-load phase.
pub trait SupportInitializeNotification: Send + Sync {
    /// Whether the bulk-load phase is over.
    fn is_initialized(&self) -> bool;

    /// Emitted once the bulk-load phase ends.
    fn initialized(&self) -> &Signal<()>;
}

/// A container of named lists.
pub trait ListSource: Send + Sync {
    /// Returns the list called `member` (case-insensitive).
    fn list(&self, member: &str) -> Option<Arc<dyn BindingList>>;

    /// Names of the lists this source contains.
    fn member_names(&self) -> Vec<String>;

    /// The initialization capability, if the source has one.
    fn initialization(&self) -> Option<&dyn SupportInitializeNotification> {
        None
    }
}

/// Something a grid can bind to.
#[derive(Clone)]
pub enum DataSource {
    /// A single list.
    List(Arc<dyn BindingList>),
    /// A container of named lists.
    Source(Arc<dyn ListSource>),
}

impl DataSource {
    /// Wraps a list.
    pub fn from_list<L: BindingList + 'static>(list: Arc<L>) -> Self {
        DataSource::List(list)
    }

    /// Wraps a list source.
    pub fn from_source<S: ListSource + 'static>(source: Arc<S>) -> Self {
        DataSource::Source(source)
    }

    /// Identity of the underlying object, used as a cache key.
    pub fn identity(&self) -> usize {
        match self {
            DataSource::List(list) => Arc::as_ptr(list) as *const () as usize,
            DataSource::Source(source) => Arc::as_ptr(source) as *const () as usize,
        }
    }

    /// Returns `true` if both refer to the same object.
    pub fn same_as(&self, other: &DataSource) -> bool {
        self.identity() == other.identity()
    }

    /// Whether `member` names a list of this source.
    pub fn has_member(&self, member: &str) -> bool {
        match self {
            DataSource::List(_) => member.is_empty(),
            DataSource::Source(source) => {
                !member.is_empty()
                    && source
                        .member_names()
                        .iter()
                        .any(|name| name.eq_ignore_ascii_case(member))
            }
        }
    }

    /// Resolves `member` to a list.
    pub fn resolve(&self, member: &str) -> Result<Arc<dyn BindingList>, BindingError> {
        let invalid = || BindingError::InvalidDataMember {
            member: member.to_string(),
        };
        match self {
            DataSource::List(list) if member.is_empty() => Ok(list.clone()),
            DataSource::List(_) => Err(invalid()),
            DataSource::Source(_) if member.is_empty() => Err(invalid()),
            DataSource::Source(source) => source.list(member).ok_or_else(invalid),
        }
    }

    /// The initialization capability, if the source has one.
    pub fn initialization(&self) -> Option<&dyn SupportInitializeNotification> {
        match self {
            DataSource::List(_) => None,
            DataSource::Source(source) => source.initialization(),
        }
    }
}

impl fmt::Debug for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::List(list) => f.debug_struct("List").field("len", &list.len()).finish(),
            DataSource::Source(source) => f
                .debug_struct("Source")
                .field("members", &source.member_names())
                .finish(),
        }
    }
}

/// A named collection of lists with a bulk-load phase.
///
/// Between [`begin_init`](Self::begin_init) and [`end_init`](Self::end_init)
/// the set reports itself uninitialized; grids bound to it wait for
/// `initialized` before resolving their member.
pub struct DataSet {
    tables: RwLock<Vec<(String, Arc<dyn BindingList>)>>,
    initializing: AtomicBool,
    initialized: Signal<()>,
}

impl Default for DataSet {
    fn default() -> Self {
        Self::new()
    }
}

impl DataSet {
    /// Creates an empty, initialized data set.
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Vec::new()),
            initializing: AtomicBool::new(false),
            initialized: Signal::new(),
        }
    }

    /// Adds (or replaces) the table called `name`.
    pub fn add_table<L: BindingList + 'static>(&self, name: impl Into<String>, list: Arc<L>) {
        let name = name.into();
        let list: Arc<dyn BindingList> = list;
        let mut tables = self.tables.write();
        match tables.iter_mut().find(|(n, _)| n.eq_ignore_ascii_case(&name)) {
            Some(entry) => entry.1 = list,
            None => tables.push((name, list)),
        }
    }

    /// Starts the bulk-load phase.
    pub fn begin_init(&self) {
        self.initializing.store(true, Ordering::SeqCst);
    }

    /// Ends the bulk-load phase and raises `initialized`.
    pub fn end_init(&self) {
        if self.initializing.swap(false, Ordering::SeqCst) {
            tracing::debug!(target: targets::LIST, "data set initialized");
            self.initialized.emit(());
        }
    }
}

impl SupportInitializeNotification for DataSet {
    fn is_initialized(&self) -> bool {
        !self.initializing.load(Ordering::SeqCst)
    }

    fn initialized(&self) -> &Signal<()> {
        &self.initialized
    }
}

impl ListSource for DataSet {
    fn list(&self, member: &str) -> Option<Arc<dyn BindingList>> {
        self.tables
            .read()
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(member))
            .map(|(_, list)| list.clone())
    }

    fn member_names(&self) -> Vec<String> {
        self.tables.read().iter().map(|(name, _)| name.clone()).collect()
    }

    fn initialization(&self) -> Option<&dyn SupportInitializeNotification> {
        Some(self)
    }
}
