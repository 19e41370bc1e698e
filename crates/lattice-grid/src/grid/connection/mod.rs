//! The data connection between a grid and its bound list.
//!
//! A [`DataConnection`] resolves the grid's data source to a shared
//! [`ListAdapter`], listens to the adapter's events and keeps the grid's rows
//! and current cell in step with the list. It also drives the list's add-new,
//! edit and delete transactions on behalf of the grid.
//!
//! # Re-entrancy
//!
//! Most operations call into the adapter, which raises events synchronously
//! while the operation is still running. Those events land back in the
//! connection, so every operation first records what it is doing in the
//! [`ConnectionState`] and the event handlers read that state to decide how
//! to react. Locks are never held across a call into the adapter or the
//! grid.
//!
//! Event handlers have no caller to report to. A failure inside one is kept
//! as a deferred error and returned by the operation that triggered the
//! event (or by [`DataConnection::take_deferred_error`] if the event came
//! from outside).

mod events;
mod sorting;
mod transactions;
mod values;

use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use lattice_grid_core::ConnectionId;
use lattice_grid_core::logging::targets;

use crate::binding::{BindingContext, ListAdapter};
use crate::error::{BindingError, GridError, Result};
use crate::model::{DataSource, ListChangedKind, PropertyDescriptors};

use super::host::GridHost;
use super::state::{ConnectionState, OnExit, on_exit};

#[derive(Default)]
struct Binding {
    data_source: Option<DataSource>,
    data_member: String,
    adapter: Option<Arc<ListAdapter>>,
    props: Option<Arc<PropertyDescriptors>>,
    last_list_count: Option<usize>,
    list_changed_id: Option<ConnectionId>,
    position_changed_id: Option<ConnectionId>,
    init_hook: Option<ConnectionId>,
    disposed: bool,
}

/// Keeps a grid in sync with one bound list.
pub struct DataConnection {
    owner: Weak<dyn GridHost>,
    this: Weak<Self>,
    binding: Mutex<Binding>,
    state: Mutex<ConnectionState>,
    deferred_error: Mutex<Option<GridError>>,
}

static_assertions::assert_impl_all!(DataConnection: Send, Sync);

impl DataConnection {
    /// Creates an unbound connection for `owner`.
    pub fn new(owner: Weak<dyn GridHost>) -> Arc<Self> {
        Arc::new_cyclic(|this| Self {
            owner,
            this: this.clone(),
            binding: Mutex::new(Binding::default()),
            state: Mutex::new(ConnectionState::default()),
            deferred_error: Mutex::new(None),
        })
    }

    /// A snapshot of the transient state.
    pub fn state(&self) -> ConnectionState {
        *self.state.lock()
    }

    /// The adapter of the bound list.
    pub fn list_adapter(&self) -> Option<Arc<ListAdapter>> {
        self.binding.lock().adapter.clone()
    }

    /// The bound list's properties.
    pub fn properties(&self) -> Option<Arc<PropertyDescriptors>> {
        self.binding.lock().props.clone()
    }

    /// The data source last assigned.
    pub fn data_source(&self) -> Option<DataSource> {
        self.binding.lock().data_source.clone()
    }

    /// The data member last assigned.
    pub fn data_member(&self) -> String {
        self.binding.lock().data_member.clone()
    }

    /// Binds to `member` of `source`.
    ///
    /// Unwires the previous adapter, resolves the new one through the grid's
    /// binding context and subscribes to its events. Binding is deferred
    /// when the grid has no binding context yet, or when the source is still
    /// initializing; in the latter case it completes when the source raises
    /// `initialized`.
    pub fn set_data_connection(&self, source: Option<DataSource>, member: &str) -> Result<()> {
        if self.state.lock().rebinding {
            return Ok(());
        }
        let owner = self.owner()?;
        self.reset_state(&*owner);
        self.unhook_initialization();
        {
            let mut binding = self.binding.lock();
            binding.data_source = source.clone();
            binding.data_member = member.to_string();
        }

        let Some(context) = owner.binding_context() else {
            tracing::debug!(target: targets::CONNECTION, "no binding context; binding deferred");
            return Ok(());
        };

        {
            let _rebinding = self.scoped(|s| s.rebinding = true, |s| s.rebinding = false);
            self.unwire_events();
            {
                let mut binding = self.binding.lock();
                binding.adapter = None;
                binding.props = None;
                binding.last_list_count = None;
            }
            if let Some(source) = source {
                self.attach(&context, &source, member)?;
            }
        }

        self.reset_cached_allow_user_to_add_rows();
        Ok(())
    }

    fn attach(&self, context: &BindingContext, source: &DataSource, member: &str) -> Result<()> {
        if let Some(init) = source.initialization()
            && !init.is_initialized()
        {
            let weak = self.this.clone();
            let id = init.initialized().connect(move |_| {
                if let Some(connection) = weak.upgrade() {
                    connection.on_source_initialized();
                }
            });
            self.binding.lock().init_hook = Some(id);
            tracing::debug!(target: targets::CONNECTION, member, "source initializing; binding deferred");
            return Ok(());
        }

        if matches!(source, DataSource::Source(_)) && member.is_empty() {
            tracing::debug!(target: targets::CONNECTION, "no data member; nothing to bind");
            return Ok(());
        }

        let adapter = context.adapter(source, member)?;
        let props = Arc::new(adapter.item_properties());
        {
            let mut binding = self.binding.lock();
            binding.last_list_count = Some(adapter.count());
            binding.adapter = Some(adapter.clone());
            binding.props = Some(props);
        }
        self.wire_events(&adapter);
        tracing::debug!(
            target: targets::CONNECTION,
            member,
            count = adapter.count(),
            "bound to list"
        );
        Ok(())
    }

    fn wire_events(&self, adapter: &ListAdapter) {
        let weak = self.this.clone();
        let list_changed_id = adapter.list_changed().connect(move |event| {
            if let Some(connection) = weak.upgrade() {
                connection.on_list_changed(event);
            }
        });
        let weak = self.this.clone();
        let position_changed_id = adapter.position_changed().connect(move |_| {
            if let Some(connection) = weak.upgrade() {
                connection.on_position_changed();
            }
        });
        {
            let mut binding = self.binding.lock();
            binding.list_changed_id = Some(list_changed_id);
            binding.position_changed_id = Some(position_changed_id);
        }
        self.update(|s| s.interested_in_row_events = true);
    }

    fn unwire_events(&self) {
        let (adapter, list_changed_id, position_changed_id) = {
            let mut binding = self.binding.lock();
            (
                binding.adapter.clone(),
                binding.list_changed_id.take(),
                binding.position_changed_id.take(),
            )
        };
        if let Some(adapter) = adapter {
            if let Some(id) = list_changed_id {
                adapter.list_changed().disconnect(id);
            }
            if let Some(id) = position_changed_id {
                adapter.position_changed().disconnect(id);
            }
        }
        self.update(|s| s.interested_in_row_events = false);
    }

    fn unhook_initialization(&self) {
        let (source, hook) = {
            let mut binding = self.binding.lock();
            (binding.data_source.clone(), binding.init_hook.take())
        };
        if let (Some(source), Some(id)) = (source, hook)
            && let Some(init) = source.initialization()
        {
            init.initialized().disconnect(id);
        }
    }

    fn on_source_initialized(&self) {
        let (source, member) = {
            let binding = self.binding.lock();
            (binding.data_source.clone(), binding.data_member.clone())
        };
        tracing::debug!(target: targets::CONNECTION, member, "source initialized; binding");
        let bound = self.set_data_connection(source, &member).and_then(|()| {
            let owner = self.owner()?;
            owner.refresh_columns_and_rows();
            if owner.row_count() > 0 {
                self.match_adapter_position(false, true)?;
            }
            owner.on_data_binding_complete(ListChangedKind::Reset);
            Ok(())
        });
        if let Err(err) = bound {
            self.defer_error(err);
        }
    }

    /// Whether assigning `source` should also clear the data member.
    ///
    /// Returns `false` while the grid cannot resolve sources yet. Otherwise
    /// the member is kept only if it still names a list of the new source.
    pub fn should_change_data_member(&self, source: Option<&DataSource>) -> bool {
        let Ok(owner) = self.owner() else {
            return false;
        };
        if !owner.is_created() || owner.binding_context().is_none() {
            return false;
        }
        let Some(source) = source else {
            return true;
        };
        let member = self.data_member();
        member.is_empty() || !source.has_member(&member)
    }

    /// Unsubscribes from every source and forgets the binding.
    pub fn dispose(&self) {
        self.unhook_initialization();
        self.unwire_events();
        let mut binding = self.binding.lock();
        binding.adapter = None;
        binding.props = None;
        binding.data_source = None;
        binding.disposed = true;
        tracing::debug!(target: targets::CONNECTION, "connection disposed");
    }

    /// Returns `true` once [`dispose`](Self::dispose) has run.
    pub fn is_disposed(&self) -> bool {
        self.binding.lock().disposed
    }

    /// Takes the error left by an event handler, if any.
    pub fn take_deferred_error(&self) -> Option<GridError> {
        self.deferred_error.lock().take()
    }

    /// Records an error raised where it cannot be returned.
    ///
    /// The first error wins; later ones are only logged.
    pub fn defer_error(&self, err: GridError) {
        tracing::debug!(target: targets::CONNECTION, error = %err, "error deferred");
        let mut deferred = self.deferred_error.lock();
        if deferred.is_none() {
            *deferred = Some(err);
        }
    }

    // State queries

    /// A reset-triggered row refresh is in flight.
    pub fn list_was_reset(&self) -> bool {
        self.state.lock().list_was_reset
    }

    /// A row edit is being cancelled.
    pub fn cancelling_row_edit(&self) -> bool {
        self.state.lock().row_cancel.is_some()
    }

    /// The row being cancelled should get its default values back.
    pub fn restore_row(&self) -> bool {
        self.state
            .lock()
            .row_cancel
            .is_some_and(|cancel| cancel.restore_row)
    }

    /// Columns are being rebuilt after a schema change.
    pub fn processing_metadata_changes(&self) -> bool {
        self.state.lock().processing_metadata
    }

    /// The connection is subscribed to the adapter's events.
    pub fn interested_in_row_events(&self) -> bool {
        self.state.lock().interested_in_row_events
    }

    /// The adapter moved on its own and the grid is following.
    pub fn position_changing_outside_grid(&self) -> bool {
        self.state.lock().position_changing_outside_grid()
    }

    /// A list-changed event is being dispatched.
    pub fn processing_list_changed_event(&self) -> bool {
        self.state.lock().processing_list_changed
    }

    /// Re-reads the grid's add-rows policy.
    pub fn reset_cached_allow_user_to_add_rows(&self) {
        if let Ok(owner) = self.owner() {
            let allow = owner.allow_user_to_add_rows_internal();
            self.update(|s| s.cached_allow_user_to_add_rows = allow);
        }
    }

    /// Number of grid rows that mirror list items.
    pub fn data_bound_rows_count(&self) -> usize {
        self.owner()
            .map(|owner| bound_rows_count(&*owner))
            .unwrap_or(0)
    }

    // Capabilities

    /// Whether the bound list accepts new items.
    pub fn allow_add(&self) -> bool {
        self.list_adapter().is_some_and(|adapter| adapter.allow_add())
    }

    /// Whether the bound list accepts edits.
    pub fn allow_edit(&self) -> bool {
        self.list_adapter().is_some_and(|adapter| adapter.allow_edit())
    }

    /// Whether the bound list accepts removals.
    pub fn allow_remove(&self) -> bool {
        self.list_adapter().is_some_and(|adapter| adapter.allow_remove())
    }

    // Internals

    fn owner(&self) -> Result<Arc<dyn GridHost>> {
        self.owner.upgrade().ok_or(GridError::Detached)
    }

    fn bound_adapter(&self) -> Result<Arc<ListAdapter>> {
        self.list_adapter()
            .ok_or_else(|| BindingError::NotBound.into())
    }

    fn update<R>(&self, f: impl FnOnce(&mut ConnectionState) -> R) -> R {
        f(&mut self.state.lock())
    }

    /// Applies `enter` now and `exit` when the returned guard drops.
    fn scoped<'a>(
        &'a self,
        enter: impl FnOnce(&mut ConnectionState),
        exit: impl FnOnce(&mut ConnectionState) + 'a,
    ) -> OnExit<impl FnOnce() + 'a> {
        self.update(enter);
        on_exit(move || self.update(exit))
    }

    fn reset_state(&self, owner: &dyn GridHost) {
        let interested = self.binding.lock().adapter.is_some();
        let allow = owner.allow_user_to_add_rows_internal();
        self.update(|s| s.reset(interested, allow));
    }

    /// Returns the error deferred while the current operation ran.
    fn settle(&self) -> Result<()> {
        match self.take_deferred_error() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl Drop for DataConnection {
    fn drop(&mut self) {
        self.unhook_initialization();
        self.unwire_events();
    }
}

/// Rows that mirror list items: every row except an untouched new-row slot.
fn bound_rows_count(owner: &dyn GridHost) -> usize {
    let rows = owner.row_count();
    if !owner.allow_user_to_add_rows_internal() || rows == 0 {
        return rows;
    }
    let new_row = owner.new_row_index();
    let on_new_row = owner.current_cell().map(|cell| cell.row) == new_row;
    if !on_new_row || owner.is_current_row_dirty() {
        rows - 1
    } else {
        rows
    }
}
