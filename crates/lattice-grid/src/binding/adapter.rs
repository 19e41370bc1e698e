//! The list position & change adapter.
//!
//! A [`ListAdapter`] wraps one [`BindingList`] and adds a *current position*
//! to it. It forwards the list's change notifications after adjusting the
//! position to follow them, and drives the list's add-new and edit
//! transactions on behalf of its consumers.
//!
//! # Event order
//!
//! For every list event the adapter first updates its position. If the
//! position moved, `position_changed` is emitted, and only then is the
//! (possibly rewritten) event re-emitted on `list_changed`. Consumers may
//! therefore see a position that points past the rows they have created so
//! far; they get a second chance to catch up when `list_changed` arrives.

use std::sync::Arc;

use parking_lot::Mutex;

use lattice_grid_core::logging::targets;
use lattice_grid_core::{ConnectionId, Signal};

use crate::error::ListError;
use crate::model::{
    BindingList, ListChangedEvent, ListChangedKind, ListSortDirection, PropertyDescriptors,
};

#[derive(Debug, Default)]
struct AdapterState {
    position: Option<usize>,
    suspended: Option<Option<usize>>,
}

/// Tracks the current item of a shared list.
pub struct ListAdapter {
    list: Arc<dyn BindingList>,
    state: Mutex<AdapterState>,
    list_connection: Mutex<Option<ConnectionId>>,
    position_changed: Signal<()>,
    list_changed: Signal<ListChangedEvent>,
    item_changed: Signal<Option<usize>>,
}

impl ListAdapter {
    /// Creates an adapter over `list`, positioned on the first item.
    pub fn new(list: Arc<dyn BindingList>) -> Arc<Self> {
        let position = if list.is_empty() { None } else { Some(0) };
        let adapter = Arc::new(Self {
            list,
            state: Mutex::new(AdapterState {
                position,
                suspended: None,
            }),
            list_connection: Mutex::new(None),
            position_changed: Signal::new(),
            list_changed: Signal::new(),
            item_changed: Signal::new(),
        });
        let weak = Arc::downgrade(&adapter);
        let id = adapter.list.signals().list_changed.connect(move |event| {
            if let Some(adapter) = weak.upgrade() {
                adapter.on_list_changed(event);
            }
        });
        *adapter.list_connection.lock() = Some(id);
        adapter
    }

    /// The wrapped list.
    pub fn list(&self) -> &Arc<dyn BindingList> {
        &self.list
    }

    /// Emitted when the current position changes.
    pub fn position_changed(&self) -> &Signal<()> {
        &self.position_changed
    }

    /// Re-emits every list event after the position has been updated.
    pub fn list_changed(&self) -> &Signal<ListChangedEvent> {
        &self.list_changed
    }

    /// Emitted when the current item was rolled back; `None` means the whole
    /// list should be re-read.
    pub fn item_changed(&self) -> &Signal<Option<usize>> {
        &self.item_changed
    }

    /// Number of items in the list.
    pub fn count(&self) -> usize {
        self.list.len()
    }

    /// The current position, or `None` when the list is empty or binding is
    /// suspended.
    pub fn position(&self) -> Option<usize> {
        self.state.lock().position
    }

    /// The current position if it addresses an item.
    pub fn current_row(&self) -> Option<usize> {
        self.position().filter(|&row| row < self.count())
    }

    /// Whether items can be added through this adapter.
    pub fn allow_add(&self) -> bool {
        self.list.supports_change_notification() && self.list.allow_new()
    }

    /// Whether items can be edited through this adapter.
    pub fn allow_edit(&self) -> bool {
        !self.list.is_read_only() && self.list.allow_edit()
    }

    /// Whether items can be removed through this adapter.
    pub fn allow_remove(&self) -> bool {
        self.list.supports_change_notification() && self.list.allow_remove()
    }

    /// Whether consumers should push and pull data.
    pub fn should_bind(&self) -> bool {
        self.state.lock().suspended.is_none()
    }

    /// Describes the bindable fields of the list items.
    pub fn item_properties(&self) -> PropertyDescriptors {
        self.list.item_properties()
    }

    /// Moves to `position`, clamped to the list.
    ///
    /// The edit on the previous item is committed first; if that fails the
    /// position does not move.
    pub fn set_position(&self, position: usize) -> Result<(), ListError> {
        let count = self.count();
        if count == 0 || !self.should_bind() {
            return Ok(());
        }
        let target = position.min(count - 1);
        if self.position() == Some(target) {
            return Ok(());
        }
        self.end_current_edit()?;
        self.state.lock().position = Some(target);
        tracing::trace!(target: targets::ADAPTER, position = target, "position set");
        self.list.begin_edit(target);
        self.position_changed.emit(());
        Ok(())
    }

    /// Adds a new item through the list and moves to it.
    pub fn add_new(&self) -> Result<usize, ListError> {
        if !self.allow_add() {
            return Err(ListError::NotSupported {
                operation: "adding items",
            });
        }
        let row = self.list.add_new()?;
        let target = self.count().checked_sub(1).map(|last| row.min(last));
        let moved = {
            let mut state = self.state.lock();
            let moved = state.position != target;
            state.position = target;
            moved
        };
        tracing::debug!(target: targets::ADAPTER, row, "item added through adapter");
        if let Some(row) = target {
            self.list.begin_edit(row);
        }
        if moved {
            self.position_changed.emit(());
        }
        Ok(row)
    }

    /// Removes the item at `row`.
    pub fn remove_at(&self, row: usize) -> Result<(), ListError> {
        self.list.remove_at(row)
    }

    /// Commits the edit (and any pending new item) at the current position.
    pub fn end_current_edit(&self) -> Result<(), ListError> {
        if let Some(row) = self.current_row() {
            self.list.end_edit(row)?;
            self.list.end_new(row)?;
        }
        Ok(())
    }

    /// Rolls back the edit (and any pending new item) at the current position.
    pub fn cancel_current_edit(&self) {
        if let Some(row) = self.current_row() {
            self.list.cancel_edit(row);
            self.list.cancel_new(row);
            self.item_changed.emit(self.position());
        }
    }

    /// Stops pushing data; the position becomes `None` until resumed.
    pub fn suspend_binding(&self) {
        let changed = {
            let mut state = self.state.lock();
            if state.suspended.is_some() {
                return;
            }
            state.suspended = Some(state.position);
            state.position.take().is_some()
        };
        if changed {
            self.position_changed.emit(());
        }
    }

    /// Resumes a suspended adapter, restoring the position within bounds.
    pub fn resume_binding(&self) {
        let count = self.count();
        let changed = {
            let mut state = self.state.lock();
            let Some(saved) = state.suspended.take() else {
                return;
            };
            let restored = match (saved, count) {
                (_, 0) => None,
                (Some(row), _) => Some(row.min(count - 1)),
                (None, _) => Some(0),
            };
            state.position = restored;
            restored.is_some()
        };
        if changed {
            self.position_changed.emit(());
        }
    }

    /// Raises a synthetic reset.
    pub fn refresh(&self) {
        self.on_list_changed(&ListChangedEvent::reset());
    }

    /// Whether the list can sort itself.
    pub fn supports_sorting(&self) -> bool {
        self.list.supports_sorting()
    }

    /// Sorts the list by the property at `bound_index`.
    pub fn apply_sort(
        &self,
        bound_index: usize,
        direction: ListSortDirection,
    ) -> Result<(), ListError> {
        self.list.apply_sort(bound_index, direction)
    }

    fn on_list_changed(&self, event: &ListChangedEvent) {
        let event = normalize(event);
        let count = self.count();

        let (old, new) = {
            let mut state = self.state.lock();
            let old = state.position;
            let new = if state.suspended.is_some() {
                None
            } else {
                follow(old, &event, count)
            };
            state.position = new;
            (old, new)
        };

        if old != new {
            tracing::trace!(target: targets::ADAPTER, ?old, ?new, kind = ?event.kind, "position follows list");
            self.position_changed.emit(());
        }
        self.list_changed.emit(event);
    }
}

impl Drop for ListAdapter {
    fn drop(&mut self) {
        if let Some(id) = self.list_connection.get_mut().take() {
            self.list.signals().list_changed.disconnect(id);
        }
    }
}

/// Rewrites moves from or to nowhere as additions or deletions.
fn normalize(event: &ListChangedEvent) -> ListChangedEvent {
    match (event.kind, event.old_index, event.new_index) {
        (ListChangedKind::ItemMoved, None, Some(index)) => ListChangedEvent::item_added(index),
        (ListChangedKind::ItemMoved, Some(index), None) => ListChangedEvent::item_deleted(index),
        _ => event.clone(),
    }
}

/// Where the current position goes after `event`, given the new `count`.
fn follow(position: Option<usize>, event: &ListChangedEvent, count: usize) -> Option<usize> {
    if count == 0 {
        return None;
    }
    let last = count - 1;
    let Some(current) = position else {
        return match event.kind {
            ListChangedKind::ItemChanged => None,
            _ => Some(0),
        };
    };
    match (event.kind, event.new_index, event.old_index) {
        (ListChangedKind::Reset, _, _) => Some(current.min(last)),
        (ListChangedKind::ItemAdded, Some(index), _) if index <= current && current < last => {
            Some(current + 1)
        }
        (ListChangedKind::ItemDeleted, Some(index), _) if index == current => {
            Some(current.min(last))
        }
        (ListChangedKind::ItemDeleted, Some(index), _) if index < current => Some(current - 1),
        (ListChangedKind::ItemMoved, Some(to), Some(from)) if from == current => Some(to),
        (ListChangedKind::ItemMoved, Some(to), Some(from)) if to == current => Some(from),
        _ => Some(current.min(last)),
    }
}
