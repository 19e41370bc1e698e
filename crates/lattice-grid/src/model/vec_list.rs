//! In-memory binding list.
//!
//! `VecBindingList<T>` stores its items in a `Vec<T>` and exposes them
//! through typed [`Field`] accessors declared up front. It implements the
//! whole [`BindingList`] contract: a pending add-new item, per-item edit
//! snapshots, stable sorting, capability switches, and schema changes.
//!
//! # Example
//!
//! ```
//! use lattice_grid::model::{BindingList, CellValue, Field, ValueType, VecBindingList};
//!
//! #[derive(Clone, Default)]
//! struct Product {
//!     name: String,
//!     stock: i64,
//! }
//!
//! let list = VecBindingList::new(vec![Product { name: "Bolt".into(), stock: 12 }])
//!     .with_field(Field::new("Name", ValueType::Text, |p: &Product| p.name.clone().into())
//!         .with_setter(|p, v| {
//!             p.name = v.as_text().unwrap_or_default().to_string();
//!             Ok(())
//!         }))
//!     .with_field(Field::new("Stock", ValueType::Int, |p: &Product| p.stock.into()))
//!     .with_factory(Product::default);
//!
//! assert_eq!(list.value(0, 1), Ok(CellValue::Int(12)));
//! assert!(list.value(0, 2).is_err());
//! ```

use std::sync::Arc;

use parking_lot::RwLock;

use lattice_grid_core::logging::targets;

use super::convert::ValueConverter;
use super::list::{
    BindingList, ListChangedEvent, ListChangedKind, ListSignals, ListSortDirection, check_row,
};
use super::property::{PropertyDescriptor, PropertyDescriptors};
use super::value::{CellValue, ValueType};
use crate::error::ListError;

/// Type alias for a field getter.
pub type FieldGetter<T> = Arc<dyn Fn(&T) -> Result<CellValue, ListError> + Send + Sync>;

/// Type alias for a field setter.
pub type FieldSetter<T> = Arc<dyn Fn(&mut T, CellValue) -> Result<(), ListError> + Send + Sync>;

/// Type alias for the factory used by `add_new`.
pub type ItemFactory<T> = Arc<dyn Fn() -> T + Send + Sync>;

/// Type alias for a data-error-info extractor: `(item, field)` to error text,
/// where `field` is `None` for the row-level error.
pub type ErrorExtractor<T> = Arc<dyn Fn(&T, Option<&str>) -> Option<String> + Send + Sync>;

/// A typed accessor for one field of `T`.
pub struct Field<T> {
    descriptor: PropertyDescriptor,
    get: FieldGetter<T>,
    set: Option<FieldSetter<T>>,
}

impl<T> Clone for Field<T> {
    fn clone(&self) -> Self {
        Self {
            descriptor: self.descriptor.clone(),
            get: self.get.clone(),
            set: self.set.clone(),
        }
    }
}

impl<T> Field<T> {
    /// Creates a read-only field with an infallible getter.
    pub fn new<G>(name: impl Into<String>, value_type: ValueType, get: G) -> Self
    where
        G: Fn(&T) -> CellValue + Send + Sync + 'static,
    {
        Self::try_new(name, value_type, move |item| Ok(get(item)))
    }

    /// Creates a read-only field whose getter can fail.
    pub fn try_new<G>(name: impl Into<String>, value_type: ValueType, get: G) -> Self
    where
        G: Fn(&T) -> Result<CellValue, ListError> + Send + Sync + 'static,
    {
        Self {
            descriptor: PropertyDescriptor::new(name, value_type).read_only(true),
            get: Arc::new(get),
            set: None,
        }
    }

    /// Makes the field writable.
    ///
    /// The setter receives a value already converted to the field type (or
    /// `Null`).
    pub fn with_setter<S>(mut self, set: S) -> Self
    where
        S: Fn(&mut T, CellValue) -> Result<(), ListError> + Send + Sync + 'static,
    {
        self.set = Some(Arc::new(set));
        self.descriptor = self.descriptor.read_only(false);
        self
    }

    /// Sets the header text used for generated columns.
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.descriptor = self.descriptor.with_display_name(display_name);
        self
    }

    /// Replaces the converter of the field.
    pub fn with_converter(mut self, converter: Arc<dyn ValueConverter>) -> Self {
        self.descriptor = self.descriptor.with_converter(converter);
        self
    }

    /// Hides the field from column generation.
    pub fn hidden(mut self) -> Self {
        self.descriptor = self.descriptor.browsable(false);
        self
    }

    /// Excludes the field from sorting.
    pub fn unsortable(mut self) -> Self {
        self.descriptor = self.descriptor.sortable(false);
        self
    }

    /// The field's descriptor.
    pub fn descriptor(&self) -> &PropertyDescriptor {
        &self.descriptor
    }
}

struct EditSnapshot<T> {
    row: usize,
    item: T,
}

struct ListState<T> {
    items: Vec<T>,
    fields: Vec<Field<T>>,
    pending_new: Option<usize>,
    editing: Option<EditSnapshot<T>>,
    sort: Option<(usize, ListSortDirection)>,
    allow_new: bool,
    allow_edit: bool,
    allow_remove: bool,
}

impl<T> ListState<T> {
    fn field(&self, bound_index: usize) -> Result<&Field<T>, ListError> {
        self.fields
            .get(bound_index)
            .ok_or(ListError::PropertyOutOfRange { index: bound_index })
    }

    /// Shifts row bookkeeping after the item at `row` was removed.
    fn forget_row(&mut self, row: usize) {
        self.pending_new = match self.pending_new {
            Some(pending) if pending == row => None,
            Some(pending) if pending > row => Some(pending - 1),
            other => other,
        };
        match &mut self.editing {
            Some(snapshot) if snapshot.row == row => self.editing = None,
            Some(snapshot) if snapshot.row > row => snapshot.row -= 1,
            _ => {}
        }
    }

    /// Shifts row bookkeeping after an item was inserted at `row`.
    fn shift_for_insert(&mut self, row: usize) {
        if let Some(pending) = self.pending_new.as_mut()
            && *pending >= row
        {
            *pending += 1;
        }
        if let Some(snapshot) = self.editing.as_mut()
            && snapshot.row >= row
        {
            snapshot.row += 1;
        }
    }
}

/// An in-memory list of `T` with change notification.
pub struct VecBindingList<T> {
    state: RwLock<ListState<T>>,
    factory: Option<ItemFactory<T>>,
    errors: Option<ErrorExtractor<T>>,
    sortable: bool,
    signals: ListSignals,
}

impl<T: Clone + Send + Sync + 'static> VecBindingList<T> {
    /// Creates a list over `items` with no fields.
    ///
    /// Editing and removal are allowed; adding requires a factory.
    pub fn new(items: Vec<T>) -> Self {
        Self {
            state: RwLock::new(ListState {
                items,
                fields: Vec::new(),
                pending_new: None,
                editing: None,
                sort: None,
                allow_new: true,
                allow_edit: true,
                allow_remove: true,
            }),
            factory: None,
            errors: None,
            sortable: true,
            signals: ListSignals::new(),
        }
    }

    /// Declares a field. Fields are bound in declaration order.
    pub fn with_field(self, field: Field<T>) -> Self {
        self.state.write().fields.push(field);
        self
    }

    /// Sets the factory used by `add_new`.
    pub fn with_factory<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.factory = Some(Arc::new(factory));
        self
    }

    /// Sets the data-error-info extractor.
    pub fn with_error_info<F>(mut self, errors: F) -> Self
    where
        F: Fn(&T, Option<&str>) -> Option<String> + Send + Sync + 'static,
    {
        self.errors = Some(Arc::new(errors));
        self
    }

    /// Enables or disables sorting support.
    pub fn with_sorting(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    /// Returns a clone of the item at `row`.
    pub fn get(&self, row: usize) -> Option<T> {
        self.state.read().items.get(row).cloned()
    }

    /// Returns a clone of every item.
    pub fn items(&self) -> Vec<T> {
        self.state.read().items.clone()
    }

    /// The index of the pending add-new item.
    pub fn pending_new(&self) -> Option<usize> {
        self.state.read().pending_new
    }

    /// Appends an item outside any add-new transaction.
    pub fn push(&self, item: T) {
        let row = {
            let mut state = self.state.write();
            state.items.push(item);
            state.items.len() - 1
        };
        self.emit(ListChangedEvent::item_added(row));
    }

    /// Inserts an item at `row` outside any add-new transaction.
    pub fn insert(&self, row: usize, item: T) -> Result<(), ListError> {
        {
            let mut state = self.state.write();
            if row > state.items.len() {
                return Err(ListError::IndexOutOfRange {
                    index: row,
                    count: state.items.len(),
                });
            }
            state.shift_for_insert(row);
            state.items.insert(row, item);
        }
        self.emit(ListChangedEvent::item_added(row));
        Ok(())
    }

    /// Replaces the item at `row`.
    pub fn replace(&self, row: usize, item: T) -> Result<(), ListError> {
        {
            let mut state = self.state.write();
            check_row(row, state.items.len())?;
            state.items[row] = item;
        }
        self.emit(ListChangedEvent::item_changed(row, None));
        Ok(())
    }

    /// Moves the item at `from` to `to`.
    pub fn move_item(&self, from: usize, to: usize) -> Result<(), ListError> {
        {
            let mut state = self.state.write();
            let len = state.items.len();
            check_row(from, len)?;
            check_row(to, len)?;
            let item = state.items.remove(from);
            state.items.insert(to, item);
            state.pending_new = None;
            state.editing = None;
        }
        self.emit(ListChangedEvent::item_moved(from, to));
        Ok(())
    }

    /// Replaces every item.
    pub fn set_items(&self, items: Vec<T>) {
        {
            let mut state = self.state.write();
            state.items = items;
            state.pending_new = None;
            state.editing = None;
        }
        self.reset_bindings();
    }

    /// Raises a reset notification.
    pub fn reset_bindings(&self) {
        self.emit(ListChangedEvent::reset());
    }

    /// Raises an item-changed notification for `row`.
    pub fn reset_item(&self, row: usize) {
        self.emit(ListChangedEvent::item_changed(row, None));
    }

    /// Allows or forbids `add_new`. Raises a reset when the policy changes.
    pub fn set_allow_new(&self, allow: bool) {
        self.set_policy(|state| &mut state.allow_new, allow);
    }

    /// Allows or forbids editing. Raises a reset when the policy changes.
    pub fn set_allow_edit(&self, allow: bool) {
        self.set_policy(|state| &mut state.allow_edit, allow);
    }

    /// Allows or forbids removal. Raises a reset when the policy changes.
    pub fn set_allow_remove(&self, allow: bool) {
        self.set_policy(|state| &mut state.allow_remove, allow);
    }

    /// Adds a field at the end of the schema.
    pub fn add_field(&self, field: Field<T>) {
        let name = field.descriptor.name().to_string();
        self.state.write().fields.push(field);
        self.emit(ListChangedEvent::metadata(ListChangedKind::PropertyAdded, &name));
    }

    /// Removes the field called `name`. Returns `false` if there is none.
    pub fn remove_field(&self, name: &str) -> bool {
        let removed = {
            let mut state = self.state.write();
            let index = state.fields.iter().position(|f| f.descriptor.matches(name));
            if let Some(index) = index {
                state.fields.remove(index);
                if state.sort.is_some_and(|(sorted, _)| sorted == index) {
                    state.sort = None;
                }
            }
            index.is_some()
        };
        if removed {
            self.emit(ListChangedEvent::metadata(ListChangedKind::PropertyDeleted, name));
        }
        removed
    }

    fn set_policy(&self, flag: impl FnOnce(&mut ListState<T>) -> &mut bool, allow: bool) {
        let changed = {
            let mut state = self.state.write();
            let slot = flag(&mut state);
            let changed = *slot != allow;
            *slot = allow;
            changed
        };
        if changed {
            self.reset_bindings();
        }
    }

    fn emit(&self, event: ListChangedEvent) {
        tracing::trace!(target: targets::LIST, kind = ?event.kind, index = ?event.new_index, "list changed");
        self.signals.list_changed.emit(event);
    }

    fn error_text(&self, row: usize, field: Option<usize>) -> Result<String, ListError> {
        let state = self.state.read();
        check_row(row, state.items.len())?;
        let name = match field {
            Some(index) => Some(state.field(index)?.descriptor.name().to_string()),
            None => None,
        };
        Ok(self
            .errors
            .as_ref()
            .and_then(|errors| errors(&state.items[row], name.as_deref()))
            .unwrap_or_default())
    }
}

impl<T: Clone + Send + Sync + 'static> BindingList for VecBindingList<T> {
    fn len(&self) -> usize {
        self.state.read().items.len()
    }

    fn allow_new(&self) -> bool {
        self.factory.is_some() && self.state.read().allow_new
    }

    fn allow_edit(&self) -> bool {
        self.state.read().allow_edit
    }

    fn allow_remove(&self) -> bool {
        self.state.read().allow_remove
    }

    fn item_properties(&self) -> PropertyDescriptors {
        let state = self.state.read();
        state
            .fields
            .iter()
            .map(|field| field.descriptor.clone().sortable(self.sortable && field.descriptor.is_sortable()))
            .collect()
    }

    fn value(&self, row: usize, bound_index: usize) -> Result<CellValue, ListError> {
        let state = self.state.read();
        check_row(row, state.items.len())?;
        let field = state.field(bound_index)?;
        (field.get)(&state.items[row])
    }

    fn set_value(
        &self,
        row: usize,
        bound_index: usize,
        value: CellValue,
    ) -> Result<(), ListError> {
        let name = {
            let mut state = self.state.write();
            check_row(row, state.items.len())?;
            if !state.allow_edit {
                return Err(ListError::NotSupported { operation: "editing" });
            }
            let field = state.field(bound_index)?.clone();
            let descriptor = &field.descriptor;
            let Some(set) = field.set.as_ref().filter(|_| !descriptor.is_read_only()) else {
                return Err(ListError::read_only(descriptor.name()));
            };
            let value = if value.is_assignable_to(descriptor.value_type()) {
                value
            } else {
                descriptor.converter().convert_from(&value)?
            };
            set(&mut state.items[row], value)?;
            descriptor.name().to_string()
        };
        self.emit(ListChangedEvent::item_changed(row, Some(&name)));
        Ok(())
    }

    fn row_error(&self, row: usize) -> Result<String, ListError> {
        self.error_text(row, None)
    }

    fn field_error(&self, row: usize, bound_index: usize) -> Result<String, ListError> {
        self.error_text(row, Some(bound_index))
    }

    fn add_new(&self) -> Result<usize, ListError> {
        let Some(factory) = self.factory.as_ref().filter(|_| self.state.read().allow_new) else {
            return Err(ListError::NotSupported {
                operation: "adding items",
            });
        };
        let item = factory();
        let row = {
            let mut state = self.state.write();
            state.items.push(item);
            let row = state.items.len() - 1;
            state.pending_new = Some(row);
            row
        };
        tracing::debug!(target: targets::LIST, row, "add-new item pending");
        self.emit(ListChangedEvent::item_added(row));
        Ok(row)
    }

    fn remove_at(&self, row: usize) -> Result<(), ListError> {
        {
            let mut state = self.state.write();
            if !state.allow_remove {
                return Err(ListError::NotSupported {
                    operation: "removing items",
                });
            }
            check_row(row, state.items.len())?;
            state.items.remove(row);
            state.forget_row(row);
        }
        self.emit(ListChangedEvent::item_deleted(row));
        Ok(())
    }

    fn clear(&self) -> Result<(), ListError> {
        {
            let mut state = self.state.write();
            if !state.allow_remove {
                return Err(ListError::NotSupported { operation: "clearing" });
            }
            state.items.clear();
            state.pending_new = None;
            state.editing = None;
        }
        self.reset_bindings();
        Ok(())
    }

    fn end_new(&self, row: usize) -> Result<(), ListError> {
        let mut state = self.state.write();
        if state.pending_new == Some(row) {
            state.pending_new = None;
            tracing::debug!(target: targets::LIST, row, "add-new item committed");
        }
        Ok(())
    }

    fn cancel_new(&self, row: usize) {
        let cancelled = {
            let mut state = self.state.write();
            if state.pending_new == Some(row) && row < state.items.len() {
                state.items.remove(row);
                state.forget_row(row);
                true
            } else {
                false
            }
        };
        if cancelled {
            tracing::debug!(target: targets::LIST, row, "add-new item discarded");
            self.emit(ListChangedEvent::item_deleted(row));
        }
    }

    fn begin_edit(&self, row: usize) {
        let mut state = self.state.write();
        if state.editing.as_ref().is_some_and(|s| s.row == row) {
            return;
        }
        if let Some(item) = state.items.get(row).cloned() {
            state.editing = Some(EditSnapshot { row, item });
        }
    }

    fn end_edit(&self, row: usize) -> Result<(), ListError> {
        let mut state = self.state.write();
        if state.editing.as_ref().is_some_and(|s| s.row == row) {
            state.editing = None;
        }
        Ok(())
    }

    fn cancel_edit(&self, row: usize) {
        let restored = {
            let mut state = self.state.write();
            match state.editing.take() {
                Some(snapshot) if snapshot.row == row && row < state.items.len() => {
                    state.items[row] = snapshot.item;
                    true
                }
                other => {
                    state.editing = other;
                    false
                }
            }
        };
        if restored {
            self.emit(ListChangedEvent::item_changed(row, None));
        }
    }

    fn supports_sorting(&self) -> bool {
        self.sortable
    }

    fn is_sorted(&self) -> bool {
        self.state.read().sort.is_some()
    }

    fn sort_property(&self) -> Option<String> {
        let state = self.state.read();
        let (index, _) = state.sort?;
        state.fields.get(index).map(|f| f.descriptor.name().to_string())
    }

    fn sort_direction(&self) -> ListSortDirection {
        self.state
            .read()
            .sort
            .map(|(_, direction)| direction)
            .unwrap_or_default()
    }

    fn apply_sort(&self, bound_index: usize, direction: ListSortDirection) -> Result<(), ListError> {
        if !self.sortable {
            return Err(ListError::NotSupported { operation: "sorting" });
        }
        {
            let mut state = self.state.write();
            let field = state.field(bound_index)?.clone();
            if !field.descriptor.is_sortable() {
                return Err(ListError::NotSupported { operation: "sorting" });
            }
            // The pending item takes part in the sort as a committed item.
            state.pending_new = None;
            state.editing = None;
            let mut keyed: Vec<(CellValue, T)> = state
                .items
                .drain(..)
                .map(|item| ((field.get)(&item).unwrap_or_default(), item))
                .collect();
            keyed.sort_by(|(a, _), (b, _)| match direction {
                ListSortDirection::Ascending => a.sort_cmp(b),
                ListSortDirection::Descending => b.sort_cmp(a),
            });
            state.items = keyed.into_iter().map(|(_, item)| item).collect();
            state.sort = Some((bound_index, direction));
        }
        tracing::debug!(target: targets::LIST, bound_index, ?direction, "list sorted");
        self.reset_bindings();
        Ok(())
    }

    fn remove_sort(&self) -> Result<(), ListError> {
        if !self.sortable {
            return Err(ListError::NotSupported { operation: "sorting" });
        }
        let was_sorted = self.state.write().sort.take().is_some();
        if was_sorted {
            self.reset_bindings();
        }
        Ok(())
    }

    fn signals(&self) -> &ListSignals {
        &self.signals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Clone, Debug, Default, PartialEq)]
    struct Part {
        name: String,
        qty: i64,
    }

    fn part(name: &str, qty: i64) -> Part {
        Part {
            name: name.into(),
            qty,
        }
    }

    fn parts() -> VecBindingList<Part> {
        VecBindingList::new(vec![part("bolt", 3), part("nut", 1), part("gear", 2)])
            .with_field(
                Field::new("Name", ValueType::Text, |p: &Part| p.name.clone().into()).with_setter(
                    |p, v| {
                        p.name = v.as_text().unwrap_or_default().to_string();
                        Ok(())
                    },
                ),
            )
            .with_field(
                Field::new("Qty", ValueType::Int, |p: &Part| p.qty.into()).with_setter(|p, v| {
                    p.qty = v.as_int().unwrap_or_default();
                    Ok(())
                }),
            )
            .with_factory(Part::default)
    }

    fn record(list: &VecBindingList<Part>) -> Arc<Mutex<Vec<ListChangedEvent>>> {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        list.signals().list_changed.connect(move |e| sink.lock().push(e.clone()));
        events
    }

    #[test]
    fn test_set_value_converts_and_notifies() {
        let list = parts();
        let events = record(&list);

        list.set_value(1, 1, CellValue::from("7")).unwrap();
        assert_eq!(list.get(1).unwrap().qty, 7);
        assert_eq!(
            events.lock().as_slice(),
            &[ListChangedEvent::item_changed(1, Some("Qty"))]
        );
    }

    #[test]
    fn test_read_only_field_rejects_writes() {
        let list = VecBindingList::new(vec![part("bolt", 1)])
            .with_field(Field::new("Name", ValueType::Text, |p: &Part| p.name.clone().into()));
        assert_eq!(
            list.set_value(0, 0, CellValue::from("x")),
            Err(ListError::read_only("Name"))
        );
        assert!(list.item_properties().get(0).unwrap().is_read_only());
    }

    #[test]
    fn test_add_new_then_cancel() {
        let list = parts();
        let events = record(&list);

        let row = list.add_new().unwrap();
        assert_eq!(row, 3);
        assert_eq!(list.pending_new(), Some(3));

        list.cancel_new(row);
        assert_eq!(list.len(), 3);
        assert_eq!(list.pending_new(), None);
        assert_eq!(
            events.lock().as_slice(),
            &[ListChangedEvent::item_added(3), ListChangedEvent::item_deleted(3)]
        );
    }

    #[test]
    fn test_end_new_commits_pending_item() {
        let list = parts();
        let row = list.add_new().unwrap();
        list.end_new(row).unwrap();
        list.cancel_new(row);
        assert_eq!(list.len(), 4);
    }

    #[test]
    fn test_cancel_edit_restores_snapshot() {
        let list = parts();
        list.begin_edit(0);
        list.set_value(0, 0, CellValue::from("washer")).unwrap();
        list.cancel_edit(0);
        assert_eq!(list.get(0), Some(part("bolt", 3)));
    }

    #[test]
    fn test_remove_shifts_pending_row() {
        let list = parts();
        let row = list.add_new().unwrap();
        list.remove_at(0).unwrap();
        assert_eq!(list.pending_new(), Some(row - 1));
    }

    #[test]
    fn test_sort_is_stable_and_resets() {
        let list = parts();
        list.push(part("pin", 1));
        let events = record(&list);

        list.apply_sort(1, ListSortDirection::Ascending).unwrap();
        let names: Vec<_> = list.items().into_iter().map(|p| p.name).collect();
        assert_eq!(names, ["nut", "pin", "gear", "bolt"]);
        assert!(list.is_sorted());
        assert_eq!(list.sort_property().as_deref(), Some("Qty"));
        assert_eq!(events.lock().as_slice(), &[ListChangedEvent::reset()]);

        list.apply_sort(0, ListSortDirection::Descending).unwrap();
        assert_eq!(list.get(0).unwrap().name, "pin");
        assert_eq!(list.sort_direction(), ListSortDirection::Descending);
    }

    #[test]
    fn test_unsortable_list() {
        let list = parts().with_sorting(false);
        assert!(!list.supports_sorting());
        assert!(list.apply_sort(0, ListSortDirection::Ascending).is_err());
        assert!(!list.item_properties().get(0).unwrap().is_sortable());
    }

    #[test]
    fn test_policy_change_raises_reset_once() {
        let list = parts();
        let events = record(&list);
        list.set_allow_new(false);
        list.set_allow_new(false);
        assert!(!list.allow_new());
        assert_eq!(events.lock().len(), 1);
    }

    #[test]
    fn test_schema_changes() {
        let list = parts();
        let events = record(&list);
        list.add_field(Field::new("Upper", ValueType::Text, |p: &Part| {
            p.name.to_uppercase().into()
        }));
        assert_eq!(list.value(0, 2), Ok(CellValue::from("BOLT")));
        assert!(list.remove_field("upper"));
        assert!(!list.remove_field("upper"));

        let kinds: Vec<_> = events.lock().iter().map(|e| e.kind).collect();
        assert_eq!(kinds, [ListChangedKind::PropertyAdded, ListChangedKind::PropertyDeleted]);
    }

    #[test]
    fn test_error_info() {
        let list = parts().with_error_info(|p, field| match field {
            None if p.qty < 2 => Some("low stock".into()),
            Some("Qty") if p.qty < 2 => Some("must be at least 2".into()),
            _ => None,
        });
        assert_eq!(list.row_error(0).unwrap(), "");
        assert_eq!(list.row_error(1).unwrap(), "low stock");
        assert_eq!(list.field_error(1, 1).unwrap(), "must be at least 2");
        assert!(list.row_error(9).is_err());
    }
}
