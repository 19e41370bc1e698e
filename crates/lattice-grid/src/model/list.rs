//! The external list contract.
//!
//! A [`BindingList`] is any random-access list of items whose fields are
//! described by [`PropertyDescriptors`]. Lists that support change
//! notification raise a [`ListChangedEvent`] through [`ListSignals`] after
//! every mutation; the list adapter and the data connection are driven
//! entirely by those events.
//!
//! All methods take `&self`: lists are shared between the adapter, the data
//! connection, and any sibling consumer, so implementations keep their state
//! behind interior mutability. Implementations must not hold their own locks
//! while emitting, since slots re-enter the list synchronously.

use lattice_grid_core::Signal;

use super::property::PropertyDescriptors;
use super::value::CellValue;
use crate::error::ListError;

/// The kind of change a [`ListChangedEvent`] reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListChangedKind {
    /// The whole list changed in a way that cannot be described item by item.
    Reset,
    /// An item was inserted at `new_index`.
    ItemAdded,
    /// The item at `new_index` was removed.
    ItemDeleted,
    /// The item at `old_index` moved to `new_index`.
    ItemMoved,
    /// One or all fields of the item at `new_index` changed.
    ItemChanged,
    /// A property was added to the item schema.
    PropertyAdded,
    /// A property was removed from the item schema.
    PropertyDeleted,
    /// A property of the item schema changed.
    PropertyChanged,
}

impl ListChangedKind {
    /// Returns `true` for the three schema (metadata) change kinds.
    pub fn is_metadata(self) -> bool {
        matches!(
            self,
            ListChangedKind::PropertyAdded
                | ListChangedKind::PropertyDeleted
                | ListChangedKind::PropertyChanged
        )
    }
}

/// A change notification raised by a [`BindingList`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListChangedEvent {
    /// What changed.
    pub kind: ListChangedKind,
    /// The affected index (the destination for moves).
    pub new_index: Option<usize>,
    /// The source index for moves.
    pub old_index: Option<usize>,
    /// The property that changed, when a single field changed.
    pub property: Option<String>,
}

impl ListChangedEvent {
    /// A whole-list reset.
    pub fn reset() -> Self {
        Self::new(ListChangedKind::Reset, None)
    }

    /// An item was inserted at `index`.
    pub fn item_added(index: usize) -> Self {
        Self::new(ListChangedKind::ItemAdded, Some(index))
    }

    /// The item at `index` was removed.
    pub fn item_deleted(index: usize) -> Self {
        Self::new(ListChangedKind::ItemDeleted, Some(index))
    }

    /// The item at `from` moved to `to`.
    pub fn item_moved(from: usize, to: usize) -> Self {
        Self {
            old_index: Some(from),
            ..Self::new(ListChangedKind::ItemMoved, Some(to))
        }
    }

    /// Fields of the item at `index` changed; `property` names the field
    /// when only one changed.
    pub fn item_changed(index: usize, property: Option<&str>) -> Self {
        Self {
            property: property.map(str::to_string),
            ..Self::new(ListChangedKind::ItemChanged, Some(index))
        }
    }

    /// A schema change of the given kind for `property`.
    pub fn metadata(kind: ListChangedKind, property: &str) -> Self {
        Self {
            property: Some(property.to_string()),
            ..Self::new(kind, None)
        }
    }

    fn new(kind: ListChangedKind, new_index: Option<usize>) -> Self {
        Self {
            kind,
            new_index,
            old_index: None,
            property: None,
        }
    }
}

/// Sort direction requested from, or reported by, a sortable list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ListSortDirection {
    /// Smallest first.
    #[default]
    Ascending,
    /// Largest first.
    Descending,
}

/// One entry of a multi-column sort.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortDescription {
    /// The sorted property.
    pub property: String,
    /// The sort direction.
    pub direction: ListSortDirection,
}

/// Signals raised by a [`BindingList`].
pub struct ListSignals {
    /// Emitted after every change to the list or its schema.
    pub list_changed: Signal<ListChangedEvent>,
}

impl Default for ListSignals {
    fn default() -> Self {
        Self::new()
    }
}

impl ListSignals {
    /// Creates a new set of list signals.
    pub fn new() -> Self {
        Self {
            list_changed: Signal::new(),
        }
    }
}

/// Returns an error unless `row < len`.
pub fn check_row(row: usize, len: usize) -> Result<(), ListError> {
    if row < len {
        Ok(())
    } else {
        Err(ListError::IndexOutOfRange { index: row, count: len })
    }
}

/// A list that can be bound to a grid.
///
/// Only the counting, schema, access, and signal methods are required. The
/// remaining capabilities (adding and removing items, the pending add-new
/// and per-item edit transactions, data-error info, and sorting) default to
/// "not supported".
pub trait BindingList: Send + Sync {
    /// Number of items.
    fn len(&self) -> usize;

    /// Returns `true` if the list has no items.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the list raises [`ListSignals::list_changed`].
    fn supports_change_notification(&self) -> bool {
        true
    }

    /// Whether [`add_new`](Self::add_new) is allowed.
    fn allow_new(&self) -> bool {
        false
    }

    /// Whether items may be edited.
    fn allow_edit(&self) -> bool {
        !self.is_read_only()
    }

    /// Whether [`remove_at`](Self::remove_at) is allowed.
    fn allow_remove(&self) -> bool {
        false
    }

    /// Whether the list is read-only as a whole.
    fn is_read_only(&self) -> bool {
        false
    }

    /// Describes the bindable fields of the items.
    fn item_properties(&self) -> PropertyDescriptors;

    /// Reads the field at `bound_index` of the item at `row`.
    fn value(&self, row: usize, bound_index: usize) -> Result<CellValue, ListError>;

    /// Writes the field at `bound_index` of the item at `row`.
    fn set_value(&self, row: usize, bound_index: usize, value: CellValue)
    -> Result<(), ListError>;

    /// Error text for the item at `row`; empty when the item is valid.
    fn row_error(&self, row: usize) -> Result<String, ListError> {
        check_row(row, self.len())?;
        Ok(String::new())
    }

    /// Error text for one field of the item at `row`.
    fn field_error(&self, row: usize, _bound_index: usize) -> Result<String, ListError> {
        check_row(row, self.len())?;
        Ok(String::new())
    }

    /// Appends a new item and returns its index. The item stays pending
    /// until [`end_new`](Self::end_new) or [`cancel_new`](Self::cancel_new).
    fn add_new(&self) -> Result<usize, ListError> {
        Err(ListError::NotSupported {
            operation: "adding items",
        })
    }

    /// Removes the item at `row`.
    fn remove_at(&self, _row: usize) -> Result<(), ListError> {
        Err(ListError::NotSupported {
            operation: "removing items",
        })
    }

    /// Removes every item.
    fn clear(&self) -> Result<(), ListError> {
        Err(ListError::NotSupported {
            operation: "clearing",
        })
    }

    /// Commits the pending new item if it is at `row`.
    fn end_new(&self, _row: usize) -> Result<(), ListError> {
        Ok(())
    }

    /// Discards the pending new item if it is at `row`.
    fn cancel_new(&self, _row: usize) {}

    /// Starts an edit transaction on the item at `row`.
    fn begin_edit(&self, _row: usize) {}

    /// Commits the edit transaction on the item at `row`.
    fn end_edit(&self, _row: usize) -> Result<(), ListError> {
        Ok(())
    }

    /// Rolls back the edit transaction on the item at `row`.
    fn cancel_edit(&self, _row: usize) {}

    /// Whether the list can sort itself.
    fn supports_sorting(&self) -> bool {
        false
    }

    /// Whether the list is currently sorted.
    fn is_sorted(&self) -> bool {
        false
    }

    /// The single property the list is sorted by.
    fn sort_property(&self) -> Option<String> {
        None
    }

    /// The direction of the single-property sort.
    fn sort_direction(&self) -> ListSortDirection {
        ListSortDirection::Ascending
    }

    /// Sorts by the property at `bound_index`.
    fn apply_sort(&self, _bound_index: usize, _direction: ListSortDirection) -> Result<(), ListError> {
        Err(ListError::NotSupported {
            operation: "sorting",
        })
    }

    /// Removes the current sort.
    fn remove_sort(&self) -> Result<(), ListError> {
        Err(ListError::NotSupported {
            operation: "sorting",
        })
    }

    /// The multi-column sort, for lists sorted on more than one property.
    fn sort_descriptions(&self) -> Vec<SortDescription> {
        Vec::new()
    }

    /// The list's signals.
    fn signals(&self) -> &ListSignals;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_constructors() {
        let moved = ListChangedEvent::item_moved(4, 1);
        assert_eq!(moved.kind, ListChangedKind::ItemMoved);
        assert_eq!(moved.old_index, Some(4));
        assert_eq!(moved.new_index, Some(1));

        let changed = ListChangedEvent::item_changed(2, Some("Name"));
        assert_eq!(changed.property.as_deref(), Some("Name"));

        assert_eq!(ListChangedEvent::reset().new_index, None);
    }

    #[test]
    fn test_metadata_kinds() {
        assert!(ListChangedKind::PropertyAdded.is_metadata());
        assert!(ListChangedKind::PropertyChanged.is_metadata());
        assert!(!ListChangedKind::ItemChanged.is_metadata());
        assert!(!ListChangedKind::Reset.is_metadata());
    }

    #[test]
    fn test_check_row() {
        assert!(check_row(0, 1).is_ok());
        assert_eq!(
            check_row(3, 3),
            Err(ListError::IndexOutOfRange { index: 3, count: 3 })
        );
    }
}
