//! The contract a data connection consumes from the grid that owns it.

use std::sync::Arc;

use crate::binding::BindingContext;
use crate::model::ListChangedKind;

use super::column::{Column, SortOrder};
use super::data_error::DataErrorEvent;

/// A cell coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellAddress {
    /// Column index.
    pub column: usize,
    /// Row index.
    pub row: usize,
}

impl CellAddress {
    /// Creates a cell address.
    pub const fn new(column: usize, row: usize) -> Self {
        Self { column, row }
    }
}

/// The row/column collection a [`DataConnection`] keeps in sync with its
/// list.
///
/// The connection is the only caller that mutates rows through this trait.
/// Every method takes `&self`; implementations use interior mutability and
/// must not hold their own locks while calling back into the connection.
///
/// [`DataConnection`]: super::DataConnection
pub trait GridHost: Send + Sync {
    /// Resolves data sources to adapters. `None` defers binding.
    fn binding_context(&self) -> Option<Arc<BindingContext>>;

    /// Whether the grid has been created.
    fn is_created(&self) -> bool {
        true
    }

    /// Whether the grid is visible.
    fn is_visible(&self) -> bool {
        true
    }

    /// Whether the trailing new-row slot is shown.
    fn allow_user_to_add_rows_internal(&self) -> bool;

    /// Re-reads the add-rows policy from the connection and shows or hides
    /// the new-row slot.
    fn push_allow_user_to_add_rows(&self);

    /// Whether the grid is inside its own `sort` call.
    fn in_sort_operation(&self) -> bool;

    // Rows

    /// Number of rows, including the new-row slot.
    fn row_count(&self) -> usize;

    /// Index of the new-row slot.
    fn new_row_index(&self) -> Option<usize>;

    /// Inserts a data row at `index`.
    fn insert_row(&self, index: usize);

    /// Removes the row at `index`.
    fn remove_row(&self, index: usize);

    /// Turns the new-row slot into a data row and appends a fresh slot.
    fn append_new_row(&self);

    /// Rebuilds every row from the bound list.
    fn refresh_rows(&self, scroll_into_view: bool);

    /// Rebuilds the columns and then the rows.
    fn refresh_columns_and_rows(&self);

    /// Restores the default values of the new-row slot.
    fn populate_new_row_with_default_values(&self);

    /// Whether the row at `row` is visible.
    fn is_row_visible(&self, row: usize) -> bool;

    /// Makes the row at `row` visible.
    fn show_row(&self, row: usize);

    // Columns

    /// Number of columns.
    fn column_count(&self) -> usize;

    /// A snapshot of the column at `index`.
    fn column(&self, index: usize) -> Option<Column>;

    /// The first visible column.
    fn first_displayed_column_index(&self) -> Option<usize>;

    /// Makes the first column visible and returns its index.
    fn show_first_column(&self) -> Option<usize>;

    /// Sets the sort glyph of a column header.
    fn set_sort_glyph(&self, column: usize, order: SortOrder);

    /// Sets (or clears) the column the grid reports as sorted.
    fn set_sorted_column(&self, sorted: Option<(usize, SortOrder)>);

    // Current cell

    /// The current cell.
    fn current_cell(&self) -> Option<CellAddress>;

    /// Whether the current row has uncommitted edits.
    fn is_current_row_dirty(&self) -> bool;

    /// Whether the current cell hosts an editing control.
    fn is_current_cell_in_edit_mode(&self) -> bool;

    /// Reloads the editing control from the bound value.
    fn refresh_edit(&self);

    /// Clears the current cell. Returns `false` if the grid refused.
    fn clear_current_cell(&self) -> bool;

    /// Scrolls the cell into view. Returns `false` if the grid refused.
    fn scroll_into_view(&self, column: usize, row: usize) -> bool;

    /// Moves the current cell. Returns `false` if the grid refused.
    fn set_and_select_current_cell(&self, column: usize, row: usize, clear_selection: bool) -> bool;

    // Painting

    /// Suspends repainting.
    fn begin_update(&self) {}

    /// Resumes repainting.
    fn end_update(&self) {}

    /// Invalidates the whole grid.
    fn invalidate(&self) {}

    /// Invalidates the rows between `first` and `last`, inclusive.
    fn invalidate_rows(&self, first: usize, last: usize);

    /// Invalidates the header cell of `row`.
    fn invalidate_row_header(&self, row: usize);

    /// The content of a cell changed.
    fn on_cell_common_change(&self, column: usize, row: usize);

    // Notifications

    /// Raises a data error. The handler may set `throw_error` or `cancel`.
    fn on_data_error(&self, event: &mut DataErrorEvent);

    /// A list change has been mirrored into the rows.
    fn on_data_binding_complete(&self, kind: ListChangedKind);
}
