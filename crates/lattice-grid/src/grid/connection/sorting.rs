//! Sorting through the bound list.

use lattice_grid_core::logging::targets;

use crate::error::{BindingError, Result};
use crate::model::ListSortDirection;

use super::super::column::{SortMode, SortOrder};
use super::DataConnection;

impl DataConnection {
    /// Sorts the list by the property behind grid column `column`.
    pub fn sort(&self, column: usize, direction: ListSortDirection) -> Result<()> {
        let owner = self.owner()?;
        let bound_index = owner
            .column(column)
            .and_then(|column| column.bound_index())
            .ok_or(BindingError::ColumnNotBound { column })?;
        let adapter = self.bound_adapter()?;
        if !adapter.supports_sorting() {
            return Err(BindingError::SortNotSupported.into());
        }
        tracing::debug!(target: targets::CONNECTION, column, ?direction, "sorting");
        adapter.apply_sort(bound_index, direction)?;
        self.settle()
    }

    /// The property the list is sorted by, and its direction.
    ///
    /// Lists with several sort keys report the first one.
    pub fn sorting_information(&self) -> Option<(String, ListSortDirection)> {
        let adapter = self.list_adapter()?;
        let list = adapter.list();
        if !list.supports_sorting() || !list.is_sorted() {
            return None;
        }
        if let Some(property) = list.sort_property() {
            return Some((property, list.sort_direction()));
        }
        list.sort_descriptions()
            .into_iter()
            .next()
            .map(|description| (description.property, description.direction))
    }

    /// Shows the list's own sort state in the column headers.
    pub fn apply_sorting_information_from_back_end(&self) {
        let Ok(owner) = self.owner() else {
            return;
        };
        if self.list_adapter().is_none() {
            return;
        }

        let Some((property, direction)) = self.sorting_information() else {
            for index in 0..owner.column_count() {
                if owner.column(index).is_some_and(|column| column.is_data_bound()) {
                    owner.set_sort_glyph(index, SortOrder::None);
                }
            }
            owner.set_sorted_column(None);
            return;
        };

        let order = SortOrder::from(direction);
        let mut sorted_column_set = false;
        for index in 0..owner.column_count() {
            let Some(column) = owner.column(index) else {
                continue;
            };
            if !column.is_data_bound() || column.sort_mode() == SortMode::NotSortable {
                continue;
            }
            if column.shows_property(&property) {
                if !sorted_column_set && !owner.in_sort_operation() {
                    owner.set_sorted_column(Some((index, order)));
                    sorted_column_set = true;
                }
                owner.set_sort_glyph(index, order);
            } else {
                owner.set_sort_glyph(index, SortOrder::None);
            }
        }
    }

    /// Sort order of the property at `bound_index`.
    pub fn bound_column_sort_order(&self, bound_index: usize) -> SortOrder {
        let Some((property, direction)) = self.sorting_information() else {
            return SortOrder::None;
        };
        let sorted = self
            .properties()
            .and_then(|props| props.get(bound_index).map(|prop| prop.matches(&property)))
            .unwrap_or(false);
        if sorted {
            direction.into()
        } else {
            SortOrder::None
        }
    }
}
