//! Integration tests for sorting through the bound list.

mod common;

use std::sync::Arc;

use common::{Item, bound_grid, item, item_list};
use lattice_grid::grid::{Column, GridHost, SortMode, SortOrder};
use lattice_grid::model::{BindingList, Field, ListSortDirection, ValueType, VecBindingList};
use lattice_grid::{BindingError, GridError, ListError};

fn unsorted() -> Arc<VecBindingList<Item>> {
    item_list(vec![item("b", 2), item("c", 1), item("a", 3)])
}

fn glyphs(grid: &lattice_grid::grid::DataGrid) -> Vec<SortOrder> {
    grid.columns().iter().map(|column| column.sort_glyph()).collect()
}

#[test]
fn test_sort_round_trip() {
    let list = unsorted();
    let grid = bound_grid(&list);

    grid.sort(0, ListSortDirection::Ascending).unwrap();

    let names: Vec<_> = list.items().into_iter().map(|item| item.name).collect();
    assert_eq!(names, ["a", "b", "c"]);
    assert_eq!(grid.sorted_column(), Some((0, SortOrder::Ascending)));
    assert_eq!(glyphs(&grid), [SortOrder::Ascending, SortOrder::None]);
    assert_eq!(
        grid.connection().sorting_information(),
        Some(("Name".to_string(), ListSortDirection::Ascending))
    );
    assert_eq!(grid.connection().bound_column_sort_order(0), SortOrder::Ascending);
    assert_eq!(grid.connection().bound_column_sort_order(1), SortOrder::None);
}

#[test]
fn test_sort_switches_column() {
    let list = unsorted();
    let grid = bound_grid(&list);

    grid.sort(0, ListSortDirection::Ascending).unwrap();
    grid.sort(1, ListSortDirection::Descending).unwrap();

    let qty: Vec<_> = list.items().into_iter().map(|item| item.qty).collect();
    assert_eq!(qty, [3, 2, 1]);
    assert_eq!(grid.sorted_column(), Some((1, SortOrder::Descending)));
    assert_eq!(glyphs(&grid), [SortOrder::None, SortOrder::Descending]);
    assert_eq!(grid.row_count(), 4);
}

#[test]
fn test_sort_applied_by_the_list_shows_in_headers() {
    let list = unsorted();
    let grid = bound_grid(&list);

    list.apply_sort(1, ListSortDirection::Descending).unwrap();

    assert_eq!(grid.sorted_column(), Some((1, SortOrder::Descending)));
    assert_eq!(glyphs(&grid), [SortOrder::None, SortOrder::Descending]);

    list.remove_sort().unwrap();
    assert_eq!(grid.sorted_column(), None);
    assert_eq!(glyphs(&grid), [SortOrder::None, SortOrder::None]);
}

#[test]
fn test_sort_on_list_without_sorting() {
    let list = Arc::new(
        VecBindingList::new(vec![item("a", 1)])
            .with_field(Field::new("Name", ValueType::Text, |item: &Item| {
                item.name.clone().into()
            }))
            .with_sorting(false),
    );
    let grid = bound_grid(&list);

    let err = grid.sort(0, ListSortDirection::Ascending).unwrap_err();
    assert_eq!(err, GridError::Binding(BindingError::SortNotSupported));
    assert_eq!(grid.sorted_column(), None);
    assert!(!grid.in_sort_operation());
}

#[test]
fn test_sort_on_unsortable_field() {
    let list = Arc::new(
        VecBindingList::new(vec![item("b", 1), item("a", 2)]).with_field(
            Field::new("Name", ValueType::Text, |item: &Item| item.name.clone().into())
                .unsortable(),
        ),
    );
    let grid = bound_grid(&list);

    let err = grid.sort(0, ListSortDirection::Ascending).unwrap_err();
    assert_eq!(
        err,
        GridError::Data(ListError::NotSupported {
            operation: "sorting"
        })
    );
    assert_eq!(list.get(0), Some(item("b", 1)));
}

#[test]
fn test_sort_refused_for_unbound_and_unsortable_columns() {
    let list = unsorted();
    let grid = bound_grid(&list);
    grid.add_column(Column::new("Note"));
    grid.add_column(Column::bound_to("Fixed", "Name").with_sort_mode(SortMode::NotSortable));

    let err = grid.sort(2, ListSortDirection::Ascending).unwrap_err();
    assert_eq!(err, GridError::Binding(BindingError::ColumnNotBound { column: 2 }));

    let err = grid.sort(3, ListSortDirection::Ascending).unwrap_err();
    assert_eq!(err, GridError::Binding(BindingError::SortNotSupported));

    let err = grid.sort(9, ListSortDirection::Ascending).unwrap_err();
    assert_eq!(err, GridError::Binding(BindingError::ColumnNotBound { column: 9 }));
    assert_eq!(list.get(0), Some(item("b", 2)));
}
