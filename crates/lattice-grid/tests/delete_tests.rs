//! Integration tests for deleting rows.

mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use common::{ScriptedList, bound_grid, numbered};
use lattice_grid::binding::ListAdapter;
use lattice_grid::grid::{CellAddress, DeletePhase, GridHost};
use lattice_grid::model::BindingList;

fn names(list: &lattice_grid::model::VecBindingList<common::Item>) -> Vec<String> {
    list.items().into_iter().map(|item| item.name).collect()
}

#[test]
fn test_delete_removes_item_and_row() {
    let list = numbered(3);
    let grid = bound_grid(&list);
    assert_eq!(grid.row_count(), 4);

    assert!(grid.delete_row(1).unwrap());

    assert_eq!(names(&list), ["item0", "item2"]);
    assert_eq!(grid.row_count(), 3);
    assert_eq!(grid.new_row_index(), Some(2));
    assert_eq!(grid.current_cell(), Some(CellAddress::new(0, 0)));
    assert_eq!(grid.connection().state().delete, DeletePhase::Idle);
}

#[test]
fn test_delete_current_row_moves_current_cell() {
    let list = numbered(3);
    let grid = bound_grid(&list);
    assert!(grid.set_current_cell(0, 2).unwrap());

    assert!(grid.delete_row(2).unwrap());

    assert_eq!(list.len(), 2);
    assert_eq!(grid.row_count(), 3);
    assert_eq!(grid.current_cell(), Some(CellAddress::new(0, 1)));
    let adapter = grid.connection().list_adapter().unwrap();
    assert_eq!(adapter.position(), Some(1));
}

#[test]
fn test_delete_refused_by_policy() {
    let list = numbered(2);
    let grid = bound_grid(&list);

    grid.set_allow_user_to_delete_rows(false);
    assert!(!grid.delete_row(0).unwrap());
    assert_eq!(list.len(), 2);

    grid.set_allow_user_to_delete_rows(true);
    list.set_allow_remove(false);
    assert!(!grid.connection().allow_remove());
    assert!(!grid.delete_row(0).unwrap());
    assert_eq!(list.len(), 2);
}

#[test]
fn test_delete_out_of_range_is_refused() {
    let list = numbered(1);
    let grid = bound_grid(&list);

    assert!(!grid.delete_row(5).unwrap());
    // The idle new-row slot is not an item.
    assert!(!grid.delete_row(1).unwrap());
    assert_eq!(list.len(), 1);
}

#[test]
fn test_cascade_from_sibling_adapter_is_absorbed() {
    let list = numbered(1);
    // A detail view on the same list that adds a row, then withdraws it, as
    // soon as the list runs empty.
    let sibling = ListAdapter::new(list.clone());
    let cascaded = Arc::new(AtomicBool::new(false));
    let weak = Arc::downgrade(&sibling);
    let flag = cascaded.clone();
    sibling.position_changed().connect(move |_| {
        let Some(sibling) = weak.upgrade() else {
            return;
        };
        if sibling.count() == 0 && !flag.swap(true, Ordering::SeqCst) {
            sibling.add_new().expect("sibling add-new");
            sibling.cancel_current_edit();
        }
    });
    let grid = bound_grid(&list);
    assert_eq!(grid.row_count(), 2);

    assert!(grid.delete_row(0).unwrap());

    assert!(cascaded.load(Ordering::SeqCst));
    assert!(list.is_empty());
    assert_eq!(grid.row_count(), 1);
    assert_eq!(grid.new_row_index(), Some(0));
    assert_eq!(grid.connection().state().delete, DeletePhase::Idle);
    assert!(grid.connection().take_deferred_error().is_none());
}

#[test]
fn test_delete_without_cascade_leaves_only_the_slot() {
    let list = Arc::new(ScriptedList::new(vec![1, 2]));
    let grid = bound_grid(&list);

    assert!(grid.delete_row(0).unwrap());
    assert!(grid.delete_row(0).unwrap());

    assert!(list.ids().is_empty());
    assert_eq!(grid.row_count(), 1);
    assert_eq!(grid.new_row_index(), Some(0));
}
