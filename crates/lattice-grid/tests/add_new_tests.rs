//! Integration tests for the add-new transaction.

mod common;

use std::sync::Arc;

use common::{ScriptedList, bound_grid, item, numbered};
use lattice_grid::grid::{AddNewPhase, CellAddress, DeletePhase, GridHost};
use lattice_grid::model::{BindingList, CellValue};

#[test]
fn test_entering_new_row_opens_add_new() {
    let list = numbered(2);
    let grid = bound_grid(&list);
    assert_eq!(grid.row_count(), 3);

    assert!(grid.set_current_cell(0, 2).unwrap());

    assert_eq!(list.len(), 3);
    assert_eq!(list.pending_new(), Some(2));
    assert_eq!(grid.row_count(), 3);
    assert_eq!(grid.new_row_index(), Some(2));
    assert_eq!(grid.connection().state().add_new, AddNewPhase::Open);
    let adapter = grid.connection().list_adapter().unwrap();
    assert_eq!(adapter.position(), Some(2));
}

#[test]
fn test_leaving_untouched_new_row_is_idempotent() {
    let list = numbered(2);
    let grid = bound_grid(&list);

    for _ in 0..2 {
        assert!(grid.set_current_cell(0, 2).unwrap());
        assert!(grid.set_current_cell(0, 0).unwrap());

        assert_eq!(list.len(), 2);
        assert_eq!(list.pending_new(), None);
        assert_eq!(grid.row_count(), 3);
        assert_eq!(grid.new_row_index(), Some(2));
        assert_eq!(grid.current_cell(), Some(CellAddress::new(0, 0)));
        assert!(grid.connection().state().add_new.is_finished());
    }
}

#[test]
fn test_add_new_completion() {
    let list = numbered(2);
    let grid = bound_grid(&list);

    assert!(grid.set_current_cell(0, 2).unwrap());
    assert!(grid.set_cell_value(0, 2, "new".into()).unwrap());
    // Typing turned the slot into a data row and appended a fresh slot.
    assert_eq!(grid.row_count(), 4);
    assert_eq!(grid.new_row_index(), Some(3));
    assert!(grid.is_current_row_dirty());

    assert!(grid.set_cell_value(1, 2, "7".into()).unwrap());
    assert!(grid.set_current_cell(0, 0).unwrap());

    assert_eq!(list.len(), 3);
    assert_eq!(list.pending_new(), None);
    assert_eq!(list.get(2), Some(item("new", 7)));
    assert_eq!(grid.row_count(), 4);
    assert_eq!(grid.cell_value(1, 2).unwrap(), Some(CellValue::Int(7)));
    assert!(grid.connection().state().add_new.is_finished());
}

#[test]
fn test_commit_row_closes_add_new_in_place() {
    let list = numbered(1);
    let grid = bound_grid(&list);

    assert!(grid.set_cell_value(0, 1, "added".into()).unwrap());
    assert!(grid.commit_row().unwrap());

    assert_eq!(list.len(), 2);
    assert_eq!(list.pending_new(), None);
    assert_eq!(grid.current_cell(), Some(CellAddress::new(0, 1)));
    assert!(!grid.is_current_row_dirty());
    assert_eq!(grid.connection().data_bound_rows_count(), 2);
}

#[test]
fn test_delete_during_add_new() {
    let list = numbered(2);
    let grid = bound_grid(&list);

    assert!(grid.set_current_cell(0, 2).unwrap());
    assert!(grid.set_cell_value(0, 2, "tmp".into()).unwrap());
    assert_eq!(grid.new_row_index(), Some(3));

    // The row before the fresh slot is the pending item.
    assert!(grid.delete_row(2).unwrap());

    assert_eq!(list.len(), 2);
    assert_eq!(list.pending_new(), None);
    assert_eq!(grid.row_count(), 3);
    assert_eq!(grid.new_row_index(), Some(2));
    assert!(grid.connection().state().add_new.is_finished());
    assert_eq!(grid.current_cell(), Some(CellAddress::new(0, 1)));
}

#[test]
fn test_delete_untouched_new_row_cancels_add_new() {
    let list = numbered(2);
    let grid = bound_grid(&list);

    assert!(grid.set_current_cell(0, 2).unwrap());
    assert!(grid.delete_row(2).unwrap());

    assert_eq!(list.len(), 2);
    assert_eq!(grid.row_count(), 3);
    assert!(grid.connection().state().add_new.is_finished());
    // With no transaction open the slot itself cannot be deleted.
    assert!(!grid.delete_row(2).unwrap());
}

#[test]
fn test_cancel_edit_discards_new_row() {
    let list = numbered(2);
    let grid = bound_grid(&list);

    assert!(grid.set_current_cell(0, 2).unwrap());
    assert!(grid.set_cell_value(0, 2, "discard me".into()).unwrap());
    grid.cancel_edit().unwrap();

    assert_eq!(list.len(), 2);
    assert_eq!(grid.row_count(), 3);
    assert_eq!(grid.new_row_index(), Some(2));
    assert_eq!(grid.current_cell(), Some(CellAddress::new(0, 1)));
    assert!(!grid.is_current_row_dirty());
    assert!(grid.connection().state().add_new.is_finished());
}

#[test]
fn test_typing_after_cancel_starts_another_add_new() {
    let list = numbered(2);
    let grid = bound_grid(&list);

    assert!(grid.set_current_cell(0, 2).unwrap());
    grid.cancel_edit().unwrap();
    assert_eq!(list.len(), 2);

    assert!(grid.set_cell_value(0, 2, "again".into()).unwrap());
    assert!(grid.commit_row().unwrap());

    assert_eq!(list.len(), 3);
    assert_eq!(list.get(2).map(|item| item.name), Some("again".to_string()));
    assert_eq!(grid.row_count(), 4);
}

#[test]
fn test_new_row_hidden_when_list_refuses_new_items() {
    let list = numbered(2);
    let grid = bound_grid(&list);
    assert_eq!(grid.new_row_index(), Some(2));

    list.set_allow_new(false);
    assert_eq!(grid.row_count(), 2);
    assert_eq!(grid.new_row_index(), None);

    list.set_allow_new(true);
    assert_eq!(grid.row_count(), 3);
    assert_eq!(grid.new_row_index(), Some(2));
}

#[test]
fn test_rows_refreshed_while_adding_keep_add_new_open() {
    let list = Arc::new(ScriptedList::new(vec![1]).with_placeholder());
    let grid = bound_grid(&list);
    assert_eq!(grid.row_count(), 2);

    assert!(grid.set_current_cell(0, 1).unwrap());

    assert_eq!(list.ids(), [1, 0]);
    assert_eq!(list.pending(), Some(1));
    assert_eq!(grid.row_count(), 2);
    assert_eq!(grid.new_row_index(), Some(1));
    assert_eq!(grid.current_cell(), Some(CellAddress::new(0, 1)));
    let state = grid.connection().state();
    assert_eq!(state.add_new, AddNewPhase::Open);
    assert!(!state.list_was_reset);

    assert!(grid.set_current_cell(0, 0).unwrap());

    assert_eq!(list.ids(), [1]);
    assert_eq!(list.pending(), None);
    assert_eq!(grid.row_count(), 2);
    assert_eq!(grid.new_row_index(), Some(1));
    assert!(grid.connection().state().add_new.is_finished());
}

#[test]
fn test_item_added_at_new_row_outside_the_grid_closes_add_new() {
    let list = numbered(2);
    let grid = bound_grid(&list);
    assert!(grid.set_current_cell(0, 2).unwrap());

    list.insert(2, item("ext", 9)).unwrap();

    assert_eq!(list.len(), 4);
    assert_eq!(grid.row_count(), 5);
    assert_eq!(grid.new_row_index(), Some(4));
    assert!(grid.connection().state().add_new.is_finished());
    assert_eq!(grid.cell_value(0, 2).unwrap(), Some(CellValue::from("ext")));
}

#[test]
fn test_delete_emptying_the_list_restarts_add_new() {
    let list = Arc::new(ScriptedList::new(vec![5]));
    let grid = bound_grid(&list);
    assert!(grid.set_current_cell(0, 1).unwrap());
    assert_eq!(list.ids(), [5, 0]);

    assert!(grid.delete_row(0).unwrap());

    // The pending item went with the last committed one; a fresh one replaces it.
    assert_eq!(list.ids(), [0]);
    assert_eq!(list.pending(), Some(0));
    assert_eq!(grid.row_count(), 1);
    assert_eq!(grid.new_row_index(), Some(0));
    assert_eq!(grid.current_cell(), Some(CellAddress::new(0, 0)));
    let state = grid.connection().state();
    assert_eq!(state.add_new, AddNewPhase::Open);
    assert_eq!(state.delete, DeletePhase::Idle);
    assert!(grid.connection().take_deferred_error().is_none());
}
