//! Integration tests for binding, list notifications and position sync.

mod common;

use std::sync::Arc;

use parking_lot::Mutex;

use common::{Item, ScriptedList, bound_grid, item_list, numbered, setup};
use lattice_grid::binding::BindingContext;
use lattice_grid::grid::{CellAddress, DataGrid, GridConfig, GridHost};
use lattice_grid::model::{
    BindingList, CellValue, DataSet, DataSource, Field, ListChangedEvent, ListChangedKind,
    ValueType,
};
use lattice_grid::{BindingError, GridError};

fn completions(grid: &DataGrid) -> Arc<Mutex<Vec<ListChangedKind>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    grid.signals()
        .data_binding_complete
        .connect(move |kind| sink.lock().push(*kind));
    seen
}

#[test]
fn test_binding_generates_columns_and_rows() {
    let list = numbered(3);
    let grid = bound_grid(&list);

    assert_eq!(grid.column_count(), 2);
    assert_eq!(grid.row_count(), 4);
    assert_eq!(grid.new_row_index(), Some(3));
    assert_eq!(grid.current_cell(), Some(CellAddress::new(0, 0)));
    assert_eq!(grid.cell_value(0, 2).unwrap(), Some(CellValue::from("item2")));
    assert!(grid.connection().interested_in_row_events());
}

#[test]
fn test_reset_is_idempotent() {
    let list = numbered(3);
    let grid = bound_grid(&list);
    let seen = completions(&grid);

    for _ in 0..2 {
        list.reset_bindings();

        assert_eq!(grid.row_count(), 4);
        assert_eq!(grid.new_row_index(), Some(3));
        assert_eq!(grid.current_cell(), Some(CellAddress::new(0, 0)));
        assert!(!grid.connection().list_was_reset());
        assert!(grid.connection().state().add_new.is_finished());
    }
    assert_eq!(*seen.lock(), [ListChangedKind::Reset, ListChangedKind::Reset]);
}

#[test]
fn test_items_added_and_removed_outside_the_grid() {
    let list = numbered(2);
    let grid = bound_grid(&list);

    list.push(common::item("pushed", 9));
    assert_eq!(grid.row_count(), 4);
    assert_eq!(grid.cell_value(0, 2).unwrap(), Some(CellValue::from("pushed")));

    list.insert(0, common::item("first", 0)).unwrap();
    assert_eq!(grid.row_count(), 5);
    assert_eq!(grid.cell_value(0, 0).unwrap(), Some(CellValue::from("first")));

    list.remove_at(1).unwrap();
    assert_eq!(grid.row_count(), 4);
    assert_eq!(grid.new_row_index(), Some(3));
}

#[test]
fn test_item_changed_invalidates_cells() {
    let list = numbered(2);
    let grid = bound_grid(&list);
    grid.take_invalidations();

    list.replace(1, common::item("renamed", 5)).unwrap();

    assert!(!grid.take_invalidations().is_empty());
    assert_eq!(grid.cell_value(1, 1).unwrap(), Some(CellValue::Int(5)));
}

#[test]
fn test_shared_binding_context_syncs_position() {
    setup();
    let list = numbered(3);
    let context = BindingContext::new();
    let first = DataGrid::new();
    let second = DataGrid::new();
    for grid in [&first, &second] {
        grid.set_binding_context(Some(context.clone())).unwrap();
        grid.set_data_source(Some(DataSource::from_list(list.clone())))
            .unwrap();
    }
    assert_eq!(context.len(), 1);

    assert!(first.set_current_cell(1, 2).unwrap());

    assert_eq!(second.current_cell(), Some(CellAddress::new(0, 2)));
    let adapter = second.connection().list_adapter().unwrap();
    assert_eq!(adapter.position(), Some(2));
}

#[test]
fn test_separate_binding_contexts_are_independent() {
    let list = numbered(3);
    let first = bound_grid(&list);
    let second = bound_grid(&list);

    assert!(first.set_current_cell(0, 2).unwrap());

    assert_eq!(second.current_cell(), Some(CellAddress::new(0, 0)));
}

#[test]
fn test_deferred_data_set_initialization() {
    setup();
    let table = numbered(2);
    let set = Arc::new(DataSet::new());
    set.begin_init();
    set.add_table("Items", table.clone());

    let grid = DataGrid::new();
    grid.set_data_binding(Some(DataSource::from_source(set.clone())), "Items")
        .unwrap();
    assert_eq!(grid.column_count(), 0);
    assert!(grid.connection().list_adapter().is_none());

    let seen = completions(&grid);
    set.end_init();

    assert_eq!(grid.column_count(), 2);
    assert_eq!(grid.row_count(), 3);
    assert_eq!(grid.current_cell(), Some(CellAddress::new(0, 0)));
    assert_eq!(grid.connection().data_member(), "Items");
    assert_eq!(*seen.lock(), [ListChangedKind::Reset]);
    assert!(grid.connection().take_deferred_error().is_none());
}

#[test]
fn test_data_member_kept_or_cleared_with_new_source() {
    setup();
    let orders = Arc::new(DataSet::new());
    orders.add_table("Orders", numbered(1));
    let other_orders = Arc::new(DataSet::new());
    other_orders.add_table("orders", numbered(4));
    let customers = Arc::new(DataSet::new());
    customers.add_table("Customers", numbered(2));

    let grid = DataGrid::new();
    grid.set_data_binding(Some(DataSource::from_source(orders)), "Orders")
        .unwrap();
    assert_eq!(grid.row_count(), 2);

    grid.set_data_source(Some(DataSource::from_source(other_orders)))
        .unwrap();
    assert_eq!(grid.connection().data_member(), "Orders");
    assert_eq!(grid.row_count(), 5);

    grid.set_data_source(Some(DataSource::from_source(customers)))
        .unwrap();
    assert_eq!(grid.connection().data_member(), "");
    assert_eq!(grid.column_count(), 0);
    assert_eq!(grid.row_count(), 0);
}

#[test]
fn test_invalid_data_member_is_a_binding_error() {
    let list = numbered(1);
    let grid = bound_grid(&list);

    let err = grid.set_data_member("Missing").unwrap_err();
    assert_eq!(
        err,
        GridError::Binding(BindingError::InvalidDataMember {
            member: "Missing".to_string()
        })
    );
}

#[test]
fn test_unbinding_clears_the_grid() {
    let list = numbered(2);
    let grid = bound_grid(&list);

    grid.set_data_source(None).unwrap();

    assert!(grid.connection().data_source().is_none());
    assert!(grid.connection().list_adapter().is_none());
    assert_eq!(grid.column_count(), 0);
    assert_eq!(grid.row_count(), 0);

    // Events of the old list no longer reach the grid.
    list.push(common::item("late", 1));
    assert_eq!(grid.row_count(), 0);
}

#[test]
fn test_dispose_disconnects_from_the_list() {
    let list = numbered(2);
    let grid = bound_grid(&list);

    grid.connection().dispose();

    assert!(grid.connection().is_disposed());
    list.push(common::item("late", 1));
    assert_eq!(grid.row_count(), 3);
}

#[test]
fn test_schema_changes_regenerate_columns() {
    let list = numbered(2);
    let grid = bound_grid(&list);

    list.add_field(Field::new("Double", ValueType::Int, |item: &Item| {
        (item.qty * 2).into()
    }));
    assert_eq!(grid.column_count(), 3);
    assert_eq!(grid.cell_value(2, 1).unwrap(), Some(CellValue::Int(2)));
    assert!(!grid.connection().processing_metadata_changes());

    assert!(list.remove_field("Qty"));
    let names: Vec<_> = grid
        .columns()
        .iter()
        .map(|column| column.data_property_name().to_string())
        .collect();
    assert_eq!(names, ["Name", "Double"]);
    assert_eq!(grid.column(1).and_then(|column| column.bound_index()), Some(1));
}

#[test]
fn test_item_added_at_new_row_slot_is_an_ordering_fault() {
    let list = Arc::new(ScriptedList::new(vec![1]));
    let grid = bound_grid(&list);
    assert_eq!(grid.new_row_index(), Some(1));

    list.push_silently(2);
    list.emit(ListChangedEvent::item_added(2));

    assert!(matches!(
        grid.connection().take_deferred_error(),
        Some(GridError::TransactionOrdering(_))
    ));
    assert!(grid.connection().take_deferred_error().is_none());

    let err = grid
        .connection()
        .process_list_changed(&ListChangedEvent::item_added(grid.row_count()))
        .unwrap_err();
    assert!(matches!(err, GridError::TransactionOrdering(_)));
}

#[test]
fn test_grid_config_shapes_the_binding() {
    setup();
    let config = GridConfig::from_toml_str(
        r#"
        allow_user_to_add_rows = false
        null_value_text = "(none)"
        "#,
    )
    .unwrap();
    let list = numbered(2);
    let grid = DataGrid::with_config(config);
    grid.set_data_source(Some(DataSource::from_list(list.clone())))
        .unwrap();

    assert_eq!(grid.row_count(), 2);
    assert_eq!(grid.new_row_index(), None);
    assert_eq!(grid.config().null_value_text, "(none)");

    grid.set_allow_user_to_add_rows(true);
    assert_eq!(grid.new_row_index(), Some(2));
}

#[test]
fn test_read_only_grid_has_no_new_row() {
    let list = item_list(vec![common::item("a", 1)]);
    let grid = bound_grid(&list);
    assert_eq!(grid.row_count(), 2);

    grid.set_read_only(true);

    assert_eq!(grid.row_count(), 1);
    assert!(!grid.set_cell_value(0, 0, "b".into()).unwrap());
    assert_eq!(list.len(), 1);
}
