//! Fixtures shared by the integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use parking_lot::Mutex;

use lattice_grid::ListError;
use lattice_grid::grid::{DataErrorEvent, DataGrid};
use lattice_grid::model::{
    BindingList, CellValue, DataSource, Field, ListChangedEvent, ListSignals, PropertyDescriptor,
    PropertyDescriptors, ValueType, VecBindingList, check_row,
};

/// Installs a test log subscriber once. Filter with `RUST_LOG`.
pub fn setup() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Item {
    pub name: String,
    pub qty: i64,
}

pub fn item(name: &str, qty: i64) -> Item {
    Item {
        name: name.to_string(),
        qty,
    }
}

/// A list of items with a writable `Name` (text) and `Qty` (int) field.
pub fn item_list(items: Vec<Item>) -> Arc<VecBindingList<Item>> {
    Arc::new(
        VecBindingList::new(items)
            .with_field(
                Field::new("Name", ValueType::Text, |item: &Item| item.name.clone().into())
                    .with_setter(|item, value| {
                        item.name = value.as_text().unwrap_or_default().to_string();
                        Ok(())
                    }),
            )
            .with_field(
                Field::new("Qty", ValueType::Int, |item: &Item| item.qty.into()).with_setter(
                    |item, value| {
                        item.qty = value.as_int().unwrap_or_default();
                        Ok(())
                    },
                ),
            )
            .with_factory(Item::default),
    )
}

/// `count` items named `item0`, `item1`, ...
pub fn numbered(count: usize) -> Arc<VecBindingList<Item>> {
    item_list(
        (0..count)
            .map(|i| item(&format!("item{i}"), i as i64))
            .collect(),
    )
}

/// A grid bound to `list`.
pub fn bound_grid<L: BindingList + 'static>(list: &Arc<L>) -> Arc<DataGrid> {
    setup();
    let grid = DataGrid::new();
    grid.set_data_source(Some(DataSource::from_list(list.clone())))
        .expect("binding failed");
    grid
}

/// Records every data error and applies `decide` to it.
pub fn record_errors<F>(grid: &DataGrid, decide: F) -> Arc<Mutex<Vec<DataErrorEvent>>>
where
    F: Fn(&mut DataErrorEvent) + Send + Sync + 'static,
{
    let log = Arc::new(Mutex::new(Vec::new()));
    let sink = log.clone();
    grid.set_data_error_handler(move |event| {
        decide(event);
        sink.lock().push(event.clone());
    });
    log
}

/// A list of ids whose events are scripted by the test.
///
/// `add_new` appends a pending `0` that stays pending until it is ended or
/// cancelled. With `placeholder` set, the list first reports a placeholder
/// at the end as deleted before adding the new item. Removing the last
/// committed item also discards a pending one.
pub struct ScriptedList {
    ids: Mutex<Vec<i64>>,
    pending: Mutex<Option<usize>>,
    placeholder: bool,
    signals: ListSignals,
}

impl ScriptedList {
    pub fn new(ids: Vec<i64>) -> Self {
        Self {
            ids: Mutex::new(ids),
            pending: Mutex::new(None),
            placeholder: false,
            signals: ListSignals::new(),
        }
    }

    pub fn with_placeholder(mut self) -> Self {
        self.placeholder = true;
        self
    }

    /// Appends an id without raising an event.
    pub fn push_silently(&self, id: i64) {
        self.ids.lock().push(id);
    }

    /// Raises `event` as if the list had changed.
    pub fn emit(&self, event: ListChangedEvent) {
        self.signals.list_changed.emit(event);
    }

    pub fn ids(&self) -> Vec<i64> {
        self.ids.lock().clone()
    }

    pub fn pending(&self) -> Option<usize> {
        *self.pending.lock()
    }
}

impl BindingList for ScriptedList {
    fn len(&self) -> usize {
        self.ids.lock().len()
    }

    fn allow_new(&self) -> bool {
        true
    }

    fn allow_remove(&self) -> bool {
        true
    }

    fn item_properties(&self) -> PropertyDescriptors {
        [PropertyDescriptor::new("Id", ValueType::Int)]
            .into_iter()
            .collect()
    }

    fn value(&self, row: usize, bound_index: usize) -> Result<CellValue, ListError> {
        let ids = self.ids.lock();
        check_row(row, ids.len())?;
        if bound_index != 0 {
            return Err(ListError::PropertyOutOfRange { index: bound_index });
        }
        Ok(CellValue::Int(ids[row]))
    }

    fn set_value(&self, row: usize, _bound_index: usize, value: CellValue) -> Result<(), ListError> {
        let mut ids = self.ids.lock();
        check_row(row, ids.len())?;
        ids[row] = value.as_int().unwrap_or_default();
        Ok(())
    }

    fn add_new(&self) -> Result<usize, ListError> {
        if self.placeholder {
            self.emit(ListChangedEvent::item_deleted(self.len()));
        }
        let row = {
            let mut ids = self.ids.lock();
            ids.push(0);
            ids.len() - 1
        };
        *self.pending.lock() = Some(row);
        self.emit(ListChangedEvent::item_added(row));
        Ok(row)
    }

    fn end_new(&self, row: usize) -> Result<(), ListError> {
        let mut pending = self.pending.lock();
        if *pending == Some(row) {
            *pending = None;
        }
        Ok(())
    }

    fn cancel_new(&self, row: usize) {
        if self.pending.lock().take_if(|pending| *pending == row).is_none() {
            return;
        }
        self.ids.lock().remove(row);
        self.emit(ListChangedEvent::item_deleted(row));
    }

    fn remove_at(&self, row: usize) -> Result<(), ListError> {
        {
            let mut ids = self.ids.lock();
            check_row(row, ids.len())?;
            ids.remove(row);
        }
        let orphaned = {
            let mut pending = self.pending.lock();
            match *pending {
                Some(index) if index == row => {
                    *pending = None;
                    None
                }
                Some(index) if index > row => {
                    *pending = Some(index - 1);
                    (index == 1).then_some(0)
                }
                _ => None,
            }
        };
        self.emit(ListChangedEvent::item_deleted(row));
        if let Some(index) = orphaned {
            *self.pending.lock() = None;
            self.ids.lock().remove(index);
            self.emit(ListChangedEvent::item_deleted(index));
        }
        Ok(())
    }

    fn signals(&self) -> &ListSignals {
        &self.signals
    }
}
