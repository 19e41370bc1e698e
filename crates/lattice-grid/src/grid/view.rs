//! A headless data grid.
//!
//! [`DataGrid`] owns the rows, columns and current cell of a grid and hosts
//! the [`DataConnection`] that keeps them in step with a bound list. It has
//! no painting; invalidation requests are recorded in a log instead.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use lattice_grid::grid::{DataGrid, GridHost};
//! use lattice_grid::model::{CellValue, DataSource, Field, ValueType, VecBindingList};
//!
//! let list = Arc::new(
//!     VecBindingList::new(vec![3_i64, 5])
//!         .with_field(Field::new("Value", ValueType::Int, |v: &i64| (*v).into()))
//!         .with_factory(|| 0),
//! );
//! let grid = DataGrid::new();
//! grid.set_data_source(Some(DataSource::from_list(list))).unwrap();
//!
//! // Two data rows and the new-row slot.
//! assert_eq!(grid.row_count(), 3);
//! assert_eq!(grid.new_row_index(), Some(2));
//! assert_eq!(grid.cell_value(0, 1).unwrap(), Some(CellValue::Int(5)));
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use lattice_grid_core::Signal;
use lattice_grid_core::logging::targets;

use crate::binding::BindingContext;
use crate::error::{BindingError, GridError, Result};
use crate::model::{CellValue, DataSource, ListChangedKind, ListSortDirection};

use super::cell::FormattedValue;
use super::column::{Column, SortMode, SortOrder};
use super::config::GridConfig;
use super::connection::DataConnection;
use super::data_error::{DataErrorContext, DataErrorEvent};
use super::host::{CellAddress, GridHost};
use super::state::on_exit;

/// Handler for data errors. It may set `throw_error` or `cancel` on the
/// event.
pub type DataErrorHandler = Arc<dyn Fn(&mut DataErrorEvent) + Send + Sync>;

/// A repaint request recorded by the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invalidation {
    /// The whole grid.
    All,
    /// The rows between `first` and `last`, inclusive.
    Rows { first: usize, last: usize },
    /// The header cell of a row.
    RowHeader(usize),
    /// One cell.
    Cell(CellAddress),
    /// The editing control of the current cell.
    Edit(CellAddress),
}

/// Signals emitted by a [`DataGrid`].
#[derive(Default)]
pub struct GridSignals {
    /// Emitted after a list change has been mirrored into the rows.
    pub data_binding_complete: Signal<ListChangedKind>,
    /// Emitted when the current cell moves or is cleared.
    pub current_cell_changed: Signal<Option<CellAddress>>,
}

#[derive(Debug, Clone)]
struct Row {
    visible: bool,
    values: HashMap<usize, CellValue>,
}

impl Row {
    fn new() -> Self {
        Self {
            visible: true,
            values: HashMap::new(),
        }
    }
}

struct GridInner {
    config: GridConfig,
    binding_context: Option<Arc<BindingContext>>,
    visible: bool,
    columns: Vec<Column>,
    rows: Vec<Row>,
    new_row_index: Option<usize>,
    current: Option<CellAddress>,
    current_row_dirty: bool,
    editing: bool,
    selection: Vec<CellAddress>,
    sorted_column: Option<(usize, SortOrder)>,
    in_sort_operation: bool,
    update_depth: usize,
    invalidations: Vec<Invalidation>,
    data_error_handler: Option<DataErrorHandler>,
}

impl GridInner {
    fn new(config: GridConfig) -> Self {
        Self {
            config,
            binding_context: Some(BindingContext::new()),
            visible: true,
            columns: Vec::new(),
            rows: Vec::new(),
            new_row_index: None,
            current: None,
            current_row_dirty: false,
            editing: false,
            selection: Vec::new(),
            sorted_column: None,
            in_sort_operation: false,
            update_depth: 0,
            invalidations: Vec::new(),
            data_error_handler: None,
        }
    }

    /// Moves the current cell, returning `true` if it changed.
    fn move_current(&mut self, target: Option<CellAddress>, clear_selection: bool) -> bool {
        if self.current == target {
            return false;
        }
        if self.current.map(|cell| cell.row) != target.map(|cell| cell.row) {
            self.current_row_dirty = false;
        }
        self.editing = false;
        self.current = target;
        if clear_selection {
            self.selection.clear();
        }
        if let Some(cell) = target
            && !self.selection.contains(&cell)
        {
            self.selection.push(cell);
        }
        true
    }
}

/// A headless grid bound through a [`DataConnection`].
pub struct DataGrid {
    inner: Mutex<GridInner>,
    connection: Arc<DataConnection>,
    signals: GridSignals,
}

static_assertions::assert_impl_all!(DataGrid: Send, Sync);

impl DataGrid {
    /// Creates an unbound grid with the default configuration.
    pub fn new() -> Arc<Self> {
        Self::with_config(GridConfig::default())
    }

    /// Creates an unbound grid with `config`.
    pub fn with_config(config: GridConfig) -> Arc<Self> {
        Arc::new_cyclic(|this: &Weak<DataGrid>| {
            let owner: Weak<dyn GridHost> = this.clone();
            Self {
                inner: Mutex::new(GridInner::new(config)),
                connection: DataConnection::new(owner),
                signals: GridSignals::default(),
            }
        })
    }

    /// The grid's signals.
    pub fn signals(&self) -> &GridSignals {
        &self.signals
    }

    /// The connection to the bound list.
    pub fn connection(&self) -> &Arc<DataConnection> {
        &self.connection
    }

    /// The active configuration.
    pub fn config(&self) -> GridConfig {
        self.inner.lock().config.clone()
    }

    // Binding

    /// Binds to `source`.
    ///
    /// The data member is kept if it still names a list of the new source
    /// and cleared otherwise.
    pub fn set_data_source(&self, source: Option<DataSource>) -> Result<()> {
        let member = if self.connection.should_change_data_member(source.as_ref()) {
            String::new()
        } else {
            self.connection.data_member()
        };
        self.bind(source, &member)
    }

    /// Binds to `member` of the current data source.
    pub fn set_data_member(&self, member: &str) -> Result<()> {
        self.bind(self.connection.data_source(), member)
    }

    /// Binds to `member` of `source` in one step.
    pub fn set_data_binding(&self, source: Option<DataSource>, member: &str) -> Result<()> {
        self.bind(source, member)
    }

    /// Replaces the binding context and rebinds.
    pub fn set_binding_context(&self, context: Option<Arc<BindingContext>>) -> Result<()> {
        self.inner.lock().binding_context = context;
        self.bind(self.connection.data_source(), &self.connection.data_member())
    }

    fn bind(&self, source: Option<DataSource>, member: &str) -> Result<()> {
        tracing::debug!(target: targets::GRID, member, bound = source.is_some(), "binding grid");
        self.connection.set_data_connection(source, member)?;
        self.refresh_columns_and_rows();
        self.connection.apply_sorting_information_from_back_end();
        if self.row_count() > 0 {
            self.connection.match_adapter_position(false, true)?;
        }
        self.signals.data_binding_complete.emit(ListChangedKind::Reset);
        Ok(())
    }

    /// Sets the handler that decides what happens on data errors.
    pub fn set_data_error_handler<F>(&self, handler: F)
    where
        F: Fn(&mut DataErrorEvent) + Send + Sync + 'static,
    {
        self.inner.lock().data_error_handler = Some(Arc::new(handler));
    }

    // Columns

    /// Adds a user column, binding it if its data property exists.
    pub fn add_column(&self, mut column: Column) {
        if let Some(props) = self.connection.properties()
            && let Some(index) = props.index_of(column.data_property_name())
            && let Some(prop) = props.get(index)
        {
            column.bind(index, prop.value_type(), prop.converter().clone());
        }
        self.inner.lock().columns.push(column);
        self.push_allow_user_to_add_rows();
    }

    /// Snapshots of every column.
    pub fn columns(&self) -> Vec<Column> {
        self.inner.lock().columns.clone()
    }

    /// The column the grid reports as sorted.
    pub fn sorted_column(&self) -> Option<(usize, SortOrder)> {
        self.inner.lock().sorted_column
    }

    // Policies

    /// Shows or hides the new-row slot.
    pub fn set_allow_user_to_add_rows(&self, allow: bool) {
        self.inner.lock().config.allow_user_to_add_rows = allow;
        self.push_allow_user_to_add_rows();
        self.connection.reset_cached_allow_user_to_add_rows();
    }

    /// Allows or forbids user deletes.
    pub fn set_allow_user_to_delete_rows(&self, allow: bool) {
        self.inner.lock().config.allow_user_to_delete_rows = allow;
    }

    /// Makes the whole grid read-only.
    pub fn set_read_only(&self, read_only: bool) {
        self.inner.lock().config.read_only = read_only;
        self.push_allow_user_to_add_rows();
        self.connection.reset_cached_allow_user_to_add_rows();
    }

    /// Shows or hides the grid.
    pub fn set_visible(&self, visible: bool) {
        self.inner.lock().visible = visible;
    }

    // Navigation and editing

    /// Moves the current cell as the user would.
    ///
    /// Leaving a row validates it; a refused validation keeps the current
    /// cell where it is and returns `false`. Entering the new-row slot opens
    /// an add-new transaction.
    pub fn set_current_cell(&self, column: usize, row: usize) -> Result<bool> {
        let (previous, columns, rows) = {
            let inner = self.inner.lock();
            (inner.current, inner.columns.len(), inner.rows.len())
        };
        if column >= columns || row >= rows {
            return Ok(false);
        }
        let target = CellAddress::new(column, row);
        if previous == Some(target) {
            return Ok(true);
        }

        let row_changes = previous.is_none_or(|cell| cell.row != row);
        if row_changes && let Some(previous) = previous {
            if self.connection.on_row_validating(previous.column, previous.row)? {
                tracing::debug!(target: targets::GRID, row = previous.row, "row validation refused");
                return Ok(false);
            }
            self.inner.lock().current_row_dirty = false;
        }
        if row >= self.row_count() {
            return Ok(false);
        }

        self.move_current(Some(target), true);
        if row_changes {
            self.connection.on_row_enter(column, row)?;
            if self.new_row_index() == Some(row) && self.needs_new_row() {
                self.open_new_row(target)?;
            }
        }
        Ok(true)
    }

    /// Marks the current cell as being edited.
    pub fn begin_edit(&self) -> bool {
        let mut inner = self.inner.lock();
        let Some(current) = inner.current else {
            return false;
        };
        let editable = !inner.config.read_only
            && inner
                .columns
                .get(current.column)
                .is_some_and(|column| !column.is_read_only() && column.kind().is_editable());
        inner.editing = editable;
        editable
    }

    /// Writes a value into a cell as the user would.
    ///
    /// Moves the current cell there first. Typing into the new-row slot turns
    /// it into a data row and appends a fresh slot. Returns `false` if the
    /// cell cannot be edited or the value was refused.
    pub fn set_cell_value(&self, column: usize, row: usize, value: CellValue) -> Result<bool> {
        if self.current_cell() != Some(CellAddress::new(column, row))
            && !self.set_current_cell(column, row)?
        {
            return Ok(false);
        }
        let Some(target) = self.column(column) else {
            return Ok(false);
        };
        if self.inner.lock().config.read_only
            || target.is_read_only()
            || !target.kind().is_editable()
        {
            return Ok(false);
        }
        if let Some(bound_index) = target.bound_index()
            && self.connection.data_field_is_read_only(bound_index)
        {
            return Ok(false);
        }

        if self.new_row_index() == Some(row) {
            if self.needs_new_row() {
                self.open_new_row(CellAddress::new(column, row))?;
            }
            let mut inner = self.inner.lock();
            inner.current_row_dirty = true;
            inner.rows.push(Row::new());
            inner.new_row_index = Some(inner.rows.len() - 1);
            tracing::trace!(target: targets::GRID, row, "new row promoted");
        } else {
            self.inner.lock().current_row_dirty = true;
        }

        match target.bound_index() {
            Some(bound_index) => self.connection.push_value(bound_index, column, row, value),
            None => {
                let mut inner = self.inner.lock();
                if let Some(cells) = inner.rows.get_mut(row) {
                    cells.values.insert(column, value);
                }
                Ok(true)
            }
        }
    }

    /// Commits the current row. Returns `false` if the commit was refused.
    pub fn commit_row(&self) -> Result<bool> {
        let Some(current) = self.current_cell() else {
            return Ok(true);
        };
        let cancel = self.connection.on_row_validating(current.column, current.row)?;
        if !cancel {
            let mut inner = self.inner.lock();
            inner.current_row_dirty = false;
            inner.editing = false;
        }
        Ok(!cancel)
    }

    /// Discards the edits of the current row.
    pub fn cancel_edit(&self) -> Result<()> {
        if self.current_cell().is_none() {
            return Ok(());
        }
        let open = !self.connection.state().add_new.is_finished();
        self.connection.cancel_row_edit(open, open)?;
        {
            let mut inner = self.inner.lock();
            inner.current_row_dirty = false;
            inner.editing = false;
        }
        self.resync_current_cell()
    }

    /// Deletes a row as the user would. Returns `false` if deleting is not
    /// allowed.
    pub fn delete_row(&self, row: usize) -> Result<bool> {
        let (allow, read_only) = {
            let inner = self.inner.lock();
            (inner.config.allow_user_to_delete_rows, inner.config.read_only)
        };
        if !allow || read_only || !self.connection.allow_remove() || row >= self.row_count() {
            return Ok(false);
        }
        if self.new_row_index() == Some(row) && self.connection.state().add_new.is_finished() {
            return Ok(false);
        }
        self.connection.delete_row(row)?;
        self.resync_current_cell()?;
        Ok(true)
    }

    /// Sorts the bound list by a column.
    pub fn sort(&self, column: usize, direction: ListSortDirection) -> Result<()> {
        let Some(target) = self.column(column) else {
            return Err(BindingError::ColumnNotBound { column }.into());
        };
        if target.sort_mode() == SortMode::NotSortable {
            return Err(BindingError::SortNotSupported.into());
        }

        self.inner.lock().in_sort_operation = true;
        {
            let _sorting = on_exit(|| self.inner.lock().in_sort_operation = false);
            self.connection.sort(column, direction)?;
        }

        let order = SortOrder::from(direction);
        {
            let mut inner = self.inner.lock();
            for (index, column_state) in inner.columns.iter_mut().enumerate() {
                column_state.set_sort_glyph(if index == column {
                    order
                } else {
                    SortOrder::None
                });
            }
            inner.sorted_column = Some((column, order));
        }
        if self.row_count() > 0 {
            self.connection.match_adapter_position(true, true)?;
        }
        Ok(())
    }

    // Values

    /// The value of a cell.
    ///
    /// A read failure goes to the data-error handler; unless it rethrows,
    /// the cell has no value.
    pub fn cell_value(&self, column: usize, row: usize) -> Result<Option<CellValue>> {
        let Some(target) = self.column(column) else {
            return Ok(None);
        };
        if row >= self.row_count() {
            return Ok(None);
        }
        match target.bound_index() {
            Some(bound_index) if self.is_data_row(row) => {
                self.connection.get_value(bound_index, column, row)
            }
            Some(_) => Ok(None),
            None => Ok(self
                .inner
                .lock()
                .rows
                .get(row)
                .and_then(|cells| cells.values.get(&column).cloned())),
        }
    }

    /// What a cell shows.
    pub fn cell_formatted_value(&self, column: usize, row: usize) -> Result<FormattedValue> {
        let style = self.inner.lock().config.cell_style();
        let Some(target) = self.column(column) else {
            return Ok(FormattedValue::Text(style.null_value_text));
        };
        let value = self.cell_value(column, row)?.unwrap_or_default();
        match target
            .kind()
            .format_value(&value, &style, target.header_text())
        {
            Ok(formatted) => Ok(formatted),
            Err(err) => {
                let mut event =
                    DataErrorEvent::new(err, Some(column), Some(row), DataErrorContext::Formatting);
                self.on_data_error(&mut event);
                if event.throw_error {
                    return Err(GridError::Data(event.error));
                }
                Ok(FormattedValue::Text(style.null_value_text))
            }
        }
    }

    /// The error text of a cell.
    pub fn cell_error_text(&self, column: usize, row: usize) -> Result<String> {
        match self.column(column).and_then(|target| target.bound_index()) {
            Some(bound_index) if self.is_data_row(row) => {
                self.connection.get_error_for_cell(bound_index, column, row)
            }
            _ => Ok(String::new()),
        }
    }

    /// The error text of a row.
    pub fn row_error_text(&self, row: usize) -> Result<String> {
        if self.is_data_row(row) {
            self.connection.get_error(row)
        } else {
            Ok(String::new())
        }
    }

    // Inspection

    /// The selected cells.
    pub fn selection(&self) -> Vec<CellAddress> {
        self.inner.lock().selection.clone()
    }

    /// Whether painting is suspended.
    pub fn is_updating(&self) -> bool {
        self.inner.lock().update_depth > 0
    }

    /// The recorded repaint requests.
    pub fn invalidations(&self) -> Vec<Invalidation> {
        self.inner.lock().invalidations.clone()
    }

    /// Takes the recorded repaint requests.
    pub fn take_invalidations(&self) -> Vec<Invalidation> {
        std::mem::take(&mut self.inner.lock().invalidations)
    }

    // Internals

    fn is_data_row(&self, row: usize) -> bool {
        self.connection
            .list_adapter()
            .is_some_and(|adapter| row < adapter.count())
    }

    fn needs_new_row(&self) -> bool {
        self.connection.list_adapter().is_some() && self.connection.state().add_new.is_finished()
    }

    fn move_current(&self, target: Option<CellAddress>, clear_selection: bool) {
        let moved = self.inner.lock().move_current(target, clear_selection);
        if moved {
            self.signals.current_cell_changed.emit(target);
        }
    }

    /// Starts an add-new on the new-row slot at `target`.
    ///
    /// The list may refresh the rows while adding, which drops the current
    /// cell; it is put back on the slot so leaving the row still validates it.
    fn open_new_row(&self, target: CellAddress) -> Result<()> {
        self.connection.on_new_row_needed()?;
        if self.current_cell().is_none() && target.row < self.row_count() {
            self.move_current(Some(target), true);
        }
        Ok(())
    }

    fn resync_current_cell(&self) -> Result<()> {
        if self.current_cell().is_none() && self.row_count() > 0 {
            self.connection.match_adapter_position(false, true)?;
        }
        Ok(())
    }

    fn invalidated(&self, invalidation: Invalidation) {
        self.inner.lock().invalidations.push(invalidation);
    }
}

impl GridHost for DataGrid {
    fn binding_context(&self) -> Option<Arc<BindingContext>> {
        self.inner.lock().binding_context.clone()
    }

    fn is_visible(&self) -> bool {
        self.inner.lock().visible
    }

    fn allow_user_to_add_rows_internal(&self) -> bool {
        let (allow, read_only) = {
            let inner = self.inner.lock();
            (inner.config.allow_user_to_add_rows, inner.config.read_only)
        };
        allow && !read_only && self.connection.allow_add()
    }

    fn push_allow_user_to_add_rows(&self) {
        let allow = self.allow_user_to_add_rows_internal();
        let mut inner = self.inner.lock();
        let show = allow && !inner.columns.is_empty();
        match (show, inner.new_row_index) {
            (true, None) => {
                inner.rows.push(Row::new());
                inner.new_row_index = Some(inner.rows.len() - 1);
            }
            (false, Some(index)) => {
                inner.rows.remove(index);
                inner.new_row_index = None;
                if inner.current.is_some_and(|cell| cell.row == index) {
                    inner.move_current(None, true);
                }
            }
            _ => {}
        }
    }

    fn in_sort_operation(&self) -> bool {
        self.inner.lock().in_sort_operation
    }

    fn row_count(&self) -> usize {
        self.inner.lock().rows.len()
    }

    fn new_row_index(&self) -> Option<usize> {
        self.inner.lock().new_row_index
    }

    fn insert_row(&self, index: usize) {
        let mut inner = self.inner.lock();
        let index = index.min(inner.rows.len());
        inner.rows.insert(index, Row::new());
        if let Some(new_row) = inner.new_row_index.as_mut()
            && *new_row >= index
        {
            *new_row += 1;
        }
        if let Some(current) = inner.current.as_mut()
            && current.row >= index
        {
            current.row += 1;
        }
        for cell in inner.selection.iter_mut().filter(|cell| cell.row >= index) {
            cell.row += 1;
        }
        let last = inner.rows.len() - 1;
        inner.invalidations.push(Invalidation::Rows { first: index, last });
        tracing::trace!(target: targets::GRID, index, "row inserted");
    }

    fn remove_row(&self, index: usize) {
        let mut inner = self.inner.lock();
        if index >= inner.rows.len() {
            return;
        }
        inner.rows.remove(index);
        inner.new_row_index = match inner.new_row_index {
            Some(new_row) if new_row == index => None,
            Some(new_row) if new_row > index => Some(new_row - 1),
            other => other,
        };
        let current = inner.current;
        match current {
            Some(current) if current.row == index => {
                inner.move_current(None, true);
            }
            Some(current) if current.row > index => {
                inner.current = Some(CellAddress::new(current.column, current.row - 1));
            }
            _ => {}
        }
        inner.selection.retain(|cell| cell.row != index);
        for cell in inner.selection.iter_mut().filter(|cell| cell.row > index) {
            cell.row -= 1;
        }
        let last = inner.rows.len().max(index + 1) - 1;
        inner.invalidations.push(Invalidation::Rows { first: index, last });
        tracing::trace!(target: targets::GRID, index, "row removed");
    }

    fn append_new_row(&self) {
        let mut inner = self.inner.lock();
        inner.rows.push(Row::new());
        inner.new_row_index = Some(inner.rows.len() - 1);
        tracing::trace!(target: targets::GRID, rows = inner.rows.len(), "new row appended");
    }

    fn refresh_rows(&self, scroll_into_view: bool) {
        let count = self
            .connection
            .list_adapter()
            .map(|adapter| adapter.count())
            .unwrap_or(0);
        let allow = self.allow_user_to_add_rows_internal();
        let cleared = {
            let mut inner = self.inner.lock();
            inner.rows = (0..count).map(|_| Row::new()).collect();
            inner.new_row_index = None;
            if allow && !inner.columns.is_empty() {
                inner.rows.push(Row::new());
                inner.new_row_index = Some(count);
            }
            let cleared = inner.move_current(None, true);
            inner.invalidations.push(Invalidation::All);
            cleared
        };
        if cleared {
            self.signals.current_cell_changed.emit(None);
        }
        tracing::trace!(target: targets::GRID, count, scroll_into_view, "rows refreshed");
    }

    fn refresh_columns_and_rows(&self) {
        let generated = self.connection.bound_columns();
        let props = self.connection.properties();
        {
            let mut inner = self.inner.lock();
            inner.columns.retain(|column| !column.is_auto_generated());
            for column in inner.columns.iter_mut() {
                let bound = props.as_ref().and_then(|props| {
                    let index = props.index_of(column.data_property_name())?;
                    props.get(index).map(|prop| (index, prop))
                });
                match bound {
                    Some((index, prop)) => {
                        column.bind(index, prop.value_type(), prop.converter().clone())
                    }
                    None => column.unbind(),
                }
            }
            if inner.config.auto_generate_columns {
                for column in generated {
                    let shown = inner
                        .columns
                        .iter()
                        .any(|existing| existing.shows_property(column.data_property_name()));
                    if !shown {
                        inner.columns.push(column);
                    }
                }
            }
            let columns = inner.columns.len();
            if inner.current.is_some_and(|cell| cell.column >= columns) {
                inner.move_current(None, true);
            }
            tracing::debug!(target: targets::GRID, columns, "columns refreshed");
        }
        self.refresh_rows(true);
    }

    fn populate_new_row_with_default_values(&self) {
        let mut inner = self.inner.lock();
        if let Some(index) = inner.new_row_index {
            if let Some(row) = inner.rows.get_mut(index) {
                row.values.clear();
            }
            inner.invalidations.push(Invalidation::Rows {
                first: index,
                last: index,
            });
        }
    }

    fn is_row_visible(&self, row: usize) -> bool {
        self.inner
            .lock()
            .rows
            .get(row)
            .is_some_and(|cells| cells.visible)
    }

    fn show_row(&self, row: usize) {
        if let Some(cells) = self.inner.lock().rows.get_mut(row) {
            cells.visible = true;
        }
    }

    fn column_count(&self) -> usize {
        self.inner.lock().columns.len()
    }

    fn column(&self, index: usize) -> Option<Column> {
        self.inner.lock().columns.get(index).cloned()
    }

    fn first_displayed_column_index(&self) -> Option<usize> {
        self.inner
            .lock()
            .columns
            .iter()
            .position(|column| column.is_visible())
    }

    fn show_first_column(&self) -> Option<usize> {
        let mut inner = self.inner.lock();
        let first = inner.columns.first_mut()?;
        first.set_visible(true);
        Some(0)
    }

    fn set_sort_glyph(&self, column: usize, order: SortOrder) {
        if let Some(target) = self.inner.lock().columns.get_mut(column) {
            target.set_sort_glyph(order);
        }
    }

    fn set_sorted_column(&self, sorted: Option<(usize, SortOrder)>) {
        self.inner.lock().sorted_column = sorted;
    }

    fn current_cell(&self) -> Option<CellAddress> {
        self.inner.lock().current
    }

    fn is_current_row_dirty(&self) -> bool {
        self.inner.lock().current_row_dirty
    }

    fn is_current_cell_in_edit_mode(&self) -> bool {
        self.inner.lock().editing
    }

    fn refresh_edit(&self) {
        let mut inner = self.inner.lock();
        if let Some(current) = inner.current {
            inner.invalidations.push(Invalidation::Edit(current));
        }
    }

    fn clear_current_cell(&self) -> bool {
        self.move_current(None, true);
        true
    }

    fn scroll_into_view(&self, column: usize, row: usize) -> bool {
        let inner = self.inner.lock();
        column < inner.columns.len() && row < inner.rows.len()
    }

    fn set_and_select_current_cell(&self, column: usize, row: usize, clear_selection: bool) -> bool {
        let previous = {
            let inner = self.inner.lock();
            if column >= inner.columns.len() || row >= inner.rows.len() {
                return false;
            }
            inner.current
        };
        self.move_current(Some(CellAddress::new(column, row)), clear_selection);
        if previous.map(|cell| cell.row) != Some(row)
            && let Err(err) = self.connection.on_row_enter(column, row)
        {
            self.connection.defer_error(err);
        }
        true
    }

    fn begin_update(&self) {
        self.inner.lock().update_depth += 1;
    }

    fn end_update(&self) {
        let mut inner = self.inner.lock();
        inner.update_depth = inner.update_depth.saturating_sub(1);
    }

    fn invalidate(&self) {
        self.invalidated(Invalidation::All);
    }

    fn invalidate_rows(&self, first: usize, last: usize) {
        self.invalidated(Invalidation::Rows { first, last });
    }

    fn invalidate_row_header(&self, row: usize) {
        self.invalidated(Invalidation::RowHeader(row));
    }

    fn on_cell_common_change(&self, column: usize, row: usize) {
        self.invalidated(Invalidation::Cell(CellAddress::new(column, row)));
    }

    fn on_data_error(&self, event: &mut DataErrorEvent) {
        let handler = self.inner.lock().data_error_handler.clone();
        match handler {
            Some(handler) => handler(event),
            None => tracing::warn!(
                target: targets::GRID,
                context = %event.context,
                row = ?event.row,
                column = ?event.column,
                error = %event.error,
                "unhandled data error"
            ),
        }
    }

    fn on_data_binding_complete(&self, kind: ListChangedKind) {
        self.signals.data_binding_complete.emit(kind);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Field, ValueType, VecBindingList};

    #[derive(Clone, Debug, Default, PartialEq)]
    struct Item {
        name: String,
        qty: i64,
    }

    fn items(count: usize) -> Arc<VecBindingList<Item>> {
        let items = (0..count)
            .map(|i| Item {
                name: format!("item{i}"),
                qty: i as i64,
            })
            .collect();
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

    #[test]
    fn test_unbound_grid_has_no_rows() {
        let grid = DataGrid::new();
        assert_eq!(grid.row_count(), 0);
        assert_eq!(grid.new_row_index(), None);
        assert_eq!(grid.current_cell(), None);
    }

    #[test]
    fn test_binding_generates_columns_and_rows() {
        let grid = DataGrid::new();
        grid.set_data_source(Some(DataSource::from_list(items(2))))
            .unwrap();

        let columns = grid.columns();
        assert_eq!(columns.len(), 2);
        assert!(columns.iter().all(|column| column.is_auto_generated()));
        assert_eq!(columns[1].value_type(), Some(ValueType::Int));
        assert_eq!(grid.row_count(), 3);
        assert_eq!(grid.new_row_index(), Some(2));
        assert_eq!(grid.current_cell(), Some(CellAddress::new(0, 0)));
    }

    #[test]
    fn test_user_column_is_bound_by_name() {
        let grid = DataGrid::new();
        grid.add_column(Column::bound_to("quantity", "qty").with_header_text("Quantity"));
        grid.set_data_source(Some(DataSource::from_list(items(1))))
            .unwrap();

        let columns = grid.columns();
        assert_eq!(columns.len(), 2);
        assert_eq!(columns[0].bound_index(), Some(1));
        assert!(!columns[0].is_auto_generated());
        assert_eq!(columns[1].data_property_name(), "Name");
    }

    #[test]
    fn test_no_slot_without_allow_user_to_add_rows() {
        let config = GridConfig {
            allow_user_to_add_rows: false,
            ..Default::default()
        };
        let grid = DataGrid::with_config(config);
        grid.set_data_source(Some(DataSource::from_list(items(2))))
            .unwrap();
        assert_eq!(grid.row_count(), 2);
        assert_eq!(grid.new_row_index(), None);

        grid.set_allow_user_to_add_rows(true);
        assert_eq!(grid.row_count(), 3);
        assert_eq!(grid.new_row_index(), Some(2));
    }

    #[test]
    fn test_unbound_column_values_are_kept_per_row() {
        let grid = DataGrid::new();
        grid.add_column(Column::new("note"));
        grid.set_data_source(Some(DataSource::from_list(items(2))))
            .unwrap();

        assert!(grid.set_cell_value(0, 1, "hello".into()).unwrap());
        assert_eq!(grid.cell_value(0, 1).unwrap(), Some(CellValue::from("hello")));
        assert_eq!(grid.cell_value(0, 0).unwrap(), None);
    }

    #[test]
    fn test_read_only_grid_refuses_edits() {
        let grid = DataGrid::new();
        grid.set_data_source(Some(DataSource::from_list(items(1))))
            .unwrap();
        grid.set_read_only(true);
        assert_eq!(grid.new_row_index(), None);
        assert!(!grid.set_cell_value(0, 0, "x".into()).unwrap());
        assert!(!grid.delete_row(0).unwrap());
    }

    #[test]
    fn test_list_changes_are_logged_as_invalidations() {
        let list = items(3);
        let grid = DataGrid::new();
        grid.set_data_source(Some(DataSource::from_list(list.clone())))
            .unwrap();
        grid.take_invalidations();

        list.move_item(0, 2).unwrap();
        assert!(grid
            .invalidations()
            .contains(&Invalidation::Rows { first: 0, last: 2 }));

        list.reset_item(1);
        let logged = grid.take_invalidations();
        assert!(logged.contains(&Invalidation::Cell(CellAddress::new(0, 1))));
        assert!(logged.contains(&Invalidation::RowHeader(1)));
    }

    #[test]
    fn test_refresh_edit_when_current_item_changes() {
        let list = items(2);
        let grid = DataGrid::new();
        grid.set_data_source(Some(DataSource::from_list(list.clone())))
            .unwrap();
        assert!(grid.begin_edit());
        grid.take_invalidations();

        list.reset_item(0);
        assert!(grid
            .invalidations()
            .contains(&Invalidation::Edit(CellAddress::new(0, 0))));
    }
}
