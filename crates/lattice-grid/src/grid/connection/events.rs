//! Adapter event handling.

use lattice_grid_core::logging::{span_names, targets};

use crate::error::{GridError, Result};
use crate::model::{ListChangedEvent, ListChangedKind};

use super::super::host::{CellAddress, GridHost};
use super::super::state::{AddNewPhase, on_exit};
use super::{DataConnection, bound_rows_count};

impl DataConnection {
    pub(super) fn on_list_changed(&self, event: &ListChangedEvent) {
        {
            let _dispatching = self.scoped(
                |s| s.processing_list_changed = true,
                |s| s.processing_list_changed = false,
            );
            if let Err(err) = self.process_list_changed(event) {
                tracing::error!(
                    target: targets::CONNECTION,
                    kind = ?event.kind,
                    error = %err,
                    "list change could not be mirrored"
                );
                self.defer_error(err);
            }
        }

        if let Ok(owner) = self.owner() {
            owner.on_data_binding_complete(event.kind);
        }
        let count = self.list_adapter().map(|adapter| adapter.count());
        self.binding.lock().last_list_count = count;
    }

    pub(super) fn on_position_changed(&self) {
        if let Err(err) = self.process_position_changed() {
            self.defer_error(err);
        }
    }

    /// Mirrors one list change into the grid's rows.
    ///
    /// The event is classified against the transaction in flight: schema
    /// changes rebuild the columns, events caused by the grid's own add-new
    /// or delete are absorbed, and everything else is applied row by row.
    #[tracing::instrument(
        skip(self, event),
        target = "lattice_grid::connection",
        level = "trace",
        name = "lattice_grid::list_changed",
        fields(kind = ?event.kind, index = ?event.new_index)
    )]
    pub fn process_list_changed(&self, event: &ListChangedEvent) -> Result<()> {
        let owner = self.owner()?;
        let Some(adapter) = self.list_adapter() else {
            return Ok(());
        };

        if event.kind.is_metadata() {
            let _metadata = self.scoped(
                |s| s.processing_metadata = true,
                |s| s.processing_metadata = false,
            );
            let props = std::sync::Arc::new(adapter.item_properties());
            self.binding.lock().props = Some(props);
            owner.refresh_columns_and_rows();
            return Ok(());
        }

        let state = self.state();
        if state.cached_allow_user_to_add_rows != owner.allow_user_to_add_rows_internal() {
            tracing::debug!(target: targets::CONNECTION, "add-rows policy changed; refreshing rows");
            self.update(|s| s.list_was_reset = true);
            let _reset = on_exit(|| self.reset_state(&*owner));
            owner.refresh_rows(!owner.in_sort_operation());
            owner.push_allow_user_to_add_rows();
            return Ok(());
        }

        let new_row = owner.new_row_index();
        if !state.add_new.is_finished() && new_row.is_some() && new_row == event.new_index {
            match event.kind {
                ListChangedKind::ItemAdded => {
                    if state.add_new == AddNewPhase::InAdapterAddNew || state.validating_row {
                        tracing::trace!(target: targets::CONNECTION, "own add-new absorbed");
                        return Ok(());
                    }
                    tracing::debug!(
                        target: targets::CONNECTION,
                        "pending new row committed outside the grid"
                    );
                    if owner.column_count() > 0 {
                        // The slot always becomes a data row, even when the
                        // current cell already counted it as one.
                        loop {
                            let rows = owner.row_count();
                            owner.append_new_row();
                            if owner.row_count() == rows
                                || bound_rows_count(&*owner) >= adapter.count()
                            {
                                break;
                            }
                        }
                    }
                    self.update(|s| s.add_new = AddNewPhase::Finished);
                    self.match_adapter_position(true, true)?;
                }
                ListChangedKind::ItemDeleted => {
                    if state.row_cancel.is_some() {
                        owner.populate_new_row_with_default_values();
                    } else if matches!(
                        state.add_new,
                        AddNewPhase::EndingCurrentEdit | AddNewPhase::InAdapterAddNew
                    ) {
                        self.refresh_after_reset(&*owner);
                    } else if state.delete.is_removing() && adapter.count() == 0 {
                        self.add_new()?;
                    }
                }
                _ => {}
            }
            return Ok(());
        }

        let rows = owner.row_count();
        let shown = if owner.allow_user_to_add_rows_internal() {
            rows.saturating_sub(1)
        } else {
            rows
        };
        if event.kind == ListChangedKind::ItemAdded && adapter.count() == shown {
            if self.update(|s| s.absorb_cascade_add()) {
                tracing::debug!(target: targets::CONNECTION, "item added while deleting");
            }
            return Ok(());
        }

        if event.kind == ListChangedKind::ItemDeleted {
            if self.update(|s| s.absorb_cascade_delete()) {
                tracing::debug!(target: targets::CONNECTION, "cascade item removed");
                return Ok(());
            }
            if state.add_new == AddNewPhase::EndingCurrentEdit {
                self.refresh_after_reset(&*owner);
                return Ok(());
            }
            if adapter.count() == bound_rows_count(&*owner) {
                return Ok(());
            }
        }

        {
            let _hold = self.scoped(
                |s| s.position.hold_adapter = true,
                |s| s.position.hold_adapter = false,
            );
            match event.kind {
                ListChangedKind::Reset => {
                    self.update(|s| s.list_was_reset = true);
                    let visible = owner.is_visible();
                    if visible {
                        owner.begin_update();
                    }
                    let _done = on_exit(|| {
                        self.reset_state(&*owner);
                        if visible {
                            owner.end_update();
                            owner.invalidate();
                        }
                    });
                    owner.refresh_rows(!owner.in_sort_operation());
                    owner.push_allow_user_to_add_rows();
                    self.apply_sorting_information_from_back_end();
                }
                ListChangedKind::ItemAdded => match event.new_index {
                    Some(index) if new_row.is_none() || index != owner.row_count() => {
                        owner.insert_row(index);
                    }
                    _ => {
                        tracing::error!(
                            target: targets::CONNECTION,
                            index = ?event.new_index,
                            "item added at the new-row slot"
                        );
                        return Err(GridError::TransactionOrdering(
                            "an item was added at the new-row slot",
                        ));
                    }
                },
                ListChangedKind::ItemDeleted => {
                    if let Some(index) = event.new_index {
                        owner.remove_row(index);
                        self.update(|s| s.mark_grid_row_removed());
                    }
                }
                ListChangedKind::ItemMoved => {
                    if let (Some(to), Some(from)) = (event.new_index, event.old_index) {
                        owner.invalidate_rows(from.min(to), from.max(to));
                    }
                }
                ListChangedKind::ItemChanged => {
                    if let Some(row) = event.new_index {
                        self.refresh_item(&*owner, row, event.property.as_deref());
                    }
                }
                _ => {}
            }
        }

        let state = self.state();
        if owner.row_count() > 0 && !state.position.hold_grid && !owner.in_sort_operation() {
            self.match_adapter_position(false, event.kind == ListChangedKind::Reset)?;
        }
        Ok(())
    }

    fn refresh_item(&self, owner: &dyn GridHost, row: usize, property: Option<&str>) {
        let property = property.filter(|name| !name.is_empty());
        for index in 0..owner.column_count() {
            let Some(column) = owner.column(index) else {
                continue;
            };
            if !column.is_visible() || !column.is_data_bound() {
                continue;
            }
            if property.is_none_or(|name| column.shows_property(name)) {
                owner.on_cell_common_change(index, row);
            }
        }
        owner.invalidate_row_header(row);
        if owner.current_cell().is_some_and(|cell| cell.row == row)
            && owner.is_current_cell_in_edit_mode()
        {
            owner.refresh_edit();
        }
    }

    /// Rebuilds the rows while an add-new transaction stays open; only the
    /// reset marker is cleared afterwards.
    fn refresh_after_reset(&self, owner: &dyn GridHost) {
        let _reset = self.scoped(|s| s.list_was_reset = true, |s| s.list_was_reset = false);
        owner.refresh_rows(!owner.in_sort_operation());
        owner.push_allow_user_to_add_rows();
    }

    /// Follows an adapter position change with the grid's current cell.
    pub fn process_position_changed(&self) -> Result<()> {
        let _span = tracing::trace_span!(target: targets::CONNECTION, span_names::POSITION_CHANGED)
            .entered();
        let owner = self.owner()?;
        let Some(adapter) = self.list_adapter() else {
            return Ok(());
        };
        if owner.column_count() == 0 {
            return Ok(());
        }
        let allow = owner.allow_user_to_add_rows_internal();
        if owner.row_count() == usize::from(allow) {
            return Ok(());
        }
        let state = self.state();
        if state.position.hold_grid {
            return Ok(());
        }

        let position = adapter.position();
        let new_row = owner.new_row_index();
        if allow
            && state.add_new.is_finished()
            && position.is_some()
            && position == new_row
            && owner.current_cell().map(|cell| cell.row) != new_row
            && adapter.count() == bound_rows_count(&*owner) + 1
        {
            tracing::trace!(target: targets::CONNECTION, "new row not mirrored yet");
            return Ok(());
        }

        let _changing = self.scoped(
            |s| s.position_changing_in_adapter = true,
            |s| s.position_changing_in_adapter = false,
        );
        if owner.in_sort_operation() {
            return Ok(());
        }
        let list = adapter.list();
        let scroll = !(state.validating_row && list.supports_sorting() && list.is_sorted());
        let last_count = self.binding.lock().last_list_count;
        let clear_selection = (state.row_cancel.is_some() && !state.add_new.is_finished())
            || last_count.is_none_or(|last| last == adapter.count());
        self.match_adapter_position(scroll, clear_selection)
    }

    /// Moves the grid's current cell to the adapter's position.
    ///
    /// The column is kept; without a current cell the first displayed column
    /// is used. Fails with [`GridError::CellChangeRejected`] if the grid
    /// refuses to move.
    pub fn match_adapter_position(&self, scroll_into_view: bool, clear_selection: bool) -> Result<()> {
        let owner = self.owner()?;
        if owner.column_count() == 0 {
            return Ok(());
        }
        let Some(adapter) = self.list_adapter() else {
            return Ok(());
        };

        let current = owner.current_cell();
        let column = match current
            .map(|cell| cell.column)
            .or_else(|| owner.first_displayed_column_index())
            .or_else(|| owner.show_first_column())
        {
            Some(column) => column,
            None => return Ok(()),
        };

        match adapter.position() {
            None => {
                if current.is_some() && !owner.clear_current_cell() {
                    return Err(GridError::CellChangeRejected);
                }
            }
            Some(row) if row < owner.row_count() => {
                if !owner.is_row_visible(row) {
                    owner.show_row(row);
                }
                if current == Some(CellAddress::new(column, row)) {
                    return Ok(());
                }
                if scroll_into_view && !owner.scroll_into_view(column, row) {
                    return Err(GridError::CellChangeRejected);
                }
                if !owner.set_and_select_current_cell(column, row, clear_selection) {
                    return Err(GridError::CellChangeRejected);
                }
            }
            Some(_) => {}
        }
        Ok(())
    }
}
