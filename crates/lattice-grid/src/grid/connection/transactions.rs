//! Row transactions: add-new, delete, cancel and the row-level hooks the
//! grid calls while the user moves between rows.

use lattice_grid_core::logging::targets;

use crate::error::{GridError, ListError, Result};

use super::super::data_error::{DataErrorContext, DataErrorEvent};
use super::super::state::{AddNewPhase, DeletePhase, RowCancel, on_exit};
use super::DataConnection;

impl DataConnection {
    /// Opens an add-new transaction.
    ///
    /// The pending edit is committed first, then the adapter adds an item and
    /// moves to it. The transaction stays open until the row is validated,
    /// cancelled or deleted.
    pub fn add_new(&self) -> Result<()> {
        let Some(adapter) = self.list_adapter() else {
            return Ok(());
        };
        if !adapter.should_bind() {
            return Ok(());
        }
        tracing::debug!(target: targets::CONNECTION, "add-new started");

        {
            self.update(|s| s.add_new = AddNewPhase::EndingCurrentEdit);
            let _ending = on_exit(|| {
                self.update(|s| {
                    if s.add_new == AddNewPhase::EndingCurrentEdit {
                        s.add_new = AddNewPhase::Open;
                    }
                })
            });
            adapter.end_current_edit()?;
        }

        {
            self.update(|s| s.add_new = AddNewPhase::InAdapterAddNew);
            let _adding = on_exit(|| {
                self.update(|s| {
                    if s.add_new == AddNewPhase::InAdapterAddNew {
                        s.add_new = AddNewPhase::Open;
                    }
                })
            });
            adapter.add_new()?;
        }
        self.settle()
    }

    /// Deletes the item behind grid row `row`.
    ///
    /// Deleting the row of an open add-new transaction cancels the
    /// transaction instead.
    pub fn delete_row(&self, row: usize) -> Result<()> {
        let adapter = self.bound_adapter()?;
        let owner = self.owner()?;
        let _hold = self.scoped(
            |s| s.position.hold_grid = true,
            |s| s.position.hold_grid = false,
        );

        let deletes_new_row = if self.state().add_new.is_finished() {
            false
        } else {
            let new_row = owner.new_row_index();
            if new_row == Some(adapter.count()) {
                new_row.and_then(|index| index.checked_sub(1)) == Some(row)
            } else {
                new_row == Some(row)
            }
        };

        if deletes_new_row {
            tracing::debug!(target: targets::CONNECTION, row, "deleting the pending new row");
            self.cancel_row_edit(false, true)?;
        } else {
            tracing::debug!(target: targets::CONNECTION, row, "deleting row");
            let _deleting = self.scoped(
                |s| s.delete = DeletePhase::started(),
                |s| s.delete = DeletePhase::Idle,
            );
            adapter.remove_at(row)?;
        }
        self.settle()
    }

    /// Rolls back the edit on the current item.
    ///
    /// `restore_row` asks the grid to give the new row its default values
    /// back; `add_new_finished` closes an open add-new transaction.
    pub fn cancel_row_edit(&self, restore_row: bool, add_new_finished: bool) -> Result<()> {
        let Some(adapter) = self.list_adapter() else {
            return Ok(());
        };
        {
            let _cancelling = self.scoped(
                |s| s.row_cancel = Some(RowCancel { restore_row }),
                |s| s.row_cancel = None,
            );
            let before = (adapter.current_row(), adapter.count());
            adapter.cancel_current_edit();
            if let Some(row) = adapter.current_row()
                && before == (Some(row), adapter.count())
            {
                adapter.list().begin_edit(row);
            }
        }
        if add_new_finished {
            self.update(|s| s.add_new = AddNewPhase::Finished);
        }
        self.settle()
    }

    /// The user entered the new-row slot.
    pub fn on_new_row_needed(&self) -> Result<()> {
        let _hold = self.scoped(
            |s| s.position.hold_grid = true,
            |s| s.position.hold_grid = false,
        );
        self.add_new()
    }

    /// The user entered row `row`; moves the adapter along.
    pub fn on_row_enter(&self, column: usize, row: usize) -> Result<()> {
        let Some(adapter) = self.list_adapter() else {
            return Ok(());
        };
        let state = self.state();
        if state.processing_metadata || !adapter.should_bind() {
            return Ok(());
        }
        let owner = self.owner()?;
        let _hold = self.scoped(
            |s| s.position.hold_grid = true,
            |s| s.position.hold_grid = false,
        );

        if owner.new_row_index() != Some(row)
            && !state.position.hold_adapter
            && adapter.position() != Some(row)
        {
            if let Err(err) = adapter.set_position(row) {
                self.process_exception(err, Some(column), row, false)?;
            }
            if let Some(current) = adapter.current_row() {
                adapter.list().begin_edit(current);
            }
        }
        self.settle()
    }

    /// The user is leaving row `row`. Returns `true` to keep them there.
    ///
    /// A dirty row is committed; an untouched pending new row is discarded.
    pub fn on_row_validating(&self, column: usize, row: usize) -> Result<bool> {
        let Some(adapter) = self.list_adapter() else {
            return Ok(false);
        };
        if !adapter.should_bind() {
            return Ok(false);
        }
        let owner = self.owner()?;
        let state = self.state();
        let dirty = owner.is_current_row_dirty();

        let mut cancel = false;
        if !state.add_new.is_finished() && !dirty {
            if state.row_cancel.is_none() {
                let _hold = self.scoped(
                    |s| s.position.hold_grid = true,
                    |s| s.position.hold_grid = false,
                );
                self.cancel_row_edit(false, false)?;
            }
        } else if dirty {
            let _validating = self.scoped(|s| s.validating_row = true, |s| s.validating_row = false);
            if let Err(err) = adapter.end_current_edit() {
                cancel = self.process_exception(err, Some(column), row, true)?;
            }
        }

        if !cancel {
            self.update(|s| s.add_new = AddNewPhase::Finished);
        }
        self.settle()?;
        Ok(cancel)
    }

    /// Raises a commit-time data error. Returns `true` if the handler
    /// cancelled; otherwise the row edit has been rolled back.
    pub(super) fn process_exception(
        &self,
        error: ListError,
        column: Option<usize>,
        row: usize,
        begin_edit: bool,
    ) -> Result<bool> {
        let owner = self.owner()?;
        let mut event = DataErrorEvent::new(error, column, Some(row), DataErrorContext::Commit);
        owner.on_data_error(&mut event);

        if event.throw_error {
            return Err(GridError::Data(event.error));
        }
        if event.cancel {
            if begin_edit
                && let Some(adapter) = self.list_adapter()
                && let Some(current) = adapter.current_row()
            {
                adapter.list().begin_edit(current);
            }
            return Ok(true);
        }
        tracing::debug!(target: targets::CONNECTION, row, "commit failed; edit rolled back");
        self.cancel_row_edit(false, false)?;
        Ok(false)
    }
}
