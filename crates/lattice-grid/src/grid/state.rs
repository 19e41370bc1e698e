//! Transient state of a data connection.
//!
//! The connection tracks which operation is in flight while adapter events
//! arrive re-entrantly. The state is split into orthogonal parts so that
//! contradictory combinations cannot be expressed:
//!
//! | marker                         | representation                                   |
//! |--------------------------------|--------------------------------------------------|
//! | finished add-new               | `add_new == AddNewPhase::Finished`               |
//! | in end-current-edit (add-new)  | `add_new == AddNewPhase::EndingCurrentEdit`      |
//! | in adapter add-new             | `add_new == AddNewPhase::InAdapterAddNew`        |
//! | in delete operation            | `delete == DeletePhase::Removing { .. }`         |
//! | no grid row removed yet        | `Removing { grid_row_removed: false, .. }`       |
//! | item added during delete       | `Removing { cascade_added: true, .. }`           |
//! | cancelling row edit            | `row_cancel.is_some()`                           |
//! | restore row                    | `row_cancel == Some(RowCancel { restore_row })`  |
//! | grid drives the position       | `position.hold_grid`                             |
//! | adapter already moved          | `position.hold_adapter`                          |
//! | row validating                 | `validating_row`                                 |
//!
//! The remaining markers are plain flags. The rebinding guard survives
//! [`ConnectionState::reset`]; everything else returns to the baseline.

/// Phase of the add-new transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddNewPhase {
    /// No add-new transaction is open.
    #[default]
    Finished,
    /// A new row exists in the list but has not been committed or discarded.
    Open,
    /// Committing the previous row before asking the adapter for a new one.
    EndingCurrentEdit,
    /// Inside the adapter's own `add_new` call.
    InAdapterAddNew,
}

impl AddNewPhase {
    /// Returns `true` when no add-new transaction is open.
    pub fn is_finished(self) -> bool {
        self == AddNewPhase::Finished
    }
}

/// Phase of a delete operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeletePhase {
    /// No delete in flight.
    #[default]
    Idle,
    /// Removing an item through the adapter.
    Removing {
        /// The matching item-deleted event has removed a grid row.
        grid_row_removed: bool,
        /// The list re-added an item while deleting (master/detail cascade).
        cascade_added: bool,
    },
}

impl DeletePhase {
    /// Returns `true` while a delete is in flight.
    pub fn is_removing(self) -> bool {
        matches!(self, DeletePhase::Removing { .. })
    }

    /// A fresh delete with no grid row removed yet.
    pub fn started() -> Self {
        DeletePhase::Removing {
            grid_row_removed: false,
            cascade_added: false,
        }
    }

    /// Returns `true` while deleting and no grid row has been removed yet.
    pub fn awaiting_grid_removal(self) -> bool {
        matches!(
            self,
            DeletePhase::Removing {
                grid_row_removed: false,
                ..
            }
        )
    }
}

/// A row edit being rolled back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowCancel {
    /// The new row should get its default values back.
    pub restore_row: bool,
}

/// Who is currently driving a position change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PositionSync {
    /// The grid moved its own current cell; do not move it again from
    /// adapter events.
    pub hold_grid: bool,
    /// The adapter already moved; do not push the grid's row back to it.
    pub hold_adapter: bool,
}

/// The transient state of a data connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConnectionState {
    /// Add-new transaction phase.
    pub add_new: AddNewPhase,
    /// Delete operation phase.
    pub delete: DeletePhase,
    /// Set while a row edit is being cancelled.
    pub row_cancel: Option<RowCancel>,
    /// Position-sync suppression.
    pub position: PositionSync,
    /// Committing the current row during row validation.
    pub validating_row: bool,
    /// A reset-triggered row refresh is in flight.
    pub list_was_reset: bool,
    /// Reacting to an adapter position change.
    pub position_changing_in_adapter: bool,
    /// Rebuilding columns after a schema change.
    pub processing_metadata: bool,
    /// Dispatching an adapter list-changed event.
    pub processing_list_changed: bool,
    /// The connection is subscribed to adapter events.
    pub interested_in_row_events: bool,
    /// The grid's add-rows policy as last seen.
    pub cached_allow_user_to_add_rows: bool,
    /// Inside `set_data_connection`.
    pub rebinding: bool,
}

impl ConnectionState {
    /// Returns to the baseline, keeping the rebinding guard.
    pub fn reset(&mut self, interested: bool, allow_user_to_add_rows: bool) {
        *self = ConnectionState {
            rebinding: self.rebinding,
            interested_in_row_events: interested,
            cached_allow_user_to_add_rows: allow_user_to_add_rows,
            ..ConnectionState::default()
        };
    }

    /// Marks that the matching item-deleted event removed a grid row.
    pub fn mark_grid_row_removed(&mut self) {
        if let DeletePhase::Removing {
            grid_row_removed, ..
        } = &mut self.delete
        {
            *grid_row_removed = true;
        }
    }

    /// Records a cascade add while no grid row has been removed yet.
    /// Returns `true` if the add was absorbed.
    pub fn absorb_cascade_add(&mut self) -> bool {
        match &mut self.delete {
            DeletePhase::Removing {
                grid_row_removed: false,
                cascade_added,
            } => {
                *cascade_added = true;
                true
            }
            _ => false,
        }
    }

    /// Consumes a recorded cascade add. Returns `true` if one was recorded
    /// and no grid row has been removed yet.
    pub fn absorb_cascade_delete(&mut self) -> bool {
        match &mut self.delete {
            DeletePhase::Removing {
                grid_row_removed: false,
                cascade_added,
            } if *cascade_added => {
                *cascade_added = false;
                true
            }
            _ => false,
        }
    }

    /// The position-changing-outside-the-grid query.
    pub fn position_changing_outside_grid(&self) -> bool {
        !self.position.hold_grid && self.position_changing_in_adapter
    }
}

/// Runs a closure when dropped.
///
/// Used to leave a state scope on every exit path, including early returns
/// and `?`.
#[must_use = "the closure runs when the guard is dropped"]
pub struct OnExit<F: FnOnce()> {
    exit: Option<F>,
}

/// Returns a guard that runs `exit` when dropped.
pub fn on_exit<F: FnOnce()>(exit: F) -> OnExit<F> {
    OnExit { exit: Some(exit) }
}

impl<F: FnOnce()> Drop for OnExit<F> {
    fn drop(&mut self) {
        if let Some(exit) = self.exit.take() {
            exit();
        }
    }
}
