//! Data-error notifications.
//!
//! Every fallible access to the bound list is routed through a
//! [`DataErrorEvent`]. The handler decides what happens next:
//!
//! - set `throw_error` to have the operation return the error
//! - set `cancel` to abort the operation and keep the prior state
//! - leave both unset to carry on as if the value were absent

use std::fmt;

use crate::error::ListError;

/// Where a data error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataErrorContext {
    /// Reading a value or error text for display.
    Display,
    /// Writing a value or committing a row.
    Commit,
    /// Formatting or parsing a cell value.
    Formatting,
    /// Copying cell content to the clipboard.
    ClipboardContent,
}

impl fmt::Display for DataErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataErrorContext::Display => "display",
            DataErrorContext::Commit => "commit",
            DataErrorContext::Formatting => "formatting",
            DataErrorContext::ClipboardContent => "clipboard content",
        };
        f.write_str(name)
    }
}

/// A data error raised to the grid's error handler.
#[derive(Debug, Clone, PartialEq)]
pub struct DataErrorEvent {
    /// The underlying list error.
    pub error: ListError,
    /// The affected column, if the error is cell-specific.
    pub column: Option<usize>,
    /// The affected row.
    pub row: Option<usize>,
    /// Where the error occurred.
    pub context: DataErrorContext,
    /// Set by the handler to make the operation return the error.
    pub throw_error: bool,
    /// Set by the handler to abort the operation.
    pub cancel: bool,
}

impl DataErrorEvent {
    /// Creates an event with no handler decision yet.
    pub fn new(
        error: ListError,
        column: Option<usize>,
        row: Option<usize>,
        context: DataErrorContext,
    ) -> Self {
        Self {
            error,
            column,
            row,
            context,
            throw_error: false,
            cancel: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_event_is_undecided() {
        let event = DataErrorEvent::new(
            ListError::rejected("bad"),
            Some(1),
            Some(2),
            DataErrorContext::Commit,
        );
        assert!(!event.throw_error);
        assert!(!event.cancel);
        assert_eq!(event.context.to_string(), "commit");
    }
}
