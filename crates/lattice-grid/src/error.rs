//! Error types for the grid data layer.

use crate::model::ValueType;

/// Result type alias for grid operations.
pub type Result<T> = std::result::Result<T, GridError>;

/// Data-access faults raised by a list provider.
///
/// These are the "non-fatal" failures of reading or writing the external
/// list. The data connection routes them through a [`DataErrorEvent`]
/// instead of letting them escape.
///
/// [`DataErrorEvent`]: crate::grid::DataErrorEvent
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ListError {
    /// The row index does not address an item of the list.
    #[error("Index {index} is out of range for a list of {count} items")]
    IndexOutOfRange { index: usize, count: usize },

    /// The bound index does not address a property of the list items.
    #[error("Property index {index} is out of range")]
    PropertyOutOfRange { index: usize },

    /// The property cannot be written.
    #[error("Property '{property}' is read-only")]
    ReadOnly { property: String },

    /// The list does not support the requested operation.
    #[error("The list does not support {operation}")]
    NotSupported { operation: &'static str },

    /// The item rejected the value.
    #[error("Value rejected: {0}")]
    Rejected(String),

    /// The value could not be converted to the property type.
    #[error(transparent)]
    Conversion(#[from] ConversionError),
}

impl ListError {
    /// Create a rejection error.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected(message.into())
    }

    /// Create a read-only error.
    pub fn read_only(property: impl Into<String>) -> Self {
        Self::ReadOnly {
            property: property.into(),
        }
    }
}

/// Value conversion failures.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConversionError {
    /// No conversion exists between the two types.
    #[error("Cannot convert {from} to {to}")]
    Unsupported { from: ValueType, to: ValueType },

    /// The text could not be parsed as the target type.
    #[error("Cannot parse '{text}' as {to}")]
    Parse { text: String, to: ValueType },

    /// The value does not fit the target type.
    #[error("Value out of range for {to}")]
    OutOfRange { to: ValueType },
}

/// Binding-configuration faults.
///
/// These surface at the point of assignment (data source, data member,
/// display/value member, sort) rather than on a later access.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindingError {
    /// The data member does not name a list of the data source.
    #[error("Data member '{member}' cannot be resolved to a list")]
    InvalidDataMember { member: String },

    /// A display or value member does not name a property of the list items.
    #[error("Field '{member}' does not exist on the bound list")]
    UnknownField { member: String },

    /// Sorting was requested on a list that does not support it.
    #[error("The bound list does not support sorting")]
    SortNotSupported,

    /// Sorting was requested on a column that is not data bound.
    #[error("Column {column} is not bound to a data field")]
    ColumnNotBound { column: usize },

    /// An operation needs a bound list but the grid is not bound.
    #[error("The grid is not bound to a list")]
    NotBound,
}

/// Errors surfaced to callers of grid operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GridError {
    /// A data error the error handler asked to be rethrown.
    #[error("Data error: {0}")]
    Data(#[from] ListError),

    /// A binding-configuration fault.
    #[error("Binding error: {0}")]
    Binding(#[from] BindingError),

    /// The list raised an event that contradicts the open row transaction.
    #[error("Transaction ordering violated: {0}")]
    TransactionOrdering(&'static str),

    /// The current cell could not be moved to follow the list position.
    #[error("The current cell change cannot be committed or aborted")]
    CellChangeRejected,

    /// The grid that owns the data connection has been dropped.
    #[error("The owning grid is gone")]
    Detached,

    /// Invalid grid configuration.
    #[error("Invalid grid configuration: {0}")]
    Config(String),
}

impl From<ConversionError> for GridError {
    fn from(err: ConversionError) -> Self {
        Self::Data(ListError::Conversion(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ListError::IndexOutOfRange { index: 4, count: 2 };
        assert_eq!(err.to_string(), "Index 4 is out of range for a list of 2 items");

        let err = GridError::from(BindingError::InvalidDataMember {
            member: "Orders".into(),
        });
        assert_eq!(
            err.to_string(),
            "Binding error: Data member 'Orders' cannot be resolved to a list"
        );
    }

    #[test]
    fn test_conversion_error_wraps_into_data_error() {
        let err: GridError = ConversionError::OutOfRange { to: ValueType::Int }.into();
        assert!(matches!(err, GridError::Data(ListError::Conversion(_))));
    }
}
