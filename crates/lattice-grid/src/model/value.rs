//! Cell values and value types.
//!
//! Every field of a bound list item is read and written as a [`CellValue`].
//! Each bound property declares a [`ValueType`]; a value is assignable to a
//! property when the two types match (or when the value is `Null`).

use std::cmp::Ordering;
use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Check state for check box cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CheckState {
    /// Item is unchecked.
    #[default]
    Unchecked,
    /// Item is partially checked (for three-state check boxes).
    Indeterminate,
    /// Item is checked.
    Checked,
}

impl CheckState {
    /// Returns `true` if the item is checked (fully or partially).
    pub fn is_checked(&self) -> bool {
        !matches!(self, CheckState::Unchecked)
    }

    /// Toggles between Unchecked and Checked.
    /// Indeterminate becomes Unchecked.
    pub fn toggle(&self) -> CheckState {
        match self {
            CheckState::Unchecked => CheckState::Checked,
            CheckState::Indeterminate | CheckState::Checked => CheckState::Unchecked,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            CheckState::Unchecked => 0,
            CheckState::Indeterminate => 1,
            CheckState::Checked => 2,
        }
    }
}

/// The declared type of a bound property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueType {
    /// `true` / `false`.
    Bool,
    /// 64-bit signed integer.
    Int,
    /// 64-bit float.
    Float,
    /// UTF-8 text.
    Text,
    /// Three-state check value.
    CheckState,
    /// Date and time without a time zone.
    DateTime,
    /// Raw bytes (images, blobs).
    Bytes,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueType::Bool => "Bool",
            ValueType::Int => "Int",
            ValueType::Float => "Float",
            ValueType::Text => "Text",
            ValueType::CheckState => "CheckState",
            ValueType::DateTime => "DateTime",
            ValueType::Bytes => "Bytes",
        };
        f.write_str(name)
    }
}

/// A value stored in, or pushed to, a field of a bound list item.
///
/// # Example
///
/// ```
/// use lattice_grid::model::{CellValue, ValueType};
///
/// let value = CellValue::from("Widget");
/// assert_eq!(value.value_type(), Some(ValueType::Text));
/// assert!(value.is_assignable_to(ValueType::Text));
/// assert!(CellValue::Null.is_assignable_to(ValueType::Int));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    /// No value.
    #[default]
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Floating point value.
    Float(f64),
    /// Text value.
    Text(String),
    /// Check state value.
    CheckState(CheckState),
    /// Date and time value.
    DateTime(NaiveDateTime),
    /// Binary value.
    Bytes(Vec<u8>),
}

impl CellValue {
    /// Returns `true` if this is `CellValue::Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Returns the runtime type of the value, or `None` for `Null`.
    pub fn value_type(&self) -> Option<ValueType> {
        match self {
            CellValue::Null => None,
            CellValue::Bool(_) => Some(ValueType::Bool),
            CellValue::Int(_) => Some(ValueType::Int),
            CellValue::Float(_) => Some(ValueType::Float),
            CellValue::Text(_) => Some(ValueType::Text),
            CellValue::CheckState(_) => Some(ValueType::CheckState),
            CellValue::DateTime(_) => Some(ValueType::DateTime),
            CellValue::Bytes(_) => Some(ValueType::Bytes),
        }
    }

    /// Returns `true` if the value can be stored in a field of `target` type
    /// without conversion.
    pub fn is_assignable_to(&self, target: ValueType) -> bool {
        self.value_type().is_none_or(|own| own == target)
    }

    /// Attempts to get the value as a string slice.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Attempts to get the value as an integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            CellValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to get the value as a float.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            CellValue::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to get the value as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CellValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Attempts to get the value as a check state.
    pub fn as_check_state(&self) -> Option<CheckState> {
        match self {
            CellValue::CheckState(s) => Some(*s),
            _ => None,
        }
    }

    /// Attempts to get the value as a date time.
    pub fn as_date_time(&self) -> Option<NaiveDateTime> {
        match self {
            CellValue::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    /// Total ordering used when sorting list items.
    ///
    /// Nulls sort first. Integers and floats compare numerically with each
    /// other; otherwise values of different types order by type.
    pub fn sort_cmp(&self, other: &CellValue) -> Ordering {
        use CellValue::*;
        match (self, other) {
            (Null, Null) => Ordering::Equal,
            (Null, _) => Ordering::Less,
            (_, Null) => Ordering::Greater,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Int(a), Int(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (Int(a), Float(b)) => (*a as f64).total_cmp(b),
            (Float(a), Int(b)) => a.total_cmp(&(*b as f64)),
            (Text(a), Text(b)) => a.cmp(b),
            (CheckState(a), CheckState(b)) => a.rank().cmp(&b.rank()),
            (DateTime(a), DateTime(b)) => a.cmp(b),
            (Bytes(a), Bytes(b)) => a.cmp(b),
            _ => self.type_rank().cmp(&other.type_rank()),
        }
    }

    fn type_rank(&self) -> u8 {
        match self {
            CellValue::Null => 0,
            CellValue::Bool(_) => 1,
            CellValue::Int(_) | CellValue::Float(_) => 2,
            CellValue::Text(_) => 3,
            CellValue::CheckState(_) => 4,
            CellValue::DateTime(_) => 5,
            CellValue::Bytes(_) => 6,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Int(n) => write!(f, "{n}"),
            CellValue::Float(n) => write!(f, "{n}"),
            CellValue::Text(s) => f.write_str(s),
            CellValue::CheckState(s) => write!(f, "{s:?}"),
            CellValue::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
            CellValue::Bytes(bytes) => write!(f, "<{} bytes>", bytes.len()),
        }
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<&String> for CellValue {
    fn from(s: &String) -> Self {
        CellValue::Text(s.clone())
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Int(n)
    }
}

impl From<i32> for CellValue {
    fn from(n: i32) -> Self {
        CellValue::Int(n as i64)
    }
}

impl From<u32> for CellValue {
    fn from(n: u32) -> Self {
        CellValue::Int(n as i64)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Float(n)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl From<CheckState> for CellValue {
    fn from(s: CheckState) -> Self {
        CellValue::CheckState(s)
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(dt: NaiveDateTime) -> Self {
        CellValue::DateTime(dt)
    }
}

impl From<Vec<u8>> for CellValue {
    fn from(bytes: Vec<u8>) -> Self {
        CellValue::Bytes(bytes)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => CellValue::Null,
        }
    }
}
