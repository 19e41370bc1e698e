//! Value converters.
//!
//! A converter turns values of one [`ValueType`] into another. Every bound
//! property carries one (by default the [`standard_converter`] for its
//! declared type); the data connection consults it before writing a value
//! whose type does not match the column.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};

use super::value::{CellValue, CheckState, ValueType};
use crate::error::ConversionError;

/// Formats accepted when parsing text as a date time, tried in order.
pub const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
];

/// Converts values to and from one value type.
pub trait ValueConverter: Send + Sync {
    /// The type this converter produces in [`convert_from`](Self::convert_from).
    fn target(&self) -> ValueType;

    /// Returns `true` if values of `source` type can be converted into
    /// [`target`](Self::target).
    fn can_convert_from(&self, source: ValueType) -> bool;

    /// Converts `value` into the converter's target type.
    fn convert_from(&self, value: &CellValue) -> Result<CellValue, ConversionError>;

    /// Returns `true` if values of the converter's target type can be
    /// converted into `destination`.
    fn can_convert_to(&self, destination: ValueType) -> bool;

    /// Converts `value` (of the converter's target type) into `destination`.
    fn convert_to(
        &self,
        value: &CellValue,
        destination: ValueType,
    ) -> Result<CellValue, ConversionError>;
}

/// The stock converter for one value type.
///
/// Conversions go through [`convert_value`]; the converter only records which
/// side of the conversion its type is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StandardConverter {
    value_type: ValueType,
}

impl StandardConverter {
    /// Creates the stock converter for `value_type`.
    pub const fn new(value_type: ValueType) -> Self {
        Self { value_type }
    }
}

impl ValueConverter for StandardConverter {
    fn target(&self) -> ValueType {
        self.value_type
    }

    fn can_convert_from(&self, source: ValueType) -> bool {
        can_convert(source, self.value_type)
    }

    fn convert_from(&self, value: &CellValue) -> Result<CellValue, ConversionError> {
        convert_value(value, self.value_type)
    }

    fn can_convert_to(&self, destination: ValueType) -> bool {
        can_convert(self.value_type, destination)
    }

    fn convert_to(
        &self,
        value: &CellValue,
        destination: ValueType,
    ) -> Result<CellValue, ConversionError> {
        convert_value(value, destination)
    }
}

/// Returns the shared stock converter for `value_type`.
pub fn standard_converter(value_type: ValueType) -> Arc<dyn ValueConverter> {
    Arc::new(StandardConverter::new(value_type))
}

/// Returns `true` if the stock conversion table has an entry for the pair.
pub fn can_convert(from: ValueType, to: ValueType) -> bool {
    use ValueType::*;
    if from == to || from == Text || to == Text {
        return from != Bytes && to != Bytes || from == to;
    }
    matches!(
        (from, to),
        (Int, Float)
            | (Float, Int)
            | (Bool, Int)
            | (Int, Bool)
            | (Bool, CheckState)
            | (CheckState, Bool)
            | (Int, CheckState)
    )
}

/// Converts `value` into `to` using the stock conversion table.
///
/// `Null` converts to `Null` for every target.
pub fn convert_value(value: &CellValue, to: ValueType) -> Result<CellValue, ConversionError> {
    let Some(from) = value.value_type() else {
        return Ok(CellValue::Null);
    };
    if from == to {
        return Ok(value.clone());
    }
    if !can_convert(from, to) {
        return Err(ConversionError::Unsupported { from, to });
    }

    match (value, to) {
        (CellValue::Text(text), _) => parse_text(text, to),
        (_, ValueType::Text) => Ok(CellValue::Text(value.to_string())),
        (CellValue::Int(n), ValueType::Float) => Ok(CellValue::Float(*n as f64)),
        (CellValue::Float(n), ValueType::Int) => {
            if n.is_finite() && *n >= i64::MIN as f64 && *n <= i64::MAX as f64 {
                Ok(CellValue::Int(n.round() as i64))
            } else {
                Err(ConversionError::OutOfRange { to })
            }
        }
        (CellValue::Bool(b), ValueType::Int) => Ok(CellValue::Int(*b as i64)),
        (CellValue::Int(n), ValueType::Bool) => Ok(CellValue::Bool(*n != 0)),
        (CellValue::Bool(b), ValueType::CheckState) => Ok(CellValue::CheckState(if *b {
            CheckState::Checked
        } else {
            CheckState::Unchecked
        })),
        (CellValue::CheckState(s), ValueType::Bool) => Ok(CellValue::Bool(s.is_checked())),
        (CellValue::Int(n), ValueType::CheckState) => match n {
            0 => Ok(CellValue::CheckState(CheckState::Unchecked)),
            1 => Ok(CellValue::CheckState(CheckState::Checked)),
            2 => Ok(CellValue::CheckState(CheckState::Indeterminate)),
            _ => Err(ConversionError::OutOfRange { to }),
        },
        _ => Err(ConversionError::Unsupported { from, to }),
    }
}

fn parse_text(text: &str, to: ValueType) -> Result<CellValue, ConversionError> {
    let trimmed = text.trim();
    let parse_error = || ConversionError::Parse {
        text: text.to_string(),
        to,
    };
    match to {
        ValueType::Text => Ok(CellValue::Text(text.to_string())),
        ValueType::Int => trimmed.parse().map(CellValue::Int).map_err(|_| parse_error()),
        ValueType::Float => trimmed.parse().map(CellValue::Float).map_err(|_| parse_error()),
        ValueType::Bool => match trimmed.to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => Ok(CellValue::Bool(true)),
            "false" | "no" | "0" => Ok(CellValue::Bool(false)),
            _ => Err(parse_error()),
        },
        ValueType::CheckState => match trimmed.to_ascii_lowercase().as_str() {
            "checked" | "true" => Ok(CellValue::CheckState(CheckState::Checked)),
            "unchecked" | "false" => Ok(CellValue::CheckState(CheckState::Unchecked)),
            "indeterminate" => Ok(CellValue::CheckState(CheckState::Indeterminate)),
            _ => Err(parse_error()),
        },
        ValueType::DateTime => parse_date_time(trimmed)
            .map(CellValue::DateTime)
            .ok_or_else(parse_error),
        ValueType::Bytes => Err(ConversionError::Unsupported {
            from: ValueType::Text,
            to,
        }),
    }
}

/// Parses a date time using [`DATE_TIME_FORMATS`], falling back to a bare
/// `YYYY-MM-DD` date at midnight.
pub fn parse_date_time(text: &str) -> Option<NaiveDateTime> {
    DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}
