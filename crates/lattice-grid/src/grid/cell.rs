//! The data contract of the cell types.
//!
//! Cell kinds do not take part in the binding state machine. They only turn
//! bound values into what the cell shows ([`CellKind::format_value`]) and
//! user input back into values for the list ([`CellKind::parse_value`]).
//! Painting and hit-testing live elsewhere.

use std::fmt;
use std::sync::Arc;

use crate::error::{BindingError, ConversionError, ListError};
use crate::model::{BindingList, CellValue, CheckState, ValueType, convert_value};

/// Formatting options shared by the cells of a grid.
#[derive(Debug, Clone, PartialEq)]
pub struct CellStyle {
    /// Text shown for a null value.
    pub null_value_text: String,
    /// `chrono` format string for date time values.
    pub date_time_format: String,
}

impl Default for CellStyle {
    fn default() -> Self {
        Self {
            null_value_text: String::new(),
            date_time_format: "%Y-%m-%d %H:%M:%S".to_string(),
        }
    }
}

/// What a cell shows for a value.
#[derive(Debug, Clone, PartialEq)]
pub enum FormattedValue {
    /// Text content.
    Text(String),
    /// Check box state.
    Check(CheckState),
    /// Image bytes, if any.
    Image(Option<Vec<u8>>),
}

impl FormattedValue {
    /// Returns the text content, if this is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FormattedValue::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// The kind of cell a column hosts.
#[derive(Clone, Default)]
pub enum CellKind {
    /// Editable text.
    #[default]
    TextBox,
    /// Check box over a bool or check-state value.
    CheckBox {
        /// Allows the indeterminate state.
        three_state: bool,
    },
    /// Drop-down over the items of another list.
    ComboBox(ComboBoxItems),
    /// Push button.
    Button {
        /// Shows the column's header text instead of the value.
        use_column_text_for_value: bool,
    },
    /// Hyperlink.
    Link {
        /// Shows the column's header text instead of the value.
        use_column_text_for_link: bool,
    },
    /// Image over a bytes value.
    Image,
    /// Row header.
    RowHeader,
}

impl fmt::Debug for CellKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellKind::TextBox => f.write_str("TextBox"),
            CellKind::CheckBox { three_state } => f
                .debug_struct("CheckBox")
                .field("three_state", three_state)
                .finish(),
            CellKind::ComboBox(items) => f.debug_tuple("ComboBox").field(items).finish(),
            CellKind::Button {
                use_column_text_for_value,
            } => f
                .debug_struct("Button")
                .field("use_column_text_for_value", use_column_text_for_value)
                .finish(),
            CellKind::Link {
                use_column_text_for_link,
            } => f
                .debug_struct("Link")
                .field("use_column_text_for_link", use_column_text_for_link)
                .finish(),
            CellKind::Image => f.write_str("Image"),
            CellKind::RowHeader => f.write_str("RowHeader"),
        }
    }
}

impl CellKind {
    /// The cell kind auto-generated columns get for a value type.
    pub fn for_value_type(value_type: ValueType) -> Self {
        match value_type {
            ValueType::Bool => CellKind::CheckBox { three_state: false },
            ValueType::CheckState => CellKind::CheckBox { three_state: true },
            ValueType::Bytes => CellKind::Image,
            _ => CellKind::TextBox,
        }
    }

    /// Whether the user can type or toggle a value into the cell.
    pub fn is_editable(&self) -> bool {
        matches!(
            self,
            CellKind::TextBox | CellKind::CheckBox { .. } | CellKind::ComboBox(_)
        )
    }

    /// Formats a bound value for display.
    ///
    /// `column_text` is the header text used by buttons and links that show
    /// the column text instead of the value.
    pub fn format_value(
        &self,
        value: &CellValue,
        style: &CellStyle,
        column_text: &str,
    ) -> Result<FormattedValue, ListError> {
        match self {
            CellKind::TextBox | CellKind::RowHeader => Ok(FormattedValue::Text(format_text(value, style))),
            CellKind::Button {
                use_column_text_for_value: true,
            }
            | CellKind::Link {
                use_column_text_for_link: true,
            } => Ok(FormattedValue::Text(column_text.to_string())),
            CellKind::Button { .. } | CellKind::Link { .. } => {
                Ok(FormattedValue::Text(format_text(value, style)))
            }
            CellKind::CheckBox { three_state } => {
                let state = match value {
                    CellValue::Null if *three_state => CheckState::Indeterminate,
                    CellValue::Null => CheckState::Unchecked,
                    other => match convert_value(other, ValueType::CheckState)? {
                        CellValue::CheckState(state) => state,
                        _ => CheckState::Unchecked,
                    },
                };
                if !three_state && state == CheckState::Indeterminate {
                    return Err(ConversionError::OutOfRange {
                        to: ValueType::Bool,
                    }
                    .into());
                }
                Ok(FormattedValue::Check(state))
            }
            CellKind::ComboBox(items) => {
                if value.is_null() {
                    return Ok(FormattedValue::Text(style.null_value_text.clone()));
                }
                match items.display_text_for(value)? {
                    Some(text) => Ok(FormattedValue::Text(text)),
                    None => Err(ListError::rejected(format!(
                        "value '{value}' is not in the drop-down list"
                    ))),
                }
            }
            CellKind::Image => match value {
                CellValue::Null => Ok(FormattedValue::Image(None)),
                CellValue::Bytes(bytes) => Ok(FormattedValue::Image(Some(bytes.clone()))),
                other => Err(ConversionError::Unsupported {
                    from: other.value_type().unwrap_or(ValueType::Bytes),
                    to: ValueType::Bytes,
                }
                .into()),
            },
        }
    }

    /// Parses user input into a value of `value_type`.
    ///
    /// Text equal to the null-value text parses to `Null`.
    pub fn parse_value(
        &self,
        input: &CellValue,
        value_type: ValueType,
        style: &CellStyle,
    ) -> Result<CellValue, ListError> {
        match self {
            CellKind::TextBox => {
                if let CellValue::Text(text) = input
                    && text == &style.null_value_text
                {
                    return Ok(CellValue::Null);
                }
                Ok(convert_value(input, value_type)?)
            }
            CellKind::CheckBox { three_state } => {
                let value = convert_value(input, value_type)?;
                if !three_state && value == CellValue::CheckState(CheckState::Indeterminate) {
                    return Err(ConversionError::OutOfRange { to: value_type }.into());
                }
                Ok(value)
            }
            CellKind::ComboBox(items) => {
                if let CellValue::Text(text) = input
                    && text == &style.null_value_text
                {
                    return Ok(CellValue::Null);
                }
                let display = input.to_string();
                match items.value_for_display(&display)? {
                    Some(value) => Ok(convert_value(&value, value_type)?),
                    None => Err(ListError::rejected(format!(
                        "'{display}' is not in the drop-down list"
                    ))),
                }
            }
            CellKind::Button { .. } | CellKind::Link { .. } | CellKind::Image | CellKind::RowHeader => {
                Err(ListError::NotSupported {
                    operation: "editing this cell",
                })
            }
        }
    }
}

fn format_text(value: &CellValue, style: &CellStyle) -> String {
    match value {
        CellValue::Null => style.null_value_text.clone(),
        CellValue::DateTime(dt) => dt.format(&style.date_time_format).to_string(),
        other => other.to_string(),
    }
}

/// The items of a combo box column: another list plus the members that
/// supply each item's display text and value.
#[derive(Clone)]
pub struct ComboBoxItems {
    list: Arc<dyn BindingList>,
    display_member: Option<(String, usize)>,
    value_member: Option<(String, usize)>,
}

impl fmt::Debug for ComboBoxItems {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComboBoxItems")
            .field("items", &self.list.len())
            .field("display_member", &self.display_member().unwrap_or(""))
            .field("value_member", &self.value_member().unwrap_or(""))
            .finish()
    }
}

impl ComboBoxItems {
    /// Creates items over `list`. Both members default to the first property.
    pub fn new(list: Arc<dyn BindingList>) -> Self {
        Self {
            list,
            display_member: None,
            value_member: None,
        }
    }

    /// Sets the member that supplies the display text.
    ///
    /// An empty name resets to the first property. Unknown names fail here,
    /// not on a later lookup.
    pub fn with_display_member(mut self, member: &str) -> Result<Self, BindingError> {
        self.display_member = self.resolve(member)?;
        Ok(self)
    }

    /// Sets the member that supplies the value.
    pub fn with_value_member(mut self, member: &str) -> Result<Self, BindingError> {
        self.value_member = self.resolve(member)?;
        Ok(self)
    }

    /// The display member name, if set.
    pub fn display_member(&self) -> Option<&str> {
        self.display_member.as_ref().map(|(name, _)| name.as_str())
    }

    /// The value member name, if set.
    pub fn value_member(&self) -> Option<&str> {
        self.value_member.as_ref().map(|(name, _)| name.as_str())
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Returns `true` if there are no items.
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Display text of the item whose value equals `value`.
    pub fn display_text_for(&self, value: &CellValue) -> Result<Option<String>, ListError> {
        let value_index = self.member_index(&self.value_member);
        let display_index = self.member_index(&self.display_member);
        for row in 0..self.list.len() {
            if self.list.value(row, value_index)? == *value {
                return Ok(Some(self.list.value(row, display_index)?.to_string()));
            }
        }
        Ok(None)
    }

    /// Value of the item whose display text equals `display`.
    pub fn value_for_display(&self, display: &str) -> Result<Option<CellValue>, ListError> {
        let value_index = self.member_index(&self.value_member);
        let display_index = self.member_index(&self.display_member);
        for row in 0..self.list.len() {
            if self.list.value(row, display_index)?.to_string() == display {
                return Ok(Some(self.list.value(row, value_index)?));
            }
        }
        Ok(None)
    }

    fn resolve(&self, member: &str) -> Result<Option<(String, usize)>, BindingError> {
        if member.is_empty() {
            return Ok(None);
        }
        self.list
            .item_properties()
            .index_of(member)
            .map(|index| Some((member.to_string(), index)))
            .ok_or_else(|| BindingError::UnknownField {
                member: member.to_string(),
            })
    }

    fn member_index(&self, member: &Option<(String, usize)>) -> usize {
        member.as_ref().map_or(0, |(_, index)| *index)
    }
}
