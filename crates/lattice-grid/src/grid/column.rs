//! Grid column descriptions.

use std::fmt;
use std::sync::Arc;

use crate::model::{ListSortDirection, ValueConverter, ValueType};

use super::cell::CellKind;

/// How a column responds to sort requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    /// The grid sorts when the header is clicked.
    #[default]
    Automatic,
    /// Only code sorts the column.
    Programmatic,
    /// The column is never sorted.
    NotSortable,
}

/// Sort glyph shown in a column header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// No glyph.
    #[default]
    None,
    /// Ascending order (A-Z, 0-9).
    Ascending,
    /// Descending order (Z-A, 9-0).
    Descending,
}

impl From<ListSortDirection> for SortOrder {
    fn from(direction: ListSortDirection) -> Self {
        match direction {
            ListSortDirection::Ascending => SortOrder::Ascending,
            ListSortDirection::Descending => SortOrder::Descending,
        }
    }
}

/// A grid column.
///
/// Columns are either auto-generated from the bound properties or declared
/// by the user. A column is data bound once it has a bound index into the
/// list's properties; user columns get one by naming a data property.
#[derive(Clone)]
pub struct Column {
    name: String,
    header_text: String,
    data_property_name: String,
    bound_index: Option<usize>,
    value_type: Option<ValueType>,
    bound_type: Option<ValueType>,
    converter: Option<Arc<dyn ValueConverter>>,
    kind: CellKind,
    read_only: bool,
    visible: bool,
    sort_mode: SortMode,
    sort_glyph: SortOrder,
    auto_generated: bool,
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("name", &self.name)
            .field("data_property_name", &self.data_property_name)
            .field("bound_index", &self.bound_index)
            .field("value_type", &self.value_type())
            .field("kind", &self.kind)
            .field("visible", &self.visible)
            .field("sort_glyph", &self.sort_glyph)
            .finish()
    }
}

impl Column {
    /// Creates an unbound text column.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            header_text: name.clone(),
            name,
            data_property_name: String::new(),
            bound_index: None,
            value_type: None,
            bound_type: None,
            converter: None,
            kind: CellKind::TextBox,
            read_only: false,
            visible: true,
            sort_mode: SortMode::Automatic,
            sort_glyph: SortOrder::None,
            auto_generated: false,
        }
    }

    /// Creates a user column bound to the named data property.
    pub fn bound_to(name: impl Into<String>, data_property_name: impl Into<String>) -> Self {
        Self {
            data_property_name: data_property_name.into(),
            ..Self::new(name)
        }
    }

    /// Sets the header text.
    pub fn with_header_text(mut self, text: impl Into<String>) -> Self {
        self.header_text = text.into();
        self
    }

    /// Sets the cell kind.
    pub fn with_kind(mut self, kind: CellKind) -> Self {
        self.kind = kind;
        self
    }

    /// Declares the value type the column expects.
    pub fn with_value_type(mut self, value_type: ValueType) -> Self {
        self.value_type = Some(value_type);
        self
    }

    /// Sets the sort mode.
    pub fn with_sort_mode(mut self, mode: SortMode) -> Self {
        self.sort_mode = mode;
        self
    }

    /// Makes the column read-only.
    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    /// Hides the column.
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn header_text(&self) -> &str {
        &self.header_text
    }

    /// Name of the bound property; empty for unbound columns.
    pub fn data_property_name(&self) -> &str {
        &self.data_property_name
    }

    /// Index of the bound property.
    pub fn bound_index(&self) -> Option<usize> {
        self.bound_index
    }

    /// Returns `true` if the column is bound to a property.
    pub fn is_data_bound(&self) -> bool {
        self.bound_index.is_some()
    }

    /// The declared value type, falling back to the bound property's type.
    pub fn value_type(&self) -> Option<ValueType> {
        self.value_type.or(self.bound_type)
    }

    /// The bound property's converter.
    pub fn converter(&self) -> Option<&Arc<dyn ValueConverter>> {
        self.converter.as_ref()
    }

    pub fn kind(&self) -> &CellKind {
        &self.kind
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn sort_mode(&self) -> SortMode {
        self.sort_mode
    }

    pub fn sort_glyph(&self) -> SortOrder {
        self.sort_glyph
    }

    /// Returns `true` if the column was generated from a bound property.
    pub fn is_auto_generated(&self) -> bool {
        self.auto_generated
    }

    /// Returns `true` if the column shows a property called `name`.
    pub fn shows_property(&self, name: &str) -> bool {
        self.is_data_bound() && self.data_property_name.eq_ignore_ascii_case(name)
    }

    pub(crate) fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub(crate) fn set_sort_glyph(&mut self, glyph: SortOrder) {
        self.sort_glyph = glyph;
    }

    /// Binds the column to the property at `bound_index`.
    pub(crate) fn bind(
        &mut self,
        bound_index: usize,
        value_type: ValueType,
        converter: Arc<dyn ValueConverter>,
    ) {
        self.bound_index = Some(bound_index);
        self.bound_type = Some(value_type);
        self.converter = Some(converter);
    }

    /// Drops the binding, keeping the data property name.
    pub(crate) fn unbind(&mut self) {
        self.bound_index = None;
        self.bound_type = None;
        self.converter = None;
        self.sort_glyph = SortOrder::None;
    }

    pub(crate) fn auto_generated(mut self) -> Self {
        self.auto_generated = true;
        self
    }

    pub(crate) fn with_data_property_name(mut self, name: impl Into<String>) -> Self {
        self.data_property_name = name.into();
        self
    }
}
