//! Bound property descriptors.
//!
//! A [`PropertyDescriptor`] describes one field of the items in a bound list.
//! Descriptors are resolved once, when the list adapter changes or the list
//! reports a metadata change, and then looked up by *bound index* on every
//! value access.

use std::fmt;
use std::sync::Arc;

use super::convert::{ValueConverter, standard_converter};
use super::value::ValueType;

/// Describes one bindable field of a list item.
#[derive(Clone)]
pub struct PropertyDescriptor {
    name: String,
    display_name: Option<String>,
    value_type: ValueType,
    converter: Arc<dyn ValueConverter>,
    read_only: bool,
    browsable: bool,
    sortable: bool,
}

impl PropertyDescriptor {
    /// Creates a writable, browsable, sortable property with the stock
    /// converter for `value_type`.
    pub fn new(name: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            display_name: None,
            value_type,
            converter: standard_converter(value_type),
            read_only: false,
            browsable: true,
            sortable: true,
        }
    }

    /// Sets the display name used for generated column headers.
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    /// Replaces the converter.
    pub fn with_converter(mut self, converter: Arc<dyn ValueConverter>) -> Self {
        self.converter = converter;
        self
    }

    /// Marks the property read-only.
    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    /// Marks the property browsable (visible to column generation).
    pub fn browsable(mut self, browsable: bool) -> Self {
        self.browsable = browsable;
        self
    }

    /// Marks the property sortable.
    pub fn sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    /// The property name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The display name, falling back to the name.
    pub fn display_name(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.name)
    }

    /// The declared value type.
    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    /// The converter used when pushing values of another type.
    pub fn converter(&self) -> &Arc<dyn ValueConverter> {
        &self.converter
    }

    /// Whether the property is read-only.
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Whether the property takes part in column generation.
    pub fn is_browsable(&self) -> bool {
        self.browsable
    }

    /// Whether the list can sort by this property.
    pub fn is_sortable(&self) -> bool {
        self.sortable
    }

    /// Case-insensitive name comparison.
    pub fn matches(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

impl fmt::Debug for PropertyDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyDescriptor")
            .field("name", &self.name)
            .field("value_type", &self.value_type)
            .field("read_only", &self.read_only)
            .field("browsable", &self.browsable)
            .field("sortable", &self.sortable)
            .finish_non_exhaustive()
    }
}

/// An ordered collection of property descriptors.
#[derive(Debug, Clone, Default)]
pub struct PropertyDescriptors {
    properties: Vec<PropertyDescriptor>,
}

impl PropertyDescriptors {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of properties.
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Returns `true` if there are no properties.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Returns the property at `bound_index`.
    pub fn get(&self, bound_index: usize) -> Option<&PropertyDescriptor> {
        self.properties.get(bound_index)
    }

    /// Returns the bound index of `name`, compared case-insensitively.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.properties.iter().position(|p| p.matches(name))
    }

    /// Returns the property called `name`, compared case-insensitively.
    pub fn find(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties.iter().find(|p| p.matches(name))
    }

    /// Iterates in bound-index order.
    pub fn iter(&self) -> std::slice::Iter<'_, PropertyDescriptor> {
        self.properties.iter()
    }

    /// Appends a property.
    pub fn push(&mut self, property: PropertyDescriptor) {
        self.properties.push(property);
    }
}

impl FromIterator<PropertyDescriptor> for PropertyDescriptors {
    fn from_iter<I: IntoIterator<Item = PropertyDescriptor>>(iter: I) -> Self {
        Self {
            properties: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a PropertyDescriptors {
    type Item = &'a PropertyDescriptor;
    type IntoIter = std::slice::Iter<'a, PropertyDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.properties.iter()
    }
}
