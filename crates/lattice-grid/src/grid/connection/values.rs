//! Value access and bound-column metadata.

use std::sync::Arc;

use lattice_grid_core::logging::targets;

use crate::binding::ListAdapter;
use crate::error::{GridError, ListError, Result};
use crate::model::{CellValue, ValueConverter, ValueType, standard_converter};

use super::super::cell::CellKind;
use super::super::column::Column;
use super::super::data_error::{DataErrorContext, DataErrorEvent};
use super::super::host::GridHost;
use super::DataConnection;

impl DataConnection {
    /// Reads the value of property `bound_index` at `row`.
    ///
    /// A failed read is raised as a display-time data error. Unless the
    /// handler rethrows, the cell shows no value.
    pub fn get_value(
        &self,
        bound_index: usize,
        column: usize,
        row: usize,
    ) -> Result<Option<CellValue>> {
        let adapter = self.bound_adapter()?;
        match adapter.list().value(row, bound_index) {
            Ok(value) => Ok(Some(value)),
            Err(err) => self.display_error(err, Some(column), row).map(|()| None),
        }
    }

    /// The error text of the item at `row`.
    pub fn get_error(&self, row: usize) -> Result<String> {
        let adapter = self.bound_adapter()?;
        match adapter.list().row_error(row) {
            Ok(text) => Ok(text),
            Err(err) => self.display_error(err, None, row).map(|()| String::new()),
        }
    }

    /// The error text of property `bound_index` of the item at `row`.
    pub fn get_error_for_cell(&self, bound_index: usize, column: usize, row: usize) -> Result<String> {
        let adapter = self.bound_adapter()?;
        match adapter.list().field_error(row, bound_index) {
            Ok(text) => Ok(text),
            Err(err) => self
                .display_error(err, Some(column), row)
                .map(|()| String::new()),
        }
    }

    /// Writes `value` to property `bound_index` at `row`.
    ///
    /// The value is converted to the column's type first. Returns `false`
    /// only if the write failed and the error handler cancelled; a failed
    /// write the handler lets through rolls the row edit back and still
    /// returns `true`.
    pub fn push_value(
        &self,
        bound_index: usize,
        column: usize,
        row: usize,
        value: CellValue,
    ) -> Result<bool> {
        let adapter = self.bound_adapter()?;
        let owner = self.owner()?;
        match self.write_value(&adapter, &*owner, bound_index, column, row, value) {
            Ok(()) => Ok(true),
            Err(err) => {
                tracing::debug!(
                    target: targets::CONNECTION,
                    row,
                    column,
                    error = %err,
                    "value rejected"
                );
                Ok(!self.process_exception(err, Some(column), row, false)?)
            }
        }
    }

    fn write_value(
        &self,
        adapter: &ListAdapter,
        owner: &dyn GridHost,
        bound_index: usize,
        column: usize,
        row: usize,
        value: CellValue,
    ) -> std::result::Result<(), ListError> {
        let value = match value.value_type() {
            Some(value_type) => {
                let column_type = owner
                    .column(column)
                    .and_then(|column| column.value_type())
                    .or_else(|| self.bound_column_value_type(bound_index));
                match column_type {
                    Some(column_type) if column_type != value_type => {
                        self.coerce(value, value_type, column_type, bound_index)?
                    }
                    _ => value,
                }
            }
            None => value,
        };
        adapter.list().set_value(row, bound_index, value)
    }

    fn coerce(
        &self,
        value: CellValue,
        value_type: ValueType,
        column_type: ValueType,
        bound_index: usize,
    ) -> std::result::Result<CellValue, ListError> {
        if let Some(converter) = self.bound_column_converter(bound_index)
            && converter.can_convert_from(value_type)
        {
            return Ok(converter.convert_from(&value)?);
        }
        let fallback = standard_converter(value_type);
        if fallback.can_convert_to(column_type) {
            return Ok(fallback.convert_to(&value, column_type)?);
        }
        Ok(value)
    }

    fn display_error(&self, error: ListError, column: Option<usize>, row: usize) -> Result<()> {
        let owner = self.owner()?;
        let mut event = DataErrorEvent::new(error, column, Some(row), DataErrorContext::Display);
        owner.on_data_error(&mut event);
        if event.throw_error {
            return Err(GridError::Data(event.error));
        }
        Ok(())
    }

    // Bound columns

    /// Columns generated from the bound list's browsable properties.
    pub fn bound_columns(&self) -> Vec<Column> {
        let Some(props) = self.properties() else {
            return Vec::new();
        };
        props
            .iter()
            .enumerate()
            .filter(|(_, prop)| prop.is_browsable())
            .map(|(index, prop)| {
                let mut column = Column::new(prop.name())
                    .with_data_property_name(prop.name())
                    .with_header_text(prop.display_name())
                    .with_kind(CellKind::for_value_type(prop.value_type()))
                    .read_only(prop.is_read_only())
                    .auto_generated();
                column.bind(index, prop.value_type(), prop.converter().clone());
                column
            })
            .collect()
    }

    /// Index of the property called `name`.
    pub fn bound_column_index(&self, name: &str) -> Option<usize> {
        self.properties()?.index_of(name)
    }

    /// Type of the property at `bound_index`.
    pub fn bound_column_value_type(&self, bound_index: usize) -> Option<ValueType> {
        Some(self.properties()?.get(bound_index)?.value_type())
    }

    /// Converter of the property at `bound_index`.
    pub fn bound_column_converter(&self, bound_index: usize) -> Option<Arc<dyn ValueConverter>> {
        Some(self.properties()?.get(bound_index)?.converter().clone())
    }

    /// Whether the property at `bound_index` cannot be written.
    pub fn data_field_is_read_only(&self, bound_index: usize) -> bool {
        self.properties()
            .and_then(|props| props.get(bound_index).map(|prop| prop.is_read_only()))
            .unwrap_or(true)
    }
}
