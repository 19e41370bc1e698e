//! Grid configuration.
//!
//! ```
//! use lattice_grid::grid::GridConfig;
//!
//! let config = GridConfig::from_toml_str(
//!     r#"
//!     allow_user_to_add_rows = false
//!     null_value_text = "(none)"
//!     "#,
//! )
//! .unwrap();
//! assert!(!config.allow_user_to_add_rows);
//! assert!(config.auto_generate_columns);
//! ```

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};

use super::cell::CellStyle;

/// Behavior switches of a [`DataGrid`](super::DataGrid).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Show a trailing new-row slot when the bound list accepts new items.
    pub allow_user_to_add_rows: bool,
    /// Let the user delete rows when the bound list accepts removals.
    pub allow_user_to_delete_rows: bool,
    /// Generate columns from the bound list's properties.
    pub auto_generate_columns: bool,
    /// Refuse every user edit.
    pub read_only: bool,
    /// Text shown for null values.
    pub null_value_text: String,
    /// `chrono` format string for date time values.
    pub date_time_format: String,
}

impl Default for GridConfig {
    fn default() -> Self {
        let style = CellStyle::default();
        Self {
            allow_user_to_add_rows: true,
            allow_user_to_delete_rows: true,
            auto_generate_columns: true,
            read_only: false,
            null_value_text: style.null_value_text,
            date_time_format: style.date_time_format,
        }
    }
}

impl GridConfig {
    /// Parses a configuration from TOML. Missing keys keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: GridConfig =
            toml::from_str(text).map_err(|err| GridError::Config(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes the configuration to TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|err| GridError::Config(err.to_string()))
    }

    /// Checks that the date time format is a valid `chrono` format.
    pub fn validate(&self) -> Result<()> {
        if self.date_time_format.is_empty()
            || StrftimeItems::new(&self.date_time_format).any(|item| matches!(item, Item::Error))
        {
            return Err(GridError::Config(format!(
                "invalid date time format '{}'",
                self.date_time_format
            )));
        }
        Ok(())
    }

    /// The cell style this configuration describes.
    pub fn cell_style(&self) -> CellStyle {
        CellStyle {
            null_value_text: self.null_value_text.clone(),
            date_time_format: self.date_time_format.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_is_default() {
        let config = GridConfig::from_toml_str("").unwrap();
        assert_eq!(config, GridConfig::default());
    }

    #[test]
    fn test_partial_document() {
        let config = GridConfig::from_toml_str("read_only = true\nnull_value_text = \"-\"").unwrap();
        assert!(config.read_only);
        assert!(config.allow_user_to_add_rows);
        assert_eq!(config.cell_style().null_value_text, "-");
    }

    #[test]
    fn test_bad_documents_are_config_errors() {
        let err = GridConfig::from_toml_str("read_only = \"yes\"").unwrap_err();
        assert!(matches!(err, GridError::Config(_)));

        let err = GridConfig::from_toml_str("date_time_format = \"%Q\"").unwrap_err();
        assert!(matches!(err, GridError::Config(_)));
    }

    #[test]
    fn test_round_trip_through_toml() {
        let config = GridConfig {
            allow_user_to_delete_rows: false,
            ..Default::default()
        };
        let text = config.to_toml_string().unwrap();
        assert_eq!(GridConfig::from_toml_str(&text).unwrap(), config);
    }
}
