//! Per-file date/decimal formatting rules

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Date format used when a contract declares no date rule
pub const DEFAULT_DATE_FORMAT: &str = "dd/MM/yyyy";

/// Decimal separator used for every file
pub const DEFAULT_DECIMAL_FORMAT: &str = ".";

/// Formatting applied when casting raw text fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatOverride {
    /// Warehouse date format, e.g. `dd/MM/yyyy`
    pub date_format: String,

    /// Decimal separator
    pub decimal_format: String,
}

impl FormatOverride {
    /// Override with the given date format and the default decimal separator
    pub fn with_date_format(date_format: impl Into<String>) -> Self {
        Self {
            date_format: date_format.into(),
            decimal_format: DEFAULT_DECIMAL_FORMAT.to_string(),
        }
    }
}

impl Default for FormatOverride {
    fn default() -> Self {
        Self::with_date_format(DEFAULT_DATE_FORMAT)
    }
}

/// Format rules resolved for one contract
///
/// Either a global default or a set of per-file overrides is active,
/// never both: specific overrides replace the global rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatRules {
    /// Rule applied to every file without an override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<FormatOverride>,

    /// Rules keyed by file identifier
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub overrides: BTreeMap<String, FormatOverride>,
}

impl FormatRules {
    /// Rules with only a global default
    pub fn global(default: FormatOverride) -> Self {
        Self {
            default: Some(default),
            overrides: BTreeMap::new(),
        }
    }

    /// Rules with only per-file overrides
    pub fn per_file(overrides: BTreeMap<String, FormatOverride>) -> Self {
        Self {
            default: None,
            overrides,
        }
    }

    /// Resolve the rule for a file: exact override, then global default
    pub fn resolve(&self, file_id: &str) -> Result<&FormatOverride, FormatLookupError> {
        self.overrides
            .get(file_id)
            .or(self.default.as_ref())
            .ok_or_else(|| FormatLookupError::MissingOverride(file_id.to_string()))
    }
}

impl Default for FormatRules {
    fn default() -> Self {
        Self::global(FormatOverride::default())
    }
}

/// Format rule lookup failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatLookupError {
    #[error("No format override for file '{0}' and no global default")]
    MissingOverride(String),
}
