//! Diagnostic codes and error reporting
//!
//! IMPORTANT: Diagnostic codes are versioned and stable.
//! NEVER rename or remove codes - they are part of the public API.
//! Add new codes with new names only.

use serde::{Deserialize, Serialize};

/// Diagnostic code registry (v1)
///
/// These codes are STABLE and VERSIONED.
/// Do NOT rename or remove codes - only add new ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiagnosticCode {
    // Workbook structure
    /// Sheet does not carry the schema header and was skipped
    SheetNotASchema,

    /// A fixed sheet (files list, rules, list of values) is absent
    SheetMissing,

    // Schema extraction
    /// Two columns of a sheet declare the same position
    SchemaDuplicatePosition,

    /// Two columns of a sheet share a name (case-insensitive)
    SchemaDuplicateColumn,

    /// A position cell is empty or not a number
    SchemaInvalidPosition,

    // Merge and fallbacks
    /// Schema sheet with no matching files-list entry; table dropped
    TableUnmatched,

    /// Periodicity token not in the mapping; default cadence used
    PeriodicityUnknown,

    /// Separator missing; default delimiter used
    SeparatorDefaulted,

    /// No per-file date rule matched; global rule applies to every file
    FormatRuleGlobal,

    // General
    /// General informational message
    Info,

    /// General warning message
    Warning,
}

impl DiagnosticCode {
    /// Get the diagnostic code as a stable string identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SheetNotASchema => "SHEET_NOT_A_SCHEMA",
            Self::SheetMissing => "SHEET_MISSING",
            Self::SchemaDuplicatePosition => "SCHEMA_DUPLICATE_POSITION",
            Self::SchemaDuplicateColumn => "SCHEMA_DUPLICATE_COLUMN",
            Self::SchemaInvalidPosition => "SCHEMA_INVALID_POSITION",
            Self::TableUnmatched => "TABLE_UNMATCHED",
            Self::PeriodicityUnknown => "PERIODICITY_UNKNOWN",
            Self::SeparatorDefaulted => "SEPARATOR_DEFAULTED",
            Self::FormatRuleGlobal => "FORMAT_RULE_GLOBAL",
            Self::Info => "INFO",
            Self::Warning => "WARNING",
        }
    }
}

impl std::fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message
    Info,

    /// Warning - a default was substituted or input was ignored
    Warn,

    /// Error - generated artifacts are incomplete
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Location of a diagnostic inside a workbook
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Sheet name
    pub sheet: String,

    /// Optional row number (1-indexed, as shown by spreadsheet tools)
    pub row: Option<usize>,

    /// Optional column letter index (1-indexed)
    pub column: Option<usize>,
}

impl Location {
    /// Create a new location with just a sheet name
    pub fn new(sheet: impl Into<String>) -> Self {
        Self {
            sheet: sheet.into(),
            row: None,
            column: None,
        }
    }

    /// Create a location from a zero-based row index
    pub fn with_row(sheet: impl Into<String>, row_index: usize) -> Self {
        Self {
            sheet: sheet.into(),
            row: Some(row_index + 1),
            column: None,
        }
    }

    /// Create a location from zero-based row and column indices
    pub fn with_cell(sheet: impl Into<String>, row_index: usize, column_index: usize) -> Self {
        Self {
            sheet: sheet.into(),
            row: Some(row_index + 1),
            column: Some(column_index + 1),
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.sheet)?;
        if let Some(row) = self.row {
            write!(f, ":{}", row)?;
        }
        if let Some(column) = self.column {
            write!(f, ":{}", column)?;
        }
        Ok(())
    }
}

/// A diagnostic message with structured metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Stable diagnostic code
    pub code: DiagnosticCode,

    /// Severity level
    pub severity: Severity,

    /// Human-readable message
    pub message: String,

    /// Source location (best-effort)
    pub location: Option<Location>,

    /// Value substituted for missing or unknown input
    pub substituted: Option<String>,
}

impl Diagnostic {
    /// Create a new diagnostic with minimal fields
    pub fn new(code: DiagnosticCode, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            code,
            severity,
            message: message.into(),
            location: None,
            substituted: None,
        }
    }

    /// Set the location
    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Record the default that replaced the input
    pub fn with_substitution(mut self, value: impl Into<String>) -> Self {
        self.substituted = Some(value.into());
        self
    }
}
