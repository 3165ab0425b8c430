//! Sheet layouts of a contract workbook
//!
//! Contract sheets are addressed by fixed zero-based column indices, not by
//! header names. Each sheet kind keeps its whole index table here; parsers
//! never use a bare column number.

/// The per-file sheet listing every file and its format
pub mod files_list {
    /// Sheet name
    pub const SHEET: &str = "Files list";

    /// First data row (spreadsheet row 5)
    pub const FIRST_ROW: usize = 4;

    pub const FILE_ID: usize = 1;
    /// Scanning stops at the first row where this cell is empty
    pub const FILE_CODE: usize = 2;
    pub const PERIODICITY: usize = 7;
    pub const DATA_TYPE: usize = 8;
    pub const FORMAT: usize = 10;
    pub const SEPARATOR: usize = 11;
    pub const HEADER: usize = 12;
    pub const FOOTER: usize = 13;
    pub const QUOTE: usize = 14;
}

/// Field-level rules, including date formats
pub mod rules {
    /// Sheet name
    pub const SHEET: &str = "Rules";

    /// First data row (spreadsheet row 1)
    pub const FIRST_ROW: usize = 0;

    /// Scanning stops at the first row where this cell is empty
    pub const FILE: usize = 1;
    pub const FIELD: usize = 2;
    pub const RULE: usize = 4;
}

/// Permitted values per field and country
pub mod list_of_values {
    /// Sheet name
    pub const SHEET: &str = "List of value";

    /// First data row; row 1 holds headers
    pub const FIRST_ROW: usize = 1;

    pub const FIELD: usize = 0;
    pub const VALUE: usize = 1;
    pub const COUNTRY: usize = 2;

    /// Country scope applying to every region
    pub const ALL_COUNTRIES: &str = "ALL";
}

/// One sheet per logical table
pub mod table {
    /// Rows that may hold the header marker (cells A7 and A8)
    pub const HEADER_ROWS: [usize; 2] = [6, 7];

    /// Text of the header marker cell
    pub const HEADER_MARKER: &str = "Field";

    /// First scanned row (spreadsheet row 8)
    pub const FIRST_ROW: usize = 7;

    /// Field name equal to this ends the column list
    pub const PARTITION_MARKER: &str = "DATE_BATCH_PARTITION";

    pub const FIELD: usize = 0;
    pub const TYPE: usize = 2;
    pub const PROTECTED: usize = 3;
    pub const PRECISION: usize = 4;
    pub const POSITION: usize = 5;
    pub const PRIMARY_KEY: usize = 6;
    pub const MANDATORY: usize = 7;
    pub const ANONYMIZATION_RULE: usize = 11;

    /// Sheet-name fragments (upper case) never treated as tables
    pub const EXCLUDED_FRAGMENTS: [&str; 2] = ["_SF", "TEMPLATE_"];
}

/// Whether a sheet is one of the fixed, non-table sheets
pub fn is_fixed_sheet(name: &str) -> bool {
    [files_list::SHEET, rules::SHEET, list_of_values::SHEET].contains(&name)
}
