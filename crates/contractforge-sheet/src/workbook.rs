//! Position-addressed workbook model
//!
//! Sheets are plain grids of cells addressed by zero-based row and column
//! indices. calamine ranges start at the first used cell, so loading copies
//! every cell back to its absolute position.

use calamine::{open_workbook_auto, Data, Range, Reader};
use contractforge_core::FieldValue;
use std::path::Path;

static EMPTY: Cell = Cell::Empty;

/// A single cell value
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl Cell {
    /// Whether the cell holds no usable value (empty or blank text)
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Trimmed textual value; `None` when empty
    ///
    /// Whole numbers render without a decimal point (`50`, not `50.0`).
    pub fn text(&self) -> Option<String> {
        match self {
            Self::Empty => None,
            Self::Text(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            Self::Number(n) => Some(format_number(*n)),
            Self::Bool(b) => Some(b.to_string()),
        }
    }

    /// Untrimmed textual value; `None` only for empty cells and empty strings
    pub fn raw_text(&self) -> Option<String> {
        match self {
            Self::Text(s) if s.is_empty() => None,
            Self::Text(s) => Some(s.clone()),
            other => other.text(),
        }
    }

    /// Integer value of a numeric cell, or of text holding an integer
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Number(n) if n.fract() == 0.0 => Some(*n as i64),
            Self::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Value kept verbatim for flags such as header/footer/quote
    pub fn to_field_value(&self) -> Option<FieldValue> {
        match self {
            Self::Empty => None,
            Self::Text(s) if s.is_empty() => None,
            Self::Text(s) => Some(FieldValue::Text(s.clone())),
            Self::Number(n) => Some(FieldValue::Number(*n)),
            Self::Bool(b) => Some(FieldValue::Bool(*b)),
        }
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            Self::Empty
        } else {
            Self::Text(value.to_string())
        }
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<bool> for Cell {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&Data> for Cell {
    fn from(data: &Data) -> Self {
        match data {
            Data::Empty | Data::Error(_) => Self::Empty,
            Data::String(s) => Self::Text(s.clone()),
            Data::Int(i) => Self::Number(*i as f64),
            Data::Float(f) => Self::Number(*f),
            Data::Bool(b) => Self::Bool(*b),
            other => Self::Text(other.to_string()),
        }
    }
}

/// One sheet row; missing trailing cells read as empty
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    cells: Vec<Cell>,
}

impl Row {
    /// Create a row from cells
    pub fn new(cells: Vec<Cell>) -> Self {
        Self { cells }
    }

    /// Cell at a zero-based column index
    pub fn get(&self, column: usize) -> &Cell {
        self.cells.get(column).unwrap_or(&EMPTY)
    }

    /// Trimmed text at a column index
    pub fn text(&self, column: usize) -> Option<String> {
        self.get(column).text()
    }

    /// Set a cell, growing the row as needed
    pub fn set(&mut self, column: usize, cell: Cell) {
        if self.cells.len() <= column {
            self.cells.resize(column + 1, Cell::Empty);
        }
        self.cells[column] = cell;
    }

    /// Number of stored cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the row stores no cells
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Cell::is_empty)
    }
}

impl<C: Into<Cell>> FromIterator<C> for Row {
    fn from_iter<I: IntoIterator<Item = C>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}

/// A named grid of cells
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    /// Sheet name as shown in the workbook
    pub name: String,

    rows: Vec<Row>,
}

impl Sheet {
    /// Create an empty sheet
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
        }
    }

    /// Create a sheet from rows, the first row at index 0
    pub fn from_rows(name: impl Into<String>, rows: Vec<Row>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    /// Append a row
    pub fn push_row(&mut self, row: Row) -> &mut Self {
        self.rows.push(row);
        self
    }

    /// Row at a zero-based index
    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    /// Cell at zero-based row and column indices
    pub fn cell(&self, row: usize, column: usize) -> &Cell {
        self.rows.get(row).map_or(&EMPTY, |r| r.get(column))
    }

    /// Rows from a zero-based index onward, with their indices
    pub fn rows_from(&self, start: usize) -> impl Iterator<Item = (usize, &Row)> {
        self.rows.iter().enumerate().skip(start)
    }

    /// Number of rows
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    fn from_range(name: &str, range: &Range<Data>) -> Self {
        let (row_offset, column_offset) = range
            .start()
            .map(|(r, c)| (r as usize, c as usize))
            .unwrap_or((0, 0));

        let mut rows = vec![Row::default(); row_offset + range.height()];
        for (r, c, data) in range.cells() {
            let cell = Cell::from(data);
            if cell != Cell::Empty {
                rows[row_offset + r].set(column_offset + c, cell);
            }
        }

        Self::from_rows(name, rows)
    }
}

/// All sheets of a contract workbook, in workbook order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workbook {
    sheets: Vec<Sheet>,
}

impl Workbook {
    /// Build a workbook from sheets
    pub fn from_sheets(sheets: Vec<Sheet>) -> Self {
        Self { sheets }
    }

    /// Open a workbook file (xlsx, xlsm, xls, ods)
    pub fn open(path: &Path) -> Result<Self, WorkbookError> {
        let mut workbook = open_workbook_auto(path)
            .map_err(|e| WorkbookError::Open(path.display().to_string(), e.to_string()))?;

        let names = workbook.sheet_names().to_vec();
        let mut sheets = Vec::with_capacity(names.len());

        for name in names {
            let range = workbook
                .worksheet_range(&name)
                .map_err(|e| WorkbookError::Read(name.clone(), e.to_string()))?;
            sheets.push(Sheet::from_range(&name, &range));
        }

        tracing::debug!(path = %path.display(), sheets = sheets.len(), "Loaded workbook");

        Ok(Self { sheets })
    }

    /// Find a sheet by exact name
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    /// Find a sheet by name or fail
    pub fn require_sheet(&self, name: &str) -> Result<&Sheet, WorkbookError> {
        self.sheet(name)
            .ok_or_else(|| WorkbookError::MissingSheet(name.to_string()))
    }

    /// All sheets
    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    /// Sheet names in workbook order
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }
}

/// Workbook loading errors
#[derive(Debug, thiserror::Error)]
pub enum WorkbookError {
    #[error("Failed to open workbook {0}: {1}")]
    Open(String, String),

    #[error("Failed to read sheet '{0}': {1}")]
    Read(String, String),

    #[error("Sheet '{0}' not found in the workbook")]
    MissingSheet(String),
}
