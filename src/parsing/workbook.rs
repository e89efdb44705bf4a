//! In-memory spreadsheet model backed by calamine.
//!
//! A submission workbook is read completely when opened and the file is closed
//! before any parsing starts. Cells are kept as the text a person sees in the
//! sheet: whole numbers lose their trailing `.0` and empty or whitespace-only
//! cells are not stored at all.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, Reader};
use thiserror::Error;
use tracing::debug;

use crate::core::types::CellCoord;
use crate::utils::validation::{format_number, normalize_cell_text};

#[derive(Error, Debug)]
pub enum WorkbookError {
    #[error("Failed to open workbook {}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    #[error("Failed to read worksheet '{name}'")]
    Sheet {
        name: String,
        #[source]
        source: calamine::Error,
    },
}

/// A single worksheet, addressed with 1-based [`CellCoord`]s
#[derive(Debug, Clone, Default)]
pub struct Worksheet {
    name: String,
    cells: HashMap<CellCoord, String>,
}

impl Worksheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cells: HashMap::new(),
        }
    }

    /// Build a sheet from rows of text starting at A1. Empty strings are blank cells.
    pub fn from_rows<R, S>(name: impl Into<String>, rows: R) -> Self
    where
        R: IntoIterator,
        R::Item: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut sheet = Self::new(name);
        for (r, row) in rows.into_iter().enumerate() {
            for (c, value) in row.into_iter().enumerate() {
                sheet.set(cell_at(c, r), value.as_ref());
            }
        }
        sheet
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Store text at `coord`. Blank text clears the cell.
    pub fn set(&mut self, coord: CellCoord, value: &str) {
        match normalize_cell_text(value) {
            Some(text) => {
                self.cells.insert(coord, text);
            }
            None => {
                self.cells.remove(&coord);
            }
        }
    }

    /// Builder form of [`Worksheet::set`]
    #[must_use]
    pub fn with_cell(mut self, coord: CellCoord, value: &str) -> Self {
        self.set(coord, value);
        self
    }

    /// Text of the cell at `coord`, or None if the cell is blank
    #[must_use]
    pub fn value(&self, coord: CellCoord) -> Option<&str> {
        self.cells.get(&coord).map(String::as_str)
    }

    #[must_use]
    pub fn is_blank(&self, coord: CellCoord) -> bool {
        !self.cells.contains_key(&coord)
    }

    /// Number of non-blank cells
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Convert 0-based grid offsets to a 1-based coordinate
fn cell_at(column: usize, row: usize) -> CellCoord {
    let column = u32::try_from(column + 1).unwrap_or(u32::MAX);
    let row = u32::try_from(row + 1).unwrap_or(u32::MAX);
    CellCoord::new(column, row)
}

/// Text shown for a calamine cell value, None for blank cells
fn cell_text(data: &Data) -> Option<String> {
    match data {
        Data::Empty => None,
        Data::String(s) => normalize_cell_text(s),
        Data::Float(f) => Some(format_number(*f)),
        Data::Int(i) => Some(i.to_string()),
        Data::Bool(b) => Some(b.to_string()),
        other => normalize_cell_text(&other.to_string()),
    }
}

/// All worksheets of one submission document
#[derive(Debug, Clone, Default)]
pub struct Workbook {
    sheets: Vec<Worksheet>,
}

impl Workbook {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read every worksheet of an xlsx/xlsm/xls/ods file into memory.
    ///
    /// # Errors
    ///
    /// Returns `WorkbookError::Open` if the file cannot be opened or is not a
    /// spreadsheet, or `WorkbookError::Sheet` if a worksheet cannot be read.
    pub fn open(path: &Path) -> Result<Self, WorkbookError> {
        let mut reader = open_workbook_auto(path).map_err(|source| WorkbookError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let mut workbook = Self::new();
        for name in reader.sheet_names() {
            let range = reader
                .worksheet_range(&name)
                .map_err(|source| WorkbookError::Sheet {
                    name: name.clone(),
                    source,
                })?;

            let mut sheet = Worksheet::new(name.as_str());
            // Range positions are relative to its first used cell
            let (row_offset, col_offset) = range.start().unwrap_or((0, 0));
            for (r, c, data) in range.used_cells() {
                if let Some(text) = cell_text(data) {
                    let coord = cell_at(
                        c + col_offset as usize,
                        r + row_offset as usize,
                    );
                    sheet.cells.insert(coord, text);
                }
            }

            debug!(sheet = %name, cells = sheet.len(), "Loaded worksheet");
            workbook.sheets.push(sheet);
        }

        Ok(workbook)
    }

    /// Builder for in-memory workbooks
    #[must_use]
    pub fn with_sheet(mut self, sheet: Worksheet) -> Self {
        self.add_sheet(sheet);
        self
    }

    /// Add a sheet, replacing any existing sheet with the same name
    pub fn add_sheet(&mut self, sheet: Worksheet) {
        self.sheets.retain(|s| s.name != sheet.name);
        self.sheets.push(sheet);
    }

    #[must_use]
    pub fn sheet(&self, name: &str) -> Option<&Worksheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    #[must_use]
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows_is_one_based() {
        let sheet = Worksheet::from_rows("S", [["a", "", "c"], ["", "e", " "]]);
        assert_eq!(sheet.value(CellCoord::new(1, 1)), Some("a"));
        assert_eq!(sheet.value(CellCoord::new(3, 1)), Some("c"));
        assert_eq!(sheet.value(CellCoord::new(2, 2)), Some("e"));
        assert!(sheet.is_blank(CellCoord::new(2, 1)));
        assert!(sheet.is_blank(CellCoord::new(3, 2)));
        assert_eq!(sheet.len(), 3);
    }

    #[test]
    fn test_set_blank_clears() {
        let mut sheet = Worksheet::new("S").with_cell(CellCoord::new(2, 2), "x");
        assert!(!sheet.is_blank(CellCoord::new(2, 2)));
        sheet.set(CellCoord::new(2, 2), "  ");
        assert!(sheet.is_empty());
    }

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(&Data::Empty), None);
        assert_eq!(cell_text(&Data::Float(123_456.0)), Some("123456".to_string()));
        assert_eq!(cell_text(&Data::Float(0.5)), Some("0.5".to_string()));
        assert_eq!(cell_text(&Data::Int(7)), Some("7".to_string()));
        assert_eq!(
            cell_text(&Data::String(" Pool1 ".to_string())),
            Some("Pool1".to_string())
        );
        assert_eq!(cell_text(&Data::String("  ".to_string())), None);
    }

    #[test]
    fn test_workbook_sheet_lookup() {
        let workbook = Workbook::new()
            .with_sheet(Worksheet::new("General Information"))
            .with_sheet(Worksheet::new("Pooled Libraries"))
            .with_sheet(Worksheet::new("Pooled Libraries").with_cell(CellCoord::new(1, 1), "x"));
        assert_eq!(
            workbook.sheet_names(),
            vec!["General Information", "Pooled Libraries"]
        );
        assert_eq!(workbook.sheet("Pooled Libraries").unwrap().len(), 1);
        assert!(workbook.sheet("Individual Libraries").is_none());
    }

    #[test]
    fn test_open_missing_file() {
        let result = Workbook::open(Path::new("/nonexistent/submission.xlsx"));
        assert!(matches!(result, Err(WorkbookError::Open { .. })));
    }
}
