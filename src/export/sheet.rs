//! Serializable workbook document model
//!
//! There is no binary spreadsheet writer here: the export artifact is the
//! document model itself, serialized as JSON. The model keeps the pieces a
//! spreadsheet consumer needs to render the tabular export faithfully:
//! sheet title, styled cells, and auto-sized column widths.

use crate::core::error::ExportError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The renderable value of one cell
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CellValue {
    /// Blank cell
    Empty,

    /// Plain text
    Text { text: String },

    /// Hyperlink-style rich value
    Link { href: String, text: String },
}

impl CellValue {
    /// Plain text cell value
    pub fn text(text: impl Into<String>) -> Self {
        CellValue::Text { text: text.into() }
    }

    /// Character width of the rendered value, for column auto-sizing
    pub fn display_width(&self) -> usize {
        match self {
            CellValue::Empty => 0,
            CellValue::Text { text } => text.chars().count(),
            CellValue::Link { text, .. } => text.chars().count(),
        }
    }
}

/// Border line style
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BorderStyle {
    Thin,
}

/// Visual style applied to a cell
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CellStyle {
    #[serde(default)]
    pub bold: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<u8>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_bottom: Option<BorderStyle>,
}

impl CellStyle {
    /// The header row style: bold, size 14, thin bottom border
    pub fn header() -> Self {
        Self {
            bold: true,
            font_size: Some(14),
            border_bottom: Some(BorderStyle::Thin),
        }
    }
}

/// One cell: a value plus an optional style
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cell {
    pub value: CellValue,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<CellStyle>,
}

impl Cell {
    /// Unstyled cell
    pub fn new(value: CellValue) -> Self {
        Self { value, style: None }
    }

    /// Styled cell
    pub fn styled(value: CellValue, style: CellStyle) -> Self {
        Self {
            value,
            style: Some(style),
        }
    }
}

/// One row of cells
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Row {
    pub cells: Vec<Cell>,
}

/// A single worksheet: title, rows, and per-column widths
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Worksheet {
    pub title: String,
    pub rows: Vec<Row>,

    /// Column widths in characters, filled in by
    /// [`Worksheet::auto_size_columns`]
    #[serde(default)]
    pub column_widths: Vec<usize>,
}

impl Worksheet {
    /// Create an empty worksheet
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            rows: Vec::new(),
            column_widths: Vec::new(),
        }
    }

    /// Append a row of cells
    pub fn push_row(&mut self, cells: Vec<Cell>) {
        self.rows.push(Row { cells });
    }

    /// Number of columns in the widest row
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(|row| row.cells.len()).max().unwrap_or(0)
    }

    /// Size every used column to its longest cell value
    pub fn auto_size_columns(&mut self) {
        let columns = self.column_count();
        self.column_widths = (0..columns)
            .map(|col| {
                self.rows
                    .iter()
                    .filter_map(|row| row.cells.get(col))
                    .map(|cell| cell.value.display_width())
                    .max()
                    .unwrap_or(0)
            })
            .collect();
    }
}

/// A workbook with one or more worksheets
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Workbook {
    pub sheets: Vec<Worksheet>,
}

impl Workbook {
    /// Create a workbook holding a single worksheet
    pub fn single(sheet: Worksheet) -> Self {
        Self {
            sheets: vec![sheet],
        }
    }

    /// Serialize the workbook to a file as JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ExportError> {
        let path = path.as_ref();
        let bytes = serde_json::to_vec_pretty(self)?;
        std::fs::write(path, bytes).map_err(|source| ExportError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_size_columns() {
        let mut sheet = Worksheet::new("Test");
        sheet.push_row(vec![
            Cell::styled(CellValue::text("Name"), CellStyle::header()),
            Cell::styled(CellValue::text("Price"), CellStyle::header()),
        ]);
        sheet.push_row(vec![
            Cell::new(CellValue::text("Something long")),
            Cell::new(CellValue::text("1.00")),
        ]);
        sheet.auto_size_columns();
        assert_eq!(sheet.column_widths, vec![14, 5]);
    }

    #[test]
    fn test_column_count_uses_widest_row() {
        let mut sheet = Worksheet::new("Test");
        sheet.push_row(vec![Cell::new(CellValue::Empty)]);
        sheet.push_row(vec![
            Cell::new(CellValue::Empty),
            Cell::new(CellValue::text("x")),
        ]);
        assert_eq!(sheet.column_count(), 2);
    }

    #[test]
    fn test_link_width_uses_text() {
        let link = CellValue::Link {
            href: "#".to_string(),
            text: "ab".to_string(),
        };
        assert_eq!(link.display_width(), 2);
    }

    #[test]
    fn test_workbook_json_roundtrip() {
        let mut sheet = Worksheet::new("Skeletons");
        sheet.push_row(vec![Cell::new(CellValue::text("A"))]);
        let workbook = Workbook::single(sheet);

        let json = serde_json::to_string(&workbook).unwrap();
        let restored: Workbook = serde_json::from_str(&json).unwrap();
        assert_eq!(workbook, restored);
    }
}
