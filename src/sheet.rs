//! Cell-addressed access to workbooks.
//!
//! Rows and columns are 1-indexed everywhere, matching what spreadsheet
//! users see. Cells that were never written read back as [`CellValue::Empty`].

use crate::cell::*;
use crate::errors::*;

pub trait Worksheet {
    fn title(&self) -> &str;

    fn cell(&self, row: u32, col: u32) -> CellValue;
}

pub trait Workbook {
    type Sheet: Worksheet;

    /// Worksheet titles in workbook order.
    fn sheet_names(&self) -> Vec<String>;

    fn worksheet(&self, name: &str) -> Result<&Self::Sheet>;
}

pub trait SheetWriter {
    fn write_cell(&mut self, row: u32, col: u32, value: CellValue) -> Result<()>;
}

/// A worksheet held entirely in memory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemorySheet {
    title: String,
    rows: Vec<Vec<CellValue>>,
}

impl MemorySheet {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            rows: Vec::new(),
        }
    }

    /// Builds a sheet whose first row and column start at cell (1, 1).
    pub fn from_rows(title: impl Into<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self {
            title: title.into(),
            rows,
        }
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Copies `block` into the sheet with its top left corner at (row, col).
    pub fn put_block(&mut self, row: u32, col: u32, block: &[Vec<CellValue>]) -> Result<()> {
        for (ri, values) in block.iter().enumerate() {
            for (ci, value) in values.iter().enumerate() {
                self.write_cell(row + ri as u32, col + ci as u32, value.clone())?;
            }
        }
        Ok(())
    }

    /// Rows as stored, starting from row 1.
    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

impl Worksheet for MemorySheet {
    fn title(&self) -> &str {
        &self.title
    }

    fn cell(&self, row: u32, col: u32) -> CellValue {
        if row == 0 || col == 0 {
            return CellValue::Empty;
        }
        self.rows
            .get(row as usize - 1)
            .and_then(|r| r.get(col as usize - 1))
            .cloned()
            .unwrap_or_default()
    }
}

impl SheetWriter for MemorySheet {
    fn write_cell(&mut self, row: u32, col: u32, value: CellValue) -> Result<()> {
        if row == 0 || col == 0 {
            return Err(Error::CellOutOfRange { row, col });
        }
        let (ri, ci) = (row as usize - 1, col as usize - 1);

        if self.rows.len() <= ri {
            self.rows.resize_with(ri + 1, Vec::new);
        }
        let r = &mut self.rows[ri];
        if r.len() <= ci {
            r.resize(ci + 1, CellValue::Empty);
        }
        r[ci] = value;
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryWorkbook {
    sheets: Vec<MemorySheet>,
}

impl MemoryWorkbook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a sheet. A sheet with the same title is replaced in place.
    pub fn add_sheet(&mut self, sheet: MemorySheet) {
        match self.sheets.iter_mut().find(|s| s.title == sheet.title) {
            Some(existing) => *existing = sheet,
            None => self.sheets.push(sheet),
        }
    }

    pub fn sheets(&self) -> &[MemorySheet] {
        &self.sheets
    }
}

impl Workbook for MemoryWorkbook {
    type Sheet = MemorySheet;

    fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|s| s.title.clone()).collect()
    }

    fn worksheet(&self, name: &str) -> Result<&MemorySheet> {
        self.sheets
            .iter()
            .find(|s| s.title == name)
            .ok_or_else(|| Error::WorksheetNotFound(name.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_then_read() {
        let mut sheet = MemorySheet::new("Sheet1");
        sheet.write_cell(3, 2, CellValue::from(1.5)).unwrap();

        assert_eq!(sheet.cell(3, 2), CellValue::Number(1.5));
        assert_eq!(sheet.cell(1, 1), CellValue::Empty);
        assert_eq!(sheet.cell(10, 10), CellValue::Empty);
        assert_eq!(sheet.cell(0, 1), CellValue::Empty);
        assert_eq!(sheet.row_count(), 3);
    }

    #[test]
    fn test_zero_index_is_rejected() {
        let mut sheet = MemorySheet::new("Sheet1");
        assert!(matches!(
            sheet.write_cell(0, 1, CellValue::Empty),
            Err(Error::CellOutOfRange { row: 0, col: 1 })
        ));
    }

    #[test]
    fn test_workbook_lookup() {
        let mut book = MemoryWorkbook::new();
        book.add_sheet(MemorySheet::new("b"));
        book.add_sheet(MemorySheet::new("a"));
        book.add_sheet(MemorySheet::new("b"));

        assert_eq!(book.sheet_names(), vec!["b", "a"]);
        assert_eq!(book.worksheet("a").unwrap().title(), "a");
        assert!(matches!(
            book.worksheet("c"),
            Err(Error::WorksheetNotFound(name)) if name == "c"
        ));
    }
}
