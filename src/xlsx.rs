use calamine::{open_workbook_auto, Data, Range, Reader};
use log::debug;

use std::path::Path;

use crate::cell::*;
use crate::errors::*;
use crate::sheet::*;

/// A spreadsheet file (xlsx, xlsm, xls or ods) loaded into memory.
pub struct XlsxWorkbook {
    sheets: Vec<XlsxSheet>,
}

pub struct XlsxSheet {
    title: String,
    range: Range<Data>,
}

impl XlsxWorkbook {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = path.display().to_string();
        let workbook_err = |e: calamine::Error| Error::Workbook {
            file: file.clone(),
            source: Box::new(e),
        };

        let mut workbook = open_workbook_auto(path).map_err(workbook_err)?;
        let mut sheets = Vec::new();

        for title in workbook.sheet_names() {
            let range = workbook.worksheet_range(&title).map_err(workbook_err)?;
            debug!("Loaded worksheet \"{}\" ({:?} cells)", title, range.get_size());
            sheets.push(XlsxSheet { title, range });
        }

        Ok(Self { sheets })
    }
}

impl Workbook for XlsxWorkbook {
    type Sheet = XlsxSheet;

    fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|s| s.title.clone()).collect()
    }

    fn worksheet(&self, name: &str) -> Result<&XlsxSheet> {
        self.sheets
            .iter()
            .find(|s| s.title == name)
            .ok_or_else(|| Error::WorksheetNotFound(name.to_owned()))
    }
}

impl Worksheet for XlsxSheet {
    fn title(&self) -> &str {
        &self.title
    }

    fn cell(&self, row: u32, col: u32) -> CellValue {
        if row == 0 || col == 0 {
            return CellValue::Empty;
        }
        // calamine positions are absolute and 0-indexed
        self.range
            .get_value((row - 1, col - 1))
            .map(cell_value)
            .unwrap_or_default()
    }
}

fn cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::Int(x) => CellValue::Number(*x as f64),
        Data::Float(x) => CellValue::Number(*x),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::String(s) => CellValue::Text(s.clone()),
        Data::DateTime(d) => CellValue::Number(d.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Text(e.to_string()),
    }
}

/// Writes every sheet, in order, to a new xlsx file at `path`.
pub fn save_xlsx(path: impl AsRef<Path>, sheets: &[MemorySheet]) -> Result<()> {
    let path = path.as_ref();
    let file = path.display().to_string();
    let write_err = |e: rust_xlsxwriter::XlsxError| Error::WriteWorkbook {
        file: file.clone(),
        source: Box::new(e),
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| Error::file_io(&file, e))?;
    }

    let mut workbook = rust_xlsxwriter::Workbook::new();

    for sheet in sheets {
        let out = workbook.add_worksheet();
        out.set_name(sheet.title()).map_err(write_err)?;

        for (ri, values) in sheet.rows().iter().enumerate() {
            for (ci, value) in values.iter().enumerate() {
                let row = ri as u32;
                let col = u16::try_from(ci).map_err(|_| Error::CellOutOfRange {
                    row: row + 1,
                    col: ci as u32 + 1,
                })?;

                match value {
                    CellValue::Empty => continue,
                    CellValue::Number(x) => out.write_number(row, col, *x),
                    CellValue::Text(s) => out.write_string(row, col, s.as_str()),
                    CellValue::Bool(b) => out.write_boolean(row, col, *b),
                }
                .map_err(write_err)?;
            }
        }
    }

    workbook.save(path).map_err(write_err)?;
    debug!("Saved {} worksheet(s) to {}", sheets.len(), file);
    Ok(())
}
