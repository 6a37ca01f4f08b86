use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use std::fmt;

use crate::alphabet::*;
use crate::cell::*;
use crate::sheet::*;

/// Where the blank corner label of a matrix region may appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlankPlacement {
    /// Blank at the corner, then A, C, G, T in order along both headers.
    #[default]
    Corner,
    /// Any order, as long as each label appears exactly once.
    Anywhere,
}

/// First header position that did not line up.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderMismatch {
    /// Offset along the headers, 0 being the corner cell.
    pub index: usize,
    pub row_header: CellValue,
    pub col_header: CellValue,
}

impl fmt::Display for HeaderMismatch {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "header {} reads \"{}\" down the rows but \"{}\" across the columns",
            self.index, self.row_header, self.col_header
        )
    }
}

impl std::error::Error for HeaderMismatch {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Label {
    Blank,
    Base(Nucleotide),
}

impl Label {
    fn of(value: &CellValue) -> Option<Self> {
        if value.is_blank() {
            return Some(Label::Blank);
        }
        value.as_text().and_then(Nucleotide::from_symbol).map(Label::Base)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderValidator {
    placement: BlankPlacement,
}

impl HeaderValidator {
    pub fn new(placement: BlankPlacement) -> Self {
        Self { placement }
    }

    pub fn validate(&self, start_row: u32, start_col: u32, sheet: &dyn Worksheet) -> bool {
        self.check(start_row, start_col, sheet).is_ok()
    }

    /// Walks the row and column headers together from the corner cell at
    /// (start_row, start_col), consuming one expected label per position.
    pub fn check(
        &self,
        start_row: u32,
        start_col: u32,
        sheet: &dyn Worksheet,
    ) -> Result<(), HeaderMismatch> {
        let mut remaining = Nucleotide::ALL
            .into_iter()
            .map(Label::Base)
            .chain([Label::Blank])
            .collect::<FxHashSet<_>>();

        for index in 0..=ALPHABET_SIZE {
            // headers running off the end of the sheet cannot match
            let (Some(row), Some(col)) = (
                start_row.checked_add(index as u32),
                start_col.checked_add(index as u32),
            ) else {
                return Err(HeaderMismatch {
                    index,
                    row_header: CellValue::Empty,
                    col_header: CellValue::Empty,
                });
            };
            let row_header = sheet.cell(row, start_col);
            let col_header = sheet.cell(start_row, col);

            let label = match (Label::of(&row_header), Label::of(&col_header)) {
                (Some(r), Some(c)) if r == c => Some(r),
                _ => None,
            };
            let in_place = match (self.placement, label) {
                (BlankPlacement::Anywhere, _) => true,
                (BlankPlacement::Corner, Some(Label::Blank)) => index == 0,
                (BlankPlacement::Corner, Some(Label::Base(n))) => n.index() + 1 == index,
                (BlankPlacement::Corner, None) => false,
            };

            match label {
                Some(label) if in_place && remaining.remove(&label) => (),
                _ => {
                    return Err(HeaderMismatch {
                        index,
                        row_header,
                        col_header,
                    })
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet_with_headers(rows: &[&str], cols: &[&str]) -> MemorySheet {
        let mut sheet = MemorySheet::new("test");
        for (i, r) in rows.iter().enumerate() {
            sheet.write_cell(3 + i as u32, 2, CellValue::from(*r)).unwrap();
        }
        for (i, c) in cols.iter().enumerate().skip(1) {
            sheet.write_cell(3, 2 + i as u32, CellValue::from(*c)).unwrap();
        }
        sheet
    }

    const VALID: [&str; 5] = [" ", "A", "C", "G", "T"];

    #[test]
    fn test_accepts_standard_layout() {
        let sheet = sheet_with_headers(&VALID, &VALID);
        for placement in [BlankPlacement::Corner, BlankPlacement::Anywhere] {
            assert!(HeaderValidator::new(placement).validate(3, 2, &sheet));
        }
    }

    #[test]
    fn test_accepts_empty_corner() {
        let mut sheet = sheet_with_headers(&VALID, &VALID);
        sheet.write_cell(3, 2, CellValue::Empty).unwrap();
        assert!(HeaderValidator::default().validate(3, 2, &sheet));
    }

    #[test]
    fn test_rejects_wrong_offset() {
        let sheet = sheet_with_headers(&VALID, &VALID);
        assert!(!HeaderValidator::default().validate(1, 1, &sheet));
    }

    #[test]
    fn test_rejects_duplicate_symbol() {
        let headers = [" ", "A", "C", "C", "T"];
        let sheet = sheet_with_headers(&headers, &headers);
        for placement in [BlankPlacement::Corner, BlankPlacement::Anywhere] {
            let err = HeaderValidator::new(placement).check(3, 2, &sheet).unwrap_err();
            assert_eq!(err.index, 3);
        }
    }

    #[test]
    fn test_rejects_missing_symbol() {
        let headers = [" ", "A", "C", "G", "U"];
        let sheet = sheet_with_headers(&headers, &headers);
        for placement in [BlankPlacement::Corner, BlankPlacement::Anywhere] {
            let err = HeaderValidator::new(placement).check(3, 2, &sheet).unwrap_err();
            assert_eq!(err.index, 4);
            assert_eq!(err.row_header, CellValue::from("U"));
        }
    }

    #[test]
    fn test_blank_away_from_corner() {
        let headers = ["A", " ", "C", "G", "T"];
        let sheet = sheet_with_headers(&headers, &headers);
        let err = HeaderValidator::new(BlankPlacement::Corner)
            .check(3, 2, &sheet)
            .unwrap_err();
        assert_eq!(err.index, 0);
        assert!(HeaderValidator::new(BlankPlacement::Anywhere).validate(3, 2, &sheet));
    }

    #[test]
    fn test_headers_past_sheet_end() {
        let sheet = sheet_with_headers(&VALID, &VALID);
        let validator = HeaderValidator::default();
        assert!(!validator.validate(u32::MAX, 1, &sheet));
        assert!(!validator.validate(1, u32::MAX - 2, &sheet));

        let err = HeaderValidator::new(BlankPlacement::Anywhere)
            .check(u32::MAX, 2, &sheet)
            .unwrap_err();
        assert_eq!(err.index, 1);
        assert_eq!(err.row_header, CellValue::Empty);
    }

    #[test]
    fn test_rejects_mismatched_axes() {
        let cols = [" ", "A", "G", "C", "T"];
        let sheet = sheet_with_headers(&VALID, &cols);
        let err = HeaderValidator::new(BlankPlacement::Anywhere)
            .check(3, 2, &sheet)
            .unwrap_err();
        assert_eq!(err.index, 2);
        assert_eq!(err.row_header, CellValue::from("C"));
        assert_eq!(err.col_header, CellValue::from("G"));
    }

    #[test]
    fn test_placement_of_reordered_headers() {
        // same permutation on both axes: only the loose placement accepts it
        let headers = [" ", "T", "G", "C", "A"];
        let sheet = sheet_with_headers(&headers, &headers);
        assert!(HeaderValidator::new(BlankPlacement::Anywhere).validate(3, 2, &sheet));
        assert!(!HeaderValidator::new(BlankPlacement::Corner).validate(3, 2, &sheet));
    }
}
