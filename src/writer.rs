use crate::alphabet::*;
use crate::cell::*;
use crate::errors::*;
use crate::reader::Failure;
use crate::results::*;
use crate::sheet::*;

/// `base + by`, or `None` past the last addressable row or column.
fn offset(base: u32, by: usize) -> Option<u32> {
    u32::try_from(by).ok().and_then(|by| base.checked_add(by))
}

/// Strategy for laying out a result set on a worksheet.
pub trait ResultWriter {
    fn write(&mut self, results: &ResultSet, sheet: &mut dyn SheetWriter) -> Result<()>;
}

/// One header row of pair labels, then one row per subject.
///
/// ```text
/// Virus | A -> C | A -> G | A -> T | C -> A | ... | T -> G
/// TYLCV |  0.12  | -0.03  |  ...
/// ```
#[derive(Debug, Clone)]
pub struct BiasTableWriter {
    subject_header: String,
    header_row: u32,
    header_col: u32,
}

impl BiasTableWriter {
    pub fn new(subject_header: impl Into<String>) -> Self {
        Self {
            subject_header: subject_header.into(),
            header_row: 1,
            header_col: 1,
        }
    }

    /// Moves the top left corner of the table.
    pub fn at(mut self, header_row: u32, header_col: u32) -> Self {
        self.header_row = header_row;
        self.header_col = header_col;
        self
    }

    fn write_headers(&self, sheet: &mut dyn SheetWriter) -> Result<()> {
        sheet.write_cell(
            self.header_row,
            self.header_col,
            CellValue::from(self.subject_header.as_str()),
        )?;
        for (i, pair) in pairs().enumerate() {
            sheet.write_cell(
                self.header_row,
                self.header_col + i as u32 + 1,
                CellValue::from(pair.label()),
            )?;
        }
        Ok(())
    }

    fn write_subject(
        &self,
        row: u32,
        subject: &str,
        biases: &PairBiases,
        sheet: &mut dyn SheetWriter,
    ) -> Result<()> {
        sheet.write_cell(row, self.header_col, CellValue::from(subject))?;
        for (i, (_, value)) in biases.iter().enumerate() {
            sheet.write_cell(row, self.header_col + i as u32 + 1, CellValue::from(value))?;
        }
        Ok(())
    }
}

impl Default for BiasTableWriter {
    fn default() -> Self {
        Self::new("Virus")
    }
}

impl ResultWriter for BiasTableWriter {
    fn write(&mut self, results: &ResultSet, sheet: &mut dyn SheetWriter) -> Result<()> {
        // the whole table must fit before anything is written
        if offset(self.header_row, results.len()).is_none()
            || offset(self.header_col, PAIR_COUNT).is_none()
        {
            return Err(Error::CellOutOfRange {
                row: self.header_row,
                col: self.header_col,
            });
        }

        self.write_headers(sheet)?;
        for (i, (subject, biases)) in results.iter().enumerate() {
            self.write_subject(self.header_row + i as u32 + 1, subject, biases, sheet)?;
        }
        Ok(())
    }
}

/// Lists the subjects that could not be read and why.
#[derive(Debug, Clone, Default)]
pub struct FailureListWriter;

impl FailureListWriter {
    pub fn write(&self, failures: &[Failure], sheet: &mut dyn SheetWriter) -> Result<()> {
        sheet.write_cell(1, 1, CellValue::from("Failed"))?;
        sheet.write_cell(1, 2, CellValue::from("Reason"))?;
        for (i, failure) in failures.iter().enumerate() {
            let row = i as u32 + 2;
            sheet.write_cell(row, 1, CellValue::from(failure.subject.as_str()))?;
            sheet.write_cell(row, 2, CellValue::from(failure.reason.to_string()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::{ReadFailure, Region};
    use crate::validate::HeaderMismatch;

    fn results() -> ResultSet {
        let mut set = ResultSet::new();
        let mut values = [Some(0.25); PAIR_COUNT];
        values[4] = None;
        set.push("Beet curly top virus", PairBiases::from_values(values));
        set.push(
            "Tomato yellow leaf curl virus",
            PairBiases::from_values([Some(-1.0); PAIR_COUNT]),
        );
        set
    }

    #[test]
    fn test_header_row() {
        let mut sheet = MemorySheet::new("Results");
        BiasTableWriter::default().write(&results(), &mut sheet).unwrap();

        let header = sheet.rows()[0]
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>();
        assert_eq!(
            header,
            vec![
                "Virus", "A -> C", "A -> G", "A -> T", "C -> A", "C -> G", "C -> T", "G -> A",
                "G -> C", "G -> T", "T -> A", "T -> C", "T -> G",
            ]
        );
    }

    #[test]
    fn test_subject_rows_in_order() {
        let mut sheet = MemorySheet::new("Results");
        BiasTableWriter::new("Subject")
            .write(&results(), &mut sheet)
            .unwrap();

        assert_eq!(sheet.cell(1, 1), CellValue::from("Subject"));
        assert_eq!(sheet.cell(2, 1), CellValue::from("Beet curly top virus"));
        assert_eq!(sheet.cell(2, 2), CellValue::Number(0.25));
        // C -> G is invalid for the first subject
        assert_eq!(sheet.cell(2, 6), CellValue::Empty);
        assert_eq!(sheet.cell(3, 1), CellValue::from("Tomato yellow leaf curl virus"));
        assert_eq!(sheet.cell(3, 13), CellValue::Number(-1.0));
        assert_eq!(sheet.row_count(), 3);
    }

    #[test]
    fn test_offset_table() {
        let mut sheet = MemorySheet::new("Results");
        BiasTableWriter::default()
            .at(5, 3)
            .write(&results(), &mut sheet)
            .unwrap();

        assert_eq!(sheet.cell(5, 3), CellValue::from("Virus"));
        assert_eq!(sheet.cell(5, 4), CellValue::from("A -> C"));
        assert_eq!(sheet.cell(7, 3), CellValue::from("Tomato yellow leaf curl virus"));
    }

    #[test]
    fn test_table_past_sheet_end() {
        let mut sheet = MemorySheet::new("Results");
        let err = BiasTableWriter::default()
            .at(1, u32::MAX - 5)
            .write(&results(), &mut sheet)
            .unwrap_err();
        assert!(matches!(err, Error::CellOutOfRange { row: 1, .. }));
        assert_eq!(sheet.row_count(), 0);

        let err = BiasTableWriter::default()
            .at(u32::MAX, 1)
            .write(&results(), &mut MemorySheet::new("Results"))
            .unwrap_err();
        assert!(matches!(err, Error::CellOutOfRange { row: u32::MAX, col: 1 }));
    }

    #[test]
    fn test_failure_list() {
        let failures = vec![Failure {
            subject: "Sheet3".to_owned(),
            reason: ReadFailure::Header {
                region: Region::Observed,
                mismatch: HeaderMismatch {
                    index: 1,
                    row_header: CellValue::Empty,
                    col_header: CellValue::from("A"),
                },
            },
        }];
        let mut sheet = MemorySheet::new("Failures");
        FailureListWriter.write(&failures, &mut sheet).unwrap();

        assert_eq!(sheet.cell(2, 1), CellValue::from("Sheet3"));
        let reason = sheet.cell(2, 2).to_string();
        assert!(reason.contains("observed matrix"), "{reason}");
    }
}
