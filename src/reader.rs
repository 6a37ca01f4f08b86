use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use std::fmt;

use crate::alphabet::*;
use crate::cell::*;
use crate::errors::*;
use crate::matrix::*;
use crate::sheet::*;
use crate::validate::*;

/// Which of the two matrices of a subject a failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Observed,
    Expected,
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Region::Observed => write!(f, "observed matrix"),
            Region::Expected => write!(f, "expected matrix"),
        }
    }
}

/// Why a worksheet did not yield a matrix pair. These never abort a run.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ReadFailure {
    #[error("Unexpected headers in the {region}: {mismatch}")]
    Header {
        region: Region,
        mismatch: HeaderMismatch,
    },

    #[error("Cell ({row}, {col}) in the {region} is not a number: \"{value}\"")]
    CellCoercion {
        region: Region,
        row: u32,
        col: u32,
        value: CellValue,
    },

    #[error("Cell ({row}, {col}) on the diagonal of the {region} is {value}, expected 0")]
    DiagonalCorruption {
        region: Region,
        row: u32,
        col: u32,
        value: f64,
    },

    #[error("The {region} anchored at ({row}, {col}) runs past the end of the worksheet")]
    OutOfRange { region: Region, row: u32, col: u32 },
}

impl ReadFailure {
    fn with_region(self, region: Region) -> Self {
        use ReadFailure::*;
        match self {
            Header { mismatch, .. } => Header { region, mismatch },
            CellCoercion { row, col, value, .. } => CellCoercion {
                region,
                row,
                col,
                value,
            },
            DiagonalCorruption { row, col, value, .. } => DiagonalCorruption {
                region,
                row,
                col,
                value,
            },
            OutOfRange { row, col, .. } => OutOfRange { region, row, col },
        }
    }
}

/// Top left (corner) cell of a matrix region, 1-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anchor {
    pub row: u32,
    pub col: u32,
}

impl Anchor {
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }
}

/// Positions of the observed and expected regions within each worksheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    pub observed: Anchor,
    pub expected: Anchor,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            observed: Anchor::new(18, 1),
            expected: Anchor::new(18, 7),
        }
    }
}

/// Reads one matrix body after its headers have been validated.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatrixReader {
    policy: CoercionPolicy,
}

impl MatrixReader {
    pub fn new(policy: CoercionPolicy) -> Self {
        Self { policy }
    }

    /// Reads the 4x4 body below and to the right of the corner cell at
    /// (start_row, start_col). Does not look at the headers.
    pub fn read_matrix(
        &self,
        start_row: u32,
        start_col: u32,
        sheet: &dyn Worksheet,
    ) -> std::result::Result<SubstitutionMatrix, ReadFailure> {
        let span = ALPHABET_SIZE as u32;
        if start_row.checked_add(span).is_none() || start_col.checked_add(span).is_none() {
            return Err(ReadFailure::OutOfRange {
                region: Region::Observed,
                row: start_row,
                col: start_col,
            });
        }
        let mut matrix = SubstitutionMatrix::new();

        for source in Nucleotide::ALL {
            for dest in Nucleotide::ALL {
                let row = start_row + source.index() as u32 + 1;
                let col = start_col + dest.index() as u32 + 1;
                let raw = sheet.cell(row, col);

                let Some(amount) = self.policy.coerce(&raw) else {
                    return Err(ReadFailure::CellCoercion {
                        region: Region::Observed,
                        row,
                        col,
                        value: raw,
                    });
                };

                if source == dest && amount != 0.0 {
                    return Err(ReadFailure::DiagonalCorruption {
                        region: Region::Observed,
                        row,
                        col,
                        value: amount,
                    });
                }

                matrix.increment_substitution(source, dest, amount);
            }
        }

        Ok(matrix)
    }
}

/// Strategy for pulling a matrix pair out of one worksheet.
pub trait SubjectReader {
    fn read(&self, sheet: &dyn Worksheet) -> std::result::Result<MatrixPair, ReadFailure>;
}

/// Reads an observed and an expected matrix at fixed anchors, validating both
/// header regions first.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObservedExpectedReader {
    pub layout: Layout,
    pub validator: HeaderValidator,
    pub reader: MatrixReader,
}

impl ObservedExpectedReader {
    pub fn new(layout: Layout, validator: HeaderValidator, reader: MatrixReader) -> Self {
        Self {
            layout,
            validator,
            reader,
        }
    }

    pub fn validate_headers(
        &self,
        sheet: &dyn Worksheet,
    ) -> std::result::Result<(), ReadFailure> {
        for (region, anchor) in [
            (Region::Observed, self.layout.observed),
            (Region::Expected, self.layout.expected),
        ] {
            self.validator
                .check(anchor.row, anchor.col, sheet)
                .map_err(|mismatch| ReadFailure::Header { region, mismatch })?;
        }
        Ok(())
    }

    /// The expected matrix is only read once the observed matrix succeeded.
    pub fn read_observed_and_expected(
        &self,
        sheet: &dyn Worksheet,
    ) -> std::result::Result<MatrixPair, ReadFailure> {
        let Layout { observed, expected } = self.layout;

        let observed = self
            .reader
            .read_matrix(observed.row, observed.col, sheet)
            .map_err(|e| e.with_region(Region::Observed))?;
        let expected = self
            .reader
            .read_matrix(expected.row, expected.col, sheet)
            .map_err(|e| e.with_region(Region::Expected))?;

        Ok(MatrixPair { observed, expected })
    }
}

impl SubjectReader for ObservedExpectedReader {
    fn read(&self, sheet: &dyn Worksheet) -> std::result::Result<MatrixPair, ReadFailure> {
        self.validate_headers(sheet)?;
        self.read_observed_and_expected(sheet)
    }
}

/// A worksheet that could not be read, by title.
#[derive(Debug, Clone, PartialEq)]
pub struct Failure {
    pub subject: String,
    pub reason: ReadFailure,
}

/// Matrix pairs of every readable worksheet plus the ones that were skipped,
/// both in workbook order.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub subjects: Vec<(String, MatrixPair)>,
    pub failures: Vec<Failure>,
}

/// Runs `reader` over every worksheet of `workbook`.
pub fn extract<W: Workbook>(workbook: &W, reader: &dyn SubjectReader) -> Result<Extraction> {
    let mut res = Extraction::default();

    for name in workbook.sheet_names() {
        let sheet = workbook.worksheet(&name)?;

        match reader.read(sheet) {
            Ok(pair) => {
                debug!("Read matrices from worksheet \"{}\"", name);
                res.subjects.push((name, pair));
            }
            Err(reason) => {
                warn!("Skipping worksheet \"{}\": {}", name, reason);
                res.failures.push(Failure {
                    subject: name,
                    reason,
                });
            }
        }
    }

    info!(
        "Extracted {} subject(s), {} worksheet(s) failed",
        res.subjects.len(),
        res.failures.len()
    );
    Ok(res)
}
