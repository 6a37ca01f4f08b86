//! Rust library for nucleotide substitution bias tables and FASTA header cleanup.
//!
//! # Overview
//! subbias reads paired *observed* and *expected* nucleotide substitution matrices
//! out of spreadsheet worksheets, scores every substitution with a bias formula and
//! writes one row of scores per worksheet to a results workbook.
//!
//! It also ships a FASTA header renamer for files downloaded from sequence databases,
//! see [`fasta`].
//!
//! ## Worksheet layout
//! Each worksheet describes one *subject* (usually a virus). It holds two matrix
//! regions, each anchored at a configurable corner cell:
//! ```text
//!    |  A   C   G   T
//! ---+----------------
//!  A |  0   N   N   N
//!  C |  N   0   N   N
//!  G |  N   N   0   N
//!  T |  N   N   N   0
//! ```
//! The corner is blank, the headers run A, C, G, T down the rows and across the
//! columns, and the diagonal is zero (or blank, or `-`). By default the observed
//! matrix is anchored at row 18, column 1 and the expected matrix at row 18,
//! column 7.
//!
//! Worksheets whose headers do not line up, whose diagonal is not zero, or whose
//! body holds text that is not a number are skipped and reported; they never stop a
//! run.
//!
//! ## Bias formulas
//! Every off-diagonal pair `X -> Y` is scored with one [`Formula`]:
//! * [`NormalizedBias`]: `(o - e) / e`
//! * [`AlternateNormalizedBias`]: `(o - e) / (o² + e²)`, or `-2` when `o + e = 0`
//! * [`AbsoluteDifference`]: `|o - e|`
//!
//! Pairs whose inputs are not numbers have no score, and neither do pairs whose
//! expected value is zero unless the formula is the alternate one. Scores can
//! then be [standardized](standardize) over the whole workbook.
//!
//! ## Output
//! The results worksheet has one header row, `Virus | A -> C | A -> G | ... | T -> G`,
//! and one row per subject in workbook order.
//!
//! ## Example
//! ```no_run
//! use subbias::*;
//!
//! let mut config = Config::default();
//! config.bias.input = "data/matrices.xlsx".into();
//! config.bias.formula = FormulaKind::Normalized;
//!
//! let report = subbias::pipeline::run(&config.bias).unwrap_or_else(|e| panic!("{e}"));
//! eprintln!("{}", report);
//! ```

pub mod alphabet;
pub mod cell;
pub mod config;
pub mod errors;
pub mod fasta;
pub mod formula;
pub mod matrix;
pub mod pipeline;
pub mod reader;
pub mod results;
pub mod sheet;
pub mod validate;
pub mod writer;
pub mod xlsx;

// commonly used functions and types

pub use crate::alphabet::*;
pub use crate::cell::*;
pub use crate::config::*;
pub use crate::errors::*;
pub use crate::formula::*;
pub use crate::matrix::*;
pub use crate::reader::*;
pub use crate::results::*;
pub use crate::sheet::*;
pub use crate::validate::*;
pub use crate::writer::*;
pub use crate::xlsx::*;
