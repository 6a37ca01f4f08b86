//! Bias statistics comparing an observed value with an expected value.
//!
//! Every formula shares the same input checks: both values must be real
//! numbers (a `-` placeholder is not) and the expected value must be non-zero.
//! Inputs failing the checks give `None` rather than a number, so "no data"
//! never looks like "no bias".
//!
//! [`AlternateNormalizedBias`] has no division by the expected value alone and
//! accepts a zero expected value.

use serde::{Deserialize, Serialize};

use crate::cell::*;

pub trait Formula {
    fn name(&self) -> &'static str;

    /// The formula itself, on already validated inputs.
    fn evaluate(&self, observed: f64, expected: f64) -> f64;

    fn calculate(&self, observed: &CellValue, expected: &CellValue) -> Option<f64> {
        self.calculate_values(parse_number(observed)?, parse_number(expected)?)
    }

    fn calculate_values(&self, observed: f64, expected: f64) -> Option<f64> {
        if !observed.is_finite() || !expected.is_finite() || expected == 0.0 {
            return None;
        }
        Some(self.evaluate(observed, expected))
    }
}

/// `(observed - expected) / expected`
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizedBias;

impl Formula for NormalizedBias {
    fn name(&self) -> &'static str {
        "normalized bias"
    }

    fn evaluate(&self, observed: f64, expected: f64) -> f64 {
        (observed - expected) / expected
    }
}

/// Value reported by [`AlternateNormalizedBias`] when `observed + expected`
/// is zero.
pub const ALTERNATE_SENTINEL: f64 = -2.0;

/// `(observed - expected) / (observed² + expected²)`
#[derive(Debug, Clone, Copy, Default)]
pub struct AlternateNormalizedBias;

impl Formula for AlternateNormalizedBias {
    fn name(&self) -> &'static str {
        "alternate normalized bias"
    }

    fn calculate_values(&self, observed: f64, expected: f64) -> Option<f64> {
        if !observed.is_finite() || !expected.is_finite() {
            return None;
        }
        Some(self.evaluate(observed, expected))
    }

    fn evaluate(&self, observed: f64, expected: f64) -> f64 {
        if observed + expected == 0.0 {
            return ALTERNATE_SENTINEL;
        }
        (observed - expected) / (observed * observed + expected * expected)
    }
}

/// `|observed - expected|`
#[derive(Debug, Clone, Copy, Default)]
pub struct AbsoluteDifference;

impl Formula for AbsoluteDifference {
    fn name(&self) -> &'static str {
        "absolute difference"
    }

    fn evaluate(&self, observed: f64, expected: f64) -> f64 {
        (observed - expected).abs()
    }
}

/// Formula selection as it appears in configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormulaKind {
    Normalized,
    Alternate,
    Absolute,
}

impl FormulaKind {
    pub fn build(self) -> Box<dyn Formula> {
        match self {
            FormulaKind::Normalized => Box::new(NormalizedBias),
            FormulaKind::Alternate => Box::new(AlternateNormalizedBias),
            FormulaKind::Absolute => Box::new(AbsoluteDifference),
        }
    }
}
