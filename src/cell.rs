use serde::{Deserialize, Serialize};

use std::fmt;

/// Raw value of a single worksheet cell.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Number(f64),
    Text(String),
    Bool(bool),
}

/// Placeholder spreadsheets use for "no value".
pub const DASH: &str = "-";

impl CellValue {
    /// Empty cells and whitespace-only text.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Trimmed text content, if this is a non-blank text cell.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) if !s.trim().is_empty() => Some(s.trim()),
            _ => None,
        }
    }

    fn is_dash(&self) -> bool {
        self.as_text() == Some(DASH)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use CellValue::*;
        match self {
            Empty => Ok(()),
            Number(x) => write!(f, "{}", x),
            Text(s) => f.write_str(s),
            Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<f64> for CellValue {
    fn from(x: f64) -> Self {
        CellValue::Number(x)
    }
}

impl From<i32> for CellValue {
    fn from(x: i32) -> Self {
        CellValue::Number(x as f64)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_owned())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<Option<f64>> for CellValue {
    fn from(x: Option<f64>) -> Self {
        x.map_or(CellValue::Empty, CellValue::Number)
    }
}

/// Lenient conversion: anything that is not a number or numeric text is `0.0`.
pub fn to_float(value: &CellValue) -> f64 {
    match value {
        CellValue::Number(x) => *x,
        CellValue::Text(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Strict conversion used for formula inputs. Blank cells, `-`, booleans and
/// non-finite values are all rejected.
pub fn parse_number(value: &CellValue) -> Option<f64> {
    let x = match value {
        CellValue::Number(x) => *x,
        CellValue::Text(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    x.is_finite().then_some(x)
}

/// How matrix body cells that are not numbers are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoercionPolicy {
    /// Blank and `-` read as zero; any other non-numeric text fails the matrix.
    #[default]
    Strict,
    /// Every non-numeric cell reads as zero.
    Lenient,
}

impl CoercionPolicy {
    pub fn coerce(self, value: &CellValue) -> Option<f64> {
        match self {
            CoercionPolicy::Lenient => Some(to_float(value)),
            CoercionPolicy::Strict => {
                if value.is_blank() || value.is_dash() {
                    Some(0.0)
                } else {
                    parse_number(value)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_float_defaults_to_zero() {
        assert_eq!(to_float(&CellValue::from(2.5)), 2.5);
        assert_eq!(to_float(&CellValue::from(" 3 ")), 3.0);
        assert_eq!(to_float(&CellValue::from("-")), 0.0);
        assert_eq!(to_float(&CellValue::from("abc")), 0.0);
        assert_eq!(to_float(&CellValue::Empty), 0.0);
        assert_eq!(to_float(&CellValue::Bool(true)), 0.0);
    }

    #[test]
    fn test_parse_number_is_strict() {
        assert_eq!(parse_number(&CellValue::from(-1)), Some(-1.0));
        assert_eq!(parse_number(&CellValue::from("0.25")), Some(0.25));
        assert_eq!(parse_number(&CellValue::from("-")), None);
        assert_eq!(parse_number(&CellValue::Empty), None);
        assert_eq!(parse_number(&CellValue::from("nan")), None);
        assert_eq!(parse_number(&CellValue::Bool(false)), None);
    }

    #[test]
    fn test_policies_differ_on_text() {
        let junk = CellValue::from("n/a");
        assert_eq!(CoercionPolicy::Strict.coerce(&junk), None);
        assert_eq!(CoercionPolicy::Lenient.coerce(&junk), Some(0.0));

        let dash = CellValue::from("-");
        assert_eq!(CoercionPolicy::Strict.coerce(&dash), Some(0.0));
        assert_eq!(CoercionPolicy::Strict.coerce(&CellValue::Empty), Some(0.0));
        assert_eq!(CoercionPolicy::Strict.coerce(&CellValue::from("7")), Some(7.0));
    }
}
