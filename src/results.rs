use log::warn;

use std::ops::Deref;

use crate::alphabet::*;
use crate::formula::*;
use crate::matrix::*;

/// Bias of every off-diagonal pair, in [`pairs`] order. `None` marks a pair
/// whose inputs the formula rejected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairBiases {
    values: [Option<f64>; PAIR_COUNT],
}

impl PairBiases {
    pub fn from_values(values: [Option<f64>; PAIR_COUNT]) -> Self {
        Self { values }
    }

    pub fn get(&self, pair: Pair) -> Option<f64> {
        pairs()
            .position(|p| p == pair)
            .and_then(|i| self.values[i])
    }

    pub fn values(&self) -> &[Option<f64>; PAIR_COUNT] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = (Pair, Option<f64>)> + '_ {
        pairs().zip(self.values.iter().copied())
    }
}

/// Applies `formula` to the observed and expected entry of every off-diagonal
/// pair.
pub fn pair_biases(pair: &MatrixPair, formula: &dyn Formula) -> PairBiases {
    let mut values = [None; PAIR_COUNT];
    for (v, p) in values.iter_mut().zip(pairs()) {
        *v = formula.calculate_values(
            pair.observed.get(p.source, p.dest),
            pair.expected.get(p.source, p.dest),
        );
    }
    PairBiases { values }
}

/// Per-subject biases in the order subjects were processed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    subjects: Vec<(String, PairBiases)>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, subject: impl Into<String>, biases: PairBiases) {
        self.subjects.push((subject.into(), biases));
    }

    pub fn get(&self, subject: &str) -> Option<&PairBiases> {
        self.subjects
            .iter()
            .find(|(s, _)| s == subject)
            .map(|(_, b)| b)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PairBiases)> {
        self.subjects.iter().map(|(s, b)| (s.as_str(), b))
    }

    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }

    fn valid_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.subjects
            .iter()
            .flat_map(|(_, b)| b.values.iter().flatten().copied())
    }
}

/// Biases straight out of the formula.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawResults(ResultSet);

/// Biases rescaled to z-scores over the whole result set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StandardizedResults(ResultSet);

impl RawResults {
    pub fn new(results: ResultSet) -> Self {
        Self(results)
    }

    pub fn into_inner(self) -> ResultSet {
        self.0
    }
}

impl StandardizedResults {
    pub fn into_inner(self) -> ResultSet {
        self.0
    }
}

impl Deref for RawResults {
    type Target = ResultSet;

    fn deref(&self) -> &ResultSet {
        &self.0
    }
}

impl Deref for StandardizedResults {
    type Target = ResultSet;

    fn deref(&self) -> &ResultSet {
        &self.0
    }
}

/// Computes the biases of every subject with the same formula.
pub fn compute_biases<'a>(
    subjects: impl IntoIterator<Item = (&'a str, &'a MatrixPair)>,
    formula: &dyn Formula,
) -> RawResults {
    let mut res = ResultSet::new();
    for (subject, pair) in subjects {
        res.push(subject, pair_biases(pair, formula));
    }
    RawResults(res)
}

/// Population mean and standard deviation over every valid value.
pub fn mean_std_dev(results: &ResultSet) -> Option<(f64, f64)> {
    let (n, sum) = results
        .valid_values()
        .fold((0usize, 0.0), |(n, sum), v| (n + 1, sum + v));
    if n == 0 {
        return None;
    }
    let mean = sum / n as f64;
    let var = results
        .valid_values()
        .map(|v| (v - mean) * (v - mean))
        .sum::<f64>()
        / n as f64;
    Some((mean, var.sqrt()))
}

/// Rescales every valid bias to `(v - mean) / std_dev`. Invalid entries stay
/// invalid and do not count towards the statistics.
///
/// A result set without spread cannot be standardized: in that case the
/// output is empty, dropping the raw values.
pub fn standardize(raw: &RawResults) -> StandardizedResults {
    let Some((mean, std_dev)) = mean_std_dev(raw).filter(|&(_, sd)| sd != 0.0) else {
        warn!(
            "Standard deviation over {} subject(s) is zero, no standardized results",
            raw.len()
        );
        return StandardizedResults::default();
    };

    let mut res = ResultSet::new();
    for (subject, biases) in raw.iter() {
        let mut values = biases.values;
        for v in values.iter_mut().flatten() {
            *v = (*v - mean) / std_dev;
        }
        res.push(subject, PairBiases { values });
    }
    StandardizedResults(res)
}
