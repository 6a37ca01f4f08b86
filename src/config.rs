use serde::{Deserialize, Serialize};

use std::path::{Path, PathBuf};

use crate::cell::CoercionPolicy;
use crate::errors::*;
use crate::formula::FormulaKind;
use crate::reader::Layout;
use crate::validate::BlankPlacement;

/// Everything a run needs, usually loaded from a YAML file.
///
/// Every field has a default, so a file only needs the values it changes:
/// ```yaml
/// bias:
///   input: data/matrices.xlsx
///   formula: absolute
///   layout:
///     expected: { row: 18, col: 8 }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub bias: BiasConfig,
    pub rename: RenameConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BiasConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Title of the worksheet the bias table is written to.
    pub results_sheet: String,
    /// Title of the worksheet listing failed subjects; not written if unset.
    pub failures_sheet: Option<String>,
    /// Label of the first column of the bias table.
    pub subject_header: String,
    pub layout: Layout,
    pub formula: FormulaKind,
    pub standardize: bool,
    pub coercion: CoercionPolicy,
    pub blank_placement: BlankPlacement,
}

impl Default for BiasConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("data/2SubstitutionAnlysML_INPUT.xlsx"),
            output: PathBuf::from("data/SubstitutionAnlysResults.xlsx"),
            results_sheet: "Results".to_owned(),
            failures_sheet: None,
            subject_header: "Virus".to_owned(),
            layout: Layout::default(),
            formula: FormulaKind::Alternate,
            standardize: false,
            coercion: CoercionPolicy::default(),
            blank_placement: BlankPlacement::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenameMode {
    /// Regex over each line; sequence lines are copied untouched.
    #[default]
    Line,
    /// Whole records parsed with needletail; sequences are rewrapped.
    Record,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenameConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub mode: RenameMode,
    /// Line mode header pattern. Group 1 is the accession, group 2 the name.
    pub header_pattern: String,
    /// Line mode pattern for sequence lines, without the line ending.
    pub sequence_pattern: String,
    /// Record mode pattern over the full header. Group 1 is the name.
    pub name_pattern: String,
    pub replace_target: String,
    pub replace_char: String,
    /// Record mode sequence line width.
    pub line_width: usize,
}

impl Default for RenameConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("data/BegomoSDTseqsmissing.fasta"),
            output: PathBuf::from("data/BegomoSDTseqsmissing_OUTPUT.fasta"),
            mode: RenameMode::default(),
            header_pattern: r"^>.+\|.+\|.+\|(.+)[.0-9]\|(.*[vV]irus).*".to_owned(),
            sequence_pattern: r"^[NATCG\-]*$".to_owned(),
            name_pattern: r"^.+\|.+\|.+\|.+\|(.*[vV]irus).*".to_owned(),
            replace_target: " ".to_owned(),
            replace_char: "_".to_owned(),
            line_width: 80,
        }
    }
}

impl Config {
    pub fn from_yaml_str(yaml: &str) -> std::result::Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = path.display().to_string();
        let yaml = std::fs::read_to_string(path).map_err(|e| Error::file_io(&file, e))?;

        Self::from_yaml_str(&yaml).map_err(|e| Error::ParseConfig {
            file,
            source: Box::new(e),
        })
    }

    pub fn to_yaml(&self) -> String {
        // plain data with string keys always serializes
        serde_yaml::to_string(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::Anchor;

    #[test]
    fn test_defaults_round_trip() {
        let config = Config::default();
        assert_eq!(Config::from_yaml_str(&config.to_yaml()).unwrap(), config);
    }

    #[test]
    fn test_partial_file() {
        let config = Config::from_yaml_str(
            r#"
            bias:
              formula: absolute
              standardize: true
              coercion: lenient
              layout:
                expected: { row: 2, col: 9 }
            rename:
              mode: record
            "#,
        )
        .unwrap();

        assert_eq!(config.bias.formula, FormulaKind::Absolute);
        assert!(config.bias.standardize);
        assert_eq!(config.bias.coercion, CoercionPolicy::Lenient);
        assert_eq!(config.bias.layout.observed, Anchor::new(18, 1));
        assert_eq!(config.bias.layout.expected, Anchor::new(2, 9));
        assert_eq!(config.bias.results_sheet, "Results");
        assert_eq!(config.rename.mode, RenameMode::Record);
        assert_eq!(config.rename.line_width, 80);
    }

    #[test]
    fn test_unknown_field() {
        assert!(Config::from_yaml_str("bias:\n  formla: absolute\n").is_err());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "bias:\n  subject_header: Subject\n").unwrap();
        assert_eq!(Config::from_file(&path).unwrap().bias.subject_header, "Subject");

        let missing = Config::from_file(dir.path().join("nope.yaml"));
        assert!(matches!(missing, Err(Error::FileIo { .. })));

        std::fs::write(&path, "bias: [1, 2]\n").unwrap();
        assert!(matches!(
            Config::from_file(&path),
            Err(Error::ParseConfig { .. })
        ));
    }
}
