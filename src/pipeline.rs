use colored::Colorize;
use log::info;

use std::fmt;

use crate::config::BiasConfig;
use crate::errors::*;
use crate::reader::*;
use crate::results::*;
use crate::sheet::*;
use crate::validate::HeaderValidator;
use crate::writer::*;
use crate::xlsx::*;

/// Outcome of one pass over a workbook.
#[derive(Debug, Clone, Default)]
pub struct BiasReport {
    pub raw: RawResults,
    /// Only set when standardization was requested.
    pub standardized: Option<StandardizedResults>,
    pub failures: Vec<Failure>,
}

impl BiasReport {
    /// The result set that gets written out.
    pub fn final_results(&self) -> &ResultSet {
        match &self.standardized {
            Some(z) => &**z,
            None => &*self.raw,
        }
    }

    pub fn processed(&self) -> impl Iterator<Item = &str> {
        self.raw.iter().map(|(s, _)| s)
    }
}

impl fmt::Display for BiasReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", "Successfully Processed Worksheets".green().bold())?;
        writeln!(f, "{}", "=================================".green())?;
        for subject in self.processed() {
            writeln!(f, "{}", subject)?;
        }

        writeln!(f)?;
        writeln!(f, "{}", "Failed Worksheets".red().bold())?;
        writeln!(f, "{}", "=================".red())?;
        for failure in &self.failures {
            writeln!(f, "{}: {}", failure.subject, failure.reason)?;
        }
        Ok(())
    }
}

/// Reader configured from `config`.
pub fn subject_reader(config: &BiasConfig) -> ObservedExpectedReader {
    ObservedExpectedReader::new(
        config.layout,
        HeaderValidator::new(config.blank_placement),
        MatrixReader::new(config.coercion),
    )
}

/// Reads every worksheet, computes the biases and optionally standardizes
/// them. Worksheets that cannot be read end up in `failures`.
pub fn compute<W: Workbook>(workbook: &W, config: &BiasConfig) -> Result<BiasReport> {
    let extraction = extract(workbook, &subject_reader(config))?;
    let formula = config.formula.build();

    let raw = compute_biases(
        extraction.subjects.iter().map(|(s, p)| (s.as_str(), p)),
        &*formula,
    );
    info!("Computed {} for {} subject(s)", formula.name(), raw.len());
    let standardized = config.standardize.then(|| standardize(&raw));

    Ok(BiasReport {
        raw,
        standardized,
        failures: extraction.failures,
    })
}

/// Lays the report out as worksheets: the bias table first, then the failure
/// list if a title for it is configured.
pub fn render(report: &BiasReport, config: &BiasConfig) -> Result<Vec<MemorySheet>> {
    let mut results = MemorySheet::new(config.results_sheet.as_str());
    BiasTableWriter::new(config.subject_header.as_str())
        .write(report.final_results(), &mut results)?;
    let mut sheets = vec![results];

    if let Some(title) = &config.failures_sheet {
        let mut failures = MemorySheet::new(title.as_str());
        FailureListWriter.write(&report.failures, &mut failures)?;
        sheets.push(failures);
    }
    Ok(sheets)
}

/// Full run from the configured input file to the configured output file.
pub fn run(config: &BiasConfig) -> Result<BiasReport> {
    info!("Reading workbook {}", config.input.display());
    let workbook = XlsxWorkbook::open(&config.input)?;

    let report = compute(&workbook, config)?;
    save_xlsx(&config.output, &render(&report, config)?)?;
    info!("Output written to {}", config.output.display());

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabet::*;
    use crate::cell::CellValue;
    use crate::formula::FormulaKind;

    fn subject(title: &str, observed: f64, expected: f64) -> MemorySheet {
        let layout = crate::reader::Layout::default();
        let mut sheet = MemorySheet::new(title);
        for (anchor, value) in [(layout.observed, observed), (layout.expected, expected)] {
            let headers = [" ", "A", "C", "G", "T"];
            for (i, h) in headers.iter().enumerate() {
                sheet.write_cell(anchor.row + i as u32, anchor.col, CellValue::from(*h)).unwrap();
                sheet.write_cell(anchor.row, anchor.col + i as u32, CellValue::from(*h)).unwrap();
            }
            for r in 0..4u32 {
                for c in 0..4u32 {
                    let v = if r == c { 0.0 } else { value };
                    sheet
                        .write_cell(anchor.row + r + 1, anchor.col + c + 1, CellValue::from(v))
                        .unwrap();
                }
            }
        }
        sheet
    }

    #[test]
    fn test_compute() {
        let mut book = MemoryWorkbook::new();
        book.add_sheet(subject("first", 2.0, 1.0));
        book.add_sheet(MemorySheet::new("empty"));
        book.add_sheet(subject("second", 1.0, 4.0));

        let config = BiasConfig {
            formula: FormulaKind::Normalized,
            ..Default::default()
        };
        let report = compute(&book, &config).unwrap();

        assert_eq!(report.processed().collect::<Vec<_>>(), vec!["first", "second"]);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].subject, "empty");
        let pair = Pair { source: G, dest: A };
        assert_eq!(report.raw.get("first").unwrap().get(pair), Some(1.0));
        assert_eq!(report.raw.get("second").unwrap().get(pair), Some(-0.75));
        assert!(report.standardized.is_none());
    }

    #[test]
    fn test_standardized_output() {
        let mut book = MemoryWorkbook::new();
        book.add_sheet(subject("first", 2.0, 1.0));
        book.add_sheet(subject("second", 1.0, 1.0));

        let config = BiasConfig {
            formula: FormulaKind::Normalized,
            standardize: true,
            failures_sheet: Some("Failures".to_owned()),
            ..Default::default()
        };
        let report = compute(&book, &config).unwrap();

        // biases are 1 and 0 in equal numbers: mean 0.5, std dev 0.5
        let z = report.final_results();
        assert_eq!(z.get("first").unwrap().values()[0], Some(1.0));
        assert_eq!(z.get("second").unwrap().values()[0], Some(-1.0));

        let sheets = render(&report, &config).unwrap();
        assert_eq!(sheets.len(), 2);
        assert_eq!(sheets[0].title(), "Results");
        assert_eq!(sheets[0].cell(2, 2), CellValue::Number(1.0));
        assert_eq!(sheets[1].title(), "Failures");
        assert_eq!(sheets[1].row_count(), 1);
    }

    #[test]
    fn test_report_lists_subjects() {
        colored::control::set_override(false);
        let mut book = MemoryWorkbook::new();
        book.add_sheet(subject("TYLCV", 1.0, 1.0));
        book.add_sheet(MemorySheet::new("notes"));

        let text = compute(&book, &BiasConfig::default()).unwrap().to_string();
        assert!(text.contains("Successfully Processed Worksheets\n"));
        assert!(text.contains("\nTYLCV\n"));
        assert!(text.contains("notes: Unexpected headers"));
    }
}
