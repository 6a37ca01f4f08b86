//! Rewrites FASTA headers of the form
//! `>gi|123|gb|AB123.1| Tomato leaf curl virus segment A, complete sequence`
//! into `>{accession}{virus_name}`, with spaces in both parts replaced.
//!
//! Two renamers are provided. [`LineRenamer`] works line by line with regular
//! expressions and copies sequence lines through unchanged. [`RecordRenamer`]
//! parses whole records with needletail and rewraps the sequence.

use colored::Colorize;
use flate2::{write::GzEncoder, Compression};
use log::{debug, info};
use memchr::{memchr, memchr_iter};
use needletail::errors::{ParseError, ParseErrorKind};
use needletail::{parse_fastx_file, parse_fastx_reader, FastxReader};
use regex::Regex;

use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufWriter, Write};
use std::path::Path;

use crate::config::RenameConfig;
use crate::errors::*;

/// Counts of renamed records, plus the input that could not be renamed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenameReport {
    pub processed: usize,
    pub errors: Vec<String>,
}

impl fmt::Display for RenameReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(
            f,
            "Number of viruses processed: {}, number of errors: {}",
            self.processed.to_string().green(),
            self.errors.len().to_string().red()
        )?;
        if self.errors.is_empty() {
            writeln!(f, "{}", "All sequences successfully processed!".green())
        } else {
            writeln!(f, "{}", "Error extracting information for viruses:".red())?;
            for e in &self.errors {
                writeln!(f, "{}", e)?;
            }
            Ok(())
        }
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| Error::InvalidRegex {
        pattern: pattern.to_owned(),
        source: Box::new(e),
    })
}

/// Output file of a renamer. Must be closed with [`Output::finish`], which
/// writes the gzip trailer and reports any error doing so.
pub enum Output {
    Plain(BufWriter<File>),
    Gzip(BufWriter<GzEncoder<File>>),
}

impl Output {
    pub fn finish(self) -> io::Result<()> {
        match self {
            Output::Plain(w) => {
                w.into_inner().map_err(|e| e.into_error())?;
            }
            Output::Gzip(w) => {
                w.into_inner().map_err(|e| e.into_error())?.finish()?;
            }
        }
        Ok(())
    }
}

impl Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Output::Plain(w) => w.write(buf),
            Output::Gzip(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Output::Plain(w) => w.flush(),
            Output::Gzip(w) => w.flush(),
        }
    }
}

/// Opens `file` for writing, gzip compressed if it ends with `.gz`.
pub fn create_output(file: impl AsRef<Path>) -> Result<Output> {
    let path = file.as_ref();
    let name = path.display().to_string();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| Error::file_io(&name, e))?;
    }
    let f = File::create(path).map_err(|e| Error::file_io(&name, e))?;

    if name.ends_with(".gz") {
        Ok(Output::Gzip(BufWriter::new(GzEncoder::new(f, Compression::default()))))
    } else {
        Ok(Output::Plain(BufWriter::new(f)))
    }
}

/// Needletail refuses empty input outright; that is zero records here.
fn open_records<'a>(
    parsed: std::result::Result<Box<dyn FastxReader + 'a>, ParseError>,
    source: &str,
) -> Result<Option<Box<dyn FastxReader + 'a>>> {
    match parsed {
        Ok(reader) => Ok(Some(reader)),
        Err(e) if e.kind == ParseErrorKind::EmptyFile => Ok(None),
        Err(e) => Err(Error::ParseFasta {
            file: source.to_owned(),
            source: Box::new(e),
        }),
    }
}

#[derive(Debug, Clone)]
struct Replacer {
    target: String,
    with: String,
}

impl Replacer {
    fn new(config: &RenameConfig) -> Self {
        Self {
            target: config.replace_target.clone(),
            with: config.replace_char.clone(),
        }
    }

    fn apply(&self, s: &str) -> String {
        if self.target.is_empty() {
            s.to_owned()
        } else {
            s.replace(&self.target, &self.with)
        }
    }
}

/// What a single input line turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Header(String),
    Sequence,
    Invalid,
}

#[derive(Debug, Clone)]
pub struct LineRenamer {
    header: Regex,
    sequence: Regex,
    replacer: Replacer,
}

impl LineRenamer {
    pub fn new(config: &RenameConfig) -> Result<Self> {
        Ok(Self {
            header: compile(&config.header_pattern)?,
            sequence: compile(&config.sequence_pattern)?,
            replacer: Replacer::new(config),
        })
    }

    /// Classifies a line without its line ending. Headers come back renamed.
    pub fn classify(&self, line: &str) -> Line {
        if self.sequence.is_match(line) {
            return Line::Sequence;
        }
        match self.header.captures(line) {
            Some(caps) => {
                let accession = caps.get(1).map_or("", |m| m.as_str());
                let name = caps.get(2).map_or("", |m| m.as_str());
                Line::Header(format!(
                    ">{}{}",
                    self.replacer.apply(accession),
                    self.replacer.apply(name)
                ))
            }
            None => Line::Invalid,
        }
    }

    /// Sequence lines are kept only while the last header line was valid.
    pub fn rename<R: BufRead>(
        &self,
        input: R,
        output: &mut dyn Write,
    ) -> std::io::Result<RenameReport> {
        let mut report = RenameReport::default();
        let mut valid = false;

        for line in input.lines() {
            let line = line?;
            let line = line.trim_end_matches(['\r', '\n']);

            match self.classify(line) {
                Line::Sequence if valid => writeln!(output, "{}", line)?,
                Line::Sequence => (),
                Line::Header(header) => {
                    report.processed += 1;
                    valid = true;
                    writeln!(output, "{}", header)?;
                }
                Line::Invalid => {
                    debug!("Could not rename line: {}", line);
                    valid = false;
                    report.errors.push(line.trim_end().to_owned());
                }
            }
        }

        output.flush()?;
        Ok(report)
    }

    pub fn rename_file(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
    ) -> Result<RenameReport> {
        let input = input.as_ref();
        let input_name = input.display().to_string();
        let output_name = output.as_ref().display().to_string();

        let reader = std::io::BufReader::new(
            File::open(input).map_err(|e| Error::file_io(&input_name, e))?,
        );
        let mut writer = create_output(&output)?;

        let report = self
            .rename(reader, &mut writer)
            .and_then(|report| writer.finish().map(|_| report))
            .map_err(|e| Error::file_io(&output_name, e))?;
        info!(
            "Renamed {} record(s) from {} into {}, {} error(s)",
            report.processed,
            input_name,
            output_name,
            report.errors.len()
        );
        Ok(report)
    }
}

#[derive(Debug, Clone)]
pub struct RecordRenamer {
    name: Regex,
    replacer: Replacer,
    line_width: usize,
}

impl RecordRenamer {
    pub fn new(config: &RenameConfig) -> Result<Self> {
        Ok(Self {
            name: compile(&config.name_pattern)?,
            replacer: Replacer::new(config),
            line_width: config.line_width,
        })
    }

    /// Accession is the fourth `|` field of the first word, cut at its first
    /// `.`, e.g. `AB123` for `gi|1|gb|AB123.1|`.
    pub fn accession(header: &[u8]) -> Option<&[u8]> {
        let id_end = header
            .iter()
            .position(|c| c.is_ascii_whitespace())
            .unwrap_or(header.len());
        let id = &header[..id_end];

        let start = memchr_iter(b'|', id).nth(2)? + 1;
        let field = &id[start..];
        let field = &field[..memchr(b'|', field).unwrap_or(field.len())];
        Some(&field[..memchr(b'.', field).unwrap_or(field.len())])
    }

    /// New header for a record, or `None` if either part is missing.
    pub fn rename_header(&self, header: &[u8]) -> Option<String> {
        let accession = std::str::from_utf8(Self::accession(header)?).ok()?;
        let description = std::str::from_utf8(header).ok()?;
        let name = self.name.captures(description)?.get(1)?.as_str();
        Some(format!(">{}{}", accession, self.replacer.apply(name)))
    }

    pub fn rename(
        &self,
        mut reader: Box<dyn FastxReader + '_>,
        source: &str,
        output: &mut dyn Write,
    ) -> Result<RenameReport> {
        let mut report = RenameReport::default();
        let io_err = |e| Error::file_io(source, e);

        while let Some(record) = reader.next() {
            let record = record.map_err(|e| Error::ParseFasta {
                file: source.to_owned(),
                source: Box::new(e),
            })?;
            let header = record.id();

            let Some(renamed) = self.rename_header(header) else {
                let header = String::from_utf8_lossy(header).into_owned();
                debug!("Could not rename record: {}", header);
                report.errors.push(header);
                continue;
            };

            report.processed += 1;
            writeln!(output, "{}", renamed).map_err(io_err)?;
            let seq = record.seq();
            let width = if self.line_width == 0 {
                seq.len().max(1)
            } else {
                self.line_width
            };
            for chunk in seq.chunks(width) {
                output.write_all(chunk).map_err(io_err)?;
                output.write_all(b"\n").map_err(io_err)?;
            }
        }

        output.flush().map_err(io_err)?;
        Ok(report)
    }

    pub fn rename_bytes(&self, fasta: &[u8], output: &mut dyn Write) -> Result<RenameReport> {
        match open_records(parse_fastx_reader(fasta), "<memory>")? {
            Some(reader) => self.rename(reader, "<memory>", output),
            None => Ok(RenameReport::default()),
        }
    }

    pub fn rename_file(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
    ) -> Result<RenameReport> {
        let input_name = input.as_ref().display().to_string();
        let output_name = output.as_ref().display().to_string();
        let reader = open_records(parse_fastx_file(input.as_ref()), &input_name)?;
        let mut writer = create_output(&output)?;

        let report = match reader {
            Some(reader) => self.rename(reader, &input_name, &mut writer)?,
            None => RenameReport::default(),
        };
        writer.finish().map_err(|e| Error::file_io(&output_name, e))?;
        info!(
            "Renamed {} record(s) from {}, {} error(s)",
            report.processed,
            input_name,
            report.errors.len()
        );
        Ok(report)
    }
}
