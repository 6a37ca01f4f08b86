//! Command-line interface for the `subbias` crate.
//!
//! Logging goes to stderr and is controlled with `RUST_LOG` (e.g. `RUST_LOG=info`).
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;

use subbias::fasta::{LineRenamer, RecordRenamer};
use subbias::*;

#[derive(Debug, Parser)]
#[command(
    name = "subbias",
    version = env!("CARGO_PKG_VERSION"),
    about = "Substitution bias tables and FASTA header cleanup",
    disable_help_subcommand = true
)]
struct Cli {
    /// YAML config file. Values not in the file keep their defaults.
    #[arg(long, global = true, value_name = "YAML")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Score observed/expected substitution matrices from every worksheet of a workbook.
    Bias(BiasCmd),
    /// Rewrite FASTA headers as `>{accession}{virus_name}`.
    Rename(RenameCmd),
    /// Print the effective config as YAML.
    Config,
}

#[derive(Debug, Args)]
struct BiasCmd {
    /// Input workbook (xlsx, xlsm, xls or ods).
    #[arg(long)]
    input: Option<PathBuf>,
    /// Output xlsx workbook.
    #[arg(long)]
    output: Option<PathBuf>,
    /// Bias formula.
    #[arg(long, value_parser = parse_formula)]
    formula: Option<FormulaKind>,
    /// Replace the biases by z-scores over the whole workbook.
    #[arg(long, default_value_t = false)]
    standardize: bool,
}

#[derive(Debug, Args)]
struct RenameCmd {
    /// Input FASTA file.
    #[arg(long)]
    input: Option<PathBuf>,
    /// Output FASTA file; gzip compressed if it ends with `.gz`.
    #[arg(long)]
    output: Option<PathBuf>,
    /// Parse whole records and rewrap sequences instead of working line by line.
    #[arg(long, default_value_t = false)]
    records: bool,
}

fn parse_formula(s: &str) -> std::result::Result<FormulaKind, String> {
    match s {
        "normalized" => Ok(FormulaKind::Normalized),
        "alternate" => Ok(FormulaKind::Alternate),
        "absolute" => Ok(FormulaKind::Absolute),
        _ => Err(format!("unknown formula \"{s}\", expected normalized, alternate or absolute")),
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("load config: {}", path.display()))?,
        None => Config::default(),
    };

    match cli.command {
        Command::Bias(cmd) => {
            let bias = &mut config.bias;
            if let Some(input) = cmd.input {
                bias.input = input;
            }
            if let Some(output) = cmd.output {
                bias.output = output;
            }
            if let Some(formula) = cmd.formula {
                bias.formula = formula;
            }
            bias.standardize |= cmd.standardize;

            let report = subbias::pipeline::run(bias)?;
            eprintln!("{}", report);
            info!("Output written to: {}", bias.output.display());
        }
        Command::Rename(cmd) => {
            let rename = &mut config.rename;
            if let Some(input) = cmd.input {
                rename.input = input;
            }
            if let Some(output) = cmd.output {
                rename.output = output;
            }
            if cmd.records {
                rename.mode = RenameMode::Record;
            }

            let report = match rename.mode {
                RenameMode::Line => {
                    LineRenamer::new(rename)?.rename_file(&rename.input, &rename.output)?
                }
                RenameMode::Record => {
                    RecordRenamer::new(rename)?.rename_file(&rename.input, &rename.output)?
                }
            };
            eprintln!("{}", report);
            info!("Output written to: {}", rename.output.display());
        }
        Command::Config => print!("{}", config.to_yaml()),
    }

    Ok(())
}
