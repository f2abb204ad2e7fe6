//! matchmaker-cli: command-line interface for the team-assignment solver.
//!
//! Reads a JSON `MatchRequest` from a file or stdin, runs the MILP solve,
//! and prints the resulting team map as JSON. Solver-level failures are
//! printed as an `{"error": ...}` bundle with a non-zero exit code so
//! wrapping services can map them to a 400 response.
//!
//! # Commands
//!
//! - `solve`: run the solver on a request file
//! - `validate`: validate a request file without solving

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use matchmaker_core::models::{MatchRequest, MatchResult, Sex, MI_DIMENSIONS};
use matchmaker_core::solver::report;
use serde::Serialize;
use serde_json::json;
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "matchmaker-cli")]
#[command(version = "0.1.0")]
#[command(about = "Classroom team-assignment solver", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the solver on a request file
    Solve {
        /// Input JSON file path (use --stdin to read from stdin)
        #[arg(value_name = "FILE")]
        input: Option<PathBuf>,

        /// Read input from stdin instead of a file
        #[arg(long)]
        stdin: bool,

        /// Output file path (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,

        /// Include per-team projections (MI totals, sexes, prior teams,
        /// dislikes) in the output
        #[arg(long)]
        report: bool,
    },

    /// Validate a request file without solving
    Validate {
        /// Input JSON file path
        #[arg(value_name = "FILE")]
        input: Option<PathBuf>,

        /// Read input from stdin instead of a file
        #[arg(long)]
        stdin: bool,
    },
}

/// Solve output, optionally extended with the per-team projections.
#[derive(Serialize)]
struct SolveOutput<'a> {
    #[serde(flatten)]
    result: &'a MatchResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    mi_totals: Option<BTreeMap<usize, [u32; MI_DIMENSIONS]>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sexes: Option<BTreeMap<usize, Vec<Sex>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    previous: Option<BTreeMap<usize, Vec<Option<usize>>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dislikes: Option<BTreeMap<usize, Vec<Vec<usize>>>>,
}

fn main() -> Result<ExitCode> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Solve {
            input,
            stdin,
            output,
            pretty,
            report,
        } => cmd_solve(input, stdin, output, pretty, report),

        Commands::Validate { input, stdin } => cmd_validate(input, stdin),
    }
}

fn read_input(file: Option<PathBuf>, use_stdin: bool) -> Result<String> {
    if use_stdin {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read from stdin")?;
        Ok(buffer)
    } else if let Some(path) = file {
        fs::read_to_string(&path).with_context(|| format!("Failed to read file: {:?}", path))
    } else {
        anyhow::bail!("Either provide an input file or use --stdin")
    }
}

fn cmd_solve(
    input: Option<PathBuf>,
    stdin: bool,
    output: Option<PathBuf>,
    pretty: bool,
    with_report: bool,
) -> Result<ExitCode> {
    let json_str = read_input(input, stdin)?;
    let request: MatchRequest =
        serde_json::from_str(&json_str).context("Failed to parse input JSON")?;

    let result = match matchmaker_core::solve(&request) {
        Ok(result) => result,
        Err(e) => {
            println!("{}", json!({ "error": e.to_string() }));
            return Ok(ExitCode::FAILURE);
        }
    };

    let body = SolveOutput {
        result: &result,
        mi_totals: with_report.then(|| report::mi_totals_by_team(&request.students, &result.teams)),
        sexes: with_report.then(|| report::sex_by_team(&request.students, &result.teams)),
        previous: with_report.then(|| report::previous_by_team(&request.students, &result.teams)),
        dislikes: with_report.then(|| report::dislikes_by_team(&request.students, &result.teams)),
    };

    let output_json = if pretty {
        serde_json::to_string_pretty(&body)?
    } else {
        serde_json::to_string(&body)?
    };

    if let Some(output_path) = output {
        fs::write(&output_path, &output_json)
            .with_context(|| format!("Failed to write output to {:?}", output_path))?;
        eprintln!("Result written to {:?}", output_path);
    } else {
        println!("{}", output_json);
    }

    Ok(ExitCode::SUCCESS)
}

fn cmd_validate(input: Option<PathBuf>, stdin: bool) -> Result<ExitCode> {
    let json_str = read_input(input, stdin)?;
    let request: MatchRequest = serde_json::from_str(&json_str).context("JSON parse error")?;

    match matchmaker_core::validate(&request) {
        Ok(()) => {
            println!("{}", json!({ "valid": true }));
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            println!("{}", json!({ "valid": false, "error": e.to_string() }));
            Ok(ExitCode::FAILURE)
        }
    }
}
