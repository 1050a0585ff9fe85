//! Command-line front end for the Castex engine (spec.md §1's "CLI façade").
//! Parses a LaTeX expression, runs one task against it, and prints the
//! result. Owns no algebraic logic itself — every decision lives in
//! `castex-core`.

use anyhow::{bail, Context, Result};
use castex_core::{AnalysisTask, AnalyzeOptions, AnalyzeResult};
use clap::{Parser, Subcommand};
use std::io::Read;

#[derive(Parser)]
#[command(name = "castex", version, about = "A LaTeX symbolic-mathematics engine")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Print the result as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Print the hierarchical step trace alongside the result.
    #[arg(long, global = true)]
    steps: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Expand products and integer powers, combining like terms.
    Distribute {
        /// LaTeX expression; reads stdin when omitted.
        expression: Option<String>,
    },
    /// Run the factorization engine.
    Factor {
        expression: Option<String>,
    },
    /// Classify a polynomial's degree and leading coefficient.
    AnalyzePolynomial {
        expression: Option<String>,
        /// The variable to analyze with respect to; inferred when omitted.
        #[arg(long)]
        variable: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let (task, expression, variable) = match cli.command {
        Command::Distribute { expression } => (AnalysisTask::Distribute, expression, None),
        Command::Factor { expression } => (AnalysisTask::Factor, expression, None),
        Command::AnalyzePolynomial { expression, variable } => (AnalysisTask::AnalyzePolynomial, expression, variable),
    };

    let source = match expression {
        Some(text) => text,
        None => read_stdin().context("reading expression from stdin")?,
    };

    let ast = castex_core::parse(&source).map_err(|e| anyhow::anyhow!(e.to_string()))?;
    let options = AnalyzeOptions { task: Some(task), variable, ..Default::default() };
    let result = castex_core::analyze(&ast, &options);

    print_result(&result, cli.json, cli.steps);
    if result.error.is_some() {
        bail!("analysis failed");
    }
    Ok(())
}

fn read_stdin() -> Result<String> {
    let mut buffer = String::new();
    std::io::stdin().read_to_string(&mut buffer)?;
    Ok(buffer)
}

fn print_result(result: &AnalyzeResult, json: bool, steps: bool) {
    if json {
        match serde_json::to_string_pretty(result) {
            Ok(text) => println!("{text}"),
            Err(e) => eprintln!("failed to serialize result: {e}"),
        }
        return;
    }

    match (&result.value, &result.error) {
        (Some(value), _) => println!("{value}"),
        (None, Some(error)) => eprintln!("error: {error}"),
        (None, None) => println!("(no result)"),
    }

    if steps {
        print_step(&result.steps, 0);
    }
}

fn print_step(step: &castex_core::steps::Step, depth: usize) {
    let indent = "  ".repeat(depth);
    match step {
        castex_core::steps::Step::Text(text) => println!("{indent}{text}"),
        castex_core::steps::Step::Group(items) => {
            for item in items {
                print_step(item, depth + 1);
            }
        }
    }
}
