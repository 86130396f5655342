//! Szymczak CLI
//!
//! Command-line interface for engine output files:
//! - Checking a result file (structure + preamble consistency)
//! - Dumping the decoded tree as JSON
//! - Re-emitting a file in canonical layout
//! - Surveying the class hypotheses across a results directory

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};
use szymczak_format::format::format_output;
use szymczak_format::hypotheses::{check_consistency, Hypotheses};
use szymczak_format::{parse_with, Classes, ParseOptions, ParsedOutput, Revision};
use tracing::Level;

mod survey;

#[derive(Parser)]
#[command(name = "szymczak")]
#[command(
    author,
    version,
    about = "Szymczak: decode and check functor engine output"
)]
struct Cli {
    /// More log output (repeat for trace level)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct InputArgs {
    /// Engine output file
    input: PathBuf,
    /// Body grammar revision (`classes` or `witnesses`); detected when omitted
    #[arg(long)]
    revision: Option<Revision>,
}

impl InputArgs {
    fn load(&self) -> Result<ParsedOutput> {
        let text = fs::read_to_string(&self.input)
            .with_context(|| format!("failed to read `{}`", self.input.display()))?;
        let options = ParseOptions {
            revision: self.revision,
        };
        parse_with(&text, &options)
            .with_context(|| format!("failed to parse `{}`", self.input.display()))
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a result file and compare its preamble with the decoded body.
    Check {
        #[command(flatten)]
        input: InputArgs,
        /// Fail when the preamble disagrees with the body
        #[arg(long)]
        strict: bool,
    },

    /// Print the decoded tree as JSON.
    Dump {
        #[command(flatten)]
        input: InputArgs,
        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Re-emit a result file in canonical layout.
    Fmt {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Summarise class hypotheses for every `Z<base>-dim-<dim>` file under a directory.
    Survey {
        /// Results directory
        dir: PathBuf,
    },
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => Level::ERROR,
        (false, 0) => Level::WARN,
        (false, 1) => Level::INFO,
        (false, 2) => Level::DEBUG,
        (false, _) => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Check { input, strict } => cmd_check(&input, strict),
        Commands::Dump { input, pretty } => cmd_dump(&input, pretty),
        Commands::Fmt { input } => cmd_fmt(&input),
        Commands::Survey { dir } => cmd_survey(&dir),
    }
}

fn cmd_check(input: &InputArgs, strict: bool) -> Result<()> {
    println!("{} {}", "Checking".green().bold(), input.input.display());

    let output = input.load()?;
    let preamble = &output.preamble;
    let computed = Hypotheses::compute(&output.classes);

    println!("  Revision: {}", output.revision().to_string().cyan());
    println!("  Functor: {}", preamble.functor_name.cyan());
    println!(
        "  Kinds: {} / {}",
        output.object_kind.to_string().cyan(),
        output.morphism_kind.to_string().cyan()
    );
    println!("  Classes: {}", output.classes.len());
    match &output.classes {
        Classes::Objects(_) => println!("  Endomorphisms: {}", output.classes.relation_count()),
        Classes::Witnesses(_) => println!("  Quadruples: {}", output.classes.relation_count()),
    }
    println!(
        "  Map in every class: {} (declared {})",
        computed.map_in_every_class, preamble.map_hypothesis
    );
    println!(
        "  Bijection in every class: {} (declared {})",
        computed.bijection_in_every_class, preamble.bijection_hypothesis
    );
    if let Some(strong) = computed.one_bijection_in_every_class {
        println!("  Exactly one bijection in every class: {strong}");
    }
    if let Some(timings) = &output.timings {
        println!("  Generation time: {}", timings.total());
    }

    let findings = check_consistency(&output);
    for finding in &findings {
        tracing::warn!(file = %input.input.display(), "{finding}");
        println!("  {} {}", "mismatch:".yellow().bold(), finding);
    }

    if strict && !findings.is_empty() {
        return Err(anyhow!(
            "{} preamble mismatch(es) in `{}`",
            findings.len(),
            input.input.display()
        ));
    }

    println!("{}", "Valid.".green());
    Ok(())
}

fn cmd_dump(input: &InputArgs, pretty: bool) -> Result<()> {
    let output = input.load()?;
    let json = if pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{json}");
    Ok(())
}

fn cmd_fmt(input: &InputArgs) -> Result<()> {
    let output = input.load()?;
    print!("{}", format_output(&output));
    Ok(())
}

fn cmd_survey(dir: &Path) -> Result<()> {
    let rows = survey::survey(dir)?;
    if rows.is_empty() {
        eprintln!(
            "{} no `Z<base>-dim-<dim>` files under {}",
            "info:".yellow().bold(),
            dir.display()
        );
        return Ok(());
    }
    for row in &rows {
        println!("{row}");
    }
    Ok(())
}
