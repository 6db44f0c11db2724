// gedcompare - compare two GEDCOM family trees from a shared anchor person

mod compare;
mod exit_codes;
mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use compare::{OutputArgs, ScopeArgs};
use exit_codes::EXIT_SUCCESS;

#[derive(Parser)]
#[command(name = "gedcompare")]
#[command(about = "Compare two GEDCOM family trees and report where they disagree")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare two GEDCOM files starting from an anchor person
    #[command(after_help = "\
Criteria keys: surname, name, gender, birth, birth_date, birth_range,
death, death_range (colon-separated key=value pairs).

Examples:
  gedcompare compare ancestry.ged wikitree.ged -a 'surname=Tiffany:name=Rebecca:birth=2003'
  gedcompare compare a.ged b.ged -a 'surname=Doe:name=Jane' --all-relatives --max-separation 4
  gedcompare compare a.ged b.ged -a 'surname=Doe' --output-all --json
  GEDCOMPARE_LOG=gedcompare_recon=debug gedcompare compare a.ged b.ged -a 'surname=Doe'")]
    Compare {
        /// GEDCOM file for tree 1
        left: PathBuf,

        /// GEDCOM file for tree 2
        right: PathBuf,

        /// Criteria locating the anchor person in both trees
        #[arg(long, short = 'a', value_name = "CRITERIA")]
        anchor: String,

        #[command(flatten)]
        scope: ScopeArgs,

        #[command(flatten)]
        out: OutputArgs,
    },

    /// Run a comparison from a TOML config file
    #[command(after_help = "\
Examples:
  gedcompare run tiffany.compare.toml
  gedcompare run tiffany.compare.toml --json
  gedcompare run tiffany.compare.toml --output result.json -vv")]
    Run {
        /// Path to the config file (GEDCOM paths are relative to it)
        config: PathBuf,

        #[command(flatten)]
        scope: ScopeArgs,

        #[command(flatten)]
        out: OutputArgs,
    },

    /// Validate a config file without running
    #[command(after_help = "\
Examples:
  gedcompare validate tiffany.compare.toml")]
    Validate {
        /// Path to the config file
        config: PathBuf,
    },
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        "\nengine:  gedcompare-recon ",
        env!("CARGO_PKG_VERSION"),
    )
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Compare {
            left,
            right,
            anchor,
            scope,
            out,
        } => compare::cmd_compare(left, right, anchor, scope, out),
        Commands::Run { config, scope, out } => compare::cmd_run(config, scope, out),
        Commands::Validate { config } => compare::cmd_validate(config),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn new(code: u8, msg: impl Into<String>) -> Self {
        Self { code, message: msg.into(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
