//! `gedcompare compare|run|validate`: walk two trees from a shared anchor.

use std::path::{Path, PathBuf};

use clap::Args;

use gedcompare_gedcom::{parse_file, GedcomError, GedcomTree, ParseOptions};
use gedcompare_recon::config::{OutputConfig, ScopeConfig};
use gedcompare_recon::{render_text, CompareConfig, CompareError};

use crate::exit_codes::{EXIT_ERROR, EXIT_INVALID_CONFIG};
use crate::logging::init_tracing;
use crate::CliError;

/// Flags shared by `compare` and `run`. On `run` they override the config file.
#[derive(Args, Debug, Default)]
pub struct ScopeArgs {
    /// Deepest degree of separation to follow (default: unbounded)
    #[arg(long, value_name = "N")]
    pub max_separation: Option<u32>,

    /// Also follow spouses and children, not just parents
    #[arg(long)]
    pub all_relatives: bool,

    /// Stop after this many pairs have been checked
    #[arg(long, value_name = "N")]
    pub max_pairs: Option<usize>,

    /// Print every pair, not only those with issues
    #[arg(long)]
    pub output_all: bool,

    /// Reject malformed GEDCOM lines instead of repairing them
    #[arg(long)]
    pub strict: bool,
}

impl ScopeArgs {
    fn apply(&self, config: &mut CompareConfig) {
        if self.max_separation.is_some() {
            config.scope.max_separation = self.max_separation;
        }
        if self.max_pairs.is_some() {
            config.scope.max_pairs = self.max_pairs;
        }
        config.scope.include_relatives |= self.all_relatives;
        config.output.all |= self.output_all;
        config.output.strict |= self.strict;
    }
}

#[derive(Args, Debug, Default)]
pub struct OutputArgs {
    /// Print the result as JSON instead of the text report
    #[arg(long)]
    pub json: bool,

    /// Also write the JSON result to this file
    #[arg(long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Log progress to stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

pub fn cmd_compare(
    left: PathBuf,
    right: PathBuf,
    anchor: String,
    scope: ScopeArgs,
    out: OutputArgs,
) -> Result<(), CliError> {
    init_tracing(out.verbose);

    let mut config = CompareConfig {
        name: None,
        left: left.display().to_string(),
        right: right.display().to_string(),
        anchor,
        scope: ScopeConfig::default(),
        output: OutputConfig::default(),
    };
    scope.apply(&mut config);
    config.validate().map_err(CliError::from_compare)?;

    execute(&config, &left, &right, &out)
}

pub fn cmd_run(config_path: PathBuf, scope: ScopeArgs, out: OutputArgs) -> Result<(), CliError> {
    let mut config = load_config(&config_path)?;
    scope.apply(&mut config);
    config.validate().map_err(CliError::from_compare)?;
    init_tracing(config.output.verbosity.max(out.verbose));

    let base_dir = base_dir(&config_path);
    let left = base_dir.join(&config.left);
    let right = base_dir.join(&config.right);
    execute(&config, &left, &right, &out)
}

pub fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config = load_config(&config_path)?;
    let criteria = config.criteria().map_err(CliError::from_compare)?;

    let base_dir = base_dir(&config_path);
    for (side, file) in [("left", &config.left), ("right", &config.right)] {
        let path = base_dir.join(file);
        if !path.is_file() {
            return Err(CliError::new(
                EXIT_INVALID_CONFIG,
                format!("{side} GEDCOM not found: {}", path.display()),
            )
            .with_hint("paths are resolved relative to the config file"));
        }
    }

    println!("config OK: {}", config_path.display());
    if let Some(name) = &config.name {
        println!("  name:    {name}");
    }
    println!("  left:    {}", config.left);
    println!("  right:   {}", config.right);
    println!("  anchor:  {} criteria", criteria.len());
    for key in criteria.ignored_keys() {
        println!("  warning: unknown criteria key '{key}' is ignored");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn load_config(path: &Path) -> Result<CompareConfig, CliError> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        CliError::new(EXIT_INVALID_CONFIG, format!("cannot read config {}: {e}", path.display()))
    })?;
    CompareConfig::from_toml(&text).map_err(CliError::from_compare)
}

fn base_dir(config_path: &Path) -> &Path {
    config_path.parent().unwrap_or_else(|| Path::new("."))
}

fn load_tree(path: &Path, options: ParseOptions) -> Result<GedcomTree, CliError> {
    parse_file(path, options).map_err(|e| {
        // Syntax errors only carry a line number.
        let located = matches!(e, GedcomError::Io { .. });
        let mut error = CliError::from_compare(CompareError::Gedcom(e));
        if !located {
            error.message = format!("{}: {}", path.display(), error.message);
        }
        error
    })
}

fn execute(
    config: &CompareConfig,
    left: &Path,
    right: &Path,
    out: &OutputArgs,
) -> Result<(), CliError> {
    let options = ParseOptions {
        strict: config.output.strict,
    };
    let left_tree = load_tree(left, options)?;
    let right_tree = load_tree(right, options)?;

    let result =
        gedcompare_recon::run(config, &left_tree, &right_tree).map_err(CliError::from_compare)?;

    if out.json || out.output.is_some() {
        let json_str = serde_json::to_string_pretty(&result)
            .map_err(|e| CliError::new(EXIT_ERROR, format!("JSON serialization error: {e}")))?;

        if let Some(path) = &out.output {
            std::fs::write(path, &json_str).map_err(|e| {
                CliError::new(EXIT_ERROR, format!("cannot write {}: {e}", path.display()))
            })?;
            eprintln!("wrote {}", path.display());
        }
        if out.json {
            println!("{json_str}");
        }
    }

    if !out.json {
        print!("{}", render_text(&result));
    }
    Ok(())
}

impl CliError {
    pub fn from_compare(err: CompareError) -> Self {
        let hint = match &err {
            CompareError::AnchorNotFound { .. } => {
                Some("check the anchor criteria, e.g. surname=Doe:name=Jane:birth=1980")
            }
            CompareError::Criteria(_) => Some("criteria are colon-separated key=value pairs"),
            CompareError::Gedcom(GedcomError::Io { .. }) => Some("check the GEDCOM path"),
            CompareError::Gedcom(GedcomError::Syntax { .. }) => {
                Some("rerun without --strict to repair malformed lines")
            }
            CompareError::ConfigParse(_) | CompareError::ConfigValidation(_) => None,
        };
        let error = CliError::new(crate::exit_codes::compare_exit_code(&err), err.to_string());
        match hint {
            Some(hint) => error.with_hint(hint),
            None => error,
        }
    }
}
