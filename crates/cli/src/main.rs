// rostermatch CLI - batch enrichment of a facility directory with staff
// postings matched from freeform location text.

mod convert;
mod exit_codes;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use rostermatch_engine::model::UnmatchedPosting;
use rostermatch_engine::{input, EnrichResult, MatchConfig};

pub use exit_codes::{EXIT_INVALID_CONFIG, EXIT_PARSE, EXIT_RUNTIME, EXIT_UNMATCHED};

#[derive(Parser)]
#[command(name = "rostermatch")]
#[command(about = "Match freeform staff postings to a canonical facility directory")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the enrichment from a TOML config file
    #[command(after_help = "\
Examples:
  rostermatch run enrich.toml
  rostermatch run enrich.toml --json
  rostermatch run enrich.toml --output enriched.json")]
    Run {
        /// Path to the run config; input paths resolve relative to it
        config: PathBuf,

        /// Print the enriched JSON to stdout
        #[arg(long)]
        json: bool,

        /// Write the enriched JSON to file (overrides the config's output path)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Validate a run config without matching
    #[command(after_help = "\
Examples:
  rostermatch validate enrich.toml")]
    Validate {
        /// Path to the run config
        config: PathBuf,
    },

    /// Build the facility directory JSON from a spreadsheet CSV export
    #[command(after_help = "\
Examples:
  rostermatch convert facilities.csv -o directory.json
  rostermatch convert export.csv --name-col 'facility' --remarks-col 'notes'")]
    Convert(convert::ConvertArgs),
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn new(code: u8, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            hint: None,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            config,
            json,
            output,
        } => cmd_run(config, json, output),
        Commands::Validate { config } => cmd_validate(config),
        Commands::Convert(args) => convert::cmd_convert(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {hint}");
            }
            ExitCode::from(err.code)
        }
    }
}

/// Load everything the config names and run the engine. Paths in the config
/// resolve relative to the config file's directory.
fn run_enrichment(config_path: &Path) -> Result<(MatchConfig, EnrichResult), CliError> {
    let config_str = std::fs::read_to_string(config_path)
        .map_err(|e| CliError::new(EXIT_RUNTIME, format!("cannot read config: {e}")))?;
    let config = MatchConfig::from_toml(&config_str)
        .map_err(|e| CliError::new(EXIT_INVALID_CONFIG, e.to_string()))?;

    let base_dir = config_path.parent().unwrap_or_else(|| Path::new("."));

    let facilities_path = base_dir.join(&config.facilities);
    let facilities_str = std::fs::read_to_string(&facilities_path).map_err(|e| {
        CliError::new(
            EXIT_RUNTIME,
            format!("cannot read {}: {e}", facilities_path.display()),
        )
    })?;
    let facilities = input::load_facilities_json(&facilities_str)
        .map_err(|e| CliError::new(EXIT_PARSE, e.to_string()))?;

    let postings_path = base_dir.join(&config.postings);
    let postings_str = std::fs::read_to_string(&postings_path).map_err(|e| {
        CliError::new(
            EXIT_RUNTIME,
            format!("cannot read {}: {e}", postings_path.display()),
        )
    })?;
    let postings = input::load_postings_csv(&postings_str, &config.columns)
        .map_err(|e| CliError::new(EXIT_PARSE, e.to_string()))?;

    let result = rostermatch_engine::run(&config, facilities, &postings)
        .map_err(|e| CliError::new(EXIT_RUNTIME, e.to_string()))?;

    Ok((config, result))
}

fn cmd_run(
    config_path: PathBuf,
    json_output: bool,
    output_file: Option<PathBuf>,
) -> Result<(), CliError> {
    let (config, result) = run_enrichment(&config_path)?;

    let json_str = serde_json::to_string_pretty(&result)
        .map_err(|e| CliError::new(EXIT_RUNTIME, format!("JSON serialization error: {e}")))?;

    let base_dir = config_path.parent().unwrap_or_else(|| Path::new("."));
    let out_path = output_file.or_else(|| config.output.as_ref().map(|o| base_dir.join(o)));
    if let Some(ref path) = out_path {
        std::fs::write(path, &json_str)
            .map_err(|e| CliError::new(EXIT_RUNTIME, format!("cannot write output: {e}")))?;
        eprintln!("wrote {}", path.display());
    }

    if json_output {
        println!("{json_str}");
    }

    // Human summary to stderr
    let s = &result.summary;
    eprintln!(
        "{} facilities across {} districts: {}/{} postings matched ({} via district fallback), {} unmatched",
        result.facilities.len(),
        s.districts,
        s.matched,
        s.postings,
        s.matched_via_fallback,
        s.unmatched,
    );
    if !s.roles.is_empty() {
        eprintln!("roles: {}", s.roles.join(", "));
    }

    if !result.unmatched.is_empty() {
        eprintln!("unmatched postings:");
        for u in &result.unmatched {
            eprintln!("  {}", unmatched_line(u));
        }
        return Err(CliError::new(EXIT_UNMATCHED, "unmatched postings remain"));
    }

    Ok(())
}

fn unmatched_line(u: &UnmatchedPosting) -> String {
    let best = match &u.best_candidate {
        Some(name) => format!("'{name}'"),
        None => "(none)".to_string(),
    };
    format!(
        "[{}] '{}' ({}): best={best} score={:.3}",
        u.district, u.place_of_posting, u.staff_name, u.best_score,
    )
}

fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config_str = std::fs::read_to_string(&config_path)
        .map_err(|e| CliError::new(EXIT_RUNTIME, format!("cannot read config: {e}")))?;

    match MatchConfig::from_toml(&config_str) {
        Ok(config) => {
            eprintln!(
                "valid: '{}' (threshold {}, {} extra alias(es), facilities={}, postings={})",
                config.name,
                config.threshold,
                config.aliases.len(),
                config.facilities,
                config.postings,
            );
            Ok(())
        }
        Err(e) => Err(CliError::new(EXIT_INVALID_CONFIG, e.to_string())),
    }
}
