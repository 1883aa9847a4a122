// swapmatch CLI - filter and deduplicate cross-chain swap candidates

mod exit_codes;
mod run;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use exit_codes::{match_exit_code, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "swapmatch")]
#[command(about = "Reduce cross-chain swap candidates to one-to-one matches")]
#[command(version)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load candidate CSVs, filter, resolve conflicts, write final matches
    #[command(after_help = "\
Examples:
  swapmatch run
  swapmatch run daily.swapmatch.toml
  swapmatch run --input-dir data/raw --output data/output/final.csv
  swapmatch run daily.swapmatch.toml --json > result.json")]
    Run {
        /// Path to a .swapmatch.toml config file (defaults apply if omitted)
        config: Option<PathBuf>,

        /// Directory of candidate CSVs (overrides input.dir)
        #[arg(long)]
        input_dir: Option<PathBuf>,

        /// Output CSV path (overrides output.dir / output.file)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Write the JSON run summary to this path (overrides output.summary_json)
        #[arg(long)]
        summary: Option<PathBuf>,

        /// Print the full JSON result to stdout
        #[arg(long)]
        json: bool,
    },

    /// Validate a config without running
    #[command(after_help = "\
Examples:
  swapmatch validate daily.swapmatch.toml")]
    Validate {
        /// Path to the .swapmatch.toml config file
        config: PathBuf,
    },
}

/// Filter used when `RUST_LOG` is unset. Engine and CLI share one level so the
/// engine's per-run summary shows by default.
fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "swapmatch=debug,swapmatch_recon=debug"
    } else {
        "swapmatch=info,swapmatch_recon=info"
    }
}

fn init_tracing(verbose: bool) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(verbose).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() { EXIT_USAGE } else { EXIT_SUCCESS };
            let _ = e.print();
            return ExitCode::from(code);
        }
    };

    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Run {
            config,
            input_dir,
            output,
            summary,
            json,
        } => run::cmd_run(run::RunArgs {
            config,
            input_dir,
            output,
            summary,
            json,
        }),
        Commands::Validate { config } => run::cmd_validate(config),
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

    /// Create error from an engine error with the matching exit code.
    pub fn engine(err: swapmatch_recon::MatchError) -> Self {
        let hint = match &err {
            swapmatch_recon::MatchError::MissingColumn { .. } => Some(
                "every source needs tx1, tx2, bt1, bt2, raw_diff_pct_1 and time_diff columns"
                    .to_string(),
            ),
            _ => None,
        };
        Self { code: match_exit_code(&err), message: err.to_string(), hint }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
