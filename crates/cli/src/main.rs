// internmatch CLI - browse, filter and AI-search internship listings

mod ask;
mod exit_codes;
mod form;
mod responses;
mod util;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use internmatch_config::Settings;
use internmatch_engine::Dataset;

use exit_codes::{load_exit_code, EXIT_IO, EXIT_SUCCESS, EXIT_VALIDATION};

#[derive(Parser)]
#[command(name = "imatch")]
#[command(about = "Find internships by filters or by asking an AI agent")]
#[command(long_version = long_version())]
#[command(version)]
#[command(subcommand_required = false)]
struct Cli {
    /// Listing table (CSV). Falls back to settings, then "internships with websites.csv"
    #[arg(long, global = true, env = "INTERNMATCH_DATA", value_name = "PATH")]
    data: Option<PathBuf>,

    /// Submission log (CSV). Falls back to settings, then "student_responses.csv"
    #[arg(long, global = true, env = "INTERNMATCH_RESPONSES", value_name = "PATH")]
    responses: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the values each filter accepts
    #[command(after_help = "\
Examples:
  imatch options
  imatch options --json")]
    Options {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Submit the preference form: record it, then list exact matches
    #[command(after_help = "\
A listing matches when its domain, job role, level and industry are each one
of the selected values. Leaving a category unselected matches nothing.

Examples:
  imatch match --name 'Ada Lovelace' --contact ada@example.com \\
      --domain 'Data Analytics' --role Analyst --level Beginner --industry Finance
  imatch match --name Ada --contact 555-0100 --domain Marketing --domain Design \\
      --role Intern --level Beginner --industry Media --json")]
    Match {
        /// Your full name
        #[arg(long)]
        name: String,

        /// Email or phone
        #[arg(long)]
        contact: String,

        /// Preferred domain (repeatable)
        #[arg(long, value_name = "DOMAIN")]
        domain: Vec<String>,

        /// Preferred job role (repeatable)
        #[arg(long, value_name = "ROLE")]
        role: Vec<String>,

        /// Experience level (repeatable)
        #[arg(long, value_name = "LEVEL")]
        level: Vec<String>,

        /// Preferred industry (repeatable)
        #[arg(long, value_name = "INDUSTRY")]
        industry: Vec<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Do not append the submission to the response log
        #[arg(long)]
        no_log: bool,
    },

    /// Describe your goals in free text and let the AI agent suggest listings
    #[command(after_help = "\
Examples:
  imatch ask 'I want to learn data visualization'
  imatch ask 'fintech backend roles' --max-related 10 --json")]
    Ask {
        /// Career goal, skills you want to learn, or preferred industry
        query: String,

        /// Cap on keyword-fallback results
        #[arg(long, value_name = "N")]
        max_related: Option<usize>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List recorded form submissions
    Responses {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// AI configuration and diagnostics
    Ai {
        #[command(subcommand)]
        command: AiCommands,
    },
}

#[derive(Subcommand)]
enum AiCommands {
    /// Show the resolved AI configuration
    Doctor {
        /// Output as JSON for machine parsing
        #[arg(long)]
        json: bool,
    },
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("GIT_COMMIT_HASH"), ")",
        "\nengine:  internmatch-engine ", env!("CARGO_PKG_VERSION"),
        "\ntarget:  ", env!("TARGET"),
    )
}

/// Settings plus the resolved file locations for one invocation.
pub struct AppContext {
    pub settings: Settings,
    pub data_path: PathBuf,
    pub responses_path: PathBuf,
}

impl AppContext {
    fn resolve(data: Option<PathBuf>, responses: Option<PathBuf>) -> Self {
        let settings = Settings::load();
        let data_path = data.unwrap_or_else(|| settings.listings_path.clone());
        let responses_path = responses.unwrap_or_else(|| settings.responses_path.clone());
        log::debug!(
            "data={} responses={}",
            data_path.display(),
            responses_path.display()
        );
        Self {
            settings,
            data_path,
            responses_path,
        }
    }

    /// Load the listing table. Called once per command that needs it.
    pub fn load_dataset(&self) -> Result<Dataset, CliError> {
        internmatch_io::load_dataset(&self.data_path, &self.settings.columns).map_err(|e| {
            let err = CliError {
                code: load_exit_code(&e),
                message: e.to_string(),
                hint: None,
            };
            match e {
                internmatch_io::LoadError::Io { .. } => {
                    err.with_hint("pass --data <PATH> or set INTERNMATCH_DATA")
                }
                internmatch_io::LoadError::MissingColumn { .. } => err.with_hint(format!(
                    "map header names under \"columns\" in {}",
                    Settings::config_path_display()
                )),
                internmatch_io::LoadError::Csv(_) => err,
            }
        })
    }
}

fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging();

    let ctx = AppContext::resolve(cli.data, cli.responses);

    let result = match cli.command {
        None => {
            // No subcommand = show help
            eprintln!("Usage: imatch <command> [options]");
            eprintln!("       imatch --help for more information");
            Ok(())
        }
        Some(Commands::Options { json }) => form::cmd_options(&ctx, json),
        Some(Commands::Match {
            name,
            contact,
            domain,
            role,
            level,
            industry,
            json,
            no_log,
        }) => {
            let selection = form::selection_from_args(domain, role, level, industry);
            form::cmd_match(&ctx, &name, &contact, selection, json, no_log)
        }
        Some(Commands::Ask { query, max_related, json }) => {
            ask::cmd_ask(&ctx, &query, max_related, json)
        }
        Some(Commands::Responses { json }) => responses::cmd_responses(&ctx, json),
        Some(Commands::Ai { command }) => match command {
            AiCommands::Doctor { json } => ask::cmd_ai_doctor(&ctx, json),
        },
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
    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_IO, message: msg.into(), hint: None }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self { code: EXIT_VALIDATION, message: msg.into(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Print a value as pretty JSON on stdout.
pub(crate) fn print_json<T: serde::Serialize>(value: &T) -> Result<(), CliError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::io(format!("JSON serialization failed: {}", e)))?;
    println!("{}", text);
    Ok(())
}
