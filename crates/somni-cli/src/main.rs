//! Somni CLI - sync sleep records from the terminal
//!
//! Thin frontend over `somni-core`: submits and fetches records against the
//! configured store, and aggregates raw segment dumps into daily totals.

use std::env;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::aot::Generator;
use clap_complete::{generate, shells};
use serde::Serialize;
use somni_core::models::aggregate_segments;
use somni_core::{
    DateKey, SleepObservation, SleepSegment, SleepSyncClient, SyncConfig, SyncError, SyncResult,
};
use thiserror::Error;

#[derive(Parser)]
#[command(name = "somni")]
#[command(about = "Sync sleep records with the Somni record store")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Record store endpoint (falls back to SOMNI_ENDPOINT)
    #[arg(long, value_name = "URL", global = true)]
    endpoint: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit a sleep observation for a date
    Submit {
        /// Date key, `yyyy-MM-dd` (legacy `yyyyMMdd` also accepted)
        date: String,
        /// Deep sleep minutes
        #[arg(long)]
        deep: i64,
        /// Light sleep minutes
        #[arg(long)]
        light: i64,
    },
    /// Fetch the stored observation for a date
    Fetch {
        /// Date key, `yyyy-MM-dd` (legacy `yyyyMMdd` also accepted)
        date: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Aggregate raw sleep segments from a JSON file into daily totals
    Aggregate {
        /// Date key the segments belong to
        date: String,
        /// Path to a JSON array of segments
        #[arg(short, long, value_name = "PATH")]
        input: PathBuf,
        /// Also submit the aggregated totals to the record store
        #[arg(long)]
        submit: bool,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Sync(#[from] SyncError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("No endpoint configured. Pass --endpoint or set SOMNI_ENDPOINT.")]
    EndpointNotConfigured,
    #[error("Stored record for {0} is unreadable; correct the data and resubmit it.")]
    MalformedRecord(String),
    #[error("Record store unreachable ({0}); try again later.")]
    StoreUnavailable(String),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("somni=info".parse().expect("valid directive")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Submit { date, deep, light } => {
            run_submit(&date, deep, light, cli.endpoint).await?;
        }
        Commands::Fetch { date, json } => run_fetch(&date, json, cli.endpoint).await?,
        Commands::Aggregate {
            date,
            input,
            submit,
        } => run_aggregate(&date, &input, submit, cli.endpoint).await?,
        Commands::Completions { shell, output } => run_completions(shell, output.as_deref())?,
    }

    Ok(())
}

async fn run_submit(
    date: &str,
    deep: i64,
    light: i64,
    endpoint: Option<String>,
) -> Result<(), CliError> {
    let observation = SleepObservation::from_raw(date, deep, light)?;
    let client = build_client(endpoint)?;

    client.submit(&observation).await?;
    println!(
        "Stored {}: deep {}m, light {}m",
        observation.date, observation.deep_sleep_minutes, observation.light_sleep_minutes
    );
    Ok(())
}

async fn run_fetch(date: &str, as_json: bool, endpoint: Option<String>) -> Result<(), CliError> {
    let date = DateKey::parse(date)?;
    let client = build_client(endpoint)?;

    let result = client.fetch(date.as_str()).await?;
    println!("{}", render_fetch_outcome(&date, &result, as_json)?);
    Ok(())
}

async fn run_aggregate(
    date: &str,
    input: &Path,
    submit: bool,
    endpoint: Option<String>,
) -> Result<(), CliError> {
    let date = DateKey::parse(date)?;
    let raw = std::fs::read_to_string(input)?;
    let segments: Vec<SleepSegment> = serde_json::from_str(&raw)?;

    let observation = aggregate_segments(date, &segments)?;
    println!(
        "Aggregated {}: deep {}m, light {}m ({} segments)",
        observation.date,
        observation.deep_sleep_minutes,
        observation.light_sleep_minutes,
        segments.len()
    );

    if submit {
        let client = build_client(endpoint)?;
        client.submit(&observation).await?;
        println!("Stored {}", observation.date);
    }

    Ok(())
}

fn run_completions(shell: CompletionShell, output_path: Option<&Path>) -> Result<(), CliError> {
    let mut command = Cli::command();
    let mut buffer = Vec::new();

    match shell {
        CompletionShell::Bash => generate_for_shell(shells::Bash, &mut command, &mut buffer),
        CompletionShell::Zsh => generate_for_shell(shells::Zsh, &mut command, &mut buffer),
        CompletionShell::Fish => generate_for_shell(shells::Fish, &mut command, &mut buffer),
    }

    if let Some(path) = output_path {
        std::fs::write(path, &buffer)?;
        println!("{}", path.display());
    } else {
        io::stdout().write_all(&buffer)?;
    }

    Ok(())
}

fn generate_for_shell<G: Generator>(
    generator: G,
    command: &mut clap::Command,
    buffer: &mut Vec<u8>,
) {
    generate(generator, command, "somni", buffer);
}

fn build_client(endpoint_flag: Option<String>) -> Result<SleepSyncClient, CliError> {
    let endpoint = resolve_endpoint(endpoint_flag, env::var("SOMNI_ENDPOINT").ok())?;
    Ok(SleepSyncClient::new(&SyncConfig::new(endpoint))?)
}

/// The `--endpoint` flag wins over the environment.
fn resolve_endpoint(
    flag: Option<String>,
    env_value: Option<String>,
) -> Result<String, CliError> {
    flag.or(env_value)
        .filter(|value| !value.trim().is_empty())
        .ok_or(CliError::EndpointNotConfigured)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case", tag = "status")]
enum FetchReport<'a> {
    Found {
        date: &'a str,
        deep_sleep_minutes: u32,
        light_sleep_minutes: u32,
    },
    NotFound {
        date: &'a str,
    },
    Malformed {
        date: &'a str,
        body: &'a str,
    },
    Transport {
        date: &'a str,
        detail: &'a str,
    },
}

/// Render a fetch outcome for the terminal.
///
/// JSON mode reports every variant and leaves interpretation to the caller;
/// human mode turns malformed data and unreachable-store outcomes into
/// errors with actionable guidance.
fn render_fetch_outcome(
    date: &DateKey,
    result: &SyncResult,
    as_json: bool,
) -> Result<String, CliError> {
    if as_json {
        let report = match result {
            SyncResult::Found {
                deep_sleep_minutes,
                light_sleep_minutes,
            } => FetchReport::Found {
                date: date.as_str(),
                deep_sleep_minutes: *deep_sleep_minutes,
                light_sleep_minutes: *light_sleep_minutes,
            },
            SyncResult::NotFound => FetchReport::NotFound {
                date: date.as_str(),
            },
            SyncResult::Malformed { body } => FetchReport::Malformed {
                date: date.as_str(),
                body,
            },
            SyncResult::Transport { detail } => FetchReport::Transport {
                date: date.as_str(),
                detail,
            },
        };
        return Ok(serde_json::to_string_pretty(&report)?);
    }

    match result {
        SyncResult::Found {
            deep_sleep_minutes,
            light_sleep_minutes,
        } => Ok(format!(
            "{date}  deep {deep_sleep_minutes}m  light {light_sleep_minutes}m"
        )),
        SyncResult::NotFound => Ok(format!("No record stored for {date}")),
        SyncResult::Malformed { .. } => Err(CliError::MalformedRecord(date.to_string())),
        SyncResult::Transport { detail } => Err(CliError::StoreUnavailable(detail.clone())),
    }
}
