use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use textmeta_core::{FontRegistry, GroupRevision, PackRevision, RecordKind};
use textmeta_loader::{
    BatchReport, Config, DEFAULT_CONFIG_FILE, collect_record_paths, validate_batch,
};

/// CLI-specific group revision enum with clap argument parsing support.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliGroupRevision {
    Legacy,
    Current,
}

impl From<CliGroupRevision> for GroupRevision {
    fn from(revision: CliGroupRevision) -> Self {
        match revision {
            CliGroupRevision::Legacy => Self::Legacy,
            CliGroupRevision::Current => Self::Current,
        }
    }
}

/// CLI-specific pack revision enum with clap argument parsing support.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliPackRevision {
    Legacy,
    Current,
}

impl From<CliPackRevision> for PackRevision {
    fn from(revision: CliPackRevision) -> Self {
        match revision {
            CliPackRevision::Legacy => Self::Legacy,
            CliPackRevision::Current => Self::Current,
        }
    }
}

/// CLI-specific font registry enum with clap argument parsing support.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliFontRegistry {
    Legacy,
    Current,
}

impl From<CliFontRegistry> for FontRegistry {
    fn from(fonts: CliFontRegistry) -> Self {
        match fonts {
            CliFontRegistry::Legacy => Self::Legacy,
            CliFontRegistry::Current => Self::Current,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum CliOutputFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "textmeta", version)]
#[command(about = "Validate artist, group and pack metadata records")]
struct Cli {
    #[command(flatten)]
    options: GlobalArgs,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct GlobalArgs {
    /// Print a GOOD line for every accepted record.
    #[arg(short, long, global = true)]
    verbose: bool,
    /// Configuration file (default: ./.textmeta.yml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Number of validation threads (default: number of CPUs).
    #[arg(long, global = true)]
    jobs: Option<usize>,
    /// Group schema revision, overriding the configuration file.
    #[arg(long, global = true)]
    group_revision: Option<CliGroupRevision>,
    /// Pack schema revision, overriding the configuration file.
    #[arg(long, global = true)]
    pack_revision: Option<CliPackRevision>,
    /// Font registry, overriding the configuration file.
    #[arg(long, global = true)]
    fonts: Option<CliFontRegistry>,
    /// Output format for results.
    #[arg(long, global = true, default_value = "text")]
    format: CliOutputFormat,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Validate artist profiles.
    Artist(RecordArgs),
    /// Validate group profiles.
    Group(RecordArgs),
    /// Validate release pack manifests.
    Pack(RecordArgs),
    /// Print the effective configuration.
    Config,
}

#[derive(Debug, Args)]
struct RecordArgs {
    /// Record files and/or directories containing *.yml records.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = load_config(&cli.options).and_then(|config| match cli.command {
        Command::Artist(args) => run_records(RecordKind::Artist, args, &config, &cli.options),
        Command::Group(args) => run_records(RecordKind::Group, args, &config, &cli.options),
        Command::Pack(args) => run_records(RecordKind::Pack, args, &config, &cli.options),
        Command::Config => run_config(&config),
    });

    match result {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

/// Loads the configuration file and applies command-line overrides.
fn load_config(options: &GlobalArgs) -> Result<Config, String> {
    let mut config = match &options.config {
        Some(path) => Config::load(path)
            .map_err(|e| format!("Failed to load config '{}': {e}", path.display()))?,
        None => Config::load_or_default(DEFAULT_CONFIG_FILE)
            .map_err(|e| format!("Failed to load config '{DEFAULT_CONFIG_FILE}': {e}"))?,
    };

    if let Some(revision) = options.group_revision {
        config.schema.group = revision.into();
    }
    if let Some(revision) = options.pack_revision {
        config.schema.pack = revision.into();
    }
    if let Some(fonts) = options.fonts {
        config.schema.fonts = fonts.into();
    }
    if options.jobs.is_some() {
        config.batch.jobs = options.jobs;
    }

    Ok(config)
}

fn run_records(
    kind: RecordKind,
    args: RecordArgs,
    config: &Config,
    options: &GlobalArgs,
) -> Result<ExitCode, String> {
    if config.batch.jobs == Some(0) {
        return Err("--jobs must be at least 1".to_string());
    }

    let paths = collect_record_paths(&args.inputs).map_err(|e| e.to_string())?;
    let report = validate_batch(&config.validator(), kind, &paths, config.batch.jobs)
        .map_err(|e| e.to_string())?;

    match options.format {
        CliOutputFormat::Text => print_text(&report, options.verbose),
        CliOutputFormat::Json => {
            let json = serde_json::to_string_pretty(&report)
                .map_err(|e| format!("Failed to serialize report: {e}"))?;
            println!("{json}");
        }
    }

    Ok(exit_code(report.failed()))
}

fn print_text(report: &BatchReport, verbose: bool) {
    for outcome in &report.outcomes {
        match &outcome.error {
            Some(failure) => eprintln!("FAIL {}: {failure}", outcome.source.display()),
            None if verbose => println!("GOOD {}", outcome.source.display()),
            None => {}
        }
    }

    if report.is_success() {
        println!("GOOD {} files passed", report.outcomes.len());
    }
}

/// Exit status for a batch: 0 when everything passed, otherwise the number
/// of failures capped at 255 so it never wraps around to success.
fn exit_code(failed: usize) -> ExitCode {
    ExitCode::from(failed.min(u8::MAX as usize) as u8)
}

fn run_config(config: &Config) -> Result<ExitCode, String> {
    let yaml = config
        .to_yaml()
        .map_err(|e| format!("Failed to render config: {e}"))?;
    print!("{yaml}");
    Ok(ExitCode::SUCCESS)
}
