//! custody: validate token files and inspect their value.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use custody_crypto::encode_address;
use custody_currency::CurrencyRegistry;
use custody_store::{CachedRepository, FsRepository, TokenCache};
use custody_token::Token;
use custody_types::{Clock, SystemClock, Timestamp};
use custody_utils::{format_age, init_logging, LogFormat};
use custody_validator::{FailureMode, ValidationError, ValidatorConfig, Validator};

/// Exit code for a token that failed validation.
const EXIT_INVALID: u8 = 1;
/// Exit code for a lookup that failed transiently; retry later.
const EXIT_RETRY: u8 = 2;

#[derive(Parser)]
#[command(name = "custody", version, about = "Validate custody tokens")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, global = true, env = "CUSTODY_CONFIG")]
    config: Option<PathBuf>,

    /// Log format: "human" or "json".
    #[arg(long, global = true, env = "CUSTODY_LOG_FORMAT")]
    log_format: Option<String>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, global = true, env = "CUSTODY_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Validate one or more token JSON files.
    Validate {
        files: Vec<PathBuf>,

        /// Validation preset: "minimal", "full" or "offline".
        #[arg(long, env = "CUSTODY_MODE")]
        mode: Option<String>,

        /// "collect-all", "fail-on-first" or "fail-at-end".
        #[arg(long)]
        failure_mode: Option<FailureMode>,

        /// Directory of token JSON files used to resolve references.
        #[arg(long, env = "CUSTODY_REPOSITORY_DIR")]
        repository_dir: Option<PathBuf>,
    },
    /// Print the value a token has at a given moment.
    Value {
        file: PathBuf,

        /// Unix seconds; defaults to now.
        #[arg(long)]
        at: Option<u64>,
    },
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ValidatorConfig::from_toml_file(path)?,
        None => ValidatorConfig::default(),
    };
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    let format: LogFormat = config.log_format.parse()?;
    init_logging(format, &config.log_level)?;

    match cli.command {
        Command::Validate {
            files,
            mode,
            failure_mode,
            repository_dir,
        } => {
            if let Some(mode) = mode {
                config.mode = mode;
            }
            if let Some(failure_mode) = failure_mode {
                config.failure_mode = failure_mode;
            }
            if repository_dir.is_some() {
                config.repository_dir = repository_dir;
            }
            validate(&config, &files)
        }
        Command::Value { file, at } => value(&file, at),
    }
}

fn read_token(path: &Path) -> anyhow::Result<Token> {
    let json = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    Token::from_json(&json).with_context(|| format!("parsing {}", path.display()))
}

fn validate(config: &ValidatorConfig, files: &[PathBuf]) -> anyhow::Result<ExitCode> {
    anyhow::ensure!(!files.is_empty(), "no token files given");
    let mode = config.validation_mode()?;

    let cache = Arc::new(TokenCache::new());
    let mut validator = Validator::standard()
        .with_config(config)
        .with_verdict_cache(cache.clone());
    if let Some(dir) = &config.repository_dir {
        let repository = FsRepository::open(dir).with_context(|| format!("opening {}", dir.display()))?;
        validator = validator.with_repository(Arc::new(CachedRepository::new(repository, cache)));
    }
    tracing::info!(%mode, files = files.len(), "validating");

    let mut exit = 0u8;
    for path in files {
        let json = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        match validator.validate_json(&json, &mode) {
            Ok(result) if result.is_valid() => {
                let note = if result.is_fully_verified() { "" } else { " (not fully verified)" };
                println!("{}: valid{note}", path.display());
                tracing::info!(file = %path.display(), token = %result.token, "valid");
            }
            Ok(result) | Err(ValidationError::Invalid(result)) => {
                println!("{}: {result}", path.display());
                tracing::info!(file = %path.display(), failures = result.failures.len(), "invalid");
                exit = exit.max(EXIT_INVALID);
            }
            Err(e @ ValidationError::Network { .. }) => {
                println!("{}: {e}", path.display());
                exit = exit.max(EXIT_RETRY);
            }
            Err(e @ ValidationError::Fatal(_)) => {
                println!("{}: {e}", path.display());
                exit = exit.max(EXIT_INVALID);
            }
            Err(e) => return Err(e).with_context(|| format!("validating {}", path.display())),
        }
    }
    Ok(ExitCode::from(exit))
}

fn value(path: &Path, at: Option<u64>) -> anyhow::Result<ExitCode> {
    let token = read_token(path)?;
    let now = at.map_or_else(|| SystemClock.now(), Timestamp::from_secs);
    let value = token.current_value(&CurrencyRegistry::standard(), now)?;
    println!(
        "{} {} (issued {} ago, {} transactions)",
        value,
        token.header().currency(),
        format_age(token.header().timestamp(), now),
        token.transactions().len(),
    );
    match token.current_owner() {
        Some(owner) => println!("owner: {}", encode_address(owner)),
        None => println!("terminated by {}", encode_address(token.last_owner())),
    }
    Ok(ExitCode::SUCCESS)
}
