use clap::Parser;
use eyre::{Context, Result, eyre};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use slack_chat_export::export;
use slack_chat_export::utils::{Credential, ExportConfig, OutputFormat};

const TOKEN_VAR: &str = "SLACK_BOT_TOKEN";
const DEFAULT_PAGE_LIMIT: u32 = 1000;

/// Export Slack conversation history to local text or HTML files.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory to place workspace folders in.
    /// Defaults to the current directory if not set in config.
    #[arg(value_name = "TARGET_DIR")]
    target_dir: Option<PathBuf>,

    /// Channel name or ID to export (IDs start with C or D).
    #[arg(short = 'n', long = "channel", value_name = "NAME_OR_ID")]
    channel: Option<String>,

    /// Output format.
    #[arg(short = 't', long = "format", value_enum, default_value = "txt")]
    format: OutputFormat,

    /// Path to a specific configuration file.
    /// Defaults to $XDG_CONFIG_HOME/slack-chat-export/config.toml
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print per-conversation progress details.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress standard output (progress bars).
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Deserialize, Default)]
struct FileConfig {
    target_dir: Option<PathBuf>,
    page_limit: Option<u32>,
}

fn load_file_config(explicit_path: Option<&Path>) -> Result<FileConfig> {
    let path = if let Some(p) = explicit_path {
        if !p.exists() {
            return Err(eyre!("Config file not found: {}", p.display()));
        }
        Some(p.to_path_buf())
    } else {
        // Search: XDG/OS config dir, then nothing
        dirs::config_dir()
            .map(|d| d.join("slack-chat-export/config.toml"))
            .filter(|p| p.exists())
    };

    match path {
        None => Ok(FileConfig::default()),
        Some(p) => {
            let content = fs::read_to_string(&p)
                .wrap_err_with(|| format!("Failed to read config: {}", p.display()))?;
            toml::from_str(&content)
                .wrap_err_with(|| format!("Failed to parse config: {}", p.display()))
        }
    }
}

/// Collect workspace tokens from the environment: `SLACK_BOT_TOKEN` itself plus
/// any `SLACK_BOT_TOKEN_<suffix>` variable. Sorted by variable name so the scan
/// order is deterministic.
fn discover_credentials() -> Vec<Credential> {
    let mut credentials: Vec<Credential> = env::vars()
        .filter(|(name, value)| {
            (name == TOKEN_VAR || name.starts_with("SLACK_BOT_TOKEN_")) && !value.is_empty()
        })
        .map(|(name, value)| Credential {
            source: name,
            token: value,
        })
        .collect();
    credentials.sort_by(|a, b| a.source.cmp(&b.source));
    credentials
}

fn main() -> Result<()> {
    // Tokens may live in a .env file, as with the usual Slack tooling.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // 1. Load config file (CLI path > default path)
    let file_cfg = load_file_config(cli.config.as_deref())?;

    // 2. Resolve the channel argument; without one there is nothing to do.
    let Some(channel) = cli.channel else {
        eprintln!("No conversation name or ID provided.");
        return Ok(());
    };

    // 3. Resolve credentials; without any we cannot talk to Slack.
    let credentials = discover_credentials();
    if credentials.is_empty() {
        eprintln!(
            "No Slack credentials found. Set {TOKEN_VAR} (or {TOKEN_VAR}_<workspace>) in the environment or a .env file."
        );
        return Ok(());
    }

    // 4. Resolve target_dir (CLI > Config > Default)
    let target_dir = cli
        .target_dir
        .or(file_cfg.target_dir)
        .unwrap_or_else(|| PathBuf::from("."));

    // 5. Build the Export Config
    let config = ExportConfig {
        target_dir,
        channel,
        format: cli.format,
        page_limit: file_cfg.page_limit.unwrap_or(DEFAULT_PAGE_LIMIT),
        verbose: cli.verbose,
        quiet: cli.quiet,
    };

    // 6. Run the Business Logic
    export::execute(&config, &credentials)
}
