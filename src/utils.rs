use chrono::DateTime;
use clap::ValueEnum;
use std::path::PathBuf;

/// Configuration required to run the export process.
/// This decouples the logic from how the arguments were parsed (CLI/Config file).
#[derive(Clone)]
pub struct ExportConfig {
    pub target_dir: PathBuf,
    pub channel: String,
    pub format: OutputFormat,
    pub page_limit: u32,
    pub verbose: bool,
    pub quiet: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, ValueEnum)]
pub enum OutputFormat {
    Txt,
    Html,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Txt => "txt",
            OutputFormat::Html => "html",
        }
    }
}

/// One workspace credential, discovered from the environment.
#[derive(Clone)]
pub struct Credential {
    /// Name of the environment variable the token came from.
    pub source: String,
    pub token: String,
}

/// Strip a conversation name down to something safe as a filename:
/// alphanumerics, spaces, hyphens and underscores survive, everything else is
/// dropped, and trailing whitespace is trimmed.
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .collect::<String>()
        .trim_end()
        .to_string()
}

/// Directory name for a workspace. Slack team names often contain spaces;
/// the original exporter swapped them for underscores and we keep that.
pub fn workspace_dir_name(workspace: &str) -> String {
    sanitize_name(workspace).replace(' ', "_")
}

/// Convert Slack's epoch-seconds timestamp string (`"1234567890.123456"`)
/// into a readable UTC datetime. Unparsable input is passed through as-is.
pub fn format_slack_ts(ts: &str) -> String {
    let Ok(secs) = ts.parse::<f64>() else {
        return ts.to_string();
    };
    let nanos = (secs.fract() * 1e9) as u32;
    match DateTime::from_timestamp(secs.trunc() as i64, nanos) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => ts.to_string(),
    }
}
