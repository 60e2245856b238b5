use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;
use portal_logging::LogDestination;

use crate::platform::DEFAULT_SETTINGS_FILE;

#[derive(Debug, Parser)]
#[command(name = "portal")]
#[command(about = "Browse, filter and administer the news portal from the terminal")]
#[command(version)]
pub struct Cli {
    /// API root, e.g. http://localhost:5000/api
    #[arg(long, env = "PORTAL_API_URL")]
    pub api_url: Option<String>,

    /// Bearer token of an existing session
    #[arg(long, env = "PORTAL_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// RON settings file
    #[arg(long, default_value = DEFAULT_SETTINGS_FILE)]
    pub config: PathBuf,

    /// Where CSV exports are saved
    #[arg(long)]
    pub export_dir: Option<PathBuf>,

    /// Log destination: file, terminal or both
    #[arg(long, default_value = "file", value_parser = parse_destination)]
    pub log: LogDestination,

    #[arg(long, default_value = "info")]
    pub log_level: LevelFilter,
}

fn parse_destination(value: &str) -> Result<LogDestination, String> {
    LogDestination::parse(value)
        .ok_or_else(|| format!("unknown log destination '{value}' (file, terminal, both)"))
}
