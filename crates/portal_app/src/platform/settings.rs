use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use chrono::Utc;
use portal_core::DEFAULT_PAGE_SIZE;
use portal_engine::{EngineConfig, GatewaySettings};
use portal_logging::portal_info;
use serde::{Deserialize, Serialize};

use crate::cli::Cli;

pub const DEFAULT_SETTINGS_FILE: &str = "portal.ron";

/// Contents of the RON settings file. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalSettings {
    pub api_url: String,
    pub token: Option<String>,
    pub export_dir: PathBuf,
    pub page_size: u32,
    pub debounce_ms: u64,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub max_export_bytes: u64,
}

impl Default for PortalSettings {
    fn default() -> Self {
        let gateway = GatewaySettings::default();
        let engine = EngineConfig::default();
        Self {
            api_url: gateway.base_url,
            token: None,
            export_dir: engine.export_dir,
            page_size: DEFAULT_PAGE_SIZE,
            debounce_ms: engine.debounce.as_millis() as u64,
            connect_timeout_secs: gateway.connect_timeout.as_secs(),
            request_timeout_secs: gateway.request_timeout.as_secs(),
            max_export_bytes: gateway.max_export_bytes,
        }
    }
}

impl PortalSettings {
    /// Command-line flags and environment win over the file.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(api_url) = &cli.api_url {
            self.api_url = api_url.clone();
        }
        if let Some(token) = &cli.token {
            self.token = Some(token.clone());
        }
        if let Some(export_dir) = &cli.export_dir {
            self.export_dir = export_dir.clone();
        }
    }

    pub fn page_size(&self) -> u32 {
        self.page_size.max(1)
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            gateway: GatewaySettings {
                base_url: self.api_url.clone(),
                bearer_token: self.token.clone().filter(|token| !token.trim().is_empty()),
                connect_timeout: Duration::from_secs(self.connect_timeout_secs),
                request_timeout: Duration::from_secs(self.request_timeout_secs),
                max_export_bytes: self.max_export_bytes,
            },
            export_dir: self.export_dir.clone(),
            debounce: Duration::from_millis(self.debounce_ms),
            clock: Arc::new(Utc::now),
        }
    }
}

/// Loads settings from `path`; a missing file yields the defaults.
pub fn load_settings(path: &Path) -> anyhow::Result<PortalSettings> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            portal_info!("No settings file at {:?}; using defaults", path);
            return Ok(PortalSettings::default());
        }
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read settings from {path:?}"));
        }
    };

    let settings = ron::from_str(&content)
        .with_context(|| format!("failed to parse settings from {path:?}"))?;
    portal_info!("Loaded settings from {:?}", path);
    Ok(settings)
}
