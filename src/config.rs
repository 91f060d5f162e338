use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::overlay::Viewport;

const DEFAULT_SERVICE_URL: &str = "http://127.0.0.1:8000";
const DEFAULT_TIMEOUT_SECS: u64 = 20;
const DEFAULT_HISTORY_DB: &str = "ecosort_scans.db";
const DEFAULT_VIEWPORT_WIDTH: f64 = 390.0;
const DEFAULT_VIEWPORT_HEIGHT: f64 = 844.0;

#[derive(Debug, Deserialize, Default)]
struct ScanConfigFile {
    service: Option<ServiceConfigFile>,
    viewport: Option<ViewportConfigFile>,
    history: Option<HistoryConfigFile>,
}

#[derive(Debug, Deserialize, Default)]
struct ServiceConfigFile {
    base_url: Option<String>,
    token_path: Option<PathBuf>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize, Default)]
struct ViewportConfigFile {
    width: Option<f64>,
    height: Option<f64>,
}

#[derive(Debug, Deserialize, Default)]
struct HistoryConfigFile {
    db_path: Option<String>,
}

/// Runtime configuration for the scan kernel binaries.
///
/// Loaded from an optional JSON file (`ECOSORT_CONFIG`), then
/// overridden by environment variables, then validated.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub service: ServiceSettings,
    pub viewport: Viewport,
    pub history_db_path: String,
}

#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub base_url: String,
    /// Path to a file holding the bearer token, if the service
    /// requires one.
    pub token_path: Option<PathBuf>,
    pub timeout: Duration,
}

impl ScanConfig {
    pub fn load() -> Result<Self> {
        let config_path = std::env::var("ECOSORT_CONFIG").ok();
        let file_cfg = match config_path.as_deref() {
            Some(path) => Some(read_config_file(Path::new(path))?),
            None => None,
        };
        let mut cfg = Self::from_file(file_cfg.unwrap_or_default());
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(file: ScanConfigFile) -> Self {
        let service = ServiceSettings {
            base_url: file
                .service
                .as_ref()
                .and_then(|service| service.base_url.clone())
                .unwrap_or_else(|| DEFAULT_SERVICE_URL.to_string()),
            token_path: file
                .service
                .as_ref()
                .and_then(|service| service.token_path.clone()),
            timeout: Duration::from_secs(
                file.service
                    .as_ref()
                    .and_then(|service| service.timeout_secs)
                    .unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
        };
        let viewport = Viewport::new(
            file.viewport
                .as_ref()
                .and_then(|viewport| viewport.width)
                .unwrap_or(DEFAULT_VIEWPORT_WIDTH),
            file.viewport
                .as_ref()
                .and_then(|viewport| viewport.height)
                .unwrap_or(DEFAULT_VIEWPORT_HEIGHT),
        );
        let history_db_path = file
            .history
            .and_then(|history| history.db_path)
            .unwrap_or_else(|| DEFAULT_HISTORY_DB.to_string());
        Self {
            service,
            viewport,
            history_db_path,
        }
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(url) = std::env::var("ECOSORT_SERVICE_URL") {
            if !url.trim().is_empty() {
                self.service.base_url = url;
            }
        }
        if let Ok(path) = std::env::var("ECOSORT_SERVICE_TOKEN_PATH") {
            if !path.trim().is_empty() {
                self.service.token_path = Some(PathBuf::from(path));
            }
        }
        if let Ok(secs) = std::env::var("ECOSORT_TIMEOUT_SECS") {
            let secs: u64 = secs.parse().map_err(|_| {
                anyhow!("ECOSORT_TIMEOUT_SECS must be an integer number of seconds")
            })?;
            self.service.timeout = Duration::from_secs(secs);
        }
        if let Ok(db_path) = std::env::var("ECOSORT_HISTORY_DB") {
            if !db_path.trim().is_empty() {
                self.history_db_path = db_path;
            }
        }
        if let Ok(viewport) = std::env::var("ECOSORT_VIEWPORT") {
            if !viewport.trim().is_empty() {
                self.viewport = parse_viewport(&viewport)?;
            }
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.service.base_url.trim().is_empty() {
            return Err(anyhow!("service base_url must not be empty"));
        }
        if self.service.timeout.as_secs() == 0 {
            return Err(anyhow!("service timeout must be greater than zero"));
        }
        if !(self.viewport.width > 0.0 && self.viewport.height > 0.0) {
            return Err(anyhow!("viewport dimensions must be positive"));
        }
        if self.history_db_path.trim().is_empty() {
            return Err(anyhow!("history db_path must not be empty"));
        }
        Ok(())
    }

    /// Read the bearer token from `token_path`, if configured.
    pub fn service_token(&self) -> Result<Option<String>> {
        let Some(path) = &self.service.token_path else {
            return Ok(None);
        };
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow!("failed to read token file {}: {}", path.display(), e))?;
        let token = raw.trim();
        if token.is_empty() {
            return Err(anyhow!("token file {} is empty", path.display()));
        }
        Ok(Some(token.to_string()))
    }
}

fn read_config_file(path: &Path) -> Result<ScanConfigFile> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read config file {}: {}", path.display(), e))?;
    let cfg = serde_json::from_str(&raw)
        .map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?;
    Ok(cfg)
}

/// Parse a "WxH" viewport override, e.g. "390x844".
pub fn parse_viewport(value: &str) -> Result<Viewport> {
    let (width, height) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| anyhow!("viewport must be WIDTHxHEIGHT, got '{}'", value))?;
    let width: f64 = width
        .trim()
        .parse()
        .map_err(|_| anyhow!("invalid viewport width '{}'", width))?;
    let height: f64 = height
        .trim()
        .parse()
        .map_err(|_| anyhow!("invalid viewport height '{}'", height))?;
    if !(width > 0.0 && height > 0.0) {
        return Err(anyhow!("viewport dimensions must be positive"));
    }
    Ok(Viewport::new(width, height))
}
