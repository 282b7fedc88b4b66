use std::fs;
use std::path::Path;
use std::time::Duration;

use ao_sim::config::ExperimentConfig;
use tracing::{debug, warn};

use crate::error::ClientError;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Where and how to reach the simulation service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ClientSettings {
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Read overrides through `lookup`. Malformed values are ignored.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut settings = Self::default();

        // AO_SIM_URL=http://host:8000
        if let Some(v) = lookup("AO_SIM_URL") {
            let v = v.trim();
            if !v.is_empty() {
                settings.base_url = v.trim_end_matches('/').to_string();
            }
        }

        // AO_SIM_TIMEOUT_SECS=30
        if let Some(v) = lookup("AO_SIM_TIMEOUT_SECS") {
            match v.trim().parse::<u64>() {
                Ok(n) => settings.timeout = Duration::from_secs(n.max(1)),
                Err(_) => warn!("ignoring AO_SIM_TIMEOUT_SECS={:?}", v),
            }
        }

        settings
    }

    pub fn with_base_url(self, url: &str) -> Self {
        Self {
            base_url: url.trim().trim_end_matches('/').to_string(),
            ..self
        }
    }
}

/// Load a saved experiment. Missing fields take their defaults.
pub fn load_experiment(path: &Path) -> Result<ExperimentConfig, ClientError> {
    let text = fs::read_to_string(path).map_err(ClientError::io(path))?;
    let config = serde_json::from_str(&text)?;
    debug!("loaded experiment from {}", path.display());
    Ok(config)
}

/// Load a saved experiment, or the default one when the file does not exist.
pub fn load_experiment_or_default(path: &Path) -> Result<ExperimentConfig, ClientError> {
    if !path.exists() {
        debug!("no experiment at {}; using defaults", path.display());
        return Ok(ExperimentConfig::default());
    }
    load_experiment(path)
}

fn ensure_parent(path: &Path) -> Result<(), ClientError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(ClientError::io(parent))?;
        }
    }
    Ok(())
}

pub fn save_experiment(path: &Path, config: &ExperimentConfig) -> Result<(), ClientError> {
    ensure_parent(path)?;
    let text = serde_json::to_string_pretty(config)?;
    fs::write(path, text).map_err(ClientError::io(path))?;
    debug!("saved experiment to {}", path.display());
    Ok(())
}

/// Write a CSV/JSON export body as received, creating parent directories.
pub fn save_download(path: &Path, body: &str) -> Result<(), ClientError> {
    ensure_parent(path)?;
    fs::write(path, body).map_err(ClientError::io(path))?;
    debug!("saved {} bytes to {}", body.len(), path.display());
    Ok(())
}
