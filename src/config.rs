use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::retry::{BackoffPolicy, PollConfig};

/// Poll cadence parameters (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollSettings {
    /// Sleep between probe attempts, in seconds (e.g. 1.0).
    pub interval_secs: f64,
    /// Budget for one poll loop, in seconds.
    pub timeout_secs: u64,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval_secs: 1.0,
            timeout_secs: 120,
        }
    }
}

impl PollSettings {
    pub fn to_poll_config(&self) -> PollConfig {
        PollConfig {
            interval: Duration::from_secs_f64(self.interval_secs.max(0.0)),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

/// Backoff parameters for the reachability probe (optional section).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackoffSettings {
    /// Delay before the second attempt, in seconds (e.g. 0.5 = 500ms).
    pub initial_delay_secs: f64,
    /// Budget for the whole retry sequence, in seconds.
    pub max_total_secs: u64,
    /// Maximum number of attempts (including the first).
    pub max_attempts: u32,
}

impl Default for BackoffSettings {
    fn default() -> Self {
        Self {
            initial_delay_secs: 0.5,
            max_total_secs: 120,
            max_attempts: 6,
        }
    }
}

impl BackoffSettings {
    pub fn to_backoff_policy(&self) -> BackoffPolicy {
        BackoffPolicy {
            initial_delay: Duration::from_secs_f64(self.initial_delay_secs.max(0.0)),
            max_total: Duration::from_secs(self.max_total_secs),
            max_attempts: self.max_attempts,
        }
    }
}

/// Global configuration loaded from `~/.config/routeready/config.toml`.
///
/// Carries the ambient knobs only; the verification target (selector,
/// service, expected marker) is per-run data on `verify::RouteSpec`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteReadyConfig {
    /// Namespace the workload and service live in.
    pub namespace: String,
    /// Per-call HTTP timeout for the reachability probe, in seconds.
    pub http_timeout_secs: u64,
    /// Optional poll cadence; built-in defaults if missing.
    #[serde(default)]
    pub poll: Option<PollSettings>,
    /// Optional backoff policy; built-in defaults if missing.
    #[serde(default)]
    pub backoff: Option<BackoffSettings>,
}

impl Default for RouteReadyConfig {
    fn default() -> Self {
        Self {
            namespace: "default".to_string(),
            http_timeout_secs: 5,
            poll: None,
            backoff: None,
        }
    }
}

impl RouteReadyConfig {
    pub fn poll_config(&self) -> PollConfig {
        self.poll
            .as_ref()
            .map(PollSettings::to_poll_config)
            .unwrap_or_else(|| PollSettings::default().to_poll_config())
    }

    pub fn backoff_policy(&self) -> BackoffPolicy {
        self.backoff
            .as_ref()
            .map(BackoffSettings::to_backoff_policy)
            .unwrap_or_else(|| BackoffSettings::default().to_backoff_policy())
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("routeready")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<RouteReadyConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = RouteReadyConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: RouteReadyConfig = toml::from_str(&data)?;
    Ok(cfg)
}
