use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{ensure, Context, Result};
use serde::Deserialize;

use crate::playback::DEFAULT_FRAME_INTERVAL;
use crate::pronunciation::GapPolicy;

/// Overrides the directory holding `config.json` and the stored data.
pub const HOME_ENV: &str = "ACCENT_COACH_HOME";
const DEFAULT_HOME: &str = ".accent-coach";
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub gap_policy: GapPolicy,
    pub frame_interval: Duration,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawConfig {
    data_dir: Option<PathBuf>,
    gap_policy: Option<GapPolicy>,
    frame_interval_ms: Option<u64>,
}

impl AppConfig {
    /// Loads an explicit config file, else `$ACCENT_COACH_HOME/config.json`
    /// when present, else the defaults.
    pub fn from_override(path: Option<PathBuf>) -> Result<Self> {
        let home = default_home();
        match path {
            Some(custom) => Self::from_file(&custom, &home),
            None => {
                let candidate = home.join(CONFIG_FILE);
                if candidate.is_file() {
                    Self::from_file(&candidate, &home)
                } else {
                    Self::from_raw(RawConfig::default(), &home)
                }
            }
        }
    }

    fn from_file(path: &Path, home: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {:?}", path))?;
        let raw: RawConfig = serde_json::from_str(&data)
            .with_context(|| format!("failed to parse config file {:?}", path))?;
        Self::from_raw(raw, home)
    }

    fn from_raw(raw: RawConfig, home: &Path) -> Result<Self> {
        let frame_interval_ms = raw
            .frame_interval_ms
            .unwrap_or(DEFAULT_FRAME_INTERVAL.as_millis() as u64);
        ensure!(
            frame_interval_ms > 0,
            "frame_interval_ms must be greater than zero"
        );
        Ok(Self {
            data_dir: raw.data_dir.unwrap_or_else(|| home.to_path_buf()),
            gap_policy: raw.gap_policy.unwrap_or_default(),
            frame_interval: Duration::from_millis(frame_interval_ms),
        })
    }
}

fn default_home() -> PathBuf {
    std::env::var_os(HOME_ENV)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_HOME))
}
