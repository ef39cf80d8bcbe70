use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::KeyValueStore;
use crate::types::StrictnessLevel;

pub const SETTINGS_KEY: &str = "accent-coach-settings";

/// Learner preferences. Missing stored fields fall back to the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub debug_mode: bool,
    pub strictness: StrictnessLevel,
}

/// Partial update applied over the current settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SettingsPatch {
    pub debug_mode: Option<bool>,
    pub strictness: Option<StrictnessLevel>,
}

impl Settings {
    pub fn merged(self, patch: SettingsPatch) -> Self {
        Self {
            debug_mode: patch.debug_mode.unwrap_or(self.debug_mode),
            strictness: patch.strictness.unwrap_or(self.strictness),
        }
    }
}

#[derive(Debug)]
pub struct SettingsStore<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> SettingsStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Stored settings over defaults; unreadable data yields the defaults.
    pub fn load(&self) -> Settings {
        match self.store.get(SETTINGS_KEY) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|err| {
                warn!(error = %err, "stored settings are corrupt; using defaults");
                Settings::default()
            }),
            Ok(None) => Settings::default(),
            Err(err) => {
                warn!(error = %err, "failed to read settings; using defaults");
                Settings::default()
            }
        }
    }

    pub fn update(&mut self, patch: SettingsPatch) -> Result<Settings> {
        let updated = self.load().merged(patch);
        let raw = serde_json::to_string(&updated).context("failed to serialize settings")?;
        self.store.set(SETTINGS_KEY, &raw)?;
        Ok(updated)
    }
}
