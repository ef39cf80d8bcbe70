use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::KeyValueStore;
use crate::pronunciation::metrics::overall_score;
use crate::types::{AnalysisResult, Scores, ScoredWord, StrictnessLevel};

pub const HISTORY_KEY: &str = "accent-coach-history";
/// Oldest attempts are dropped beyond this many entries.
pub const HISTORY_LIMIT: usize = 100;
/// Number of recent attempts shown in the progress trend.
pub const TREND_LENGTH: usize = 30;

static ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// One recorded practice attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
    pub reference_text: String,
    pub scores: Scores,
    pub overall_score: u32,
    #[serde(default)]
    pub coaching: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word_details: Option<Vec<ScoredWord>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strictness_level: Option<StrictnessLevel>,
}

impl HistoryEntry {
    pub fn from_result(reference_text: impl Into<String>, result: &AnalysisResult) -> Self {
        let timestamp = now_millis();
        Self {
            id: generate_id(timestamp),
            timestamp,
            reference_text: reference_text.into(),
            scores: result.scores,
            overall_score: overall_score(&result.scores),
            coaching: result.coaching.clone(),
            word_details: result
                .azure_debug
                .as_ref()
                .map(|details| details.words.clone()),
            strictness_level: result.strictness_level,
        }
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or_default()
}

fn generate_id(timestamp: u64) -> String {
    let sequence = ID_COUNTER.fetch_add(1, Ordering::Relaxed);
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.subsec_nanos() as u64)
        .unwrap_or_default();
    format!("{timestamp}-{:x}{:04x}", nanos, sequence & 0xffff)
}

/// Newest-first list of practice attempts kept in a [`KeyValueStore`].
#[derive(Debug)]
pub struct HistoryBook<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> HistoryBook<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    /// All entries, newest first. Unreadable history is treated as empty.
    pub fn entries(&self) -> Vec<HistoryEntry> {
        let raw = match self.store.get(HISTORY_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(err) => {
                warn!(error = %err, "failed to read practice history");
                return Vec::new();
            }
        };
        serde_json::from_str(&raw).unwrap_or_else(|err| {
            warn!(error = %err, "stored practice history is corrupt; ignoring it");
            Vec::new()
        })
    }

    pub fn record(&mut self, entry: HistoryEntry) -> Result<()> {
        let mut entries = self.entries();
        info!(id = %entry.id, overall = entry.overall_score, "recording practice attempt");
        entries.insert(0, entry);
        entries.truncate(HISTORY_LIMIT);
        self.write(&entries)
    }

    pub fn find(&self, id: &str) -> Option<HistoryEntry> {
        self.entries().into_iter().find(|entry| entry.id == id)
    }

    /// Removes the entry with `id`, returning whether one existed.
    pub fn remove(&mut self, id: &str) -> Result<bool> {
        let mut entries = self.entries();
        let before = entries.len();
        entries.retain(|entry| entry.id != id);
        if entries.len() == before {
            return Ok(false);
        }
        self.write(&entries)?;
        Ok(true)
    }

    /// Overall scores of the most recent `limit` attempts, oldest first.
    pub fn score_trend(&self, limit: usize) -> Vec<u32> {
        let mut scores: Vec<u32> = self
            .entries()
            .iter()
            .take(limit)
            .map(|entry| entry.overall_score)
            .collect();
        scores.reverse();
        scores
    }

    pub fn clear(&mut self) -> Result<()> {
        self.store.delete(HISTORY_KEY)
    }

    fn write(&mut self, entries: &[HistoryEntry]) -> Result<()> {
        let raw = serde_json::to_string(entries).context("failed to serialize history")?;
        self.store.set(HISTORY_KEY, &raw)
    }
}
