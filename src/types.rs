//! Core types shared by the alignment, playback, and storage layers.
//!
//! The field names mirror the JSON produced by the remote assessment service so
//! results can be deserialized without an intermediate representation.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Remote timing fields are expressed in 100-nanosecond ticks.
pub const TICKS_PER_SECOND: f64 = 10_000_000.0;

/// Converts a tick count from the assessment service into seconds.
pub fn ticks_to_seconds(ticks: u64) -> f64 {
    ticks as f64 / TICKS_PER_SECOND
}

/// Error classification attached to each recognized word.
///
/// Labels the service emits beyond the four core classes are preserved in
/// [`ErrorKind::Other`] so results round-trip without loss.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ErrorKind {
    #[default]
    None,
    Mispronunciation,
    Omission,
    Insertion,
    Other(String),
}

impl ErrorKind {
    pub fn from_label(label: &str) -> Self {
        match label {
            "None" | "" => ErrorKind::None,
            "Mispronunciation" => ErrorKind::Mispronunciation,
            "Omission" => ErrorKind::Omission,
            "Insertion" => ErrorKind::Insertion,
            other => ErrorKind::Other(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            ErrorKind::None => "None",
            ErrorKind::Mispronunciation => "Mispronunciation",
            ErrorKind::Omission => "Omission",
            ErrorKind::Insertion => "Insertion",
            ErrorKind::Other(label) => label,
        }
    }

    pub fn is_error(&self) -> bool {
        !matches!(self, ErrorKind::None)
    }
}

impl Serialize for ErrorKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for ErrorKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw
            .map(|label| ErrorKind::from_label(&label))
            .unwrap_or_default())
    }
}

/// Per-phoneme accuracy reported for a recognized word.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PhonemeScore {
    #[serde(default)]
    pub phoneme: String,
    #[serde(default)]
    pub accuracy_score: f64,
}

/// A word detected by the assessment service along with its scores.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoredWord {
    #[serde(default)]
    pub word: String,
    #[serde(default)]
    pub accuracy_score: f64,
    #[serde(default)]
    pub error_type: ErrorKind,
    #[serde(default)]
    pub phonemes: Vec<PhonemeScore>,
    /// Start offset in ticks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
    /// Duration in ticks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
}

impl ScoredWord {
    pub fn new(word: impl Into<String>, accuracy_score: f64) -> Self {
        Self {
            word: word.into(),
            accuracy_score,
            ..Self::default()
        }
    }

    pub fn with_error(mut self, error_type: ErrorKind) -> Self {
        self.error_type = error_type;
        self
    }

    pub fn with_timing(mut self, offset: u64, duration: u64) -> Self {
        self.offset = Some(offset);
        self.duration = Some(duration);
        self
    }

    /// The error classification, with the service's literal "None" mapped to absent.
    pub fn error(&self) -> Option<ErrorKind> {
        self.error_type
            .is_error()
            .then(|| self.error_type.clone())
    }

    /// Time interval in seconds, present only when both offset and duration are known.
    pub fn span(&self) -> Option<WordSpan> {
        match (self.offset, self.duration) {
            (Some(offset), Some(duration)) => {
                let start = ticks_to_seconds(offset);
                Some(WordSpan {
                    start,
                    end: start + ticks_to_seconds(duration),
                })
            }
            _ => None,
        }
    }
}

/// Closed time interval `[start, end]` in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WordSpan {
    pub start: f64,
    pub end: f64,
}

impl WordSpan {
    pub fn contains(&self, time: f64) -> bool {
        self.start <= time && time <= self.end
    }
}

/// Headline scores, each in the range 0-100.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Scores {
    #[serde(default)]
    pub pronunciation: f64,
    #[serde(default)]
    pub fluency: f64,
    #[serde(default)]
    pub completeness: f64,
}

/// Aggregate sub-scores from the detailed breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct OverallMetrics {
    #[serde(default)]
    pub accuracy_score: f64,
    #[serde(default)]
    pub fluency_score: f64,
    #[serde(default)]
    pub completeness_score: f64,
    #[serde(default)]
    pub pronunciation_score: f64,
}

/// Word-level breakdown returned alongside the headline scores.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AssessmentDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recognized_text: Option<String>,
    #[serde(default)]
    pub words: Vec<ScoredWord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overall_metrics: Option<OverallMetrics>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Grading strictness sent to the scorer, always within 1..=5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "i64", into = "u8")]
pub struct StrictnessLevel(u8);

impl StrictnessLevel {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// Clamps any integer into the supported range.
    pub fn new(level: i64) -> Self {
        Self(level.clamp(Self::MIN as i64, Self::MAX as i64) as u8)
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn label(self) -> &'static str {
        match self.0 {
            1 => "Very Lenient",
            2 => "Lenient",
            3 => "Balanced",
            4 => "Strict",
            _ => "Very Strict",
        }
    }
}

impl Default for StrictnessLevel {
    fn default() -> Self {
        Self(3)
    }
}

impl From<i64> for StrictnessLevel {
    fn from(level: i64) -> Self {
        Self::new(level)
    }
}

impl From<StrictnessLevel> for u8 {
    fn from(level: StrictnessLevel) -> Self {
        level.0
    }
}

/// Successful response body of the remote analysis call.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub scores: Scores,
    #[serde(default)]
    pub coaching: String,
    #[serde(default)]
    pub mock_mode: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mock_details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub azure_debug: Option<AssessmentDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strictness_level: Option<StrictnessLevel>,
}

impl AnalysisResult {
    /// Per-word breakdown, or an empty slice when the service returned none.
    pub fn word_details(&self) -> &[ScoredWord] {
        self.azure_debug
            .as_ref()
            .map(|details| details.words.as_slice())
            .unwrap_or(&[])
    }
}
