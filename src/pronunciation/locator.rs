//! Maps a playback position onto the word being spoken.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::pronunciation::PronunciationError;
use crate::types::{ScoredWord, WordSpan};

/// Which word to report while playback sits in the gap between two words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GapPolicy {
    /// Hold the most recently finished word.
    #[default]
    LookBack,
    /// Highlight the upcoming word early.
    LookAhead,
}

impl FromStr for GapPolicy {
    type Err = PronunciationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "look-back" | "lookback" | "back" => Ok(GapPolicy::LookBack),
            "look-ahead" | "lookahead" | "ahead" => Ok(GapPolicy::LookAhead),
            other => Err(PronunciationError::new(format!(
                "unknown gap policy \"{other}\" (expected look-back or look-ahead)"
            ))),
        }
    }
}

impl Display for GapPolicy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            GapPolicy::LookBack => write!(f, "look-back"),
            GapPolicy::LookAhead => write!(f, "look-ahead"),
        }
    }
}

/// True when at least one word carries both an offset and a duration.
pub fn has_timing(words: &[ScoredWord]) -> bool {
    words.iter().any(|word| word.span().is_some())
}

/// Returns the index of the current word at `time` seconds, if any.
///
/// Intervals are assumed ordered and non-overlapping. Untimed words are
/// skipped but indices always refer to positions in `words`. Before the first
/// timed word, or without any timing at all, there is no current word. After
/// the last word the final index is held.
pub fn locate(time: f64, words: &[ScoredWord], policy: GapPolicy) -> Option<usize> {
    if !time.is_finite() {
        return None;
    }
    let timed = || {
        words
            .iter()
            .enumerate()
            .filter_map(|(index, word)| word.span().map(|span| (index, span)))
    };

    let (_, first) = timed().next()?;
    if time < first.start {
        return None;
    }
    if let Some((index, _)) = timed().find(|(_, span)| span.contains(time)) {
        return Some(index);
    }

    let finished = last_finished(timed(), time);
    match policy {
        GapPolicy::LookBack => finished,
        GapPolicy::LookAhead => timed()
            .find(|(_, span)| span.start > time)
            .map(|(index, _)| index)
            .or(finished),
    }
}

fn last_finished<I>(spans: I, time: f64) -> Option<usize>
where
    I: Iterator<Item = (usize, WordSpan)>,
{
    spans
        .filter(|(_, span)| span.end <= time)
        .last()
        .map(|(index, _)| index)
}
