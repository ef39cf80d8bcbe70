use std::sync::Arc;

use crate::pronunciation::locator::{has_timing, locate, GapPolicy};
use crate::types::ScoredWord;

/// Remembers the highlighted word between frames and reports changes only.
#[derive(Debug, Clone)]
pub struct HighlightTracker {
    words: Arc<[ScoredWord]>,
    policy: GapPolicy,
    timed: bool,
    current: Option<usize>,
}

impl HighlightTracker {
    pub fn new(words: impl Into<Arc<[ScoredWord]>>, policy: GapPolicy) -> Self {
        let words = words.into();
        let timed = has_timing(&words);
        Self {
            words,
            policy,
            timed,
            current: None,
        }
    }

    /// False when no word carries timing; the caller should hide highlighting.
    pub fn has_timing(&self) -> bool {
        self.timed
    }

    pub fn current(&self) -> Option<usize> {
        self.current
    }

    pub fn current_word(&self) -> Option<&ScoredWord> {
        self.current.and_then(|index| self.words.get(index))
    }

    pub fn words(&self) -> &[ScoredWord] {
        &self.words
    }

    /// Locates the word at `time` seconds; returns the new index if it changed.
    pub fn sample(&mut self, time: f64) -> Option<Option<usize>> {
        if !self.timed {
            return None;
        }
        let next = locate(time, &self.words, self.policy);
        if next == self.current {
            None
        } else {
            self.current = next;
            Some(next)
        }
    }

    /// Clears the highlight, returning true when one was showing.
    pub fn reset(&mut self) -> bool {
        self.current.take().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TICKS: u64 = 10_000_000;

    fn tracker(policy: GapPolicy) -> HighlightTracker {
        let words = vec![
            ScoredWord::new("she", 90.0).with_timing(0, TICKS),
            ScoredWord::new("sells", 70.0).with_timing(2 * TICKS, TICKS),
        ];
        HighlightTracker::new(words, policy)
    }

    #[test]
    fn reports_only_changes() {
        let mut tracker = tracker(GapPolicy::LookBack);
        assert_eq!(tracker.sample(0.2), Some(Some(0)));
        assert_eq!(tracker.sample(0.4), None);
        assert_eq!(tracker.sample(1.5), None);
        assert_eq!(tracker.sample(2.1), Some(Some(1)));
        assert_eq!(tracker.current_word().map(|w| w.word.as_str()), Some("sells"));
    }

    #[test]
    fn look_ahead_moves_early_in_gaps() {
        let mut tracker = tracker(GapPolicy::LookAhead);
        assert_eq!(tracker.sample(0.2), Some(Some(0)));
        assert_eq!(tracker.sample(1.5), Some(Some(1)));
    }

    #[test]
    fn reset_returns_to_no_word_until_first_interval() {
        let words = vec![ScoredWord::new("late", 80.0).with_timing(TICKS, TICKS)];
        let mut tracker = HighlightTracker::new(words, GapPolicy::LookBack);
        assert_eq!(tracker.sample(1.5), Some(Some(0)));
        assert!(tracker.reset());
        assert!(!tracker.reset());
        assert_eq!(tracker.sample(0.0), None);
        assert_eq!(tracker.current(), None);
        assert_eq!(tracker.sample(1.0), Some(Some(0)));
    }

    #[test]
    fn untimed_words_never_highlight() {
        let mut tracker =
            HighlightTracker::new(vec![ScoredWord::new("cat", 50.0)], GapPolicy::LookBack);
        assert!(!tracker.has_timing());
        assert_eq!(tracker.sample(0.0), None);
        assert_eq!(tracker.current(), None);
    }
}
