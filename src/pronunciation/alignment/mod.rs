//! Maps reference sentence words onto the recognizer's scored word list.
//!
//! The recognizer may insert, omit, or merge words relative to the reference.
//! Alignment is a single greedy forward pass: one cursor into the scored list
//! that only moves forward and never looks past the current candidate. Local
//! mismatches (single omissions, one-for-one substitutions) are absorbed; runs
//! of insertions desynchronize the remainder of the sentence.

pub mod normalize;

use serde::Serialize;

use crate::types::{ErrorKind, ScoredWord};

pub use normalize::{normalize_word, tokenize, ReferenceWord};

/// Score annotation for a single reference word.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordAnnotation {
    pub word: String,
    pub score: Option<f64>,
    pub error: Option<ErrorKind>,
}

impl WordAnnotation {
    fn unscored(word: &str) -> Self {
        Self {
            word: word.to_string(),
            score: None,
            error: None,
        }
    }

    fn omitted(word: &str) -> Self {
        Self {
            word: word.to_string(),
            score: Some(0.0),
            error: Some(ErrorKind::Omission),
        }
    }

    fn matched(word: &str, candidate: &ScoredWord) -> Self {
        Self {
            word: word.to_string(),
            score: Some(candidate.accuracy_score),
            error: candidate.error(),
        }
    }

    pub fn is_omission(&self) -> bool {
        self.error == Some(ErrorKind::Omission)
    }
}

/// Produces exactly one annotation per whitespace token of `reference_text`.
pub fn align(reference_text: &str, scored: &[ScoredWord]) -> Vec<WordAnnotation> {
    let tokens = tokenize(reference_text);
    let (_, annotations) = tokens.iter().fold(
        (0usize, Vec::with_capacity(tokens.len())),
        |(cursor, mut annotations), token| {
            let (annotation, next) = align_token(token, scored, cursor);
            annotations.push(annotation);
            (next, annotations)
        },
    );
    annotations
}

/// Annotates one reference token against `scored[cursor]`, returning the next cursor.
fn align_token(
    token: &ReferenceWord<'_>,
    scored: &[ScoredWord],
    cursor: usize,
) -> (WordAnnotation, usize) {
    let Some(candidate) = scored.get(cursor) else {
        return (WordAnnotation::unscored(token.surface), cursor);
    };
    let candidate_normalized = normalize_word(&candidate.word);
    if normalize::words_match(&token.normalized, &candidate_normalized) {
        (WordAnnotation::matched(token.surface, candidate), cursor + 1)
    } else if candidate.error_type == ErrorKind::Omission {
        (WordAnnotation::omitted(token.surface), cursor + 1)
    } else {
        (WordAnnotation::unscored(token.surface), cursor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_reference_yields_no_annotations() {
        assert!(align("", &[ScoredWord::new("cat", 90.0)]).is_empty());
        assert!(align(" \n ", &[]).is_empty());
    }

    #[test]
    fn unmatched_candidate_is_retried_on_next_token() {
        let scored = vec![ScoredWord::new("sat", 75.0)];
        let result = align("The cat sat", &scored);
        assert_eq!(result[0].score, None);
        assert_eq!(result[1].score, None);
        assert_eq!(result[2].score, Some(75.0));
    }

    #[test]
    fn cursor_never_rewinds_after_running_out() {
        let scored = vec![ScoredWord::new("the", 90.0)];
        let result = align("the the the", &scored);
        let scores: Vec<Option<f64>> = result.iter().map(|a| a.score).collect();
        assert_eq!(scores, [Some(90.0), None, None]);
    }

    #[test]
    fn matched_error_labels_are_carried() {
        let scored = vec![ScoredWord::new("cat", 40.0).with_error(ErrorKind::Mispronunciation)];
        let result = align("cat", &scored);
        assert_eq!(result[0].error, Some(ErrorKind::Mispronunciation));
    }
}
