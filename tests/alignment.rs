use accent_coach::pronunciation::{align, WordAnnotation};
use accent_coach::types::{ErrorKind, ScoredWord};
use approx::assert_relative_eq;

fn scores(annotations: &[WordAnnotation]) -> Vec<Option<f64>> {
    annotations.iter().map(|a| a.score).collect()
}

fn omission(word: &str) -> ScoredWord {
    ScoredWord::new(word, 0.0).with_error(ErrorKind::Omission)
}

#[test]
fn output_length_matches_reference_tokens() {
    let scored_variants: Vec<Vec<ScoredWord>> = vec![
        Vec::new(),
        vec![ScoredWord::new("the", 90.0)],
        vec![
            ScoredWord::new("quick", 80.0),
            ScoredWord::new("brown", 70.0),
            ScoredWord::new("fox", 60.0),
            ScoredWord::new("jumps", 50.0),
            ScoredWord::new("extra", 40.0).with_error(ErrorKind::Insertion),
            ScoredWord::new("words", 30.0),
        ],
        vec![omission("x"); 12],
    ];
    let texts = [
        "",
        "one",
        "The quick brown fox jumps over the lazy dog.",
        "  spaced\tout \n text  ",
        "How much wood would a woodchuck chuck if a woodchuck could chuck wood?",
    ];
    for text in texts {
        let expected = text.split_whitespace().count();
        for scored in &scored_variants {
            assert_eq!(align(text, scored).len(), expected, "text {text:?}");
        }
    }
}

#[test]
fn empty_scores_leave_every_word_unscored() {
    let result = align("The cat sat", &[]);
    assert_eq!(result.len(), 3);
    for (annotation, word) in result.iter().zip(["The", "cat", "sat"]) {
        assert_eq!(annotation.word, word);
        assert_eq!(annotation.score, None);
        assert_eq!(annotation.error, None);
    }
}

#[test]
fn omission_marker_consumes_its_slot() {
    let scored = vec![
        ScoredWord::new("a", 90.0),
        omission("X"),
        ScoredWord::new("c", 70.0),
    ];
    let result = align("a b c", &scored);
    assert_eq!(scores(&result), [Some(90.0), Some(0.0), Some(70.0)]);
    assert_eq!(result[0].error, None);
    assert_eq!(result[1].error, Some(ErrorKind::Omission));
    assert!(result[1].is_omission());
    assert_eq!(result[2].error, None);
}

#[test]
fn matching_ignores_case_and_punctuation() {
    let result = align("Don't!", &[ScoredWord::new("dont", 50.0)]);
    assert_eq!(result[0].word, "Don't!");
    assert_eq!(result[0].score, Some(50.0));
}

#[test]
fn containment_matches_merged_words() {
    let scored = vec![
        ScoredWord::new("wood", 88.5),
        ScoredWord::new("chuck", 61.0).with_error(ErrorKind::Mispronunciation),
    ];
    let result = align("Woodchuck chuck", &scored);
    assert_relative_eq!(result[0].score.unwrap(), 88.5);
    assert_eq!(result[1].score, Some(61.0));
    assert_eq!(result[1].error, Some(ErrorKind::Mispronunciation));
}

#[test]
fn insertion_desynchronizes_until_it_matches() {
    let scored = vec![
        ScoredWord::new("she", 90.0),
        ScoredWord::new("um", 20.0).with_error(ErrorKind::Insertion),
        ScoredWord::new("sells", 80.0),
    ];
    let result = align("She sells seashells", &scored);
    assert_eq!(scores(&result), [Some(90.0), None, None]);
}

#[test]
fn insertion_is_consumed_when_it_coincidentally_matches() {
    let scored = vec![
        ScoredWord::new("the", 20.0).with_error(ErrorKind::Insertion),
        ScoredWord::new("cat", 85.0),
    ];
    let result = align("the cat", &scored);
    assert_eq!(result[0].score, Some(20.0));
    assert_eq!(result[0].error, Some(ErrorKind::Insertion));
    assert_eq!(result[1].score, Some(85.0));
}

#[test]
fn literal_none_error_label_maps_to_absent() {
    let word: ScoredWord =
        serde_json::from_str(r#"{"word": "cat", "accuracy_score": 91.2, "error_type": "None"}"#)
            .unwrap();
    let result = align("cat", &[word]);
    assert_eq!(result[0].error, None);
    assert_eq!(result[0].score, Some(91.2));
}

#[test]
fn alignment_is_idempotent() {
    let scored = vec![
        ScoredWord::new("peter", 70.0),
        omission("piper"),
        ScoredWord::new("picked", 65.0),
    ];
    let text = "Peter Piper picked a peck";
    assert_eq!(align(text, &scored), align(text, &scored));
}
