/// Punctuation ignored when comparing reference tokens with recognized words.
const MATCH_PUNCTUATION: [char; 8] = ['.', ',', '!', '?', ';', ':', '\'', '"'];

/// A whitespace-delimited token of the reference sentence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceWord<'text> {
    pub surface: &'text str,
    pub normalized: String,
}

/// Splits a reference sentence on runs of whitespace, dropping empty tokens.
pub fn tokenize(text: &str) -> Vec<ReferenceWord<'_>> {
    text.split_whitespace()
        .map(|surface| ReferenceWord {
            surface,
            normalized: normalize_word(surface),
        })
        .collect()
}

/// Lowercases a token and strips the punctuation ignored during matching.
///
/// The result may be empty when the token is made of punctuation only.
pub fn normalize_word(token: &str) -> String {
    token
        .chars()
        .filter(|ch| !MATCH_PUNCTUATION.contains(ch))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Loose containment match between a normalized reference token and candidate.
pub fn words_match(reference: &str, candidate: &str) -> bool {
    reference == candidate || reference.contains(candidate) || candidate.contains(reference)
}
