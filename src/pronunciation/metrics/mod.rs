use crate::pronunciation::alignment::WordAnnotation;
use crate::types::Scores;

const GOOD_THRESHOLD: f64 = 80.0;
const FAIR_THRESHOLD: f64 = 60.0;

/// Rounded mean of the three headline scores.
pub fn overall_score(scores: &Scores) -> u32 {
    let mean = (scores.pronunciation + scores.fluency + scores.completeness) / 3.0;
    mean.round().clamp(0.0, u32::MAX as f64) as u32
}

/// Encouragement tier derived from the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackTier {
    Excellent,
    Great,
    GoodProgress,
    KeepPracticing,
    Improve,
}

impl FeedbackTier {
    pub fn from_score(overall: u32) -> Self {
        match overall {
            0..=59 => FeedbackTier::Improve,
            60..=69 => FeedbackTier::KeepPracticing,
            70..=79 => FeedbackTier::GoodProgress,
            80..=89 => FeedbackTier::Great,
            _ => FeedbackTier::Excellent,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            FeedbackTier::Excellent => "Excellent!",
            FeedbackTier::Great => "Great job!",
            FeedbackTier::GoodProgress => "Good progress!",
            FeedbackTier::KeepPracticing => "Keep practicing!",
            FeedbackTier::Improve => "Let's improve!",
        }
    }
}

/// Coarse quality band for a single word score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Unscored,
    Good,
    Fair,
    Poor,
}

impl ScoreBand {
    pub fn from_score(score: Option<f64>) -> Self {
        match score {
            None => ScoreBand::Unscored,
            Some(value) if value >= GOOD_THRESHOLD => ScoreBand::Good,
            Some(value) if value >= FAIR_THRESHOLD => ScoreBand::Fair,
            Some(_) => ScoreBand::Poor,
        }
    }

    pub fn marker(self) -> &'static str {
        match self {
            ScoreBand::Unscored => " ",
            ScoreBand::Good => "+",
            ScoreBand::Fair => "~",
            ScoreBand::Poor => "!",
        }
    }
}

/// Per-band word counts over an aligned sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BandCounts {
    pub good: usize,
    pub fair: usize,
    pub poor: usize,
    pub unscored: usize,
    pub omitted: usize,
}

pub fn band_counts(annotations: &[WordAnnotation]) -> BandCounts {
    annotations
        .iter()
        .fold(BandCounts::default(), |mut counts, annotation| {
            match ScoreBand::from_score(annotation.score) {
                ScoreBand::Good => counts.good += 1,
                ScoreBand::Fair => counts.fair += 1,
                ScoreBand::Poor => counts.poor += 1,
                ScoreBand::Unscored => counts.unscored += 1,
            }
            if annotation.is_omission() {
                counts.omitted += 1;
            }
            counts
        })
}

/// Converts the coach's lightweight markdown into plain terminal text.
pub fn render_coaching(text: &str) -> String {
    text.lines()
        .map(|line| {
            let stripped = line.replace("**", "");
            let stripped = strip_emphasis(&stripped);
            match stripped.strip_prefix("- ") {
                Some(rest) => format!("• {rest}"),
                None => stripped,
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Removes paired single-asterisk emphasis markers, leaving lone asterisks.
fn strip_emphasis(line: &str) -> String {
    let mut output = String::with_capacity(line.len());
    let mut rest = line;
    while let Some(open) = rest.find('*') {
        let after = &rest[open + 1..];
        match after.find('*') {
            Some(close) => {
                output.push_str(&rest[..open]);
                output.push_str(&after[..close]);
                rest = &after[close + 1..];
            }
            None => break,
        }
    }
    output.push_str(rest);
    output
}
