pub mod alignment;
pub mod assessment;
pub mod cli;
pub mod locator;
pub mod metrics;
pub mod recording;

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

pub use alignment::{align, WordAnnotation};
pub use assessment::{ErrorClass, ServiceError};
pub use locator::{locate, GapPolicy};
pub use metrics::{overall_score, FeedbackTier, ScoreBand};
pub use recording::{RecordingEvent, RecordingState};

/// Convenient alias for results returned by pronunciation modules.
pub type Result<T> = std::result::Result<T, PronunciationError>;

/// Lightweight error type shared by the library layers.
#[derive(Debug, Clone)]
pub struct PronunciationError {
    message: Arc<str>,
}

impl PronunciationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Arc::from(message.into()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for PronunciationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for PronunciationError {}
