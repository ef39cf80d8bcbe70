use std::fmt::{Display, Formatter};

use crate::pronunciation::{PronunciationError, Result};

/// Lifecycle of a single practice attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordingState {
    #[default]
    Idle,
    Recording,
    Processing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingEvent {
    /// The learner pressed record.
    Start,
    /// The learner stopped; audio is on its way to the scorer.
    Stop,
    /// The scorer answered, successfully or not.
    Complete,
}

impl RecordingState {
    /// Applies `event`, rejecting transitions the lifecycle does not allow.
    pub fn apply(self, event: RecordingEvent) -> Result<Self> {
        match (self, event) {
            (RecordingState::Idle, RecordingEvent::Start) => Ok(RecordingState::Recording),
            (RecordingState::Recording, RecordingEvent::Stop) => Ok(RecordingState::Processing),
            (RecordingState::Processing, RecordingEvent::Complete) => Ok(RecordingState::Idle),
            (state, event) => Err(PronunciationError::new(format!(
                "cannot apply {event:?} while {state}"
            ))),
        }
    }

    pub fn is_busy(self) -> bool {
        !matches!(self, RecordingState::Idle)
    }
}

impl Display for RecordingState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            RecordingState::Idle => "idle",
            RecordingState::Recording => "recording",
            RecordingState::Processing => "processing",
        };
        write!(f, "{label}")
    }
}
