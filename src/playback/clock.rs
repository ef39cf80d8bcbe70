use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Source of the playback position sampled once per frame.
pub trait PlaybackClock: Send {
    fn play(&mut self);
    fn pause(&mut self);
    /// Moves the position back to zero without changing the play state.
    fn rewind(&mut self);
    fn position(&self) -> Duration;
    fn duration(&self) -> Duration;

    fn is_finished(&self) -> bool {
        self.position() >= self.duration()
    }
}

/// Wall-clock playback driven by `Instant`, for hosts without an audio device.
#[derive(Debug)]
pub struct MonotonicClock {
    duration: Duration,
    elapsed: Duration,
    started_at: Option<Instant>,
}

impl MonotonicClock {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            elapsed: Duration::ZERO,
            started_at: None,
        }
    }
}

impl PlaybackClock for MonotonicClock {
    fn play(&mut self) {
        if self.started_at.is_none() {
            self.started_at = Some(Instant::now());
        }
    }

    fn pause(&mut self) {
        if let Some(started) = self.started_at.take() {
            self.elapsed += started.elapsed();
        }
    }

    fn rewind(&mut self) {
        self.elapsed = Duration::ZERO;
        if self.started_at.is_some() {
            self.started_at = Some(Instant::now());
        }
    }

    fn position(&self) -> Duration {
        let running = self
            .started_at
            .map(|started| started.elapsed())
            .unwrap_or_default();
        (self.elapsed + running).min(self.duration)
    }

    fn duration(&self) -> Duration {
        self.duration
    }
}

/// Clock whose position is set from outside, e.g. by a host's audio element.
///
/// Clones share the same position, so one handle can drive a runtime while
/// another stays with the caller.
#[derive(Debug, Clone)]
pub struct ManualClock {
    position: Arc<Mutex<Duration>>,
    duration: Duration,
}

impl ManualClock {
    pub fn new(duration: Duration) -> Self {
        Self {
            position: Arc::new(Mutex::new(Duration::ZERO)),
            duration,
        }
    }

    pub fn set_position(&self, position: Duration) {
        let mut guard = self
            .position
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = position.min(self.duration);
    }

    /// Negative or NaN times read as zero; times past the end clamp to the duration.
    pub fn set_seconds(&self, seconds: f64) {
        let position = Duration::try_from_secs_f64(seconds.max(0.0)).unwrap_or(self.duration);
        self.set_position(position);
    }
}

impl PlaybackClock for ManualClock {
    fn play(&mut self) {}

    fn pause(&mut self) {}

    fn rewind(&mut self) {
        self.set_position(Duration::ZERO);
    }

    fn position(&self) -> Duration {
        *self
            .position
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn duration(&self) -> Duration {
        self.duration
    }
}
