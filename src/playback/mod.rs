//! Per-frame playback sampling that keeps the highlighted word in sync.
//!
//! The locator itself is pure; this module owns the loop around it. A worker
//! thread samples the clock once per frame while playing and stops scheduling
//! samples as soon as playback pauses, ends, or the runtime is dropped.

pub mod clock;
pub mod tracker;

use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, error, info};

use crate::pronunciation::{PronunciationError, Result};

pub use clock::{ManualClock, MonotonicClock, PlaybackClock};
pub use tracker::HighlightTracker;

/// Roughly one display refresh at 60 Hz.
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// State published whenever the play state or highlighted word changes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlaybackSnapshot {
    pub playing: bool,
    pub position_secs: f64,
    pub word_index: Option<usize>,
    pub ended: bool,
}

#[derive(Clone, Copy, Debug)]
enum PlaybackCommand {
    Play,
    Pause,
    Restart,
    Shutdown,
}

#[derive(Clone)]
pub struct PlaybackController {
    tx: Sender<PlaybackCommand>,
}

impl PlaybackController {
    pub fn play(&self) -> Result<()> {
        self.send(PlaybackCommand::Play, "start playback")
    }

    pub fn pause(&self) -> Result<()> {
        self.send(PlaybackCommand::Pause, "pause playback")
    }

    pub fn restart(&self) -> Result<()> {
        self.send(PlaybackCommand::Restart, "restart playback")
    }

    pub fn shutdown(&self) -> Result<()> {
        self.send(PlaybackCommand::Shutdown, "shutdown playback")
    }

    fn send(&self, command: PlaybackCommand, label: &str) -> Result<()> {
        self.tx
            .send(command)
            .map_err(|_| PronunciationError::new(format!("failed to {}", label)))
    }
}

pub struct PlaybackRuntime {
    controller: PlaybackController,
    updates: Receiver<PlaybackSnapshot>,
    join: Option<JoinHandle<()>>,
}

impl PlaybackRuntime {
    pub fn spawn<C>(clock: C, tracker: HighlightTracker, frame_interval: Duration) -> Result<Self>
    where
        C: PlaybackClock + 'static,
    {
        if frame_interval.is_zero() {
            return Err(PronunciationError::new(
                "frame interval must be greater than zero",
            ));
        }
        let (command_tx, command_rx) = channel();
        let (update_tx, update_rx) = channel();
        let worker = PlaybackWorker {
            clock,
            tracker,
            frame_interval,
            playing: false,
            frames: 0,
        };
        let join = thread::Builder::new()
            .name("playback-sampler".to_string())
            .spawn(move || worker.run(command_rx, update_tx))
            .map_err(|err| {
                error!(error = %err, "failed to spawn playback sampler thread");
                PronunciationError::new(err.to_string())
            })?;
        info!(
            frame_interval_ms = frame_interval.as_millis() as u64,
            "playback sampler spawned"
        );
        Ok(Self {
            controller: PlaybackController { tx: command_tx },
            updates: update_rx,
            join: Some(join),
        })
    }

    pub fn controller(&self) -> PlaybackController {
        self.controller.clone()
    }

    pub fn try_recv(&self) -> Option<PlaybackSnapshot> {
        self.updates.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<PlaybackSnapshot> {
        self.updates.recv_timeout(timeout).ok()
    }
}

impl Drop for PlaybackRuntime {
    fn drop(&mut self) {
        let _ = self.controller.shutdown();
        if let Some(join) = self.join.take() {
            let _ = join.join();
        }
    }
}

struct PlaybackWorker<C: PlaybackClock> {
    clock: C,
    tracker: HighlightTracker,
    frame_interval: Duration,
    playing: bool,
    frames: u64,
}

impl<C: PlaybackClock> PlaybackWorker<C> {
    fn run(mut self, commands: Receiver<PlaybackCommand>, updates: Sender<PlaybackSnapshot>) {
        debug!(
            timed = self.tracker.has_timing(),
            words = self.tracker.words().len(),
            "playback sampler running"
        );
        loop {
            match self.next_command(&commands) {
                Some(PlaybackCommand::Play) => {
                    if !self.playing {
                        self.clock.play();
                        self.playing = true;
                        self.tracker.sample(self.position_secs());
                        info!(position_secs = self.position_secs(), "playback started");
                        self.publish(&updates, false);
                    }
                }
                Some(PlaybackCommand::Pause) => {
                    if self.playing {
                        self.clock.pause();
                        self.playing = false;
                        info!(position_secs = self.position_secs(), "playback paused");
                        self.publish(&updates, false);
                    }
                }
                Some(PlaybackCommand::Restart) => {
                    self.clock.rewind();
                    self.tracker.reset();
                    self.clock.play();
                    self.playing = true;
                    info!("playback restarted");
                    self.publish(&updates, false);
                }
                Some(PlaybackCommand::Shutdown) => {
                    self.clock.pause();
                    break;
                }
                None => self.frame(&updates),
            }
        }
        debug!(frames = self.frames, "playback sampler exiting");
    }

    /// Waits one frame while playing, or indefinitely while paused.
    fn next_command(&self, commands: &Receiver<PlaybackCommand>) -> Option<PlaybackCommand> {
        if self.playing {
            match commands.recv_timeout(self.frame_interval) {
                Ok(command) => Some(command),
                Err(RecvTimeoutError::Timeout) => None,
                Err(RecvTimeoutError::Disconnected) => Some(PlaybackCommand::Shutdown),
            }
        } else {
            Some(commands.recv().unwrap_or(PlaybackCommand::Shutdown))
        }
    }

    fn frame(&mut self, updates: &Sender<PlaybackSnapshot>) {
        self.frames += 1;
        if self.clock.is_finished() {
            self.clock.pause();
            self.clock.rewind();
            self.tracker.reset();
            self.playing = false;
            info!(frames = self.frames, "playback reached end of audio");
            self.publish(updates, true);
            return;
        }
        if let Some(index) = self.tracker.sample(self.position_secs()) {
            debug!(word_index = ?index, position_secs = self.position_secs(), "highlight changed");
            self.publish(updates, false);
        }
    }

    fn position_secs(&self) -> f64 {
        self.clock.position().as_secs_f64()
    }

    fn publish(&self, updates: &Sender<PlaybackSnapshot>, ended: bool) {
        let _ = updates.send(PlaybackSnapshot {
            playing: self.playing,
            position_secs: self.position_secs(),
            word_index: self.tracker.current(),
            ended,
        });
    }
}
