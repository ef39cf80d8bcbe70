use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::pronunciation::GapPolicy;

#[derive(Parser, Debug)]
#[command(
    name = "accent-coach",
    version,
    about = "Pronunciation feedback: word alignment, playback highlighting, and practice history"
)]
pub struct Cli {
    /// Optional JSON config file (defaults to $ACCENT_COACH_HOME/config.json).
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Align a reference sentence with a scored result and print feedback.
    Align(AlignArgs),
    /// Replay word timing on a clock and print each highlighted word.
    Follow(FollowArgs),
    /// Report the word being spoken at a single playback time.
    Locate(LocateArgs),
    /// Inspect or edit saved practice attempts.
    #[command(subcommand)]
    History(HistoryCommand),
    /// Show or change learner settings.
    #[command(subcommand)]
    Settings(SettingsCommand),
}

#[derive(Args, Debug, Clone)]
pub struct ResultArgs {
    /// Path to the JSON body returned by the analysis service.
    #[arg(long, value_name = "FILE")]
    pub result: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct AlignArgs {
    /// Sentence the learner was asked to read.
    #[arg(long)]
    pub reference: String,
    #[command(flatten)]
    pub result: ResultArgs,
    /// Record the attempt in practice history.
    #[arg(long)]
    pub save: bool,
}

#[derive(Args, Debug, Clone)]
pub struct FollowArgs {
    #[command(flatten)]
    pub result: ResultArgs,
    /// Recording whose length bounds playback.
    #[arg(long, value_name = "FILE")]
    pub audio: Option<PathBuf>,
    /// Gap handling between words (look-back or look-ahead).
    #[arg(long)]
    pub policy: Option<GapPolicy>,
}

#[derive(Args, Debug, Clone)]
pub struct LocateArgs {
    #[command(flatten)]
    pub result: ResultArgs,
    /// Playback time in seconds.
    #[arg(long, allow_negative_numbers = true)]
    pub time: f64,
    /// Gap handling between words (look-back or look-ahead).
    #[arg(long)]
    pub policy: Option<GapPolicy>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum HistoryCommand {
    /// List saved attempts, newest first.
    List,
    /// Show one attempt in full.
    Show { id: String },
    /// Delete one attempt.
    Delete { id: String },
    /// Delete every attempt.
    Clear,
}

#[derive(Subcommand, Debug, Clone)]
pub enum SettingsCommand {
    Show,
    Set(SettingsSetArgs),
}

#[derive(Args, Debug, Clone)]
pub struct SettingsSetArgs {
    /// Grading strictness from 1 (lenient) to 5 (strict); clamped into range.
    #[arg(long, allow_negative_numbers = true)]
    pub strictness: Option<i64>,
    #[arg(long = "debug-mode")]
    pub debug_mode: Option<bool>,
}
