use std::fs;
use std::path::Path;
use std::time::Duration;

use accent_coach::audio::probe_duration;
use accent_coach::config::AppConfig;
use accent_coach::playback::{HighlightTracker, MonotonicClock, PlaybackRuntime};
use accent_coach::pronunciation::cli::{
    AlignArgs, Cli, Command, FollowArgs, HistoryCommand, LocateArgs, SettingsCommand,
};
use accent_coach::pronunciation::locator::has_timing;
use accent_coach::pronunciation::metrics::{band_counts, render_coaching};
use accent_coach::pronunciation::{
    align, locate, overall_score, FeedbackTier, GapPolicy, ScoreBand,
};
use accent_coach::storage::history::TREND_LENGTH;
use accent_coach::storage::{
    FileStore, HistoryBook, HistoryEntry, SettingsPatch, SettingsStore,
};
use accent_coach::types::{AnalysisResult, AssessmentDetails, StrictnessLevel};
use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// Extra playback after the last word when no recording length is known.
const TRAILING_SILENCE: Duration = Duration::from_millis(500);

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = AppConfig::from_override(cli.config.clone())
        .context("Failed to load configuration")?;
    debug!(
        data_dir = %config.data_dir.display(),
        policy = %config.gap_policy,
        "configuration loaded"
    );

    match cli.command {
        Command::Align(args) => handle_align(&config, &args),
        Command::Follow(args) => handle_follow(&config, &args),
        Command::Locate(args) => handle_locate(&config, &args),
        Command::History(command) => handle_history(&config, &command),
        Command::Settings(command) => handle_settings(&config, &command),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_result(path: &Path) -> Result<AnalysisResult> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read analysis result {:?}", path))?;
    let result = AnalysisResult::from_json(&raw)
        .with_context(|| format!("Invalid analysis result in {:?}", path))?;
    if let Some(marker) = result.breakdown_error() {
        warn!(marker, "analysis result carries no word breakdown");
    }
    Ok(result)
}

fn handle_align(config: &AppConfig, args: &AlignArgs) -> Result<()> {
    let result = load_result(&args.result.result)?;
    let annotations = align(&args.reference, result.word_details());
    info!(
        reference_words = annotations.len(),
        scored_words = result.word_details().len(),
        "aligned reference sentence"
    );

    if result.mock_mode {
        println!(
            "Demo mode: {}",
            result
                .mock_details
                .as_deref()
                .unwrap_or("Using sample scores. Add API keys for real analysis.")
        );
    }

    println!("Words:");
    for annotation in &annotations {
        let band = ScoreBand::from_score(annotation.score);
        let score = annotation
            .score
            .map(|value| format!("{value:5.1}"))
            .unwrap_or_else(|| "    -".to_string());
        let error = annotation
            .error
            .as_ref()
            .map(|kind| format!("  ({})", kind.label()))
            .unwrap_or_default();
        println!("  {} {score}  {}{error}", band.marker(), annotation.word);
    }
    let counts = band_counts(&annotations);
    println!(
        "  good {} / fair {} / poor {} / unscored {} / omitted {}",
        counts.good, counts.fair, counts.poor, counts.unscored, counts.omitted
    );

    let overall = overall_score(&result.scores);
    println!(
        "\nPronunciation {:.1}  Fluency {:.1}  Completeness {:.1}",
        result.scores.pronunciation, result.scores.fluency, result.scores.completeness
    );
    println!(
        "Overall {overall}/100 - {}",
        FeedbackTier::from_score(overall).message()
    );
    let strictness = result.strictness();
    println!("Strictness {} ({})", strictness.get(), strictness.label());
    if !result.coaching.trim().is_empty() {
        println!("\nCoach's feedback:\n{}", render_coaching(&result.coaching));
    }

    let settings = SettingsStore::new(FileStore::new(&config.data_dir)).load();
    if settings.debug_mode {
        print_details(result.azure_debug.as_ref());
    }

    if args.save {
        let mut history = HistoryBook::new(FileStore::new(&config.data_dir));
        let entry = HistoryEntry::from_result(args.reference.clone(), &result);
        let id = entry.id.clone();
        history.record(entry).context("Failed to save practice attempt")?;
        println!("\nSaved attempt {id}");
    }
    Ok(())
}

/// Advanced breakdown shown when debug mode is on.
fn print_details(details: Option<&AssessmentDetails>) {
    println!("\nAdvanced details:");
    let Some(details) = details else {
        println!("  No detailed breakdown in this result");
        return;
    };
    if let Some(error) = details.error.as_deref() {
        println!("  Breakdown error: {error}");
    }
    println!(
        "  Recognized: {}",
        details.recognized_text.as_deref().unwrap_or("-")
    );
    if let Some(metrics) = details.overall_metrics {
        println!(
            "  Accuracy {:.1}  Fluency {:.1}  Completeness {:.1}  Pronunciation {:.1}",
            metrics.accuracy_score,
            metrics.fluency_score,
            metrics.completeness_score,
            metrics.pronunciation_score
        );
    }
    for word in &details.words {
        let phonemes = word
            .phonemes
            .iter()
            .map(|phoneme| format!("{} {:.1}", phoneme.phoneme, phoneme.accuracy_score))
            .collect::<Vec<_>>()
            .join("  ");
        println!("  {:<12} {:5.1}  {phonemes}", word.word, word.accuracy_score);
    }
}

fn handle_follow(config: &AppConfig, args: &FollowArgs) -> Result<()> {
    let result = load_result(&args.result.result)?;
    let words = result.word_details().to_vec();
    if !has_timing(&words) {
        println!("Word-by-word timing not available for this recording");
        return Ok(());
    }
    let duration = match args.audio.as_deref() {
        Some(path) => probe_duration(path)
            .with_context(|| format!("Failed to read recording length from {:?}", path))?,
        None => timing_extent(&result) + TRAILING_SILENCE,
    };
    let policy = args.policy.unwrap_or(config.gap_policy);
    info!(duration_secs = duration.as_secs_f64(), %policy, "following playback");

    let tracker = HighlightTracker::new(words.clone(), policy);
    let runtime = PlaybackRuntime::spawn(
        MonotonicClock::new(duration),
        tracker,
        config.frame_interval,
    )
    .context("Failed to start playback sampler")?;
    runtime.controller().play()?;

    let deadline = duration + Duration::from_secs(2);
    let started = std::time::Instant::now();
    loop {
        let Some(snapshot) = runtime.recv_timeout(Duration::from_millis(250)) else {
            if started.elapsed() > deadline {
                bail!("playback did not finish within {:.1}s", deadline.as_secs_f64());
            }
            continue;
        };
        if snapshot.ended {
            println!("{:7.3}s  (end)", snapshot.position_secs);
            break;
        }
        match snapshot.word_index.and_then(|index| words.get(index).map(|w| (index, w))) {
            Some((index, word)) => println!(
                "{:7.3}s  #{index:<3} {}",
                snapshot.position_secs, word.word
            ),
            None => println!("{:7.3}s  -", snapshot.position_secs),
        }
    }
    Ok(())
}

/// End of the last timed word.
fn timing_extent(result: &AnalysisResult) -> Duration {
    let end = result
        .word_details()
        .iter()
        .filter_map(|word| word.span())
        .map(|span| span.end)
        .fold(0.0_f64, f64::max);
    Duration::from_secs_f64(end)
}

fn handle_locate(config: &AppConfig, args: &LocateArgs) -> Result<()> {
    let result = load_result(&args.result.result)?;
    let policy: GapPolicy = args.policy.unwrap_or(config.gap_policy);
    match locate(args.time, result.word_details(), policy) {
        Some(index) => println!("{index} {}", result.word_details()[index].word),
        None => println!("none"),
    }
    Ok(())
}

fn handle_history(config: &AppConfig, command: &HistoryCommand) -> Result<()> {
    let mut history = HistoryBook::new(FileStore::new(&config.data_dir));
    match command {
        HistoryCommand::List => {
            let entries = history.entries();
            if entries.is_empty() {
                println!("No practice history yet");
                return Ok(());
            }
            let noun = if entries.len() == 1 { "session" } else { "sessions" };
            println!("{} practice {noun} recorded", entries.len());
            let trend = history
                .score_trend(TREND_LENGTH)
                .iter()
                .map(u32::to_string)
                .collect::<Vec<_>>()
                .join(" ");
            println!("Trend (oldest to newest): {trend}");
            for entry in entries {
                println!(
                    "{}  {:>3}  {}",
                    entry.id, entry.overall_score, entry.reference_text
                );
            }
        }
        HistoryCommand::Show { id } => {
            let entry = history
                .find(id)
                .with_context(|| format!("No history entry with id {id}"))?;
            println!("{}", serde_json::to_string_pretty(&entry)?);
        }
        HistoryCommand::Delete { id } => {
            if !history.remove(id)? {
                bail!("No history entry with id {id}");
            }
            println!("Deleted {id}");
        }
        HistoryCommand::Clear => {
            history.clear()?;
            println!("History cleared");
        }
    }
    Ok(())
}

fn handle_settings(config: &AppConfig, command: &SettingsCommand) -> Result<()> {
    let mut settings = SettingsStore::new(FileStore::new(&config.data_dir));
    let current = match command {
        SettingsCommand::Show => settings.load(),
        SettingsCommand::Set(args) => settings
            .update(SettingsPatch {
                debug_mode: args.debug_mode,
                strictness: args.strictness.map(StrictnessLevel::new),
            })
            .context("Failed to save settings")?,
    };
    println!(
        "strictness {} ({})",
        current.strictness.get(),
        current.strictness.label()
    );
    println!("debug-mode {}", current.debug_mode);
    Ok(())
}
