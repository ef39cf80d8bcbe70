use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const RESULT_JSON: &str = r#"{
  "scores": {"pronunciation": 85.0, "fluency": 90.0, "completeness": 95.0},
  "coaching": "Great work on **vowels**.",
  "mock_mode": false,
  "strictness_level": 4,
  "azure_debug": {
    "recognized_text": "hello world",
    "words": [
      {"word": "hello", "accuracy_score": 92.0, "error_type": "None",
       "offset": 0, "duration": 10000000},
      {"word": "world", "accuracy_score": 55.0, "error_type": "Mispronunciation",
       "offset": 12000000, "duration": 8000000}
    ]
  }
}"#;

const PHONEME_JSON: &str = r#"{
  "scores": {"pronunciation": 60.0, "fluency": 80.0, "completeness": 100.0},
  "coaching": "Open the vowel.",
  "azure_debug": {
    "recognized_text": "hallo",
    "overall_metrics": {"accuracy_score": 58.5, "fluency_score": 80.0,
                        "completeness_score": 100.0, "pronunciation_score": 60.0},
    "words": [
      {"word": "hello", "accuracy_score": 58.5, "error_type": "Mispronunciation",
       "phonemes": [{"phoneme": "h", "accuracy_score": 41.0},
                    {"phoneme": "ow", "accuracy_score": 76.0}]}
    ]
  }
}"#;

const UNTIMED_JSON: &str = r#"{
  "scores": {"pronunciation": 70.0, "fluency": 70.0, "completeness": 70.0},
  "coaching": "",
  "azure_debug": {"words": [{"word": "hello", "accuracy_score": 70.0}]}
}"#;

struct Workspace {
    home: TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self {
            home: TempDir::new().expect("temp home"),
        }
    }

    fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.home.path().join(name);
        fs::write(&path, contents).expect("write fixture");
        path
    }

    fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("accent-coach").expect("binary built");
        cmd.env("ACCENT_COACH_HOME", self.home.path())
            .env("RUST_LOG", "warn");
        cmd
    }

    fn path(&self) -> &Path {
        self.home.path()
    }
}

#[test]
fn align_prints_word_feedback() {
    let ws = Workspace::new();
    let result = ws.write("result.json", RESULT_JSON);
    ws.command()
        .args(["align", "--reference", "Hello, world!", "--result"])
        .arg(&result)
        .assert()
        .success()
        .stdout(predicate::str::contains("Hello,"))
        .stdout(predicate::str::contains("(Mispronunciation)"))
        .stdout(predicate::str::contains("Overall 90/100"))
        .stdout(predicate::str::contains("Strictness 4 (Strict)"))
        .stdout(predicate::str::contains("Saved attempt").not());
}

#[test]
fn saved_attempts_show_up_in_history() {
    let ws = Workspace::new();
    let result = ws.write("result.json", RESULT_JSON);

    ws.command()
        .args(["history", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No practice history yet"));

    ws.command()
        .args(["align", "--reference", "Hello world", "--save", "--result"])
        .arg(&result)
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved attempt"));

    ws.command()
        .args(["history", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Hello world"))
        .stdout(predicate::str::contains(" 90 "))
        .stdout(predicate::str::contains("1 practice session recorded"));
    assert!(ws.path().join("accent-coach-history.json").is_file());

    ws.command()
        .args(["history", "clear"])
        .assert()
        .success()
        .stdout(predicate::str::contains("History cleared"));
    ws.command()
        .args(["history", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No practice history yet"));
}

#[test]
fn history_list_shows_count_and_trend_oldest_first() {
    let ws = Workspace::new();
    let first = ws.write("first.json", PHONEME_JSON);
    let second = ws.write("second.json", RESULT_JSON);
    for result in [&first, &second] {
        ws.command()
            .args(["align", "--reference", "Hello", "--save", "--result"])
            .arg(result)
            .assert()
            .success();
    }
    ws.command()
        .args(["history", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 practice sessions recorded"))
        .stdout(predicate::str::contains("Trend (oldest to newest): 80 90"));
}

#[test]
fn debug_mode_prints_advanced_breakdown() {
    let ws = Workspace::new();
    let result = ws.write("phonemes.json", PHONEME_JSON);
    ws.command()
        .args(["align", "--reference", "Hello", "--result"])
        .arg(&result)
        .assert()
        .success()
        .stdout(predicate::str::contains("Advanced details").not())
        .stdout(predicate::str::contains("h 41.0").not());

    ws.command()
        .args(["settings", "set", "--debug-mode", "true"])
        .assert()
        .success();

    ws.command()
        .args(["align", "--reference", "Hello", "--result"])
        .arg(&result)
        .assert()
        .success()
        .stdout(predicate::str::contains("Advanced details:"))
        .stdout(predicate::str::contains("Recognized: hallo"))
        .stdout(predicate::str::contains(
            "Accuracy 58.5  Fluency 80.0  Completeness 100.0  Pronunciation 60.0",
        ))
        .stdout(predicate::str::contains("h 41.0  ow 76.0"));
}

#[test]
fn deleting_unknown_history_entry_fails() {
    let ws = Workspace::new();
    ws.command()
        .args(["history", "delete", "missing-id"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No history entry with id missing-id"));
}

#[test]
fn locate_reports_word_at_time() {
    let ws = Workspace::new();
    let result = ws.write("result.json", RESULT_JSON);
    let cases = [
        ("0.5", None, "0 hello"),
        ("1.1", None, "0 hello"),
        ("1.1", Some("look-ahead"), "1 world"),
        ("2.5", None, "1 world"),
        ("-0.1", None, "none"),
    ];
    for (time, policy, expected) in cases {
        let mut cmd = ws.command();
        cmd.args(["locate", "--time", time, "--result"]).arg(&result);
        if let Some(policy) = policy {
            cmd.args(["--policy", policy]);
        }
        cmd.assert()
            .success()
            .stdout(predicate::str::starts_with(expected));
    }
}

#[test]
fn locate_uses_configured_policy() {
    let ws = Workspace::new();
    let result = ws.write("result.json", RESULT_JSON);
    let config = ws.write("custom.json", r#"{"gap_policy": "look-ahead"}"#);
    ws.command()
        .args(["locate", "--time", "1.1", "--result"])
        .arg(&result)
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("1 world"));
}

#[test]
fn settings_persist_between_runs() {
    let ws = Workspace::new();
    ws.command()
        .args(["settings", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("strictness 3 (Balanced)"))
        .stdout(predicate::str::contains("debug-mode false"));

    ws.command()
        .args(["settings", "set", "--strictness", "9", "--debug-mode", "true"])
        .assert()
        .success()
        .stdout(predicate::str::contains("strictness 5"));

    ws.command()
        .args(["settings", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("strictness 5 (Very Strict)"))
        .stdout(predicate::str::contains("debug-mode true"));
}

#[test]
fn follow_walks_through_words_to_the_end() {
    let ws = Workspace::new();
    let result = ws.write(
        "short.json",
        r#"{
          "scores": {"pronunciation": 80.0, "fluency": 80.0, "completeness": 80.0},
          "azure_debug": {"words": [
            {"word": "quick", "accuracy_score": 90.0, "offset": 0, "duration": 1000000},
            {"word": "test", "accuracy_score": 85.0, "offset": 1500000, "duration": 1000000}
          ]}
        }"#,
    );
    ws.command()
        .args(["follow", "--result"])
        .arg(&result)
        .assert()
        .success()
        .stdout(predicate::str::contains("quick"))
        .stdout(predicate::str::contains("(end)"));
}

#[test]
fn follow_without_timing_explains_itself() {
    let ws = Workspace::new();
    let result = ws.write("untimed.json", UNTIMED_JSON);
    ws.command()
        .args(["follow", "--result"])
        .arg(&result)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Word-by-word timing not available for this recording",
        ));
}

#[test]
fn malformed_result_is_reported() {
    let ws = Workspace::new();
    let result = ws.write("broken.json", "{not json");
    ws.command()
        .args(["locate", "--time", "0", "--result"])
        .arg(&result)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid analysis result"));
}
