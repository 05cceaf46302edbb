//! End-to-end drill sessions over piped stdin.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn phrasedrill() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("phrasedrill").unwrap()
}

/// A single-phrase pack so the scheduler has no choice to make.
const ONE_PHRASE_PACK: &str = r#"[phrase_set]
id = "one"
name = "One Phrase"

[[phrases]]
tier = "easy"
prompt = "Good morning!"
answer = "Good morning!"
prompt_translation = "Bom dia!"
answer_translation = "Bom dia!"
"#;

#[test]
fn typed_session_scores_and_persists_progress() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("pack.toml"), ONE_PHRASE_PACK).unwrap();

    phrasedrill()
        .current_dir(dir.path())
        .arg("drill")
        .arg("--tier")
        .arg("easy")
        .arg("--pack")
        .arg("pack.toml")
        .arg("--seed")
        .arg("7")
        .write_stdin("good MORNING\nwrong answer zzz\n:quit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Repeat in English: Good morning!"))
        .stdout(predicate::str::contains("(Bom dia!)"))
        .stdout(predicate::str::contains("Correct! Well done."))
        .stdout(predicate::str::contains("Score: 1/1"))
        .stdout(predicate::str::contains("Score: 1/2"))
        .stdout(predicate::str::contains("Phrases to revisit"));

    // Progress is written to the configured default path in the session's
    // working directory.
    let progress_path = dir.path().join("phrasedrill-progress.json");
    assert!(progress_path.exists());
    let progress: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&progress_path).unwrap()).unwrap();
    assert_eq!(progress["successes"]["Good morning!"], 1);
    assert_eq!(progress["failures"]["Good morning!"], 1);
}

#[test]
fn empty_input_warns_without_counting() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("pack.toml"), ONE_PHRASE_PACK).unwrap();

    phrasedrill()
        .current_dir(dir.path())
        .arg("drill")
        .arg("--tier")
        .arg("easy")
        .arg("--pack")
        .arg("pack.toml")
        .write_stdin("\n:quit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Type or speak an answer first."))
        .stdout(predicate::str::contains("Score: 0/0").not());
}

#[test]
fn session_report_is_written() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("pack.toml"), ONE_PHRASE_PACK).unwrap();

    phrasedrill()
        .current_dir(dir.path())
        .arg("drill")
        .arg("--tier")
        .arg("easy")
        .arg("--pack")
        .arg("pack.toml")
        .arg("--report")
        .arg("report.json")
        .write_stdin("good morning\n:quit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Session report: report.json"));

    let report: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join("report.json")).unwrap())
            .unwrap();
    assert_eq!(report["score"], 1);
    assert_eq!(report["total"], 1);
    assert_eq!(report["tier"], "easy");
    assert_eq!(report["stats"]["exact"], 1);
    assert_eq!(report["attempts"].as_array().unwrap().len(), 1);
}

#[test]
fn spoken_answers_flow_through_the_mock_provider() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("pack.toml"), ONE_PHRASE_PACK).unwrap();
    std::fs::write(dir.path().join("answer.wav"), b"not really audio").unwrap();
    std::fs::write(
        dir.path().join("phrasedrill.toml"),
        r#"default_speech_provider = "mock"

[speech.mock]
type = "mock"
transcript = "good morning"
"#,
    )
    .unwrap();

    phrasedrill()
        .current_dir(dir.path())
        .arg("drill")
        .arg("--tier")
        .arg("easy")
        .arg("--pack")
        .arg("pack.toml")
        .write_stdin(":say\n:mic answer.wav\n:quit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Prompt audio written to"))
        .stdout(predicate::str::contains("Heard: \"good morning\""))
        .stdout(predicate::str::contains("Correct! Well done."));
}

#[test]
fn unrecognized_speech_records_no_attempt() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("pack.toml"), ONE_PHRASE_PACK).unwrap();
    std::fs::write(dir.path().join("answer.wav"), b"static noise").unwrap();
    std::fs::write(
        dir.path().join("phrasedrill.toml"),
        r#"default_speech_provider = "mock"

[speech.mock]
type = "mock"
"#,
    )
    .unwrap();

    phrasedrill()
        .current_dir(dir.path())
        .arg("drill")
        .arg("--tier")
        .arg("easy")
        .arg("--pack")
        .arg("pack.toml")
        .write_stdin(":mic answer.wav\n:quit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Could not understand the recording",
        ))
        .stdout(predicate::str::contains("Score:").not());
}

#[test]
fn missing_speech_provider_degrades_gracefully() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("pack.toml"), ONE_PHRASE_PACK).unwrap();

    phrasedrill()
        .current_dir(dir.path())
        .arg("drill")
        .arg("--tier")
        .arg("easy")
        .arg("--pack")
        .arg("pack.toml")
        .write_stdin(":say\n:quit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("No speech provider configured"));
}
