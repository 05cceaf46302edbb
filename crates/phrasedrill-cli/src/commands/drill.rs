//! The `phrasedrill drill` command: the interactive practice loop.

use std::io::BufRead;
use std::path::PathBuf;

use anyhow::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;

use phrasedrill_core::error::SpeechError;
use phrasedrill_core::model::{PhraseSet, Tier};
use phrasedrill_core::parser::parse_phrase_set;
use phrasedrill_core::progress::ProgressStore;
use phrasedrill_core::report::SessionReport;
use phrasedrill_core::session::{PromptCard, Session};
use phrasedrill_core::traits::{SpeechProvider, SynthesisRequest, TranscriptionRequest};
use phrasedrill_core::verify::Outcome;
use phrasedrill_speech::config::{create_provider, load_config_from, DrillConfig};

pub async fn execute(
    tier: String,
    pack: Option<PathBuf>,
    seed: Option<u64>,
    report: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    let tier: Tier = tier.parse().map_err(|e: String| anyhow::anyhow!(e))?;
    let set = match &pack {
        Some(path) => parse_phrase_set(path)?,
        None => PhraseSet::builtin(),
    };

    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };

    let mut session = Session::new(set, tier, config.verify, config.practice, &mut rng)?;
    let mut progress = ProgressStore::load(&config.progress_path);

    let speech: Option<Box<dyn SpeechProvider>> = config
        .speech
        .get(&config.default_speech_provider)
        .map(create_provider);

    println!(
        "Drilling '{}' on the {tier} tier.",
        session.phrase_set().name
    );
    println!("Type your answer, or :say, :mic <wav>, :next, :reset, :quit.");
    print_card(&session.prompt_card());

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let input = line.trim();

        match input {
            ":quit" | ":q" => break,
            ":next" | ":n" => print_card(&session.advance(&mut rng)),
            ":reset" => {
                print_card(&session.reset(&mut rng));
                println!("Session reset.");
            }
            ":say" => say_prompt(&speech, &config, &session).await,
            _ if input.starts_with(":mic") => {
                let wav = input.strip_prefix(":mic").unwrap_or("").trim();
                if wav.is_empty() {
                    println!("Usage: :mic <wav-file>");
                } else {
                    transcribe_and_submit(
                        &speech,
                        &config,
                        &mut session,
                        &mut progress,
                        PathBuf::from(wav),
                    )
                    .await;
                }
            }
            answer => submit(&mut session, &mut progress, &config, answer),
        }
    }

    print_summary(&session);

    if let Err(e) = progress.save(&config.progress_path) {
        tracing::warn!("could not persist progress: {e:#}");
    }

    if let Some(path) = report {
        let session_report = SessionReport::from_session(&session);
        session_report.save_json(&path)?;
        println!("Session report: {}", path.display());
    }

    Ok(())
}

/// Verify one submission and render the feedback.
fn submit(session: &mut Session, progress: &mut ProgressStore, config: &DrillConfig, answer: &str) {
    let expected = session.current().answer.clone();
    let feedback = session.verify(answer);

    println!("{}", feedback.message);

    if feedback.outcome.counts() {
        if let Some(reveal) = &feedback.reveal {
            println!(
                "  ({} -> {})",
                reveal.prompt_translation, reveal.answer_translation
            );
        }
        println!(
            "Score: {}/{}  Streak: {}",
            feedback.score, feedback.total, feedback.streak
        );

        progress.record(&expected, feedback.outcome == Outcome::Exact);
        // Progress loss should never interrupt practice.
        if let Err(e) = progress.save(&config.progress_path) {
            tracing::warn!("could not persist progress: {e:#}");
        }
    }
}

/// Synthesize the current prompt and drop the audio next to the session.
async fn say_prompt(
    speech: &Option<Box<dyn SpeechProvider>>,
    config: &DrillConfig,
    session: &Session,
) {
    let Some(provider) = speech else {
        println!("No speech provider configured. Add a [speech] entry to phrasedrill.toml.");
        return;
    };

    let request = SynthesisRequest {
        text: session.current().prompt.clone(),
        language: config.language.clone(),
    };
    match provider.synthesize(&request).await {
        Ok(audio) => {
            let path =
                std::env::temp_dir().join(format!("phrasedrill-{}.wav", uuid::Uuid::new_v4()));
            match std::fs::write(&path, &audio.audio) {
                Ok(()) => println!("Prompt audio written to {}", path.display()),
                Err(e) => println!("Could not write audio: {e}"),
            }
        }
        Err(e) => warn_speech(&e),
    }
}

/// Transcribe a recorded answer and submit the transcript.
async fn transcribe_and_submit(
    speech: &Option<Box<dyn SpeechProvider>>,
    config: &DrillConfig,
    session: &mut Session,
    progress: &mut ProgressStore,
    wav: PathBuf,
) {
    let Some(provider) = speech else {
        println!("No speech provider configured. Add a [speech] entry to phrasedrill.toml.");
        return;
    };

    let audio = match std::fs::read(&wav) {
        Ok(bytes) => bytes,
        Err(e) => {
            println!("Could not read {}: {e}", wav.display());
            return;
        }
    };

    let request = TranscriptionRequest {
        audio,
        language: config.language.clone(),
    };
    match provider.transcribe(&request).await {
        Ok(transcription) => match transcription.text {
            Some(text) => {
                println!("Heard: \"{text}\"");
                submit(session, progress, config, &text);
            }
            // Not understood: warn and let the learner retry, no attempt
            // is recorded.
            None => println!("Could not understand the recording. Try again."),
        },
        Err(e) => warn_speech(&e),
    }
}

fn warn_speech(e: &anyhow::Error) {
    match e.downcast_ref::<SpeechError>() {
        Some(se) if se.is_recoverable() => {
            println!("Speech service unavailable ({se}). Try again in a moment.")
        }
        _ => println!("Speech request failed: {e:#}"),
    }
}

fn print_card(card: &PromptCard) {
    println!();
    println!("Repeat in English: {}", card.prompt);
    if let Some(translation) = &card.translation {
        if !translation.is_empty() {
            println!("  ({translation})");
        }
    }
}

fn print_summary(session: &Session) {
    use comfy_table::Table;

    let mut table = Table::new();
    table.set_header(vec!["Score", "Attempts", "Best streak", "Accuracy"]);
    let accuracy = if session.total() == 0 {
        "n/a".to_string()
    } else {
        format!(
            "{:.0}%",
            f64::from(session.score()) / f64::from(session.total()) * 100.0
        )
    };
    table.add_row(vec![
        session.score().to_string(),
        session.total().to_string(),
        session.best_streak().to_string(),
        accuracy,
    ]);

    println!("\n{table}");

    if !session.misses().is_empty() {
        println!("Phrases to revisit:");
        let mut missed: Vec<(&String, &u32)> = session.misses().iter().collect();
        missed.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
        for (answer, count) in missed {
            println!("  {count}x  {answer}");
        }
    }
}
