//! The `phrasedrill init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    // Create phrasedrill.toml
    if std::path::Path::new("phrasedrill.toml").exists() {
        println!("phrasedrill.toml already exists, skipping.");
    } else {
        std::fs::write("phrasedrill.toml", SAMPLE_CONFIG)?;
        println!("Created phrasedrill.toml");
    }

    // Create example phrase pack
    std::fs::create_dir_all("packs")?;
    let example_path = std::path::Path::new("packs/starter.toml");
    if example_path.exists() {
        println!("packs/starter.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_PACK)?;
        println!("Created packs/starter.toml");
    }

    println!("\nNext steps:");
    println!("  1. Edit phrasedrill.toml if you run a speech server");
    println!("  2. Run: phrasedrill validate --pack packs/starter.toml");
    println!("  3. Run: phrasedrill drill --tier easy --pack packs/starter.toml");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# phrasedrill configuration

default_speech_provider = "http"
language = "en"
progress_path = "phrasedrill-progress.json"

[speech.http]
type = "http"
base_url = "http://localhost:5002"
api_key = "${PHRASEDRILL_SPEECH_KEY}"

[speech.mock]
type = "mock"
transcript = "good morning"

# Similarity thresholds for answer classification. Boundaries are inclusive.
[verify]
near_perfect = 0.90
minor = 0.75
moderate = 0.60

# Chance of replaying a phrase you previously missed.
[practice]
reinforcement_probability = 0.3
"#;

const EXAMPLE_PACK: &str = r#"[phrase_set]
id = "starter"
name = "Starter Pack"
description = "A small pack to get going"

[[phrases]]
tier = "easy"
prompt = "Good morning!"
answer = "Good morning!"
prompt_translation = "Bom dia!"
answer_translation = "Bom dia!"

[[phrases]]
tier = "easy"
prompt = "Thank you!"
answer = "You're welcome."
prompt_translation = "Obrigado!"
answer_translation = "De nada."

[[phrases]]
tier = "medium"
prompt = "Can you help me?"
answer = "Yes, I can help you."
prompt_translation = "Você pode me ajudar?"
answer_translation = "Sim, eu posso te ajudar."

[[phrases]]
tier = "hard"
prompt = "Confirm the delivery"
answer = "I will confirm it."
prompt_translation = "Confirme a entrega"
answer_translation = "Vou confirmar."
"#;
