//! Phrase-pack loading and validation.
//!
//! Packs are TOML files with a `[phrase_set]` header and `[[phrases]]`
//! entries, or JSON files carrying either a full [`PhraseSet`] or a bare
//! tier-to-phrases mapping.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::{PhraseEntry, PhraseSet, Tier};

/// Intermediate TOML structure for parsing phrase-pack files.
#[derive(Debug, Deserialize)]
struct TomlPackFile {
    phrase_set: TomlPackHeader,
    #[serde(default)]
    phrases: Vec<TomlPhrase>,
}

#[derive(Debug, Deserialize)]
struct TomlPackHeader {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct TomlPhrase {
    tier: String,
    prompt: String,
    answer: String,
    #[serde(default)]
    prompt_translation: String,
    #[serde(default)]
    answer_translation: String,
}

/// Parse a phrase-pack file, dispatching on its extension.
pub fn parse_phrase_set(path: &Path) -> Result<PhraseSet> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read phrase pack: {}", path.display()))?;

    if path.extension().is_some_and(|ext| ext == "json") {
        parse_phrase_set_json(&content, path)
    } else {
        parse_phrase_set_str(&content, path)
    }
}

/// Parse a TOML string into a `PhraseSet` (useful for testing).
pub fn parse_phrase_set_str(content: &str, source_path: &Path) -> Result<PhraseSet> {
    let parsed: TomlPackFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let mut tiers: BTreeMap<Tier, Vec<PhraseEntry>> = BTreeMap::new();
    for phrase in parsed.phrases {
        let tier: Tier = phrase
            .tier
            .parse()
            .map_err(|e: String| anyhow::anyhow!("{}: {e}", source_path.display()))?;
        tiers.entry(tier).or_default().push(PhraseEntry {
            prompt: phrase.prompt,
            answer: phrase.answer,
            prompt_translation: phrase.prompt_translation,
            answer_translation: phrase.answer_translation,
        });
    }

    Ok(PhraseSet {
        id: parsed.phrase_set.id,
        name: parsed.phrase_set.name,
        description: parsed.phrase_set.description,
        tiers,
    })
}

/// Parse a JSON pack: a full `PhraseSet`, or a bare tier mapping whose id
/// and name are taken from the file stem.
fn parse_phrase_set_json(content: &str, source_path: &Path) -> Result<PhraseSet> {
    if let Ok(set) = serde_json::from_str::<PhraseSet>(content) {
        return Ok(set);
    }

    let tiers: BTreeMap<Tier, Vec<PhraseEntry>> = serde_json::from_str(content)
        .with_context(|| format!("failed to parse JSON pack: {}", source_path.display()))?;
    let stem = source_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("pack")
        .to_string();
    Ok(PhraseSet {
        id: stem.clone(),
        name: stem,
        description: String::new(),
        tiers,
    })
}

/// Recursively load all `.toml` and `.json` packs from a directory.
///
/// Unparseable files are skipped with a warning.
pub fn load_pack_directory(dir: &Path) -> Result<Vec<PhraseSet>> {
    let mut sets = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            sets.extend(load_pack_directory(&path)?);
        } else if path
            .extension()
            .is_some_and(|ext| ext == "toml" || ext == "json")
        {
            match parse_phrase_set(&path) {
                Ok(set) => sets.push(set),
                Err(e) => {
                    tracing::warn!("skipping {}: {}", path.display(), e);
                }
            }
        }
    }

    Ok(sets)
}

/// A warning from phrase-pack validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The tier the warning applies to, if any.
    pub tier: Option<Tier>,
    /// Warning message.
    pub message: String,
}

/// Validate a phrase pack for common issues.
///
/// Warnings only: the drill accepts any pack that parses.
pub fn validate_phrase_set(set: &PhraseSet) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if set.phrase_count() == 0 {
        warnings.push(ValidationWarning {
            tier: None,
            message: "pack contains no phrases".into(),
        });
    }

    for tier in Tier::ALL {
        let phrases = set.tier(tier);
        if phrases.is_empty() {
            warnings.push(ValidationWarning {
                tier: Some(tier),
                message: format!("tier '{tier}' has no phrases"),
            });
            continue;
        }

        for phrase in phrases {
            if phrase.prompt.trim().is_empty() {
                warnings.push(ValidationWarning {
                    tier: Some(tier),
                    message: "phrase has an empty prompt".into(),
                });
            }
            if phrase.answer.trim().is_empty() {
                warnings.push(ValidationWarning {
                    tier: Some(tier),
                    message: format!("phrase '{}' has an empty answer", phrase.prompt),
                });
            }
        }

        // Duplicate answers make miss counts indistinguishable between
        // entries, which skews reinforcement.
        let mut seen = std::collections::HashSet::new();
        for phrase in phrases {
            if !phrase.answer.trim().is_empty() && !seen.insert(&phrase.answer) {
                warnings.push(ValidationWarning {
                    tier: Some(tier),
                    message: format!("duplicate answer in tier '{tier}': {}", phrase.answer),
                });
            }
        }
    }

    warnings
}
