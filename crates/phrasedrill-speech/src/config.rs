//! Drill configuration and speech provider factory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use phrasedrill_core::scheduler::PracticeConfig;
use phrasedrill_core::traits::SpeechProvider;
use phrasedrill_core::verify::VerifyConfig;

use crate::http::HttpSpeechProvider;
use crate::mock::MockSpeechProvider;

/// Configuration for a single speech provider.
///
/// Note: Custom Debug impl masks API keys to prevent accidental exposure in
/// logs.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SpeechProviderConfig {
    Http {
        base_url: String,
        #[serde(default)]
        api_key: Option<String>,
        #[serde(default)]
        timeout_secs: Option<u64>,
    },
    Mock {
        #[serde(default)]
        transcript: Option<String>,
    },
}

impl std::fmt::Debug for SpeechProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpeechProviderConfig::Http {
                api_key,
                base_url,
                timeout_secs,
            } => f
                .debug_struct("Http")
                .field("base_url", base_url)
                .field("api_key", &api_key.as_ref().map(|_| "***"))
                .field("timeout_secs", timeout_secs)
                .finish(),
            SpeechProviderConfig::Mock { transcript } => f
                .debug_struct("Mock")
                .field("transcript", transcript)
                .finish(),
        }
    }
}

/// Top-level phrasedrill configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrillConfig {
    /// Speech provider configurations keyed by name.
    #[serde(default)]
    pub speech: HashMap<String, SpeechProviderConfig>,
    /// Speech provider used by the drill when one is configured.
    #[serde(default = "default_speech_provider")]
    pub default_speech_provider: String,
    /// Language tag prompts are spoken and answered in.
    #[serde(default = "default_language")]
    pub language: String,
    /// Similarity thresholds for answer classification.
    #[serde(default)]
    pub verify: VerifyConfig,
    /// Scheduling knobs.
    #[serde(default)]
    pub practice: PracticeConfig,
    /// Where per-phrase progress counters are persisted.
    #[serde(default = "default_progress_path")]
    pub progress_path: PathBuf,
}

fn default_speech_provider() -> String {
    "http".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

fn default_progress_path() -> PathBuf {
    PathBuf::from("phrasedrill-progress.json")
}

impl Default for DrillConfig {
    fn default() -> Self {
        Self {
            speech: HashMap::new(),
            default_speech_provider: default_speech_provider(),
            language: default_language(),
            verify: VerifyConfig::default(),
            practice: PracticeConfig::default(),
            progress_path: default_progress_path(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

/// Resolve env vars in a provider config.
fn resolve_provider_config(config: &SpeechProviderConfig) -> SpeechProviderConfig {
    match config {
        SpeechProviderConfig::Http {
            base_url,
            api_key,
            timeout_secs,
        } => SpeechProviderConfig::Http {
            base_url: resolve_env_vars(base_url),
            api_key: api_key.as_ref().map(|k| resolve_env_vars(k)),
            timeout_secs: *timeout_secs,
        },
        SpeechProviderConfig::Mock { transcript } => SpeechProviderConfig::Mock {
            transcript: transcript.clone(),
        },
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `phrasedrill.toml` in the current directory
/// 2. `~/.config/phrasedrill/config.toml`
///
/// Environment variable override: `PHRASEDRILL_SPEECH_KEY` sets the HTTP
/// provider's API key.
pub fn load_config() -> Result<DrillConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<DrillConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("phrasedrill.toml");
        if local.exists() {
            Some(local)
        } else if let Some(home) = dirs_path() {
            let global = home.join("config.toml");
            if global.exists() {
                Some(global)
            } else {
                None
            }
        } else {
            None
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<DrillConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => DrillConfig::default(),
    };

    // Apply env var override for the HTTP provider key
    if let Ok(key) = std::env::var("PHRASEDRILL_SPEECH_KEY") {
        if let Some(SpeechProviderConfig::Http { api_key, .. }) = config.speech.get_mut("http") {
            *api_key = Some(key);
        }
    }

    // Resolve env vars in all provider configs
    let resolved: HashMap<String, SpeechProviderConfig> = config
        .speech
        .iter()
        .map(|(k, v)| (k.clone(), resolve_provider_config(v)))
        .collect();
    config.speech = resolved;

    config
        .verify
        .validate()
        .context("invalid [verify] thresholds")?;
    config
        .practice
        .validate()
        .context("invalid [practice] settings")?;

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("phrasedrill"))
}

/// Create a provider instance from its configuration.
pub fn create_provider(config: &SpeechProviderConfig) -> Box<dyn SpeechProvider> {
    match config {
        SpeechProviderConfig::Http {
            base_url,
            api_key,
            timeout_secs,
        } => Box::new(HttpSpeechProvider::new(
            base_url,
            api_key.clone(),
            *timeout_secs,
        )),
        SpeechProviderConfig::Mock { transcript } => Box::new(
            MockSpeechProvider::with_fixed_transcript(transcript.as_deref()),
        ),
    }
}
