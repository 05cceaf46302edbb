//! Speech collaborator trait.
//!
//! The drill engine depends only on this seam; concrete services live in
//! the `phrasedrill-speech` crate.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Trait for speech backends that synthesize prompts and transcribe spoken
/// answers.
#[async_trait]
pub trait SpeechProvider: Send + Sync {
    /// Human-readable provider name (e.g. "http").
    fn name(&self) -> &str;

    /// Synthesize speech for a phrase.
    async fn synthesize(&self, request: &SynthesisRequest) -> anyhow::Result<SynthesizedAudio>;

    /// Transcribe a spoken answer.
    ///
    /// Speech the service could not understand is returned as a
    /// [`Transcription`] with `text: None`, never as an error.
    async fn transcribe(&self, request: &TranscriptionRequest) -> anyhow::Result<Transcription>;
}

/// Request to synthesize speech.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesisRequest {
    /// The text to speak.
    pub text: String,
    /// BCP-47-ish language tag (e.g. "en", "pt").
    pub language: String,
}

/// Synthesized audio returned by a speech service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesizedAudio {
    /// Encoded audio bytes, ready for playback by the caller.
    pub audio: Vec<u8>,
    /// Media type of the audio (e.g. "audio/wav").
    pub media_type: String,
    /// Latency in milliseconds.
    pub latency_ms: u64,
}

/// Request to transcribe recorded speech.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionRequest {
    /// Mono audio bytes as captured by the caller.
    pub audio: Vec<u8>,
    /// Language tag the utterance is expected to be in.
    pub language: String,
}

/// Result of a transcription request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcription {
    /// The recognized text, or `None` when the service did not understand
    /// the utterance.
    pub text: Option<String>,
    /// Service-reported confidence in `[0, 1]`, when available.
    #[serde(default)]
    pub confidence: Option<f64>,
    /// Latency in milliseconds.
    pub latency_ms: u64,
}
