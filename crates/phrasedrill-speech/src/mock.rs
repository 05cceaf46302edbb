//! Mock speech provider for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use phrasedrill_core::traits::{
    SpeechProvider, SynthesisRequest, SynthesizedAudio, Transcription, TranscriptionRequest,
};

/// A mock speech provider for exercising the drill loop without a speech
/// server.
///
/// Synthesis returns deterministic fake audio bytes; transcription returns
/// configurable transcripts matched against the audio buffer.
pub struct MockSpeechProvider {
    /// Map of audio buffer → transcript.
    transcripts: HashMap<Vec<u8>, String>,
    /// Fallback transcript when no buffer matches. `None` simulates speech
    /// the service does not understand.
    default_transcript: Option<String>,
    /// Number of calls made (synthesis + transcription).
    call_count: AtomicU32,
    /// Last synthesis request received.
    last_synthesis: Mutex<Option<SynthesisRequest>>,
}

impl MockSpeechProvider {
    /// Create a mock with the given audio→transcript mappings.
    pub fn new(transcripts: HashMap<Vec<u8>, String>) -> Self {
        Self {
            transcripts,
            default_transcript: None,
            call_count: AtomicU32::new(0),
            last_synthesis: Mutex::new(None),
        }
    }

    /// Create a mock that transcribes every buffer to the same text, or to
    /// "not understood" when `None`.
    pub fn with_fixed_transcript(transcript: Option<&str>) -> Self {
        Self {
            transcripts: HashMap::new(),
            default_transcript: transcript.map(str::to_string),
            call_count: AtomicU32::new(0),
            last_synthesis: Mutex::new(None),
        }
    }

    /// Fake audio bytes produced for a phrase.
    pub fn audio_for(text: &str) -> Vec<u8> {
        format!("RIFF:{text}").into_bytes()
    }

    /// Get the number of calls made to this provider.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Get the last synthesis request made to this provider.
    pub fn last_synthesis(&self) -> Option<SynthesisRequest> {
        self.last_synthesis.lock().unwrap().clone()
    }
}

#[async_trait]
impl SpeechProvider for MockSpeechProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn synthesize(&self, request: &SynthesisRequest) -> anyhow::Result<SynthesizedAudio> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        *self.last_synthesis.lock().unwrap() = Some(request.clone());

        Ok(SynthesizedAudio {
            audio: Self::audio_for(&request.text),
            media_type: "audio/wav".into(),
            latency_ms: 1,
        })
    }

    async fn transcribe(&self, request: &TranscriptionRequest) -> anyhow::Result<Transcription> {
        self.call_count.fetch_add(1, Ordering::Relaxed);

        let text = self
            .transcripts
            .get(&request.audio)
            .cloned()
            .or_else(|| self.default_transcript.clone());

        Ok(Transcription {
            text,
            confidence: Some(1.0),
            latency_ms: 1,
        })
    }
}
