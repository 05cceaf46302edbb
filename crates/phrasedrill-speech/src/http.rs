//! HTTP speech server provider.
//!
//! Talks to a self-hosted speech server exposing `POST /v1/synthesize`
//! (JSON in, audio bytes out) and `POST /v1/transcribe` (audio bytes in,
//! JSON out). Requests carry a bounded timeout; a transcript the server
//! could not produce comes back as `text: null`, which is surfaced as a
//! not-understood result rather than an error.

use std::time::Instant;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use phrasedrill_core::error::SpeechError;
use phrasedrill_core::traits::{
    SpeechProvider, SynthesisRequest, SynthesizedAudio, Transcription, TranscriptionRequest,
};

const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Speech provider backed by an HTTP speech server.
pub struct HttpSpeechProvider {
    base_url: String,
    api_key: Option<String>,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl HttpSpeechProvider {
    pub fn new(base_url: &str, api_key: Option<String>, timeout_secs: Option<u64>) -> Self {
        let timeout_secs = timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("failed to build HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            timeout_secs,
            client,
        }
    }

    fn apply_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    fn map_send_error(&self, e: reqwest::Error) -> SpeechError {
        if e.is_timeout() {
            SpeechError::Timeout(self.timeout_secs)
        } else {
            SpeechError::NetworkError(e.to_string())
        }
    }
}

#[derive(Serialize)]
struct SynthesizeBody {
    text: String,
    language: String,
}

#[derive(Deserialize)]
struct TranscribeResponse {
    text: Option<String>,
    #[serde(default)]
    confidence: Option<f64>,
}

#[derive(Deserialize)]
struct ServerError {
    error: ServerErrorBody,
}

#[derive(Deserialize)]
struct ServerErrorBody {
    message: String,
}

/// Map a non-success response to a typed error, consuming the body.
async fn error_for_status(response: reqwest::Response) -> SpeechError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    match status {
        401 | 403 => SpeechError::AuthenticationFailed(body),
        _ => {
            let message = serde_json::from_str::<ServerError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            SpeechError::ApiError { status, message }
        }
    }
}

#[async_trait]
impl SpeechProvider for HttpSpeechProvider {
    fn name(&self) -> &str {
        "http"
    }

    #[instrument(skip(self, request), fields(language = %request.language))]
    async fn synthesize(&self, request: &SynthesisRequest) -> anyhow::Result<SynthesizedAudio> {
        let start = Instant::now();

        let response = self
            .apply_auth(self.client.post(format!("{}/v1/synthesize", self.base_url)))
            .json(&SynthesizeBody {
                text: request.text.clone(),
                language: request.language.clone(),
            })
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        if !response.status().is_success() {
            return Err(error_for_status(response).await.into());
        }

        let media_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("audio/wav")
            .to_string();

        let audio = response
            .bytes()
            .await
            .map_err(|e| SpeechError::NetworkError(e.to_string()))?
            .to_vec();

        Ok(SynthesizedAudio {
            audio,
            media_type,
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }

    #[instrument(skip(self, request), fields(language = %request.language, bytes = request.audio.len()))]
    async fn transcribe(&self, request: &TranscriptionRequest) -> anyhow::Result<Transcription> {
        let start = Instant::now();

        let response = self
            .apply_auth(self.client.post(format!("{}/v1/transcribe", self.base_url)))
            .query(&[("language", request.language.as_str())])
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(request.audio.clone())
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        if !response.status().is_success() {
            return Err(error_for_status(response).await.into());
        }

        let parsed: TranscribeResponse =
            response.json().await.map_err(|e| SpeechError::ApiError {
                status: 0,
                message: format!("failed to parse response: {e}"),
            })?;

        Ok(Transcription {
            text: parsed.text.filter(|t| !t.trim().is_empty()),
            confidence: parsed.confidence,
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn synthesis_request() -> SynthesisRequest {
        SynthesisRequest {
            text: "Good morning!".into(),
            language: "en".into(),
        }
    }

    fn transcription_request() -> TranscriptionRequest {
        TranscriptionRequest {
            audio: vec![0u8; 64],
            language: "en".into(),
        }
    }

    #[tokio::test]
    async fn successful_synthesis() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/synthesize"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "audio/wav")
                    .set_body_bytes(b"RIFFfakewav".to_vec()),
            )
            .mount(&server)
            .await;

        let provider = HttpSpeechProvider::new(&server.uri(), None, None);
        let audio = provider.synthesize(&synthesis_request()).await.unwrap();
        assert_eq!(audio.audio, b"RIFFfakewav");
        assert_eq!(audio.media_type, "audio/wav");
    }

    #[tokio::test]
    async fn synthesis_sends_bearer_token() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/synthesize"))
            .and(header("authorization", "Bearer test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1, 2, 3]))
            .mount(&server)
            .await;

        let provider = HttpSpeechProvider::new(&server.uri(), Some("test-key".into()), None);
        let audio = provider.synthesize(&synthesis_request()).await.unwrap();
        assert_eq!(audio.audio, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn successful_transcription() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/transcribe"))
            .and(query_param("language", "en"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "text": "good morning",
                "confidence": 0.93
            })))
            .mount(&server)
            .await;

        let provider = HttpSpeechProvider::new(&server.uri(), None, None);
        let transcription = provider.transcribe(&transcription_request()).await.unwrap();
        assert_eq!(transcription.text.as_deref(), Some("good morning"));
        assert_eq!(transcription.confidence, Some(0.93));
    }

    #[tokio::test]
    async fn unrecognized_speech_is_not_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/transcribe"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "text": null })),
            )
            .mount(&server)
            .await;

        let provider = HttpSpeechProvider::new(&server.uri(), None, None);
        let transcription = provider.transcribe(&transcription_request()).await.unwrap();
        assert!(transcription.text.is_none());
    }

    #[tokio::test]
    async fn blank_transcript_counts_as_not_understood() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/transcribe"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "text": "   " })),
            )
            .mount(&server)
            .await;

        let provider = HttpSpeechProvider::new(&server.uri(), None, None);
        let transcription = provider.transcribe(&transcription_request()).await.unwrap();
        assert!(transcription.text.is_none());
    }

    #[tokio::test]
    async fn authentication_failure() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/synthesize"))
            .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
            .mount(&server)
            .await;

        let provider = HttpSpeechProvider::new(&server.uri(), Some("bad-key".into()), None);
        let err = provider.synthesize(&synthesis_request()).await.unwrap_err();
        let speech_err = err.downcast_ref::<SpeechError>().unwrap();
        assert!(matches!(speech_err, SpeechError::AuthenticationFailed(_)));
        assert!(!speech_err.is_recoverable());
    }

    #[tokio::test]
    async fn server_error_is_recoverable() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/transcribe"))
            .respond_with(ResponseTemplate::new(503).set_body_json(serde_json::json!({
                "error": { "message": "model loading" }
            })))
            .mount(&server)
            .await;

        let provider = HttpSpeechProvider::new(&server.uri(), None, None);
        let err = provider.transcribe(&transcription_request()).await.unwrap_err();
        let speech_err = err.downcast_ref::<SpeechError>().unwrap();
        assert!(matches!(
            speech_err,
            SpeechError::ApiError { status: 503, .. }
        ));
        assert!(speech_err.is_recoverable());
        assert!(err.to_string().contains("model loading"));
    }
}
