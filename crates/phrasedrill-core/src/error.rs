//! Speech collaborator error types.
//!
//! These error types represent transport failures when talking to a speech
//! service. Defined in `phrasedrill-core` so the drill loop can downcast and
//! decide whether to retry without string matching. An utterance the service
//! could not understand is NOT an error; it is a `Transcription` with no
//! text.

use thiserror::Error;

/// Errors that can occur when interacting with a speech service.
#[derive(Debug, Error)]
pub enum SpeechError {
    /// Authentication failed (invalid API key).
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The requested language is not supported by the service.
    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// The API returned an error response.
    #[error("API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    NetworkError(String),
}

impl SpeechError {
    /// Returns `true` if the drill should warn and carry on: the learner
    /// can retry the same action and plausibly succeed.
    pub fn is_recoverable(&self) -> bool {
        match self {
            SpeechError::Timeout(_) | SpeechError::NetworkError(_) => true,
            SpeechError::ApiError { status, .. } => *status >= 500,
            SpeechError::AuthenticationFailed(_) | SpeechError::UnsupportedLanguage(_) => false,
        }
    }
}
