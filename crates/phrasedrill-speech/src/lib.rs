//! phrasedrill-speech — speech service integrations.
//!
//! Implements the `SpeechProvider` trait for self-hosted HTTP speech
//! servers and for tests, so the drill can speak prompts and transcribe
//! answers through any backend.

pub mod config;
pub mod http;
pub mod mock;

pub use config::{create_provider, load_config, DrillConfig, SpeechProviderConfig};
pub use http::HttpSpeechProvider;
pub use mock::MockSpeechProvider;
pub use phrasedrill_core::error::SpeechError;
