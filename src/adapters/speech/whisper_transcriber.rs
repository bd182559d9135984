//! Whisper Transcriber - OpenAI audio transcription.
//!
//! Uploads the clip as multipart form data to `/audio/transcriptions` with a
//! fixed language, so short Russian voice notes are not misdetected.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;
use tokio::time::sleep;

use crate::adapters::ai::backoff_delay;
use crate::ports::{AudioClip, Transcriber, TranscriptionError};

/// Configuration for the Whisper transcriber.
#[derive(Debug, Clone)]
pub struct WhisperConfig {
    api_key: Secret<String>,
    pub model: String,
    pub language: String,
    pub base_url: String,
    pub timeout: Duration,
    pub max_retries: u32,
}

impl WhisperConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "whisper-1".to_string(),
            language: "ru".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            timeout: Duration::from_secs(60),
            max_retries: 2,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }
}

pub struct WhisperTranscriber {
    config: WhisperConfig,
    client: Client,
}

impl WhisperTranscriber {
    pub fn new(config: WhisperConfig) -> Result<Self, TranscriptionError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| TranscriptionError::Network(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { config, client })
    }

    fn transcriptions_url(&self) -> String {
        format!("{}/audio/transcriptions", self.config.base_url)
    }

    fn build_form(&self, clip: &AudioClip) -> Result<Form, TranscriptionError> {
        let part = Part::bytes(clip.bytes.clone())
            .file_name(clip.file_name.clone())
            .mime_str(&clip.mime_type)
            .map_err(|e| TranscriptionError::Parse(format!("invalid mime type: {}", e)))?;

        Ok(Form::new()
            .part("file", part)
            .text("model", self.config.model.clone())
            .text("language", self.config.language.clone())
            .text("response_format", "json"))
    }

    async fn send_once(&self, clip: &AudioClip) -> Result<String, TranscriptionError> {
        let response = self
            .client
            .post(self.transcriptions_url())
            .bearer_auth(self.config.api_key.expose_secret())
            .multipart(self.build_form(clip)?)
            .send()
            .await
            .map_err(|e| TranscriptionError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(status.as_u16(), body));
        }

        let parsed: TranscriptionResponse = response
            .json()
            .await
            .map_err(|e| TranscriptionError::Parse(e.to_string()))?;
        Ok(parsed.text.trim().to_string())
    }
}

fn classify_status(status: u16, body: String) -> TranscriptionError {
    match status {
        401 | 403 => TranscriptionError::AuthenticationFailed,
        429 => TranscriptionError::RateLimited,
        _ => TranscriptionError::Service {
            status,
            message: body,
        },
    }
}

#[async_trait]
impl Transcriber for WhisperTranscriber {
    async fn transcribe(&self, clip: AudioClip) -> Result<String, TranscriptionError> {
        if clip.is_empty() {
            return Err(TranscriptionError::EmptyAudio);
        }

        let mut attempt = 0;
        loop {
            match self.send_once(&clip).await {
                Ok(text) => {
                    tracing::debug!(
                        bytes = clip.bytes.len(),
                        chars = text.chars().count(),
                        "audio transcribed"
                    );
                    return Ok(text);
                }
                Err(err) if err.is_retryable() && attempt < self.config.max_retries => {
                    tracing::warn!(attempt = attempt + 1, error = %err, "transcription failed, retrying");
                    sleep(backoff_delay(attempt)).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    #[serde(default)]
    text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transcriber() -> WhisperTranscriber {
        WhisperTranscriber::new(
            WhisperConfig::new("key")
                .with_base_url("http://localhost:9/v1/")
                .with_language("ru"),
        )
        .unwrap()
    }

    #[test]
    fn url_has_no_double_slash() {
        assert_eq!(
            transcriber().transcriptions_url(),
            "http://localhost:9/v1/audio/transcriptions"
        );
    }

    #[test]
    fn config_defaults_match_voice_notes() {
        let config = WhisperConfig::new("key");
        assert_eq!(config.model, "whisper-1");
        assert_eq!(config.language, "ru");
        assert!(!format!("{:?}", config).contains("\"key\""));
    }

    #[test]
    fn status_classification() {
        assert_eq!(classify_status(401, String::new()), TranscriptionError::AuthenticationFailed);
        assert_eq!(classify_status(429, String::new()), TranscriptionError::RateLimited);
        assert!(classify_status(502, String::new()).is_retryable());
        assert!(!classify_status(400, "bad file".into()).is_retryable());
    }

    #[test]
    fn bad_mime_type_is_rejected() {
        let clip = AudioClip::new(vec![1, 2, 3], "voice.ogg", "not a mime\n");
        assert!(matches!(
            transcriber().build_form(&clip),
            Err(TranscriptionError::Parse(_))
        ));
    }

    #[tokio::test]
    async fn empty_clip_fails_without_network() {
        let err = transcriber()
            .transcribe(AudioClip::ogg(Vec::new()))
            .await
            .unwrap_err();
        assert_eq!(err, TranscriptionError::EmptyAudio);
    }
}
