//! Audio transcription collaborator
//!
//! Converts uploads to 16 kHz mono WAV with ffmpeg, then sends the audio to
//! the configured speech-to-text service. The pipeline only depends on the
//! [`Transcriber`] trait so tests can substitute a canned transcript.

use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

/// Transcription faults, classified for job-failure messages
#[derive(Debug, Error)]
pub enum TranscriptionError {
    /// The speech-to-text service could not produce a transcript
    #[error("Could not understand the audio. Please ensure clear speech.")]
    UnintelligibleAudio,

    /// The speech-to-text service is unreachable or failing
    #[error("Transcription service error: {0}")]
    ServiceUnavailable(String),

    /// ffmpeg failed to convert the upload to WAV
    #[error("Audio conversion failed: {0}")]
    ConversionFailed(String),

    /// Conversion or transcription exceeded its time budget
    #[error("Transcription timed out after {0} seconds")]
    Timeout(u64),

    /// Upload exceeds the configured duration cap
    #[error("Audio is {actual:.0}s long, exceeding the {max}s maximum")]
    AudioTooLong { actual: f64, max: u32 },
}

/// Transcript with measured audio duration
#[derive(Debug, Clone)]
pub struct Transcript {
    pub text: String,
    pub duration_seconds: f64,
}

/// Audio-to-text capability
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, audio_path: &Path) -> Result<Transcript, TranscriptionError>;
}

const CONVERSION_TIMEOUT_SECS: u64 = 60;
const STT_TIMEOUT: Duration = Duration::from_secs(30);
const TARGET_SAMPLE_RATE: u32 = 16_000;

#[derive(Debug, Deserialize)]
struct SttResponse {
    #[serde(default)]
    transcript: String,
}

/// Production transcriber: ffmpeg conversion + HTTP speech-to-text service
pub struct FfmpegTranscriber {
    http_client: reqwest::Client,
    stt_endpoint: String,
    max_duration_seconds: u32,
}

impl FfmpegTranscriber {
    pub fn new(
        stt_endpoint: String,
        max_duration_seconds: u32,
    ) -> Result<Self, TranscriptionError> {
        let http_client = reqwest::Client::builder()
            .timeout(STT_TIMEOUT)
            .build()
            .map_err(|e| TranscriptionError::ServiceUnavailable(e.to_string()))?;

        Ok(Self {
            http_client,
            stt_endpoint,
            max_duration_seconds,
        })
    }

    /// Convert to 16 kHz mono PCM WAV under a bounded time budget
    async fn convert_to_wav(&self, audio_path: &Path) -> Result<PathBuf, TranscriptionError> {
        let temp_wav = std::env::temp_dir().join(format!("speech-coach-{}.wav", Uuid::new_v4()));

        let mut command = tokio::process::Command::new("ffmpeg");
        command
            .arg("-y")
            .arg("-i")
            .arg(audio_path)
            .args(["-acodec", "pcm_s16le"])
            .args(["-ar", &TARGET_SAMPLE_RATE.to_string()])
            .args(["-ac", "1"])
            .arg(&temp_wav);

        let output = tokio::time::timeout(
            Duration::from_secs(CONVERSION_TIMEOUT_SECS),
            command.output(),
        )
        .await
        .map_err(|_| TranscriptionError::Timeout(CONVERSION_TIMEOUT_SECS))?
        .map_err(|e| TranscriptionError::ConversionFailed(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TranscriptionError::ConversionFailed(
                stderr.trim().to_string(),
            ));
        }

        Ok(temp_wav)
    }

    fn wav_duration_seconds(wav_path: &Path) -> Result<f64, TranscriptionError> {
        let reader = hound::WavReader::open(wav_path)
            .map_err(|e| TranscriptionError::ConversionFailed(e.to_string()))?;
        let spec = reader.spec();
        Ok(reader.duration() as f64 / spec.sample_rate as f64)
    }

    async fn request_transcript(&self, wav_bytes: Vec<u8>) -> Result<String, TranscriptionError> {
        let response = self
            .http_client
            .post(&self.stt_endpoint)
            .header("content-type", "audio/wav")
            .body(wav_bytes)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TranscriptionError::Timeout(STT_TIMEOUT.as_secs())
                } else {
                    TranscriptionError::ServiceUnavailable(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TranscriptionError::ServiceUnavailable(format!(
                "speech-to-text service returned {}: {}",
                status, body
            )));
        }

        let parsed: SttResponse = response
            .json()
            .await
            .map_err(|_| TranscriptionError::UnintelligibleAudio)?;

        if parsed.transcript.trim().is_empty() {
            return Err(TranscriptionError::UnintelligibleAudio);
        }

        Ok(parsed.transcript)
    }
}

#[async_trait]
impl Transcriber for FfmpegTranscriber {
    async fn transcribe(&self, audio_path: &Path) -> Result<Transcript, TranscriptionError> {
        tracing::info!(path = %audio_path.display(), "Transcribing audio");

        let is_wav = audio_path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("wav"))
            .unwrap_or(false);

        let (wav_path, temp_created) = if is_wav {
            (audio_path.to_path_buf(), false)
        } else {
            (self.convert_to_wav(audio_path).await?, true)
        };

        let result = self.transcribe_wav(&wav_path).await;

        if temp_created {
            if let Err(e) = tokio::fs::remove_file(&wav_path).await {
                tracing::warn!(path = %wav_path.display(), error = %e, "Failed to remove temp WAV");
            }
        }

        result
    }
}

impl FfmpegTranscriber {
    async fn transcribe_wav(&self, wav_path: &Path) -> Result<Transcript, TranscriptionError> {
        let duration_seconds = Self::wav_duration_seconds(wav_path)?;

        if duration_seconds > self.max_duration_seconds as f64 {
            return Err(TranscriptionError::AudioTooLong {
                actual: duration_seconds,
                max: self.max_duration_seconds,
            });
        }

        let wav_bytes = tokio::fs::read(wav_path)
            .await
            .map_err(|e| TranscriptionError::ConversionFailed(e.to_string()))?;

        let text = self.request_transcript(wav_bytes).await?;

        tracing::info!(
            characters = text.len(),
            duration_seconds,
            "Transcription successful"
        );

        Ok(Transcript {
            text,
            duration_seconds,
        })
    }
}
