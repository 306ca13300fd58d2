//! speech-coach - Speech Analyzer and Coach service
//!
//! Accepts speech recordings over HTTP, transcribes them through a local
//! speech-to-text service, and scores delivery across pace, clarity,
//! structure, and vocabulary with the help of an AI provider.

use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use speech_coach::config::Settings;
use speech_coach::services::FfmpegTranscriber;
use speech_coach::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting speech-coach");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let settings = Settings::load()?;
    info!("Default AI provider: {}", settings.default_ai_provider);
    info!("Upload directory: {}", settings.upload_dir.display());

    tokio::fs::create_dir_all(&settings.upload_dir).await?;

    let transcriber = Arc::new(FfmpegTranscriber::new(
        settings.stt_endpoint.clone(),
        settings.max_audio_duration_seconds,
    )?);

    let addr = format!("{}:{}", settings.host, settings.port);
    let state = AppState::with_transcriber(settings, transcriber);
    let app = speech_coach::build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
