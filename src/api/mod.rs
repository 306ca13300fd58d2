//! HTTP API

pub mod health;
pub mod speech;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::AppState;

/// All application routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(health::root))
        .route("/api/health", get(health::health_check))
        .route("/api/speech/upload", post(speech::upload_speech))
        .route("/api/speech/analyze/:analysis_id", post(speech::start_analysis))
        .route("/api/speech/status/:analysis_id", get(speech::get_status))
        .route("/api/speech/history", get(speech::get_history))
        .route("/api/speech/:analysis_id", delete(speech::delete_speech))
}
