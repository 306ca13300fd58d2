//! Health and service-info handlers

use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::AppState;

/// GET / - service info
pub async fn root(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "message": "Speech Analyzer and Coach API",
        "version": env!("CARGO_PKG_VERSION"),
        "ai_provider": state.settings.default_ai_provider,
        "endpoints": {
            "upload": "/api/speech/upload",
            "analyze": "/api/speech/analyze/{analysis_id}",
            "status": "/api/speech/status/{analysis_id}",
            "history": "/api/speech/history",
        }
    }))
}

/// GET /api/health
pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "Speech Analyzer API",
        "ai_provider": state.settings.default_ai_provider,
    }))
}
