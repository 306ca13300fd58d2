//! Speech analysis endpoints
//!
//! Upload accepts the audio file and registers a job; analysis runs in a
//! spawned background task so the start request returns immediately. Job
//! state is observed through the status endpoint, never through the start
//! response.

use axum::{
    extract::{Multipart, Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};
use uuid::Uuid;

use crate::ai::{create_judge, AiError};
use crate::error::{ApiError, ApiResult};
use crate::models::{AiProvider, JobStatus, SpeechAnalysis};
use crate::registry::{JobSummary, RegistryError};
use crate::AppState;

/// Accepted upload extensions (lowercase, with leading dot)
const ALLOWED_EXTENSIONS: &[&str] = &[".mp3", ".wav", ".ogg", ".m4a", ".flac", ".webm"];

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub analysis_id: Uuid,
    pub status: JobStatus,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeParams {
    /// Per-request provider override; falls back to the configured default
    pub provider: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub analysis_id: Uuid,
    pub status: JobStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<SpeechAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub analyses: Vec<JobSummary>,
    pub total: usize,
}

impl From<RegistryError> for ApiError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::NotFound(_) => ApiError::NotFound(err.to_string()),
            RegistryError::InvalidTransition { .. } => ApiError::BadRequest(err.to_string()),
            RegistryError::DeleteWhileProcessing(_) => ApiError::Conflict(err.to_string()),
        }
    }
}

/// POST /api/speech/upload
///
/// The stored file is named after the job id (original extension kept) so a
/// registry entry and its backing file can never refer to different uploads.
pub async fn upload_speech(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    let field = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid multipart request: {}", e)))?
        .ok_or_else(|| ApiError::BadRequest("No file provided".to_string()))?;

    let filename = field
        .file_name()
        .map(|s| s.to_string())
        .ok_or_else(|| ApiError::BadRequest("No filename provided".to_string()))?;

    let extension = file_extension(&filename);
    if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(ApiError::BadRequest(format!(
            "Unsupported file type '{}'. Supported: {}",
            extension,
            ALLOWED_EXTENSIONS.join(", ")
        )));
    }

    let data = field
        .bytes()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Failed to read upload: {}", e)))?;
    if data.is_empty() {
        return Err(ApiError::BadRequest("Uploaded file is empty".to_string()));
    }

    let analysis_id = Uuid::new_v4();
    let upload_path = state
        .settings
        .upload_dir
        .join(format!("{}{}", analysis_id, extension));

    tokio::fs::create_dir_all(&state.settings.upload_dir).await?;
    tokio::fs::write(&upload_path, &data).await?;

    state
        .registry
        .insert(analysis_id, filename.clone(), upload_path)
        .await;

    info!(
        analysis_id = %analysis_id,
        filename = %filename,
        bytes = data.len(),
        "Speech uploaded"
    );

    Ok(Json(UploadResponse {
        analysis_id,
        status: JobStatus::Uploaded,
        message: "File uploaded successfully. Use the analyze endpoint to start analysis."
            .to_string(),
    }))
}

/// POST /api/speech/analyze/:id
pub async fn start_analysis(
    State(state): State<AppState>,
    Path(analysis_id): Path<Uuid>,
    Query(params): Query<AnalyzeParams>,
) -> ApiResult<Json<Value>> {
    // Existence first, so an unknown id is 404 even with a bad provider
    state.registry.snapshot(analysis_id).await?;

    let provider = match params.provider.as_deref() {
        Some(name) => AiProvider::parse(name).ok_or_else(|| {
            ApiError::BadRequest(format!(
                "Unknown AI provider '{}' (expected gemini, openai, or anthropic)",
                name
            ))
        })?,
        None => state.settings.default_ai_provider,
    };

    // Judge construction faults on a missing API key before any state change
    let judge = create_judge(provider, &state.settings).map_err(|e| match e {
        AiError::MissingApiKey(_) => ApiError::BadRequest(e.to_string()),
        other => ApiError::Internal(other.to_string()),
    })?;

    let (filename, upload_path) = state.registry.begin_processing(analysis_id).await?;

    info!(
        analysis_id = %analysis_id,
        provider = %provider,
        "Analysis started"
    );

    let pipeline = state.pipeline.clone();
    tokio::spawn(async move {
        pipeline
            .execute(analysis_id, filename, upload_path, judge)
            .await;
    });

    Ok(Json(json!({
        "analysis_id": analysis_id,
        "status": "processing",
        "ai_provider": provider,
        "message": "Analysis started. Poll the status endpoint for the result.",
    })))
}

/// GET /api/speech/status/:id
pub async fn get_status(
    State(state): State<AppState>,
    Path(analysis_id): Path<Uuid>,
) -> ApiResult<Json<AnalysisResponse>> {
    let job = state.registry.snapshot(analysis_id).await?;
    Ok(Json(AnalysisResponse {
        analysis_id: job.id,
        status: job.status,
        analysis: job.analysis,
        error: job.error,
    }))
}

/// GET /api/speech/history
pub async fn get_history(State(state): State<AppState>) -> ApiResult<Json<HistoryResponse>> {
    let analyses = state.registry.list().await;
    let total = analyses.len();
    Ok(Json(HistoryResponse { analyses, total }))
}

/// DELETE /api/speech/:id
///
/// Refused with 409 while the job is processing; the pipeline still owns the
/// backing file. The registry entry goes first so a failed unlink leaves a
/// stray file rather than a dangling record.
pub async fn delete_speech(
    State(state): State<AppState>,
    Path(analysis_id): Path<Uuid>,
) -> ApiResult<Json<Value>> {
    let job = state.registry.remove(analysis_id).await?;

    if let Err(e) = tokio::fs::remove_file(&job.upload_path).await {
        warn!(
            analysis_id = %analysis_id,
            path = %job.upload_path.display(),
            error = %e,
            "Failed to remove uploaded file"
        );
    }

    info!(analysis_id = %analysis_id, "Analysis deleted");
    Ok(Json(json!({
        "message": format!("Analysis {} deleted", analysis_id),
    })))
}

/// Lowercased extension including the dot, or empty if none
fn file_extension(filename: &str) -> String {
    match filename.rfind('.') {
        Some(idx) => filename[idx..].to_ascii_lowercase(),
        None => String::new(),
    }
}
