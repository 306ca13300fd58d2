//! Speech Coach
//!
//! HTTP service that analyzes uploaded speech recordings: local measurement
//! of pace and filler words combined with AI judgment of argument structure
//! and word choice, aggregated into a 100-point coaching score.

pub mod ai;
pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod registry;
pub mod services;

use std::sync::Arc;

use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use config::Settings;
use registry::JobRegistry;
use services::{AnalysisPipeline, Transcriber};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub registry: JobRegistry,
    pub pipeline: Arc<AnalysisPipeline>,
}

impl AppState {
    /// Build state around a caller-supplied transcriber.
    ///
    /// The transcriber is the only component with an external process
    /// dependency, so it is injectable; tests substitute a stub.
    pub fn with_transcriber(settings: Settings, transcriber: Arc<dyn Transcriber>) -> Self {
        let registry = JobRegistry::new();
        let pipeline = Arc::new(AnalysisPipeline::new(registry.clone(), transcriber));
        Self {
            settings: Arc::new(settings),
            registry,
            pipeline,
        }
    }
}

/// Assemble the application router with CORS and request tracing
pub fn build_router(state: AppState) -> Router {
    api::routes()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
