//! Analysis pipeline orchestrator
//!
//! Runs one job through its stages in strict order:
//! transcription → {pace, filler words} → AI structure → AI word choice →
//! score aggregation. Any stage fault fails the job with a descriptive
//! message and runs no further stages; success attaches the full result and
//! the `completed` status in one registry write.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::ai::AiJudge;
use crate::models::SpeechAnalysis;
use crate::registry::JobRegistry;
use crate::services::{
    FillerWordAnalyzer, PaceAnalyzer, ScoreAggregator, Transcriber,
};

/// Per-job analysis orchestrator
pub struct AnalysisPipeline {
    registry: JobRegistry,
    transcriber: Arc<dyn Transcriber>,
    pace_analyzer: PaceAnalyzer,
    filler_analyzer: FillerWordAnalyzer,
    score_aggregator: ScoreAggregator,
}

impl AnalysisPipeline {
    pub fn new(registry: JobRegistry, transcriber: Arc<dyn Transcriber>) -> Self {
        Self {
            registry,
            transcriber,
            pace_analyzer: PaceAnalyzer::new(),
            filler_analyzer: FillerWordAnalyzer::new(),
            score_aggregator: ScoreAggregator::new(),
        }
    }

    /// Execute the full pipeline for a job already in `processing`
    ///
    /// Never returns an error to the spawning task: every fault is recorded
    /// on the job record instead.
    pub async fn execute(
        &self,
        job_id: Uuid,
        filename: String,
        upload_path: PathBuf,
        judge: Box<dyn AiJudge>,
    ) {
        tracing::info!(job_id = %job_id, provider = %judge.provider(), "Starting analysis");

        match self.run_stages(job_id, &filename, &upload_path, judge).await {
            Ok(analysis) => {
                let total = analysis.score.total_score;
                if let Err(e) = self.registry.complete(job_id, analysis).await {
                    tracing::error!(job_id = %job_id, error = %e, "Failed to store result");
                    return;
                }
                tracing::info!(job_id = %job_id, score = total, "Analysis completed");
            }
            Err(message) => {
                tracing::error!(job_id = %job_id, error = %message, "Analysis failed");
                if let Err(e) = self.registry.fail(job_id, message).await {
                    tracing::error!(job_id = %job_id, error = %e, "Failed to record failure");
                }
            }
        }
    }

    async fn run_stages(
        &self,
        job_id: Uuid,
        filename: &str,
        upload_path: &std::path::Path,
        judge: Box<dyn AiJudge>,
    ) -> Result<SpeechAnalysis, String> {
        // Stage 1: transcription
        tracing::info!(job_id = %job_id, "Transcribing audio");
        let transcript = self
            .transcriber
            .transcribe(upload_path)
            .await
            .map_err(|e| e.to_string())?;

        // Stage 2: deterministic analyzers; independent of each other, never fault
        tracing::info!(job_id = %job_id, "Analyzing pace and filler words");
        let pace_analysis = self
            .pace_analyzer
            .analyze(&transcript.text, transcript.duration_seconds);
        let filler_analysis = self
            .filler_analyzer
            .analyze(&transcript.text, transcript.duration_seconds);

        // Stage 3: AI judgments, structure then word choice
        tracing::info!(job_id = %job_id, "Running AI structure analysis");
        let argument_structure = judge
            .analyze_structure(&transcript.text)
            .await
            .map_err(|e| e.to_string())?;

        tracing::info!(job_id = %job_id, "Running AI word choice analysis");
        let word_choice_analysis = judge
            .analyze_word_choice(&transcript.text)
            .await
            .map_err(|e| e.to_string())?;

        // Stage 4: score aggregation (narrative failure degrades internally)
        tracing::info!(job_id = %job_id, "Generating score");
        let pace_score = PaceAnalyzer::pace_score(&pace_analysis);
        let score = self
            .score_aggregator
            .generate(
                &transcript.text,
                pace_score,
                filler_analysis.filler_word_rate,
                &argument_structure,
                &word_choice_analysis,
                judge.as_ref(),
            )
            .await;

        Ok(SpeechAnalysis {
            id: job_id,
            filename: filename.to_string(),
            analyzed_at: Utc::now(),
            duration_seconds: transcript.duration_seconds,
            transcription: transcript.text,
            pace_analysis,
            filler_word_analysis: filler_analysis,
            argument_structure,
            word_choice_analysis,
            score,
            ai_provider: judge.provider(),
        })
    }
}
