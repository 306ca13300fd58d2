//! End-to-end pipeline tests with stubbed transcription and AI judgment

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use speech_coach::ai::{AiError, AiJudge};
use speech_coach::models::{AiProvider, JobStatus};
use speech_coach::registry::JobRegistry;
use speech_coach::services::{
    AnalysisPipeline, Transcriber, Transcript, TranscriptionError,
};

struct StubTranscriber {
    text: String,
    duration_seconds: f64,
    fail: bool,
}

#[async_trait]
impl Transcriber for StubTranscriber {
    async fn transcribe(&self, _audio_path: &Path) -> Result<Transcript, TranscriptionError> {
        if self.fail {
            return Err(TranscriptionError::UnintelligibleAudio);
        }
        Ok(Transcript {
            text: self.text.clone(),
            duration_seconds: self.duration_seconds,
        })
    }
}

/// Routes each prompt to a canned JSON response by its distinguishing text
#[derive(Debug)]
struct StubJudge {
    fail_all: bool,
    fail_narrative: bool,
}

impl StubJudge {
    fn ok() -> Self {
        Self {
            fail_all: false,
            fail_narrative: false,
        }
    }
}

#[async_trait]
impl AiJudge for StubJudge {
    fn provider(&self) -> AiProvider {
        AiProvider::Gemini
    }

    async fn complete(&self, prompt: &str) -> Result<String, AiError> {
        if self.fail_all {
            return Err(AiError::ProviderError("upstream 500".to_string()));
        }
        if prompt.contains("argument structure") {
            Ok(r#"{"has_clear_thesis": true, "has_supporting_points": true,
                   "has_conclusion": true, "logical_flow_score": 8,
                   "feedback": "well organized", "suggestions": ["stronger close"]}"#
                .to_string())
        } else if prompt.contains("word choice and vocabulary") {
            Ok(r#"{"weak_words": [{"word": "nice", "suggestion": "compelling"}],
                   "repetitive_words": [], "vocabulary_richness_score": 6,
                   "feedback": "adequate range"}"#
                .to_string())
        } else if self.fail_narrative {
            Err(AiError::ProviderError("narrative timeout".to_string()))
        } else {
            Ok(r#"{"explanation": "strong overall delivery",
                   "strengths": ["clear thesis", "steady pace", "few fillers"],
                   "areas_for_improvement": ["vary vocabulary", "tighten close", "pause more"]}"#
                .to_string())
        }
    }
}

fn pipeline_with(
    registry: &JobRegistry,
    transcriber: StubTranscriber,
) -> AnalysisPipeline {
    AnalysisPipeline::new(registry.clone(), Arc::new(transcriber))
}

async fn uploaded_job(registry: &JobRegistry) -> Uuid {
    let id = Uuid::new_v4();
    registry
        .insert(id, "talk.wav".to_string(), PathBuf::from("/tmp/talk.wav"))
        .await;
    id
}

// 140 filler-free words over 60 seconds: pace optimal (25), clarity 25,
// structure round(8/10*25)=20, vocabulary round(6/10*25)=15, total 85.
fn clean_transcript() -> String {
    vec!["point"; 140].join(" ")
}

#[tokio::test]
async fn successful_run_completes_job_with_result() {
    let registry = JobRegistry::new();
    let pipeline = pipeline_with(
        &registry,
        StubTranscriber {
            text: clean_transcript(),
            duration_seconds: 60.0,
            fail: false,
        },
    );

    let id = uploaded_job(&registry).await;
    let (filename, path) = registry.begin_processing(id).await.unwrap();
    pipeline
        .execute(id, filename, path, Box::new(StubJudge::ok()))
        .await;

    let job = registry.snapshot(id).await.unwrap();
    assert_eq!(job.status, JobStatus::Completed);
    assert!(job.error.is_none());

    let analysis = job.analysis.expect("completed job carries a result");
    assert_eq!(analysis.id, id);
    assert_eq!(analysis.ai_provider, AiProvider::Gemini);
    assert_eq!(analysis.pace_analysis.words_per_minute, 140.0);
    assert_eq!(analysis.filler_word_analysis.total_filler_words, 0);
    assert_eq!(analysis.score.pace_score, 25);
    assert_eq!(analysis.score.clarity_score, 25);
    assert_eq!(analysis.score.structure_score, 20);
    assert_eq!(analysis.score.vocabulary_score, 15);
    assert_eq!(analysis.score.total_score, 85);
    assert_eq!(analysis.score.explanation, "strong overall delivery");
}

#[tokio::test]
async fn transcription_failure_fails_job_with_message() {
    let registry = JobRegistry::new();
    let pipeline = pipeline_with(
        &registry,
        StubTranscriber {
            text: String::new(),
            duration_seconds: 0.0,
            fail: true,
        },
    );

    let id = uploaded_job(&registry).await;
    let (filename, path) = registry.begin_processing(id).await.unwrap();
    pipeline
        .execute(id, filename, path, Box::new(StubJudge::ok()))
        .await;

    let job = registry.snapshot(id).await.unwrap();
    assert_eq!(job.status, JobStatus::Failed);
    assert!(job.analysis.is_none());
    let error = job.error.expect("failed job carries a message");
    assert!(error.contains("transcrib") || error.contains("speech"), "{error}");
}

#[tokio::test]
async fn ai_failure_fails_job() {
    let registry = JobRegistry::new();
    let pipeline = pipeline_with(
        &registry,
        StubTranscriber {
            text: clean_transcript(),
            duration_seconds: 60.0,
            fail: false,
        },
    );

    let id = uploaded_job(&registry).await;
    let (filename, path) = registry.begin_processing(id).await.unwrap();
    pipeline
        .execute(
            id,
            filename,
            path,
            Box::new(StubJudge {
                fail_all: true,
                fail_narrative: false,
            }),
        )
        .await;

    let job = registry.snapshot(id).await.unwrap();
    assert_eq!(job.status, JobStatus::Failed);
    assert!(job.analysis.is_none());
    assert!(job.error.unwrap().contains("upstream 500"));
}

#[tokio::test]
async fn narrative_failure_degrades_to_fallback_not_job_failure() {
    let registry = JobRegistry::new();
    let pipeline = pipeline_with(
        &registry,
        StubTranscriber {
            text: clean_transcript(),
            duration_seconds: 60.0,
            fail: false,
        },
    );

    let id = uploaded_job(&registry).await;
    let (filename, path) = registry.begin_processing(id).await.unwrap();
    pipeline
        .execute(
            id,
            filename,
            path,
            Box::new(StubJudge {
                fail_all: false,
                fail_narrative: true,
            }),
        )
        .await;

    let job = registry.snapshot(id).await.unwrap();
    assert_eq!(job.status, JobStatus::Completed);

    // Numeric score survives; narrative is the deterministic fallback
    let analysis = job.analysis.unwrap();
    assert_eq!(analysis.score.total_score, 85);
    assert!(analysis.score.explanation.contains("85/100"));
    assert!(!analysis.score.strengths.is_empty());
    assert!(!analysis.score.areas_for_improvement.is_empty());
}

#[tokio::test]
async fn second_start_attempt_is_rejected_without_disturbing_run() {
    let registry = JobRegistry::new();
    let pipeline = pipeline_with(
        &registry,
        StubTranscriber {
            text: clean_transcript(),
            duration_seconds: 60.0,
            fail: false,
        },
    );

    let id = uploaded_job(&registry).await;
    let (filename, path) = registry.begin_processing(id).await.unwrap();
    assert!(registry.begin_processing(id).await.is_err());

    pipeline
        .execute(id, filename, path, Box::new(StubJudge::ok()))
        .await;

    // Terminal states also refuse a restart
    assert!(registry.begin_processing(id).await.is_err());
    assert_eq!(
        registry.snapshot(id).await.unwrap().status,
        JobStatus::Completed
    );
}
