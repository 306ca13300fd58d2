//! Analysis job lifecycle
//!
//! A job progresses through:
//! UPLOADED → PROCESSING → { COMPLETED | FAILED }
//!
//! Starting analysis is only legal from `Uploaded`; completed and failed
//! states are terminal. Exactly one of `analysis` / `error` is populated
//! once the job leaves `Processing`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

use super::speech::SpeechAnalysis;

/// Job lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// File saved, analysis not yet requested
    Uploaded,
    /// Pipeline running in a background task
    Processing,
    /// Analysis finished, result attached
    Completed,
    /// A pipeline stage faulted, error message attached
    Failed,
}

/// One submitted speech awaiting or having undergone analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisJob {
    pub id: Uuid,
    /// Original filename as uploaded by the client
    pub filename: String,
    /// Location of the stored audio file
    pub upload_path: PathBuf,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    /// Populated only when `status == Completed`
    pub analysis: Option<SpeechAnalysis>,
    /// Populated only when `status == Failed`
    pub error: Option<String>,
}

impl AnalysisJob {
    /// The id is caller-supplied: the upload handler generates it first so
    /// the stored file can be named after it.
    pub fn new(id: Uuid, filename: String, upload_path: PathBuf) -> Self {
        Self {
            id,
            filename,
            upload_path,
            status: JobStatus::Uploaded,
            created_at: Utc::now(),
            analysis: None,
            error: None,
        }
    }

    /// Transition `Uploaded → Processing`
    ///
    /// Returns the previous status on rejection so the caller can produce
    /// a descriptive invalid-transition error without re-reading the job.
    pub fn begin_processing(&mut self) -> Result<(), JobStatus> {
        match self.status {
            JobStatus::Uploaded => {
                self.status = JobStatus::Processing;
                Ok(())
            }
            other => Err(other),
        }
    }

    /// Transition to `Completed`, attaching the result atomically
    pub fn complete(&mut self, analysis: SpeechAnalysis) {
        self.status = JobStatus::Completed;
        self.analysis = Some(analysis);
        self.error = None;
    }

    /// Transition to `Failed`, attaching the error message atomically
    pub fn fail(&mut self, message: String) {
        self.status = JobStatus::Failed;
        self.error = Some(message);
        self.analysis = None;
    }

    /// True for `Completed` and `Failed`
    pub fn is_terminal(&self) -> bool {
        matches!(self.status, JobStatus::Completed | JobStatus::Failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::speech::*;

    fn dummy_analysis(id: Uuid) -> SpeechAnalysis {
        SpeechAnalysis {
            id,
            filename: "speech.wav".into(),
            analyzed_at: Utc::now(),
            duration_seconds: 60.0,
            transcription: "hello".into(),
            pace_analysis: PaceAnalysis {
                words_per_minute: 140.0,
                total_words: 140,
                total_duration_seconds: 60.0,
                pace_rating: PaceRating::Optimal,
                feedback: String::new(),
            },
            filler_word_analysis: FillerWordAnalysis {
                total_filler_words: 0,
                filler_words: vec![],
                filler_word_rate: 0.0,
                feedback: String::new(),
            },
            argument_structure: ArgumentStructure {
                has_clear_thesis: true,
                has_supporting_points: true,
                has_conclusion: true,
                logical_flow_score: 8,
                feedback: String::new(),
                suggestions: vec![],
            },
            word_choice_analysis: WordChoiceAnalysis {
                weak_words: vec![],
                repetitive_words: vec![],
                vocabulary_richness_score: 8,
                feedback: String::new(),
            },
            score: SpeechScore {
                total_score: 90,
                pace_score: 25,
                clarity_score: 25,
                structure_score: 20,
                vocabulary_score: 20,
                explanation: String::new(),
                strengths: vec![],
                areas_for_improvement: vec![],
            },
            ai_provider: AiProvider::Gemini,
        }
    }

    #[test]
    fn begin_processing_only_from_uploaded() {
        let mut job = AnalysisJob::new(Uuid::new_v4(), "a.wav".into(), PathBuf::from("/tmp/a.wav"));
        assert_eq!(job.status, JobStatus::Uploaded);
        assert!(job.begin_processing().is_ok());
        assert_eq!(job.status, JobStatus::Processing);

        // Second start attempt is rejected and does not mutate state
        assert_eq!(job.begin_processing(), Err(JobStatus::Processing));
        assert_eq!(job.status, JobStatus::Processing);
    }

    #[test]
    fn begin_processing_rejected_from_terminal_states() {
        let mut job = AnalysisJob::new(Uuid::new_v4(), "a.wav".into(), PathBuf::from("/tmp/a.wav"));
        job.begin_processing().unwrap();
        job.fail("boom".into());
        assert_eq!(job.begin_processing(), Err(JobStatus::Failed));
        assert_eq!(job.status, JobStatus::Failed);
    }

    #[test]
    fn complete_sets_result_and_clears_error() {
        let mut job = AnalysisJob::new(Uuid::new_v4(), "a.wav".into(), PathBuf::from("/tmp/a.wav"));
        job.begin_processing().unwrap();
        job.complete(dummy_analysis(job.id));
        assert_eq!(job.status, JobStatus::Completed);
        assert!(job.analysis.is_some());
        assert!(job.error.is_none());
        assert!(job.is_terminal());
    }

    #[test]
    fn fail_sets_error_and_clears_result() {
        let mut job = AnalysisJob::new(Uuid::new_v4(), "a.wav".into(), PathBuf::from("/tmp/a.wav"));
        job.begin_processing().unwrap();
        job.fail("transcription failed".into());
        assert_eq!(job.status, JobStatus::Failed);
        assert!(job.analysis.is_none());
        assert_eq!(job.error.as_deref(), Some("transcription failed"));
        assert!(job.is_terminal());
    }
}
