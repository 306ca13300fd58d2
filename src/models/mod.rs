//! Data models for speech analysis

pub mod job;
pub mod speech;

pub use job::{AnalysisJob, JobStatus};
pub use speech::{
    AiProvider, ArgumentStructure, FillerWord, FillerWordAnalysis, PaceAnalysis, PaceRating,
    RepetitiveWord, ScoreNarrative, SpeechAnalysis, SpeechScore, WeakWord, WordChoiceAnalysis,
};
