//! Analysis services

pub mod filler_word_analyzer;
pub mod pace_analyzer;
pub mod pipeline;
pub mod score_aggregator;
pub mod transcription;

pub use filler_word_analyzer::FillerWordAnalyzer;
pub use pace_analyzer::PaceAnalyzer;
pub use pipeline::AnalysisPipeline;
pub use score_aggregator::{ScoreAggregator, SubScores};
pub use transcription::{FfmpegTranscriber, Transcriber, Transcript, TranscriptionError};
