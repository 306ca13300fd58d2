//! Analysis value objects
//!
//! Every type here is produced once per job by an analyzer or an AI judge
//! and is immutable afterwards. The completed [`AnalysisJob`](super::job)
//! holds them by value; concurrent readers only ever see full snapshots.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Supported AI judgment providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    Gemini,
    OpenAi,
    Anthropic,
}

impl AiProvider {
    /// Parse from a query-string / config value ("gemini", "openai", "anthropic")
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" => Some(Self::Gemini),
            "openai" => Some(Self::OpenAi),
            "anthropic" => Some(Self::Anthropic),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
        }
    }
}

impl std::fmt::Display for AiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Speaking-pace rating relative to the 120-160 WPM optimal band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaceRating {
    TooSlow,
    Optimal,
    TooFast,
}

/// Speech pace metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaceAnalysis {
    /// Words per minute, 0.0 for zero-duration input
    pub words_per_minute: f64,
    /// Whitespace-delimited token count
    pub total_words: usize,
    pub total_duration_seconds: f64,
    pub pace_rating: PaceRating,
    pub feedback: String,
}

/// One detected filler term with its occurrence count
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FillerWord {
    pub word: String,
    pub count: usize,
}

/// Filler-word profile of a transcript
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FillerWordAnalysis {
    pub total_filler_words: usize,
    /// Sorted by count descending; ties broken lexically for reproducibility
    pub filler_words: Vec<FillerWord>,
    /// Fillers per minute, 0.0 for zero-duration input
    pub filler_word_rate: f64,
    pub feedback: String,
}

/// AI judgment of argument structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArgumentStructure {
    pub has_clear_thesis: bool,
    pub has_supporting_points: bool,
    pub has_conclusion: bool,
    /// Clamped to 1..=10 when parsed from the provider response
    pub logical_flow_score: u8,
    pub feedback: String,
    pub suggestions: Vec<String>,
}

/// A weak or vague word with a suggested replacement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeakWord {
    pub word: String,
    pub suggestion: String,
}

/// An overused word with its occurrence count
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepetitiveWord {
    pub word: String,
    pub count: usize,
}

/// AI judgment of word choice and vocabulary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordChoiceAnalysis {
    pub weak_words: Vec<WeakWord>,
    pub repetitive_words: Vec<RepetitiveWord>,
    /// Clamped to 1..=10 when parsed from the provider response
    pub vocabulary_richness_score: u8,
    pub feedback: String,
}

/// Qualitative narrative accompanying a score, produced by an AI judge
/// (or by the deterministic fallback when narrative generation fails)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreNarrative {
    pub explanation: String,
    pub strengths: Vec<String>,
    pub areas_for_improvement: Vec<String>,
}

/// Composite speech score
///
/// Each sub-score is an integer in 1..=25 by construction; the total is
/// always the exact sum of the four.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechScore {
    pub total_score: i32,
    pub pace_score: i32,
    pub clarity_score: i32,
    pub structure_score: i32,
    pub vocabulary_score: i32,
    pub explanation: String,
    pub strengths: Vec<String>,
    pub areas_for_improvement: Vec<String>,
}

/// Complete analysis result for one job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechAnalysis {
    pub id: Uuid,
    pub filename: String,
    pub analyzed_at: DateTime<Utc>,
    pub duration_seconds: f64,
    pub transcription: String,

    pub pace_analysis: PaceAnalysis,
    pub filler_word_analysis: FillerWordAnalysis,
    pub argument_structure: ArgumentStructure,
    pub word_choice_analysis: WordChoiceAnalysis,

    pub score: SpeechScore,
    pub ai_provider: AiProvider,
}

/// Clamp a provider-reported 1-10 score into its documented range
pub fn clamp_ten_point(score: i64) -> u8 {
    score.clamp(1, 10) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_parse_is_case_insensitive() {
        assert_eq!(AiProvider::parse("Gemini"), Some(AiProvider::Gemini));
        assert_eq!(AiProvider::parse("OPENAI"), Some(AiProvider::OpenAi));
        assert_eq!(AiProvider::parse(" anthropic "), Some(AiProvider::Anthropic));
        assert_eq!(AiProvider::parse("llama"), None);
    }

    #[test]
    fn pace_rating_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&PaceRating::TooSlow).unwrap(),
            "\"too_slow\""
        );
        assert_eq!(
            serde_json::to_string(&PaceRating::Optimal).unwrap(),
            "\"optimal\""
        );
    }

    #[test]
    fn clamp_ten_point_bounds() {
        assert_eq!(clamp_ten_point(0), 1);
        assert_eq!(clamp_ten_point(-3), 1);
        assert_eq!(clamp_ten_point(7), 7);
        assert_eq!(clamp_ten_point(15), 10);
    }
}
