//! Composite score aggregation
//!
//! Pure numeric combinator over the four analysis signals. The qualitative
//! narrative is delegated to the AI judge; a narrative failure degrades to a
//! deterministic fallback so the numeric result is never lost downstream.

use crate::ai::AiJudge;
use crate::models::{ArgumentStructure, ScoreNarrative, SpeechScore, WordChoiceAnalysis};

/// The four 1-25 sub-scores prior to narrative attachment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubScores {
    pub pace: i32,
    pub clarity: i32,
    pub structure: i32,
    pub vocabulary: i32,
}

impl SubScores {
    pub fn total(&self) -> i32 {
        self.pace + self.clarity + self.structure + self.vocabulary
    }
}

/// Combines sub-scores into a composite [`SpeechScore`]
#[derive(Debug, Default)]
pub struct ScoreAggregator;

impl ScoreAggregator {
    pub fn new() -> Self {
        Self
    }

    /// Clarity sub-score from the filler-word rate (per minute)
    pub fn clarity_score(filler_word_rate: f64) -> i32 {
        if filler_word_rate < 2.0 {
            25
        } else if filler_word_rate < 5.0 {
            20
        } else if filler_word_rate < 10.0 {
            15
        } else {
            (25 - (filler_word_rate * 1.5).round() as i32).max(5)
        }
    }

    /// Scale a 1-10 judgment onto the 1-25 sub-score range
    pub fn scaled_score(ten_point: u8) -> i32 {
        ((ten_point as f64 / 10.0) * 25.0).round() as i32
    }

    /// Compute all four sub-scores; each is guaranteed to be in 1..=25
    pub fn subscores(
        pace_score: i32,
        filler_word_rate: f64,
        structure: &ArgumentStructure,
        vocabulary: &WordChoiceAnalysis,
    ) -> SubScores {
        SubScores {
            pace: pace_score.clamp(1, 25),
            clarity: Self::clarity_score(filler_word_rate).clamp(1, 25),
            structure: Self::scaled_score(structure.logical_flow_score).clamp(1, 25),
            vocabulary: Self::scaled_score(vocabulary.vocabulary_richness_score).clamp(1, 25),
        }
    }

    /// Generate the composite score, delegating the narrative to the judge
    pub async fn generate(
        &self,
        transcription: &str,
        pace_score: i32,
        filler_word_rate: f64,
        structure: &ArgumentStructure,
        vocabulary: &WordChoiceAnalysis,
        judge: &dyn AiJudge,
    ) -> SpeechScore {
        let subscores = Self::subscores(pace_score, filler_word_rate, structure, vocabulary);

        let narrative = match judge
            .explain_score(
                transcription,
                &subscores,
                filler_word_rate,
                structure,
                vocabulary,
            )
            .await
        {
            Ok(narrative) => narrative,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "Score narrative generation failed, using deterministic fallback"
                );
                Self::fallback_narrative(&subscores)
            }
        };

        SpeechScore {
            total_score: subscores.total(),
            pace_score: subscores.pace,
            clarity_score: subscores.clarity,
            structure_score: subscores.structure,
            vocabulary_score: subscores.vocabulary,
            explanation: narrative.explanation,
            strengths: narrative.strengths,
            areas_for_improvement: narrative.areas_for_improvement,
        }
    }

    /// Deterministic narrative used when the AI judge cannot provide one
    fn fallback_narrative(subscores: &SubScores) -> ScoreNarrative {
        ScoreNarrative {
            explanation: format!(
                "Your speech scored {}/100: pace {}/25, clarity {}/25, structure {}/25, \
                 vocabulary {}/25. A detailed explanation could not be generated for this \
                 analysis.",
                subscores.total(),
                subscores.pace,
                subscores.clarity,
                subscores.structure,
                subscores.vocabulary
            ),
            strengths: vec![
                "Completed a full speech for analysis".to_string(),
                "Sub-scores above reflect measurable delivery qualities".to_string(),
            ],
            areas_for_improvement: vec![
                "Review the lowest sub-score above for the biggest gain".to_string(),
                "Re-run the analysis to receive detailed AI feedback".to_string(),
            ],
        }
    }
}
