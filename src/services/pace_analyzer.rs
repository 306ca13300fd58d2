//! Speaking-pace analyzer
//!
//! Deterministic: word count over duration, rated against the 120-160 WPM
//! optimal band. Never faults; zero-duration input yields 0 WPM.

use crate::models::{PaceAnalysis, PaceRating};

/// Lower bound of the optimal words-per-minute band (inclusive)
pub const OPTIMAL_WPM_MIN: f64 = 120.0;
/// Upper bound of the optimal words-per-minute band (inclusive)
pub const OPTIMAL_WPM_MAX: f64 = 160.0;

/// Analyzes the pace of speech
#[derive(Debug, Default)]
pub struct PaceAnalyzer;

impl PaceAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Analyze pace of a transcript over the given duration
    pub fn analyze(&self, transcription: &str, duration_seconds: f64) -> PaceAnalysis {
        let total_words = transcription.split_whitespace().count();

        let duration_minutes = duration_seconds / 60.0;
        let wpm = if duration_minutes > 0.0 {
            total_words as f64 / duration_minutes
        } else {
            0.0
        };

        let (pace_rating, feedback) = if wpm < OPTIMAL_WPM_MIN {
            (
                PaceRating::TooSlow,
                format!(
                    "Your speaking pace is {} words per minute, which is slower than optimal. \
                     Try to speak slightly faster to maintain audience engagement. \
                     Aim for {}-{} WPM.",
                    wpm.round() as i64,
                    OPTIMAL_WPM_MIN as i64,
                    OPTIMAL_WPM_MAX as i64
                ),
            )
        } else if wpm > OPTIMAL_WPM_MAX {
            (
                PaceRating::TooFast,
                format!(
                    "Your speaking pace is {} words per minute, which is faster than optimal. \
                     Slow down to ensure clarity and give your audience time to absorb your points. \
                     Aim for {}-{} WPM.",
                    wpm.round() as i64,
                    OPTIMAL_WPM_MIN as i64,
                    OPTIMAL_WPM_MAX as i64
                ),
            )
        } else {
            (
                PaceRating::Optimal,
                format!(
                    "Excellent! Your speaking pace is {} words per minute, \
                     which is in the optimal range of {}-{} WPM. \
                     This pace helps maintain audience engagement while ensuring clarity.",
                    wpm.round() as i64,
                    OPTIMAL_WPM_MIN as i64,
                    OPTIMAL_WPM_MAX as i64
                ),
            )
        };

        PaceAnalysis {
            words_per_minute: round2(wpm),
            total_words,
            total_duration_seconds: round2(duration_seconds),
            pace_rating,
            feedback,
        }
    }

    /// Pace sub-score in 15..=25 used by the score aggregator
    ///
    /// Optimal pace scores 25; off-optimal loses one point per 5 WPM of
    /// deviation from the band edge, floored at 15 regardless of how
    /// extreme the deviation.
    pub fn pace_score(analysis: &PaceAnalysis) -> i32 {
        match analysis.pace_rating {
            PaceRating::Optimal => 25,
            PaceRating::TooSlow => {
                let deviation = OPTIMAL_WPM_MIN - analysis.words_per_minute;
                (25 - (deviation / 5.0).floor() as i32).max(15)
            }
            PaceRating::TooFast => {
                let deviation = analysis.words_per_minute - OPTIMAL_WPM_MAX;
                (25 - (deviation / 5.0).floor() as i32).max(15)
            }
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(n: usize) -> String {
        vec!["word"; n].join(" ")
    }

    #[test]
    fn optimal_pace_140_wpm() {
        let analysis = PaceAnalyzer::new().analyze(&words(140), 60.0);
        assert_eq!(analysis.total_words, 140);
        assert_eq!(analysis.words_per_minute, 140.0);
        assert_eq!(analysis.pace_rating, PaceRating::Optimal);
        assert_eq!(PaceAnalyzer::pace_score(&analysis), 25);
        assert!(analysis.feedback.contains("140 words per minute"));
    }

    #[test]
    fn band_edges_are_optimal() {
        let low = PaceAnalyzer::new().analyze(&words(120), 60.0);
        assert_eq!(low.pace_rating, PaceRating::Optimal);
        let high = PaceAnalyzer::new().analyze(&words(160), 60.0);
        assert_eq!(high.pace_rating, PaceRating::Optimal);
    }

    #[test]
    fn too_slow_100_wpm_scores_21() {
        let analysis = PaceAnalyzer::new().analyze(&words(100), 60.0);
        assert_eq!(analysis.pace_rating, PaceRating::TooSlow);
        // 25 - floor((120 - 100) / 5) = 21
        assert_eq!(PaceAnalyzer::pace_score(&analysis), 21);
        assert!(analysis.feedback.contains("slower than optimal"));
        assert!(analysis.feedback.contains("120-160 WPM"));
    }

    #[test]
    fn too_fast_penalty_floors_at_15() {
        // 400 WPM: 25 - floor(240/5) would be -23, floored to 15
        let analysis = PaceAnalyzer::new().analyze(&words(400), 60.0);
        assert_eq!(analysis.pace_rating, PaceRating::TooFast);
        assert_eq!(PaceAnalyzer::pace_score(&analysis), 15);
    }

    #[test]
    fn extreme_slow_penalty_floors_at_15() {
        let analysis = PaceAnalyzer::new().analyze(&words(10), 60.0);
        assert_eq!(analysis.pace_rating, PaceRating::TooSlow);
        assert_eq!(PaceAnalyzer::pace_score(&analysis), 15);
    }

    #[test]
    fn zero_duration_yields_zero_wpm() {
        let analysis = PaceAnalyzer::new().analyze("some words here", 0.0);
        assert_eq!(analysis.words_per_minute, 0.0);
        assert_eq!(analysis.total_words, 3);
        assert_eq!(analysis.pace_rating, PaceRating::TooSlow);
    }

    #[test]
    fn empty_transcript_counts_zero_words() {
        let analysis = PaceAnalyzer::new().analyze("", 60.0);
        assert_eq!(analysis.total_words, 0);
        assert_eq!(analysis.words_per_minute, 0.0);
    }

    #[test]
    fn wpm_rounds_to_two_decimals() {
        // 100 words over 45s = 133.333... WPM
        let analysis = PaceAnalyzer::new().analyze(&words(100), 45.0);
        assert_eq!(analysis.words_per_minute, 133.33);
        assert_eq!(analysis.pace_rating, PaceRating::Optimal);
    }
}
