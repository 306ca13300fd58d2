//! Filler-word analyzer
//!
//! Deterministic lexicon scan. Matches are whole-word and case-insensitive;
//! multi-word phrases ("you know") match as contiguous sequences. Never
//! faults; zero-duration input yields a 0.0 rate.

use regex::RegexBuilder;

use crate::models::{FillerWord, FillerWordAnalysis};

/// Filler lexicon: single words and short phrases
///
/// The detection result is sorted by count, so lexicon order does not leak
/// into the output (ties break lexically).
const FILLER_WORDS: &[&str] = &[
    "um",
    "uh",
    "er",
    "ah",
    "like",
    "you know",
    "i mean",
    "basically",
    "actually",
    "literally",
    "so",
    "well",
    "right",
    "okay",
    "yeah",
];

/// Analyzes speech for filler words
pub struct FillerWordAnalyzer {
    patterns: Vec<(&'static str, regex::Regex)>,
}

impl FillerWordAnalyzer {
    pub fn new() -> Self {
        let patterns = FILLER_WORDS
            .iter()
            .map(|&word| {
                let pattern = format!(r"\b{}\b", regex::escape(word));
                let re = RegexBuilder::new(&pattern)
                    .case_insensitive(true)
                    .build()
                    .expect("filler lexicon patterns are static and valid");
                (word, re)
            })
            .collect();
        Self { patterns }
    }

    /// Analyze a transcript for filler words over the given duration
    pub fn analyze(&self, transcription: &str, duration_seconds: f64) -> FillerWordAnalysis {
        let mut detected: Vec<FillerWord> = Vec::new();
        let mut total_count = 0;

        for (word, re) in &self.patterns {
            let count = re.find_iter(transcription).count();
            if count > 0 {
                detected.push(FillerWord {
                    word: (*word).to_string(),
                    count,
                });
                total_count += count;
            }
        }

        // Count descending, lexical tie-break for reproducibility
        detected.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.word.cmp(&b.word)));

        let duration_minutes = duration_seconds / 60.0;
        let filler_rate = if duration_minutes > 0.0 {
            total_count as f64 / duration_minutes
        } else {
            0.0
        };

        let feedback = Self::generate_feedback(filler_rate, &detected);

        FillerWordAnalysis {
            total_filler_words: total_count,
            filler_words: detected,
            filler_word_rate: round2(filler_rate),
            feedback,
        }
    }

    /// Four-tier qualitative message keyed on fillers-per-minute
    fn generate_feedback(rate: f64, fillers: &[FillerWord]) -> String {
        let mut feedback = if rate < 2.0 {
            "Excellent! Your speech has minimal filler words, showing strong confidence \
             and preparation."
        } else if rate < 5.0 {
            "Good job! You maintain relatively clean speech with acceptable filler word usage."
        } else if rate < 10.0 {
            "Your filler word usage is moderate. Focus on pausing instead of using fillers."
        } else {
            "High filler word usage detected. Practice pausing and being comfortable with silence."
        }
        .to_string();

        if !fillers.is_empty() {
            let top_fillers = fillers
                .iter()
                .take(3)
                .map(|f| format!("'{}' ({}x)", f.word, f.count))
                .collect::<Vec<_>>()
                .join(", ");
            feedback.push_str(&format!(" Most common fillers: {}.", top_fillers));
        }

        feedback
    }
}

impl Default for FillerWordAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_and_ranks_fillers() {
        let analysis = FillerWordAnalyzer::new().analyze("um um like like like", 60.0);
        assert_eq!(analysis.total_filler_words, 5);
        assert_eq!(analysis.filler_word_rate, 5.0);
        assert_eq!(analysis.filler_words[0].word, "like");
        assert_eq!(analysis.filler_words[0].count, 3);
        assert_eq!(analysis.filler_words[1].word, "um");
        assert_eq!(analysis.filler_words[1].count, 2);
    }

    #[test]
    fn matching_is_case_insensitive() {
        let analysis = FillerWordAnalyzer::new().analyze("Um, yes. UM indeed. Actually!", 60.0);
        let um = analysis
            .filler_words
            .iter()
            .find(|f| f.word == "um")
            .unwrap();
        assert_eq!(um.count, 2);
        assert!(analysis.filler_words.iter().any(|f| f.word == "actually"));
    }

    #[test]
    fn respects_word_boundaries() {
        let analysis = FillerWordAnalyzer::new().analyze("I mislike hyperbole and solitude", 60.0);
        // "mislike" must not match "like", "solitude" must not match "so"
        assert_eq!(analysis.total_filler_words, 0);
        assert!(analysis.filler_words.is_empty());
    }

    #[test]
    fn matches_multi_word_phrases() {
        let analysis =
            FillerWordAnalyzer::new().analyze("you know it was you know difficult", 60.0);
        let phrase = analysis
            .filler_words
            .iter()
            .find(|f| f.word == "you know")
            .unwrap();
        assert_eq!(phrase.count, 2);
    }

    #[test]
    fn zero_count_entries_are_omitted() {
        let analysis = FillerWordAnalyzer::new().analyze("um", 60.0);
        assert_eq!(analysis.filler_words.len(), 1);
        assert_eq!(analysis.filler_words[0].word, "um");
    }

    #[test]
    fn equal_counts_tie_break_lexically() {
        let analysis = FillerWordAnalyzer::new().analyze("yeah basically yeah basically", 60.0);
        assert_eq!(analysis.filler_words[0].word, "basically");
        assert_eq!(analysis.filler_words[1].word, "yeah");
    }

    #[test]
    fn zero_duration_yields_zero_rate() {
        let analysis = FillerWordAnalyzer::new().analyze("um uh um", 0.0);
        assert_eq!(analysis.total_filler_words, 3);
        assert_eq!(analysis.filler_word_rate, 0.0);
    }

    #[test]
    fn feedback_tiers_and_top_fillers_clause() {
        let analyzer = FillerWordAnalyzer::new();

        let clean = analyzer.analyze("a fine speech with no hesitation", 60.0);
        assert!(clean.feedback.starts_with("Excellent!"));
        assert!(!clean.feedback.contains("Most common fillers"));

        let heavy = analyzer.analyze(&"um ".repeat(12), 60.0);
        assert!(heavy.feedback.starts_with("High filler word usage"));
        assert!(heavy.feedback.contains("Most common fillers: 'um' (12x)."));

        let moderate = analyzer.analyze("um uh like so well actually yeah", 60.0);
        assert!(moderate.feedback.contains("moderate"));
    }
}
