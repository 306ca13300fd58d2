//! AI judgment capability
//!
//! Three hosted-model providers implement [`AiJudge`]. Prompt construction
//! and response parsing are shared: a provider only supplies its transport
//! (`complete`), everything else lives in the trait's default methods so all
//! providers produce identical structured judgments.
//!
//! Provider failures are recoverable at job level: the pipeline fails the
//! job with a message, never the process.

pub mod anthropic;
pub mod gemini;
pub mod openai;

pub use anthropic::AnthropicJudge;
pub use gemini::GeminiJudge;
pub use openai::OpenAiJudge;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::config::Settings;
use crate::models::speech::clamp_ten_point;
use crate::models::{
    AiProvider, ArgumentStructure, RepetitiveWord, ScoreNarrative, WeakWord, WordChoiceAnalysis,
};
use crate::services::score_aggregator::SubScores;

/// AI provider errors
#[derive(Debug, Error)]
pub enum AiError {
    /// No API key configured for the requested provider
    #[error("{0} API key is not configured")]
    MissingApiKey(AiProvider),

    /// Transport or upstream service failure
    #[error("AI provider error: {0}")]
    ProviderError(String),

    /// The model returned something that does not parse as the requested JSON
    #[error("Invalid response format from AI provider: {0}")]
    InvalidResponseFormat(String),
}

/// Polymorphic AI judgment capability
#[async_trait]
pub trait AiJudge: Send + Sync + std::fmt::Debug {
    /// Which provider this judge talks to
    fn provider(&self) -> AiProvider;

    /// Send one prompt to the model and return its raw text completion
    async fn complete(&self, prompt: &str) -> Result<String, AiError>;

    /// Judge the argument structure of a transcript
    async fn analyze_structure(&self, transcription: &str) -> Result<ArgumentStructure, AiError> {
        let prompt = structure_prompt(transcription);
        let response = self.complete(&prompt).await?;
        parse_structure(&response)
    }

    /// Judge word choice and vocabulary of a transcript
    async fn analyze_word_choice(
        &self,
        transcription: &str,
    ) -> Result<WordChoiceAnalysis, AiError> {
        let prompt = word_choice_prompt(transcription);
        let response = self.complete(&prompt).await?;
        parse_word_choice(&response)
    }

    /// Produce the qualitative narrative for an already-computed score
    async fn explain_score(
        &self,
        transcription: &str,
        subscores: &SubScores,
        filler_word_rate: f64,
        structure: &ArgumentStructure,
        vocabulary: &WordChoiceAnalysis,
    ) -> Result<ScoreNarrative, AiError> {
        let prompt = narrative_prompt(
            transcription,
            subscores,
            filler_word_rate,
            structure,
            vocabulary,
        );
        let response = self.complete(&prompt).await?;
        parse_narrative(&response)
    }
}

/// Build a judge for the given provider
///
/// Fails fast with [`AiError::MissingApiKey`] so a misconfigured provider is
/// reported to the caller before any job state changes.
pub fn create_judge(
    provider: AiProvider,
    settings: &Settings,
) -> Result<Box<dyn AiJudge>, AiError> {
    let api_key = settings
        .api_key_for(provider)
        .ok_or(AiError::MissingApiKey(provider))?
        .to_string();
    let model = settings.model_for(provider).to_string();

    Ok(match provider {
        AiProvider::Gemini => Box::new(GeminiJudge::new(api_key, model)?),
        AiProvider::OpenAi => Box::new(OpenAiJudge::new(api_key, model)?),
        AiProvider::Anthropic => Box::new(AnthropicJudge::new(api_key, model)?),
    })
}

// ---------------------------------------------------------------------------
// Prompts
// ---------------------------------------------------------------------------

fn structure_prompt(transcription: &str) -> String {
    format!(
        "Analyze the following speech for its argument structure. Evaluate:\n\
         1. Does it have a clear thesis or main argument?\n\
         2. Are there supporting points that back up the thesis?\n\
         3. Is there a conclusion that ties things together?\n\
         4. Rate the logical flow from 1-10\n\
         5. Provide constructive feedback and specific suggestions\n\n\
         Speech:\n{transcription}\n\n\
         Respond in JSON format with keys: has_clear_thesis (boolean), \
         has_supporting_points (boolean), has_conclusion (boolean), \
         logical_flow_score (1-10), feedback (string), suggestions (list of strings)."
    )
}

fn word_choice_prompt(transcription: &str) -> String {
    format!(
        "Analyze the following speech for word choice and vocabulary. Identify:\n\
         1. Weak or vague words that could be replaced with stronger alternatives (max 5)\n\
         2. Repetitive words that are overused (max 5)\n\
         3. Rate vocabulary richness from 1-10\n\
         4. Provide feedback on overall word choice\n\n\
         Speech:\n{transcription}\n\n\
         Respond in JSON format with keys: weak_words (list of {{\"word\": \"x\", \
         \"suggestion\": \"y\"}}), repetitive_words (list of {{\"word\": \"x\", \
         \"count\": n}}), vocabulary_richness_score (1-10), feedback (string)."
    )
}

fn narrative_prompt(
    transcription: &str,
    subscores: &SubScores,
    filler_word_rate: f64,
    structure: &ArgumentStructure,
    vocabulary: &WordChoiceAnalysis,
) -> String {
    let excerpt: String = transcription.chars().take(500).collect();
    format!(
        "You are scoring a speech. Here are the component scores:\n\n\
         Pace Score: {}/25\n\
         Clarity Score: {}/25 (Filler word rate: {} per minute)\n\
         Structure Score: {}/25 (Logical flow: {}/10)\n\
         Vocabulary Score: {}/25 (Richness: {}/10)\n\n\
         Total Score: {}/100\n\n\
         Speech excerpt: {excerpt}...\n\n\
         Provide:\n\
         1. A detailed explanation of why this score was given (2-3 sentences)\n\
         2. A list of 3-5 specific strengths\n\
         3. A list of 3-5 specific areas for improvement\n\n\
         Respond in JSON format with keys: explanation (string), strengths (list of \
         strings), areas_for_improvement (list of strings).",
        subscores.pace,
        subscores.clarity,
        filler_word_rate,
        subscores.structure,
        structure.logical_flow_score,
        subscores.vocabulary,
        vocabulary.vocabulary_richness_score,
        subscores.total(),
    )
}

// ---------------------------------------------------------------------------
// Response parsing
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct StructureResponse {
    #[serde(default)]
    has_clear_thesis: bool,
    #[serde(default)]
    has_supporting_points: bool,
    #[serde(default)]
    has_conclusion: bool,
    #[serde(default = "default_midpoint")]
    logical_flow_score: i64,
    #[serde(default)]
    feedback: String,
    #[serde(default)]
    suggestions: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct WordChoiceResponse {
    #[serde(default)]
    weak_words: Vec<WeakWord>,
    #[serde(default)]
    repetitive_words: Vec<RepetitiveWord>,
    #[serde(default = "default_midpoint")]
    vocabulary_richness_score: i64,
    #[serde(default)]
    feedback: String,
}

#[derive(Debug, Deserialize)]
struct NarrativeResponse {
    #[serde(default)]
    explanation: String,
    #[serde(default)]
    strengths: Vec<String>,
    #[serde(default)]
    areas_for_improvement: Vec<String>,
}

fn default_midpoint() -> i64 {
    5
}

/// Strip markdown code fences models like to wrap JSON in
fn strip_code_fences(text: &str) -> &str {
    let mut text = text.trim();
    if let Some(rest) = text.strip_prefix("```json") {
        text = rest;
    } else if let Some(rest) = text.strip_prefix("```") {
        text = rest;
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }
    text.trim()
}

fn parse_json<T: serde::de::DeserializeOwned>(text: &str) -> Result<T, AiError> {
    serde_json::from_str(strip_code_fences(text))
        .map_err(|e| AiError::InvalidResponseFormat(e.to_string()))
}

fn parse_structure(text: &str) -> Result<ArgumentStructure, AiError> {
    let parsed: StructureResponse = parse_json(text)?;
    Ok(ArgumentStructure {
        has_clear_thesis: parsed.has_clear_thesis,
        has_supporting_points: parsed.has_supporting_points,
        has_conclusion: parsed.has_conclusion,
        logical_flow_score: clamp_ten_point(parsed.logical_flow_score),
        feedback: parsed.feedback,
        suggestions: parsed.suggestions,
    })
}

fn parse_word_choice(text: &str) -> Result<WordChoiceAnalysis, AiError> {
    let parsed: WordChoiceResponse = parse_json(text)?;
    Ok(WordChoiceAnalysis {
        weak_words: parsed.weak_words,
        repetitive_words: parsed.repetitive_words,
        vocabulary_richness_score: clamp_ten_point(parsed.vocabulary_richness_score),
        feedback: parsed.feedback,
    })
}

fn parse_narrative(text: &str) -> Result<ScoreNarrative, AiError> {
    let parsed: NarrativeResponse = parse_json(text)?;
    Ok(ScoreNarrative {
        explanation: parsed.explanation,
        strengths: parsed.strengths,
        areas_for_improvement: parsed.areas_for_improvement,
    })
}
