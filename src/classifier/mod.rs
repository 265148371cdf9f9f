use std::fmt;

use anyhow::{anyhow, Result};
use log::{error, info, warn};
use serde::Serialize;

use crate::helper::{
    Label, COMMENT_TAGGER_RUBRIC, EMPTY_SENTINEL, MARKET_EXPERT_RUBRIC, NEUTRAL_SENTINEL,
};
use crate::llm::gemini::types::{GenerateContentRequest, GenerateContentResponse};
use crate::llm::{GenerativeModel, ProviderError, Reply};

/// Rubric + fallback sentinel pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Profile {
    pub name: String,
    pub rubric: String,
    pub fallback_sentinel: String,
}

impl Profile {
    pub fn new(name: &str, rubric: &str, fallback_sentinel: &str) -> Self {
        Self {
            name: name.to_string(),
            rubric: rubric.to_string(),
            fallback_sentinel: fallback_sentinel.to_string(),
        }
    }

    /// Short rubric, falls back to a neutral `NEU`.
    pub fn comment_tagger() -> Self {
        Self::new("comment-tagger", COMMENT_TAGGER_RUBRIC, NEUTRAL_SENTINEL)
    }

    /// Price-aware rubric, falls back to an explicit `EMPTY`.
    pub fn market_expert() -> Self {
        Self::new("market-expert", MARKET_EXPERT_RUBRIC, EMPTY_SENTINEL)
    }

    pub fn from_name(name: &str) -> Result<Self> {
        match name.trim().to_lowercase().as_str() {
            "comment-tagger" | "tagger" => Ok(Self::comment_tagger()),
            "market-expert" | "expert" => Ok(Self::market_expert()),
            other => Err(anyhow!(
                "Unknown SENTIMENT_PROFILE '{}'. Use comment-tagger or market-expert",
                other
            )),
        }
    }
}

/// Why the label path could not be read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DegradedReason {
    UnparseableBody,
    PromptBlocked { reason: String },
    NoCandidates,
    MissingContent { finish_reason: Option<String> },
    NoParts,
    MissingText,
    EmptyText,
}

impl fmt::Display for DegradedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DegradedReason::UnparseableBody => write!(f, "response body was not JSON"),
            DegradedReason::PromptBlocked { reason } => write!(f, "prompt blocked: {}", reason),
            DegradedReason::NoCandidates => write!(f, "no candidates"),
            DegradedReason::MissingContent {
                finish_reason: Some(finish),
            } => write!(f, "candidate has no content (finish reason {})", finish),
            DegradedReason::MissingContent {
                finish_reason: None,
            } => write!(f, "candidate has no content"),
            DegradedReason::NoParts => write!(f, "content has no parts"),
            DegradedReason::MissingText => write!(f, "first part has no text"),
            DegradedReason::EmptyText => write!(f, "model returned empty text"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// The model answered; the text is passed through untouched.
    Labelled { text: String },
    /// The answer path was absent, the profile fallback stands in.
    Degraded {
        reason: DegradedReason,
        fallback: String,
    },
}

impl Classification {
    /// Always a string: the model text or the fallback sentinel.
    pub fn output(&self) -> &str {
        match self {
            Classification::Labelled { text } => text,
            Classification::Degraded { fallback, .. } => fallback,
        }
    }

    pub fn label(&self) -> Option<Label> {
        match self {
            Classification::Labelled { text } => Label::parse(text),
            Classification::Degraded { .. } => None,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Classification::Degraded { .. })
    }

    pub fn reason(&self) -> Option<&DegradedReason> {
        match self {
            Classification::Labelled { .. } => None,
            Classification::Degraded { reason, .. } => Some(reason),
        }
    }
}

/// Walk `candidates[0].content.parts[0].text`, naming the first missing segment.
pub fn extract_label_text(response: &GenerateContentResponse) -> Result<String, DegradedReason> {
    let candidate = match response.candidates.as_ref().and_then(|c| c.first()) {
        Some(candidate) => candidate,
        None => {
            return Err(
                match response
                    .prompt_feedback
                    .as_ref()
                    .and_then(|f| f.block_reason.clone())
                {
                    Some(reason) => DegradedReason::PromptBlocked { reason },
                    None => DegradedReason::NoCandidates,
                },
            );
        }
    };

    let content = candidate
        .content
        .as_ref()
        .ok_or_else(|| DegradedReason::MissingContent {
            finish_reason: candidate.finish_reason.clone(),
        })?;

    let part = content
        .parts
        .as_ref()
        .and_then(|parts| parts.first())
        .ok_or(DegradedReason::NoParts)?;

    let text = part.text.as_ref().ok_or(DegradedReason::MissingText)?;

    if text.is_empty() {
        return Err(DegradedReason::EmptyText);
    }

    Ok(text.clone())
}

pub struct SentimentClassifier<M: GenerativeModel> {
    model: M,
    profile: Profile,
    thinking_budget: u32,
}

impl<M: GenerativeModel> SentimentClassifier<M> {
    pub fn new(model: M, profile: Profile, thinking_budget: u32) -> Self {
        Self {
            model,
            profile,
            thinking_budget,
        }
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn model_id(&self) -> &str {
        self.model.model_id()
    }

    pub fn build_request(&self, input_text: &str) -> GenerateContentRequest {
        GenerateContentRequest::new(&self.profile.rubric, input_text, self.thinking_budget)
    }

    /// One provider call. Provider failures are returned as errors, a
    /// missing answer path degrades to the profile fallback.
    pub async fn classify(&self, input_text: &str) -> Result<Classification, ProviderError> {
        let request = self.build_request(input_text);

        let reply = match self.model.generate_content(&request).await {
            Ok(reply) => reply,
            Err(e) => {
                error!("[{}] {}", self.profile.name, e);
                return Err(e);
            }
        };

        let extracted = match reply {
            Reply::Parsed(response) => extract_label_text(&response),
            Reply::Unparseable => Err(DegradedReason::UnparseableBody),
        };

        let classification = match extracted {
            Ok(text) => {
                info!("[{}] classified as {}", self.profile.name, text.trim());
                Classification::Labelled { text }
            }
            Err(reason) => {
                warn!(
                    "[{}] falling back to {}: {}",
                    self.profile.name, self.profile.fallback_sentinel, reason
                );
                Classification::Degraded {
                    reason,
                    fallback: self.profile.fallback_sentinel.clone(),
                }
            }
        };

        Ok(classification)
    }

    /// Label string as the host sees it, before encoding.
    pub async fn classify_output(&self, input_text: &str) -> Result<String> {
        let classification = self.classify(input_text).await?;
        Ok(classification.output().to_string())
    }
}
