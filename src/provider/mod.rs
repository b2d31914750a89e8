// src/provider/mod.rs — External generator and evaluator seams

pub mod anthropic;
pub mod parser;
pub mod prompts;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::infra::errors::RalphError;
use crate::sources::SeedMaterial;

/// Produces one content draft per call. The first attempt of a run is seeded
/// with source material; later attempts revise the prior draft using its
/// critique.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    /// Model identifier, used for cost attribution.
    fn model_id(&self) -> &str;

    async fn generate(&self, request: GenerateRequest<'_>) -> Result<GeneratedDraft, RalphError>;
}

/// Scores a draft in [0.0, 1.0] and returns structured feedback. The score is
/// the sole input to the quality gate; the critique is forwarded verbatim
/// into the next generation call.
#[async_trait]
pub trait QualityEvaluator: Send + Sync {
    /// Model identifier, used for cost attribution.
    fn model_id(&self) -> &str;

    async fn evaluate(&self, post: &GeneratedPost) -> Result<Evaluation, RalphError>;
}

#[derive(Debug)]
pub enum GenerateRequest<'a> {
    /// First attempt: draft from source items.
    Seed(&'a SeedMaterial),
    /// Later attempts: revise the prior draft using its critique.
    Revision {
        post: &'a GeneratedPost,
        critique: &'a Critique,
    },
}

impl GenerateRequest<'_> {
    pub fn is_seed(&self) -> bool {
        matches!(self, GenerateRequest::Seed(_))
    }
}

/// Structured content produced by the generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedPost {
    pub title: String,
    pub excerpt: String,
    pub body_markdown: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl GeneratedPost {
    /// URL slug derived from the title, used when committing content.
    pub fn slug(&self) -> String {
        slug::slugify(&self.title)
    }
}

#[derive(Debug, Clone)]
pub struct GeneratedDraft {
    pub post: GeneratedPost,
    pub usage: TokenUsage,
}

/// Evaluator verdict on one draft.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub critique: Critique,
    pub usage: TokenUsage,
}

/// Structured feedback from the evaluator. Opaque to the gate except for the
/// score; the rest is seeded back into the next generation call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Critique {
    /// Quality score in [0.0, 1.0].
    pub score: f32,
    #[serde(default)]
    pub ai_slop_detected: bool,
    #[serde(default)]
    pub main_issues: Vec<String>,
    #[serde(default)]
    pub improvements: Vec<String>,
    #[serde(default)]
    pub strengths: Vec<String>,
}

/// Resource usage reported by one external call.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl TokenUsage {
    pub fn total(&self) -> u32 {
        self.input_tokens + self.output_tokens
    }

    pub fn add(&mut self, other: &TokenUsage) {
        self.input_tokens += other.input_tokens;
        self.output_tokens += other.output_tokens;
    }
}
