// src/provider/anthropic.rs — Anthropic Messages API client

use std::env;

use async_trait::async_trait;

use super::{
    parser, prompts, ContentGenerator, Evaluation, GenerateRequest, GeneratedDraft, GeneratedPost,
    QualityEvaluator, TokenUsage,
};
use crate::infra::errors::RalphError;
use crate::quality::detect_slop;

const API_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";

/// Shared HTTP client for the Messages API. Per-call timeouts belong to the
/// caller; this client only maps transport and protocol failures.
#[derive(Clone)]
pub struct AnthropicClient {
    api_key: String,
    client: reqwest::Client,
}

impl AnthropicClient {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            client: reqwest::Client::new(),
        }
    }

    /// Reads the API key from `ANTHROPIC_API_KEY`.
    pub fn from_env() -> Result<Self, RalphError> {
        let api_key = env::var("ANTHROPIC_API_KEY")
            .map_err(|_| RalphError::Config("ANTHROPIC_API_KEY is not set".into()))?;
        if api_key.trim().is_empty() {
            return Err(RalphError::Config("ANTHROPIC_API_KEY is empty".into()));
        }
        Ok(Self::new(api_key))
    }

    /// One user-turn completion. Returns the concatenated text blocks and the
    /// reported token usage. `phase` tags errors as generate or evaluate.
    async fn complete(
        &self,
        phase: &'static str,
        model: &str,
        prompt: String,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<(String, TokenUsage), RalphError> {
        let body = serde_json::json!({
            "model": model,
            "max_tokens": max_tokens,
            "temperature": temperature,
            "messages": [{ "role": "user", "content": prompt }],
        });

        let response = self
            .client
            .post(API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| RalphError::generation(phase, format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(RalphError::generation(
                phase,
                format!("HTTP {status}: {error_body}"),
            ));
        }

        let resp: serde_json::Value = response
            .json()
            .await
            .map_err(|e| RalphError::generation(phase, format!("failed to parse response: {e}")))?;

        let content = resp["content"]
            .as_array()
            .map(|blocks| {
                blocks
                    .iter()
                    .filter(|c| c["type"] == "text")
                    .map(|c| c["text"].as_str().unwrap_or(""))
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if content.is_empty() {
            return Err(RalphError::generation(phase, "response had no text content"));
        }

        let usage = TokenUsage {
            input_tokens: resp["usage"]["input_tokens"].as_u64().unwrap_or(0) as u32,
            output_tokens: resp["usage"]["output_tokens"].as_u64().unwrap_or(0) as u32,
        };

        Ok((content, usage))
    }
}

/// Drafts and revises posts through the Messages API.
pub struct AnthropicGenerator {
    client: AnthropicClient,
    model: String,
}

impl AnthropicGenerator {
    pub fn new(client: AnthropicClient, model: String) -> Self {
        Self { client, model }
    }
}

#[async_trait]
impl ContentGenerator for AnthropicGenerator {
    fn model_id(&self) -> &str {
        &self.model
    }

    async fn generate(&self, request: GenerateRequest<'_>) -> Result<GeneratedDraft, RalphError> {
        let prompt = match &request {
            GenerateRequest::Seed(seed) => prompts::seed_prompt(seed),
            GenerateRequest::Revision { post, critique } => {
                prompts::revision_prompt(post, critique)
            }
        };

        let (text, usage) = self
            .client
            .complete("generate", &self.model, prompt, 8192, 0.7)
            .await?;
        let post = parser::parse_post_response(&text)?;

        Ok(GeneratedDraft { post, usage })
    }
}

/// Scores posts through the Messages API and cross-checks the verdict with
/// the local slop scan.
pub struct AnthropicEvaluator {
    client: AnthropicClient,
    model: String,
}

impl AnthropicEvaluator {
    pub fn new(client: AnthropicClient, model: String) -> Self {
        Self { client, model }
    }
}

#[async_trait]
impl QualityEvaluator for AnthropicEvaluator {
    fn model_id(&self) -> &str {
        &self.model
    }

    async fn evaluate(&self, post: &GeneratedPost) -> Result<Evaluation, RalphError> {
        let prompt = prompts::critique_prompt(post);
        let (text, usage) = self
            .client
            .complete("evaluate", &self.model, prompt, 2000, 0.1)
            .await?;
        let mut critique = parser::parse_critique_response(&text)?;

        // The model can miss its own tells. Fold local scan hits into the
        // issues so the next revision sees them.
        let hits = detect_slop(&post.body_markdown);
        if !hits.is_empty() {
            critique.ai_slop_detected = true;
            critique
                .main_issues
                .push(format!("AI slop phrases found: {}", hits.join(", ")));
        }

        Ok(Evaluation { critique, usage })
    }
}
