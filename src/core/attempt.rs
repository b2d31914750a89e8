// src/core/attempt.rs — One generate-and-evaluate cycle

use std::sync::Arc;
use std::time::{Duration, Instant};

use super::cost::calculate_cost;
use super::types::{AttemptCost, IterationDraft};
use crate::infra::errors::RalphError;
use crate::provider::{ContentGenerator, GenerateRequest, QualityEvaluator, TokenUsage};

/// Performs a single request/response cycle against the external generator
/// and evaluator, producing one scored iteration draft plus its resource
/// cost. Does not touch the ledger; the orchestrator appends.
pub struct AttemptRunner {
    generator: Arc<dyn ContentGenerator>,
    evaluator: Arc<dyn QualityEvaluator>,
    /// Per-call ceiling for each external request. A timeout here is a
    /// transport error, never budget exhaustion.
    request_timeout: Duration,
}

impl AttemptRunner {
    pub fn new(
        generator: Arc<dyn ContentGenerator>,
        evaluator: Arc<dyn QualityEvaluator>,
        request_timeout: Duration,
    ) -> Self {
        Self {
            generator,
            evaluator,
            request_timeout,
        }
    }

    /// Run one cycle. Either both external calls succeed and a complete,
    /// scored draft comes back, or the whole attempt fails — a failed call is
    /// never converted into a low score.
    pub async fn attempt(
        &self,
        request: GenerateRequest<'_>,
    ) -> Result<IterationDraft, RalphError> {
        let started = Instant::now();
        let mut usage = TokenUsage::default();
        let mut cost_usd = 0.0;

        let draft = tokio::time::timeout(self.request_timeout, self.generator.generate(request))
            .await
            .map_err(|_| {
                RalphError::generation(
                    "generate",
                    format!("request timed out after {:?}", self.request_timeout),
                )
            })??;
        usage.add(&draft.usage);
        cost_usd += calculate_cost(self.generator.model_id(), &draft.usage);

        let evaluation =
            tokio::time::timeout(self.request_timeout, self.evaluator.evaluate(&draft.post))
                .await
                .map_err(|_| {
                    RalphError::generation(
                        "evaluate",
                        format!("request timed out after {:?}", self.request_timeout),
                    )
                })??;
        usage.add(&evaluation.usage);
        cost_usd += calculate_cost(self.evaluator.model_id(), &evaluation.usage);

        Ok(IterationDraft {
            post: draft.post,
            score: evaluation.critique.score,
            critique: evaluation.critique,
            cost: AttemptCost {
                usage,
                cost_usd,
                duration: started.elapsed(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{Critique, Evaluation, GeneratedDraft, GeneratedPost};
    use async_trait::async_trait;

    struct FixedGenerator;

    #[async_trait]
    impl ContentGenerator for FixedGenerator {
        fn model_id(&self) -> &str {
            "claude-sonnet-4-5"
        }

        async fn generate(
            &self,
            _request: GenerateRequest<'_>,
        ) -> Result<GeneratedDraft, RalphError> {
            Ok(GeneratedDraft {
                post: GeneratedPost {
                    title: "Shop Talk".into(),
                    excerpt: "excerpt".into(),
                    body_markdown: "## Heading\nbody".into(),
                    tags: vec![],
                },
                usage: TokenUsage {
                    input_tokens: 1_000,
                    output_tokens: 500,
                },
            })
        }
    }

    struct FixedEvaluator {
        score: f32,
    }

    #[async_trait]
    impl QualityEvaluator for FixedEvaluator {
        fn model_id(&self) -> &str {
            "claude-haiku-3-5"
        }

        async fn evaluate(&self, _post: &GeneratedPost) -> Result<Evaluation, RalphError> {
            Ok(Evaluation {
                critique: Critique {
                    score: self.score,
                    ai_slop_detected: false,
                    main_issues: vec![],
                    improvements: vec![],
                    strengths: vec![],
                },
                usage: TokenUsage {
                    input_tokens: 400,
                    output_tokens: 100,
                },
            })
        }
    }

    struct FailingGenerator;

    #[async_trait]
    impl ContentGenerator for FailingGenerator {
        fn model_id(&self) -> &str {
            "claude-sonnet-4-5"
        }

        async fn generate(
            &self,
            _request: GenerateRequest<'_>,
        ) -> Result<GeneratedDraft, RalphError> {
            Err(RalphError::generation("generate", "502 from upstream"))
        }
    }

    struct StalledEvaluator;

    #[async_trait]
    impl QualityEvaluator for StalledEvaluator {
        fn model_id(&self) -> &str {
            "claude-haiku-3-5"
        }

        async fn evaluate(&self, _post: &GeneratedPost) -> Result<Evaluation, RalphError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            unreachable!()
        }
    }

    fn seed() -> crate::sources::SeedMaterial {
        crate::sources::SeedMaterial {
            items: vec![crate::sources::SourceItem {
                id: "i1".into(),
                title: "Item".into(),
                url: "https://example.com".into(),
                summary: "summary".into(),
            }],
        }
    }

    #[tokio::test]
    async fn test_attempt_combines_usage_and_cost() {
        let runner = AttemptRunner::new(
            Arc::new(FixedGenerator),
            Arc::new(FixedEvaluator { score: 0.8 }),
            Duration::from_secs(5),
        );
        let material = seed();
        let draft = runner
            .attempt(GenerateRequest::Seed(&material))
            .await
            .unwrap();

        assert!((draft.score - 0.8).abs() < f32::EPSILON);
        assert_eq!(draft.cost.usage.input_tokens, 1_400);
        assert_eq!(draft.cost.usage.output_tokens, 600);
        // Generator on sonnet pricing, evaluator on haiku pricing
        let expected = calculate_cost(
            "claude-sonnet-4-5",
            &TokenUsage {
                input_tokens: 1_000,
                output_tokens: 500,
            },
        ) + calculate_cost(
            "claude-haiku-3-5",
            &TokenUsage {
                input_tokens: 400,
                output_tokens: 100,
            },
        );
        assert!((draft.cost.cost_usd - expected).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_generator_error_aborts_attempt() {
        let runner = AttemptRunner::new(
            Arc::new(FailingGenerator),
            Arc::new(FixedEvaluator { score: 0.8 }),
            Duration::from_secs(5),
        );
        let material = seed();
        let err = runner
            .attempt(GenerateRequest::Seed(&material))
            .await
            .unwrap_err();
        assert!(err.is_generation());
    }

    #[tokio::test(start_paused = true)]
    async fn test_evaluator_timeout_is_generation_error() {
        let runner = AttemptRunner::new(
            Arc::new(FixedGenerator),
            Arc::new(StalledEvaluator),
            Duration::from_millis(50),
        );
        let material = seed();
        let err = runner
            .attempt(GenerateRequest::Seed(&material))
            .await
            .unwrap_err();
        assert!(err.is_generation());
        assert!(err.to_string().contains("timed out"));
    }
}
