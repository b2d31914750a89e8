// src/core/types.rs — Core domain types

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::infra::config::EngineConfig;
use crate::provider::{Critique, GeneratedPost, TokenUsage};

/// One invocation of the generation loop for one content target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Run {
    pub id: String,
    /// Target identity, e.g. the publication date. One run per slot.
    pub slot: String,
    pub publish_threshold: f32,
    pub quality_floor: f32,
    pub time_budget: Duration,
    pub cost_budget_usd: f64,
    pub status: RunStatus,
    /// Sequence number of the committed iteration, set with the terminal status.
    pub terminal_iteration: Option<u32>,
    pub created_at: DateTime<Utc>,
}

impl Run {
    pub fn new(slot: impl Into<String>, settings: &EngineSettings) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            slot: slot.into(),
            publish_threshold: settings.publish_threshold,
            quality_floor: settings.quality_floor,
            time_budget: settings.time_budget,
            cost_budget_usd: settings.cost_budget_usd,
            status: RunStatus::Pending,
            terminal_iteration: None,
            created_at: Utc::now(),
        }
    }
}

/// Terminal status of a run. Set exactly once, by the orchestrator, after a
/// gate verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Pending,
    Published,
    Draft,
    Failed,
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunStatus::Pending => write!(f, "pending"),
            RunStatus::Published => write!(f, "published"),
            RunStatus::Draft => write!(f, "draft"),
            RunStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Why a run ended the way it did, carried alongside the terminal status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminalReason {
    QualityMet,
    BudgetExhausted,
    BelowFloor,
    GenerationFailed(String),
    NoSeedMaterial(String),
    Duplicate,
}

impl std::fmt::Display for TerminalReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerminalReason::QualityMet => write!(f, "quality_met"),
            TerminalReason::BudgetExhausted => write!(f, "budget_exhausted"),
            TerminalReason::BelowFloor => write!(f, "below_floor"),
            TerminalReason::GenerationFailed(msg) => write!(f, "generation_failed: {msg}"),
            TerminalReason::NoSeedMaterial(msg) => write!(f, "no_seed_material: {msg}"),
            TerminalReason::Duplicate => write!(f, "duplicate"),
        }
    }
}

/// One generate-and-evaluate cycle within a run. Immutable once appended to
/// the ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Iteration {
    /// Strictly increasing, gapless, starting at 1. Assigned by the ledger.
    pub seq: u32,
    pub post: GeneratedPost,
    pub score: f32,
    pub critique: Critique,
    pub cost: AttemptCost,
    pub created_at: DateTime<Utc>,
}

/// An iteration produced by an attempt, before the ledger assigns its
/// sequence number.
#[derive(Debug, Clone)]
pub struct IterationDraft {
    pub post: GeneratedPost,
    pub score: f32,
    pub critique: Critique,
    pub cost: AttemptCost,
}

/// Resources one attempt consumed across both external calls.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct AttemptCost {
    pub usage: TokenUsage,
    pub cost_usd: f64,
    pub duration: Duration,
}

/// Gate decision for one iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Publish,
    Continue,
    SaveDraft,
    Fail,
}

/// Final result of one run, for the CLI summary and exit code.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub run_id: String,
    pub slot: String,
    pub status: RunStatus,
    pub reason: TerminalReason,
    pub final_score: Option<f32>,
    pub iterations: u32,
    pub total_cost_usd: f64,
    pub elapsed: Duration,
}

impl RunOutcome {
    /// Duplicate runs are an intentional skip, not a failure.
    pub fn is_skip(&self) -> bool {
        self.reason == TerminalReason::Duplicate
    }

    pub fn summary_line(&self) -> String {
        let score = self
            .final_score
            .map(|s| format!("{s:.2}"))
            .unwrap_or_else(|| "-".into());
        format!(
            "status={} score={} iterations={} cost_usd={:.4} reason={}",
            self.status, score, self.iterations, self.total_cost_usd, self.reason
        )
    }
}

/// Runtime settings for the loop, derived from validated configuration.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub publish_threshold: f32,
    pub quality_floor: f32,
    pub time_budget: Duration,
    pub cost_budget_usd: f64,
    pub max_iterations: u32,
    pub request_timeout: Duration,
}

impl From<&EngineConfig> for EngineSettings {
    fn from(cfg: &EngineConfig) -> Self {
        Self {
            publish_threshold: cfg.publish_threshold,
            quality_floor: cfg.quality_floor,
            time_budget: Duration::from_secs(cfg.time_budget_secs),
            cost_budget_usd: cfg.cost_budget_usd,
            max_iterations: cfg.max_iterations,
            request_timeout: Duration::from_secs(cfg.request_timeout_secs),
        }
    }
}
