// src/core/gate.rs — Quality gate decision table

use super::types::Verdict;
use crate::infra::errors::RalphError;

/// Pure decision function mapping a score plus budget flags to a verdict.
/// No state beyond the validated thresholds, no I/O.
///
/// | score ≥ publish | score ≥ floor | budget exceeded | verdict   |
/// |-----------------|---------------|-----------------|-----------|
/// | yes             | —             | —               | Publish   |
/// | no              | yes           | no              | Continue  |
/// | no              | yes           | yes             | SaveDraft |
/// | no              | no            | no              | Continue  |
/// | no              | no            | yes             | Fail      |
#[derive(Debug, Clone, Copy)]
pub struct QualityGate {
    publish_threshold: f32,
    quality_floor: f32,
}

impl QualityGate {
    /// Thresholds are validated once here; `publish_threshold > quality_floor`
    /// is required, both within [0, 1].
    pub fn new(publish_threshold: f32, quality_floor: f32) -> Result<Self, RalphError> {
        if !(0.0..=1.0).contains(&publish_threshold) || !(0.0..=1.0).contains(&quality_floor) {
            return Err(RalphError::Config(
                "gate thresholds must be within [0.0, 1.0]".into(),
            ));
        }
        if publish_threshold <= quality_floor {
            return Err(RalphError::Config(format!(
                "publish_threshold ({publish_threshold}) must be greater than quality_floor ({quality_floor})"
            )));
        }
        Ok(Self {
            publish_threshold,
            quality_floor,
        })
    }

    pub fn publish_threshold(&self) -> f32 {
        self.publish_threshold
    }

    pub fn quality_floor(&self) -> f32 {
        self.quality_floor
    }

    /// Verdict for a completed, scored iteration.
    pub fn decide(&self, score: f32, budget_exceeded: bool) -> Verdict {
        if score >= self.publish_threshold {
            return Verdict::Publish;
        }
        if !budget_exceeded {
            return Verdict::Continue;
        }
        if score >= self.quality_floor {
            Verdict::SaveDraft
        } else {
            Verdict::Fail
        }
    }

    /// Verdict when no new score exists (the attempt itself failed). The run
    /// must terminate: a prior iteration at or above the floor becomes a
    /// draft, otherwise the run fails.
    pub fn decide_unscored(&self, best_prior_score: Option<f32>) -> Verdict {
        match best_prior_score {
            Some(score) if score >= self.quality_floor => Verdict::SaveDraft,
            _ => Verdict::Fail,
        }
    }
}
