// src/core/budget.rs — Time and cost budget tracking

use std::time::{Duration, Instant};

/// Tracks elapsed wall-clock time and accumulated USD cost for one run
/// against two configured ceilings. Owned exclusively by that run; reset by
/// constructing a new tracker.
#[derive(Debug, Clone)]
pub struct BudgetTracker {
    time_budget: Duration,
    cost_budget_usd: f64,
    started_at: Option<Instant>,
    spent_usd: f64,
}

impl BudgetTracker {
    pub fn new(time_budget: Duration, cost_budget_usd: f64) -> Self {
        Self {
            time_budget,
            cost_budget_usd,
            started_at: None,
            spent_usd: 0.0,
        }
    }

    /// Record the run's wall-clock origin. Must be called exactly once before
    /// any budget query; calling it again resets the origin (a caller error,
    /// not guarded here).
    pub fn start(&mut self) {
        self.started_at = Some(Instant::now());
    }

    /// Accumulate a non-negative cost. Negative amounts are a caller error.
    pub fn add_cost(&mut self, amount_usd: f64) {
        assert!(amount_usd >= 0.0, "cost must be non-negative");
        self.spent_usd += amount_usd;
    }

    /// Elapsed wall-clock time since `start()`. Zero before `start()`.
    pub fn elapsed(&self) -> Duration {
        self.started_at.map(|t| t.elapsed()).unwrap_or(Duration::ZERO)
    }

    /// Accumulated cost so far, in USD.
    pub fn spent(&self) -> f64 {
        self.spent_usd
    }

    pub fn time_exceeded(&self) -> bool {
        self.elapsed() >= self.time_budget
    }

    pub fn cost_exceeded(&self) -> bool {
        self.spent_usd >= self.cost_budget_usd
    }

    pub fn any_exceeded(&self) -> bool {
        self.time_exceeded() || self.cost_exceeded()
    }
}
