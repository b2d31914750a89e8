// src/core/orchestrator.rs — Run state machine
//
// SEEDING → ITERATING → {PUBLISHING | DRAFTING | FAILING} → DONE
//
// One orchestrator instance drives exactly one run. The budget tracker and
// ledger are created per run and never shared, so the loop needs no locking.

use std::sync::{Arc, Mutex};

use super::attempt::AttemptRunner;
use super::budget::BudgetTracker;
use super::gate::QualityGate;
use super::ledger::IterationLedger;
use super::types::{EngineSettings, Run, RunOutcome, RunStatus, TerminalReason, Verdict};
use crate::infra::errors::RalphError;
use crate::notify::{NotificationPort, RunNotification};
use crate::provider::{ContentGenerator, GenerateRequest, QualityEvaluator};
use crate::sources::SeedSource;
use crate::store::Store;

pub struct RunOrchestrator {
    attempts: AttemptRunner,
    gate: QualityGate,
    settings: EngineSettings,
    seed_source: Arc<dyn SeedSource>,
    notifier: Arc<dyn NotificationPort>,
    /// Optional persistence; failures mid-run are logged, never fatal.
    store: Option<Arc<Mutex<Store>>>,
}

impl RunOrchestrator {
    pub fn new(
        generator: Arc<dyn ContentGenerator>,
        evaluator: Arc<dyn QualityEvaluator>,
        settings: EngineSettings,
        seed_source: Arc<dyn SeedSource>,
        notifier: Arc<dyn NotificationPort>,
        store: Option<Arc<Mutex<Store>>>,
    ) -> Result<Self, RalphError> {
        let gate = QualityGate::new(settings.publish_threshold, settings.quality_floor)?;
        Ok(Self {
            attempts: AttemptRunner::new(generator, evaluator, settings.request_timeout),
            gate,
            settings,
            seed_source,
            notifier,
            store,
        })
    }

    /// Execute one run to completion for the given target slot.
    ///
    /// Everything that can go wrong mid-loop (generation errors, budget
    /// exhaustion) is converted into a terminal state here; only startup-class
    /// errors propagate as `Err`.
    pub async fn run(&self, slot: &str) -> Result<RunOutcome, RalphError> {
        let mut run = Run::new(slot, &self.settings);
        tracing::info!(run_id = %run.id, slot, "run started");

        // SEEDING: duplicate check first, so re-invocation stays safe.
        if self.slot_taken(slot)? {
            tracing::info!(slot, "run already exists for slot, skipping");
            self.persist_run(&run);
            let run_id = run.id.clone();
            return Ok(self.finish(
                &mut run,
                RunStatus::Failed,
                TerminalReason::Duplicate,
                &IterationLedger::new(run_id),
                &BudgetTracker::new(self.settings.time_budget, self.settings.cost_budget_usd),
            ));
        }

        self.persist_run(&run);

        let material = match self.seed_source.select() {
            Ok(material) => material,
            Err(RalphError::NoSeedMaterial(msg)) => {
                tracing::warn!(slot, %msg, "no seed material, failing run");
                let run_id = run.id.clone();
                return Ok(self.finish(
                    &mut run,
                    RunStatus::Failed,
                    TerminalReason::NoSeedMaterial(msg),
                    &IterationLedger::new(run_id),
                    &BudgetTracker::new(self.settings.time_budget, self.settings.cost_budget_usd),
                ));
            }
            Err(e) => return Err(e),
        };

        // ITERATING: the budget clock starts once, here.
        let mut tracker =
            BudgetTracker::new(self.settings.time_budget, self.settings.cost_budget_usd);
        tracker.start();
        let mut ledger = IterationLedger::new(run.id.clone());
        let mut attempt_error: Option<String> = None;

        let verdict = loop {
            // Each attempt is seeded with the prior content and critique;
            // attempt 1 gets the source material.
            let followup = ledger
                .latest()
                .map(|it| (it.post.clone(), it.critique.clone()));
            let request = match &followup {
                None => GenerateRequest::Seed(&material),
                Some((post, critique)) => GenerateRequest::Revision { post, critique },
            };

            match self.attempts.attempt(request).await {
                Ok(draft) => {
                    tracker.add_cost(draft.cost.cost_usd);
                    let (seq, score) = {
                        let iteration = ledger.append(draft)?;
                        self.persist_iteration(&run.id, iteration);
                        (iteration.seq, iteration.score)
                    };

                    if seq == 1 {
                        // Source items are consumed by the first draft.
                        if let Err(e) = self.seed_source.mark_used(&material, &run.id) {
                            tracing::warn!(error = %e, "failed to mark source items used");
                        }
                    }

                    // The iteration ceiling is a defensive backstop, treated
                    // identically to cost exhaustion at the gate.
                    let ceiling_hit = ledger.len() >= self.settings.max_iterations;
                    let exceeded = tracker.any_exceeded() || ceiling_hit;
                    let verdict = self.gate.decide(score, exceeded);

                    tracing::info!(
                        run_id = %run.id,
                        seq,
                        score,
                        cost_usd = tracker.spent(),
                        elapsed_secs = tracker.elapsed().as_secs(),
                        ?verdict,
                        "iteration complete"
                    );

                    if verdict != Verdict::Continue {
                        break verdict;
                    }
                }
                Err(e) if e.is_generation() => {
                    // A failed attempt produces no iteration and no score;
                    // the gate decides on budget flags and prior work alone.
                    tracing::error!(run_id = %run.id, error = %e, "attempt failed");
                    attempt_error = Some(e.to_string());
                    break self.gate.decide_unscored(ledger.best().map(|b| b.score));
                }
                Err(e) => return Err(e),
            }
        };

        let (status, reason) = match (verdict, attempt_error) {
            (Verdict::Publish, _) => (RunStatus::Published, TerminalReason::QualityMet),
            (Verdict::SaveDraft, Some(err)) => {
                (RunStatus::Draft, TerminalReason::GenerationFailed(err))
            }
            (Verdict::SaveDraft, None) => (RunStatus::Draft, TerminalReason::BudgetExhausted),
            (Verdict::Fail, Some(err)) => {
                (RunStatus::Failed, TerminalReason::GenerationFailed(err))
            }
            (Verdict::Fail, None) => (RunStatus::Failed, TerminalReason::BelowFloor),
            (Verdict::Continue, _) => unreachable!("loop only breaks on terminal verdicts"),
        };

        ledger.seal();
        Ok(self.finish(&mut run, status, reason, &ledger, &tracker))
    }

    /// Terminal action: set the run's status exactly once, commit the best
    /// iteration, notify for draft/failed, and report the outcome.
    fn finish(
        &self,
        run: &mut Run,
        status: RunStatus,
        reason: TerminalReason,
        ledger: &IterationLedger,
        tracker: &BudgetTracker,
    ) -> RunOutcome {
        debug_assert_eq!(run.status, RunStatus::Pending, "terminal status set twice");

        let best = ledger.best();
        run.status = status;
        run.terminal_iteration = best.map(|b| b.seq);

        let outcome = RunOutcome {
            run_id: run.id.clone(),
            slot: run.slot.clone(),
            status,
            reason: reason.clone(),
            final_score: best.map(|b| b.score),
            iterations: ledger.len(),
            total_cost_usd: tracker.spent(),
            elapsed: tracker.elapsed(),
        };

        self.persist_completion(run, &outcome);

        tracing::info!(
            run_id = %run.id,
            status = %status,
            reason = %outcome.reason,
            iterations = outcome.iterations,
            "run finished"
        );

        outcome
    }

    /// Notify for terminal states needing attention. Publishing is the
    /// success path and stays quiet.
    pub async fn notify_outcome(&self, outcome: &RunOutcome) {
        if outcome.status == RunStatus::Published {
            return;
        }
        let note = RunNotification {
            run_id: outcome.run_id.clone(),
            slot: outcome.slot.clone(),
            status: outcome.status,
            reason: outcome.reason.to_string(),
            final_score: outcome.final_score,
            iterations: outcome.iterations,
            total_cost_usd: outcome.total_cost_usd,
        };
        if let Err(e) = self.notifier.notify(&note).await {
            tracing::warn!(run_id = %outcome.run_id, error = %e, "notification failed");
        }
    }

    fn slot_taken(&self, slot: &str) -> Result<bool, RalphError> {
        let Some(ref store) = self.store else {
            return Ok(false);
        };
        let store = store
            .lock()
            .map_err(|_| RalphError::Other(anyhow::anyhow!("store lock poisoned")))?;
        Ok(store.slot_taken(slot)?)
    }

    fn persist_run(&self, run: &Run) {
        let Some(ref store) = self.store else { return };
        let Ok(s) = store.lock() else { return };
        if let Err(e) = s.insert_run(run) {
            tracing::warn!(run_id = %run.id, error = %e, "failed to persist run");
        }
    }

    fn persist_iteration(&self, run_id: &str, iteration: &super::types::Iteration) {
        let Some(ref store) = self.store else { return };
        let Ok(s) = store.lock() else { return };
        if let Err(e) = s.insert_iteration(run_id, iteration) {
            tracing::warn!(run_id, seq = iteration.seq, error = %e, "failed to persist iteration");
        }
    }

    fn persist_completion(&self, run: &Run, outcome: &RunOutcome) {
        let Some(ref store) = self.store else { return };
        let Ok(s) = store.lock() else { return };
        if let Err(e) = s.complete_run(
            &run.id,
            run.status,
            run.terminal_iteration,
            &outcome.reason.to_string(),
            outcome.final_score,
            outcome.total_cost_usd,
        ) {
            tracing::warn!(run_id = %run.id, error = %e, "failed to persist completion");
        }
    }
}
