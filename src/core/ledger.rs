// src/core/ledger.rs — Append-only iteration record

use chrono::Utc;

use super::types::{Iteration, IterationDraft};
use crate::infra::errors::RalphError;

/// Append-only record of a run's iterations, including rejected ones. The
/// ledger is the only writer of sequence numbers; once the run reaches a
/// terminal state it is sealed and refuses further appends.
#[derive(Debug)]
pub struct IterationLedger {
    run_id: String,
    iterations: Vec<Iteration>,
    sealed: bool,
}

impl IterationLedger {
    pub fn new(run_id: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            iterations: Vec::new(),
            sealed: false,
        }
    }

    /// Assign the next sequence number (gapless, from 1) and store the
    /// iteration. Fails once the ledger is sealed.
    pub fn append(&mut self, draft: IterationDraft) -> Result<&Iteration, RalphError> {
        if self.sealed {
            return Err(RalphError::LedgerSealed {
                run_id: self.run_id.clone(),
            });
        }
        let seq = self.iterations.len() as u32 + 1;
        self.iterations.push(Iteration {
            seq,
            post: draft.post,
            score: draft.score,
            critique: draft.critique,
            cost: draft.cost,
            created_at: Utc::now(),
        });
        Ok(self.iterations.last().expect("just pushed"))
    }

    /// Refuse all further appends. Called once the run's terminal status is set.
    pub fn seal(&mut self) {
        self.sealed = true;
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    pub fn len(&self) -> u32 {
        self.iterations.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.iterations.is_empty()
    }

    /// Most recently appended iteration.
    pub fn latest(&self) -> Option<&Iteration> {
        self.iterations.last()
    }

    /// Highest-scoring iteration; ties broken by earliest sequence number
    /// (prefer the attempt that reached the score first).
    pub fn best(&self) -> Option<&Iteration> {
        let mut best: Option<&Iteration> = None;
        for it in &self.iterations {
            match best {
                Some(b) if it.score <= b.score => {}
                _ => best = Some(it),
            }
        }
        best
    }

    /// Full history in sequence order.
    pub fn all(&self) -> &[Iteration] {
        &self.iterations
    }
}
