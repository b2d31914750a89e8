// src/infra/errors.rs — Error types for Ralph

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RalphError {
    // Fatal at startup, never retried
    #[error("Configuration error: {0}")]
    Config(String),

    // Generator or evaluator unreachable, malformed response, or per-call
    // timeout. Aborts the current attempt; never converted to a low score.
    #[error("Generation call failed in {phase}: {message}")]
    Generation { phase: String, message: String },

    // A run already exists for the target slot. Intentional skip, not a
    // failure — the CLI maps this to a distinct exit status.
    #[error("Run already exists for slot '{slot}'")]
    DuplicateRun { slot: String },

    #[error("No usable seed material: {0}")]
    NoSeedMaterial(String),

    #[error("Iteration ledger is sealed; run '{run_id}' already reached a terminal state")]
    LedgerSealed { run_id: String },

    // Infra
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RalphError {
    pub fn generation(phase: impl Into<String>, message: impl Into<String>) -> Self {
        RalphError::Generation {
            phase: phase.into(),
            message: message.into(),
        }
    }

    /// True for errors the orchestrator converts into an unscored gate
    /// evaluation rather than propagating.
    pub fn is_generation(&self) -> bool {
        matches!(self, RalphError::Generation { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_constructor() {
        let e = RalphError::generation("evaluate", "connection reset");
        assert!(e.is_generation());
        assert_eq!(
            e.to_string(),
            "Generation call failed in evaluate: connection reset"
        );
    }

    #[test]
    fn test_duplicate_is_not_generation() {
        let e = RalphError::DuplicateRun {
            slot: "2026-08-30".into(),
        };
        assert!(!e.is_generation());
        assert!(e.to_string().contains("2026-08-30"));
    }
}
