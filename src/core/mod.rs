// src/core/mod.rs — Quality-gated generation loop

pub mod attempt;
pub mod budget;
pub mod cost;
pub mod gate;
pub mod ledger;
pub mod orchestrator;
pub mod types;
