// src/lib.rs — Library root for Ralph

pub mod cli;
pub mod core;
pub mod infra;
pub mod notify;
pub mod provider;
pub mod quality;
pub mod sources;
pub mod store;
