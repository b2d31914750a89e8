// src/store/mod.rs — SQLite persistence

pub mod schema;

use std::path::Path;

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use crate::core::types::{Iteration, Run, RunStatus};
use crate::sources::SourceItem;

/// Low-level SQLite operations. One connection, owned by the process; each
/// run writes through it sequentially.
pub struct Store {
    conn: Connection,
}

/// One row of `runs` for listings and audit queries.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub id: String,
    pub slot: String,
    pub status: String,
    pub final_score: Option<f64>,
    pub total_cost_usd: Option<f64>,
    pub reason: Option<String>,
    pub created_at: String,
}

impl Store {
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
        schema::run_migrations(&conn)?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        schema::run_migrations(&conn)?;
        Ok(Self { conn })
    }

    // -- Runs --

    pub fn insert_run(&self, run: &Run) -> anyhow::Result<()> {
        self.conn.execute(
            "INSERT INTO runs (id, slot, status, publish_threshold, quality_floor,
             time_budget_secs, cost_budget_usd, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                run.id,
                run.slot,
                run.status.to_string(),
                run.publish_threshold as f64,
                run.quality_floor as f64,
                run.time_budget.as_secs() as i64,
                run.cost_budget_usd,
                run.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Attach the terminal status. Called exactly once per run.
    pub fn complete_run(
        &self,
        run_id: &str,
        status: RunStatus,
        terminal_iteration: Option<u32>,
        reason: &str,
        final_score: Option<f32>,
        total_cost_usd: f64,
    ) -> anyhow::Result<()> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "UPDATE runs SET status = ?1, terminal_iteration = ?2, reason = ?3,
             final_score = ?4, total_cost_usd = ?5, completed_at = ?6
             WHERE id = ?7",
            params![
                status.to_string(),
                terminal_iteration,
                reason,
                final_score.map(|s| s as f64),
                total_cost_usd,
                now,
                run_id,
            ],
        )?;
        Ok(())
    }

    /// True when a run for this slot is pending, published, or draft. Failed
    /// runs do not block a retry.
    pub fn slot_taken(&self, slot: &str) -> anyhow::Result<bool> {
        let taken: Option<String> = self
            .conn
            .query_row(
                "SELECT id FROM runs
                 WHERE slot = ?1 AND status IN ('pending', 'published', 'draft')
                 LIMIT 1",
                [slot],
                |r| r.get(0),
            )
            .optional()?;
        Ok(taken.is_some())
    }

    pub fn recent_runs(&self, limit: u32) -> anyhow::Result<Vec<RunSummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, slot, status, final_score, total_cost_usd, reason, created_at
             FROM runs ORDER BY created_at DESC LIMIT ?1",
        )?;
        let rows = stmt.query_map([limit], |r| {
            Ok(RunSummary {
                id: r.get(0)?,
                slot: r.get(1)?,
                status: r.get(2)?,
                final_score: r.get(3)?,
                total_cost_usd: r.get(4)?,
                reason: r.get(5)?,
                created_at: r.get(6)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    // -- Iterations --

    pub fn insert_iteration(&self, run_id: &str, it: &Iteration) -> anyhow::Result<()> {
        let critique = serde_json::to_string(&it.critique)?;
        self.conn.execute(
            "INSERT INTO iterations (run_id, seq, title, slug, excerpt, body_markdown,
             score, critique, input_tokens, output_tokens, cost_usd, duration_ms, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            params![
                run_id,
                it.seq,
                it.post.title,
                it.post.slug(),
                it.post.excerpt,
                it.post.body_markdown,
                it.score as f64,
                critique,
                it.cost.usage.input_tokens,
                it.cost.usage.output_tokens,
                it.cost.cost_usd,
                it.cost.duration.as_millis() as i64,
                it.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// (seq, score) pairs in sequence order, for audit queries and tests.
    pub fn iteration_scores(&self, run_id: &str) -> anyhow::Result<Vec<(u32, f64)>> {
        let mut stmt = self
            .conn
            .prepare("SELECT seq, score FROM iterations WHERE run_id = ?1 ORDER BY seq")?;
        let rows = stmt.query_map([run_id], |r| Ok((r.get(0)?, r.get(1)?)))?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    // -- Source items --

    pub fn insert_source_item(&self, item: &SourceItem) -> anyhow::Result<()> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO source_items (id, title, url, summary, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![item.id, item.title, item.url, item.summary, now],
        )?;
        Ok(())
    }

    /// Oldest unused items first, capped at `limit`.
    pub fn unused_source_items(&self, limit: u32) -> anyhow::Result<Vec<SourceItem>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, url, summary FROM source_items
             WHERE used_by_run IS NULL ORDER BY created_at ASC LIMIT ?1",
        )?;
        let rows = stmt.query_map([limit], |r| {
            Ok(SourceItem {
                id: r.get(0)?,
                title: r.get(1)?,
                url: r.get(2)?,
                summary: r.get(3)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn mark_source_items_used(&self, ids: &[&str], run_id: &str) -> anyhow::Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        for id in ids {
            tx.execute(
                "UPDATE source_items SET used_by_run = ?1 WHERE id = ?2",
                params![run_id, id],
            )?;
        }
        tx.commit()?;
        Ok(())
    }
}
