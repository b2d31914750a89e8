// src/cli/status.rs — Recent run listing

use crate::infra::paths;
use crate::store::Store;

pub fn show_status(limit: u32) -> anyhow::Result<()> {
    let db_path = paths::db_path();
    println!("ralph v{}", env!("CARGO_PKG_VERSION"));
    println!();

    if !db_path.exists() {
        println!("  Database: (not initialized, no runs yet)");
        return Ok(());
    }
    println!("  Database: {}", db_path.display());
    println!();

    let store = Store::open(&db_path)?;
    let runs = store.recent_runs(limit)?;
    if runs.is_empty() {
        println!("  No runs recorded.");
        return Ok(());
    }

    println!(
        "  {:<12} {:<10} {:>6} {:>10}  {}",
        "SLOT", "STATUS", "SCORE", "COST", "REASON"
    );
    for run in &runs {
        let score = run
            .final_score
            .map(|s| format!("{s:.2}"))
            .unwrap_or_else(|| "-".into());
        let cost = run
            .total_cost_usd
            .map(|c| format!("${c:.4}"))
            .unwrap_or_else(|| "-".into());
        println!(
            "  {:<12} {:<10} {:>6} {:>10}  {}",
            run.slot,
            run.status,
            score,
            cost,
            run.reason.as_deref().unwrap_or("-"),
        );
    }
    Ok(())
}
