// src/sources/mod.rs — Seed material selection
//
// The loop does not fetch feeds itself; items land in the store by external
// means. This module only decides which unused items seed a run and marks
// them consumed so re-runs don't recycle them.

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::infra::errors::RalphError;
use crate::store::Store;

/// One stored feed item available as source material.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceItem {
    pub id: String,
    pub title: String,
    pub url: String,
    pub summary: String,
}

/// The source items a run's first attempt is drafted from.
#[derive(Debug, Clone)]
pub struct SeedMaterial {
    pub items: Vec<SourceItem>,
}

impl SeedMaterial {
    pub fn item_ids(&self) -> Vec<&str> {
        self.items.iter().map(|i| i.id.as_str()).collect()
    }
}

/// Supplies seed material for a run. Selection happens once, at SEEDING.
pub trait SeedSource: Send + Sync {
    /// Select seed material, or fail with `NoSeedMaterial` when not enough
    /// unused items exist.
    fn select(&self) -> Result<SeedMaterial, RalphError>;

    /// Mark the selected items as consumed by the given run.
    fn mark_used(&self, material: &SeedMaterial, run_id: &str) -> Result<(), RalphError>;
}

/// Store-backed seed source: picks the oldest unused items within the
/// configured window.
pub struct StoreSeedSource {
    store: Arc<Mutex<Store>>,
    min_items: u32,
    max_items: u32,
}

impl StoreSeedSource {
    pub fn new(store: Arc<Mutex<Store>>, min_items: u32, max_items: u32) -> Self {
        Self {
            store,
            min_items,
            max_items,
        }
    }
}

impl SeedSource for StoreSeedSource {
    fn select(&self) -> Result<SeedMaterial, RalphError> {
        let store = self
            .store
            .lock()
            .map_err(|_| RalphError::Other(anyhow::anyhow!("store lock poisoned")))?;
        let items = store.unused_source_items(self.max_items)?;

        if (items.len() as u32) < self.min_items {
            return Err(RalphError::NoSeedMaterial(format!(
                "need at least {} unused source items, found {}",
                self.min_items,
                items.len()
            )));
        }

        Ok(SeedMaterial { items })
    }

    fn mark_used(&self, material: &SeedMaterial, run_id: &str) -> Result<(), RalphError> {
        let store = self
            .store
            .lock()
            .map_err(|_| RalphError::Other(anyhow::anyhow!("store lock poisoned")))?;
        store.mark_source_items_used(&material.item_ids(), run_id)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str) -> SourceItem {
        SourceItem {
            id: id.into(),
            title: format!("Item {id}"),
            url: format!("https://example.com/{id}"),
            summary: "summary".into(),
        }
    }

    #[test]
    fn test_item_ids() {
        let material = SeedMaterial {
            items: vec![item("a"), item("b")],
        };
        assert_eq!(material.item_ids(), vec!["a", "b"]);
    }
}
