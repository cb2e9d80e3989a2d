//! Persisted per-category selection of weapon names.

use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;

use anyhow::{Context, Result};

use super::write_atomic;

/// Category display name -> selected weapon names, in saved order.
pub type Selection = BTreeMap<String, Vec<String>>;

/// File-backed store for the user's selection.
///
/// Saves from two racing callers are not serialized; the last writer wins
/// at category granularity. Each individual write is still atomic.
pub struct SelectionStore {
    path: PathBuf,
}

impl SelectionStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Load the saved selection. A missing file is an empty selection; an
    /// unreadable or corrupt file is an error, since silently resetting it
    /// would destroy the user's picks.
    pub fn load(&self) -> Result<Selection> {
        if !self.path.exists() {
            return Ok(Selection::new());
        }

        let contents = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read selection file: {}", self.path.display()))?;

        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse selection file: {}", self.path.display()))
    }

    /// Merge a partial update into the saved selection. Only the categories
    /// present in `update` are overwritten; names within a category are
    /// deduplicated in first-seen order.
    pub fn save(&self, update: Selection) -> Result<()> {
        let mut selection = self.load()?;
        for (category, names) in update {
            selection.insert(category, dedup_names(names));
        }
        write_atomic(&self.path, &selection)
    }
}

fn dedup_names(names: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    names.into_iter().filter(|name| seen.insert(name.clone())).collect()
}

// ============================================================================
// Tests
// ============================================================================
