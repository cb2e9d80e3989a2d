//! Persisted state: the user's weapon selection and the weapon cache.
//!
//! Both stores are whole-file JSON documents. Every write goes to a temp
//! file first and is renamed into place, so a reader never observes a
//! half-written file. The aggregator only touches the narrow `load`/`save`
//! and `is_valid`/`read`/`rebuild_and_store` surfaces, keeping the backing
//! store swappable.

pub mod cache;
pub mod selection;

pub use cache::WeaponCache;
pub use selection::SelectionStore;

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

/// Serialize `value` as pretty JSON and atomically replace `path` with it.
pub(crate) fn write_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let contents = serde_json::to_string_pretty(value)?;
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, contents)
        .with_context(|| format!("Failed to write temp file: {}", tmp.display()))?;
    std::fs::rename(&tmp, path)
        .with_context(|| format!("Failed to replace file: {}", path.display()))?;
    Ok(())
}
