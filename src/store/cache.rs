//! Whole-file cache of fetched-and-filtered weapon rows.
//!
//! One `last_fetched` timestamp covers the entire cache: all categories are
//! refreshed together in a single rebuild pass, so per-category freshness
//! would never diverge. The cache is all-or-nothing - absent, expired, or
//! unreadable all mean "rebuild everything".

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::CategoryDetails;

use super::write_atomic;

/// Cached data is stale one hour after the last full refresh.
const CACHE_TTL_MINUTES: i64 = 60;

/// Category display name -> cached headers and rows.
pub type WeaponDetails = BTreeMap<String, CategoryDetails>;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheFile {
    last_fetched: DateTime<Utc>,
    weapon_details: WeaponDetails,
}

pub struct WeaponCache {
    path: PathBuf,
}

impl WeaponCache {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// True iff a cache file exists and its refresh timestamp is within the
    /// TTL. An unreadable or corrupt file counts as invalid; the rebuild
    /// that follows overwrites it with a consistent one.
    pub fn is_valid(&self) -> bool {
        match self.load() {
            Ok(Some(file)) => {
                Utc::now() - file.last_fetched < Duration::minutes(CACHE_TTL_MINUTES)
            }
            Ok(None) => false,
            Err(e) => {
                debug!(error = %e, "Failed to read weapon cache for validity check");
                false
            }
        }
    }

    /// Read the cached per-category details. A missing file is an empty
    /// cache; a corrupt file is a surfaced error.
    pub fn read(&self) -> Result<WeaponDetails> {
        Ok(self.load()?.map(|file| file.weapon_details).unwrap_or_default())
    }

    /// Replace the entire cache with `details`, stamped with the current
    /// time. Written to a temp file and renamed into place, so no reader
    /// observes a half-written cache.
    pub fn rebuild_and_store(&self, details: WeaponDetails) -> Result<()> {
        let file = CacheFile {
            last_fetched: Utc::now(),
            weapon_details: details,
        };
        write_atomic(&self.path, &file)
    }

    fn load(&self) -> Result<Option<CacheFile>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read cache file: {}", self.path.display()))?;

        let file = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse cache file: {}", self.path.display()))?;

        Ok(Some(file))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn cache_in(dir: &tempfile::TempDir) -> WeaponCache {
        WeaponCache::new(dir.path().join("weapon_data.json"))
    }

    fn details(category: &str) -> WeaponDetails {
        let mut map = WeaponDetails::new();
        map.insert(
            category.to_string(),
            CategoryDetails {
                headers: vec!["Name".to_string()],
                data: vec![vec![json!("Le Monarque")]],
            },
        );
        map
    }

    fn stamp(cache_path: &std::path::Path, age: Duration, details: WeaponDetails) {
        let file = CacheFile {
            last_fetched: Utc::now() - age,
            weapon_details: details,
        };
        std::fs::write(cache_path, serde_json::to_string_pretty(&file).unwrap()).unwrap();
    }

    #[test]
    fn test_missing_file_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!cache_in(&dir).is_valid());
    }

    #[test]
    fn test_just_inside_ttl_is_valid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weapon_data.json");
        stamp(&path, Duration::seconds(59 * 60 + 59), details("Bows"));
        assert!(WeaponCache::new(path).is_valid());
    }

    #[test]
    fn test_just_past_ttl_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weapon_data.json");
        stamp(&path, Duration::seconds(60 * 60 + 1), details("Bows"));
        assert!(!WeaponCache::new(path).is_valid());
    }

    #[test]
    fn test_corrupt_file_is_invalid_but_read_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weapon_data.json");
        std::fs::write(&path, "{not json").unwrap();

        let cache = WeaponCache::new(path);
        assert!(!cache.is_valid());
        assert!(cache.read().is_err());
    }

    #[test]
    fn test_rebuild_overwrites_whole_cache() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache_in(&dir);

        cache.rebuild_and_store(details("Bows")).unwrap();
        cache.rebuild_and_store(details("Swords")).unwrap();

        let read = cache.read().unwrap();
        assert_eq!(read.len(), 1);
        assert!(read.contains_key("Swords"));
        assert!(cache.is_valid());
    }

    #[test]
    fn test_cache_file_layout() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache_in(&dir);
        cache.rebuild_and_store(details("Bows")).unwrap();

        let contents =
            std::fs::read_to_string(dir.path().join("weapon_data.json")).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
        assert!(parsed["last_fetched"].is_string());
        assert_eq!(parsed["weapon_details"]["Bows"]["headers"][0], "Name");
        assert_eq!(parsed["weapon_details"]["Bows"]["data"][0][0], "Le Monarque");
    }
}
