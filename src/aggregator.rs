//! Orchestrates the sheet fetcher, selection store, and weapon cache into
//! the saved-weapons view.
//!
//! The view is served from the cache while it is fresh. On a stale cache,
//! every category tab is fetched (with bounded parallelism), rows are
//! filtered down to the user's selection, and the whole cache is replaced
//! in one atomic store. Category-level failures are skipped, never fatal.

use std::collections::HashMap;

use anyhow::Result;
use futures::stream::{self, StreamExt};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::categories::CATEGORIES;
use crate::models::{CategoryDetails, CategoryWeapons, SheetTable};
use crate::sheets::SheetsClient;
use crate::store::cache::{WeaponCache, WeaponDetails};
use crate::store::selection::{Selection, SelectionStore};

/// Header labels accepted as the weapon-name column, in priority order.
/// The order is load-bearing: sheets carrying both labels resolve to the
/// first match.
const NAME_COLUMNS: [&str; 2] = ["WEAPON Name", "Name"];

/// How many sheet tabs to fetch at once during a rebuild.
const FETCH_CONCURRENCY: usize = 4;

pub struct Aggregator {
    client: SheetsClient,
    selection: SelectionStore,
    cache: WeaponCache,
    /// Serializes rebuilds so overlapping stale-cache requests perform a
    /// single remote-fetch sweep and a single cache write.
    rebuild_lock: Mutex<()>,
}

impl Aggregator {
    pub fn new(client: SheetsClient, selection: SelectionStore, cache: WeaponCache) -> Self {
        Self {
            client,
            selection,
            cache,
            rebuild_lock: Mutex::new(()),
        }
    }

    /// Fetch one category tab directly, bypassing the cache.
    pub async fn raw_sheet(&self, gid: i64) -> Result<SheetTable> {
        Ok(self.client.fetch_table(gid).await?)
    }

    /// The current saved selection.
    pub fn selection(&self) -> Result<Selection> {
        self.selection.load()
    }

    /// Merge a partial selection update into the saved selection.
    pub fn save_selection(&self, update: Selection) -> Result<()> {
        self.selection.save(update)
    }

    /// The aggregated saved-weapons view: for every category with at least
    /// one selected weapon found in its sheet, the matching rows. Entries
    /// follow the category table's order; categories with no matches are
    /// omitted entirely.
    pub async fn saved_weapons(&self) -> Result<Vec<CategoryWeapons>> {
        let selection = self.selection.load()?;

        let details = if self.cache.is_valid() {
            debug!("Serving saved weapons from cache");
            self.cache.read()?
        } else {
            let _guard = self.rebuild_lock.lock().await;
            // A request that raced us may have finished a rebuild while we
            // waited for the lock.
            if self.cache.is_valid() {
                debug!("Cache was rebuilt while waiting for the lock");
                self.cache.read()?
            } else {
                let details = self.rebuild(&selection).await;
                self.cache.rebuild_and_store(details.clone())?;
                details
            }
        };

        Ok(CATEGORIES
            .iter()
            .filter_map(|&(_, name)| {
                details.get(name).map(|d| CategoryWeapons {
                    category: name.to_string(),
                    headers: d.headers.clone(),
                    rows: d.data.clone(),
                })
            })
            .collect())
    }

    /// Fetch every category tab and keep only the rows matching the
    /// selection. Failed, empty, and name-column-less tabs are skipped.
    async fn rebuild(&self, selection: &Selection) -> WeaponDetails {
        info!("Weapon cache is stale, rebuilding from remote sheets");

        let fetches: Vec<_> = CATEGORIES
            .iter()
            .map(|&(gid, name)| {
                let client = self.client.clone();
                async move { (name, client.fetch_table(gid).await) }
            })
            .collect();
        let tables = stream::iter(fetches)
        .buffered(FETCH_CONCURRENCY)
        .collect::<Vec<_>>()
        .await;

        let mut details = WeaponDetails::new();
        for (name, result) in tables {
            let table = match result {
                Ok(table) => table,
                Err(e) => {
                    warn!(category = name, error = %e, "Sheet fetch failed, skipping category");
                    continue;
                }
            };
            if table.is_empty() {
                debug!(category = name, "Sheet returned no data, skipping category");
                continue;
            }
            let Some(selected) = selection.get(name) else {
                continue;
            };
            if let Some(filtered) = filter_selected(table, selected) {
                details.insert(name.to_string(), filtered);
            }
        }

        info!(categories = details.len(), "Weapon cache rebuilt");
        details
    }
}

/// Keep only the rows whose name-column value is one of `selected`, in
/// selection order. Returns `None` when the table carries no recognized
/// name column or no selected weapon matched.
fn filter_selected(table: SheetTable, selected: &[String]) -> Option<CategoryDetails> {
    let name_index = NAME_COLUMNS
        .iter()
        .find_map(|label| table.headers.iter().position(|h| h == label))?;

    // Later rows win for duplicate weapon names.
    let mut by_name: HashMap<&str, &Vec<Value>> = HashMap::new();
    for row in &table.rows {
        if let Some(name) = row.get(name_index).and_then(Value::as_str) {
            by_name.insert(name, row);
        }
    }

    let data: Vec<Vec<Value>> = selected
        .iter()
        .filter_map(|name| by_name.get(name.as_str()).map(|&row| row.clone()))
        .collect();

    if data.is_empty() {
        None
    } else {
        Some(CategoryDetails {
            headers: table.headers,
            data,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
