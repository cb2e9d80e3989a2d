use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One fetched spreadsheet tab: ordered column headers plus rows whose cells
/// align positionally with the headers.
///
/// Cells are JSON scalars as the sheet endpoint delivers them - strings,
/// numbers, or booleans; a missing cell becomes an empty string. The fetcher
/// guarantees every row has exactly `headers.len()` cells.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SheetTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl SheetTable {
    /// A tab with no columns carries no data and is skipped by callers.
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }
}

/// Cached rows for one category, as persisted inside the weapon cache file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryDetails {
    pub headers: Vec<String>,
    pub data: Vec<Vec<Value>>,
}

/// One entry of the aggregated saved-weapons view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryWeapons {
    pub category: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}
