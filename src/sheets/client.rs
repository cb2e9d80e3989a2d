//! Client for fetching spreadsheet tabs from the gviz endpoint.
//!
//! The endpoint answers with a JavaScript callback invocation wrapping a
//! JSON payload, not with plain JSON. The payload is located between two
//! fixed delimiters and parsed from there; a body without the wrapper is
//! treated as an empty tab, not as an error.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::models::SheetTable;

use super::SheetsError;

// ============================================================================
// Constants
// ============================================================================

/// Default host serving the gviz endpoint.
const GVIZ_BASE_URL: &str = "https://docs.google.com";

/// HTTP request timeout in seconds. A tab that takes longer than this is
/// reported as a fetch failure and skipped for the current refresh cycle.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// The gviz response wraps its JSON payload in this callback invocation.
const PAYLOAD_PREFIX: &str = "google.visualization.Query.setResponse(";
const PAYLOAD_SUFFIX: &str = ");";

/// Header label of the icon column, stripped from headers and every row.
const ICON_COLUMN: &str = "WEAPON Icon";

/// Last-cell markers for unreleased/unknown weapons; such rows are dropped.
const SENTINEL_VALUES: [&str; 2] = ["/", "?"];

/// Inline replacement for embedded line breaks in string cells.
const LINE_BREAK_TOKEN: &str = "<br>";

// ============================================================================
// Wire format
// ============================================================================

#[derive(Debug, Deserialize)]
struct GvizResponse {
    table: GvizTable,
}

#[derive(Debug, Deserialize)]
struct GvizTable {
    #[serde(default)]
    cols: Vec<GvizCol>,
    #[serde(default)]
    rows: Vec<GvizRow>,
}

#[derive(Debug, Deserialize)]
struct GvizCol {
    #[serde(default)]
    label: String,
}

#[derive(Debug, Deserialize)]
struct GvizRow {
    #[serde(rename = "c", default)]
    cells: Vec<Option<GvizCell>>,
}

#[derive(Debug, Deserialize)]
struct GvizCell {
    #[serde(default)]
    v: Value,
}

// ============================================================================
// Client
// ============================================================================

/// Client for fetching one category tab as a parsed `SheetTable`.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct SheetsClient {
    client: Client,
    base_url: String,
    sheet_id: String,
}

impl SheetsClient {
    /// Create a client for the given spreadsheet document.
    pub fn new(sheet_id: String) -> Result<Self, SheetsError> {
        Self::with_base_url(GVIZ_BASE_URL.to_string(), sheet_id)
    }

    /// Point the client at a non-default host. Tests use this to target a
    /// local mock server.
    pub fn with_base_url(base_url: String, sheet_id: String) -> Result<Self, SheetsError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url,
            sheet_id,
        })
    }

    /// Fetch and parse one category tab.
    ///
    /// A body without the gviz callback wrapper yields `Ok` with an empty
    /// table ("no data"). Network, HTTP-status, and JSON errors are real
    /// errors; the caller decides whether to skip the category.
    pub async fn fetch_table(&self, gid: i64) -> Result<SheetTable, SheetsError> {
        let url = format!(
            "{}/spreadsheets/d/{}/gviz/tq?tqx=out:json&gid={}",
            self.base_url, self.sheet_id, gid
        );

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(SheetsError::Status(response.status()));
        }

        let body = response.text().await?;
        parse_gviz(&body)
    }
}

// ============================================================================
// Parsing
// ============================================================================

/// Extract the JSON payload from the gviz callback wrapper and parse it.
fn parse_gviz(body: &str) -> Result<SheetTable, SheetsError> {
    let Some(start) = body.find(PAYLOAD_PREFIX) else {
        debug!("gviz callback wrapper not found, treating tab as empty");
        return Ok(SheetTable::default());
    };
    let payload = &body[start + PAYLOAD_PREFIX.len()..];
    let Some(end) = payload.rfind(PAYLOAD_SUFFIX) else {
        debug!("gviz callback wrapper not terminated, treating tab as empty");
        return Ok(SheetTable::default());
    };

    let parsed: GvizResponse = serde_json::from_str(&payload[..end])?;
    Ok(build_table(parsed.table))
}

/// Turn the wire-format table into a `SheetTable`: strip the icon column,
/// drop sentinel rows, and normalize embedded line breaks.
fn build_table(table: GvizTable) -> SheetTable {
    let labels: Vec<String> = table.cols.into_iter().map(|c| c.label).collect();
    let column_count = labels.len();
    let icon_index = labels.iter().position(|label| label == ICON_COLUMN);

    let mut headers = labels;
    if let Some(idx) = icon_index {
        headers.remove(idx);
    }

    let mut rows = Vec::new();
    for row in table.rows {
        if row.cells.is_empty() {
            continue;
        }

        let mut cells: Vec<Value> = row
            .cells
            .into_iter()
            .map(|cell| match cell {
                Some(GvizCell { v }) if !v.is_null() => v,
                _ => Value::String(String::new()),
            })
            .collect();

        // Pad short rows (trailing empty cells are elided by the endpoint)
        // so every row stays aligned with the headers.
        cells.resize(column_count, Value::String(String::new()));
        if let Some(idx) = icon_index {
            cells.remove(idx);
        }

        match cells.last() {
            None => continue,
            Some(last) if is_sentinel(last) => continue,
            Some(_) => {}
        }

        for cell in &mut cells {
            if let Value::String(s) = cell {
                if s.contains('\n') {
                    *s = s.replace('\n', LINE_BREAK_TOKEN);
                }
            }
        }

        rows.push(cells);
    }

    SheetTable { headers, rows }
}

fn is_sentinel(cell: &Value) -> bool {
    matches!(cell.as_str(), Some(s) if SENTINEL_VALUES.contains(&s))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;
    use serde_json::json;

    use super::*;

    fn wrap(payload: &serde_json::Value) -> String {
        format!(
            "/*O_o*/\ngoogle.visualization.Query.setResponse({});",
            payload
        )
    }

    fn gviz_body(cols: &[&str], rows: &[Vec<serde_json::Value>]) -> String {
        let cols: Vec<_> = cols.iter().map(|label| json!({ "label": label })).collect();
        let rows: Vec<_> = rows
            .iter()
            .map(|row| {
                let cells: Vec<_> = row.iter().map(|v| json!({ "v": v })).collect();
                json!({ "c": cells })
            })
            .collect();
        wrap(&json!({ "table": { "cols": cols, "rows": rows } }))
    }

    #[test]
    fn test_missing_wrapper_is_empty_table() {
        let table = parse_gviz("<html>not a gviz response</html>").unwrap();
        assert!(table.is_empty());
        assert!(table.rows.is_empty());
    }

    #[test]
    fn test_malformed_payload_is_error() {
        let body = "google.visualization.Query.setResponse({not json);";
        assert!(parse_gviz(body).is_err());
    }

    #[test]
    fn test_icon_column_removed_from_headers_and_rows() {
        let body = gviz_body(
            &["WEAPON Icon", "Name", "Type"],
            &[vec![json!("x"), json!("Thorn"), json!("Hand Cannon")]],
        );
        let table = parse_gviz(&body).unwrap();
        assert_eq!(table.headers, vec!["Name", "Type"]);
        assert_eq!(table.rows, vec![vec![json!("Thorn"), json!("Hand Cannon")]]);
    }

    #[test]
    fn test_sentinel_rows_dropped() {
        let body = gviz_body(
            &["Name", "Status"],
            &[
                vec![json!("Thorn"), json!("/")],
                vec![json!("Hawkmoon"), json!("?")],
                vec![json!("Le Monarque"), json!("Live")],
            ],
        );
        let table = parse_gviz(&body).unwrap();
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0][0], json!("Le Monarque"));
    }

    #[test]
    fn test_null_and_missing_cells_become_empty_strings() {
        let payload = json!({ "table": {
            "cols": [{ "label": "Name" }, { "label": "Perk" }, { "label": "Notes" }],
            "rows": [{ "c": [{ "v": "Thorn" }, null] }],
        }});
        let table = parse_gviz(&wrap(&payload)).unwrap();
        // Null cell and elided trailing cell both pad to "".
        assert_eq!(table.rows, vec![vec![json!("Thorn"), json!(""), json!("")]]);
    }

    #[test]
    fn test_newlines_normalized_to_inline_break() {
        let body = gviz_body(
            &["Name", "Notes"],
            &[vec![json!("Thorn"), json!("line one\nline two")]],
        );
        let table = parse_gviz(&body).unwrap();
        assert_eq!(table.rows[0][1], json!("line one<br>line two"));
    }

    #[test]
    fn test_non_string_cells_survive_untouched() {
        let body = gviz_body(&["Name", "Tier"], &[vec![json!("Thorn"), json!(5)]]);
        let table = parse_gviz(&body).unwrap();
        assert_eq!(table.rows[0][1], json!(5));
    }

    #[tokio::test]
    async fn test_fetch_table_hits_gviz_url() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/spreadsheets/d/test-sheet/gviz/tq")
                .query_param("gid", "324500912");
            then.status(200)
                .body(gviz_body(&["Name"], &[vec![json!("Le Monarque")]]));
        });

        let client = SheetsClient::with_base_url(server.base_url(), "test-sheet".to_string())
            .expect("client");
        let table = client.fetch_table(324500912).await.unwrap();

        mock.assert();
        assert_eq!(table.headers, vec!["Name"]);
        assert_eq!(table.rows, vec![vec![json!("Le Monarque")]]);
    }

    #[tokio::test]
    async fn test_fetch_table_surfaces_http_errors() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET);
            then.status(500).body("boom");
        });

        let client = SheetsClient::with_base_url(server.base_url(), "test-sheet".to_string())
            .expect("client");
        let err = client.fetch_table(1).await.unwrap_err();
        assert!(matches!(err, SheetsError::Status(_)));
    }
}
