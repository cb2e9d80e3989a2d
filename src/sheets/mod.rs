//! HTTP client module for the public spreadsheet endpoint.
//!
//! This module provides the `SheetsClient` for fetching one category tab
//! at a time from the Google Sheets gviz endpoint and parsing the JSONP-ish
//! response into a `SheetTable`.

pub mod client;
pub mod error;

pub use client::SheetsClient;
pub use error::SheetsError;
