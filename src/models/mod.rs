//! Data models for spreadsheet tables and the saved-weapons view.
//!
//! - `SheetTable`: one fetched tab (headers + rows)
//! - `CategoryDetails`: cached rows for one category
//! - `CategoryWeapons`: one entry of the aggregated view

pub mod sheet;

pub use sheet::{CategoryDetails, CategoryWeapons, SheetTable};
