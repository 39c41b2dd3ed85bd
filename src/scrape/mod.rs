// src/scrape/mod.rs
use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::warn;

pub mod author;
pub mod history;
pub mod list;

pub use author::AuthorModRecord;
pub use history::ModVersionRecord;
pub use list::ModListRecord;

static PRIMARY: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".primary").expect("CSS selector for the stats table should be valid"));
static BODY: Lazy<Selector> =
    Lazy::new(|| Selector::parse("tbody").expect("CSS selector for the table body should be valid"));
static ROW: Lazy<Selector> =
    Lazy::new(|| Selector::parse("tr").expect("CSS selector for table rows should be valid"));
static CELL: Lazy<Selector> =
    Lazy::new(|| Selector::parse("td").expect("CSS selector for table cells should be valid"));

/// One data row of a stats table, cells in source order.
pub struct TableRow<'a> {
    cells: Vec<ElementRef<'a>>,
}

impl TableRow<'_> {
    /// The first text node of cell `idx`, as raw text.
    ///
    /// The upstream tool pages write each value as the sole text child of
    /// its cell, so a missing cell or a cell without a text node means the
    /// page no longer has the shape we scrape, and the row is unusable.
    pub fn text(&self, idx: usize) -> Result<String> {
        let cell = self
            .cells
            .get(idx)
            .with_context(|| format!("row has no cell {}", idx))?;
        let text = cell
            .text()
            .next()
            .with_context(|| format!("cell {} has no text node", idx))?;
        Ok(text.to_string())
    }
}

/// Locate the stats table in `html` and map every data row through `build`.
///
/// The table is the first element carrying the class `primary`. Its first
/// row is a header and is skipped; the remaining rows become records in
/// source order. Any structural anomaly fails the whole extraction, there
/// is no per-row recovery. A header-only table is a valid empty result.
pub fn extract_rows<T>(html: &str, build: impl Fn(&TableRow) -> Result<T>) -> Result<Vec<T>> {
    let doc = Html::parse_document(html);
    let table = doc
        .select(&PRIMARY)
        .next()
        .context("no element with class `primary` in page")?;
    let body = table
        .select(&BODY)
        .next()
        .context("stats table has no body")?;

    let mut records = Vec::new();
    for row in body.select(&ROW).skip(1) {
        let row = TableRow {
            cells: row.select(&CELL).collect(),
        };
        records.push(build(&row)?);
    }
    Ok(records)
}

/// Collapse a failed scrape into an empty record list, logging the cause.
///
/// This is the only place failure and "no rows" merge; below it every
/// scrape stays a `Result` so callers and tests can tell them apart.
pub fn or_empty<T>(outcome: Result<Vec<T>>, what: &str) -> Vec<T> {
    match outcome {
        Ok(records) => records,
        Err(err) => {
            warn!("{} scrape failed: {:#}", what, err);
            Vec::new()
        }
    }
}
