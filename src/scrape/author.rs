// src/scrape/author.rs
use anyhow::Result;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use super::extract_rows;
use crate::fetch;

/// One mod of a single author, as listed by the upstream rank-by-steamid
/// tool. Values are kept as the raw cell text so the source formatting
/// (thousands separators and the like) survives serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AuthorModRecord {
    pub display_name: String,
    pub rank_total: String,
    pub downloads_total: String,
    pub downloads_yesterday: String,
}

/// Upstream URL of the author stats page for `steamid64`.
pub fn stats_url(base: &Url, steamid64: &str) -> Result<Url> {
    let mut url = base.join("tools/ranksbysteamid.php")?;
    url.query_pairs_mut().append_pair("steamid64", steamid64);
    Ok(url)
}

/// Extract the author's mods from the page text.
/// Columns: rank, display name, total downloads, yesterday's downloads.
pub fn parse_stats(html: &str) -> Result<Vec<AuthorModRecord>> {
    extract_rows(html, |row| {
        Ok(AuthorModRecord {
            rank_total: row.text(0)?,
            display_name: row.text(1)?,
            downloads_total: row.text(2)?,
            downloads_yesterday: row.text(3)?,
        })
    })
}

/// Fetch and extract in one step.
pub async fn collect(client: &Client, base: &Url, steamid64: &str) -> Result<Vec<AuthorModRecord>> {
    let url = stats_url(base, steamid64)?;
    let html = fetch::page_text(client, url.as_str()).await?;
    parse_stats(&html)
}
