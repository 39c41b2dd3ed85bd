// src/scrape/history.rs
use anyhow::Result;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use super::extract_rows;
use crate::fetch;

/// One published version of a mod, from the download history tool page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ModVersionRecord {
    pub version: String,
    pub downloads: String,
    #[serde(rename = "tModLoaderVersion")]
    pub tmodloader_version: String,
    pub publish_date: String,
}

/// Upstream URL of the download history page for `mod_name`.
pub fn history_url(base: &Url, mod_name: &str) -> Result<Url> {
    let mut url = base.join("tools/moddownloadhistory.php")?;
    url.query_pairs_mut().append_pair("modname", mod_name);
    Ok(url)
}

/// Extract the version history from the page text.
/// Columns: version, downloads, tModLoader version, publish date.
pub fn parse_history(html: &str) -> Result<Vec<ModVersionRecord>> {
    extract_rows(html, |row| {
        Ok(ModVersionRecord {
            version: row.text(0)?,
            downloads: row.text(1)?,
            tmodloader_version: row.text(2)?,
            publish_date: row.text(3)?,
        })
    })
}

/// Fetch and extract in one step.
pub async fn collect(client: &Client, base: &Url, mod_name: &str) -> Result<Vec<ModVersionRecord>> {
    let url = history_url(base, mod_name)?;
    let html = fetch::page_text(client, url.as_str()).await?;
    parse_history(&html)
}
