// src/scrape/list.rs
use anyhow::Result;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use super::extract_rows;
use crate::fetch;

/// One row of the full mod list published on the migration progress page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ModListRecord {
    pub display_name: String,
    pub downloads_total: String,
    pub downloads_yesterday: String,
    #[serde(rename = "tModLoaderVersion")]
    pub tmodloader_version: String,
    pub internal_name: String,
}

/// Upstream URL of the full mod list page.
pub fn list_url(base: &Url) -> Result<Url> {
    Ok(base.join("modmigrationprogress.php")?)
}

/// Extract the mod list from the page text.
/// Columns: display name, total downloads, yesterday's downloads,
/// tModLoader version, internal name.
pub fn parse_list(html: &str) -> Result<Vec<ModListRecord>> {
    extract_rows(html, |row| {
        Ok(ModListRecord {
            display_name: row.text(0)?,
            downloads_total: row.text(1)?,
            downloads_yesterday: row.text(2)?,
            tmodloader_version: row.text(3)?,
            internal_name: row.text(4)?,
        })
    })
}

/// Fetch and extract in one step.
pub async fn collect(client: &Client, base: &Url) -> Result<Vec<ModListRecord>> {
    let url = list_url(base)?;
    let html = fetch::page_text(client, url.as_str()).await?;
    parse_list(&html)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = "<html><body><table class=\"primary\"><tbody>\
        <tr><td>Name</td><td>Downloads</td><td>Yesterday</td><td>Version</td><td>Internal</td></tr>\
        <tr><td>Magic Storage</td><td>1,759,011</td><td>402</td><td>v0.11.8.9</td><td>MagicStorage</td></tr>\
        </tbody></table></body></html>";

    #[test]
    fn extracts_all_five_columns() {
        let mods = parse_list(PAGE).unwrap();
        assert_eq!(mods.len(), 1);
        assert_eq!(
            mods[0],
            ModListRecord {
                display_name: "Magic Storage".to_string(),
                downloads_total: "1,759,011".to_string(),
                downloads_yesterday: "402".to_string(),
                tmodloader_version: "v0.11.8.9".to_string(),
                internal_name: "MagicStorage".to_string(),
            }
        );
    }

    #[test]
    fn version_key_keeps_its_lowercase_t() {
        let mods = parse_list(PAGE).unwrap();
        let value = serde_json::to_value(&mods[0]).unwrap();
        let object = value.as_object().unwrap();
        assert!(object.contains_key("tModLoaderVersion"));
        assert!(!object.contains_key("TModLoaderVersion"));
        assert!(object.contains_key("InternalName"));
    }

    #[test]
    fn header_only_list_is_empty() {
        let page = "<table class=\"primary\"><tbody>\
            <tr><td>Name</td><td>Downloads</td><td>Yesterday</td><td>Version</td><td>Internal</td></tr>\
            </tbody></table>";
        assert!(parse_list(page).unwrap().is_empty());
    }

    #[test]
    fn list_url_is_fixed() {
        let base = Url::parse("http://javid.ddns.net/tModLoader/").unwrap();
        assert_eq!(
            list_url(&base).unwrap().as_str(),
            "http://javid.ddns.net/tModLoader/modmigrationprogress.php"
        );
    }
}
