// src/pipeline/harvest.rs

//! Email harvesting pipeline: store markup, harvest it, backfill listings.

use std::path::PathBuf;

use serde_json::Value;

use crate::error::{AppError, Result};
use crate::models::{Config, HarvestedEmails};
use crate::services::{EmailHarvester, fill_missing_emails, listing_schema};
use crate::storage::{PageStore, StoredPage, page_key};

/// Where the markup to harvest comes from.
#[derive(Debug, Clone)]
pub enum HarvestSource {
    /// An HTML file on disk
    File(PathBuf),
    /// Markup previously captured with [`run_store`]
    Stored(String),
}

/// Store raw markup for `url` and return the key it was stored under.
///
/// `url` must be absolute; it is the identity the key is derived from.
pub async fn run_store(store: &dyn PageStore, url: &str, markup: String) -> Result<String> {
    url::Url::parse(url)?;
    let key = page_key(url);
    store.save_raw(&key, &StoredPage::new(url, markup)).await?;
    Ok(key)
}

/// Harvest email addresses from a file or stored page.
pub async fn run_harvest(
    config: &Config,
    store: &dyn PageStore,
    source: &HarvestSource,
) -> Result<HarvestedEmails> {
    let markup = match source {
        HarvestSource::File(path) => {
            log::info!("Harvesting emails from {}", path.display());
            tokio::fs::read_to_string(path).await?
        }
        HarvestSource::Stored(key) => {
            log::info!("Harvesting emails from stored page {}", key);
            load_markup(store, key).await?
        }
    };

    let emails = EmailHarvester::new(&config.harvest).harvest(&markup);
    log::info!(
        "Found {} emails ({} observed)",
        emails.len(),
        emails.observed().count()
    );
    Ok(emails)
}

/// Build the record shape to request from the extractor for `fields`.
///
/// `email` is always requested so [`run_enrich`] has a field to backfill.
pub fn run_schema(fields: &[String]) -> Value {
    let schema = listing_schema(fields);
    log::info!(
        "Listing schema has {} fields",
        schema["listings"][0].as_object().map_or(0, |listing| listing.len())
    );
    schema
}

/// Backfill missing listing emails from the stored markup for `key` and
/// save the enriched record.
pub async fn run_enrich(
    config: &Config,
    store: &dyn PageStore,
    key: &str,
    mut record: Value,
) -> Result<Value> {
    let markup = load_markup(store, key).await?;
    let emails = EmailHarvester::new(&config.harvest).harvest(&markup);

    let filled = fill_missing_emails(&mut record, &emails);
    log::info!("Filled {} listing emails for {}", filled, key);

    store.save_record(key, &record).await?;
    Ok(record)
}

async fn load_markup(store: &dyn PageStore, key: &str) -> Result<String> {
    store
        .load_raw(key)
        .await?
        .map(|page| page.markup)
        .ok_or_else(|| AppError::storage(key, "no raw markup stored"))
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;
    use crate::models::Confidence;
    use crate::storage::LocalStorage;

    const PAGE: &str = r#"<html><body>
        <a href="mailto:office@u.edu">Office</a>
        <p>Questions go to the front desk.</p>
    </body></html>"#;

    #[tokio::test]
    async fn test_store_then_harvest() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStorage::new(tmp.path());

        let key = run_store(&store, "https://u.edu/dept", PAGE.to_string())
            .await
            .unwrap();
        assert_eq!(key, page_key("https://u.edu/dept"));

        let emails = run_harvest(&Config::default(), &store, &HarvestSource::Stored(key))
            .await
            .unwrap();
        assert_eq!(emails.confidence("office@u.edu"), Some(Confidence::Observed));
    }

    #[tokio::test]
    async fn test_store_rejects_relative_url() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStorage::new(tmp.path());

        let result = run_store(&store, "/dept?page=2", PAGE.to_string()).await;
        assert!(matches!(result, Err(AppError::Url(_))));
    }

    #[tokio::test]
    async fn test_harvest_from_file() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStorage::new(tmp.path());
        let path = tmp.path().join("page.html");
        tokio::fs::write(&path, PAGE).await.unwrap();

        let emails = run_harvest(&Config::default(), &store, &HarvestSource::File(path))
            .await
            .unwrap();
        assert!(emails.contains("office@u.edu"));
    }

    #[tokio::test]
    async fn test_harvest_missing_key_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStorage::new(tmp.path());

        let result = run_harvest(
            &Config::default(),
            &store,
            &HarvestSource::Stored("0123456789abcdef".into()),
        )
        .await;
        assert!(matches!(result, Err(AppError::Storage { .. })));
    }

    #[test]
    fn test_schema_requests_email() {
        let schema = run_schema(&["name".to_string(), "office".to_string()]);
        let listing = schema["listings"][0].as_object().unwrap();

        assert_eq!(listing.len(), 3);
        assert!(listing.contains_key("email"));
    }

    #[tokio::test]
    async fn test_enrich_fills_and_saves_record() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStorage::new(tmp.path());
        let key = run_store(&store, "https://u.edu/dept", PAGE.to_string())
            .await
            .unwrap();

        let record = json!({"listings": [
            {"name": "Office", "email": "N/A"},
            {"name": "Dean", "email": "dean@u.edu"}
        ]});
        let enriched = run_enrich(&Config::default(), &store, &key, record)
            .await
            .unwrap();

        assert_eq!(enriched["listings"][0]["email"], "office@u.edu");
        assert_eq!(enriched["listings"][1]["email"], "dean@u.edu");
        assert_eq!(store.load_record(&key).await.unwrap(), Some(enriched));
    }
}
