use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use tracing::{debug, info, warn};

use crate::{
    db::{
        models::{LinkDetail, LinkRecord},
        Store,
    },
    error::{AppError, Result, CODE_TOO_LONG, INVALID_URL, MISSING_URL},
    utils::{generate_short_code, valid_url, DEFAULT_CODE_LENGTH},
};

pub const MAX_CODE_LENGTH: usize = 32;

/// Validation, record shaping and lookups on top of a [`Store`].
///
/// Nothing is cached here: every call reads the store fresh.
#[derive(Clone)]
pub struct LinkService {
    store: Arc<dyn Store>,
}

impl LinkService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// All links, newest first. Keys that vanish between listing and reading
    /// are skipped, as are values that no longer decode.
    pub async fn list(&self) -> Result<Vec<LinkDetail>> {
        let codes = self.store.list().await?;
        let mut links = Vec::with_capacity(codes.len());
        for code in codes {
            let Some(raw) = self.store.get(&code).await? else {
                continue;
            };
            match serde_json::from_str::<LinkRecord>(&raw) {
                Ok(record) => links.push(LinkDetail::new(code, record)),
                Err(e) => warn!(code = %code, error = %e, "Skipping undecodable link record"),
            }
        }
        links.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.code.cmp(&b.code))
        });
        Ok(links)
    }

    /// Stores a new link and returns the resolved `(code, url)`.
    ///
    /// The existence check and the write are two separate store calls, so two
    /// concurrent creates of the same code can both pass the check and the
    /// later write wins.
    pub async fn create(
        &self,
        code: Option<String>,
        url: Option<String>,
    ) -> Result<(String, String)> {
        let url = url
            .filter(|url| !url.is_empty())
            .ok_or(AppError::Validation(MISSING_URL))?;
        if !valid_url(&url) {
            return Err(AppError::Validation(INVALID_URL));
        }

        let code = match code.filter(|code| !code.is_empty()) {
            Some(code) if code.chars().count() > MAX_CODE_LENGTH => {
                return Err(AppError::Validation(CODE_TOO_LONG));
            }
            Some(code) => code,
            None => {
                let code = generate_short_code(DEFAULT_CODE_LENGTH);
                debug!(code = %code, "Generated short code");
                code
            }
        };

        if self.store.get(&code).await?.is_some() {
            return Err(AppError::Conflict);
        }

        let record = LinkRecord {
            url: url.clone(),
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        };
        self.store.put(&code, serde_json::to_string(&record)?).await?;
        info!(code = %code, url = %url, "Created short link");
        Ok((code, url))
    }

    pub async fn delete(&self, code: &str) -> Result<()> {
        self.store.delete(code).await?;
        info!(code = %code, "Deleted short link");
        Ok(())
    }

    pub async fn resolve(&self, code: &str) -> Result<String> {
        let raw = self.store.get(code).await?.ok_or(AppError::NotFound)?;
        let record: LinkRecord = serde_json::from_str(&raw)?;
        Ok(record.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;

    fn service() -> (LinkService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (LinkService::new(store.clone()), store)
    }

    fn some(s: &str) -> Option<String> {
        Some(s.to_string())
    }

    #[tokio::test]
    async fn create_without_code_generates_one() {
        let (links, _) = service();
        let (code, url) = links.create(None, some("https://example.com")).await.unwrap();

        assert_eq!(code.len(), DEFAULT_CODE_LENGTH);
        assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_eq!(url, "https://example.com");
        assert_eq!(links.resolve(&code).await.unwrap(), "https://example.com");

        let listed = links.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].code, code);
    }

    #[tokio::test]
    async fn empty_code_is_treated_as_absent() {
        let (links, _) = service();
        let (code, _) = links.create(some(""), some("https://example.com")).await.unwrap();
        assert_eq!(code.len(), DEFAULT_CODE_LENGTH);
    }

    #[tokio::test]
    async fn resolve_returns_url_verbatim() {
        let (links, _) = service();
        let submitted = "HTTPS://Example.com:443/a/../b?x=1";
        let (code, _) = links.create(some("verbatim"), some(submitted)).await.unwrap();
        assert_eq!(links.resolve(&code).await.unwrap(), submitted);
    }

    #[tokio::test]
    async fn stored_record_has_url_and_timestamp() {
        let (links, store) = service();
        links.create(some("abc"), some("https://x.com")).await.unwrap();

        let raw = store.get("abc").await.unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["url"], "https://x.com");
        let created_at = value["createdAt"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(created_at).is_ok());
        assert!(created_at.ends_with('Z'));
        assert!(value.get("code").is_none());
    }

    #[tokio::test]
    async fn missing_url_is_rejected() {
        let (links, _) = service();
        for url in [None, some("")] {
            let err = links.create(some("abc"), url).await.unwrap_err();
            assert!(matches!(err, AppError::Validation(MISSING_URL)));
        }
    }

    #[tokio::test]
    async fn invalid_url_is_rejected() {
        let (links, store) = service();
        let err = links.create(some("abc"), some("not-a-url")).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(INVALID_URL)));
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn oversized_code_is_rejected() {
        let (links, store) = service();
        let code = "a".repeat(MAX_CODE_LENGTH + 1);
        let err = links.create(Some(code), some("https://x.com")).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(CODE_TOO_LONG)));
        assert!(store.list().await.unwrap().is_empty());

        let code = "a".repeat(MAX_CODE_LENGTH);
        assert!(links.create(Some(code), some("https://x.com")).await.is_ok());
    }

    #[tokio::test]
    async fn code_length_counts_characters() {
        let (links, _) = service();
        let code = "短".repeat(MAX_CODE_LENGTH);
        assert!(links.create(Some(code), some("https://x.com")).await.is_ok());
    }

    #[tokio::test]
    async fn existing_code_conflicts_without_overwrite() {
        let (links, _) = service();
        links.create(some("abc"), some("https://x.com")).await.unwrap();

        let err = links.create(some("abc"), some("https://y.com")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict));
        assert_eq!(links.resolve("abc").await.unwrap(), "https://x.com");
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let (links, _) = service();
        links.create(some("abc"), some("https://x.com")).await.unwrap();

        links.delete("abc").await.unwrap();
        links.delete("abc").await.unwrap();
        links.delete("never-existed").await.unwrap();
        assert!(matches!(links.resolve("abc").await, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn resolve_unknown_code_is_not_found() {
        let (links, _) = service();
        assert!(matches!(links.resolve("nope").await, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn list_orders_newest_first_and_skips_bad_records() {
        let (links, store) = service();
        let record = |url: &str, created_at: &str| {
            serde_json::to_string(&LinkRecord {
                url: url.to_string(),
                created_at: created_at.to_string(),
            })
            .unwrap()
        };
        store
            .put("old", record("https://old.com", "2024-01-01T00:00:00.000Z"))
            .await
            .unwrap();
        store
            .put("new", record("https://new.com", "2024-06-01T00:00:00.000Z"))
            .await
            .unwrap();
        store.put("junk", "not json".to_string()).await.unwrap();

        let listed = links.list().await.unwrap();
        let codes: Vec<_> = listed.iter().map(|l| l.code.as_str()).collect();
        assert_eq!(codes, vec!["new", "old"]);
        assert_eq!(listed[1].url, "https://old.com");
        assert_eq!(listed[1].created_at, "2024-01-01T00:00:00.000Z");
    }
}
