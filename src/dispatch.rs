//! Routing of an incoming request to a single-item or collection fetch

use axum::http::Method;
use serde::Serialize;
use std::num::NonZeroU32;

use crate::crm::CrmClient;
use crate::error::ApiError;
use crate::inventory::outputs::{CollectionResult, InventoryItem};
use crate::inventory::service::InventoryService;

/// A validated inventory request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InventoryRequest {
    Item { id: String },
    Collection { page: NonZeroU32 },
}

impl InventoryRequest {
    /// Only GET is served; an empty id counts as absent and pages below 1
    /// become page 1
    pub fn route(method: &Method, id: Option<&str>, page: u32) -> Result<Self, ApiError> {
        if *method != Method::GET {
            return Err(ApiError::MethodNotAllowed);
        }

        Ok(match id.filter(|id| !id.is_empty()) {
            Some(id) => InventoryRequest::Item { id: id.to_string() },
            None => InventoryRequest::Collection {
                page: NonZeroU32::new(page).unwrap_or(NonZeroU32::MIN),
            },
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum InventoryResponse {
    Item(InventoryItem),
    Collection(CollectionResult),
}

/// Handle one request end to end
pub async fn dispatch<C: CrmClient>(
    service: &InventoryService<C>,
    method: &Method,
    id: Option<&str>,
    page: u32,
) -> Result<InventoryResponse, ApiError> {
    match InventoryRequest::route(method, id, page)? {
        InventoryRequest::Item { id } => service.fetch_item(&id).await.map(InventoryResponse::Item),
        InventoryRequest::Collection { page } => service
            .fetch_page(page)
            .await
            .map(InventoryResponse::Collection),
    }
}

/// Read a `page` query value with integer-cast semantics; a missing value is page 1.
///
/// Leading whitespace and an optional sign are accepted, reading stops at the
/// first non-digit, and oversized values saturate. Negative and unreadable
/// values come back as 0.
pub fn parse_page(raw: Option<&str>) -> u32 {
    let Some(raw) = raw else {
        return 1;
    };

    let raw = raw.trim_start();
    let (negative, digits) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };

    let value = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0u32, |acc, digit| {
            acc.saturating_mul(10).saturating_add(u32::from(digit - b'0'))
        });

    if negative { 0 } else { value }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ResponseCache;
    use crate::config::{CacheConfig, InventoryConfig};
    use crate::crm::client::testing::FakeCrm;
    use anyhow::Result;
    use std::time::Duration;
    use tempfile::TempDir;

    fn page(n: u32) -> NonZeroU32 {
        NonZeroU32::new(n).expect("page numbers start at 1")
    }

    #[test]
    fn test_route() {
        assert_eq!(
            InventoryRequest::route(&Method::GET, Some("123"), 1).unwrap(),
            InventoryRequest::Item { id: "123".to_string() }
        );
        assert_eq!(
            InventoryRequest::route(&Method::GET, None, 4).unwrap(),
            InventoryRequest::Collection { page: page(4) }
        );
        assert_eq!(
            InventoryRequest::route(&Method::GET, Some(""), 2).unwrap(),
            InventoryRequest::Collection { page: page(2) }
        );
        assert_eq!(
            InventoryRequest::route(&Method::GET, None, 0).unwrap(),
            InventoryRequest::Collection { page: page(1) }
        );
        assert_eq!(
            InventoryRequest::route(&Method::GET, None, parse_page(Some("-7"))).unwrap(),
            InventoryRequest::Collection { page: page(1) }
        );
    }

    #[test]
    fn test_non_get_is_rejected_regardless_of_parameters() {
        for method in [Method::POST, Method::PUT, Method::DELETE, Method::PATCH, Method::HEAD] {
            assert!(matches!(
                InventoryRequest::route(&method, Some("123"), 3),
                Err(ApiError::MethodNotAllowed)
            ));
            assert!(matches!(
                InventoryRequest::route(&method, None, 1),
                Err(ApiError::MethodNotAllowed)
            ));
        }
    }

    #[test]
    fn test_parse_page() {
        assert_eq!(parse_page(None), 1);
        assert_eq!(parse_page(Some("")), 0);
        assert_eq!(parse_page(Some("2")), 2);
        assert_eq!(parse_page(Some("+3")), 3);
        assert_eq!(parse_page(Some("  4")), 4);
        assert_eq!(parse_page(Some("5abc")), 5);
        assert_eq!(parse_page(Some("abc")), 0);
        assert_eq!(parse_page(Some("0")), 0);
        assert_eq!(parse_page(Some("-7")), 0);
        assert_eq!(parse_page(Some("99999999999999999999")), u32::MAX);
    }

    #[tokio::test]
    async fn test_rejected_method_touches_neither_crm_nor_cache() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let cache = ResponseCache::new(&CacheConfig {
            dir: Some(temp_dir.path().to_path_buf()),
            ttl: Duration::from_secs(300),
        })?;
        let service = InventoryService::new(FakeCrm::default(), cache, InventoryConfig::default());

        let result = dispatch(&service, &Method::POST, Some("123"), 1).await;
        assert!(matches!(result, Err(ApiError::MethodNotAllowed)));
        let result = dispatch(&service, &Method::DELETE, None, 1).await;
        assert!(matches!(result, Err(ApiError::MethodNotAllowed)));

        assert_eq!(service.client().calls(), 0);
        assert_eq!(std::fs::read_dir(temp_dir.path())?.count(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_dispatch_routes_to_collection() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let cache = ResponseCache::new(&CacheConfig {
            dir: Some(temp_dir.path().to_path_buf()),
            ttl: Duration::from_secs(300),
        })?;
        let service = InventoryService::new(FakeCrm::default(), cache, InventoryConfig::default());

        let response = dispatch(&service, &Method::GET, None, 2).await?;
        assert!(matches!(response, InventoryResponse::Collection(ref c) if c.page == 2));
        assert_eq!(
            serde_json::to_value(&response)?,
            serde_json::json!({"page": 2, "total": 0, "data": []})
        );
        Ok(())
    }
}
