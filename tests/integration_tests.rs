//! Integration tests for the inventory HTTP surface
//!
//! Each test serves the real router on an ephemeral port, backed by an
//! in-memory CRM and a temporary cache directory, and talks to it over HTTP.

use anyhow::{Result, bail};
use inventory_facade::cache::ResponseCache;
use inventory_facade::config::{CacheConfig, InventoryConfig};
use inventory_facade::crm::{CrmClient, GetItemRequest, ItemPage, ListItemsRequest, RawItem};
use inventory_facade::inventory::{CollectionResult, ErrorBody, InventoryItem};
use inventory_facade::{InventoryService, server};
use reqwest::{Method, StatusCode, header};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::TcpListener;

const CACHE_TTL: Duration = Duration::from_secs(300);

#[derive(Default)]
struct CallLog {
    calls: AtomicUsize,
    starts: Mutex<Vec<u64>>,
}

/// CRM stand-in serving one record and one page
struct StubCrm {
    item: Option<RawItem>,
    page: ItemPage,
    fail: bool,
    log: Arc<CallLog>,
}

impl CrmClient for StubCrm {
    async fn get_item(&self, request: &GetItemRequest) -> Result<Option<RawItem>> {
        self.log.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            bail!("crm.item.get failed: ACCESS_DENIED: webhook token revoked");
        }
        Ok(self.item.clone().filter(|_| request.id == "123"))
    }

    async fn list_items(&self, request: &ListItemsRequest) -> Result<ItemPage> {
        self.log.calls.fetch_add(1, Ordering::SeqCst);
        self.log.starts.lock().unwrap().push(request.start);
        if self.fail {
            bail!("crm.item.list failed: QUERY_LIMIT_EXCEEDED");
        }
        Ok(self.page.clone())
    }
}

fn raw(value: serde_json::Value) -> RawItem {
    value.as_object().cloned().unwrap_or_default()
}

fn stub_crm(fail: bool) -> (StubCrm, Arc<CallLog>) {
    let log = Arc::new(CallLog::default());
    let crm = StubCrm {
        item: Some(raw(json!({
            "id": 123,
            "ufCrm48ReferenceNumber": "INV-123",
            "ufCrm48ListingTitle": "Sea view apartment",
            "ufCrm48Price": "1850000|AED",
            "ufCrm48Status": 41323,
            "ufCrm48ProjectStatus": "off_plan_primary",
            "ufCrm48PropertyImages": ["https://img.example/a.jpg"]
        }))),
        page: ItemPage {
            items: vec![raw(json!({"id": 124})), raw(json!({"id": 123}))],
            total: Some(74),
        },
        fail,
        log: Arc::clone(&log),
    };
    (crm, log)
}

/// Helper to serve a router on an ephemeral port with a temporary cache
async fn spawn_server(crm: StubCrm, ttl: Duration) -> Result<(String, TempDir)> {
    let temp_dir = TempDir::new()?;
    let cache = ResponseCache::new(&CacheConfig {
        dir: Some(temp_dir.path().to_path_buf()),
        ttl,
    })?;
    let service = InventoryService::new(crm, cache, InventoryConfig::default());

    let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
    let base_url = format!("http://{}/", listener.local_addr()?);
    tokio::spawn(server::serve(listener, service, std::future::pending()));

    Ok((base_url, temp_dir))
}

#[tokio::test]
async fn test_collection_response() -> Result<()> {
    let (crm, log) = stub_crm(false);
    let (base_url, _temp_dir) = spawn_server(crm, CACHE_TTL).await?;

    let response = reqwest::get(&base_url).await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
    assert_eq!(response.headers()[header::CACHE_CONTROL], "max-age=300, public");
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");

    let body: CollectionResult = response.json().await?;
    assert_eq!(body.page, 1);
    assert_eq!(body.total, 74);
    assert_eq!(body.data.len(), 2);
    assert_eq!(body.data[0].id.as_u64(), Some(124));
    assert_eq!(*log.starts.lock().unwrap(), vec![0]);
    Ok(())
}

#[tokio::test]
async fn test_page_parameter() -> Result<()> {
    let (crm, log) = stub_crm(false);
    let (base_url, _temp_dir) = spawn_server(crm, CACHE_TTL).await?;

    let body: CollectionResult = reqwest::get(format!("{base_url}?page=2")).await?.json().await?;
    assert_eq!(body.page, 2);

    let body: CollectionResult = reqwest::get(format!("{base_url}?page=-4")).await?.json().await?;
    assert_eq!(body.page, 1);

    let body: CollectionResult = reqwest::get(format!("{base_url}?page=abc&id=")).await?.json().await?;
    assert_eq!(body.page, 1);

    // page 1 was cached by the second request, so the third did not reach the CRM
    assert_eq!(*log.starts.lock().unwrap(), vec![50, 0]);
    Ok(())
}

#[tokio::test]
async fn test_single_item_response() -> Result<()> {
    let (crm, _log) = stub_crm(false);
    let (base_url, _temp_dir) = spawn_server(crm, CACHE_TTL).await?;

    let response = reqwest::get(format!("{base_url}?id=123")).await?;
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["id"], 123);
    assert_eq!(body["reference"], "INV-123");
    assert_eq!(body["price"], "1850000.00");
    assert_eq!(body["status"], "Published");
    assert_eq!(body["projectStatus"], "Off-Plan Primary");
    assert_eq!(body["ownerUrl"], "#");
    assert_eq!(body["images"], json!([{"url": "https://img.example/a.jpg"}]));

    let item: InventoryItem = serde_json::from_value(body)?;
    assert_eq!(item.title, "Sea view apartment");
    Ok(())
}

#[tokio::test]
async fn test_repeat_request_is_served_from_cache() -> Result<()> {
    let (crm, log) = stub_crm(false);
    let (base_url, _temp_dir) = spawn_server(crm, CACHE_TTL).await?;

    let first = reqwest::get(format!("{base_url}?id=123")).await?.bytes().await?;
    let second = reqwest::get(format!("{base_url}?id=123")).await?.bytes().await?;
    assert_eq!(first, second);
    assert_eq!(log.calls.load(Ordering::SeqCst), 1);
    Ok(())
}

#[tokio::test]
async fn test_expired_cache_refetches() -> Result<()> {
    let (crm, log) = stub_crm(false);
    let (base_url, _temp_dir) = spawn_server(crm, Duration::ZERO).await?;

    reqwest::get(&base_url).await?.error_for_status()?;
    reqwest::get(&base_url).await?.error_for_status()?;
    assert_eq!(log.calls.load(Ordering::SeqCst), 2);
    Ok(())
}

#[tokio::test]
async fn test_unknown_item_is_not_found() -> Result<()> {
    let (crm, _log) = stub_crm(false);
    let (base_url, temp_dir) = spawn_server(crm, CACHE_TTL).await?;

    let response = reqwest::get(format!("{base_url}?id=999")).await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: ErrorBody = response.json().await?;
    assert_eq!(body.error, "Item not found");
    assert_eq!(std::fs::read_dir(temp_dir.path())?.count(), 0);
    Ok(())
}

#[tokio::test]
async fn test_other_methods_are_rejected() -> Result<()> {
    let (crm, log) = stub_crm(false);
    let (base_url, _temp_dir) = spawn_server(crm, CACHE_TTL).await?;
    let client = reqwest::Client::new();

    for method in [Method::POST, Method::PUT, Method::DELETE, Method::PATCH] {
        let response = client
            .request(method.clone(), format!("{base_url}?id=123"))
            .send()
            .await?;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED, "{method}");
        assert_eq!(response.headers()[header::ALLOW], "GET, OPTIONS");
        let body: ErrorBody = response.json().await?;
        assert_eq!(body.error, "Method not allowed");
    }

    assert_eq!(log.calls.load(Ordering::SeqCst), 0);
    Ok(())
}

#[tokio::test]
async fn test_preflight() -> Result<()> {
    let (crm, log) = stub_crm(false);
    let (base_url, _temp_dir) = spawn_server(crm, CACHE_TTL).await?;

    let response = reqwest::Client::new()
        .request(Method::OPTIONS, &base_url)
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_METHODS],
        "GET, POST, PUT, DELETE, OPTIONS"
    );
    assert!(response.bytes().await?.is_empty());
    assert_eq!(log.calls.load(Ordering::SeqCst), 0);
    Ok(())
}

#[tokio::test]
async fn test_upstream_failure_is_opaque() -> Result<()> {
    let (crm, _log) = stub_crm(true);
    let (base_url, temp_dir) = spawn_server(crm, CACHE_TTL).await?;

    for url in [format!("{base_url}?id=123"), base_url.clone()] {
        let response = reqwest::get(&url).await?;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(response.headers()[header::CACHE_CONTROL], "no-store");
        let text = response.text().await?;
        assert_eq!(serde_json::from_str::<ErrorBody>(&text)?.error, "Upstream request failed");
        assert!(!text.contains("ACCESS_DENIED"));
    }

    assert_eq!(std::fs::read_dir(temp_dir.path())?.count(), 0);
    Ok(())
}

#[tokio::test]
async fn test_any_path_is_served_by_the_facade() -> Result<()> {
    let (crm, log) = stub_crm(false);
    let (base_url, _temp_dir) = spawn_server(crm, CACHE_TTL).await?;

    let response = reqwest::get(format!("{base_url}listings?page=2")).await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    let body: CollectionResult = response.json().await?;
    assert_eq!(body.page, 2);
    assert_eq!(*log.starts.lock().unwrap(), vec![50]);

    let response = reqwest::Client::new()
        .post(format!("{base_url}anything"))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
    let body: ErrorBody = response.json().await?;
    assert_eq!(body.error, "Method not allowed");
    assert_eq!(log.calls.load(Ordering::SeqCst), 1);
    Ok(())
}
