//! HTTP surface of the facade
//!
//! Every path and method lands on the same handler: preflight requests are
//! answered here, everything else goes through [`dispatch`]. CORS headers are
//! attached to every response.

use anyhow::{Context, Result};
use axum::extract::{Query, State};
use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use axum::{Json, Router, middleware};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::crm::CrmClient;
use crate::dispatch::{dispatch, parse_page};
use crate::inventory::service::InventoryService;

const ALLOW_ORIGIN: &str = "*";
const ALLOW_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";
const ALLOW_HEADERS: &str = "Origin, Content-Type, X-Auth-Token, Authorization";

struct AppState<C> {
    service: InventoryService<C>,
    cache_control: String,
}

/// Build the router serving `service`
pub fn router<C: CrmClient>(service: InventoryService<C>) -> Router {
    let cache_control = format!("max-age={}, public", service.cache().ttl().as_secs());
    let state = Arc::new(AppState {
        service,
        cache_control,
    });

    Router::new()
        .route("/", any(handle_inventory::<C>))
        .fallback(handle_inventory::<C>)
        .layer(middleware::map_response(with_cors_headers))
        .with_state(state)
}

/// Serve until `shutdown` resolves
pub async fn serve<C, F>(
    listener: TcpListener,
    service: InventoryService<C>,
    shutdown: F,
) -> Result<()>
where
    C: CrmClient,
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router(service))
        .with_graceful_shutdown(shutdown)
        .await
        .context("HTTP server failed")
}

async fn handle_inventory<C: CrmClient>(
    State(state): State<Arc<AppState<C>>>,
    method: Method,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if method == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }

    let id = params.get("id").map(String::as_str);
    let page = parse_page(params.get("page").map(String::as_str));
    tracing::debug!(%method, ?id, page, "Inventory request");

    match dispatch(&state.service, &method, id, page).await {
        Ok(body) => (
            [(header::CACHE_CONTROL, state.cache_control.clone())],
            Json(body),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

async fn with_cors_headers(mut response: Response) -> Response {
    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static(ALLOW_ORIGIN),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOW_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOW_HEADERS),
    );
    response
}
