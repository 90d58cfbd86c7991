use anyhow::{Context, Result, bail};
use serde::{Serialize, de::DeserializeOwned};

use crate::config::UpstreamConfig;
use crate::crm::types::{
    GetItemRequest, ItemPage, ItemResult, ListItemsRequest, ListResult, RawItem, RestResponse,
};

const ITEM_GET_METHOD: &str = "crm.item.get";
const ITEM_LIST_METHOD: &str = "crm.item.list";

/// Error code the CRM reports when an item id does not exist
const NOT_FOUND_ERROR: &str = "NOT_FOUND";

/// Read access to the CRM's generic item API
pub trait CrmClient: Send + Sync + 'static {
    /// Fetch one record; `Ok(None)` when the CRM has no such record
    fn get_item(
        &self,
        request: &GetItemRequest,
    ) -> impl Future<Output = Result<Option<RawItem>>> + Send;

    /// Fetch one CRM-sized page of records
    fn list_items(
        &self,
        request: &ListItemsRequest,
    ) -> impl Future<Output = Result<ItemPage>> + Send;
}

/// [`CrmClient`] over a Bitrix24-style inbound webhook
#[derive(Debug, Clone)]
pub struct BitrixClient {
    client: reqwest::Client,
    webhook_url: String,
}

impl BitrixClient {
    /// Create a new client; every call is bounded by `config.timeout`
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(format!(
                "{}/{}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            webhook_url: config.webhook_url.trim_end_matches('/').to_string(),
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/{}.json", self.webhook_url, method)
    }

    /// POST a REST method and decode its envelope.
    ///
    /// Non-2xx responses are still decoded so CRM error codes reach the caller.
    async fn call<B, T>(&self, method: &str, body: &B) -> Result<RestResponse<T>>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        // The webhook URL embeds a secret token, so only the method is logged
        tracing::info!("Calling CRM method {}", method);

        let response = self
            .client
            .post(self.method_url(method))
            .json(body)
            .send()
            .await
            .with_context(|| format!("Failed to call {method}"))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .with_context(|| format!("Failed to read {method} response"))?;

        let envelope: RestResponse<T> = serde_json::from_slice(&bytes).with_context(|| {
            format!(
                "Failed to decode {method} response: HTTP {} - {}",
                status,
                status.canonical_reason().unwrap_or("Unknown error")
            )
        })?;

        if !status.is_success() && envelope.error.is_none() {
            bail!("{method} failed: HTTP {status}");
        }

        Ok(envelope)
    }
}

impl CrmClient for BitrixClient {
    async fn get_item(&self, request: &GetItemRequest) -> Result<Option<RawItem>> {
        let envelope: RestResponse<ItemResult> = self.call(ITEM_GET_METHOD, request).await?;

        if envelope.error.as_deref() == Some(NOT_FOUND_ERROR) {
            return Ok(None);
        }
        if let Some(message) = envelope.error_message() {
            bail!("{ITEM_GET_METHOD} failed: {message}");
        }

        Ok(envelope.result.and_then(ItemResult::into_item))
    }

    async fn list_items(&self, request: &ListItemsRequest) -> Result<ItemPage> {
        let envelope: RestResponse<ListResult> = self.call(ITEM_LIST_METHOD, request).await?;

        if let Some(message) = envelope.error_message() {
            bail!("{ITEM_LIST_METHOD} failed: {message}");
        }

        Ok(ItemPage {
            items: envelope.result.map(|r| r.items).unwrap_or_default(),
            total: envelope.total,
        })
    }
}
