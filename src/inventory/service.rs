use std::collections::BTreeMap;
use std::num::NonZeroU32;

use crate::cache::ResponseCache;
use crate::config::InventoryConfig;
use crate::crm::{CrmClient, GetItemRequest, ListItemsRequest, SortDirection};
use crate::error::ApiError;
use crate::inventory::outputs::{CollectionResult, InventoryItem};
use crate::inventory::transform::transform_item;

/// Serves inventory items from cache, falling back to the CRM
#[derive(Debug)]
pub struct InventoryService<C> {
    client: C,
    cache: ResponseCache,
    config: InventoryConfig,
}

/// Zero-based CRM offset of the first record on `page`
pub fn page_offset(page: NonZeroU32, page_size: u64) -> u64 {
    u64::from(page.get() - 1) * page_size
}

impl<C: CrmClient> InventoryService<C> {
    pub fn new(client: C, cache: ResponseCache, config: InventoryConfig) -> Self {
        Self {
            client,
            cache,
            config,
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// Fetch a single item by its CRM id
    pub async fn fetch_item(&self, id: &str) -> Result<InventoryItem, ApiError> {
        let cache_key = ResponseCache::item_key(id);
        if let Some(cached) = self.cache.get::<InventoryItem>(&cache_key) {
            return Ok(cached);
        }

        let request = GetItemRequest {
            entity_type_id: self.config.entity_type_id,
            id: id.to_string(),
            select: self.config.fields,
        };

        let raw = self
            .client
            .get_item(&request)
            .await
            .map_err(ApiError::Upstream)?;

        let Some(raw) = raw.filter(|raw| !raw.is_empty()) else {
            tracing::info!(id = %id, "Inventory item not found");
            return Err(ApiError::NotFound);
        };

        let item = transform_item(&raw);
        self.cache.set(&cache_key, &item);
        Ok(item)
    }

    /// Fetch one page of the collection, newest items first
    pub async fn fetch_page(&self, page: NonZeroU32) -> Result<CollectionResult, ApiError> {
        let cache_key = ResponseCache::page_key(page.get());
        if let Some(cached) = self.cache.get::<CollectionResult>(&cache_key) {
            return Ok(cached);
        }

        let request = ListItemsRequest {
            entity_type_id: self.config.entity_type_id,
            start: page_offset(page, self.config.page_size),
            order: BTreeMap::from([("id", SortDirection::Desc)]),
            select: self.config.fields,
        };

        let upstream = self
            .client
            .list_items(&request)
            .await
            .map_err(ApiError::Upstream)?;

        let data: Vec<InventoryItem> = upstream.items.iter().map(transform_item).collect();
        tracing::debug!(
            page = page.get(),
            start = request.start,
            count = data.len(),
            "Fetched inventory page"
        );

        let result = CollectionResult {
            page: page.get(),
            total: upstream.total.unwrap_or(data.len() as u64),
            data,
        };

        self.cache.set(&cache_key, &result);
        Ok(result)
    }
}
