//! Immutable configuration injected into the facade's components

use std::path::PathBuf;
use std::time::Duration;

use crate::cache::constants::DEFAULT_TTL_SECS;
use crate::inventory::fields::SELECT_FIELDS;

/// CRM entity type holding inventory items
pub const INVENTORY_ENTITY_TYPE_ID: u32 = 1130;

/// Records per collection page; must match the CRM's own list page size
pub const PAGE_SIZE: u64 = 50;

pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 10;

/// What to ask the CRM for and how to page through it
#[derive(Debug, Clone, PartialEq)]
pub struct InventoryConfig {
    pub entity_type_id: u32,
    pub page_size: u64,
    pub fields: &'static [&'static str],
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            entity_type_id: INVENTORY_ENTITY_TYPE_ID,
            page_size: PAGE_SIZE,
            fields: &SELECT_FIELDS,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CacheConfig {
    /// Custom cache directory (defaults to the platform cache dir)
    pub dir: Option<PathBuf>,
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: None,
            ttl: Duration::from_secs(DEFAULT_TTL_SECS),
        }
    }
}

/// Connection settings for the CRM REST webhook
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamConfig {
    /// Webhook base URL; method names are appended as `<base>/<method>.json`
    pub webhook_url: String,
    pub timeout: Duration,
}
