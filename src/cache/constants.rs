//! Constants for cache file and directory names

/// Directory created under the platform cache dir when none is configured
pub const CACHE_DIR_NAME: &str = "inventory-facade";

/// Prefix and extension of every cache entry file
pub const ENTRY_FILE_PREFIX: &str = "inventory_";
pub const ENTRY_FILE_EXTENSION: &str = "cache";

/// Logical key prefixes
pub const ITEM_KEY_PREFIX: &str = "inventory_item_";
pub const PAGE_KEY_PREFIX: &str = "inventory_page_";

/// Default time-to-live for cache entries, in seconds
pub const DEFAULT_TTL_SECS: u64 = 300;
