//! # Inventory Module
//!
//! Fetching, reshaping, and caching inventory items.
//!
//! - [`service`] - Single-item and collection fetches with cache short-circuit
//! - [`transform`] - Raw record to public item mapping
//! - [`fields`] - CRM field names and the fixed selection list
//! - [`outputs`] - Public response types

pub mod fields;
pub mod outputs;
pub mod service;
pub mod transform;

pub use outputs::{CollectionResult, ErrorBody, ImageRef, InventoryItem, ListingStatus, ProjectStatus};
pub use service::InventoryService;
