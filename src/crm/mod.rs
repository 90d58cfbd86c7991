//! # CRM Module
//!
//! Outbound access to the CRM's generic item REST API.
//!
//! - [`client`] - The [`CrmClient`] seam and its webhook-backed implementation
//! - [`types`] - Request bodies and response envelopes

pub mod client;
pub mod types;

pub use client::{BitrixClient, CrmClient};
pub use types::{GetItemRequest, ItemPage, ListItemsRequest, RawItem, SortDirection};
