//! Public JSON shapes served by the facade
//!
//! These are serialized straight into response bodies and cache entries, and
//! deserialized in tests for type-safe validation.

use serde::{Deserialize, Serialize};
use serde_json::Number;

/// Listing status label
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListingStatus {
    Published,
    Pocket,
    #[default]
    Unknown,
}

/// Project status label; `Unspecified` serializes as an empty string
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectStatus {
    #[serde(rename = "Off Plan")]
    OffPlan,
    #[serde(rename = "Off-Plan Primary")]
    OffPlanPrimary,
    #[serde(rename = "Off-Plan Secondary")]
    OffPlanSecondary,
    #[serde(rename = "Ready Primary")]
    ReadyPrimary,
    #[serde(rename = "Ready Secondary")]
    ReadySecondary,
    #[serde(rename = "Completed")]
    Completed,
    #[default]
    #[serde(rename = "")]
    Unspecified,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    pub url: String,
}

/// An inventory item in its public form. Every field is always present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: Number,
    pub reference: String,
    pub title: String,
    pub bedrooms: Number,
    pub bathrooms: Number,
    /// Two-decimal string, e.g. `"1234.50"`
    pub price: String,
    pub status: ListingStatus,
    pub project_status: ProjectStatus,
    pub owner_phone: String,
    pub unit_type: String,
    pub location_pf: String,
    pub location_bayut: String,
    pub size: Number,
    pub agent_name: String,
    pub owner_name: String,
    pub owner_url: String,
    pub images: Vec<ImageRef>,
}

impl Default for InventoryItem {
    fn default() -> Self {
        Self {
            id: Number::from(0),
            reference: String::new(),
            title: String::new(),
            bedrooms: Number::from(0),
            bathrooms: Number::from(0),
            price: "0.00".to_string(),
            status: ListingStatus::default(),
            project_status: ProjectStatus::default(),
            owner_phone: String::new(),
            unit_type: String::new(),
            location_pf: String::new(),
            location_bayut: String::new(),
            size: Number::from(0),
            agent_name: String::new(),
            owner_name: String::new(),
            owner_url: "#".to_string(),
            images: Vec::new(),
        }
    }
}

/// One page of the inventory collection.
///
/// `total` is the CRM-reported count when available, otherwise the number of
/// items on this page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionResult {
    pub page: u32,
    pub total: u64,
    pub data: Vec<InventoryItem>,
}

/// Error body returned for every failed request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
