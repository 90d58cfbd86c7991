use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// A record exactly as the CRM returns it
pub type RawItem = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Desc,
}

/// Body of a `crm.item.get` call
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetItemRequest {
    pub entity_type_id: u32,
    pub id: String,
    pub select: &'static [&'static str],
}

/// Body of a `crm.item.list` call.
///
/// There is no limit field: the CRM pages by its own fixed size.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListItemsRequest {
    pub entity_type_id: u32,
    pub start: u64,
    pub order: BTreeMap<&'static str, SortDirection>,
    pub select: &'static [&'static str],
}

/// Items of one list call plus the CRM-reported total, if any
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemPage {
    pub items: Vec<RawItem>,
    pub total: Option<u64>,
}

/// Envelope wrapping every REST response
#[derive(Debug, Deserialize)]
pub struct RestResponse<T> {
    pub result: Option<T>,
    pub total: Option<u64>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

impl<T> RestResponse<T> {
    /// Human-readable error, if the CRM reported one
    pub fn error_message(&self) -> Option<String> {
        let code = self.error.as_deref()?;
        Some(match self.error_description.as_deref() {
            Some(description) if !description.is_empty() => format!("{code}: {description}"),
            _ => code.to_string(),
        })
    }
}

/// `result` of `crm.item.get`
#[derive(Debug, Deserialize)]
pub struct ItemResult {
    #[serde(default)]
    pub item: Value,
}

impl ItemResult {
    /// The record, if the CRM returned a non-empty one
    pub fn into_item(self) -> Option<RawItem> {
        match self.item {
            Value::Object(map) if !map.is_empty() => Some(map),
            _ => None,
        }
    }
}

/// `result` of `crm.item.list`
#[derive(Debug, Deserialize)]
pub struct ListResult {
    #[serde(default)]
    pub items: Vec<RawItem>,
}
