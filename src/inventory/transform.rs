//! Mapping from raw CRM records to the public inventory shape
//!
//! The mapping is total: unknown, missing, or oddly typed source values fall
//! back to the documented defaults, and unselected source fields are dropped.

use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::{Number, Value};
use std::str::FromStr;

use crate::crm::types::RawItem;
use crate::inventory::fields;
use crate::inventory::outputs::{ImageRef, InventoryItem, ListingStatus, ProjectStatus};

const STATUS_CODES: [(i64, ListingStatus); 2] = [
    (41323, ListingStatus::Published),
    (41324, ListingStatus::Pocket),
];

const PROJECT_STATUS_CODES: [(&str, ProjectStatus); 6] = [
    ("off_plan", ProjectStatus::OffPlan),
    ("off_plan_primary", ProjectStatus::OffPlanPrimary),
    ("off_plan_secondary", ProjectStatus::OffPlanSecondary),
    ("ready_primary", ProjectStatus::ReadyPrimary),
    ("ready_secondary", ProjectStatus::ReadySecondary),
    ("completed", ProjectStatus::Completed),
];

/// Transform a raw CRM record into its public form
pub fn transform_item(raw: &RawItem) -> InventoryItem {
    InventoryItem {
        id: number_or_zero(raw.get(fields::ID)),
        reference: text_or(raw.get(fields::REFERENCE), ""),
        title: text_or(raw.get(fields::TITLE), ""),
        bedrooms: number_or_zero(raw.get(fields::BEDROOMS)),
        bathrooms: number_or_zero(raw.get(fields::BATHROOMS)),
        price: format_price(raw.get(fields::PRICE)),
        status: listing_status(raw.get(fields::STATUS)),
        project_status: project_status(raw.get(fields::PROJECT_STATUS)),
        owner_phone: text_or(raw.get(fields::OWNER_PHONE), ""),
        unit_type: text_or(raw.get(fields::UNIT_TYPE), ""),
        location_pf: text_or(raw.get(fields::LOCATION_PF), ""),
        location_bayut: text_or(raw.get(fields::LOCATION_BAYUT), ""),
        size: number_or_zero(raw.get(fields::SIZE)),
        agent_name: text_or(raw.get(fields::AGENT_NAME), ""),
        owner_name: text_or(raw.get(fields::OWNER_NAME), ""),
        owner_url: text_or(raw.get(fields::OWNER_URL), "#"),
        images: image_refs(raw.get(fields::PROPERTY_IMAGES)),
    }
}

/// Format a price with exactly two decimals and no grouping.
///
/// Accepts numbers, numeric strings, and CRM money strings like `"1500|AED"`.
/// Halves round away from zero, judged on the value as written rather than
/// its binary approximation, so `2.675` becomes `"2.68"`.
pub fn format_price(value: Option<&Value>) -> String {
    let amount = match value {
        Some(Value::Number(n)) => parse_decimal(&n.to_string()),
        Some(Value::String(s)) => s.split('|').next().and_then(|a| parse_decimal(a.trim())),
        _ => None,
    };

    match amount {
        Some(amount) => format!(
            "{:.2}",
            amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        ),
        None => "0.00".to_string(),
    }
}

fn parse_decimal(s: &str) -> Option<Decimal> {
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

/// Only JSON integers are status codes; strings never match
pub fn listing_status(value: Option<&Value>) -> ListingStatus {
    let Some(code) = value.and_then(Value::as_i64) else {
        return ListingStatus::Unknown;
    };

    STATUS_CODES
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, status)| *status)
        .unwrap_or_default()
}

pub fn project_status(value: Option<&Value>) -> ProjectStatus {
    let Some(Value::String(code)) = value else {
        return ProjectStatus::Unspecified;
    };

    PROJECT_STATUS_CODES
        .iter()
        .find(|(known, _)| *known == code.as_str())
        .map(|(_, status)| *status)
        .unwrap_or_default()
}

fn text_or(value: Option<&Value>, default: &str) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => default.to_string(),
    }
}

fn number_or_zero(value: Option<&Value>) -> Number {
    let number = match value {
        Some(Value::Number(n)) => Some(n.clone()),
        Some(Value::String(s)) => parse_number(s.trim()),
        _ => None,
    };
    number.unwrap_or_else(|| Number::from(0))
}

fn parse_number(s: &str) -> Option<Number> {
    if let Ok(int) = s.parse::<i64>() {
        return Some(Number::from(int));
    }
    s.parse::<f64>().ok().and_then(Number::from_f64)
}

fn image_refs(value: Option<&Value>) -> Vec<ImageRef> {
    let Some(Value::Array(images)) = value else {
        return Vec::new();
    };

    images
        .iter()
        .filter_map(|image| image.as_str())
        .map(|url| ImageRef {
            url: url.to_string(),
        })
        .collect()
}
