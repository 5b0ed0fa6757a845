use std::collections::BTreeMap;
use std::fmt::Display;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// TripAdvisor scraper payloads
// ============================================================================

/// Which listing collection of the scraper API is being paged through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingKind {
    Hotels,
    Restaurants,
}

impl ListingKind {
    /// Path of the list endpoint, relative to the API base URL
    pub fn path(&self) -> &'static str {
        match self {
            ListingKind::Hotels => "hotels/list",
            ListingKind::Restaurants => "restaurants/list",
        }
    }

    /// Hard page cap, independent of what the API reports
    pub fn max_pages(&self) -> Option<u32> {
        match self {
            ListingKind::Hotels => None,
            ListingKind::Restaurants => Some(50),
        }
    }

    /// Fields checked, in order, for a listing's id
    fn id_fields(&self) -> &'static [&'static str] {
        match self {
            ListingKind::Hotels => &["id", "location_id", "hotel_id", "hotelId"],
            ListingKind::Restaurants => &["id", "location_id"],
        }
    }

    /// Extracts the integer id of a raw listing, if it has one
    pub fn listing_id(&self, listing: &Value) -> Option<i64> {
        let raw = self
            .id_fields()
            .iter()
            .filter_map(|field| listing.get(*field))
            .find(|v| is_truthy(v))?;

        match raw {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl Display for ListingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListingKind::Hotels => write!(f, "hotels"),
            ListingKind::Restaurants => write!(f, "restaurants"),
        }
    }
}

/// All listings fetched for one city, keyed by listing id
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScrapedListings {
    pub city: String,
    pub by_id: BTreeMap<i64, Value>,
}

impl ScrapedListings {
    pub fn new(city: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            by_id: BTreeMap::new(),
        }
    }

    pub fn count(&self) -> usize {
        self.by_id.len()
    }
}

/// Result entries of one page. The API has been seen returning a bare list,
/// `results`, `data.results` and `items`.
pub fn page_results(payload: &Value) -> Vec<Value> {
    if let Value::Array(items) = payload {
        return items.clone();
    }

    [
        payload.get("results"),
        payload.get("data").and_then(|d| d.get("results")),
        payload.get("items"),
    ]
    .into_iter()
    .flatten()
    .find(|v| is_truthy(v))
    .and_then(Value::as_array)
    .cloned()
    .unwrap_or_default()
}

/// Total page count reported by a page, defaulting to 1
pub fn page_total(payload: &Value) -> u32 {
    [
        payload.get("total_pages"),
        payload.get("pagination").and_then(|p| p.get("total_pages")),
    ]
    .into_iter()
    .flatten()
    .filter_map(Value::as_u64)
    .find(|n| *n > 0)
    .map(|n| n.min(u32::MAX as u64) as u32)
    .unwrap_or(1)
}

/// Null, false, zero, "" and empty containers count as missing
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
