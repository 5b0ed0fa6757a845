use serde_json::{json, Value};

use crate::{
    db::{HotelStore, RestaurantStore},
    error::AppResult,
    models::{listing::is_truthy, Hotel, Restaurant, ScrapedListings},
    services::providers::ListingSource,
};

/// Fetches every hotel page for `city` and upserts the results.
///
/// Returns the number of distinct hotels fetched.
pub async fn ingest_hotels(
    source: &dyn ListingSource,
    store: &dyn HotelStore,
    city: &str,
) -> AppResult<usize> {
    let listings = source.fetch_hotels(city).await?;
    let hotels = hotels_from_listings(&listings);
    let written = store.upsert_hotels(&hotels).await?;

    tracing::info!(
        city = %city,
        provider = source.name(),
        fetched = listings.count(),
        written,
        "Saved hotels"
    );

    Ok(listings.count())
}

/// Fetches restaurant pages for `city` and upserts the results
pub async fn ingest_restaurants(
    source: &dyn ListingSource,
    store: &dyn RestaurantStore,
    city: &str,
) -> AppResult<usize> {
    let listings = source.fetch_restaurants(city).await?;
    let restaurants = restaurants_from_listings(&listings);
    let written = store.upsert_restaurants(&restaurants).await?;

    tracing::info!(
        city = %city,
        provider = source.name(),
        fetched = listings.count(),
        written,
        "Saved restaurants"
    );

    Ok(listings.count())
}

pub fn hotels_from_listings(listings: &ScrapedListings) -> Vec<Hotel> {
    listings
        .by_id
        .iter()
        .map(|(id, raw)| hotel_from_raw(*id, &listings.city, raw))
        .collect()
}

pub fn restaurants_from_listings(listings: &ScrapedListings) -> Vec<Restaurant> {
    listings
        .by_id
        .iter()
        .map(|(id, raw)| restaurant_from_raw(*id, &listings.city, raw))
        .collect()
}

/// Maps one scraped hotel onto a row. `city` is the requested city, verbatim.
pub fn hotel_from_raw(id: i64, city: &str, raw: &Value) -> Hotel {
    let price_range = raw.get("price_range_usd");
    let price_min = price_range.and_then(|p| f64_field(p, "min"));
    let price_max = price_range.and_then(|p| f64_field(p, "max"));
    // Zero bounds are treated as unknown
    let price_avg = match (price_min, price_max) {
        (Some(min), Some(max)) if min != 0.0 && max != 0.0 => Some((min + max) / 2.0),
        _ => None,
    };

    Hotel {
        id,
        city: city.to_string(),
        name: str_field(raw, "name").unwrap_or_default(),
        rating: f64_field(raw, "rating"),
        address: str_field(raw, "address"),
        price_min,
        price_max,
        price_avg,
        link: str_field(raw, "link").unwrap_or_default(),
        lat: f64_field(raw, "latitude"),
        lng: f64_field(raw, "longitude"),
        reviews: i64_field(raw, "reviews"),
        phone: str_field(raw, "phone"),
        detailed_address: json_field(raw, "detailed_address"),
        ranking: json_field(raw, "ranking"),
        featured_image: str_field(raw, "featured_image"),
        highlights: Some(list_field(raw, "highlights")),
        providers: Some(list_field(raw, "providers")),
    }
}

pub fn restaurant_from_raw(id: i64, city: &str, raw: &Value) -> Restaurant {
    let price_range = str_field(raw, "price_range_usd");
    let (price_min, price_max) = parse_price_range(price_range.as_deref());

    Restaurant {
        id,
        city: city.to_string(),
        name: str_field(raw, "name").unwrap_or_default(),
        rating: f64_field(raw, "rating"),
        reviews: i64_field(raw, "reviews"),
        price_range,
        price_min,
        price_max,
        is_sponsored: bool_field(raw, "is_sponsored"),
        menu_link: str_field(raw, "menu_link"),
        reservation_link: str_field(raw, "reservation_link"),
        link: str_field(raw, "link").unwrap_or_default(),
        lat: f64_field(raw, "latitude"),
        lng: f64_field(raw, "longitude"),
        featured_image: str_field(raw, "featured_image"),
        has_delivery: bool_field(raw, "has_delivery"),
        is_premium: bool_field(raw, "is_premium"),
        cuisines: Some(list_field(raw, "cuisines")),
    }
}

/// Converts a dollar-sign range into numeric bounds.
///
/// `"$$ - $$$"` gives `(2, 3)`, a single `"$$"` gives `(2, 2)`.
pub fn parse_price_range(price_range: Option<&str>) -> (Option<i32>, Option<i32>) {
    let Some(range) = price_range.filter(|s| !s.is_empty()) else {
        return (None, None);
    };

    let level = |s: &str| i32::try_from(s.chars().count()).ok();

    match range.split_once(" - ") {
        Some((low, high)) => (level(low), level(high)),
        None => (level(range), level(range)),
    }
}

fn str_field(raw: &Value, key: &str) -> Option<String> {
    raw.get(key).and_then(Value::as_str).map(str::to_string)
}

fn f64_field(raw: &Value, key: &str) -> Option<f64> {
    raw.get(key).and_then(Value::as_f64)
}

fn i64_field(raw: &Value, key: &str) -> Option<i64> {
    let value = raw.get(key)?;
    value
        .as_i64()
        .or_else(|| value.as_f64().map(|f| f as i64))
}

fn bool_field(raw: &Value, key: &str) -> Option<bool> {
    raw.get(key).and_then(Value::as_bool)
}

fn json_field(raw: &Value, key: &str) -> Option<Value> {
    raw.get(key).filter(|v| !v.is_null()).cloned()
}

/// A list-valued field, `[]` when missing or empty
fn list_field(raw: &Value, key: &str) -> Value {
    raw.get(key)
        .filter(|v| is_truthy(v))
        .cloned()
        .unwrap_or_else(|| json!([]))
}
