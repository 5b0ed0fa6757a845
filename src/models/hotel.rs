use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::services::highlights::extract_highlights;

/// Stored hotel row, as written by ingestion and read by listings and recommendations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Hotel {
    pub id: i64,
    pub city: String,
    pub name: String,
    pub rating: Option<f64>,
    pub address: Option<String>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    pub price_avg: Option<f64>,
    pub link: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub reviews: Option<i64>,
    pub phone: Option<String>,
    pub detailed_address: Option<Value>,
    pub ranking: Option<Value>,
    pub featured_image: Option<String>,
    /// Free-text tags; may be a JSON list or a JSON-encoded string of one
    pub highlights: Option<Value>,
    pub providers: Option<Value>,
}

impl Hotel {
    /// Minimal hotel with every optional attribute unset
    pub fn new(id: i64, city: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id,
            city: city.into(),
            name: name.into(),
            rating: None,
            address: None,
            price_min: None,
            price_max: None,
            price_avg: None,
            link: String::new(),
            lat: None,
            lng: None,
            reviews: None,
            phone: None,
            detailed_address: None,
            ranking: None,
            featured_image: None,
            highlights: None,
            providers: None,
        }
    }
}

/// Rating and optional price bounds shared by the hotel listing endpoints
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HotelFilter {
    pub rating_min: f64,
    pub rating_max: f64,
    #[serde(default)]
    pub price_min: Option<f64>,
    #[serde(default)]
    pub price_max: Option<f64>,
}

/// Hotel as returned by the listing endpoints
#[derive(Debug, Clone, Serialize)]
pub struct HotelListing {
    pub id: i64,
    pub name: String,
    pub rating: Option<f64>,
    pub address: Option<String>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    pub price_avg: Option<f64>,
    pub link: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub city: String,
    pub reviews: Option<i64>,
    pub phone: Option<String>,
    pub detailed_address: Option<Value>,
    pub ranking: Option<Value>,
    pub featured_image: Option<String>,
    pub highlights: Vec<String>,
    pub providers: Option<Value>,
}

impl From<Hotel> for HotelListing {
    fn from(hotel: Hotel) -> Self {
        let highlights = extract_highlights(hotel.highlights.as_ref())
            .into_iter()
            .collect();

        Self {
            id: hotel.id,
            name: hotel.name,
            // Unrated listings come back from the scraper as 0
            rating: hotel.rating.filter(|r| *r != 0.0).map(round_rating),
            address: hotel.address,
            price_min: hotel.price_min,
            price_max: hotel.price_max,
            price_avg: hotel.price_avg,
            link: hotel.link,
            lat: hotel.lat,
            lng: hotel.lng,
            city: hotel.city,
            reviews: hotel.reviews,
            phone: hotel.phone,
            detailed_address: hotel.detailed_address,
            ranking: hotel.ranking,
            featured_image: hotel.featured_image,
            highlights,
            providers: hotel.providers,
        }
    }
}

/// Rounds for display, resolving exact binary ties to the even digit
pub fn round_display(value: f64, decimals: usize) -> f64 {
    format!("{:.*}", decimals, value).parse().unwrap_or(value)
}

/// Ratings are presented with one decimal
pub fn round_rating(rating: f64) -> f64 {
    round_display(rating, 1)
}
