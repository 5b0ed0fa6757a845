use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AppError, AppResult};

/// Stored restaurant row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Restaurant {
    pub id: i64,
    pub city: String,
    pub name: String,
    pub rating: Option<f64>,
    pub reviews: Option<i64>,
    /// Raw dollar-sign range, e.g. "$$ - $$$"
    pub price_range: Option<String>,
    pub price_min: Option<i32>,
    pub price_max: Option<i32>,
    pub is_sponsored: Option<bool>,
    pub menu_link: Option<String>,
    pub reservation_link: Option<String>,
    pub link: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub featured_image: Option<String>,
    pub has_delivery: Option<bool>,
    pub is_premium: Option<bool>,
    pub cuisines: Option<Value>,
}

impl Restaurant {
    pub fn new(id: i64, city: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id,
            city: city.into(),
            name: name.into(),
            rating: None,
            reviews: None,
            price_range: None,
            price_min: None,
            price_max: None,
            is_sponsored: None,
            menu_link: None,
            reservation_link: None,
            link: String::new(),
            lat: None,
            lng: None,
            featured_image: None,
            has_delivery: None,
            is_premium: None,
            cuisines: None,
        }
    }
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    50
}

/// Paged restaurant filter. Price bounds are in dollar-sign counts ($ = 1, $$ = 2, ...)
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RestaurantFilter {
    pub rating_min: f64,
    pub rating_max: f64,
    #[serde(default)]
    pub price_min: Option<i32>,
    #[serde(default)]
    pub price_max: Option<i32>,
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

impl RestaurantFilter {
    /// Row offset of the requested page.
    ///
    /// Rejects pages or limits below 1, and pages too far out to address.
    pub fn offset(&self) -> AppResult<i64> {
        if self.page < 1 || self.limit < 1 {
            return Err(AppError::InvalidInput(
                "page and limit must be at least 1".to_string(),
            ));
        }

        (self.page - 1).checked_mul(self.limit).ok_or_else(|| {
            AppError::InvalidInput(format!(
                "page {} with limit {} is out of range",
                self.page, self.limit
            ))
        })
    }
}
