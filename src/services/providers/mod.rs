//! Listing data providers
//!
//! Sources of raw hotel and restaurant listings for ingestion. Each provider
//! pages through its upstream API and returns every listing for a city keyed
//! by listing id.

use crate::{error::AppResult, models::ScrapedListings};

pub mod tripadvisor;

pub use tripadvisor::TripAdvisorSource;

/// Trait for listing providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ListingSource: Send + Sync {
    /// Fetch every hotel listed for a city
    async fn fetch_hotels(&self, city: &str) -> AppResult<ScrapedListings>;

    /// Fetch restaurants listed for a city, up to the provider's page cap
    async fn fetch_restaurants(&self, city: &str) -> AppResult<ScrapedListings>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
