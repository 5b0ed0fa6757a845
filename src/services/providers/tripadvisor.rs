//! TripAdvisor scraper provider (RapidAPI)
//!
//! Pages through `/hotels/list` and `/restaurants/list` for a city query.
//! Raw pages are cached in Redis for an hour, so a re-run shortly after a
//! failed ingestion does not spend quota on pages already fetched.

use std::time::Duration;

use reqwest::Client as HttpClient;
use serde_json::Value;

use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{
        listing::{page_results, page_total},
        ListingKind, ScrapedListings,
    },
    services::providers::ListingSource,
};

const PAGE_CACHE_TTL: u64 = 3600; // 1 hour
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Whether another page should be requested
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOutcome {
    Continue,
    Done,
}

#[derive(Clone)]
pub struct TripAdvisorSource {
    http_client: HttpClient,
    api_key: Option<String>,
    api_url: String,
    api_host: String,
    cache: Cache,
}

impl TripAdvisorSource {
    pub fn new(
        cache: Cache,
        api_key: Option<String>,
        api_url: String,
        api_host: String,
    ) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            http_client,
            api_key,
            api_url,
            api_host,
            cache,
        })
    }

    fn api_key(&self) -> AppResult<&str> {
        self.api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| AppError::Internal("Missing API_KEY in environment".to_string()))
    }

    /// Requests pages until one comes back empty or the last page is reached
    async fn fetch_all(&self, kind: ListingKind, city: &str) -> AppResult<ScrapedListings> {
        self.api_key()?;

        let mut listings = ScrapedListings::new(city);
        let mut page = 1;

        loop {
            tracing::info!(kind = %kind, city = %city, page, "Fetching listing page");

            let payload = self.fetch_page(kind, city, page).await?;
            if absorb_page(kind, page, &payload, &mut listings) == PageOutcome::Done {
                break;
            }
            page += 1;
        }

        tracing::info!(
            kind = %kind,
            city = %city,
            pages = page,
            listings = listings.count(),
            provider = "tripadvisor",
            "Listing fetch completed"
        );

        Ok(listings)
    }

    async fn fetch_page(&self, kind: ListingKind, city: &str, page: u32) -> AppResult<Value> {
        cached!(
            self.cache,
            CacheKey::ListingPage {
                kind,
                city: city.to_string(),
                page,
            },
            PAGE_CACHE_TTL,
            async move {
                let url = format!("{}/{}", self.api_url.trim_end_matches('/'), kind.path());
                let page_param = page.to_string();

                let response = self
                    .http_client
                    .get(&url)
                    .header("X-RapidAPI-Key", self.api_key()?)
                    .header("X-RapidAPI-Host", &self.api_host)
                    .query(&[("query", city), ("page", page_param.as_str())])
                    .send()
                    .await?;

                if !response.status().is_success() {
                    let status = response.status();
                    let body = response.text().await.unwrap_or_default();
                    tracing::error!(
                        kind = %kind,
                        city = %city,
                        page,
                        status = %status,
                        body = %body,
                        "TripAdvisor request failed"
                    );
                    return Err(AppError::ExternalApi(format!(
                        "TripAdvisor API returned status {}: {}",
                        status, body
                    )));
                }

                let payload: Value = response.json().await?;
                Ok(payload)
            }
        )
    }
}

/// Adds one page's listings to `listings` and decides whether to keep paging.
///
/// Listings without an integer id are skipped. A later page overwrites an
/// earlier entry with the same id.
pub fn absorb_page(
    kind: ListingKind,
    page: u32,
    payload: &Value,
    listings: &mut ScrapedListings,
) -> PageOutcome {
    let results = page_results(payload);
    if results.is_empty() {
        return PageOutcome::Done;
    }

    for listing in results {
        match kind.listing_id(&listing) {
            Some(id) => {
                listings.by_id.insert(id, listing);
            }
            None => tracing::warn!(kind = %kind, page, "Skipping listing without usable id"),
        }
    }

    let past_total = page >= page_total(payload);
    let past_cap = kind.max_pages().is_some_and(|max| page >= max);

    if past_total || past_cap {
        PageOutcome::Done
    } else {
        PageOutcome::Continue
    }
}

#[async_trait::async_trait]
impl ListingSource for TripAdvisorSource {
    async fn fetch_hotels(&self, city: &str) -> AppResult<ScrapedListings> {
        self.fetch_all(ListingKind::Hotels, city).await
    }

    async fn fetch_restaurants(&self, city: &str) -> AppResult<ScrapedListings> {
        self.fetch_all(ListingKind::Restaurants, city).await
    }

    fn name(&self) -> &'static str {
        "tripadvisor"
    }
}
