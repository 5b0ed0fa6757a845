use std::cmp::Ordering;

use crate::{
    db::{ClickStore, HotelStore},
    error::{AppError, AppResult},
    models::{ClickedHotel, Hotel, Recommendation, SessionHighlightProfile},
    services::{highlights::extract_highlights, similarity},
};

/// Records a hotel click for a session. Idempotent per (session, hotel).
pub async fn log_click(clicks: &dyn ClickStore, session_id: &str, hotel_id: i64) -> AppResult<()> {
    clicks.log_click(session_id, hotel_id).await?;

    tracing::info!(session_id = %session_id, hotel_id, "Click logged");

    Ok(())
}

/// Aggregates every hotel a session has clicked into one highlight profile
pub async fn session_profile(
    clicks: &dyn ClickStore,
    session_id: &str,
) -> AppResult<SessionHighlightProfile> {
    let clicked = clicks.clicked_hotels(session_id).await?;
    Ok(build_profile(clicked))
}

pub fn build_profile(clicked: Vec<ClickedHotel>) -> SessionHighlightProfile {
    let mut profile = SessionHighlightProfile::default();

    for hotel in clicked {
        profile.clicked_ids.insert(hotel.hotel_id);
        profile
            .highlight_set
            .extend(extract_highlights(hotel.highlights.as_ref()));
    }

    profile
}

/// Recommends same-city hotels whose highlights overlap the session's clicks.
///
/// Sessions without clicks, or whose clicked hotels have no highlights, get an
/// empty result without the candidate scan.
pub async fn recommend(
    clicks: &dyn ClickStore,
    hotels: &dyn HotelStore,
    session_id: &str,
    city: &str,
    limit: i64,
) -> AppResult<Vec<Recommendation>> {
    if limit < 1 {
        return Err(AppError::InvalidInput(format!(
            "limit must be at least 1, got {}",
            limit
        )));
    }

    let profile = session_profile(clicks, session_id).await?;
    if profile.is_empty() {
        tracing::info!(
            session_id = %session_id,
            clicked = profile.clicked_ids.len(),
            "Empty session profile, nothing to recommend"
        );
        return Ok(Vec::new());
    }

    let candidates = hotels.hotels_with_highlights(city).await?;
    let candidate_count = candidates.len();
    let limit = usize::try_from(limit).unwrap_or(usize::MAX);
    let recommendations = rank_candidates(&profile, candidates, limit);

    tracing::info!(
        session_id = %session_id,
        city = %city,
        profile_highlights = profile.highlight_set.len(),
        candidates = candidate_count,
        returned = recommendations.len(),
        "Recommendations computed"
    );

    Ok(recommendations)
}

/// Scores candidates against a profile, best first, truncated to `limit`.
///
/// Clicked hotels and hotels sharing no highlight are dropped. Ordering uses
/// the unrounded score; equal scores fall back to ascending hotel id.
pub fn rank_candidates(
    profile: &SessionHighlightProfile,
    candidates: Vec<Hotel>,
    limit: usize,
) -> Vec<Recommendation> {
    let mut scored: Vec<Recommendation> = candidates
        .into_iter()
        .filter(|hotel| !profile.clicked_ids.contains(&hotel.id))
        .filter_map(|hotel| {
            let highlights = extract_highlights(hotel.highlights.as_ref());
            let similarity = similarity::score(&profile.highlight_set, &highlights, hotel.rating)?;

            Some(Recommendation {
                id: hotel.id,
                name: hotel.name,
                rating: hotel.rating,
                price_avg: hotel.price_avg,
                link: hotel.link,
                featured_image: hotel.featured_image,
                similarity_score: similarity.score,
                matched_highlights: similarity.matched_highlights,
            })
        })
        .collect();

    scored.sort_by(by_score_then_id);
    scored.truncate(limit);
    scored
}

fn by_score_then_id(a: &Recommendation, b: &Recommendation) -> Ordering {
    b.similarity_score
        .total_cmp(&a.similarity_score)
        .then_with(|| a.id.cmp(&b.id))
}
