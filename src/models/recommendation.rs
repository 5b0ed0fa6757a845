use std::collections::{BTreeSet, HashSet};

use serde::Serialize;

use super::hotel::{round_display, round_rating};

/// Highlights and hotel ids accumulated from every click of one session.
///
/// Derived per request and never persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionHighlightProfile {
    pub highlight_set: BTreeSet<String>,
    pub clicked_ids: HashSet<i64>,
}

impl SessionHighlightProfile {
    /// No clicks, or clicks whose hotels carry no highlights at all
    pub fn is_empty(&self) -> bool {
        self.clicked_ids.is_empty() || self.highlight_set.is_empty()
    }
}

/// A scored candidate hotel. `similarity_score` keeps full precision.
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub id: i64,
    pub name: String,
    pub rating: Option<f64>,
    pub price_avg: Option<f64>,
    pub link: String,
    pub featured_image: Option<String>,
    pub similarity_score: f64,
    pub matched_highlights: BTreeSet<String>,
}

/// Wire form of a recommendation
#[derive(Debug, Clone, Serialize)]
pub struct RecommendationResponse {
    pub id: i64,
    pub name: String,
    pub rating: Option<f64>,
    pub price_avg: Option<i64>,
    pub link: String,
    pub featured_image: Option<String>,
    pub similarity_score: f64,
    pub matched_highlights: Vec<String>,
}

impl From<Recommendation> for RecommendationResponse {
    fn from(rec: Recommendation) -> Self {
        Self {
            id: rec.id,
            name: rec.name,
            rating: rec.rating.map(round_rating),
            price_avg: rec.price_avg.map(|p| p.trunc() as i64),
            link: rec.link,
            featured_image: rec.featured_image,
            similarity_score: round_display(rec.similarity_score, 2),
            matched_highlights: rec.matched_highlights.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_without_clicks_is_empty() {
        let profile = SessionHighlightProfile::default();
        assert!(profile.is_empty());
    }

    #[test]
    fn test_profile_with_clicks_but_no_highlights_is_empty() {
        let profile = SessionHighlightProfile {
            highlight_set: BTreeSet::new(),
            clicked_ids: HashSet::from([1, 2]),
        };
        assert!(profile.is_empty());
    }

    #[test]
    fn test_response_rounds_for_presentation() {
        let rec = Recommendation {
            id: 3,
            name: "Hotel Azure".to_string(),
            rating: Some(4.46),
            price_avg: Some(189.9),
            link: "https://example.com/h/3".to_string(),
            featured_image: None,
            similarity_score: 2.0 / 3.0 + 0.05,
            matched_highlights: BTreeSet::from(["spa".to_string(), "pool".to_string()]),
        };

        let response = RecommendationResponse::from(rec);
        assert_eq!(response.rating, Some(4.5));
        assert_eq!(response.price_avg, Some(189));
        assert_eq!(response.similarity_score, 0.72);
        assert_eq!(response.matched_highlights, vec!["pool", "spa"]);
    }

    #[test]
    fn test_response_rounds_exact_ties_to_even() {
        let rec = Recommendation {
            id: 8,
            name: "Hotel Octo".to_string(),
            rating: Some(4.25),
            price_avg: None,
            link: String::new(),
            featured_image: None,
            similarity_score: 1.0 / 8.0,
            matched_highlights: BTreeSet::from(["pool".to_string()]),
        };

        let response = RecommendationResponse::from(rec);
        assert_eq!(response.similarity_score, 0.12);
        assert_eq!(response.rating, Some(4.2));
        assert_eq!(response.price_avg, None);
    }
}
