use std::collections::BTreeSet;

/// Ratings above this earn a boost
const BOOST_THRESHOLD: f64 = 4.0;
/// Boost per rating point above the threshold
const BOOST_PER_POINT: f64 = 0.1;

/// Full-precision similarity of a candidate to a session profile
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityScore {
    pub score: f64,
    pub matched_highlights: BTreeSet<String>,
}

/// Scores a candidate's highlights against a session's highlights.
///
/// Returns `None` when the two sets share no tag; such a candidate is never
/// recommended, whatever its rating. Otherwise the score is the Jaccard index
/// plus [`rating_boost`].
pub fn score(
    session: &BTreeSet<String>,
    candidate: &BTreeSet<String>,
    rating: Option<f64>,
) -> Option<SimilarityScore> {
    let matched: BTreeSet<String> = session.intersection(candidate).cloned().collect();
    if matched.is_empty() {
        return None;
    }

    // |A ∪ B| = |A| + |B| - |A ∩ B|, always >= 1 here
    let union_size = session.len() + candidate.len() - matched.len();
    let jaccard = matched.len() as f64 / union_size as f64;

    Some(SimilarityScore {
        score: jaccard + rating_boost(rating),
        matched_highlights: matched,
    })
}

/// `max(0, (rating - 4.0) * 0.1)`; unknown ratings get nothing
pub fn rating_boost(rating: Option<f64>) -> f64 {
    rating
        .map(|r| ((r - BOOST_THRESHOLD) * BOOST_PER_POINT).max(0.0))
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(tags: &[&str]) -> BTreeSet<String> {
        tags.iter().map(|t| t.to_string()).collect()
    }

    fn round2(x: f64) -> f64 {
        (x * 100.0).round() / 100.0
    }

    #[test]
    fn test_no_overlap_is_skipped_even_with_top_rating() {
        let session = set(&["pool", "spa"]);
        let candidate = set(&["gym"]);
        assert_eq!(score(&session, &candidate, Some(5.0)), None);
    }

    #[test]
    fn test_partial_overlap_with_boost() {
        let session = set(&["pool", "spa", "breakfast"]);
        let result = score(&session, &set(&["pool", "spa"]), Some(4.5)).unwrap();

        assert!((result.score - (2.0 / 3.0 + 0.05)).abs() < 1e-9);
        assert_eq!(round2(result.score), 0.72);
        assert_eq!(result.matched_highlights, set(&["pool", "spa"]));
    }

    #[test]
    fn test_low_rating_gets_no_boost() {
        let session = set(&["pool", "spa", "breakfast"]);
        let result = score(&session, &set(&["pool"]), Some(3.0)).unwrap();

        assert_eq!(round2(result.score), 0.33);
        assert_eq!(result.matched_highlights, set(&["pool"]));
    }

    #[test]
    fn test_union_counts_candidate_only_tags() {
        let session = set(&["pool"]);
        let result = score(&session, &set(&["pool", "gym", "bar"]), None).unwrap();
        assert!((result.score - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_identical_sets_score_one_plus_boost() {
        let tags = set(&["pool", "spa"]);
        let result = score(&tags, &tags, Some(5.0)).unwrap();
        assert!((result.score - 1.1).abs() < 1e-9);
    }

    #[test]
    fn test_rating_boost() {
        assert_eq!(rating_boost(None), 0.0);
        assert_eq!(rating_boost(Some(4.0)), 0.0);
        assert_eq!(rating_boost(Some(2.5)), 0.0);
        assert!((rating_boost(Some(5.0)) - 0.1).abs() < 1e-9);
        assert!((rating_boost(Some(4.5)) - 0.05).abs() < 1e-9);
    }
}
