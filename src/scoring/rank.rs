use std::cmp::Ordering;

use crate::scoring::SuitabilityScore;

/// Names compare by byte order, so non-ASCII initials sort after ASCII ones.
pub fn compare_scores(a: &SuitabilityScore, b: &SuitabilityScore) -> Ordering {
    b.composite_score
        .total_cmp(&a.composite_score)
        .then_with(|| b.appointment_count.cmp(&a.appointment_count))
        .then_with(|| a.district.cmp(&b.district))
}

pub fn rank_scores(mut scores: Vec<SuitabilityScore>, top_n: Option<usize>) -> Vec<SuitabilityScore> {
    scores.sort_by(compare_scores);
    if let Some(n) = top_n {
        scores.truncate(n);
    }
    scores
}
