use crate::aggregate::DistrictMetric;
use crate::scoring::normalize::{column_max, normalize, normalize_percent};
use crate::scoring::{ScoringConfig, ScoringWeights, SuitabilityScore};

const COMPOSITE_SCALE: f64 = 1e6;

/// Weighted sum of component scores, quantized to 1e-6 and clamped to [0, 100].
/// Equal sums compare equal, so ties fall through to the ranking tie-breaks.
pub fn composite_score(weights: &ScoringWeights, demand: f64, revenue: f64, competition: f64) -> f64 {
    let raw =
        weights.demand * demand + weights.revenue * revenue + weights.competition * competition;
    normalize_percent((raw * COMPOSITE_SCALE).round() / COMPOSITE_SCALE)
}

pub fn score_districts(metrics: &[DistrictMetric], config: &ScoringConfig) -> Vec<SuitabilityScore> {
    let scored: Vec<&DistrictMetric> = metrics.iter().filter(|m| m.is_scored()).collect();

    let max_appointments = column_max(scored.iter().map(|m| m.appointment_count as f64));
    let max_revenue = column_max(scored.iter().map(|m| m.average_revenue));
    let max_competitors = column_max(scored.iter().map(|m| m.competitor_count as f64));

    scored
        .into_iter()
        .map(|metric| {
            let demand_score = normalize(metric.appointment_count as f64, max_appointments);
            let revenue_score = normalize(metric.average_revenue, max_revenue);
            let competition_score =
                100.0 - normalize(metric.competitor_count as f64, max_competitors);
            let composite =
                composite_score(&config.weights, demand_score, revenue_score, competition_score);
            SuitabilityScore {
                district: metric.district.clone(),
                kind: metric.kind,
                demand_score,
                revenue_score,
                competition_score,
                composite_score: composite,
                appointment_count: metric.appointment_count,
                risk: config.risk.band(composite),
            }
        })
        .collect()
}
