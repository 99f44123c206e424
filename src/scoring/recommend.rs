use serde::{Deserialize, Serialize};

use crate::aggregate::DistrictKind;
use crate::scoring::{RiskBand, SuitabilityScore};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub priority: usize,
    pub district: String,
    pub title: String,
    pub rationale: String,
    pub composite_score: f64,
    pub risk: RiskBand,
}

pub fn build_recommendations(ranked: &[SuitabilityScore], max_items: usize) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();
    let mut rank = 1usize;

    let candidates = ranked
        .iter()
        .filter(|s| s.kind == DistrictKind::Listed)
        .filter(|s| s.risk != RiskBand::High);
    for score in candidates.take(max_items) {
        recommendations.push(Recommendation {
            priority: rank,
            district: score.district.clone(),
            title: format!("Expand in {}", score.district),
            rationale: format!(
                "Composite {:.1} ({} risk): demand {:.0}, revenue {:.0}, competition {:.0}.",
                score.composite_score,
                score.risk,
                score.demand_score,
                score.revenue_score,
                score.competition_score
            ),
            composite_score: score.composite_score,
            risk: score.risk,
        });
        rank += 1;
    }

    let remaining = max_items.saturating_sub(recommendations.len());
    let avoid = ranked
        .iter()
        .rev()
        .filter(|s| s.kind == DistrictKind::Listed && s.risk == RiskBand::High);
    for score in avoid.take(remaining) {
        recommendations.push(Recommendation {
            priority: rank,
            district: score.district.clone(),
            title: format!("Avoid {}", score.district),
            rationale: format!(
                "Composite {:.1} is below the medium-risk floor: demand {:.0}, competition {:.0}.",
                score.composite_score,
                score.demand_score,
                score.competition_score
            ),
            composite_score: score.composite_score,
            risk: score.risk,
        });
        rank += 1;
    }

    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(name: &str, composite: f64, risk: RiskBand, kind: DistrictKind) -> SuitabilityScore {
        SuitabilityScore {
            district: name.to_string(),
            kind,
            demand_score: 50.0,
            revenue_score: 50.0,
            competition_score: 50.0,
            composite_score: composite,
            appointment_count: 1,
            risk,
        }
    }

    #[test]
    fn targets_come_before_warnings() {
        let ranked = vec![
            score("Konak", 88.0, RiskBand::Low, DistrictKind::Listed),
            score("Other Districts", 60.0, RiskBand::Medium, DistrictKind::Other),
            score("Buca", 55.0, RiskBand::Medium, DistrictKind::Listed),
            score("Gaziemir", 20.0, RiskBand::High, DistrictKind::Listed),
            score("Çiğli", 12.0, RiskBand::High, DistrictKind::Listed),
        ];
        let recs = build_recommendations(&ranked, 3);
        assert_eq!(recs.len(), 3);
        assert_eq!(recs[0].title, "Expand in Konak");
        assert_eq!(recs[1].district, "Buca");
        // weakest district is warned about first
        assert_eq!(recs[2].title, "Avoid Çiğli");
        assert_eq!(recs.iter().map(|r| r.priority).collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn empty_ranking_has_no_recommendations() {
        assert!(build_recommendations(&[], 5).is_empty());
    }
}
