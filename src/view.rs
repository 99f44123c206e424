use serde::Serialize;

use crate::scoring::{RiskBand, SuitabilityScore};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
    pub color: &'static str,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ScoreCard {
    pub title: String,
    pub score: f64,
    pub band: RiskBand,
    pub color: &'static str,
    pub tooltip: String,
}

pub fn band_color(band: RiskBand) -> &'static str {
    match band {
        RiskBand::Low => "#2e7d32",
        RiskBand::Medium => "#f9a825",
        RiskBand::High => "#c62828",
    }
}

pub fn chart_points(ranked: &[SuitabilityScore]) -> Vec<ChartPoint> {
    ranked
        .iter()
        .map(|s| ChartPoint {
            label: s.district.clone(),
            value: round_to(s.composite_score, 1),
            color: band_color(s.risk),
        })
        .collect()
}

pub fn score_cards(ranked: &[SuitabilityScore]) -> Vec<ScoreCard> {
    ranked
        .iter()
        .enumerate()
        .map(|(idx, s)| ScoreCard {
            title: format!("#{} {}", idx + 1, s.district),
            score: round_to(s.composite_score, 1),
            band: s.risk,
            color: band_color(s.risk),
            tooltip: format!(
                "Demand {:.0} · Revenue {:.0} · Competition {:.0} · {} appointments",
                s.demand_score, s.revenue_score, s.competition_score, s.appointment_count
            ),
        })
        .collect()
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
