pub mod normalize;
pub mod rank;
pub mod recommend;
pub mod score;

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::aggregate::{DistrictKind, DistrictMetric};

pub use normalize::{normalize, normalize_percent};
pub use rank::{compare_scores, rank_scores};
pub use recommend::{build_recommendations, Recommendation};
pub use score::{composite_score, score_districts};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScoringWeights {
    pub demand: f64,
    pub revenue: f64,
    pub competition: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            demand: 0.35,
            revenue: 0.40,
            competition: 0.25,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum WeightsError {
    #[error("weight {name} must be a finite, non-negative number (got {value})")]
    Invalid { name: &'static str, value: f64 },
    #[error("weights sum to {0:.4}, which exceeds 1.0")]
    SumTooLarge(f64),
}

impl ScoringWeights {
    pub fn sum(&self) -> f64 {
        self.demand + self.revenue + self.competition
    }

    pub fn validate(&self) -> Result<(), WeightsError> {
        for (name, value) in [
            ("demand", self.demand),
            ("revenue", self.revenue),
            ("competition", self.competition),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(WeightsError::Invalid { name, value });
            }
        }
        // small tolerance for decimal literals like 0.35 + 0.40 + 0.25
        if self.sum() > 1.0 + 1e-9 {
            return Err(WeightsError::SumTooLarge(self.sum()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RiskThresholds {
    #[serde(default = "default_low_risk_min")]
    pub low_risk_min: f64,
    #[serde(default = "default_medium_risk_min")]
    pub medium_risk_min: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            low_risk_min: default_low_risk_min(),
            medium_risk_min: default_medium_risk_min(),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ThresholdsError {
    #[error("risk threshold {name} must be a number within 0..=100 (got {value})")]
    OutOfRange { name: &'static str, value: f64 },
    #[error("medium_risk_min ({medium}) exceeds low_risk_min ({low})")]
    Inverted { low: f64, medium: f64 },
}

impl RiskThresholds {
    pub fn validate(&self) -> Result<(), ThresholdsError> {
        for (name, value) in [
            ("low_risk_min", self.low_risk_min),
            ("medium_risk_min", self.medium_risk_min),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(ThresholdsError::OutOfRange { name, value });
            }
        }
        if self.medium_risk_min > self.low_risk_min {
            return Err(ThresholdsError::Inverted {
                low: self.low_risk_min,
                medium: self.medium_risk_min,
            });
        }
        Ok(())
    }

    pub fn band(&self, composite: f64) -> RiskBand {
        if composite >= self.low_risk_min {
            RiskBand::Low
        } else if composite >= self.medium_risk_min {
            RiskBand::Medium
        } else {
            RiskBand::High
        }
    }
}

fn default_low_risk_min() -> f64 {
    70.0
}

fn default_medium_risk_min() -> f64 {
    40.0
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RiskBand {
    Low,
    Medium,
    High,
}

impl Display for RiskBand {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        };
        write!(f, "{label}")
    }
}

/// Fixed values reported for districts outside the main list. These are a
/// business policy, not measurements.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OtherBucket {
    #[serde(default = "default_other_label")]
    pub label: String,
    #[serde(default = "default_other_customers")]
    pub customer_count: u64,
    #[serde(default = "default_other_appointments")]
    pub appointment_count: u64,
    #[serde(default)]
    pub competitor_count: u64,
    #[serde(default)]
    pub average_revenue: f64,
}

impl Default for OtherBucket {
    fn default() -> Self {
        Self {
            label: default_other_label(),
            customer_count: default_other_customers(),
            appointment_count: default_other_appointments(),
            competitor_count: 0,
            average_revenue: 0.0,
        }
    }
}

impl OtherBucket {
    pub fn as_metric(&self) -> DistrictMetric {
        DistrictMetric {
            district: self.label.clone(),
            kind: DistrictKind::Other,
            customer_count: self.customer_count,
            appointment_count: self.appointment_count,
            competitor_count: self.competitor_count,
            total_revenue: self.average_revenue * self.appointment_count as f64,
            average_revenue: self.average_revenue,
        }
    }
}

fn default_other_label() -> String {
    "Other Districts".to_string()
}

fn default_other_customers() -> u64 {
    15
}

fn default_other_appointments() -> u64 {
    20
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoringConfig {
    pub weights: ScoringWeights,
    pub risk: RiskThresholds,
    pub main_districts: Vec<String>,
    pub other: OtherBucket,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        crate::config::Config::default().scoring_config()
    }
}

impl ScoringConfig {
    pub fn unrestricted() -> Self {
        Self {
            main_districts: Vec::new(),
            ..Self::default()
        }
    }

    pub fn is_main_district(&self, name: &str) -> bool {
        if self.main_districts.is_empty() {
            return true;
        }
        let needle = name.trim().to_lowercase();
        self.main_districts
            .iter()
            .any(|m| m.trim().to_lowercase() == needle)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SuitabilityScore {
    pub district: String,
    pub kind: DistrictKind,
    pub demand_score: f64,
    pub revenue_score: f64,
    pub competition_score: f64,
    pub composite_score: f64,
    pub appointment_count: u64,
    pub risk: RiskBand,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_weights_are_valid() {
        let weights = ScoringWeights::default();
        assert!(weights.validate().is_ok());
        assert!((weights.sum() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn invalid_weights_are_rejected() {
        let negative = ScoringWeights {
            demand: -0.1,
            ..ScoringWeights::default()
        };
        assert_eq!(
            negative.validate(),
            Err(WeightsError::Invalid {
                name: "demand",
                value: -0.1
            })
        );
        let heavy = ScoringWeights {
            demand: 0.9,
            revenue: 0.9,
            competition: 0.0,
        };
        assert!(matches!(heavy.validate(), Err(WeightsError::SumTooLarge(_))));
    }

    #[test]
    fn risk_bands_follow_thresholds() {
        let risk = RiskThresholds::default();
        assert_eq!(risk.band(85.0), RiskBand::Low);
        assert_eq!(risk.band(70.0), RiskBand::Low);
        assert_eq!(risk.band(55.0), RiskBand::Medium);
        assert_eq!(risk.band(10.0), RiskBand::High);
    }

    #[test]
    fn inverted_or_out_of_range_thresholds_are_rejected() {
        assert!(RiskThresholds::default().validate().is_ok());
        let inverted = RiskThresholds {
            low_risk_min: 30.0,
            medium_risk_min: 60.0,
        };
        assert_eq!(
            inverted.validate(),
            Err(ThresholdsError::Inverted {
                low: 30.0,
                medium: 60.0
            })
        );
        let above = RiskThresholds {
            low_risk_min: 120.0,
            ..RiskThresholds::default()
        };
        assert!(matches!(
            above.validate(),
            Err(ThresholdsError::OutOfRange { name: "low_risk_min", .. })
        ));
        let nan = RiskThresholds {
            medium_risk_min: f64::NAN,
            ..RiskThresholds::default()
        };
        assert!(nan.validate().is_err());
    }

    #[test]
    fn allow_list_matching_ignores_case_and_padding() {
        let config = ScoringConfig {
            main_districts: vec!["Karşıyaka".to_string()],
            ..ScoringConfig::default()
        };
        assert!(config.is_main_district(" karşıyaka"));
        assert!(!config.is_main_district("Urla"));
        assert!(ScoringConfig::unrestricted().is_main_district("Urla"));
    }
}
