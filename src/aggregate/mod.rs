pub mod campaign;
pub mod district;
pub mod group;
pub mod service;

use serde::{Deserialize, Serialize};

pub use campaign::{active_campaign, campaign_performance, uncampaigned, CampaignMetric};
pub use district::{dataset_totals, district_metrics, DatasetTotals, UNKNOWN_DISTRICT_LABEL};
pub use group::{count_by, fold_by, group_by, sum_by, tally_by, Bucket, Tally};
pub use service::{service_breakdown, ServiceMetric};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DistrictKind {
    Listed,
    Other,
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DistrictMetric {
    pub district: String,
    pub kind: DistrictKind,
    pub customer_count: u64,
    pub appointment_count: u64,
    pub competitor_count: u64,
    pub total_revenue: f64,
    pub average_revenue: f64,
}

impl DistrictMetric {
    pub fn is_scored(&self) -> bool {
        self.kind != DistrictKind::Unknown
    }
}
