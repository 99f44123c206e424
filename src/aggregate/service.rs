use serde::{Deserialize, Serialize};

use crate::aggregate::group::{tally_by, Bucket};
use crate::dataset::Dataset;

pub const UNKNOWN_SERVICE_LABEL: &str = "Unknown service";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceMetric {
    pub service: String,
    pub appointment_count: u64,
    pub total_revenue: f64,
    pub average_price: f64,
    pub share_percent: f64,
}

pub fn service_breakdown(dataset: &Dataset) -> Vec<ServiceMetric> {
    let names = dataset.service_names();
    let tallies = tally_by(
        &dataset.appointments,
        |a| a.service_id.filter(|id| names.contains_key(id)),
        |a| a.price,
    );
    let total = dataset.appointments.len();

    let mut out: Vec<ServiceMetric> = tallies
        .into_iter()
        .map(|(bucket, tally)| {
            let service = match bucket {
                Bucket::Key(id) => names.get(&id).copied().unwrap_or_default().to_string(),
                Bucket::Unknown => UNKNOWN_SERVICE_LABEL.to_string(),
            };
            ServiceMetric {
                service,
                appointment_count: tally.count as u64,
                total_revenue: tally.sum,
                average_price: tally.mean(),
                share_percent: if total == 0 {
                    0.0
                } else {
                    100.0 * tally.count as f64 / total as f64
                },
            }
        })
        .collect();

    out.sort_by(|a, b| {
        b.total_revenue
            .total_cmp(&a.total_revenue)
            .then_with(|| a.service.cmp(&b.service))
    });
    out
}
