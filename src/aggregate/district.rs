use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::aggregate::group::{count_by, tally_by, Bucket, Tally};
use crate::aggregate::{DistrictKind, DistrictMetric};
use crate::dataset::Dataset;
use crate::scoring::ScoringConfig;

pub const UNKNOWN_DISTRICT_LABEL: &str = "Unknown";

#[derive(Debug, Clone, Default)]
pub struct DistrictTallies {
    pub customers: HashMap<Bucket<i64>, usize>,
    pub appointments: HashMap<Bucket<i64>, Tally>,
    pub competitors: HashMap<Bucket<i64>, usize>,
}

impl DistrictTallies {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let names = dataset.district_names();
        let known = |id: Option<i64>| id.filter(|id| names.contains_key(id));

        let customers = count_by(&dataset.customers, |c| known(c.district_id));
        let customer_district: HashMap<i64, Option<i64>> = dataset
            .customers
            .iter()
            .map(|c| (c.id, known(c.district_id)))
            .collect();
        let appointments = tally_by(
            &dataset.appointments,
            |a| {
                a.customer_id
                    .and_then(|id| customer_district.get(&id).copied().flatten())
            },
            |a| a.price,
        );
        let competitors = count_by(&dataset.competitors, |c| known(c.district_id));

        Self {
            customers,
            appointments,
            competitors,
        }
    }

    fn customers_in(&self, bucket: &Bucket<i64>) -> u64 {
        self.customers.get(bucket).copied().unwrap_or(0) as u64
    }

    fn appointments_in(&self, bucket: &Bucket<i64>) -> Tally {
        self.appointments.get(bucket).copied().unwrap_or_default()
    }

    fn competitors_in(&self, bucket: &Bucket<i64>) -> u64 {
        self.competitors.get(bucket).copied().unwrap_or(0) as u64
    }

    fn metric_for(&self, bucket: &Bucket<i64>, district: String, kind: DistrictKind) -> DistrictMetric {
        let appointments = self.appointments_in(bucket);
        DistrictMetric {
            district,
            kind,
            customer_count: self.customers_in(bucket),
            appointment_count: appointments.count as u64,
            competitor_count: self.competitors_in(bucket),
            total_revenue: appointments.sum,
            average_revenue: appointments.mean(),
        }
    }
}

pub fn district_metrics(dataset: &Dataset, config: &ScoringConfig) -> Vec<DistrictMetric> {
    let tallies = DistrictTallies::from_dataset(dataset);

    // Dedupe by id; the first name seen for an id wins.
    let mut listed: BTreeMap<i64, &str> = BTreeMap::new();
    for district in &dataset.districts {
        listed.entry(district.id).or_insert(district.name.as_str());
    }

    let mut rows = Vec::with_capacity(listed.len() + 2);
    let mut outside = 0usize;
    for (id, name) in listed {
        if !config.is_main_district(name) {
            outside += 1;
            continue;
        }
        rows.push(tallies.metric_for(&Bucket::Key(id), name.to_string(), DistrictKind::Listed));
    }
    rows.sort_by(|a, b| a.district.cmp(&b.district));

    if outside > 0 {
        debug!("{outside} districts folded into {}", config.other.label);
        rows.push(config.other.as_metric());
    }

    let unknown = tallies.metric_for(
        &Bucket::Unknown,
        UNKNOWN_DISTRICT_LABEL.to_string(),
        DistrictKind::Unknown,
    );
    if unknown.customer_count > 0 || unknown.appointment_count > 0 || unknown.competitor_count > 0 {
        rows.push(unknown);
    }

    rows
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DatasetTotals {
    pub districts: usize,
    pub customers: usize,
    pub appointments: usize,
    pub competitors: usize,
    pub total_revenue: f64,
    pub average_revenue: f64,
}

pub fn dataset_totals(dataset: &Dataset) -> DatasetTotals {
    let mut revenue = Tally::default();
    for appointment in &dataset.appointments {
        revenue.add(appointment.price);
    }
    DatasetTotals {
        districts: dataset.districts.len(),
        customers: dataset.customers.len(),
        appointments: dataset.appointments.len(),
        competitors: dataset.competitors.len(),
        total_revenue: revenue.sum,
        average_revenue: revenue.mean(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Appointment, Competitor, Customer, District};
    use crate::scoring::OtherBucket;

    fn district(id: i64, name: &str) -> District {
        District {
            id,
            name: name.to_string(),
            ..District::default()
        }
    }

    fn customer(id: i64, district_id: Option<i64>) -> Customer {
        Customer {
            id,
            district_id,
            ..Customer::default()
        }
    }

    fn appointment(id: i64, customer_id: Option<i64>, price: f64) -> Appointment {
        Appointment {
            id,
            customer_id,
            price,
            ..Appointment::default()
        }
    }

    fn competitor(id: i64, district_id: Option<i64>) -> Competitor {
        Competitor {
            id,
            district_id,
            ..Competitor::default()
        }
    }

    fn sample() -> Dataset {
        Dataset {
            districts: vec![district(1, "Konak"), district(2, "Bornova"), district(3, "Urla")],
            customers: vec![
                customer(10, Some(1)),
                customer(11, Some(1)),
                customer(12, Some(2)),
                customer(13, Some(3)),
                customer(14, None),
                customer(15, Some(99)),
            ],
            appointments: vec![
                appointment(100, Some(10), 200.0),
                appointment(101, Some(11), 400.0),
                appointment(102, Some(13), 900.0),
                appointment(103, Some(14), 50.0),
                appointment(104, None, 70.0),
            ],
            competitors: vec![competitor(1, Some(1)), competitor(2, Some(2)), competitor(3, None)],
            ..Dataset::default()
        }
    }

    fn find<'a>(rows: &'a [DistrictMetric], name: &str) -> &'a DistrictMetric {
        rows.iter()
            .find(|r| r.district == name)
            .unwrap_or_else(|| panic!("missing row {name}"))
    }

    #[test]
    fn computes_listed_rows_without_allow_list() {
        let rows = district_metrics(&sample(), &ScoringConfig::unrestricted());
        let konak = find(&rows, "Konak");
        assert_eq!(konak.customer_count, 2);
        assert_eq!(konak.appointment_count, 2);
        assert_eq!(konak.competitor_count, 1);
        assert!((konak.average_revenue - 300.0).abs() < 1e-9);

        let bornova = find(&rows, "Bornova");
        assert_eq!(bornova.appointment_count, 0);
        assert_eq!(bornova.average_revenue, 0.0);

        assert_eq!(find(&rows, "Urla").appointment_count, 1);
        assert!(rows.iter().all(|r| r.kind != DistrictKind::Other));
    }

    #[test]
    fn unresolvable_records_are_kept_in_unknown_row() {
        let rows = district_metrics(&sample(), &ScoringConfig::unrestricted());
        let unknown = find(&rows, UNKNOWN_DISTRICT_LABEL);
        assert_eq!(unknown.kind, DistrictKind::Unknown);
        // customer without district and customer pointing at a missing district
        assert_eq!(unknown.customer_count, 2);
        // appointment of a district-less customer plus one without a customer
        assert_eq!(unknown.appointment_count, 2);
        assert_eq!(unknown.competitor_count, 1);

        let total_customers: u64 = rows.iter().map(|r| r.customer_count).sum();
        assert_eq!(total_customers as usize, sample().customers.len());
    }

    #[test]
    fn districts_outside_allow_list_become_placeholder_bucket() {
        let config = ScoringConfig {
            main_districts: vec!["konak".to_string(), " Bornova ".to_string()],
            other: OtherBucket {
                label: "Other Districts".to_string(),
                customer_count: 15,
                appointment_count: 20,
                competitor_count: 0,
                average_revenue: 0.0,
            },
            ..ScoringConfig::default()
        };
        let rows = district_metrics(&sample(), &config);
        assert!(rows.iter().all(|r| r.district != "Urla"));
        let other = find(&rows, "Other Districts");
        assert_eq!(other.kind, DistrictKind::Other);
        assert_eq!(other.customer_count, 15);
        assert_eq!(other.appointment_count, 20);
        assert_eq!(rows.iter().filter(|r| r.kind == DistrictKind::Other).count(), 1);
    }

    #[test]
    fn no_placeholder_when_every_district_is_main() {
        let mut dataset = sample();
        dataset.districts.retain(|d| d.id != 3);
        dataset.customers.retain(|c| c.id != 13);
        let config = ScoringConfig {
            main_districts: vec!["Konak".to_string(), "Bornova".to_string()],
            ..ScoringConfig::default()
        };
        let rows = district_metrics(&dataset, &config);
        assert!(rows.iter().all(|r| r.kind != DistrictKind::Other));
    }

    #[test]
    fn empty_dataset_yields_no_rows() {
        assert!(district_metrics(&Dataset::default(), &ScoringConfig::default()).is_empty());
        let totals = dataset_totals(&Dataset::default());
        assert_eq!(totals.appointments, 0);
        assert_eq!(totals.average_revenue, 0.0);
    }
}
