use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::dataset::records::Collection;
use crate::dataset::source::{DataSource, SourceError};
use crate::dataset::Dataset;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CollectionReport {
    pub rows: usize,
    pub skipped_rows: usize,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FetchReport {
    pub source: String,
    pub collections: BTreeMap<Collection, CollectionReport>,
}

impl FetchReport {
    pub fn failed_collections(&self) -> Vec<Collection> {
        self.collections
            .iter()
            .filter(|(_, report)| report.error.is_some())
            .map(|(collection, _)| *collection)
            .collect()
    }

    pub fn total_rows(&self) -> usize {
        self.collections.values().map(|r| r.rows).sum()
    }
}

pub async fn fetch_dataset(source: &dyn DataSource) -> (Dataset, FetchReport) {
    let (districts, customers, services, appointments, competitors, campaigns) = tokio::join!(
        source.fetch_collection(Collection::Districts),
        source.fetch_collection(Collection::Customers),
        source.fetch_collection(Collection::Services),
        source.fetch_collection(Collection::Appointments),
        source.fetch_collection(Collection::Competitors),
        source.fetch_collection(Collection::Campaigns),
    );

    let mut report = FetchReport {
        source: source.name().to_string(),
        collections: BTreeMap::new(),
    };
    let dataset = Dataset {
        districts: settle(Collection::Districts, districts, &mut report),
        customers: settle(Collection::Customers, customers, &mut report),
        services: settle(Collection::Services, services, &mut report),
        appointments: settle(Collection::Appointments, appointments, &mut report),
        competitors: settle(Collection::Competitors, competitors, &mut report),
        campaigns: settle(Collection::Campaigns, campaigns, &mut report),
    };

    info!(
        "loaded {} rows from {} ({} collections failed)",
        report.total_rows(),
        report.source,
        report.failed_collections().len()
    );
    (dataset, report)
}

fn settle<T: DeserializeOwned>(
    collection: Collection,
    fetched: Result<Vec<Value>, SourceError>,
    report: &mut FetchReport,
) -> Vec<T> {
    match fetched {
        Ok(rows) => {
            let (records, skipped_rows) = parse_rows(rows);
            if skipped_rows > 0 {
                warn!("{collection}: skipped {skipped_rows} malformed rows");
            }
            report.collections.insert(
                collection,
                CollectionReport {
                    rows: records.len(),
                    skipped_rows,
                    error: None,
                },
            );
            records
        }
        Err(err) => {
            warn!("{collection}: fetch failed, continuing with an empty collection: {err}");
            report.collections.insert(
                collection,
                CollectionReport {
                    rows: 0,
                    skipped_rows: 0,
                    error: Some(err.to_string()),
                },
            );
            Vec::new()
        }
    }
}

pub fn parse_rows<T: DeserializeOwned>(rows: Vec<Value>) -> (Vec<T>, usize) {
    let mut out = Vec::with_capacity(rows.len());
    let mut skipped = 0usize;
    for row in rows {
        if !row.is_object() {
            skipped += 1;
            continue;
        }
        match serde_json::from_value::<T>(row) {
            Ok(record) => out.push(record),
            Err(_) => skipped += 1,
        }
    }
    (out, skipped)
}
