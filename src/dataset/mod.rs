pub mod fetcher;
pub mod http;
pub mod records;
pub mod source;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

pub use fetcher::{fetch_dataset, CollectionReport, FetchReport};
pub use records::{
    Appointment, Campaign, Collection, CollectionParseError, Competitor, Customer, District,
    Service,
};
pub use source::{DataSource, FileSource, HttpSource, SourceError};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Dataset {
    pub districts: Vec<District>,
    pub customers: Vec<Customer>,
    pub services: Vec<Service>,
    pub appointments: Vec<Appointment>,
    pub competitors: Vec<Competitor>,
    pub campaigns: Vec<Campaign>,
}

impl Dataset {
    pub fn is_empty(&self) -> bool {
        self.districts.is_empty()
            && self.customers.is_empty()
            && self.services.is_empty()
            && self.appointments.is_empty()
            && self.competitors.is_empty()
            && self.campaigns.is_empty()
    }

    pub fn district_names(&self) -> HashMap<i64, &str> {
        self.districts
            .iter()
            .map(|d| (d.id, d.name.as_str()))
            .collect()
    }

    pub fn service_names(&self) -> HashMap<i64, &str> {
        self.services
            .iter()
            .map(|s| (s.id, s.name.as_str()))
            .collect()
    }
}
