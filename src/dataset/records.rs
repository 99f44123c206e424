use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::dataset::http::{value_to_f64, value_to_string};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Districts,
    Customers,
    Services,
    Appointments,
    Competitors,
    Campaigns,
}

impl Collection {
    pub const ALL: [Collection; 6] = [
        Collection::Districts,
        Collection::Customers,
        Collection::Services,
        Collection::Appointments,
        Collection::Competitors,
        Collection::Campaigns,
    ];

    pub fn as_slug(&self) -> &'static str {
        match self {
            Self::Districts => "districts",
            Self::Customers => "customers",
            Self::Services => "services",
            Self::Appointments => "appointments",
            Self::Competitors => "competitors",
            Self::Campaigns => "campaigns",
        }
    }
}

impl Display for Collection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_slug())
    }
}

#[derive(Debug, Error)]
#[error("unknown collection: {0}")]
pub struct CollectionParseError(pub String);

impl FromStr for Collection {
    type Err = CollectionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "districts" | "district" | "ilce" => Ok(Self::Districts),
            "customers" | "customer" => Ok(Self::Customers),
            "services" | "service" => Ok(Self::Services),
            "appointments" | "appointment" => Ok(Self::Appointments),
            "competitors" | "competitor" => Ok(Self::Competitors),
            "campaigns" | "campaign" => Ok(Self::Campaigns),
            _ => Err(CollectionParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct District {
    #[serde(deserialize_with = "lenient_id")]
    pub id: i64,
    #[serde(deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(deserialize_with = "lenient_u64")]
    pub population: u64,
    #[serde(alias = "average_income", alias = "avgIncome", deserialize_with = "lenient_f64")]
    pub average_income: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Customer {
    #[serde(deserialize_with = "lenient_id")]
    pub id: i64,
    #[serde(alias = "district_id", deserialize_with = "lenient_fk")]
    pub district_id: Option<i64>,
    #[serde(deserialize_with = "lenient_u32")]
    pub age: u32,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub gender: Option<String>,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub segment: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Service {
    #[serde(deserialize_with = "lenient_id")]
    pub id: i64,
    #[serde(deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub category: Option<String>,
    #[serde(deserialize_with = "lenient_f64")]
    pub price: f64,
    #[serde(alias = "duration", alias = "duration_minutes", deserialize_with = "lenient_u32")]
    pub duration_minutes: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Appointment {
    #[serde(deserialize_with = "lenient_id")]
    pub id: i64,
    #[serde(alias = "customer_id", deserialize_with = "lenient_fk")]
    pub customer_id: Option<i64>,
    #[serde(alias = "service_id", deserialize_with = "lenient_fk")]
    pub service_id: Option<i64>,
    #[serde(alias = "appointmentDate", alias = "appointment_date", deserialize_with = "lenient_date")]
    pub date: Option<NaiveDate>,
    #[serde(alias = "appointmentTime", alias = "appointment_time", deserialize_with = "lenient_opt_string")]
    pub time: Option<String>,
    #[serde(alias = "totalPrice", alias = "total_price", deserialize_with = "lenient_f64")]
    pub price: f64,
    #[serde(alias = "campaign_id", deserialize_with = "lenient_fk")]
    pub campaign_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Competitor {
    #[serde(deserialize_with = "lenient_id")]
    pub id: i64,
    #[serde(alias = "district_id", deserialize_with = "lenient_fk")]
    pub district_id: Option<i64>,
    #[serde(deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(alias = "service_type", alias = "type", deserialize_with = "lenient_opt_string")]
    pub service_type: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Campaign {
    #[serde(deserialize_with = "lenient_id")]
    pub id: i64,
    #[serde(deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(alias = "start_date", deserialize_with = "lenient_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(alias = "end_date", deserialize_with = "lenient_date")]
    pub end_date: Option<NaiveDate>,
    #[serde(
        alias = "discount",
        alias = "discount_percent",
        alias = "discountRate",
        deserialize_with = "lenient_f64"
    )]
    pub discount_percent: f64,
}

impl Campaign {
    pub fn contains(&self, date: NaiveDate) -> bool {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => start <= date && date <= end,
            _ => false,
        }
    }

    pub fn active_days(&self) -> i64 {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) if end >= start => (end - start).num_days() + 1,
            _ => 0,
        }
    }
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_f64(&value).unwrap_or(0.0))
}

fn lenient_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_f64(&value).unwrap_or(0.0).max(0.0).round() as u64)
}

fn lenient_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let raw = value_to_f64(&value).unwrap_or(0.0).max(0.0).round();
    Ok(raw.min(u32::MAX as f64) as u32)
}

fn lenient_id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_f64(&value).map(|v| v as i64).unwrap_or(0))
}

fn lenient_fk<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_f64(&value).map(|v| v as i64))
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_string(&value).unwrap_or_default())
}

fn lenient_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_string(&value))
}

fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_str().and_then(parse_date))
}

/// Accepts `YYYY-MM-DD` and RFC 3339 timestamps (`2024-03-01T09:30:00.000Z`).
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    let head = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}
