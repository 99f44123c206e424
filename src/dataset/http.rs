use std::time::Duration;

use reqwest::Client;
use serde_json::{Map, Value};

use crate::dataset::source::SourceError;

const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

pub fn build_client(timeout_secs: u64) -> Result<Client, SourceError> {
    Client::builder()
        .user_agent(concat!("salon-insight/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(timeout_secs.max(1)))
        .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
        .build()
        .map_err(SourceError::Http)
}

pub async fn fetch_json(client: &Client, url: &str) -> Result<Value, SourceError> {
    let response = client.get(url).send().await.map_err(SourceError::Http)?;
    let status = response.status();
    let body = response.text().await.map_err(SourceError::Http)?;
    if !status.is_success() {
        let preview: String = body.chars().take(180).collect();
        return Err(SourceError::Status {
            url: url.to_string(),
            status: status.as_u16(),
            preview,
        });
    }
    serde_json::from_str(&body).map_err(|source| SourceError::Json {
        origin: url.to_string(),
        source,
    })
}

/// Accepts a bare array or an envelope such as `{"data": [...], "total": 120}`.
pub fn extract_rows(value: Value) -> Vec<Value> {
    match value {
        Value::Array(rows) => rows,
        Value::Object(mut object) => {
            for key in ["data", "items", "results", "result", "rows", "records"] {
                let Some(found) = take_case_insensitive(&mut object, key) else {
                    continue;
                };
                match found {
                    Value::Array(rows) => return rows,
                    Value::Object(nested) => return extract_rows(Value::Object(nested)),
                    _ => {}
                }
            }
            Vec::new()
        }
        _ => Vec::new(),
    }
}

fn take_case_insensitive(object: &mut Map<String, Value>, key: &str) -> Option<Value> {
    if let Some(value) = object.remove(key) {
        return Some(value);
    }
    let actual = object
        .keys()
        .find(|k| k.eq_ignore_ascii_case(key))
        .cloned()?;
    object.remove(&actual)
}

pub fn value_to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let sanitized = s.trim().replace([',', '%', '_'], "");
            sanitized.parse::<f64>().ok().filter(|v| v.is_finite())
        }
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

pub fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub fn join_url(base_url: &str, endpoint: &str, page_limit: Option<u32>) -> String {
    let base = base_url.trim_end_matches('/');
    let path = endpoint.trim_start_matches('/');
    match page_limit {
        Some(limit) if limit > 0 => {
            let sep = if path.contains('?') { '&' } else { '?' };
            format!("{base}/{path}{sep}limit={limit}")
        }
        _ => format!("{base}/{path}"),
    }
}
