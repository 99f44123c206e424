use std::collections::BTreeMap;
use std::path::PathBuf;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Map, Value};
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::debug;

use crate::config::SourceConfig;
use crate::dataset::http::{build_client, extract_rows, fetch_json, join_url};
use crate::dataset::records::Collection;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("http request failed: {0}")]
    Http(#[source] reqwest::Error),
    #[error("GET {url} returned {status}: {preview}")]
    Status {
        url: String,
        status: u16,
        preview: String,
    },
    #[error("failed reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON from {origin}: {source}")]
    Json {
        origin: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("collection {0} is not present in the source")]
    MissingCollection(Collection),
}

#[async_trait]
pub trait DataSource: Send + Sync {
    fn name(&self) -> &str;
    async fn fetch_collection(&self, collection: Collection) -> Result<Vec<Value>, SourceError>;
}

pub struct HttpSource {
    client: Client,
    base_url: String,
    endpoints: BTreeMap<Collection, String>,
    page_limit: Option<u32>,
}

impl HttpSource {
    pub fn new(config: &SourceConfig) -> Result<Self, SourceError> {
        Ok(Self {
            client: build_client(config.timeout_secs)?,
            base_url: config.base_url.clone(),
            endpoints: config.endpoints.resolved(),
            page_limit: Some(config.page_limit).filter(|limit| *limit > 0),
        })
    }

    pub fn url_for(&self, collection: Collection) -> String {
        let endpoint = self
            .endpoints
            .get(&collection)
            .map(String::as_str)
            .unwrap_or(collection.as_slug());
        join_url(&self.base_url, endpoint, self.page_limit)
    }
}

#[async_trait]
impl DataSource for HttpSource {
    fn name(&self) -> &str {
        &self.base_url
    }

    async fn fetch_collection(&self, collection: Collection) -> Result<Vec<Value>, SourceError> {
        let url = self.url_for(collection);
        debug!("fetching {collection} from {url}");
        let body = fetch_json(&self.client, &url).await?;
        Ok(extract_rows(body))
    }
}

/// Reads collections from a JSON snapshot shaped like
/// `{"districts": [...], "customers": [...], ...}`. The file is parsed once.
pub struct FileSource {
    path: PathBuf,
    label: String,
    snapshot: OnceCell<Map<String, Value>>,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let label = path.display().to_string();
        Self {
            path,
            label,
            snapshot: OnceCell::new(),
        }
    }

    async fn snapshot(&self) -> Result<&Map<String, Value>, SourceError> {
        self.snapshot
            .get_or_try_init(|| async {
                let raw = tokio::fs::read_to_string(&self.path)
                    .await
                    .map_err(|source| SourceError::Io {
                        path: self.path.clone(),
                        source,
                    })?;
                debug!("parsing snapshot {} ({} bytes)", self.label, raw.len());
                serde_json::from_str(&raw).map_err(|source| SourceError::Json {
                    origin: self.label.clone(),
                    source,
                })
            })
            .await
    }
}

#[async_trait]
impl DataSource for FileSource {
    fn name(&self) -> &str {
        &self.label
    }

    async fn fetch_collection(&self, collection: Collection) -> Result<Vec<Value>, SourceError> {
        let section = self
            .snapshot()
            .await?
            .get(collection.as_slug())
            .cloned()
            .ok_or(SourceError::MissingCollection(collection))?;
        Ok(extract_rows(section))
    }
}
