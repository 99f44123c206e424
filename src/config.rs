use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::dataset::Collection;
use crate::scoring::{OtherBucket, RiskThresholds, ScoringConfig, ScoringWeights};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub scoring: ScoringSection,
    #[serde(default)]
    pub districts: DistrictsConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    #[default]
    Http,
    File,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default)]
    pub kind: SourceKind,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_page_limit")]
    pub page_limit: u32,
    #[serde(default)]
    pub endpoints: EndpointsConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EndpointsConfig {
    #[serde(flatten)]
    pub overrides: BTreeMap<String, String>,
}

impl EndpointsConfig {
    pub fn resolved(&self) -> BTreeMap<Collection, String> {
        let mut out = BTreeMap::new();
        for (key, path) in &self.overrides {
            match key.parse::<Collection>() {
                Ok(collection) => {
                    out.insert(collection, path.clone());
                }
                Err(err) => warn!("ignoring endpoint override: {err}"),
            }
        }
        out
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoringSection {
    #[serde(default)]
    pub weights: ScoringWeights,
    #[serde(default)]
    pub risk: RiskThresholds,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistrictsConfig {
    #[serde(default = "default_main_districts")]
    pub main: Vec<String>,
    #[serde(default)]
    pub other: OtherBucket,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub source_kind: Option<SourceKind>,
    pub base_url: Option<String>,
    pub snapshot_path: Option<String>,
    pub top_n: Option<usize>,
}

impl Config {
    pub fn default_path() -> PathBuf {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.join(".config/salon-insight/config.toml")
    }

    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(|p| p.to_path_buf())
            .unwrap_or_else(Self::default_path);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs::read_to_string(&path)
            .with_context(|| format!("failed reading config: {}", path.display()))?;
        let parsed: Self = toml::from_str(&data)
            .with_context(|| format!("failed parsing TOML config: {}", path.display()))?;
        parsed
            .scoring
            .weights
            .validate()
            .with_context(|| format!("invalid scoring weights in {}", path.display()))?;
        parsed
            .scoring
            .risk
            .validate()
            .with_context(|| format!("invalid risk thresholds in {}", path.display()))?;
        Ok(parsed)
    }

    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(kind) = overrides.source_kind {
            self.source.kind = kind;
        }
        if let Some(base_url) = overrides.base_url {
            self.source.base_url = base_url;
        }
        if let Some(snapshot_path) = overrides.snapshot_path {
            self.source.snapshot_path = snapshot_path;
            if overrides.source_kind.is_none() {
                self.source.kind = SourceKind::File;
            }
        }
        if let Some(top_n) = overrides.top_n {
            self.report.top_n = top_n;
        }
    }

    pub fn scoring_config(&self) -> ScoringConfig {
        ScoringConfig {
            weights: self.scoring.weights,
            risk: self.scoring.risk,
            main_districts: self.districts.main.clone(),
            other: self.districts.other.clone(),
        }
    }

    pub fn resolved_snapshot_path(&self) -> PathBuf {
        expand_tilde(&self.source.snapshot_path)
    }

    pub fn write_template(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed creating config directory: {}", parent.display())
            })?;
        }
        fs::write(path, Self::default_template())
            .with_context(|| format!("failed writing config template: {}", path.display()))
    }

    pub fn default_template() -> String {
        let template = r#"[source]
kind = "http"
base_url = "http://localhost:3000/api"
snapshot_path = "~/.local/share/salon-insight/snapshot.json"
timeout_secs = 15
page_limit = 10000

[source.endpoints]
districts = "districts"
customers = "customers"
services = "services"
appointments = "appointments"
competitors = "competitors"
campaigns = "campaigns"

[scoring.weights]
demand = 0.35
revenue = 0.40
competition = 0.25

[scoring.risk]
low_risk_min = 70.0
medium_risk_min = 40.0

[districts]
main = ["Konak", "Bornova", "Karşıyaka", "Buca", "Bayraklı", "Çiğli", "Karabağlar", "Gaziemir"]

[districts.other]
label = "Other Districts"
customer_count = 15
appointment_count = 20
competitor_count = 0
average_revenue = 0.0

[report]
top_n = 5
"#;
        template.to_string()
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: SourceKind::default(),
            base_url: default_base_url(),
            snapshot_path: default_snapshot_path(),
            timeout_secs: default_timeout_secs(),
            page_limit: default_page_limit(),
            endpoints: EndpointsConfig::default(),
        }
    }
}

impl Default for DistrictsConfig {
    fn default() -> Self {
        Self {
            main: default_main_districts(),
            other: OtherBucket::default(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:3000/api".to_string()
}

fn default_snapshot_path() -> String {
    "~/.local/share/salon-insight/snapshot.json".to_string()
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_page_limit() -> u32 {
    10_000
}

fn default_main_districts() -> Vec<String> {
    [
        "Konak",
        "Bornova",
        "Karşıyaka",
        "Buca",
        "Bayraklı",
        "Çiğli",
        "Karabağlar",
        "Gaziemir",
    ]
    .iter()
    .map(|name| name.to_string())
    .collect()
}

fn default_top_n() -> usize {
    5
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn template_parses_back_into_defaults() {
        let parsed: Config = toml::from_str(&Config::default_template()).expect("template parses");
        let defaults = Config::default();
        assert_eq!(parsed.districts.main, defaults.districts.main);
        assert_eq!(parsed.scoring.weights, defaults.scoring.weights);
        assert_eq!(parsed.districts.other, defaults.districts.other);
        assert_eq!(parsed.report.top_n, 5);
        assert_eq!(parsed.source.endpoints.resolved().len(), 6);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let config = Config::load(Some(dir.path().join("absent.toml").as_path())).expect("defaults");
        assert_eq!(config.source.kind, SourceKind::Http);
        assert_eq!(config.districts.other.appointment_count, 20);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(
            file,
            "[districts]\nmain = [\"Konak\"]\n\n[scoring.weights]\ndemand = 0.5\nrevenue = 0.3\ncompetition = 0.2\n"
        )
        .expect("write config");
        let config = Config::load(Some(file.path())).expect("config loads");
        assert_eq!(config.districts.main, vec!["Konak".to_string()]);
        assert_eq!(config.districts.other.customer_count, 15);
        assert!((config.scoring.weights.demand - 0.5).abs() < 1e-12);
        assert_eq!(config.scoring_config().main_districts.len(), 1);
    }

    #[test]
    fn rejects_weights_above_one() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(
            file,
            "[scoring.weights]\ndemand = 0.6\nrevenue = 0.6\ncompetition = 0.2\n"
        )
        .expect("write config");
        assert!(Config::load(Some(file.path())).is_err());
    }

    #[test]
    fn rejects_inverted_risk_thresholds() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, "[scoring.risk]\nlow_risk_min = 30.0\nmedium_risk_min = 60.0\n")
            .expect("write config");
        let err = Config::load(Some(file.path())).expect_err("inverted thresholds");
        assert!(format!("{err:#}").contains("medium_risk_min"));
    }

    #[test]
    fn snapshot_override_switches_to_file_source() {
        let mut config = Config::default();
        config.apply_overrides(ConfigOverrides {
            snapshot_path: Some("/tmp/snapshot.json".to_string()),
            top_n: Some(3),
            ..ConfigOverrides::default()
        });
        assert_eq!(config.source.kind, SourceKind::File);
        assert_eq!(config.report.top_n, 3);
        assert_eq!(config.resolved_snapshot_path(), PathBuf::from("/tmp/snapshot.json"));
    }
}
