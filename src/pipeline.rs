use serde::Serialize;
use tracing::{info, warn};

use crate::aggregate::{
    campaign_performance, dataset_totals, district_metrics, service_breakdown, uncampaigned,
    CampaignMetric, DatasetTotals, DistrictMetric, ServiceMetric, Tally,
};
use crate::dataset::{fetch_dataset, DataSource, Dataset, FetchReport};
use crate::scoring::{build_recommendations, rank_scores, score_districts, Recommendation};
use crate::scoring::{ScoringConfig, SuitabilityScore};

#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub totals: DatasetTotals,
    pub metrics: Vec<DistrictMetric>,
    pub ranking: Vec<SuitabilityScore>,
    pub services: Vec<ServiceMetric>,
    pub campaigns: Vec<CampaignMetric>,
    pub uncampaigned: Tally,
    pub recommendations: Vec<Recommendation>,
}

pub fn rank_districts(
    dataset: &Dataset,
    config: &ScoringConfig,
    top_n: Option<usize>,
) -> Vec<SuitabilityScore> {
    let metrics = district_metrics(dataset, config);
    rank_scores(score_districts(&metrics, config), top_n)
}

pub fn analyze(dataset: &Dataset, config: &ScoringConfig, top_n: Option<usize>) -> Analysis {
    if dataset.is_empty() {
        warn!("dataset is empty, nothing to score");
    }
    let metrics = district_metrics(dataset, config);
    let full_ranking = rank_scores(score_districts(&metrics, config), None);
    let recommendations =
        build_recommendations(&full_ranking, top_n.unwrap_or(full_ranking.len()));
    let ranking = match top_n {
        Some(n) => full_ranking.into_iter().take(n).collect(),
        None => full_ranking,
    };

    Analysis {
        totals: dataset_totals(dataset),
        metrics,
        ranking,
        services: service_breakdown(dataset),
        campaigns: campaign_performance(dataset),
        uncampaigned: uncampaigned(dataset),
        recommendations,
    }
}

pub async fn fetch_and_analyze(
    source: &dyn DataSource,
    config: &ScoringConfig,
    top_n: Option<usize>,
) -> (Analysis, FetchReport) {
    let (dataset, report) = fetch_dataset(source).await;
    let analysis = analyze(&dataset, config, top_n);
    info!(
        "scored {} districts from {} appointments",
        analysis.ranking.len(),
        analysis.totals.appointments
    );
    (analysis, report)
}
