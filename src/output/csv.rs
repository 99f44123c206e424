use anyhow::Result;

use crate::aggregate::{CampaignMetric, DistrictKind, DistrictMetric, ServiceMetric};
use crate::scoring::SuitabilityScore;

fn kind_label(kind: DistrictKind) -> &'static str {
    match kind {
        DistrictKind::Listed => "listed",
        DistrictKind::Other => "other",
        DistrictKind::Unknown => "unknown",
    }
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<String> {
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}

pub fn ranking_to_csv(scores: &[SuitabilityScore]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record([
        "rank",
        "district",
        "kind",
        "composite_score",
        "demand_score",
        "revenue_score",
        "competition_score",
        "appointment_count",
        "risk",
    ])?;
    for (idx, s) in scores.iter().enumerate() {
        writer.write_record([
            (idx + 1).to_string(),
            s.district.clone(),
            kind_label(s.kind).to_string(),
            format!("{:.4}", s.composite_score),
            format!("{:.0}", s.demand_score),
            format!("{:.0}", s.revenue_score),
            format!("{:.0}", s.competition_score),
            s.appointment_count.to_string(),
            s.risk.to_string(),
        ])?;
    }
    finish(writer)
}

pub fn metrics_to_csv(metrics: &[DistrictMetric]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record([
        "district",
        "kind",
        "customer_count",
        "appointment_count",
        "competitor_count",
        "total_revenue",
        "average_revenue",
    ])?;
    for m in metrics {
        writer.write_record([
            m.district.clone(),
            kind_label(m.kind).to_string(),
            m.customer_count.to_string(),
            m.appointment_count.to_string(),
            m.competitor_count.to_string(),
            format!("{:.2}", m.total_revenue),
            format!("{:.2}", m.average_revenue),
        ])?;
    }
    finish(writer)
}

pub fn services_to_csv(services: &[ServiceMetric]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record([
        "service",
        "appointment_count",
        "share_percent",
        "total_revenue",
        "average_price",
    ])?;
    for s in services {
        writer.write_record([
            s.service.clone(),
            s.appointment_count.to_string(),
            format!("{:.2}", s.share_percent),
            format!("{:.2}", s.total_revenue),
            format!("{:.2}", s.average_price),
        ])?;
    }
    finish(writer)
}

pub fn campaigns_to_csv(campaigns: &[CampaignMetric]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record([
        "campaign",
        "discount_percent",
        "active_days",
        "appointment_count",
        "total_revenue",
        "average_price",
    ])?;
    for c in campaigns {
        writer.write_record([
            c.campaign.clone(),
            format!("{:.2}", c.discount_percent),
            c.active_days.to_string(),
            c.appointment_count.to_string(),
            format!("{:.2}", c.total_revenue),
            format!("{:.2}", c.average_price),
        ])?;
    }
    finish(writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::RiskBand;

    #[test]
    fn ranking_csv_has_header_and_rows() {
        let scores = vec![SuitabilityScore {
            district: "Karşıyaka".to_string(),
            kind: DistrictKind::Listed,
            demand_score: 80.0,
            revenue_score: 60.0,
            competition_score: 50.0,
            composite_score: 64.5,
            appointment_count: 42,
            risk: RiskBand::Medium,
        }];
        let csv = ranking_to_csv(&scores).expect("csv renders");
        let mut lines = csv.lines();
        assert!(lines.next().expect("header").starts_with("rank,district,kind"));
        assert_eq!(
            lines.next().expect("row"),
            "1,Karşıyaka,listed,64.5000,80,60,50,42,medium"
        );
    }
}
