use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, ContentArrangement, Row, Table};

use crate::aggregate::{CampaignMetric, DistrictKind, DistrictMetric, ServiceMetric};
use crate::dataset::FetchReport;
use crate::scoring::{Recommendation, RiskBand, SuitabilityScore};
use crate::view::ScoreCard;

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn risk_cell(risk: RiskBand) -> Cell {
    let label = risk.to_string().to_uppercase();
    match risk {
        RiskBand::Low => Cell::new(label).fg(Color::Green),
        RiskBand::Medium => Cell::new(label).fg(Color::Yellow),
        RiskBand::High => Cell::new(label).fg(Color::Red),
    }
}

fn district_label(name: &str, kind: DistrictKind) -> String {
    match kind {
        DistrictKind::Listed => name.to_string(),
        DistrictKind::Other => format!("{name} *"),
        DistrictKind::Unknown => format!("({name})"),
    }
}

pub fn render_ranking_table(scores: &[SuitabilityScore]) -> String {
    let mut table = new_table();
    table.set_header(vec![
        "Rank",
        "District",
        "Composite",
        "Demand",
        "Revenue",
        "Competition",
        "Appointments",
        "Risk",
    ]);
    for (idx, s) in scores.iter().enumerate() {
        table.add_row(Row::from(vec![
            Cell::new(idx + 1),
            Cell::new(district_label(&s.district, s.kind)),
            Cell::new(format!("{:.1}", s.composite_score)),
            Cell::new(format!("{:.0}", s.demand_score)),
            Cell::new(format!("{:.0}", s.revenue_score)),
            Cell::new(format!("{:.0}", s.competition_score)),
            Cell::new(s.appointment_count),
            risk_cell(s.risk),
        ]));
    }
    table.to_string()
}

pub fn render_metrics_table(metrics: &[DistrictMetric]) -> String {
    let mut table = new_table();
    table.set_header(vec![
        "District",
        "Customers",
        "Appointments",
        "Competitors",
        "Revenue",
        "Avg Revenue",
    ]);
    for m in metrics {
        table.add_row(vec![
            district_label(&m.district, m.kind),
            m.customer_count.to_string(),
            m.appointment_count.to_string(),
            m.competitor_count.to_string(),
            format!("{:.2}", m.total_revenue),
            format!("{:.2}", m.average_revenue),
        ]);
    }
    table.to_string()
}

pub fn render_services_table(services: &[ServiceMetric]) -> String {
    let mut table = new_table();
    table.set_header(vec!["Service", "Appointments", "Share", "Revenue", "Avg Price"]);
    for s in services {
        table.add_row(vec![
            s.service.clone(),
            s.appointment_count.to_string(),
            format!("{:.1}%", s.share_percent),
            format!("{:.2}", s.total_revenue),
            format!("{:.2}", s.average_price),
        ]);
    }
    table.to_string()
}

pub fn render_campaigns_table(campaigns: &[CampaignMetric]) -> String {
    let mut table = new_table();
    table.set_header(vec![
        "Campaign",
        "Discount",
        "Days",
        "Appointments",
        "Revenue",
        "Avg Price",
    ]);
    for c in campaigns {
        table.add_row(vec![
            c.campaign.clone(),
            format!("{:.0}%", c.discount_percent),
            c.active_days.to_string(),
            c.appointment_count.to_string(),
            format!("{:.2}", c.total_revenue),
            format!("{:.2}", c.average_price),
        ]);
    }
    table.to_string()
}

pub fn render_recommendations_table(items: &[Recommendation]) -> String {
    let mut table = new_table();
    table.set_header(vec!["Priority", "Title", "Composite", "Risk", "Rationale"]);
    for item in items {
        table.add_row(Row::from(vec![
            Cell::new(item.priority),
            Cell::new(&item.title),
            Cell::new(format!("{:.1}", item.composite_score)),
            risk_cell(item.risk),
            Cell::new(&item.rationale),
        ]));
    }
    table.to_string()
}

pub fn render_cards_table(cards: &[ScoreCard]) -> String {
    let mut table = new_table();
    table.set_header(vec!["Card", "Score", "Band", "Color", "Tooltip"]);
    for card in cards {
        table.add_row(Row::from(vec![
            Cell::new(&card.title),
            Cell::new(format!("{:.1}", card.score)),
            risk_cell(card.band),
            Cell::new(card.color),
            Cell::new(&card.tooltip),
        ]));
    }
    table.to_string()
}

pub fn render_fetch_report_table(report: &FetchReport) -> String {
    let mut table = new_table();
    table.set_header(vec!["Collection", "Rows", "Skipped", "Status"]);
    for (collection, entry) in &report.collections {
        let status = match &entry.error {
            Some(err) => Cell::new(format!("empty ({err})")).fg(Color::Red),
            None => Cell::new("ok").fg(Color::Green),
        };
        table.add_row(Row::from(vec![
            Cell::new(collection.to_string()),
            Cell::new(entry.rows),
            Cell::new(entry.skipped_rows),
            status,
        ]));
    }
    table.to_string()
}
