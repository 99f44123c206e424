use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::aggregate::group::{tally_by, Bucket, Tally};
use crate::dataset::{Campaign, Dataset};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CampaignMetric {
    pub campaign: String,
    pub discount_percent: f64,
    pub active_days: i64,
    pub appointment_count: u64,
    pub total_revenue: f64,
    pub average_price: f64,
}

pub fn active_campaign(date: NaiveDate, campaigns: &[Campaign]) -> Option<&Campaign> {
    campaigns
        .iter()
        .filter(|c| c.contains(date))
        .min_by(|a, b| {
            b.start_date
                .cmp(&a.start_date)
                .then_with(|| a.id.cmp(&b.id))
        })
}

pub fn campaign_performance(dataset: &Dataset) -> Vec<CampaignMetric> {
    let tallies = tally_by(
        &dataset.appointments,
        |a| a.date.and_then(|d| active_campaign(d, &dataset.campaigns)).map(|c| c.id),
        |a| a.price,
    );

    let mut out: Vec<CampaignMetric> = dataset
        .campaigns
        .iter()
        .map(|campaign| {
            let tally = tallies
                .get(&Bucket::Key(campaign.id))
                .copied()
                .unwrap_or_default();
            CampaignMetric {
                campaign: campaign.name.clone(),
                discount_percent: campaign.discount_percent,
                active_days: campaign.active_days(),
                appointment_count: tally.count as u64,
                total_revenue: tally.sum,
                average_price: tally.mean(),
            }
        })
        .collect();

    out.sort_by(|a, b| {
        b.total_revenue
            .total_cmp(&a.total_revenue)
            .then_with(|| a.campaign.cmp(&b.campaign))
    });
    out
}

pub fn uncampaigned(dataset: &Dataset) -> Tally {
    let mut tally = Tally::default();
    for appointment in &dataset.appointments {
        let inside = appointment
            .date
            .and_then(|d| active_campaign(d, &dataset.campaigns))
            .is_some();
        if !inside {
            tally.add(appointment.price);
        }
    }
    tally
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Appointment;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).expect("valid date")
    }

    fn campaign(id: i64, name: &str, start: NaiveDate, end: NaiveDate) -> Campaign {
        Campaign {
            id,
            name: name.to_string(),
            start_date: Some(start),
            end_date: Some(end),
            discount_percent: 10.0,
        }
    }

    fn appointment(id: i64, day: Option<NaiveDate>, price: f64, campaign_id: Option<i64>) -> Appointment {
        Appointment {
            id,
            date: day,
            price,
            campaign_id,
            ..Appointment::default()
        }
    }

    #[test]
    fn overlapping_windows_prefer_latest_start() {
        let campaigns = vec![
            campaign(1, "Spring", date(3, 1), date(5, 31)),
            campaign(2, "Mothers Day", date(5, 1), date(5, 15)),
        ];
        assert_eq!(active_campaign(date(4, 10), &campaigns).map(|c| c.id), Some(1));
        assert_eq!(active_campaign(date(5, 10), &campaigns).map(|c| c.id), Some(2));
        assert!(active_campaign(date(6, 1), &campaigns).is_none());
    }

    #[test]
    fn same_start_prefers_lowest_id() {
        let campaigns = vec![
            campaign(9, "B", date(1, 1), date(1, 31)),
            campaign(4, "A", date(1, 1), date(1, 10)),
        ];
        assert_eq!(active_campaign(date(1, 5), &campaigns).map(|c| c.id), Some(4));
    }

    #[test]
    fn attribution_uses_dates_not_stored_reference() {
        let dataset = Dataset {
            campaigns: vec![
                campaign(1, "Spring", date(3, 1), date(3, 31)),
                campaign(2, "Summer", date(7, 1), date(7, 31)),
            ],
            appointments: vec![
                // stored reference says Summer, date says Spring
                appointment(1, Some(date(3, 5)), 100.0, Some(2)),
                appointment(2, Some(date(3, 6)), 300.0, None),
                appointment(3, Some(date(4, 1)), 50.0, Some(1)),
                appointment(4, None, 20.0, Some(1)),
            ],
            ..Dataset::default()
        };
        let rows = campaign_performance(&dataset);
        assert_eq!(rows[0].campaign, "Spring");
        assert_eq!(rows[0].appointment_count, 2);
        assert!((rows[0].average_price - 200.0).abs() < 1e-9);
        assert_eq!(rows[0].active_days, 31);
        assert_eq!(rows[1].campaign, "Summer");
        assert_eq!(rows[1].appointment_count, 0);

        let rest = uncampaigned(&dataset);
        assert_eq!(rest.count, 2);
        assert!((rest.sum - 70.0).abs() < 1e-9);
    }
}
