use chrono::Local;
use contracts::dashboards::d400_lead_analytics::{
    bucket_by_month, report_file_name, ActivityItem, MonthBucket, ReportMeta, ReportPeriod,
    ReportRequest,
};
use contracts::domain::a002_tracking_event::aggregate::TrackingEvent;
use contracts::shared::local_cache::LocalCachePort;
use contracts::shared::logger::CATEGORY_REPORT;

use super::export::{export_csv, ReportData};
use crate::domain::a001_lead::service::{self as lead_service, LoadedLeads};
use crate::shared::config;
use crate::shared::local_cache::{get_cache, read_off_runtime};
use crate::shared::logger;

async fn tracking_events() -> Vec<TrackingEvent> {
    match get_cache() {
        Ok(cache) => read_off_runtime(cache, |c| c.read_tracking_events()).await,
        Err(e) => {
            tracing::warn!("{}", e);
            Vec::new()
        }
    }
}

/// Merge tracking events and form activity into one stream
pub fn activity(events: &[TrackingEvent], loaded: &LoadedLeads) -> Vec<ActivityItem> {
    let mut items: Vec<ActivityItem> = events.iter().map(ActivityItem::from).collect();
    items.extend(loaded.forms.iter().cloned());
    items
}

/// Monthly contacts/forms series for the analytics chart
pub async fn get_lead_activity() -> Vec<MonthBucket> {
    let loaded = lead_service::load().await;
    let events = tracking_events().await;
    bucket_by_month(&activity(&events, &loaded))
}

/// Render the CSV report; returns the download file name and the content
pub async fn build_report(request: ReportRequest) -> anyhow::Result<(String, String)> {
    let cfg = config::current();
    let meta = ReportMeta {
        report_name: cfg.report.name.clone(),
        title: cfg.report.title.clone(),
        period: ReportPeriod::from_parts(request.year, request.month),
    };

    let loaded = lead_service::load().await;
    let events = tracking_events().await;
    let data = ReportData {
        events: &events,
        leads: &loaded.leads,
        forms: &loaded.forms,
    };

    let csv = export_csv(&meta, &data, &Local, &cfg.report.date_format)?;
    let file_name = report_file_name(&meta);
    logger::log(CATEGORY_REPORT, &format!("Exported {}", file_name));
    Ok((file_name, csv))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_merges_both_streams() {
        let events = vec![TrackingEvent {
            method: "email_click".into(),
            timestamp: "2024-03-01T00:00:00Z".into(),
            ..Default::default()
        }];
        let loaded = LoadedLeads {
            leads: Vec::new(),
            forms: vec![ActivityItem::Form {
                timestamp: "bad".into(),
                form_type: "contact_form".into(),
            }],
            notice: None,
        };

        let items = activity(&events, &loaded);
        assert_eq!(items.len(), 2);
        assert!(items[0].is_tracking());

        let series = contracts::dashboards::d400_lead_analytics::bucket_by_month_in(
            &items,
            &chrono::Utc,
        );
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].contacts, 1);
        assert_eq!(series[0].forms, 0);
    }
}
