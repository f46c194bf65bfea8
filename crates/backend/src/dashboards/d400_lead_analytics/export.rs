//! Multi-section CSV report of contact tracking and form submissions.
//!
//! Sections, in order, separated by one blank line: report header, summary
//! statistics, monthly data, traffic sources (only with tracking events),
//! contact tracking rows, form submission rows. Every field is quoted and
//! embedded quotes are doubled.

use chrono::{Datelike, TimeZone, Utc};
use contracts::dashboards::d400_lead_analytics::{
    bucket_by_month_in, ActivityItem, ReportMeta, ReportPeriod,
};
use contracts::domain::a001_lead::aggregate::Lead;
use contracts::domain::a002_tracking_event::aggregate::TrackingEvent;
use contracts::shared::timestamp::parse_timestamp;
use std::collections::BTreeMap;

pub const SUMMARY_TITLE: &str = "SUMMARY STATISTICS";
pub const MONTHLY_TITLE: &str = "MONTHLY DATA";
pub const TRAFFIC_TITLE: &str = "TRAFFIC SOURCES";
pub const TRACKING_TITLE: &str = "CONTACT TRACKING DATA";
pub const FORMS_TITLE: &str = "FORM SUBMISSIONS";

const SUMMARY_HEADER: [&str; 2] = ["Metric", "Count"];
const MONTHLY_HEADER: [&str; 3] = ["Month", "Contacts", "Form Submissions"];
const TRAFFIC_HEADER: [&str; 2] = ["Source", "Interactions"];
const TRACKING_HEADER: [&str; 5] = ["Date", "Method", "Details", "Page URL", "User Agent"];
const FORMS_HEADER: [&str; 6] = ["Date", "Form Type", "Name", "Email", "Phone", "Status"];

/// Inputs of one report
pub struct ReportData<'a> {
    pub events: &'a [TrackingEvent],
    pub leads: &'a [Lead],
    /// Form activity with source timestamps, for the monthly block
    pub forms: &'a [ActivityItem],
}

/// Render the report in `tz`, human dates formatted with `date_format`
pub fn export_csv<Tz>(
    meta: &ReportMeta,
    data: &ReportData<'_>,
    tz: &Tz,
    date_format: &str,
) -> anyhow::Result<String>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let events: Vec<&TrackingEvent> = data
        .events
        .iter()
        .filter(|e| in_period(&e.timestamp, &meta.period, tz))
        .collect();
    let leads: Vec<&Lead> = data
        .leads
        .iter()
        .filter(|l| in_period(&l.created_at, &meta.period, tz))
        .collect();

    let generated = Utc::now().with_timezone(tz).format(date_format).to_string();

    let mut sections = vec![write_section(
        None,
        None,
        vec![
            vec![meta.title.clone()],
            vec!["Generated".to_string(), generated],
            vec!["Period".to_string(), meta.period.label()],
        ],
    )?];

    sections.push(write_section(
        Some(SUMMARY_TITLE),
        Some(&SUMMARY_HEADER),
        summary_rows(&events, leads.len()),
    )?);

    let mut activity: Vec<ActivityItem> = events.iter().map(|e| ActivityItem::from(*e)).collect();
    activity.extend(
        data.forms
            .iter()
            .filter(|f| in_period(f.timestamp(), &meta.period, tz))
            .cloned(),
    );
    let monthly = bucket_by_month_in(&activity, tz)
        .into_iter()
        .map(|b| vec![b.name, b.contacts.to_string(), b.forms.to_string()])
        .collect();
    sections.push(write_section(Some(MONTHLY_TITLE), Some(&MONTHLY_HEADER), monthly)?);

    if !events.is_empty() {
        sections.push(write_section(
            Some(TRAFFIC_TITLE),
            Some(&TRAFFIC_HEADER),
            traffic_rows(&events),
        )?);
    }

    let tracking = events
        .iter()
        .map(|e| {
            Ok(vec![
                human_date(&e.timestamp, tz, date_format),
                e.method.clone(),
                serde_json::to_string(&e.details)?,
                e.url.clone(),
                e.user_agent.clone(),
            ])
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    sections.push(write_section(Some(TRACKING_TITLE), Some(&TRACKING_HEADER), tracking)?);

    let forms = leads
        .iter()
        .map(|l| {
            vec![
                human_date(&l.created_at, tz, date_format),
                l.form_type.clone(),
                l.name.clone(),
                l.email.clone(),
                l.phone.clone(),
                l.status.clone(),
            ]
        })
        .collect();
    sections.push(write_section(Some(FORMS_TITLE), Some(&FORMS_HEADER), forms)?);

    Ok(sections.join("\n"))
}

fn summary_rows(events: &[&TrackingEvent], form_count: usize) -> Vec<Vec<String>> {
    let mut by_method: BTreeMap<&str, usize> = BTreeMap::new();
    for e in events {
        let method = if e.method.trim().is_empty() {
            "unknown"
        } else {
            e.method.as_str()
        };
        *by_method.entry(method).or_insert(0) += 1;
    }

    let mut rows = vec![vec!["Total Contacts".to_string(), events.len().to_string()]];
    rows.extend(
        by_method
            .into_iter()
            .map(|(method, count)| vec![method.to_string(), count.to_string()]),
    );
    rows.push(vec!["Form Submissions".to_string(), form_count.to_string()]);
    rows
}

/// Sources by interaction count, most frequent first, ties by name
fn traffic_rows(events: &[&TrackingEvent]) -> Vec<Vec<String>> {
    let mut by_source: BTreeMap<String, usize> = BTreeMap::new();
    for e in events {
        *by_source.entry(e.traffic_source()).or_insert(0) += 1;
    }
    let mut sources: Vec<(String, usize)> = by_source.into_iter().collect();
    sources.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    sources
        .into_iter()
        .map(|(source, count)| vec![source, count.to_string()])
        .collect()
}

fn in_period<Tz: TimeZone>(timestamp: &str, period: &ReportPeriod, tz: &Tz) -> bool {
    match period {
        ReportPeriod::AllTime => true,
        ReportPeriod::Month { .. } => match parse_timestamp(timestamp) {
            Some(utc) => {
                let local = utc.with_timezone(tz);
                period.contains(local.year(), local.month())
            }
            None => false,
        },
    }
}

/// Local date text; unparseable input is passed through
fn human_date<Tz>(timestamp: &str, tz: &Tz, date_format: &str) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    match parse_timestamp(timestamp) {
        Some(utc) => utc.with_timezone(tz).format(date_format).to_string(),
        None => timestamp.to_string(),
    }
}

fn write_section(
    title: Option<&str>,
    header: Option<&[&str]>,
    rows: Vec<Vec<String>>,
) -> anyhow::Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .flexible(true)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    if let Some(title) = title {
        writer.write_record([title])?;
    }
    if let Some(header) = header {
        writer.write_record(header)?;
    }
    for row in rows {
        writer.write_record(&row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV section: {}", e.error()))?;
    Ok(String::from_utf8(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a001_lead::aggregate::LeadSource;
    use serde_json::{json, Map};

    const FORMAT: &str = "%Y-%m-%d %H:%M";

    fn event(method: &str, timestamp: &str, details: serde_json::Value) -> TrackingEvent {
        TrackingEvent {
            method: method.into(),
            timestamp: timestamp.into(),
            details: details.as_object().cloned().unwrap_or_default(),
            user_agent: "Mozilla/5.0".into(),
            url: "https://example.com/contact".into(),
        }
    }

    fn lead(name: &str, created_at: &str) -> Lead {
        Lead {
            id: 1,
            name: name.into(),
            email: "a@x.com".into(),
            phone: "Not provided".into(),
            form_type: "contact_form".into(),
            status: "new".into(),
            created_at: created_at.into(),
            raw_data: Map::new(),
            source: LeadSource::Persisted,
        }
    }

    fn meta(period: ReportPeriod) -> ReportMeta {
        ReportMeta {
            report_name: "Contact_Analytics_Report".into(),
            title: "Contact Analytics Report".into(),
            period,
        }
    }

    fn section<'a>(csv: &'a str, title: &str) -> Option<&'a str> {
        let marker = format!("\"{}\"\n", title);
        csv.split("\n\n").find(|s| s.starts_with(&marker))
    }

    fn data_rows(section: &str) -> usize {
        // title + header
        section.lines().count() - 2
    }

    fn sample() -> (Vec<TrackingEvent>, Vec<Lead>, Vec<ActivityItem>) {
        let events = vec![
            event("phone_call", "2024-03-01T10:00:00Z", json!({"source": "google"})),
            event("whatsapp", "2024-04-02T10:00:00Z", json!({})),
        ];
        let leads = vec![lead("Ahmed Hassan", "2024-03-05T09:00:00Z")];
        let forms = leads.iter().map(ActivityItem::from).collect();
        (events, leads, forms)
    }

    #[test]
    fn test_sections_in_fixed_order() {
        let (events, leads, forms) = sample();
        let data = ReportData {
            events: &events,
            leads: &leads,
            forms: &forms,
        };
        let csv = export_csv(&meta(ReportPeriod::AllTime), &data, &Utc, FORMAT).unwrap();

        assert!(csv.starts_with("\"Contact Analytics Report\"\n"));
        let positions: Vec<usize> = [
            SUMMARY_TITLE,
            MONTHLY_TITLE,
            TRAFFIC_TITLE,
            TRACKING_TITLE,
            FORMS_TITLE,
        ]
        .iter()
        .map(|t| csv.find(&format!("\"{}\"", t)).unwrap())
        .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));

        assert_eq!(data_rows(section(&csv, TRACKING_TITLE).unwrap()), 2);
        assert_eq!(data_rows(section(&csv, FORMS_TITLE).unwrap()), 1);
        assert_eq!(csv.split("\n\n").count(), 6);
    }

    #[test]
    fn test_header_rows_and_values() {
        let (events, leads, forms) = sample();
        let data = ReportData {
            events: &events,
            leads: &leads,
            forms: &forms,
        };
        let csv = export_csv(&meta(ReportPeriod::AllTime), &data, &Utc, FORMAT).unwrap();

        let tracking = section(&csv, TRACKING_TITLE).unwrap();
        assert!(tracking.contains("\"Date\",\"Method\",\"Details\",\"Page URL\",\"User Agent\"\n"));
        assert!(tracking.contains("\"2024-03-01 10:00\",\"phone_call\",\"{\"\"source\"\":\"\"google\"\"}\""));

        let monthly = section(&csv, MONTHLY_TITLE).unwrap();
        assert!(monthly.contains("\"Mar '24\",\"1\",\"1\""));
        assert!(monthly.contains("\"Apr '24\",\"1\",\"0\""));

        let summary = section(&csv, SUMMARY_TITLE).unwrap();
        assert!(summary.contains("\"Total Contacts\",\"2\""));
        assert!(summary.contains("\"phone_call\",\"1\""));
        assert!(summary.contains("\"Form Submissions\",\"1\""));

        let traffic = section(&csv, TRAFFIC_TITLE).unwrap();
        assert!(traffic.contains("\"Direct\",\"1\""));
        assert!(traffic.contains("\"google\",\"1\""));

        assert!(csv.contains("\"Period\",\"All Time\""));
    }

    #[test]
    fn test_embedded_quotes_and_commas_are_escaped() {
        let leads = vec![lead("Ali \"The Mason\", Jr.", "2024-03-05T09:00:00Z")];
        let data = ReportData {
            events: &[],
            leads: &leads,
            forms: &[],
        };
        let csv = export_csv(&meta(ReportPeriod::AllTime), &data, &Utc, FORMAT).unwrap();
        assert!(csv.contains("\"Ali \"\"The Mason\"\", Jr.\""));
    }

    #[test]
    fn test_traffic_block_omitted_without_events() {
        let leads = vec![lead("Nour", "2024-03-05T09:00:00Z")];
        let data = ReportData {
            events: &[],
            leads: &leads,
            forms: &[],
        };
        let csv = export_csv(&meta(ReportPeriod::AllTime), &data, &Utc, FORMAT).unwrap();
        assert!(section(&csv, TRAFFIC_TITLE).is_none());
        assert_eq!(csv.split("\n\n").count(), 5);
        assert_eq!(data_rows(section(&csv, TRACKING_TITLE).unwrap()), 0);
    }

    #[test]
    fn test_month_period_filters_rows() {
        let (events, leads, forms) = sample();
        let data = ReportData {
            events: &events,
            leads: &leads,
            forms: &forms,
        };
        let period = ReportPeriod::Month { year: 2024, month: 4 };
        let csv = export_csv(&meta(period), &data, &Utc, FORMAT).unwrap();

        assert_eq!(data_rows(section(&csv, TRACKING_TITLE).unwrap()), 1);
        assert_eq!(data_rows(section(&csv, FORMS_TITLE).unwrap()), 0);
        assert!(csv.contains("\"Period\",\"April 2024\""));
        let monthly = section(&csv, MONTHLY_TITLE).unwrap();
        assert_eq!(data_rows(monthly), 1);
    }
}
