use chrono::{Month, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::a001_lead::aggregate::{Lead, RawLocalSubmission, SubmissionSource};
use crate::domain::a002_tracking_event::aggregate::TrackingEvent;

/// One point of the contacts/forms chart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthBucket {
    /// Label in format "MMM 'YY", e.g. "Mar '24"
    pub name: String,
    pub contacts: u32,
    pub forms: u32,
}

/// Item of the merged activity stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ActivityItem {
    Tracking(TrackingEvent),
    Form { timestamp: String, form_type: String },
}

impl ActivityItem {
    pub fn timestamp(&self) -> &str {
        match self {
            ActivityItem::Tracking(e) => &e.timestamp,
            ActivityItem::Form { timestamp, .. } => timestamp,
        }
    }

    pub fn is_tracking(&self) -> bool {
        matches!(self, ActivityItem::Tracking(_))
    }
}

impl From<&Lead> for ActivityItem {
    fn from(lead: &Lead) -> Self {
        ActivityItem::Form {
            timestamp: lead.created_at.clone(),
            form_type: lead.form_type.clone(),
        }
    }
}

// The raw timestamp is kept so unparseable entries stay out of the series.
impl From<&RawLocalSubmission> for ActivityItem {
    fn from(entry: &RawLocalSubmission) -> Self {
        ActivityItem::Form {
            timestamp: entry.timestamp.clone(),
            form_type: entry.form_type.clone(),
        }
    }
}

impl From<&SubmissionSource> for ActivityItem {
    fn from(source: &SubmissionSource) -> Self {
        match source {
            SubmissionSource::Persisted(row) => ActivityItem::Form {
                timestamp: row.created_at.clone().unwrap_or_default(),
                form_type: row.form_type.clone().unwrap_or_default(),
            },
            SubmissionSource::Local { entry, .. } => ActivityItem::from(entry),
        }
    }
}

impl From<&TrackingEvent> for ActivityItem {
    fn from(event: &TrackingEvent) -> Self {
        ActivityItem::Tracking(event.clone())
    }
}

/// Period a report is restricted to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReportPeriod {
    #[default]
    AllTime,
    Month { year: i32, month: u32 },
}

impl ReportPeriod {
    /// Build from optional query parameters; incomplete or invalid means all time
    pub fn from_parts(year: Option<i32>, month: Option<u32>) -> Self {
        match (year, month) {
            (Some(year), Some(month)) if NaiveDate::from_ymd_opt(year, month, 1).is_some() => {
                ReportPeriod::Month { year, month }
            }
            _ => ReportPeriod::AllTime,
        }
    }

    /// Human label, e.g. "All Time" or "March 2024"
    pub fn label(&self) -> String {
        match self {
            ReportPeriod::AllTime => "All Time".to_string(),
            ReportPeriod::Month { year, month } => {
                let name = u8::try_from(*month)
                    .ok()
                    .and_then(|m| Month::try_from(m).ok())
                    .map(|m| m.name().to_string())
                    .unwrap_or_else(|| format!("{:02}", month));
                format!("{} {}", name, year)
            }
        }
    }

    pub fn contains(&self, year: i32, month: u32) -> bool {
        match self {
            ReportPeriod::AllTime => true,
            ReportPeriod::Month { year: y, month: m } => *y == year && *m == month,
        }
    }
}

/// Report header data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMeta {
    /// File-name stem, e.g. "Contact_Analytics_Report"
    pub report_name: String,
    /// Title printed on the first line of the report
    pub title: String,
    pub period: ReportPeriod,
}

/// Query of `GET /api/d400/report`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportRequest {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

/// "<ReportName>_<Period>.csv" with spaces in the period replaced by underscores
pub fn report_file_name(meta: &ReportMeta) -> String {
    let period = match meta.period {
        ReportPeriod::AllTime => "All_Time".to_string(),
        period => period.label().replace(' ', "_"),
    };
    format!("{}_{}.csv", meta.report_name, period)
}

/// File name from a `Content-Disposition` header value
pub fn file_name_from_disposition(header: &str) -> Option<String> {
    header
        .split(';')
        .filter_map(|part| part.trim().strip_prefix("filename="))
        .map(|name| name.trim().trim_matches('"').to_string())
        .find(|name| !name.is_empty())
}
