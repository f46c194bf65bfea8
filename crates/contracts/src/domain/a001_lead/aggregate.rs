use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::shared::lenient::{any_object, any_string};

// ============================================================================
// Raw shapes
// ============================================================================

/// Row of the `form_submissions` table as read by the admin views
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSubmission {
    pub id: i64,
    #[serde(default)]
    pub form_type: Option<String>,
    #[serde(default)]
    pub form_data: Option<Map<String, Value>>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Entry of the browser-side `formSubmissions` log
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLocalSubmission {
    #[serde(default, deserialize_with = "any_string")]
    pub timestamp: String,
    #[serde(default, deserialize_with = "any_string")]
    pub form_type: String,
    #[serde(default, deserialize_with = "any_object")]
    pub form_data: Map<String, Value>,
}

/// Either of the two submission shapes, tagged explicitly
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SubmissionSource {
    Persisted(RawSubmission),
    Local {
        entry: RawLocalSubmission,
        /// Position inside the batch being mapped
        index: usize,
    },
}

// ============================================================================
// Lead
// ============================================================================

/// Where a lead came from; only persisted leads have a remote row to update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeadSource {
    #[default]
    Persisted,
    Local,
}

/// Canonical lead built from any submission shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub form_type: String,
    pub status: String,
    pub created_at: String,
    pub raw_data: Map<String, Value>,
    #[serde(default)]
    pub source: LeadSource,
}

impl Lead {
    /// Status bucket this lead belongs to
    pub fn status_bucket(&self) -> LeadStatus {
        LeadStatus::from_loose(&self.status)
    }

    /// Text the admin search runs against
    pub fn search_haystack(&self) -> String {
        let mut parts: Vec<String> = vec![
            self.name.clone(),
            self.email.clone(),
            self.phone.clone(),
            self.form_type.clone(),
        ];
        parts.extend(self.raw_data.values().map(value_as_text));
        parts.join(" ")
    }
}

fn value_as_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ============================================================================
// Status
// ============================================================================

/// Lifecycle stage of a lead
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeadStatus {
    New,
    Contacted,
    Qualified,
    Archived,
}

impl LeadStatus {
    pub const ALL: [LeadStatus; 4] = [
        LeadStatus::New,
        LeadStatus::Contacted,
        LeadStatus::Qualified,
        LeadStatus::Archived,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStatus::New => "new",
            LeadStatus::Contacted => "contacted",
            LeadStatus::Qualified => "qualified",
            LeadStatus::Archived => "archived",
        }
    }

    /// Strict parse, used when an admin sets a status
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "new" => Some(LeadStatus::New),
            "contacted" => Some(LeadStatus::Contacted),
            "qualified" => Some(LeadStatus::Qualified),
            "archived" => Some(LeadStatus::Archived),
            _ => None,
        }
    }

    /// Lenient parse: anything unrecognized counts as `new`
    pub fn from_loose(s: &str) -> Self {
        Self::parse(s).unwrap_or(LeadStatus::New)
    }
}

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// DTOs
// ============================================================================

/// Body of `PUT /api/leads/:id/status`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadStatusUpdateDto {
    pub status: String,
}

/// Body of `POST /api/form_submissions`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSubmissionDto {
    pub form_type: String,
    #[serde(default)]
    pub form_data: Map<String, Value>,
}

/// Response of `GET /api/leads`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeadsResponse {
    pub leads: Vec<Lead>,
    /// Number of leads per status bucket
    pub counts: std::collections::BTreeMap<LeadStatus, usize>,
    /// Non-blocking message for the admin, e.g. a failed fetch
    pub notice: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_parsing() {
        assert_eq!(LeadStatus::parse("Contacted"), Some(LeadStatus::Contacted));
        assert_eq!(LeadStatus::parse(" archived "), Some(LeadStatus::Archived));
        assert_eq!(LeadStatus::parse("pending"), None);
        assert_eq!(LeadStatus::from_loose("pending"), LeadStatus::New);
        assert_eq!(LeadStatus::from_loose("QUALIFIED"), LeadStatus::Qualified);
    }

    #[test]
    fn test_local_submission_tolerates_missing_fields() {
        let entry: RawLocalSubmission =
            serde_json::from_value(json!({"timestamp": "2024-01-01T00:00:00Z", "formData": null}))
                .unwrap();
        assert!(entry.form_data.is_empty());
        assert_eq!(entry.form_type, "");
    }

    #[test]
    fn test_submission_source_is_tagged() {
        let source = SubmissionSource::Persisted(RawSubmission {
            id: 7,
            ..Default::default()
        });
        let value = serde_json::to_value(&source).unwrap();
        assert_eq!(value["kind"], "persisted");
        assert_eq!(value["id"], 7);
    }
}
