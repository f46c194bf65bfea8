//! Normalization of raw submissions into [`Lead`]s

use serde_json::{Map, Value};

use super::aggregate::{Lead, LeadSource, RawLocalSubmission, RawSubmission, SubmissionSource};
use super::resolver::{first_present, resolve, resolve_str};
use crate::shared::timestamp::{now_iso, parse_timestamp};

pub const UNKNOWN_NAME: &str = "Unknown";
pub const NOT_PROVIDED: &str = "Not provided";
pub const UNKNOWN_FORM_TYPE: &str = "unknown";
pub const DEFAULT_STATUS: &str = "new";

const NAME_KEYS: &[&str] = &["name", "full_name"];
const EMAIL_KEYS: &[&str] = &["email", "emailAddress", "contact_email"];
const PHONE_KEYS: &[&str] = &["phone", "phoneNumber", "contact_phone"];

/// Contact fields shared by both submission shapes
struct Contact {
    name: String,
    email: String,
    phone: String,
}

fn resolve_contact(data: &Map<String, Value>) -> Contact {
    let name = first_present(data, NAME_KEYS)
        .or_else(|| combined_name(data))
        .unwrap_or_else(|| UNKNOWN_NAME.to_string());
    let email = first_present(data, EMAIL_KEYS).unwrap_or_else(|| NOT_PROVIDED.to_string());
    let phone = first_present(data, PHONE_KEYS).unwrap_or_else(|| NOT_PROVIDED.to_string());
    Contact { name, email, phone }
}

/// `"{firstName} {lastName}"`, only when both halves are usable
fn combined_name(data: &Map<String, Value>) -> Option<String> {
    let first = resolve(data.get("firstName"))?;
    let last = resolve(data.get("lastName"))?;
    Some(format!("{} {}", first, last))
}

/// Map a row of the persisted submissions table
pub fn map_persisted(submission: &RawSubmission) -> Lead {
    let data = submission.form_data.clone().unwrap_or_default();
    let contact = resolve_contact(&data);

    Lead {
        id: submission.id,
        name: contact.name,
        email: contact.email,
        phone: contact.phone,
        form_type: resolve_str(submission.form_type.as_deref())
            .unwrap_or_else(|| UNKNOWN_FORM_TYPE.to_string()),
        status: resolve_str(submission.status.as_deref())
            .unwrap_or_else(|| DEFAULT_STATUS.to_string()),
        created_at: resolve_str(submission.created_at.as_deref()).unwrap_or_else(now_iso),
        raw_data: data,
        source: LeadSource::Persisted,
    }
}

/// Map an entry of the local submissions log.
///
/// `index` is the entry's position in the batch; it becomes the id when the
/// timestamp cannot be parsed.
pub fn map_local(entry: &RawLocalSubmission, index: usize) -> Lead {
    let contact = resolve_contact(&entry.form_data);
    let parsed = parse_timestamp(&entry.timestamp);

    let id = parsed
        .map(|dt| dt.timestamp_millis())
        .unwrap_or(index as i64 + 1);
    let created_at = match parsed {
        Some(_) => entry.timestamp.trim().to_string(),
        None => now_iso(),
    };

    Lead {
        id,
        name: contact.name,
        email: contact.email,
        phone: contact.phone,
        form_type: resolve_str(Some(&entry.form_type))
            .unwrap_or_else(|| UNKNOWN_FORM_TYPE.to_string()),
        status: DEFAULT_STATUS.to_string(),
        created_at,
        raw_data: entry.form_data.clone(),
        source: LeadSource::Local,
    }
}

/// Map either submission shape
pub fn map_source(source: &SubmissionSource) -> Lead {
    match source {
        SubmissionSource::Persisted(submission) => map_persisted(submission),
        SubmissionSource::Local { entry, index } => map_local(entry, *index),
    }
}

/// Tag persisted rows for mapping
pub fn persisted_sources(rows: Vec<RawSubmission>) -> Vec<SubmissionSource> {
    rows.into_iter().map(SubmissionSource::Persisted).collect()
}

/// Tag a local log with each entry's position in it
pub fn local_sources(entries: Vec<RawLocalSubmission>) -> Vec<SubmissionSource> {
    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| SubmissionSource::Local { entry, index })
        .collect()
}

/// Map a whole local log; positions are taken within this batch
pub fn map_local_batch(entries: &[RawLocalSubmission]) -> Vec<Lead> {
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| map_local(entry, index))
        .collect()
}
