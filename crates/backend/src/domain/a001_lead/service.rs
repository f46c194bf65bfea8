use contracts::dashboards::d400_lead_analytics::ActivityItem;
use contracts::domain::a001_lead::aggregate::{
    FormSubmissionDto, Lead, LeadStatus, LeadsResponse, SubmissionSource,
};
use contracts::domain::a001_lead::{
    filter_leads, group_by_status, local_sources, map_source, persisted_sources, status_counts,
};
use contracts::shared::local_cache::LocalCachePort;
use contracts::shared::logger::CATEGORY_LEADS;
use sea_orm::DatabaseConnection;
use std::collections::BTreeMap;
use thiserror::Error;

use super::repository;
use crate::shared::config;
use crate::shared::data::db::get_connection;
use crate::shared::local_cache::{get_cache, read_off_runtime, EmptyCache};
use crate::shared::logger;

/// Errors of the status write-back path
#[derive(Debug, Error)]
pub enum LeadError {
    #[error("Lead {0} not found")]
    NotFound(i64),

    #[error("Unknown lead status: {0}")]
    InvalidStatus(String),

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

/// Leads of one view load plus the form activity they came from
#[derive(Debug, Clone, Default)]
pub struct LoadedLeads {
    pub leads: Vec<Lead>,
    /// Form submissions with their source timestamps, for the analytics series
    pub forms: Vec<ActivityItem>,
    pub notice: Option<String>,
}

/// Load leads from the submissions table, falling back to the local cache.
///
/// Persisted rows win when there are any. An empty table reads the local
/// cache silently; a failed fetch reads it too and sets a notice. A failed
/// fetch never becomes an error.
pub async fn load_from<C>(db: Option<&DatabaseConnection>, cache: C, limit: u64) -> LoadedLeads
where
    C: LocalCachePort + Send + 'static,
{
    let fetched = match db {
        Some(db) => repository::list_recent(db, limit).await,
        None => Err(anyhow::anyhow!("Database connection has not been initialized")),
    };

    match fetched {
        Ok(rows) if !rows.is_empty() => {
            tracing::info!("Loaded {} persisted leads", rows.len());
            from_sources(persisted_sources(rows), None)
        }
        Ok(_) => {
            tracing::info!("No persisted submissions, reading local cache");
            load_local(cache, None).await
        }
        Err(e) => {
            tracing::error!("Failed to fetch form submissions: {}", e);
            logger::log(CATEGORY_LEADS, &format!("Fetch failed, using local cache: {}", e));
            load_local(cache, Some(format!("Could not load submissions: {}", e))).await
        }
    }
}

async fn load_local<C>(cache: C, notice: Option<String>) -> LoadedLeads
where
    C: LocalCachePort + Send + 'static,
{
    let entries = read_off_runtime(cache, |c| c.read_submissions()).await;
    tracing::info!("Loaded {} leads from local cache", entries.len());
    from_sources(local_sources(entries), notice)
}

fn from_sources(sources: Vec<SubmissionSource>, notice: Option<String>) -> LoadedLeads {
    LoadedLeads {
        leads: sources.iter().map(map_source).collect(),
        // Raw source timestamps: entries without a usable date stay off the chart.
        forms: sources.iter().map(ActivityItem::from).collect(),
        notice,
    }
}

/// Load with the process-wide database, cache and configuration
pub async fn load() -> LoadedLeads {
    let limit = config::current().leads.fetch_limit;
    let db = get_connection().ok();
    match get_cache() {
        Ok(cache) => load_from(db, cache, limit).await,
        Err(e) => {
            tracing::warn!("{}", e);
            load_from(db, EmptyCache, limit).await
        }
    }
}

/// Leads matching `term`, with bucket counts over the whole list
pub fn to_response(loaded: LoadedLeads, term: Option<&str>) -> LeadsResponse {
    let counts = status_counts(&loaded.leads);
    let leads = match term {
        Some(term) => filter_leads(&loaded.leads, term),
        None => loaded.leads,
    };
    LeadsResponse {
        leads,
        counts,
        notice: loaded.notice,
    }
}

pub async fn list(term: Option<&str>) -> LeadsResponse {
    to_response(load().await, term)
}

pub async fn buckets() -> BTreeMap<LeadStatus, Vec<Lead>> {
    group_by_status(&load().await.leads)
}

/// Write a status change back to the submissions table
pub async fn update_status_on(
    db: &DatabaseConnection,
    id: i64,
    status: &str,
) -> Result<LeadStatus, LeadError> {
    let status =
        LeadStatus::parse(status).ok_or_else(|| LeadError::InvalidStatus(status.to_string()))?;

    if !repository::update_status(db, id, status.as_str()).await? {
        return Err(LeadError::NotFound(id));
    }

    logger::log(CATEGORY_LEADS, &format!("Lead {} set to {}", id, status));
    Ok(status)
}

pub async fn update_status(id: i64, status: &str) -> Result<LeadStatus, LeadError> {
    update_status_on(get_connection()?, id, status).await
}

/// Store a submission coming from a site form
pub async fn record_submission_on(
    db: &DatabaseConnection,
    dto: FormSubmissionDto,
) -> anyhow::Result<i64> {
    let form_type = if dto.form_type.trim().is_empty() {
        "unknown"
    } else {
        dto.form_type.trim()
    };
    let id = repository::insert(db, form_type, &dto.form_data).await?;
    tracing::info!("Recorded {} submission {}", form_type, id);
    Ok(id)
}

pub async fn record_submission(dto: FormSubmissionDto) -> anyhow::Result<i64> {
    record_submission_on(get_connection()?, dto).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a001_lead::aggregate::{LeadSource, RawLocalSubmission};
    use contracts::domain::a002_tracking_event::aggregate::TrackingEvent;
    use crate::shared::data::db::memory_database;
    use crate::shared::local_cache::{temp_cache_path, JsonFileCache};
    use serde_json::json;

    struct StaticCache(Vec<RawLocalSubmission>);

    impl LocalCachePort for StaticCache {
        fn read_submissions(&self) -> Vec<RawLocalSubmission> {
            self.0.clone()
        }

        fn read_tracking_events(&self) -> Vec<TrackingEvent> {
            Vec::new()
        }
    }

    fn sara_cache() -> StaticCache {
        let entry: RawLocalSubmission = serde_json::from_value(json!({
            "timestamp": "2024-05-01T12:00:00Z",
            "formType": "contact_form",
            "formData": {"firstName": "Sara", "email": "sara@test.com"}
        }))
        .unwrap();
        StaticCache(vec![entry])
    }

    #[tokio::test]
    async fn test_fetch_failure_falls_back_to_local_cache() {
        let loaded = load_from(None, sara_cache(), 200).await;

        assert_eq!(loaded.leads.len(), 1);
        let lead = &loaded.leads[0];
        // firstName without lastName does not make a combined name
        assert_eq!(lead.name, "Unknown");
        assert_eq!(lead.email, "sara@test.com");
        assert_eq!(lead.phone, "Not provided");
        assert_eq!(lead.form_type, "contact_form");
        assert_eq!(lead.status, "new");
        assert_eq!(lead.source, LeadSource::Local);
        assert!(loaded.notice.is_some());
        assert_eq!(loaded.forms.len(), 1);
    }

    #[tokio::test]
    async fn test_fallback_keeps_wrong_typed_cache_entries() {
        let path = temp_cache_path("wrong-typed");
        let content = json!({
            "formSubmissions": [
                {"timestamp": null, "formType": "contact_form", "formData": {"name": "A"}},
                {"timestamp": 5, "formType": null, "formData": "name=B"},
                {"timestamp": "2024-05-01T12:00:00Z", "formType": "quote_request", "formData": null}
            ]
        });
        std::fs::write(&path, content.to_string()).unwrap();

        let loaded = load_from(None, JsonFileCache::new(&path), 200).await;
        let ids: Vec<i64> = loaded.leads.iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![1, 2, 1_714_564_800_000]);
        assert_eq!(loaded.leads[1].form_type, "unknown");
        assert_eq!(loaded.forms.len(), 3);
        assert!(loaded.notice.is_some());
        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn test_empty_table_reads_cache_without_notice() {
        let db = memory_database().await;
        let loaded = load_from(Some(&db), sara_cache(), 200).await;
        assert_eq!(loaded.leads.len(), 1);
        assert!(loaded.notice.is_none());
    }

    #[tokio::test]
    async fn test_persisted_rows_take_precedence() {
        let db = memory_database().await;
        let dto = FormSubmissionDto {
            form_type: "quote_request".into(),
            form_data: json!({"name": "Ahmed Hassan", "phoneNumber": "0100"})
                .as_object()
                .cloned()
                .unwrap(),
        };
        let id = record_submission_on(&db, dto).await.unwrap();

        let loaded = load_from(Some(&db), sara_cache(), 200).await;
        assert_eq!(loaded.leads.len(), 1);
        assert_eq!(loaded.leads[0].id, id);
        assert_eq!(loaded.leads[0].name, "Ahmed Hassan");
        assert_eq!(loaded.leads[0].phone, "0100");
        assert_eq!(loaded.leads[0].source, LeadSource::Persisted);
    }

    #[tokio::test]
    async fn test_update_status_validation() {
        let db = memory_database().await;
        let id = record_submission_on(
            &db,
            FormSubmissionDto {
                form_type: " ".into(),
                form_data: Default::default(),
            },
        )
        .await
        .unwrap();

        assert!(matches!(
            update_status_on(&db, id, "pending").await,
            Err(LeadError::InvalidStatus(_))
        ));
        assert!(matches!(
            update_status_on(&db, id + 1, "contacted").await,
            Err(LeadError::NotFound(_))
        ));
        assert_eq!(
            update_status_on(&db, id, "Qualified").await.unwrap(),
            LeadStatus::Qualified
        );

        let loaded = load_from(Some(&db), EmptyCache, 200).await;
        assert_eq!(loaded.leads[0].status, "qualified");
        assert_eq!(loaded.leads[0].form_type, "unknown");
    }

    #[test]
    fn test_response_counts_cover_all_leads() {
        let loaded = LoadedLeads {
            leads: contracts::domain::a001_lead::map_local_batch(&sara_cache().0),
            forms: Vec::new(),
            notice: None,
        };
        let response = to_response(loaded, Some("nomatch"));
        assert!(response.leads.is_empty());
        assert_eq!(response.counts[&LeadStatus::New], 1);
    }
}
