//! Admin leads view state.
//!
//! Holds the loaded leads in a [`LeadBoard`], falls back to the browser's
//! local submission log when the backend cannot be reached, and applies
//! status changes optimistically.

use std::collections::BTreeMap;

use contracts::dashboards::d400_lead_analytics::{MonthBucket, ReportPeriod};
use contracts::domain::a001_lead::aggregate::{Lead, LeadStatus};
use contracts::domain::a001_lead::{map_local_batch, LeadBoard};
use contracts::shared::local_cache::LocalCachePort;

use crate::shared::api;
use crate::shared::export::download_csv;
use crate::shared::local_cache::BrowserLocalCache;

const FALLBACK_REPORT_NAME: &str = "report.csv";

#[derive(Debug, Default)]
pub struct LeadsController {
    board: LeadBoard,
    search: String,
    activity: Vec<MonthBucket>,
    notice: Option<String>,
}

impl LeadsController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the board with the backend's leads, or the local log on failure
    pub async fn load(&mut self) {
        match api::fetch_leads().await {
            Ok(response) => {
                self.notice = response.notice;
                self.board.replace(response.leads);
            }
            Err(e) => {
                log::warn!("Leads fetch failed, using local storage: {}", e);
                self.load_local(Some(format!("Could not load submissions: {}", e)));
            }
        }
    }

    fn load_local(&mut self, notice: Option<String>) {
        let entries = BrowserLocalCache.read_submissions();
        self.board.replace(map_local_batch(&entries));
        self.notice = notice;
    }

    /// Remember `term` and return the leads that match it
    pub fn search(&mut self, term: &str) -> Vec<Lead> {
        self.search = term.to_string();
        self.visible()
    }

    /// Refresh the contacts/forms chart series
    pub async fn load_activity(&mut self) {
        match api::fetch_lead_activity().await {
            Ok(series) => self.activity = series,
            Err(e) => {
                log::warn!("Lead activity fetch failed: {}", e);
                self.activity.clear();
            }
        }
    }

    pub fn activity(&self) -> &[MonthBucket] {
        &self.activity
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn leads(&self) -> &[Lead] {
        self.board.leads()
    }

    /// Leads matching the current search term
    pub fn visible(&self) -> Vec<Lead> {
        self.board.search(&self.search)
    }

    pub fn buckets(&self) -> BTreeMap<LeadStatus, Vec<Lead>> {
        self.board.buckets()
    }

    pub fn counts(&self) -> BTreeMap<LeadStatus, usize> {
        self.board.counts()
    }

    /// Move a lead to another bucket; a failed write puts it back
    pub async fn update_status(&mut self, id: i64, status: LeadStatus) -> Result<(), String> {
        self.board
            .update_status(id, status, |id, status| async move {
                api::put_lead_status(id, status)
                    .await
                    .map_err(anyhow::Error::msg)
            })
            .await
            .map_err(|e| {
                self.notice = Some(format!("Could not update lead {}: {}", id, e));
                e.to_string()
            })
    }

    /// Fetch the CSV report for `period` and start the browser download
    pub async fn export_report(&self, period: ReportPeriod) -> Result<(), String> {
        let report = api::fetch_report(&period).await?;
        let file_name = report
            .file_name
            .unwrap_or_else(|| FALLBACK_REPORT_NAME.to_string());
        download_csv(&report.content, &file_name)
    }
}
