//! In-memory lead list of one admin view with optimistic status updates
//!
//! A status change is shown immediately. If the remote write fails the
//! previous status is restored, unless the lead changed again meanwhile.

use std::future::Future;

use super::aggregate::{Lead, LeadSource, LeadStatus};
use super::aggregator::{filter_leads, group_by_status, status_counts};
use std::collections::BTreeMap;

/// Compensating record for an optimistic status change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    pub lead_id: i64,
    pub previous: String,
    pub applied: String,
    pub source: LeadSource,
}

#[derive(Debug, Clone, Default)]
pub struct LeadBoard {
    leads: Vec<Lead>,
}

impl LeadBoard {
    pub fn new(leads: Vec<Lead>) -> Self {
        Self { leads }
    }

    pub fn leads(&self) -> &[Lead] {
        &self.leads
    }

    /// Replace the list after a reload
    pub fn replace(&mut self, leads: Vec<Lead>) {
        self.leads = leads;
    }

    pub fn get(&self, id: i64) -> Option<&Lead> {
        self.leads.iter().find(|l| l.id == id)
    }

    pub fn search(&self, term: &str) -> Vec<Lead> {
        filter_leads(&self.leads, term)
    }

    pub fn buckets(&self) -> BTreeMap<LeadStatus, Vec<Lead>> {
        group_by_status(&self.leads)
    }

    pub fn counts(&self) -> BTreeMap<LeadStatus, usize> {
        status_counts(&self.leads)
    }

    /// Set the status in memory; `None` when the lead is not on the board
    pub fn apply_status(&mut self, id: i64, status: LeadStatus) -> Option<StatusChange> {
        let lead = self.leads.iter_mut().find(|l| l.id == id)?;
        let previous = std::mem::replace(&mut lead.status, status.as_str().to_string());
        Some(StatusChange {
            lead_id: id,
            previous,
            applied: lead.status.clone(),
            source: lead.source,
        })
    }

    /// Undo an optimistic change. Returns false when a newer change won.
    pub fn revert(&mut self, change: &StatusChange) -> bool {
        match self.leads.iter_mut().find(|l| l.id == change.lead_id) {
            Some(lead) if lead.status == change.applied => {
                lead.status = change.previous.clone();
                true
            }
            _ => false,
        }
    }

    /// Optimistically change a status and write it back.
    ///
    /// `write` is only called for persisted leads; locally cached leads have
    /// no remote row. On write failure the change is reverted and the error
    /// returned.
    pub async fn update_status<F, Fut>(
        &mut self,
        id: i64,
        status: LeadStatus,
        write: F,
    ) -> anyhow::Result<()>
    where
        F: FnOnce(i64, LeadStatus) -> Fut,
        Fut: Future<Output = anyhow::Result<()>>,
    {
        let change = self
            .apply_status(id, status)
            .ok_or_else(|| anyhow::anyhow!("Lead {} is not loaded", id))?;

        if change.source == LeadSource::Local {
            return Ok(());
        }

        if let Err(e) = write(id, status).await {
            log::warn!("Status write for lead {} failed, reverting: {}", id, e);
            self.revert(&change);
            return Err(e);
        }
        Ok(())
    }
}
