//! Search and status grouping over an in-memory lead list

use std::collections::BTreeMap;

use super::aggregate::{Lead, LeadStatus};

/// Case-insensitive substring search; a blank term returns the list unchanged
pub fn filter_leads(leads: &[Lead], term: &str) -> Vec<Lead> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return leads.to_vec();
    }

    leads
        .iter()
        .filter(|lead| lead.search_haystack().to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

/// Partition leads by status; all four buckets are always present
pub fn group_by_status(leads: &[Lead]) -> BTreeMap<LeadStatus, Vec<Lead>> {
    let mut buckets: BTreeMap<LeadStatus, Vec<Lead>> = LeadStatus::ALL
        .iter()
        .map(|status| (*status, Vec::new()))
        .collect();

    for lead in leads {
        buckets
            .entry(lead.status_bucket())
            .or_default()
            .push(lead.clone());
    }

    buckets
}

/// Per-bucket counts for tab badges
pub fn status_counts(leads: &[Lead]) -> BTreeMap<LeadStatus, usize> {
    let mut counts: BTreeMap<LeadStatus, usize> =
        LeadStatus::ALL.iter().map(|status| (*status, 0)).collect();
    for lead in leads {
        *counts.entry(lead.status_bucket()).or_insert(0) += 1;
    }
    counts
}
