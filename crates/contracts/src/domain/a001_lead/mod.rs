//! Leads: prospective-customer form submissions normalized from every
//! historical form shape.

pub mod aggregate;
pub mod aggregator;
pub mod board;
pub mod mapper;
pub mod resolver;

pub use aggregate::{
    FormSubmissionDto, Lead, LeadSource, LeadStatus, LeadStatusUpdateDto, LeadsResponse,
    RawLocalSubmission, RawSubmission, SubmissionSource,
};
pub use aggregator::{filter_leads, group_by_status, status_counts};
pub use board::{LeadBoard, StatusChange};
pub use mapper::{
    local_sources, map_local, map_local_batch, map_persisted, map_source, persisted_sources,
};
