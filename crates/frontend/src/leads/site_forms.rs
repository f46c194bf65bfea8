//! Public-site side: contact form submissions and contact-button clicks.
use contracts::domain::a001_lead::aggregate::{FormSubmissionDto, RawLocalSubmission};
use contracts::domain::a002_tracking_event::aggregate::{TrackingEvent, TrackingEventDto};
use contracts::shared::timestamp::now_iso;

use crate::shared::api;
use crate::shared::local_cache::BrowserLocalCache;

/// Send a form to the backend; keep it in local storage when that fails
pub async fn submit_form(dto: FormSubmissionDto) -> Result<(), String> {
    if let Err(e) = api::post_submission(&dto).await {
        log::warn!("Submission not sent, keeping it locally: {}", e);
        let entry = RawLocalSubmission {
            timestamp: now_iso(),
            form_type: dto.form_type,
            form_data: dto.form_data,
        };
        BrowserLocalCache.append_submission(&entry)?;
    }
    Ok(())
}

/// Record a contact interaction (call, WhatsApp, email click)
pub async fn track_contact(dto: TrackingEventDto) -> Result<(), String> {
    if let Err(e) = api::post_tracking(&dto).await {
        log::warn!("Tracking event not sent, keeping it locally: {}", e);
        let event = TrackingEvent {
            method: dto.method,
            timestamp: now_iso(),
            details: dto.details,
            user_agent: dto.user_agent,
            url: dto.url,
        };
        BrowserLocalCache.append_tracking_event(&event)?;
    }
    Ok(())
}
