use contracts::dashboards::d400_lead_analytics::{
    file_name_from_disposition, MonthBucket, ReportPeriod,
};
use contracts::domain::a001_lead::aggregate::{
    FormSubmissionDto, LeadStatus, LeadStatusUpdateDto, LeadsResponse,
};
use contracts::domain::a002_tracking_event::aggregate::{TrackingEvent, TrackingEventDto};
use gloo_net::http::{Request, Response};

const LEADS_URL: &str = "/api/leads";
const D400_URL: &str = "/api/d400";


fn check(response: Response) -> Result<Response, String> {
    if response.ok() {
        Ok(response)
    } else {
        Err(format!("Server returned {}", response.status()))
    }
}

/// Fetch all leads; searching happens on the loaded board
pub async fn fetch_leads() -> Result<LeadsResponse, String> {
    let response = Request::get(LEADS_URL)
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;
    check(response)?
        .json()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

pub async fn put_lead_status(id: i64, status: LeadStatus) -> Result<(), String> {
    let dto = LeadStatusUpdateDto {
        status: status.as_str().to_string(),
    };
    let response = Request::put(&format!("{}/{}/status", LEADS_URL, id))
        .json(&dto)
        .map_err(|e| format!("Failed to serialize request: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;
    check(response).map(|_| ())
}

pub async fn post_submission(dto: &FormSubmissionDto) -> Result<(), String> {
    let response = Request::post("/api/form_submissions")
        .json(dto)
        .map_err(|e| format!("Failed to serialize request: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;
    check(response).map(|_| ())
}

pub async fn post_tracking(dto: &TrackingEventDto) -> Result<TrackingEvent, String> {
    let response = Request::post("/api/tracking")
        .json(dto)
        .map_err(|e| format!("Failed to serialize request: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;
    check(response)?
        .json()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

pub async fn fetch_lead_activity() -> Result<Vec<MonthBucket>, String> {
    let response = Request::get(&format!("{}/lead_activity", D400_URL))
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;
    check(response)?
        .json()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

/// Report as sent by the backend
pub struct ReportFile {
    /// Name from `Content-Disposition`, when the header carries one
    pub file_name: Option<String>,
    pub content: String,
}

/// Download the CSV report for a period
pub async fn fetch_report(period: &ReportPeriod) -> Result<ReportFile, String> {
    let url = match period {
        ReportPeriod::AllTime => format!("{}/report", D400_URL),
        ReportPeriod::Month { year, month } => {
            format!("{}/report?year={}&month={}", D400_URL, year, month)
        }
    };
    let response = Request::get(&url)
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;
    let response = check(response)?;
    let file_name = response
        .headers()
        .get("content-disposition")
        .and_then(|value| file_name_from_disposition(&value));
    let content = response
        .text()
        .await
        .map_err(|e| format!("Failed to read report: {}", e))?;
    Ok(ReportFile { file_name, content })
}
