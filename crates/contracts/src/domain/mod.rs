pub mod a001_lead;
pub mod a002_tracking_event;
