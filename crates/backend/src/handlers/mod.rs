pub mod a001_lead;
pub mod a002_tracking_event;
pub mod d400_lead_analytics;
pub mod logs;
