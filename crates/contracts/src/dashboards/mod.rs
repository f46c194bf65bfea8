pub mod d400_lead_analytics;
