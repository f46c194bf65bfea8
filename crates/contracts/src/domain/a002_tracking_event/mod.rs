pub mod aggregate;

pub use aggregate::{TrackingEvent, TrackingEventDto};
