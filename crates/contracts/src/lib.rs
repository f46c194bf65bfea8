//! Types and pure logic shared by the backend and the browser client:
//! lead normalization, search and grouping, analytics series, report naming.

pub mod dashboards;
pub mod domain;
pub mod shared;
