//! Contacts and forms analytics: monthly chart series and the CSV report header.

pub mod dto;
pub mod series;

pub use dto::{
    file_name_from_disposition, report_file_name, ActivityItem, MonthBucket, ReportMeta,
    ReportPeriod, ReportRequest,
};
pub use series::{bucket_by_month, bucket_by_month_in, month_label};
