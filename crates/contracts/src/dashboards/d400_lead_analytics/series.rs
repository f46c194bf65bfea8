//! Month-bucketed contacts/forms series for the analytics chart

use chrono::{Datelike, Local, NaiveDate, TimeZone};
use std::collections::BTreeMap;

use super::dto::{ActivityItem, MonthBucket};
use crate::shared::timestamp::parse_timestamp;

/// Bucket by calendar month in the local timezone
pub fn bucket_by_month(items: &[ActivityItem]) -> Vec<MonthBucket> {
    bucket_by_month_in(items, &Local)
}

/// Bucket by calendar month in `tz`.
///
/// Items whose timestamp does not parse are skipped. Buckets come out oldest
/// month first.
pub fn bucket_by_month_in<Tz: TimeZone>(items: &[ActivityItem], tz: &Tz) -> Vec<MonthBucket> {
    let mut months: BTreeMap<(i32, u32), (u32, u32)> = BTreeMap::new();

    for item in items {
        let Some(utc) = parse_timestamp(item.timestamp()) else {
            continue;
        };
        let local = utc.with_timezone(tz);
        let counts = months.entry((local.year(), local.month())).or_insert((0, 0));
        if item.is_tracking() {
            counts.0 += 1;
        } else {
            counts.1 += 1;
        }
    }

    months
        .into_iter()
        .map(|((year, month), (contacts, forms))| MonthBucket {
            name: month_label(year, month),
            contacts,
            forms,
        })
        .collect()
}

/// "MMM 'YY", e.g. "Mar '24"
pub fn month_label(year: i32, month: u32) -> String {
    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|d| d.format("%b '%y").to_string())
        .unwrap_or_else(|| format!("{:02} '{:02}", month, year.rem_euclid(100)))
}
