// SPDX-FileCopyrightText: 2026 Relink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Seven-day breakdown of check-ins for the mood journal view.

use chrono::{DateTime, Datelike, Days, NaiveTime, TimeZone};
use serde::Serialize;

use crate::models::EmotionCheckIn;

const WEEKDAY_LABELS: [&str; 7] = ["일", "월", "화", "수", "목", "금", "토"];

/// Check-ins recorded on one calendar day.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySummary {
    /// Start of the day in milliseconds since the Unix epoch.
    pub date: i64,
    /// Short Korean weekday name.
    pub label: &'static str,
    /// Day of the month.
    pub day: u32,
    pub count: usize,
    pub check_ins: Vec<EmotionCheckIn>,
}

/// Buckets check-ins into the seven calendar days ending with `now`'s day,
/// oldest day first. Day boundaries follow `now`'s time zone.
pub fn weekly_days<Tz: TimeZone>(check_ins: &[EmotionCheckIn], now: &DateTime<Tz>) -> Vec<DaySummary> {
    let tz = now.timezone();
    let today = now.date_naive();

    (0..7u64)
        .rev()
        .filter_map(|back| {
            let date = today.checked_sub_days(Days::new(back))?;
            let next = date.checked_add_days(Days::new(1))?;
            let start = tz
                .from_local_datetime(&date.and_time(NaiveTime::MIN))
                .earliest()?
                .timestamp_millis();
            let end = tz
                .from_local_datetime(&next.and_time(NaiveTime::MIN))
                .earliest()?
                .timestamp_millis();

            let day_check_ins: Vec<EmotionCheckIn> = check_ins
                .iter()
                .filter(|c| c.date >= start && c.date < end)
                .cloned()
                .collect();

            Some(DaySummary {
                date: start,
                label: WEEKDAY_LABELS[date.weekday().num_days_from_sunday() as usize],
                day: date.day(),
                count: day_check_ins.len(),
                check_ins: day_check_ins,
            })
        })
        .collect()
}
