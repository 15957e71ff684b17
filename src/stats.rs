// Copyright (c) SmartInfra Team
// SPDX-License-Identifier: Apache-2.0

//! Time-series bucketing for the dashboard growth chart.
//!
//! Turns raw user-registration and report-submission timestamps into a
//! sorted, windowed series of per-bucket counts. Pure computation: no I/O,
//! no shared state, safe to re-run on every granularity change.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::collections::BTreeMap;
use std::str::FromStr;
use thiserror::Error;

/// Time-bucket width selected by the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    Daily,
    Weekly,
    Monthly,
    All,
}

#[derive(Debug, Error)]
#[error("unknown granularity: {0} (expected daily, weekly, monthly or all)")]
pub struct ParseGranularityError(String);

impl FromStr for Granularity {
    type Err = ParseGranularityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(Granularity::Daily),
            "weekly" => Ok(Granularity::Weekly),
            "monthly" => Ok(Granularity::Monthly),
            "all" => Ok(Granularity::All),
            other => Err(ParseGranularityError(other.to_string())),
        }
    }
}

impl Granularity {
    /// How many trailing buckets the chart keeps, `None` meaning unwindowed
    fn window(self) -> Option<usize> {
        match self {
            Granularity::Daily => Some(30),
            Granularity::Weekly => Some(12),
            Granularity::Monthly => Some(12),
            Granularity::All => None,
        }
    }
}

/// One chart point: a bucket key plus how many users registered and how many
/// reports were submitted inside that bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GrowthPoint {
    pub key: String,
    pub user_count: u32,
    pub post_count: u32,
}

/// Parse a raw timestamp into a calendar date, `None` when malformed.
/// Accepts RFC 3339, ISO date-times with or without a `T`, and bare dates.
fn parse_timestamp(raw: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(dt.date());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// Bucket key for a date at the given granularity. Weeks start on Sunday;
/// the Sunday itself maps to its own week.
fn bucket_key(date: NaiveDate, granularity: Granularity) -> String {
    match granularity {
        Granularity::Daily => date.format("%Y-%m-%d").to_string(),
        Granularity::Weekly => {
            let offset = date.weekday().num_days_from_sunday() as i64;
            (date - Duration::days(offset)).format("%Y-%m-%d").to_string()
        }
        Granularity::Monthly | Granularity::All => date.format("%Y-%m").to_string(),
    }
}

/// Bucket user-registration and report-submission timestamps into a sorted,
/// windowed growth series.
///
/// Malformed timestamps are skipped so that bad rows from the backend never
/// abort rendering of the valid ones. Keys sort lexicographically, which is
/// chronological for every key shape the buckets produce; windowing then
/// drops the oldest entries, keeping the tail of the series.
pub fn growth_series<'a, U, P>(users: U, posts: P, granularity: Granularity) -> Vec<GrowthPoint>
where
    U: IntoIterator<Item = &'a str>,
    P: IntoIterator<Item = &'a str>,
{
    let mut buckets: BTreeMap<String, (u32, u32)> = BTreeMap::new();

    for raw in users {
        if let Some(date) = parse_timestamp(raw) {
            buckets.entry(bucket_key(date, granularity)).or_insert((0, 0)).0 += 1;
        }
    }
    for raw in posts {
        if let Some(date) = parse_timestamp(raw) {
            buckets.entry(bucket_key(date, granularity)).or_insert((0, 0)).1 += 1;
        }
    }

    let mut series: Vec<GrowthPoint> = buckets
        .into_iter()
        .map(|(key, (user_count, post_count))| GrowthPoint {
            key,
            user_count,
            post_count,
        })
        .collect();

    match granularity.window() {
        Some(n) if series.len() > n => series.split_off(series.len() - n),
        _ => series,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strs(v: &[&'static str]) -> Vec<&'static str> {
        v.to_vec()
    }

    #[test]
    fn empty_inputs_give_empty_series() {
        for granularity in [
            Granularity::Daily,
            Granularity::Weekly,
            Granularity::Monthly,
            Granularity::All,
        ] {
            assert!(growth_series([], [], granularity).is_empty());
        }
    }

    #[test]
    fn monthly_buckets_merge_users_and_posts() {
        let users = strs(&["2024-03-01", "2024-03-15"]);
        let posts = strs(&["2024-03-02"]);
        let series = growth_series(users, posts, Granularity::Monthly);
        assert_eq!(
            series,
            vec![GrowthPoint {
                key: "2024-03".to_string(),
                user_count: 2,
                post_count: 1,
            }]
        );
    }

    #[test]
    fn weekly_buckets_start_on_sunday() {
        // 2024-01-07 is a Sunday, 2024-01-08 the following Monday
        let users = strs(&["2024-01-07T00:00:00Z", "2024-01-08"]);
        let series = growth_series(users, [], Granularity::Weekly);
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].key, "2024-01-07");
        assert_eq!(series[0].user_count, 2);
    }

    #[test]
    fn saturday_belongs_to_previous_sunday_week() {
        // 2024-01-13 is the Saturday closing the week of 2024-01-07
        let series = growth_series(["2024-01-13"], [], Granularity::Weekly);
        assert_eq!(series[0].key, "2024-01-07");
    }

    #[test]
    fn malformed_timestamps_are_skipped() {
        let users = strs(&["not-a-date", "2024-03-01"]);
        let series = growth_series(users, [], Granularity::Daily);
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].key, "2024-03-01");
        assert_eq!(series[0].user_count, 1);
    }

    #[test]
    fn series_is_sorted_strictly_ascending() {
        let users = strs(&["2024-03-05", "2024-01-20", "2024-02-11", "2024-01-20"]);
        let posts = strs(&["2023-12-31", "2024-02-14"]);
        let series = growth_series(users, posts, Granularity::Daily);
        for pair in series.windows(2) {
            assert!(pair[0].key < pair[1].key);
        }
    }

    #[test]
    fn daily_window_keeps_latest_thirty_days() {
        let days: Vec<String> = (1..=31)
            .map(|d| format!("2024-03-{d:02}T08:30:00"))
            .collect();
        let series = growth_series(days.iter().map(String::as_str), [], Granularity::Daily);
        assert_eq!(series.len(), 30);
        // oldest day fell out of the window, latest survived
        assert_eq!(series[0].key, "2024-03-02");
        assert_eq!(series[29].key, "2024-03-31");
    }

    #[test]
    fn all_granularity_is_unwindowed() {
        let months: Vec<String> = (2000..2020)
            .map(|y| format!("{y}-06-15"))
            .collect();
        let series = growth_series(months.iter().map(String::as_str), [], Granularity::All);
        assert_eq!(series.len(), 20);
        assert_eq!(series[0].key, "2000-06");
    }

    #[test]
    fn user_counts_are_conserved() {
        let users = strs(&["2024-03-01", "2024-03-01T12:00:00Z", "garbage", "2024-04-09"]);
        let series = growth_series(users, [], Granularity::Monthly);
        let total: u32 = series.iter().map(|p| p.user_count).sum();
        assert_eq!(total, 3);
    }

    #[test]
    fn recomputation_is_deterministic() {
        let users = strs(&["2024-03-01", "2024-01-07", "2024-02-29"]);
        let posts = strs(&["2024-02-02", "2024-03-30"]);
        for granularity in [Granularity::Daily, Granularity::Weekly, Granularity::Monthly] {
            let first = growth_series(users.clone(), posts.clone(), granularity);
            let second = growth_series(users.clone(), posts.clone(), granularity);
            assert_eq!(first, second);
        }
    }

    #[test]
    fn granularity_parses_from_query_words() {
        assert_eq!("daily".parse::<Granularity>().unwrap(), Granularity::Daily);
        assert_eq!("all".parse::<Granularity>().unwrap(), Granularity::All);
        assert!("hourly".parse::<Granularity>().is_err());
    }
}
