// Copyright (c) SmartInfra Team
// SPDX-License-Identifier: Apache-2.0

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::Serialize;
use std::str::FromStr;
use thiserror::Error;

/// Report row joined with the reporter's username, as listed in the dashboard
#[derive(Debug, Queryable, Serialize)]
pub struct ReportWithUser {
    pub id: i32,
    pub user_id: i32,
    pub uploaded_by: String,
    pub caption: String,
    pub image_url: String,
    pub severity: String,
    pub status: String,
    pub lat: f64,
    pub lng: f64,
    pub province: String,
    pub city: String,
    pub district: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Error)]
#[error("unknown report status: {0}")]
pub struct ParseStatusError(String);

/// Moderation state of a report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportStatus {
    Pending,
    InProgress,
    Resolved,
    Rejected,
}

impl ReportStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ReportStatus::Pending => "pending",
            ReportStatus::InProgress => "in_progress",
            ReportStatus::Resolved => "resolved",
            ReportStatus::Rejected => "rejected",
        }
    }

    /// Legal moderation transitions: a pending report can be picked up,
    /// resolved or rejected; an in-progress one can only be closed out.
    /// Resolved and rejected are terminal.
    pub fn can_transition_to(self, next: ReportStatus) -> bool {
        matches!(
            (self, next),
            (
                ReportStatus::Pending,
                ReportStatus::InProgress | ReportStatus::Resolved | ReportStatus::Rejected
            ) | (
                ReportStatus::InProgress,
                ReportStatus::Resolved | ReportStatus::Rejected
            )
        )
    }
}

impl FromStr for ReportStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ReportStatus::Pending),
            "in_progress" => Ok(ReportStatus::InProgress),
            "resolved" => Ok(ReportStatus::Resolved),
            "rejected" => Ok(ReportStatus::Rejected),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown severity: {0}")]
pub struct ParseSeverityError(String);

/// Damage severity reported by the citizen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Serious,
    Minor,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Serious => "serious",
            Severity::Minor => "minor",
        }
    }
}

impl FromStr for Severity {
    type Err = ParseSeverityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "serious" => Ok(Severity::Serious),
            "minor" => Ok(Severity::Minor),
            other => Err(ParseSeverityError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_reports_can_move_anywhere() {
        assert!(ReportStatus::Pending.can_transition_to(ReportStatus::InProgress));
        assert!(ReportStatus::Pending.can_transition_to(ReportStatus::Resolved));
        assert!(ReportStatus::Pending.can_transition_to(ReportStatus::Rejected));
    }

    #[test]
    fn in_progress_reports_can_only_close() {
        assert!(ReportStatus::InProgress.can_transition_to(ReportStatus::Resolved));
        assert!(ReportStatus::InProgress.can_transition_to(ReportStatus::Rejected));
        assert!(!ReportStatus::InProgress.can_transition_to(ReportStatus::Pending));
    }

    #[test]
    fn terminal_statuses_stay_terminal() {
        for terminal in [ReportStatus::Resolved, ReportStatus::Rejected] {
            for next in [
                ReportStatus::Pending,
                ReportStatus::InProgress,
                ReportStatus::Resolved,
                ReportStatus::Rejected,
            ] {
                assert!(!terminal.can_transition_to(next));
            }
        }
    }

    #[test]
    fn status_words_round_trip() {
        for status in [
            ReportStatus::Pending,
            ReportStatus::InProgress,
            ReportStatus::Resolved,
            ReportStatus::Rejected,
        ] {
            assert_eq!(status.as_str().parse::<ReportStatus>().unwrap(), status);
        }
        assert!("escalated".parse::<ReportStatus>().is_err());
    }
}
