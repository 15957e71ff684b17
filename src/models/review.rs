// Copyright (c) SmartInfra Team
// SPDX-License-Identifier: Apache-2.0

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::Serialize;

/// Review row joined with the reviewer's account, as listed in the dashboard
#[derive(Debug, Queryable, Serialize)]
pub struct ReviewWithUser {
    pub id: i32,
    pub user_id: i32,
    pub username: String,
    pub full_name: String,
    pub rating: i16,
    pub comment: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Aggregates for the review analytics cards
#[derive(Debug, Serialize)]
pub struct RatingSummary {
    pub total: i64,
    pub average_rating: f64,
    pub five_star_count: i64,
}

impl RatingSummary {
    /// Summarize a list of ratings; an empty list averages to 0.0
    pub fn from_ratings(ratings: &[i16]) -> Self {
        let total = ratings.len() as i64;
        let average_rating = if ratings.is_empty() {
            0.0
        } else {
            ratings.iter().map(|r| *r as f64).sum::<f64>() / ratings.len() as f64
        };
        let five_star_count = ratings.iter().filter(|r| **r == 5).count() as i64;
        Self {
            total,
            average_rating,
            five_star_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_of_no_ratings_is_all_zero() {
        let summary = RatingSummary::from_ratings(&[]);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.average_rating, 0.0);
        assert_eq!(summary.five_star_count, 0);
    }

    #[test]
    fn summary_averages_and_counts_five_stars() {
        let summary = RatingSummary::from_ratings(&[5, 4, 5, 2]);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.average_rating, 4.0);
        assert_eq!(summary.five_star_count, 2);
    }
}
