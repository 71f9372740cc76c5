//! Period bucketing.
//!
//! Maps a timestamp to the calendar period containing it. Buckets are
//! keyed by their first day so they sort chronologically.

use chrono::{DateTime, Datelike, Days, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Grouping granularity for trend reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// Calendar day.
    Day,
    /// ISO week (Monday start).
    Week,
    /// Calendar month.
    #[default]
    Month,
    /// Calendar quarter.
    Quarter,
    /// Calendar year.
    Year,
}

impl Granularity {
    /// Parses a granularity from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "day" => Some(Self::Day),
            "week" => Some(Self::Week),
            "month" => Some(Self::Month),
            "quarter" => Some(Self::Quarter),
            "year" => Some(Self::Year),
            _ => None,
        }
    }

    /// Returns the string representation of the granularity.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Quarter => "quarter",
            Self::Year => "year",
        }
    }

    /// How many of the most recent buckets a report keeps.
    #[must_use]
    pub const fn cap(&self) -> usize {
        match self {
            Self::Quarter => 8,
            Self::Day | Self::Week | Self::Month | Self::Year => 12,
        }
    }

    /// Buckets a timestamp (by its UTC calendar date).
    #[must_use]
    pub fn bucket(&self, at: DateTime<Utc>) -> Period {
        self.bucket_date(at.date_naive())
    }

    /// Buckets a calendar date.
    #[must_use]
    pub fn bucket_date(&self, date: NaiveDate) -> Period {
        match self {
            Self::Day => Period {
                start: date,
                label: date.format("%Y-%m-%d").to_string(),
            },
            Self::Week => {
                let start = date - Days::new(u64::from(date.weekday().num_days_from_monday()));
                let iso = date.iso_week();
                Period {
                    start,
                    label: format!("{}-W{:02}", iso.year(), iso.week()),
                }
            }
            Self::Month => Period {
                start: month_start(date),
                label: date.format("%Y-%m").to_string(),
            },
            Self::Quarter => {
                let quarter = date.month0() / 3;
                Period {
                    start: month_start(date) - Months::new(date.month0() % 3),
                    label: format!("{}-Q{}", date.year(), quarter + 1),
                }
            }
            Self::Year => Period {
                start: date - Days::new(u64::from(date.ordinal0())),
                label: date.format("%Y").to_string(),
            },
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn month_start(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.day0()))
}

/// A reporting period.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Period {
    /// First day of the period.
    pub start: NaiveDate,
    /// Display key (`2025-03-14`, `2025-W11`, `2025-03`, `2025-Q1`, `2025`).
    pub label: String,
}
