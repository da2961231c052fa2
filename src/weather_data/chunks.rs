//! Splits an inclusive date range into consecutive bounded-size chunks.

use chrono::{Days, NaiveDate};
use std::fmt;

/// An inclusive `[start, end]` sub-range of days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DateChunk {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateChunk {
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

impl fmt::Display for DateChunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Iterator over the chunks of `[start, end]`, in date order, each at most
/// `chunk_days` long; the last chunk is cut short at `end`.
///
/// A `chunk_days` of 0 is treated as 1. An inverted range yields nothing.
///
/// ```
/// use chrono::NaiveDate;
/// use geo_enrich::DateChunks;
///
/// let d = |day| NaiveDate::from_ymd_opt(2023, 1, day).unwrap();
/// let chunks: Vec<_> = DateChunks::new(d(1), d(10), 4).map(|c| c.to_string()).collect();
/// assert_eq!(chunks, vec!["2023-01-01..2023-01-04", "2023-01-05..2023-01-08", "2023-01-09..2023-01-10"]);
/// ```
#[derive(Debug, Clone)]
pub struct DateChunks {
    cursor: Option<NaiveDate>,
    end: NaiveDate,
    span: Days,
}

impl DateChunks {
    pub fn new(start: NaiveDate, end: NaiveDate, chunk_days: u32) -> Self {
        Self {
            cursor: (start <= end).then_some(start),
            end,
            span: Days::new(u64::from(chunk_days.max(1) - 1)),
        }
    }
}

impl Iterator for DateChunks {
    type Item = DateChunk;

    fn next(&mut self) -> Option<DateChunk> {
        let start = self.cursor?;
        let end = start
            .checked_add_days(self.span)
            .map_or(self.end, |candidate| candidate.min(self.end));
        self.cursor = if end < self.end { end.succ_opt() } else { None };
        Some(DateChunk { start, end })
    }
}
