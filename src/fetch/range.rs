//! Inclusive date ranges and the two ways the service wants them cut up:
//! whole calendar years for historical series, single days for telemetry.

use crate::error::HidrowebError;
use chrono::{Datelike, NaiveDate};
use std::fmt;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// An inclusive `start..=end` range of days with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Fails with [`HidrowebError::InvalidRange`] when `end` is before `start`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, HidrowebError> {
        if end < start {
            return Err(HidrowebError::InvalidRange {
                start,
                end,
                reason: "end date is before start date".to_string(),
            });
        }
        Ok(Self { start, end })
    }

    /// Parses two `YYYY-MM-DD` strings.
    ///
    /// ```
    /// use hidroweb::DateRange;
    ///
    /// let range = DateRange::parse("2022-06-01", "2022-06-10").unwrap();
    /// assert_eq!(range.days().len(), 10);
    /// assert!(DateRange::parse("2022-06-10", "2022-06-01").is_err());
    /// ```
    pub fn parse(start: &str, end: &str) -> Result<Self, HidrowebError> {
        Self::new(parse_date(start)?, parse_date(end)?)
    }

    pub fn single_day(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Whole days between start and end (0 for a single-day range).
    pub fn span_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Fails with [`HidrowebError::InvalidRange`] when the range is wider than `max_days`.
    pub fn ensure_max_span(&self, max_days: i64) -> Result<(), HidrowebError> {
        if self.span_days() > max_days {
            return Err(HidrowebError::InvalidRange {
                start: self.start,
                end: self.end,
                reason: format!(
                    "span of {} days exceeds the maximum of {} days",
                    self.span_days(),
                    max_days
                ),
            });
        }
        Ok(())
    }

    /// One Jan 1..=Dec 31 range per calendar year the range touches, earliest first.
    ///
    /// The first and last years are not clipped to the requested bounds.
    pub fn calendar_years(&self) -> Vec<DateRange> {
        (self.start.year()..=self.end.year())
            .filter_map(|year| {
                Some(DateRange {
                    start: NaiveDate::from_ymd_opt(year, 1, 1)?,
                    end: NaiveDate::from_ymd_opt(year, 12, 31)?,
                })
            })
            .collect()
    }

    /// Every day of the range, earliest first.
    pub fn days(&self) -> Vec<NaiveDate> {
        self.start.iter_days().take_while(|d| *d <= self.end).collect()
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn parse_date(value: &str) -> Result<NaiveDate, HidrowebError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| {
        HidrowebError::InvalidArguments(format!("'{value}' is not a YYYY-MM-DD date"))
    })
}
