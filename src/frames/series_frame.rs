//! Contains the `SeriesLazyFrame` structure for lazy operations on daily readings
//! taken out of the monthly series rows.

use crate::types::series::{DailyReading, MonthlySeries};
use crate::HidrowebError;
use chrono::NaiveDate;
use polars::prelude::{col, lit, DataFrame, Expr, IntoLazy, LazyFrame};

/// Builds a `DataFrame` with one row per reading.
///
/// Columns: `station` (u64), `date` (Date), `value` (f64, nullable),
/// `status` (bool, nullable), `consistency` (u32: 1 raw, 2 consisted).
pub fn readings_frame(readings: &[DailyReading]) -> Result<DataFrame, HidrowebError> {
    let frame = polars::df!(
        "station" => readings.iter().map(|r| r.station_code).collect::<Vec<u64>>(),
        "date" => readings.iter().map(|r| r.date).collect::<Vec<NaiveDate>>(),
        "value" => readings.iter().map(|r| r.value).collect::<Vec<Option<f64>>>(),
        "status" => readings.iter().map(|r| r.status).collect::<Vec<Option<bool>>>(),
        "consistency" => readings
            .iter()
            .map(|r| u32::from(r.consistency.code()))
            .collect::<Vec<u32>>(),
    )?;
    Ok(frame)
}

/// A wrapper around a Polars `LazyFrame` holding daily readings, in the
/// layout produced by [`readings_frame`].
#[derive(Clone)]
pub struct SeriesLazyFrame {
    pub frame: LazyFrame,
}

impl SeriesLazyFrame {
    pub fn new(frame: LazyFrame) -> Self {
        Self { frame }
    }

    /// Expands monthly rows into one lazy frame of daily readings.
    ///
    /// ```
    /// use hidroweb::{MonthlyRainfall, SeriesLazyFrame};
    ///
    /// let rows: Vec<MonthlyRainfall> = Vec::new();
    /// let frame = SeriesLazyFrame::from_rows(&rows).unwrap();
    /// assert_eq!(frame.frame.collect().unwrap().height(), 0);
    /// ```
    pub fn from_rows<T: MonthlySeries>(rows: &[T]) -> Result<Self, HidrowebError> {
        let readings: Vec<DailyReading> = rows.iter().flat_map(|r| r.daily_readings()).collect();
        Ok(Self::new(readings_frame(&readings)?.lazy()))
    }

    /// Applies an arbitrary Polars predicate, returning a new frame.
    pub fn filter(&self, predicate: Expr) -> SeriesLazyFrame {
        SeriesLazyFrame::new(self.frame.clone().filter(predicate))
    }

    /// Keeps the readings dated `start..=end`.
    pub fn get_range(&self, start: NaiveDate, end: NaiveDate) -> SeriesLazyFrame {
        self.filter(
            col("date")
                .gt_eq(lit(start))
                .and(col("date").lt_eq(lit(end))),
        )
    }

    /// Keeps the readings of a single day.
    pub fn get_at(&self, date: NaiveDate) -> SeriesLazyFrame {
        self.filter(col("date").eq(lit(date)))
    }

    /// Drops the days without a value.
    pub fn with_values(&self) -> SeriesLazyFrame {
        self.filter(col("value").is_not_null())
    }
}
