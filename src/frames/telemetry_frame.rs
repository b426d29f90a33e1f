//! Contains the `TelemetryLazyFrame` structure for lazy operations on telemetry readings.

use crate::types::telemetry::{TelemetryReading, TelemetryRecord};
use crate::HidrowebError;
use chrono::{NaiveDate, NaiveDateTime};
use polars::prelude::{col, lit, DataFrame, Expr, IntoLazy, LazyFrame};

/// Builds a `DataFrame` with one row per adopted telemetry reading.
///
/// Columns: `station`, `measured_at` (Datetime), `date` (Date) and the
/// nullable `rainfall`, `level`, `discharge` values with their `_status` flags.
pub fn telemetry_frame(readings: &[&TelemetryReading]) -> Result<DataFrame, HidrowebError> {
    let frame = polars::df!(
        "station" => readings.iter().map(|r| r.station_code).collect::<Vec<u64>>(),
        "measured_at" => readings.iter().map(|r| r.measured_at).collect::<Vec<NaiveDateTime>>(),
        "date" => readings.iter().map(|r| r.measured_at.date()).collect::<Vec<NaiveDate>>(),
        "rainfall" => readings.iter().map(|r| r.rainfall).collect::<Vec<Option<f64>>>(),
        "rainfall_status" => readings.iter().map(|r| r.rainfall_status).collect::<Vec<Option<bool>>>(),
        "level" => readings.iter().map(|r| r.level).collect::<Vec<Option<f64>>>(),
        "level_status" => readings.iter().map(|r| r.level_status).collect::<Vec<Option<bool>>>(),
        "discharge" => readings.iter().map(|r| r.discharge).collect::<Vec<Option<f64>>>(),
        "discharge_status" => readings.iter().map(|r| r.discharge_status).collect::<Vec<Option<bool>>>(),
    )?;
    Ok(frame)
}

/// A wrapper around a Polars `LazyFrame` holding telemetry readings.
#[derive(Clone)]
pub struct TelemetryLazyFrame {
    pub frame: LazyFrame,
}

impl TelemetryLazyFrame {
    pub fn new(frame: LazyFrame) -> Self {
        Self { frame }
    }

    /// Builds a lazy frame from adopted or detailed rows; the detailed sensor
    /// channels are not carried over.
    pub fn from_rows<T: TelemetryRecord>(rows: &[T]) -> Result<Self, HidrowebError> {
        let readings: Vec<&TelemetryReading> = rows.iter().map(|r| r.reading()).collect();
        Ok(Self::new(telemetry_frame(&readings)?.lazy()))
    }

    pub fn filter(&self, predicate: Expr) -> TelemetryLazyFrame {
        TelemetryLazyFrame::new(self.frame.clone().filter(predicate))
    }

    /// Keeps the readings measured on days `start..=end`.
    pub fn get_range(&self, start: NaiveDate, end: NaiveDate) -> TelemetryLazyFrame {
        self.filter(
            col("date")
                .gt_eq(lit(start))
                .and(col("date").lt_eq(lit(end))),
        )
    }

    /// Sorts by measurement time, oldest first.
    pub fn sorted(&self) -> TelemetryLazyFrame {
        TelemetryLazyFrame::new(self.frame.clone().sort(["measured_at"], Default::default()))
    }
}
