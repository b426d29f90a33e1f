//! Monthly rows of the historical series endpoints (`HidroSerieChuva`,
//! `HidroSerieCotas`, `HidroSerieVazao`).
//!
//! Each row covers one station-month. The fields every kind shares live in
//! [`DailySeriesCommon`]; level and discharge rows also share
//! [`MonthlyStatistics`]. The 31 day columns are read through a per-kind key
//! table ([`DayColumns`]).

use crate::types::lenient;
use crate::types::parameters::SeriesKind;
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::de::Error;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use std::fmt;
use std::marker::PhantomData;

/// Whether a month has been reviewed by the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConsistencyLevel {
    /// Level 1: raw data.
    Raw = 1,
    /// Level 2: consisted (reviewed) data.
    Consisted = 2,
}

impl ConsistencyLevel {
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

impl<'de> Deserialize<'de> for ConsistencyLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        match lenient::to_i64(&value) {
            Some(1) => Ok(ConsistencyLevel::Raw),
            Some(2) => Ok(ConsistencyLevel::Consisted),
            _ => Err(D::Error::custom(format!(
                "expected consistency level 1 or 2, found {value}"
            ))),
        }
    }
}

/// Fields present on every monthly row, whatever the series kind.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DailySeriesCommon {
    #[serde(rename = "codigoestacao", alias = "Codigoestacao", deserialize_with = "lenient::u64")]
    pub station_code: u64,
    /// First instant of the month the row describes.
    #[serde(rename = "Data_Hora_Dado", deserialize_with = "lenient::datetime")]
    pub reference: NaiveDateTime,
    #[serde(rename = "Data_Ultima_Alteracao", deserialize_with = "lenient::datetime")]
    pub last_modified: NaiveDateTime,
    #[serde(rename = "Dia_Maxima", deserialize_with = "lenient::i64")]
    pub maximum_day: i64,
    #[serde(rename = "Maxima", deserialize_with = "lenient::f64")]
    pub maximum: f64,
    #[serde(rename = "Maxima_Status", deserialize_with = "lenient::bool")]
    pub maximum_status: bool,
    #[serde(rename = "Nivel_Consistencia")]
    pub consistency: ConsistencyLevel,
}

/// Monthly aggregates shared by level and discharge rows.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MonthlyStatistics {
    #[serde(rename = "Dia_Minima", deserialize_with = "lenient::i64")]
    pub minimum_day: i64,
    #[serde(rename = "Minima", deserialize_with = "lenient::f64")]
    pub minimum: f64,
    #[serde(rename = "Minima_Status", deserialize_with = "lenient::bool")]
    pub minimum_status: bool,
    #[serde(rename = "Media", deserialize_with = "lenient::f64")]
    pub mean: f64,
    // The service reports this status as a number, not a flag.
    #[serde(rename = "Media_Status", deserialize_with = "lenient::f64")]
    pub mean_status: f64,
    #[serde(rename = "Mediadiaria", deserialize_with = "lenient::f64")]
    pub daily_mean: f64,
    #[serde(rename = "Media_Anual", default, deserialize_with = "lenient::opt_f64")]
    pub annual_mean: Option<f64>,
    #[serde(rename = "Media_Anual_Status", default, deserialize_with = "lenient::opt_bool")]
    pub annual_mean_status: Option<bool>,
}

/// The raw keys of the 31 day columns of one series kind.
pub trait DayColumns {
    const VALUES: [&'static str; 31];
    const STATUSES: [&'static str; 31];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RainfallColumns;

impl DayColumns for RainfallColumns {
    const VALUES: [&'static str; 31] = [
        "Chuva_01", "Chuva_02", "Chuva_03", "Chuva_04", "Chuva_05", "Chuva_06", "Chuva_07",
        "Chuva_08", "Chuva_09", "Chuva_10", "Chuva_11", "Chuva_12", "Chuva_13", "Chuva_14",
        "Chuva_15", "Chuva_16", "Chuva_17", "Chuva_18", "Chuva_19", "Chuva_20", "Chuva_21",
        "Chuva_22", "Chuva_23", "Chuva_24", "Chuva_25", "Chuva_26", "Chuva_27", "Chuva_28",
        "Chuva_29", "Chuva_30", "Chuva_31",
    ];
    const STATUSES: [&'static str; 31] = [
        "Chuva_01_Status", "Chuva_02_Status", "Chuva_03_Status", "Chuva_04_Status",
        "Chuva_05_Status", "Chuva_06_Status", "Chuva_07_Status", "Chuva_08_Status",
        "Chuva_09_Status", "Chuva_10_Status", "Chuva_11_Status", "Chuva_12_Status",
        "Chuva_13_Status", "Chuva_14_Status", "Chuva_15_Status", "Chuva_16_Status",
        "Chuva_17_Status", "Chuva_18_Status", "Chuva_19_Status", "Chuva_20_Status",
        "Chuva_21_Status", "Chuva_22_Status", "Chuva_23_Status", "Chuva_24_Status",
        "Chuva_25_Status", "Chuva_26_Status", "Chuva_27_Status", "Chuva_28_Status",
        "Chuva_29_Status", "Chuva_30_Status", "Chuva_31_Status",
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelColumns;

impl DayColumns for LevelColumns {
    const VALUES: [&'static str; 31] = [
        "Cota_01", "Cota_02", "Cota_03", "Cota_04", "Cota_05", "Cota_06", "Cota_07", "Cota_08",
        "Cota_09", "Cota_10", "Cota_11", "Cota_12", "Cota_13", "Cota_14", "Cota_15", "Cota_16",
        "Cota_17", "Cota_18", "Cota_19", "Cota_20", "Cota_21", "Cota_22", "Cota_23", "Cota_24",
        "Cota_25", "Cota_26", "Cota_27", "Cota_28", "Cota_29", "Cota_30", "Cota_31",
    ];
    const STATUSES: [&'static str; 31] = [
        "Cota_01_Status", "Cota_02_Status", "Cota_03_Status", "Cota_04_Status",
        "Cota_05_Status", "Cota_06_Status", "Cota_07_Status", "Cota_08_Status",
        "Cota_09_Status", "Cota_10_Status", "Cota_11_Status", "Cota_12_Status",
        "Cota_13_Status", "Cota_14_Status", "Cota_15_Status", "Cota_16_Status",
        "Cota_17_Status", "Cota_18_Status", "Cota_19_Status", "Cota_20_Status",
        "Cota_21_Status", "Cota_22_Status", "Cota_23_Status", "Cota_24_Status",
        "Cota_25_Status", "Cota_26_Status", "Cota_27_Status", "Cota_28_Status",
        "Cota_29_Status", "Cota_30_Status", "Cota_31_Status",
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DischargeColumns;

impl DayColumns for DischargeColumns {
    const VALUES: [&'static str; 31] = [
        "Vazao_01", "Vazao_02", "Vazao_03", "Vazao_04", "Vazao_05", "Vazao_06", "Vazao_07",
        "Vazao_08", "Vazao_09", "Vazao_10", "Vazao_11", "Vazao_12", "Vazao_13", "Vazao_14",
        "Vazao_15", "Vazao_16", "Vazao_17", "Vazao_18", "Vazao_19", "Vazao_20", "Vazao_21",
        "Vazao_22", "Vazao_23", "Vazao_24", "Vazao_25", "Vazao_26", "Vazao_27", "Vazao_28",
        "Vazao_29", "Vazao_30", "Vazao_31",
    ];
    const STATUSES: [&'static str; 31] = [
        "Vazao_01_Status", "Vazao_02_Status", "Vazao_03_Status", "Vazao_04_Status",
        "Vazao_05_Status", "Vazao_06_Status", "Vazao_07_Status", "Vazao_08_Status",
        "Vazao_09_Status", "Vazao_10_Status", "Vazao_11_Status", "Vazao_12_Status",
        "Vazao_13_Status", "Vazao_14_Status", "Vazao_15_Status", "Vazao_16_Status",
        "Vazao_17_Status", "Vazao_18_Status", "Vazao_19_Status", "Vazao_20_Status",
        "Vazao_21_Status", "Vazao_22_Status", "Vazao_23_Status", "Vazao_24_Status",
        "Vazao_25_Status", "Vazao_26_Status", "Vazao_27_Status", "Vazao_28_Status",
        "Vazao_29_Status", "Vazao_30_Status", "Vazao_31_Status",
    ];
}

/// Day-of-month values and their status flags; index 0 is day 1.
pub struct DailyValues<C> {
    pub values: [Option<f64>; 31],
    pub statuses: [Option<bool>; 31],
    columns: PhantomData<C>,
}

impl<C> DailyValues<C> {
    /// Value and status of day `day` (1-based).
    pub fn day(&self, day: u32) -> Option<(Option<f64>, Option<bool>)> {
        let index = usize::try_from(day).ok()?.checked_sub(1)?;
        Some((*self.values.get(index)?, *self.statuses.get(index)?))
    }
}

impl<C> Clone for DailyValues<C> {
    fn clone(&self) -> Self {
        Self {
            values: self.values,
            statuses: self.statuses,
            columns: PhantomData,
        }
    }
}

impl<C> PartialEq for DailyValues<C> {
    fn eq(&self, other: &Self) -> bool {
        self.values == other.values && self.statuses == other.statuses
    }
}

impl<C> fmt::Debug for DailyValues<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DailyValues")
            .field("values", &self.values)
            .field("statuses", &self.statuses)
            .finish()
    }
}

impl<'de, C: DayColumns> Deserialize<'de> for DailyValues<C> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Map::<String, Value>::deserialize(deserializer)?;
        let mut values = [None; 31];
        let mut statuses = [None; 31];
        for day in 0..31 {
            let value_key = C::VALUES[day];
            values[day] = lenient::convert_optional(raw.get(value_key), "a number", lenient::to_f64)
                .map_err(|e| D::Error::custom(format!("{value_key}: {e}")))?;
            let status_key = C::STATUSES[day];
            statuses[day] =
                lenient::convert_optional(raw.get(status_key), "a 0/1 flag", lenient::to_bool)
                    .map_err(|e| D::Error::custom(format!("{status_key}: {e}")))?;
        }
        Ok(Self {
            values,
            statuses,
            columns: PhantomData,
        })
    }
}

/// One day taken out of a monthly row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyReading {
    pub station_code: u64,
    pub date: NaiveDate,
    pub value: Option<f64>,
    pub status: Option<bool>,
    pub consistency: ConsistencyLevel,
}

/// Behaviour shared by the three monthly row types.
pub trait MonthlySeries {
    /// Which endpoint produces this row.
    const KIND: SeriesKind;
    /// Name used in validation errors.
    const RECORD: &'static str;

    fn common(&self) -> &DailySeriesCommon;
    fn day_values(&self) -> &[Option<f64>; 31];
    fn day_statuses(&self) -> &[Option<bool>; 31];

    fn month(&self) -> NaiveDate {
        self.common().reference.date().with_day(1).unwrap_or(self.common().reference.date())
    }

    /// Expands the row into dated readings, skipping day columns past the end of the month.
    fn daily_readings(&self) -> Vec<DailyReading> {
        let common = self.common();
        let reference = common.reference.date();
        self.day_values()
            .iter()
            .zip(self.day_statuses())
            .zip(1u32..)
            .filter_map(|((value, status), day)| {
                let date = NaiveDate::from_ymd_opt(reference.year(), reference.month(), day)?;
                Some(DailyReading {
                    station_code: common.station_code,
                    date,
                    value: *value,
                    status: *status,
                    consistency: common.consistency,
                })
            })
            .collect()
    }
}

/// A month of daily rainfall (mm).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MonthlyRainfall {
    #[serde(flatten)]
    pub common: DailySeriesCommon,
    #[serde(rename = "Numero_Dias_de_Chuva", default, deserialize_with = "lenient::opt_i64")]
    pub rainy_days: Option<i64>,
    #[serde(rename = "Numero_Dias_de_Chuva_Status", default, deserialize_with = "lenient::opt_bool")]
    pub rainy_days_status: Option<bool>,
    #[serde(rename = "Tipo_Medicao_Chuvas", default, deserialize_with = "lenient::opt_i64")]
    pub measurement_type: Option<i64>,
    #[serde(rename = "Total", default, deserialize_with = "lenient::opt_f64")]
    pub total: Option<f64>,
    #[serde(rename = "Total_Status", default, deserialize_with = "lenient::opt_bool")]
    pub total_status: Option<bool>,
    #[serde(rename = "Total_Anual", default, deserialize_with = "lenient::opt_f64")]
    pub annual_total: Option<f64>,
    #[serde(rename = "Total_Anual_Status", default, deserialize_with = "lenient::opt_bool")]
    pub annual_total_status: Option<bool>,
    #[serde(flatten)]
    pub days: DailyValues<RainfallColumns>,
}

/// A month of daily river levels (cm).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MonthlyLevel {
    #[serde(flatten)]
    pub common: DailySeriesCommon,
    #[serde(flatten)]
    pub statistics: MonthlyStatistics,
    #[serde(rename = "Tipo_Medicao_Cotas", default, deserialize_with = "lenient::opt_i64")]
    pub measurement_type: Option<i64>,
    #[serde(flatten)]
    pub days: DailyValues<LevelColumns>,
}

/// A month of daily discharge (m³/s).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MonthlyDischarge {
    #[serde(flatten)]
    pub common: DailySeriesCommon,
    #[serde(flatten)]
    pub statistics: MonthlyStatistics,
    #[serde(rename = "Metodo_Obtencao_Vazoes", deserialize_with = "lenient::i64")]
    pub method: i64,
    #[serde(flatten)]
    pub days: DailyValues<DischargeColumns>,
}

impl MonthlySeries for MonthlyRainfall {
    const KIND: SeriesKind = SeriesKind::Rainfall;
    const RECORD: &'static str = "rainfall series";

    fn common(&self) -> &DailySeriesCommon {
        &self.common
    }
    fn day_values(&self) -> &[Option<f64>; 31] {
        &self.days.values
    }
    fn day_statuses(&self) -> &[Option<bool>; 31] {
        &self.days.statuses
    }
}

impl MonthlySeries for MonthlyLevel {
    const KIND: SeriesKind = SeriesKind::Level;
    const RECORD: &'static str = "level series";

    fn common(&self) -> &DailySeriesCommon {
        &self.common
    }
    fn day_values(&self) -> &[Option<f64>; 31] {
        &self.days.values
    }
    fn day_statuses(&self) -> &[Option<bool>; 31] {
        &self.days.statuses
    }
}

impl MonthlySeries for MonthlyDischarge {
    const KIND: SeriesKind = SeriesKind::Discharge;
    const RECORD: &'static str = "discharge series";

    fn common(&self) -> &DailySeriesCommon {
        &self.common
    }
    fn day_values(&self) -> &[Option<f64>; 31] {
        &self.days.values
    }
    fn day_statuses(&self) -> &[Option<bool>; 31] {
        &self.days.statuses
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;

    fn common_fields(station: u64, reference: &str) -> Map<String, Value> {
        let common = json!({
            "codigoestacao": station.to_string(),
            "Data_Hora_Dado": reference,
            "Data_Ultima_Alteracao": "2023-01-10 08:00:00.0",
            "Dia_Maxima": "12",
            "Maxima": "48.2",
            "Maxima_Status": "1",
            "Nivel_Consistencia": "2"
        });
        match common {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    /// A rainfall row for the month starting at `reference`, raining 1.5 mm on day 1.
    pub(crate) fn raw_rainfall(station: u64, reference: &str) -> Value {
        let mut row = common_fields(station, reference);
        row.insert("Total".into(), json!("101.5"));
        row.insert("Numero_Dias_de_Chuva".into(), json!("7"));
        row.insert("Chuva_01".into(), json!("1.5"));
        row.insert("Chuva_01_Status".into(), json!("1"));
        row.insert("Chuva_02".into(), json!(null));
        row.insert("Chuva_31".into(), json!("3.0"));
        Value::Object(row)
    }

    pub(crate) fn raw_level(station: u64, reference: &str) -> Value {
        let mut row = common_fields(station, reference);
        for (key, value) in [
            ("Dia_Minima", json!("3")),
            ("Minima", json!("110")),
            ("Minima_Status", json!("1")),
            ("Media", json!("131.4")),
            ("Media_Status", json!("1")),
            ("Mediadiaria", json!("0")),
            ("Tipo_Medicao_Cotas", json!("1")),
            ("Cota_05", json!("120")),
        ] {
            row.insert(key.into(), value);
        }
        Value::Object(row)
    }

    #[test]
    fn test_rainfall_row() {
        let row: MonthlyRainfall =
            serde_json::from_value(raw_rainfall(123, "2022-06-01 00:00:00.0")).unwrap();

        assert_eq!(row.common.station_code, 123);
        assert_eq!(row.common.consistency, ConsistencyLevel::Consisted);
        assert_eq!(row.total, Some(101.5));
        assert_eq!(row.rainy_days, Some(7));
        assert_eq!(row.annual_total, None);
        assert_eq!(row.days.day(1), Some((Some(1.5), Some(true))));
        assert_eq!(row.days.day(2), Some((None, None)));
        assert_eq!(row.days.day(32), None);
        assert_eq!(row.month(), NaiveDate::from_ymd_opt(2022, 6, 1).unwrap());
    }

    #[test]
    fn test_daily_readings_skip_days_past_month_end() {
        let row: MonthlyRainfall =
            serde_json::from_value(raw_rainfall(1, "2022-06-01 00:00:00.0")).unwrap();
        let readings = row.daily_readings();

        assert_eq!(readings.len(), 30);
        assert_eq!(readings[0].date, NaiveDate::from_ymd_opt(2022, 6, 1).unwrap());
        assert_eq!(readings[0].value, Some(1.5));
        assert_eq!(readings[29].date, NaiveDate::from_ymd_opt(2022, 6, 30).unwrap());
        // Chuva_31 is ignored in a 30-day month.
        assert!(readings.iter().all(|r| r.value != Some(3.0)));

        let february: MonthlyRainfall =
            serde_json::from_value(raw_rainfall(1, "2024-02-01 00:00:00.0")).unwrap();
        assert_eq!(february.daily_readings().len(), 29);
    }

    #[test]
    fn test_level_row() {
        let row: MonthlyLevel =
            serde_json::from_value(raw_level(58880001, "2021-03-01 00:00:00.0")).unwrap();

        assert_eq!(row.statistics.minimum_day, 3);
        assert_eq!(row.statistics.mean, 131.4);
        assert_eq!(row.statistics.annual_mean, None);
        assert_eq!(row.measurement_type, Some(1));
        assert_eq!(row.days.day(5), Some((Some(120.0), None)));
        assert_eq!(row.daily_readings().len(), 31);
    }

    #[test]
    fn test_discharge_requires_method() {
        let mut raw = raw_level(1, "2021-03-01 00:00:00.0");
        raw["Vazao_01"] = json!("12.5");
        assert!(serde_json::from_value::<MonthlyDischarge>(raw.clone()).is_err());

        raw["Metodo_Obtencao_Vazoes"] = json!("1");
        let row: MonthlyDischarge = serde_json::from_value(raw).unwrap();
        assert_eq!(row.method, 1);
        assert_eq!(row.days.values[0], Some(12.5));
    }

    #[test]
    fn test_invalid_consistency_level() {
        let mut raw = raw_rainfall(1, "2022-06-01 00:00:00.0");
        raw["Nivel_Consistencia"] = json!("3");
        assert!(serde_json::from_value::<MonthlyRainfall>(raw).is_err());
    }

    #[test]
    fn test_undecodable_day_value() {
        let mut raw = raw_rainfall(1, "2022-06-01 00:00:00.0");
        raw["Chuva_10"] = json!("muita");
        assert!(serde_json::from_value::<MonthlyRainfall>(raw).is_err());
    }
}
