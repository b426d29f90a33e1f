//! Rows of the telemetry endpoints (`HidroinfoanaSerieTelemetricaAdotada` and
//! `...Detalhada`). Both share the adopted readings in [`TelemetryReading`].

use crate::types::lenient;
use crate::types::parameters::TelemetryKind;
use chrono::NaiveDateTime;
use serde::Deserialize;

/// The adopted rainfall, level and discharge of one telemetry timestamp.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TelemetryReading {
    #[serde(rename = "codigoestacao", alias = "Codigoestacao", deserialize_with = "lenient::u64")]
    pub station_code: u64,
    #[serde(rename = "Data_Hora_Medicao", deserialize_with = "lenient::datetime")]
    pub measured_at: NaiveDateTime,
    #[serde(rename = "Data_Atualizacao", default, deserialize_with = "lenient::opt_datetime")]
    pub updated_at: Option<NaiveDateTime>,
    #[serde(rename = "Chuva_Adotada", default, deserialize_with = "lenient::opt_f64")]
    pub rainfall: Option<f64>,
    #[serde(rename = "Chuva_Adotada_Status", default, deserialize_with = "lenient::opt_bool")]
    pub rainfall_status: Option<bool>,
    #[serde(rename = "Cota_Adotada", default, deserialize_with = "lenient::opt_f64")]
    pub level: Option<f64>,
    #[serde(rename = "Cota_Adotada_Status", default, deserialize_with = "lenient::opt_bool")]
    pub level_status: Option<bool>,
    #[serde(rename = "Vazao_Adotada", default, deserialize_with = "lenient::opt_f64")]
    pub discharge: Option<f64>,
    #[serde(rename = "Vazao_Adotada_Status", default, deserialize_with = "lenient::opt_bool")]
    pub discharge_status: Option<bool>,
}

/// Implemented by both telemetry row types.
pub trait TelemetryRecord {
    const KIND: TelemetryKind;
    const RECORD: &'static str;

    fn reading(&self) -> &TelemetryReading;
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TelemetryAdopted {
    #[serde(flatten)]
    pub reading: TelemetryReading,
}

/// Adopted values plus the raw sensor channels behind them.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TelemetryDetailed {
    #[serde(flatten)]
    pub reading: TelemetryReading,
    #[serde(rename = "Bateria", default, deserialize_with = "lenient::opt_f64")]
    pub battery: Option<f64>,
    #[serde(rename = "Chuva_Acumulada", default, deserialize_with = "lenient::opt_f64")]
    pub accumulated_rainfall: Option<f64>,
    // Numeric on the service, unlike the other status columns.
    #[serde(rename = "Chuva_Acumulada_Status", default, deserialize_with = "lenient::opt_f64")]
    pub accumulated_rainfall_status: Option<f64>,
    #[serde(rename = "Cota_Display", default, deserialize_with = "lenient::opt_f64")]
    pub level_display: Option<f64>,
    #[serde(rename = "Cota_Display_Status", default, deserialize_with = "lenient::opt_bool")]
    pub level_display_status: Option<bool>,
    #[serde(rename = "Cota_Manual", default, deserialize_with = "lenient::opt_f64")]
    pub level_manual: Option<f64>,
    #[serde(rename = "Cota_Manual_Status", default, deserialize_with = "lenient::opt_bool")]
    pub level_manual_status: Option<bool>,
    #[serde(rename = "Cota_Sensor", default, deserialize_with = "lenient::opt_f64")]
    pub level_sensor: Option<f64>,
    #[serde(rename = "Cota_Sensor_Status", default, deserialize_with = "lenient::opt_bool")]
    pub level_sensor_status: Option<bool>,
    #[serde(rename = "Pressao_Atmosferica", default, deserialize_with = "lenient::opt_f64")]
    pub atmospheric_pressure: Option<f64>,
    #[serde(rename = "Pressao_Atmosferica_Status", default, deserialize_with = "lenient::opt_bool")]
    pub atmospheric_pressure_status: Option<bool>,
    #[serde(rename = "Temperatura_Agua", default, deserialize_with = "lenient::opt_f64")]
    pub water_temperature: Option<f64>,
    #[serde(rename = "Temperatura_Agua_Status", default, deserialize_with = "lenient::opt_bool")]
    pub water_temperature_status: Option<bool>,
    #[serde(rename = "Temperatura_Interna", default, deserialize_with = "lenient::opt_f64")]
    pub internal_temperature: Option<f64>,
}

impl TelemetryRecord for TelemetryAdopted {
    const KIND: TelemetryKind = TelemetryKind::Adopted;
    const RECORD: &'static str = "adopted telemetry";

    fn reading(&self) -> &TelemetryReading {
        &self.reading
    }
}

impl TelemetryRecord for TelemetryDetailed {
    const KIND: TelemetryKind = TelemetryKind::Detailed;
    const RECORD: &'static str = "detailed telemetry";

    fn reading(&self) -> &TelemetryReading {
        &self.reading
    }
}
