//! The station inventory record returned by `HidroInventarioEstacoes`.
//!
//! Raw keys are listed field by field; a few carry the service's own
//! capitalisation quirks (`Data_Periodo_Desc_liquida_Inicio`,
//! `Data_Periodo_Sedimento_fim`, `Tipo_Estacao_Tanque_evapo`).

use crate::types::lenient;
use crate::types::region::{Basin, State};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;

/// Whether a station measures rainfall or river flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum StationType {
    #[serde(rename = "Pluviometrica", alias = "Pluviométrica")]
    Rainfall,
    #[serde(rename = "Fluviometrica", alias = "Fluviométrica")]
    Streamflow,
}

/// The kinds of equipment an inventory row reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Instrument {
    Climatological,
    LiquidDischarge,
    Scale,
    Piezometry,
    RainGauge,
    WaterQuality,
    RainRecorder,
    LevelRecorder,
    Sediment,
    EvaporationTank,
    Telemetric,
}

impl Instrument {
    pub const ALL: [Instrument; 11] = [
        Instrument::Climatological,
        Instrument::LiquidDischarge,
        Instrument::Scale,
        Instrument::Piezometry,
        Instrument::RainGauge,
        Instrument::WaterQuality,
        Instrument::RainRecorder,
        Instrument::LevelRecorder,
        Instrument::Sediment,
        Instrument::EvaporationTank,
        Instrument::Telemetric,
    ];
}

/// First and last day an instrument was in operation, when known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OperationPeriod {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl OperationPeriod {
    /// Whether `date` falls inside the period. An open end counts as "still operating".
    pub fn covers(&self, date: NaiveDate) -> bool {
        match self.start {
            Some(start) => start <= date && self.end.map_or(true, |end| date <= end),
            None => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OperationPeriods {
    #[serde(rename = "Data_Periodo_Climatologica_Inicio", default, deserialize_with = "lenient::opt_date")]
    pub climatological_start: Option<NaiveDate>,
    #[serde(rename = "Data_Periodo_Climatologica_Fim", default, deserialize_with = "lenient::opt_date")]
    pub climatological_end: Option<NaiveDate>,
    #[serde(rename = "Data_Periodo_Desc_liquida_Inicio", default, deserialize_with = "lenient::opt_date")]
    pub liquid_discharge_start: Option<NaiveDate>,
    #[serde(rename = "Data_Periodo_Desc_Liquida_Fim", default, deserialize_with = "lenient::opt_date")]
    pub liquid_discharge_end: Option<NaiveDate>,
    #[serde(rename = "Data_Periodo_Escala_Inicio", default, deserialize_with = "lenient::opt_date")]
    pub scale_start: Option<NaiveDate>,
    #[serde(rename = "Data_Periodo_Escala_Fim", default, deserialize_with = "lenient::opt_date")]
    pub scale_end: Option<NaiveDate>,
    #[serde(rename = "Data_Periodo_Piezometria_Inicio", default, deserialize_with = "lenient::opt_date")]
    pub piezometry_start: Option<NaiveDate>,
    #[serde(rename = "Data_Periodo_Piezometria_Fim", default, deserialize_with = "lenient::opt_date")]
    pub piezometry_end: Option<NaiveDate>,
    #[serde(rename = "Data_Periodo_Pluviometro_Inicio", default, deserialize_with = "lenient::opt_date")]
    pub rain_gauge_start: Option<NaiveDate>,
    #[serde(rename = "Data_Periodo_Pluviometro_Fim", default, deserialize_with = "lenient::opt_date")]
    pub rain_gauge_end: Option<NaiveDate>,
    #[serde(rename = "Data_Periodo_Qual_Agua_Inicio", default, deserialize_with = "lenient::opt_date")]
    pub water_quality_start: Option<NaiveDate>,
    #[serde(rename = "Data_Periodo_Qual_Agua_Fim", default, deserialize_with = "lenient::opt_date")]
    pub water_quality_end: Option<NaiveDate>,
    #[serde(rename = "Data_Periodo_Registrador_Chuva_Inicio", default, deserialize_with = "lenient::opt_date")]
    pub rain_recorder_start: Option<NaiveDate>,
    #[serde(rename = "Data_Periodo_Registrador_Chuva_Fim", default, deserialize_with = "lenient::opt_date")]
    pub rain_recorder_end: Option<NaiveDate>,
    #[serde(rename = "Data_Periodo_Registrador_Nivel_Inicio", default, deserialize_with = "lenient::opt_date")]
    pub level_recorder_start: Option<NaiveDate>,
    #[serde(rename = "Data_Periodo_Registrador_Nivel_Fim", default, deserialize_with = "lenient::opt_date")]
    pub level_recorder_end: Option<NaiveDate>,
    #[serde(rename = "Data_Periodo_Sedimento_Inicio", default, deserialize_with = "lenient::opt_date")]
    pub sediment_start: Option<NaiveDate>,
    #[serde(rename = "Data_Periodo_Sedimento_fim", default, deserialize_with = "lenient::opt_date")]
    pub sediment_end: Option<NaiveDate>,
    #[serde(rename = "Data_Periodo_Tanque_Evapo_Inicio", default, deserialize_with = "lenient::opt_date")]
    pub evaporation_tank_start: Option<NaiveDate>,
    #[serde(rename = "Data_Periodo_Tanque_Evapo_Fim", default, deserialize_with = "lenient::opt_date")]
    pub evaporation_tank_end: Option<NaiveDate>,
    #[serde(rename = "Data_Periodo_Telemetrica_Inicio", default, deserialize_with = "lenient::opt_date")]
    pub telemetric_start: Option<NaiveDate>,
    #[serde(rename = "Data_Periodo_Telemetrica_Fim", default, deserialize_with = "lenient::opt_date")]
    pub telemetric_end: Option<NaiveDate>,
}

impl OperationPeriods {
    pub fn get(&self, instrument: Instrument) -> OperationPeriod {
        let (start, end) = match instrument {
            Instrument::Climatological => (self.climatological_start, self.climatological_end),
            Instrument::LiquidDischarge => (self.liquid_discharge_start, self.liquid_discharge_end),
            Instrument::Scale => (self.scale_start, self.scale_end),
            Instrument::Piezometry => (self.piezometry_start, self.piezometry_end),
            Instrument::RainGauge => (self.rain_gauge_start, self.rain_gauge_end),
            Instrument::WaterQuality => (self.water_quality_start, self.water_quality_end),
            Instrument::RainRecorder => (self.rain_recorder_start, self.rain_recorder_end),
            Instrument::LevelRecorder => (self.level_recorder_start, self.level_recorder_end),
            Instrument::Sediment => (self.sediment_start, self.sediment_end),
            Instrument::EvaporationTank => (self.evaporation_tank_start, self.evaporation_tank_end),
            Instrument::Telemetric => (self.telemetric_start, self.telemetric_end),
        };
        OperationPeriod { start, end }
    }
}

/// Which instruments the station carries (`Tipo_Estacao_*` flags).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Instrumentation {
    #[serde(rename = "Tipo_Estacao_Climatologica", deserialize_with = "lenient::bool")]
    pub climatological: bool,
    #[serde(rename = "Tipo_Estacao_Desc_Liquida", deserialize_with = "lenient::bool")]
    pub liquid_discharge: bool,
    #[serde(rename = "Tipo_Estacao_Escala", deserialize_with = "lenient::bool")]
    pub scale: bool,
    #[serde(rename = "Tipo_Estacao_Piezometria", deserialize_with = "lenient::bool")]
    pub piezometry: bool,
    #[serde(rename = "Tipo_Estacao_Pluviometro", deserialize_with = "lenient::bool")]
    pub rain_gauge: bool,
    #[serde(rename = "Tipo_Estacao_Qual_Agua", deserialize_with = "lenient::bool")]
    pub water_quality: bool,
    #[serde(rename = "Tipo_Estacao_Registrador_Chuva", deserialize_with = "lenient::bool")]
    pub rain_recorder: bool,
    #[serde(rename = "Tipo_Estacao_Registrador_Nivel", deserialize_with = "lenient::bool")]
    pub level_recorder: bool,
    #[serde(rename = "Tipo_Estacao_Sedimentos", deserialize_with = "lenient::bool")]
    pub sediment: bool,
    #[serde(rename = "Tipo_Estacao_Tanque_evapo", deserialize_with = "lenient::bool")]
    pub evaporation_tank: bool,
    #[serde(rename = "Tipo_Estacao_Telemetrica", deserialize_with = "lenient::bool")]
    pub telemetric: bool,
}

impl Instrumentation {
    pub fn has(&self, instrument: Instrument) -> bool {
        match instrument {
            Instrument::Climatological => self.climatological,
            Instrument::LiquidDischarge => self.liquid_discharge,
            Instrument::Scale => self.scale,
            Instrument::Piezometry => self.piezometry,
            Instrument::RainGauge => self.rain_gauge,
            Instrument::WaterQuality => self.water_quality,
            Instrument::RainRecorder => self.rain_recorder,
            Instrument::LevelRecorder => self.level_recorder,
            Instrument::Sediment => self.sediment,
            Instrument::EvaporationTank => self.evaporation_tank,
            Instrument::Telemetric => self.telemetric,
        }
    }
}

/// Monitoring networks the station belongs to (`Tipo_Rede_*`).
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct Networks {
    #[serde(rename = "Tipo_Rede_Basica", default, deserialize_with = "lenient::opt_bool")]
    pub basic: Option<bool>,
    #[serde(rename = "Tipo_Rede_Captacao", default, deserialize_with = "lenient::opt_i64")]
    pub water_intake: Option<i64>,
    #[serde(rename = "Tipo_Rede_Classe_Vazao", default, deserialize_with = "lenient::opt_i64")]
    pub discharge_class: Option<i64>,
    #[serde(rename = "Tipo_Rede_Curso_Dagua", default, deserialize_with = "lenient::opt_i64")]
    pub watercourse: Option<i64>,
    #[serde(rename = "Tipo_Rede_Energetica", default, deserialize_with = "lenient::opt_bool")]
    pub energy: Option<bool>,
    #[serde(rename = "Tipo_Rede_Estrategica", default, deserialize_with = "lenient::opt_bool")]
    pub strategic: Option<bool>,
    #[serde(rename = "Tipo_Rede_Navegacao", default, deserialize_with = "lenient::opt_bool")]
    pub navigation: Option<bool>,
    #[serde(rename = "Tipo_Rede_Qual_Agua", default, deserialize_with = "lenient::opt_i64")]
    pub water_quality: Option<i64>,
    #[serde(rename = "Tipo_Rede_Sedimentos", default, deserialize_with = "lenient::opt_bool")]
    pub sediment: Option<bool>,
}

/// One station as described by the inventory endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Inventory {
    #[serde(rename = "codigoestacao", alias = "Codigoestacao", deserialize_with = "lenient::u64")]
    pub station_code: u64,
    #[serde(rename = "Estacao_Nome", deserialize_with = "lenient::string")]
    pub station_name: String,
    #[serde(rename = "Tipo_Estacao")]
    pub station_type: StationType,
    #[serde(rename = "Operando", deserialize_with = "lenient::bool")]
    pub operating: bool,
    #[serde(rename = "Codigo_Adicional", default, deserialize_with = "lenient::opt_string")]
    pub additional_code: Option<String>,

    #[serde(rename = "Latitude", deserialize_with = "lenient::f64")]
    pub latitude: f64,
    #[serde(rename = "Longitude", deserialize_with = "lenient::f64")]
    pub longitude: f64,
    #[serde(rename = "Altitude", default, deserialize_with = "lenient::opt_f64")]
    pub altitude: Option<f64>,
    #[serde(rename = "Area_Drenagem", default, deserialize_with = "lenient::opt_f64")]
    pub drainage_area: Option<f64>,

    #[serde(rename = "codigobacia", alias = "Codigobacia")]
    pub basin: Basin,
    #[serde(rename = "Bacia_Nome", deserialize_with = "lenient::string")]
    pub basin_name: String,
    #[serde(rename = "Sub_Bacia_Codigo", deserialize_with = "lenient::i64")]
    pub sub_basin_code: i64,
    #[serde(rename = "Sub_Bacia_Nome", deserialize_with = "lenient::string")]
    pub sub_basin_name: String,
    #[serde(rename = "Rio_Codigo", default, deserialize_with = "lenient::opt_i64")]
    pub river_code: Option<i64>,
    #[serde(rename = "Rio_Nome", deserialize_with = "lenient::string")]
    pub river_name: String,

    #[serde(rename = "UF_Estacao")]
    pub state: State,
    #[serde(rename = "UF_Nome_Estacao", deserialize_with = "lenient::string")]
    pub state_name: String,
    #[serde(rename = "Municipio_Codigo", deserialize_with = "lenient::i64")]
    pub municipality_code: i64,
    #[serde(rename = "Municipio_Nome", deserialize_with = "lenient::string")]
    pub municipality_name: String,

    #[serde(rename = "Operadora_Codigo", deserialize_with = "lenient::i64")]
    pub operator_code: i64,
    #[serde(rename = "Operadora_Sigla", deserialize_with = "lenient::string")]
    pub operator_acronym: String,
    #[serde(rename = "Operadora_Sub_Unidade_UF", default, deserialize_with = "lenient::opt_i64")]
    pub operator_sub_unit_state: Option<i64>,
    #[serde(rename = "Codigo_Operadora_Unidade_UF", default, deserialize_with = "lenient::opt_i64")]
    pub operator_unit_state_code: Option<i64>,
    #[serde(rename = "Responsavel_Codigo", deserialize_with = "lenient::i64")]
    pub responsible_code: i64,
    #[serde(rename = "Responsavel_Sigla", deserialize_with = "lenient::string")]
    pub responsible_acronym: String,
    #[serde(rename = "Responsavel_Unidade_UF", default, deserialize_with = "lenient::opt_i64")]
    pub responsible_unit_state: Option<i64>,

    #[serde(rename = "Data_Ultima_Atualizacao", default, deserialize_with = "lenient::opt_datetime")]
    pub last_updated: Option<NaiveDateTime>,

    #[serde(flatten)]
    pub periods: OperationPeriods,
    #[serde(flatten)]
    pub instrumentation: Instrumentation,
    #[serde(flatten)]
    pub networks: Networks,
}

impl Inventory {
    /// Instruments the station carries, in [`Instrument::ALL`] order.
    pub fn instruments(&self) -> Vec<Instrument> {
        Instrument::ALL
            .into_iter()
            .filter(|i| self.instrumentation.has(*i))
            .collect()
    }

    pub fn operation_period(&self, instrument: Instrument) -> OperationPeriod {
        self.periods.get(instrument)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::{json, Map, Value};

    /// An inventory row shaped like the service returns it.
    pub(crate) fn raw_inventory(code: u64) -> Value {
        let mut row = Map::new();
        row.insert("codigoestacao".into(), json!(code.to_string()));
        for (key, value) in [
            ("Altitude", json!("35.0")),
            ("Area_Drenagem", json!(null)),
            ("Bacia_Nome", json!("ATLÂNTICO, TRECHO SUDESTE")),
            ("Codigo_Adicional", json!("")),
            ("Codigo_Operadora_Unidade_UF", json!("0")),
            ("Data_Periodo_Climatologica_Inicio", json!(null)),
            ("Data_Periodo_Climatologica_Fim", json!(null)),
            ("Data_Periodo_Desc_Liquida_Fim", json!(null)),
            ("Data_Periodo_Desc_liquida_Inicio", json!(null)),
            ("Data_Periodo_Escala_Inicio", json!("1970-01-01 00:00:00.0")),
            ("Data_Periodo_Escala_Fim", json!(null)),
            ("Data_Periodo_Pluviometro_Inicio", json!("1941-10-01 00:00:00.0")),
            ("Data_Periodo_Pluviometro_Fim", json!("2005-12-31 00:00:00.0")),
            ("Data_Periodo_Sedimento_Inicio", json!(null)),
            ("Data_Periodo_Sedimento_fim", json!(null)),
            ("Data_Ultima_Atualizacao", json!("2023-04-05 10:11:12.0")),
            ("Estacao_Nome", json!("ESTAÇÃO TESTE")),
            ("Latitude", json!("-22.9")),
            ("Longitude", json!("-43.2")),
            ("Municipio_Codigo", json!("33001000")),
            ("Municipio_Nome", json!("RIO DE JANEIRO")),
            ("Operadora_Codigo", json!("1")),
            ("Operadora_Sigla", json!("ANA")),
            ("Operadora_Sub_Unidade_UF", json!(null)),
            ("Operando", json!("1")),
            ("Responsavel_Codigo", json!(1)),
            ("Responsavel_Sigla", json!("ANA")),
            ("Responsavel_Unidade_UF", json!(null)),
            ("Rio_Codigo", json!(null)),
            ("Rio_Nome", json!("RIO TESTE")),
            ("Sub_Bacia_Codigo", json!("59")),
            ("Sub_Bacia_Nome", json!("RIOS PARAÍBA DO SUL")),
            ("Tipo_Estacao", json!("Pluviometrica")),
            ("Tipo_Estacao_Climatologica", json!("0")),
            ("Tipo_Estacao_Desc_Liquida", json!("0")),
            ("Tipo_Estacao_Escala", json!("1")),
            ("Tipo_Estacao_Piezometria", json!("0")),
            ("Tipo_Estacao_Pluviometro", json!("1")),
            ("Tipo_Estacao_Qual_Agua", json!("0")),
            ("Tipo_Estacao_Registrador_Chuva", json!("0")),
            ("Tipo_Estacao_Registrador_Nivel", json!("0")),
            ("Tipo_Estacao_Sedimentos", json!("0")),
            ("Tipo_Estacao_Tanque_evapo", json!("0")),
            ("Tipo_Estacao_Telemetrica", json!("1")),
            ("Tipo_Rede_Basica", json!("1")),
            ("Tipo_Rede_Captacao", json!("0")),
            ("Tipo_Rede_Energetica", json!("0")),
            ("UF_Estacao", json!("RJ")),
            ("UF_Nome_Estacao", json!("RIO DE JANEIRO")),
            ("codigobacia", json!("8")),
        ] {
            row.insert(key.into(), value);
        }
        Value::Object(row)
    }

    #[test]
    fn test_inventory_from_raw_row() {
        let inventory: Inventory = serde_json::from_value(raw_inventory(2243004)).unwrap();

        assert_eq!(inventory.station_code, 2243004);
        assert_eq!(inventory.station_type, StationType::Rainfall);
        assert_eq!(inventory.basin, Basin::AtlanticSoutheast);
        assert_eq!(inventory.state, State::RioDeJaneiro);
        assert_eq!(inventory.altitude, Some(35.0));
        assert_eq!(inventory.drainage_area, None);
        assert_eq!(inventory.additional_code, None);
        assert!(inventory.operating);
        assert_eq!(inventory.networks.basic, Some(true));
        assert_eq!(inventory.networks.navigation, None);
        assert_eq!(
            inventory.instruments(),
            vec![Instrument::Scale, Instrument::RainGauge, Instrument::Telemetric]
        );
    }

    #[test]
    fn test_operation_periods() {
        let inventory: Inventory = serde_json::from_value(raw_inventory(1)).unwrap();
        let rain = inventory.operation_period(Instrument::RainGauge);

        assert_eq!(rain.start, NaiveDate::from_ymd_opt(1941, 10, 1));
        assert_eq!(rain.end, NaiveDate::from_ymd_opt(2005, 12, 31));
        assert!(rain.covers(NaiveDate::from_ymd_opt(1990, 1, 1).unwrap()));
        assert!(!rain.covers(NaiveDate::from_ymd_opt(2010, 1, 1).unwrap()));

        let scale = inventory.operation_period(Instrument::Scale);
        assert!(scale.covers(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()));
        assert!(!inventory
            .operation_period(Instrument::Sediment)
            .covers(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()));
    }

    #[test]
    fn test_basin_out_of_range_is_rejected() {
        let mut raw = raw_inventory(1);
        raw["codigobacia"] = json!("10");
        assert!(serde_json::from_value::<Inventory>(raw).is_err());
    }

    #[test]
    fn test_missing_required_field_is_rejected() {
        let mut raw = raw_inventory(1);
        raw.as_object_mut().unwrap().remove("Latitude");
        assert!(serde_json::from_value::<Inventory>(raw).is_err());
    }

    #[test]
    fn test_unknown_state_is_rejected() {
        let mut raw = raw_inventory(1);
        raw["UF_Estacao"] = json!("XX");
        assert!(serde_json::from_value::<Inventory>(raw).is_err());
    }
}
