//! Federative units and hydrographic basins used to filter the station inventory.

use crate::error::HidrowebError;
use crate::types::lenient;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A state code accepted by `Unidade Federativa`.
///
/// Besides the 27 Brazilian federative units the service also files stations
/// under neighbouring countries (`AR`, `BO`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    Acre,
    Alagoas,
    Amazonas,
    Amapa,
    Bahia,
    Ceara,
    DistritoFederal,
    EspiritoSanto,
    Goias,
    Maranhao,
    MatoGrosso,
    MatoGrossoDoSul,
    MinasGerais,
    Para,
    Paraiba,
    Parana,
    Pernambuco,
    Piaui,
    RioDeJaneiro,
    RioGrandeDoNorte,
    RioGrandeDoSul,
    Rondonia,
    Roraima,
    SantaCatarina,
    SaoPaulo,
    Sergipe,
    Tocantins,
    Argentina,
    Bolivia,
    Chile,
    Colombia,
    Ecuador,
    FrenchGuiana,
    Guyana,
    Paraguay,
    Peru,
    Suriname,
    Uruguay,
    Venezuela,
}

impl State {
    pub const ALL: [State; 39] = [
        State::Acre,
        State::Alagoas,
        State::Amazonas,
        State::Amapa,
        State::Bahia,
        State::Ceara,
        State::DistritoFederal,
        State::EspiritoSanto,
        State::Goias,
        State::Maranhao,
        State::MatoGrosso,
        State::MatoGrossoDoSul,
        State::MinasGerais,
        State::Para,
        State::Paraiba,
        State::Parana,
        State::Pernambuco,
        State::Piaui,
        State::RioDeJaneiro,
        State::RioGrandeDoNorte,
        State::RioGrandeDoSul,
        State::Rondonia,
        State::Roraima,
        State::SantaCatarina,
        State::SaoPaulo,
        State::Sergipe,
        State::Tocantins,
        State::Argentina,
        State::Bolivia,
        State::Chile,
        State::Colombia,
        State::Ecuador,
        State::FrenchGuiana,
        State::Guyana,
        State::Paraguay,
        State::Peru,
        State::Suriname,
        State::Uruguay,
        State::Venezuela,
    ];

    /// The two-letter code sent to the service.
    pub fn code(&self) -> &'static str {
        match self {
            State::Acre => "AC",
            State::Alagoas => "AL",
            State::Amazonas => "AM",
            State::Amapa => "AP",
            State::Bahia => "BA",
            State::Ceara => "CE",
            State::DistritoFederal => "DF",
            State::EspiritoSanto => "ES",
            State::Goias => "GO",
            State::Maranhao => "MA",
            State::MatoGrosso => "MT",
            State::MatoGrossoDoSul => "MS",
            State::MinasGerais => "MG",
            State::Para => "PA",
            State::Paraiba => "PB",
            State::Parana => "PR",
            State::Pernambuco => "PE",
            State::Piaui => "PI",
            State::RioDeJaneiro => "RJ",
            State::RioGrandeDoNorte => "RN",
            State::RioGrandeDoSul => "RS",
            State::Rondonia => "RO",
            State::Roraima => "RR",
            State::SantaCatarina => "SC",
            State::SaoPaulo => "SP",
            State::Sergipe => "SE",
            State::Tocantins => "TO",
            State::Argentina => "AR",
            State::Bolivia => "BO",
            State::Chile => "CH",
            State::Colombia => "CO",
            State::Ecuador => "EQ",
            State::FrenchGuiana => "GF",
            State::Guyana => "GU",
            State::Paraguay => "PG",
            State::Peru => "PU",
            State::Suriname => "SU",
            State::Uruguay => "UR",
            State::Venezuela => "VE",
        }
    }

    pub fn is_brazilian(&self) -> bool {
        !matches!(
            self,
            State::Argentina
                | State::Bolivia
                | State::Chile
                | State::Colombia
                | State::Ecuador
                | State::FrenchGuiana
                | State::Guyana
                | State::Paraguay
                | State::Peru
                | State::Suriname
                | State::Uruguay
                | State::Venezuela
        )
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Parses a two-letter code, ignoring case.
///
/// ```
/// use hidroweb::State;
///
/// assert_eq!("sp".parse::<State>().unwrap(), State::SaoPaulo);
/// assert!("XX".parse::<State>().is_err());
/// ```
impl FromStr for State {
    type Err = HidrowebError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_uppercase();
        State::ALL
            .into_iter()
            .find(|state| state.code() == code)
            .ok_or_else(|| HidrowebError::InvalidArguments(format!("unknown state code '{s}'")))
    }
}

impl<'de> Deserialize<'de> for State {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        code.parse().map_err(serde::de::Error::custom)
    }
}

impl Serialize for State {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

/// One of the nine major hydrographic basins, sent as `Código da Bacia`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Basin {
    Amazonas = 1,
    Tocantins = 2,
    AtlanticNorthNortheast = 3,
    SaoFrancisco = 4,
    AtlanticEast = 5,
    Parana = 6,
    Uruguai = 7,
    AtlanticSoutheast = 8,
    Other = 9,
}

impl Basin {
    pub const ALL: [Basin; 9] = [
        Basin::Amazonas,
        Basin::Tocantins,
        Basin::AtlanticNorthNortheast,
        Basin::SaoFrancisco,
        Basin::AtlanticEast,
        Basin::Parana,
        Basin::Uruguai,
        Basin::AtlanticSoutheast,
        Basin::Other,
    ];

    pub fn code(&self) -> u8 {
        *self as u8
    }

    /// The basin name as the service spells it.
    pub fn name(&self) -> &'static str {
        match self {
            Basin::Amazonas => "RIO AMAZONAS",
            Basin::Tocantins => "RIO TOCANTINS",
            Basin::AtlanticNorthNortheast => "ATLÂNTICO,TRECHO NORTE/NORDESTE",
            Basin::SaoFrancisco => "RIO SÃO FRANCISCO",
            Basin::AtlanticEast => "ATLÂNTICO,TRECHO LESTE",
            Basin::Parana => "RIO PARANÁ",
            Basin::Uruguai => "RIO URUGUAI",
            Basin::AtlanticSoutheast => "ATLÂNTICO, TRECHO SUDESTE",
            Basin::Other => "OUTRAS",
        }
    }

    /// Maps a basin code (1..=9) onto its variant.
    pub fn from_code(code: i64) -> Option<Self> {
        let index = usize::try_from(code).ok()?.checked_sub(1)?;
        Basin::ALL.get(index).copied()
    }
}

impl fmt::Display for Basin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.code())
    }
}

impl Serialize for Basin {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

impl<'de> Deserialize<'de> for Basin {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        lenient::to_i64(&value)
            .and_then(Basin::from_code)
            .ok_or_else(|| {
                serde::de::Error::custom(format!("expected a basin code between 1 and 9, found {value}"))
            })
    }
}
