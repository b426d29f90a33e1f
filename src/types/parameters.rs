//! Request parameters of the series and telemetry endpoints.

use crate::config::paths;
use crate::error::HidrowebError;
use std::fmt;
use std::str::FromStr;

/// The three historical series the service publishes per station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeriesKind {
    /// Daily rainfall (`HidroSerieChuva`).
    Rainfall,
    /// Daily river level, "cota" (`HidroSerieCotas`).
    Level,
    /// Daily discharge, "vazão" (`HidroSerieVazao`).
    Discharge,
}

impl SeriesKind {
    pub const ALL: [SeriesKind; 3] = [Self::Rainfall, Self::Level, Self::Discharge];

    pub(crate) fn path_segment(&self) -> &'static str {
        match self {
            SeriesKind::Rainfall => "Chuva",
            SeriesKind::Level => "Cotas",
            SeriesKind::Discharge => "Vazao",
        }
    }

    /// Endpoint path relative to the base URL, e.g. `HidroSerieChuva/v1`.
    pub(crate) fn endpoint(&self) -> String {
        format!("{}{}/v1", paths::SERIES_PREFIX, self.path_segment())
    }
}

impl fmt::Display for SeriesKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path_segment())
    }
}

/// Accepts the Portuguese names used by the service, singular or plural.
///
/// ```
/// use hidroweb::SeriesKind;
///
/// assert_eq!("Chuva".parse::<SeriesKind>().unwrap(), SeriesKind::Rainfall);
/// assert_eq!("cota".parse::<SeriesKind>().unwrap(), SeriesKind::Level);
/// assert!("Neve".parse::<SeriesKind>().is_err());
/// ```
impl FromStr for SeriesKind {
    type Err = HidrowebError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chuva" | "chuvas" => Ok(SeriesKind::Rainfall),
            "cota" | "cotas" => Ok(SeriesKind::Level),
            "vazao" | "vazão" | "vazoes" | "vazões" => Ok(SeriesKind::Discharge),
            other => Err(HidrowebError::InvalidArguments(format!(
                "unknown series kind '{other}', expected Chuva, Cotas or Vazao"
            ))),
        }
    }
}

/// Telemetry feeds: the adopted values only, or every sensor reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TelemetryKind {
    Adopted,
    Detailed,
}

impl TelemetryKind {
    pub(crate) fn path_segment(&self) -> &'static str {
        match self {
            TelemetryKind::Adopted => "Adotada",
            TelemetryKind::Detailed => "Detalhada",
        }
    }

    pub(crate) fn endpoint(&self) -> String {
        format!("{}{}/v1", paths::TELEMETRY_PREFIX, self.path_segment())
    }
}

impl fmt::Display for TelemetryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path_segment())
    }
}

/// Which timestamp the service matches the requested dates against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DateFilter {
    /// When the value was measured.
    #[default]
    ReadingDate,
    /// When the value was last changed on the service.
    LastUpdate,
}

impl DateFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            DateFilter::ReadingDate => "DATA_LEITURA",
            DateFilter::LastUpdate => "DATA_ULTIMA_ATUALIZACAO",
        }
    }
}

impl fmt::Display for DateFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Time window of a telemetry search, sent as `Range Intervalo de busca`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SearchInterval {
    Minute5,
    Minute10,
    Minute15,
    Minute30,
    Hour1,
    Hour2,
    Hour3,
    Hour4,
    Hour5,
    Hour6,
    Hour7,
    Hour8,
    Hour9,
    Hour10,
    Hour11,
    Hour12,
    Hour13,
    Hour14,
    Hour15,
    Hour16,
    Hour17,
    Hour18,
    Hour19,
    Hour20,
    Hour21,
    Hour22,
    Hour23,
    #[default]
    Hour24,
}

impl SearchInterval {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchInterval::Minute5 => "MINUTO_5",
            SearchInterval::Minute10 => "MINUTO_10",
            SearchInterval::Minute15 => "MINUTO_15",
            SearchInterval::Minute30 => "MINUTO_30",
            SearchInterval::Hour1 => "HORA_1",
            SearchInterval::Hour2 => "HORA_2",
            SearchInterval::Hour3 => "HORA_3",
            SearchInterval::Hour4 => "HORA_4",
            SearchInterval::Hour5 => "HORA_5",
            SearchInterval::Hour6 => "HORA_6",
            SearchInterval::Hour7 => "HORA_7",
            SearchInterval::Hour8 => "HORA_8",
            SearchInterval::Hour9 => "HORA_9",
            SearchInterval::Hour10 => "HORA_10",
            SearchInterval::Hour11 => "HORA_11",
            SearchInterval::Hour12 => "HORA_12",
            SearchInterval::Hour13 => "HORA_13",
            SearchInterval::Hour14 => "HORA_14",
            SearchInterval::Hour15 => "HORA_15",
            SearchInterval::Hour16 => "HORA_16",
            SearchInterval::Hour17 => "HORA_17",
            SearchInterval::Hour18 => "HORA_18",
            SearchInterval::Hour19 => "HORA_19",
            SearchInterval::Hour20 => "HORA_20",
            SearchInterval::Hour21 => "HORA_21",
            SearchInterval::Hour22 => "HORA_22",
            SearchInterval::Hour23 => "HORA_23",
            SearchInterval::Hour24 => "HORA_24",
        }
    }

    /// The interval covering `hours` whole hours, if the service offers it.
    pub fn hours(hours: u32) -> Option<Self> {
        use SearchInterval::*;
        const HOURS: [SearchInterval; 24] = [
            Hour1, Hour2, Hour3, Hour4, Hour5, Hour6, Hour7, Hour8, Hour9, Hour10, Hour11, Hour12,
            Hour13, Hour14, Hour15, Hour16, Hour17, Hour18, Hour19, Hour20, Hour21, Hour22,
            Hour23, Hour24,
        ];
        let index = usize::try_from(hours).ok()?.checked_sub(1)?;
        HOURS.get(index).copied()
    }
}

impl fmt::Display for SearchInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchInterval {
    type Err = HidrowebError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase();
        match wanted.as_str() {
            "MINUTO_5" => Ok(SearchInterval::Minute5),
            "MINUTO_10" => Ok(SearchInterval::Minute10),
            "MINUTO_15" => Ok(SearchInterval::Minute15),
            "MINUTO_30" => Ok(SearchInterval::Minute30),
            _ => wanted
                .strip_prefix("HORA_")
                .and_then(|h| h.parse().ok())
                .and_then(SearchInterval::hours)
                .ok_or_else(|| {
                    HidrowebError::InvalidArguments(format!("unknown search interval '{s}'"))
                }),
        }
    }
}
