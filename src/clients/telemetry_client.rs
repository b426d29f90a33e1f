//! Provides the `TelemetryClient` for the telemetry endpoints.
//!
//! The service only accepts one search date per request, so a range becomes
//! one request per day. Ranges wider than ten days are refused up front.

use crate::config::{params, TELEMETRY_MAX_SPAN_DAYS};
use crate::error::HidrowebError;
use crate::fetch::range::{format_date, DateRange};
use crate::fetch::range_fetcher::{ensure_not_empty, validate};
use crate::types::parameters::{DateFilter, SearchInterval, TelemetryKind};
use crate::types::telemetry::{TelemetryAdopted, TelemetryDetailed, TelemetryRecord};
use crate::Hidroweb;
use bon::bon;
use chrono::NaiveDate;
use log::info;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

pub struct TelemetryClient<'a> {
    client: &'a Hidroweb,
}

#[bon]
impl<'a> TelemetryClient<'a> {
    pub(crate) fn new(client: &'a Hidroweb) -> Self {
        Self { client }
    }

    /// Adopted telemetry readings between `start` and `end` (inclusive).
    ///
    /// `interval` defaults to [`SearchInterval::Hour24`], `date_filter` to
    /// [`DateFilter::ReadingDate`].
    ///
    /// # Errors
    ///
    /// * [`HidrowebError::InvalidRange`] if `end < start` or the range spans more than ten days.
    /// * [`HidrowebError::NotFound`] if no day returned a reading.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use hidroweb::{Hidroweb, HidrowebError, SearchInterval};
    /// # use chrono::NaiveDate;
    /// # async fn run(client: Hidroweb) -> Result<(), HidrowebError> {
    /// let readings = client
    ///     .telemetry()
    ///     .adopted(58880001)
    ///     .start(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
    ///     .end(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap())
    ///     .interval(SearchInterval::Hour24)
    ///     .call()
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    #[builder(start_fn = adopted)]
    #[doc(hidden)]
    pub async fn build_adopted(
        &self,
        #[builder(start_fn)] station: u64,
        start: NaiveDate,
        end: NaiveDate,
        interval: Option<SearchInterval>,
        date_filter: Option<DateFilter>,
        cancel: Option<CancellationToken>,
    ) -> Result<Vec<TelemetryAdopted>, HidrowebError> {
        self.records(station, start, end, interval, date_filter, cancel)
            .await
    }

    /// Detailed telemetry readings (every sensor channel) between `start` and `end`.
    #[builder(start_fn = detailed)]
    #[doc(hidden)]
    pub async fn build_detailed(
        &self,
        #[builder(start_fn)] station: u64,
        start: NaiveDate,
        end: NaiveDate,
        interval: Option<SearchInterval>,
        date_filter: Option<DateFilter>,
        cancel: Option<CancellationToken>,
    ) -> Result<Vec<TelemetryDetailed>, HidrowebError> {
        self.records(station, start, end, interval, date_filter, cancel)
            .await
    }

    /// Unvalidated telemetry rows; an empty result is not an error here.
    #[builder(start_fn = raw)]
    #[doc(hidden)]
    #[allow(clippy::too_many_arguments)]
    pub async fn build_raw(
        &self,
        #[builder(start_fn)] station: u64,
        #[builder(start_fn)] kind: TelemetryKind,
        start: NaiveDate,
        end: NaiveDate,
        interval: Option<SearchInterval>,
        date_filter: Option<DateFilter>,
        cancel: Option<CancellationToken>,
    ) -> Result<Vec<Value>, HidrowebError> {
        let range = DateRange::new(start, end)?;
        range.ensure_max_span(TELEMETRY_MAX_SPAN_DAYS)?;
        let days = range.days();
        let interval = interval.unwrap_or_default();
        let date_filter = date_filter.unwrap_or_default();
        info!(
            "Fetching {} telemetry of station {} for {} ({} day(s), {})",
            kind,
            station,
            range,
            days.len(),
            interval
        );
        let endpoint = kind.endpoint();
        self.client
            .fetch(cancel.as_ref(), |token| {
                days.iter()
                    .map(|day| {
                        self.client
                            .authorized(token, &endpoint)
                            .query(params::STATION, station)
                            .query(params::DATE_FILTER, date_filter)
                            .query(params::SEARCH_DATE, format_date(*day))
                            .query(params::SEARCH_INTERVAL, interval)
                    })
                    .collect()
            })
            .await
    }

    async fn records<T>(
        &self,
        station: u64,
        start: NaiveDate,
        end: NaiveDate,
        interval: Option<SearchInterval>,
        date_filter: Option<DateFilter>,
        cancel: Option<CancellationToken>,
    ) -> Result<Vec<T>, HidrowebError>
    where
        T: TelemetryRecord + DeserializeOwned,
    {
        let items = self
            .raw(station, T::KIND)
            .start(start)
            .end(end)
            .maybe_interval(interval)
            .maybe_date_filter(date_filter)
            .maybe_cancel(cancel)
            .call()
            .await?;
        let items = ensure_not_empty(items, T::RECORD, Some(station))?;
        validate(items, T::RECORD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCategory;
    use crate::hidroweb::tests::client;
    use crate::test_support::{envelope, RecordingTransport};
    use crate::types::telemetry::tests::raw_telemetry;
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn reading_per_day() -> RecordingTransport {
        RecordingTransport::new().with_responder(|request| {
            let day = request.query_value("Data de Busca (yyyy-MM-dd)").unwrap();
            Ok(envelope(json!([raw_telemetry(1, &format!("{day} 00:15:00.0"))])))
        })
    }

    #[tokio::test]
    async fn test_one_request_per_day_in_order() -> Result<(), HidrowebError> {
        let first = date(2024, 2, 27);
        // Later days answer sooner.
        let transport = Arc::new(reading_per_day().with_delay_by(move |request| {
            match request
                .query_value("Data de Busca (yyyy-MM-dd)")
                .and_then(|d| d.parse::<NaiveDate>().ok())
            {
                Some(day) => Duration::from_millis(50 - 10 * (day - first).num_days() as u64),
                None => Duration::ZERO,
            }
        }));
        let client = client(transport.clone());

        let rows = client
            .telemetry()
            .adopted(1)
            .start(date(2024, 2, 27))
            .end(date(2024, 3, 2))
            .call()
            .await?;

        let days: Vec<String> = transport
            .data_requests()
            .iter()
            .map(|r| r.query_value("Data de Busca (yyyy-MM-dd)").unwrap().to_string())
            .collect();
        assert_eq!(
            days,
            vec!["2024-02-27", "2024-02-28", "2024-02-29", "2024-03-01", "2024-03-02"]
        );
        let measured: Vec<NaiveDate> = rows.iter().map(|r| r.reading().measured_at.date()).collect();
        assert_eq!(measured, first.iter_days().take(5).collect::<Vec<_>>());
        assert_eq!(transport.identity_calls(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_default_parameters() -> Result<(), HidrowebError> {
        let transport = Arc::new(reading_per_day());
        let client = client(transport.clone());

        client
            .telemetry()
            .detailed(1)
            .start(date(2024, 1, 1))
            .end(date(2024, 1, 1))
            .call()
            .await?;

        let request = &transport.data_requests()[0];
        assert_eq!(
            request.url,
            "https://hidro.test/api/HidroinfoanaSerieTelemetricaDetalhada/v1"
        );
        assert_eq!(request.query_value("Código da Estação"), Some("1"));
        assert_eq!(request.query_value("Tipo Filtro Data"), Some("DATA_LEITURA"));
        assert_eq!(request.query_value("Range Intervalo de busca"), Some("HORA_24"));
        Ok(())
    }

    #[tokio::test]
    async fn test_explicit_parameters() -> Result<(), HidrowebError> {
        let transport = Arc::new(reading_per_day());
        let client = client(transport.clone());

        client
            .telemetry()
            .adopted(1)
            .start(date(2024, 1, 1))
            .end(date(2024, 1, 2))
            .interval(SearchInterval::Minute15)
            .date_filter(DateFilter::LastUpdate)
            .call()
            .await?;

        for request in transport.data_requests() {
            assert_eq!(request.query_value("Range Intervalo de busca"), Some("MINUTO_15"));
            assert_eq!(
                request.query_value("Tipo Filtro Data"),
                Some("DATA_ULTIMA_ATUALIZACAO")
            );
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_span_over_ten_days_makes_no_call() {
        let transport = Arc::new(reading_per_day());
        let client = client(transport.clone());

        let err = client
            .telemetry()
            .adopted(1)
            .start(date(2024, 1, 1))
            .end(date(2024, 1, 12))
            .call()
            .await
            .unwrap_err();

        assert!(matches!(err, HidrowebError::InvalidRange { .. }));
        assert_eq!(err.category(), ErrorCategory::InvalidInput);
        assert_eq!(transport.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_end_before_start_makes_no_call() {
        let transport = Arc::new(reading_per_day());
        let client = client(transport.clone());

        let err = client
            .telemetry()
            .detailed(1)
            .start(date(2024, 1, 5))
            .end(date(2024, 1, 4))
            .call()
            .await
            .unwrap_err();

        assert!(matches!(err, HidrowebError::InvalidRange { .. }));
        assert_eq!(err.category(), ErrorCategory::InvalidInput);
        assert_eq!(transport.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_ten_day_span_is_accepted() -> Result<(), HidrowebError> {
        let transport = Arc::new(reading_per_day());
        let client = client(transport.clone());

        client
            .telemetry()
            .adopted(1)
            .start(date(2024, 1, 1))
            .end(date(2024, 1, 11))
            .call()
            .await?;

        assert_eq!(transport.data_requests().len(), 11);
        Ok(())
    }

    #[tokio::test]
    async fn test_no_readings_is_not_found() {
        let client = client(Arc::new(RecordingTransport::new()));

        let err = client
            .telemetry()
            .detailed(42)
            .start(date(2024, 1, 1))
            .end(date(2024, 1, 3))
            .call()
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            HidrowebError::NotFound { what: "detailed telemetry", station: Some(42) }
        ));
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let transport = Arc::new(reading_per_day());
        let client = client(transport.clone());
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = client
            .telemetry()
            .adopted(1)
            .start(date(2024, 1, 1))
            .end(date(2024, 1, 3))
            .cancel(cancel)
            .call()
            .await
            .unwrap_err();

        assert!(matches!(err, HidrowebError::Cancelled));
        assert_eq!(transport.total_calls(), 0);
    }
}
