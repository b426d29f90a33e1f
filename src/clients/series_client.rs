//! Provides the `SeriesClient` for the historical series endpoints
//! (`HidroSerieChuva`, `HidroSerieCotas`, `HidroSerieVazao`).
//!
//! The service answers with one row per station-month. Requests are cut into
//! whole calendar years: a range from mid-2019 to early 2021 is sent as
//! 2019-01-01..2019-12-31, 2020-01-01..2020-12-31 and 2021-01-01..2021-12-31.

use crate::config::params;
use crate::error::HidrowebError;
use crate::fetch::range::{format_date, DateRange};
use crate::fetch::range_fetcher::{ensure_not_empty, validate};
use crate::types::parameters::{DateFilter, SeriesKind};
use crate::types::series::{MonthlyDischarge, MonthlyLevel, MonthlyRainfall, MonthlySeries};
use crate::Hidroweb;
use bon::bon;
use chrono::NaiveDate;
use log::info;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

/// Historical series of one station.
///
/// Every method validates the range before touching the network and fails
/// with [`HidrowebError::NotFound`] when no year produced any row.
pub struct SeriesClient<'a> {
    client: &'a Hidroweb,
}

#[bon]
impl<'a> SeriesClient<'a> {
    pub(crate) fn new(client: &'a Hidroweb) -> Self {
        Self { client }
    }

    /// Daily rainfall between `start` and `end` (inclusive), one row per month.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use hidroweb::{Hidroweb, HidrowebError, MonthlySeries};
    /// # use chrono::NaiveDate;
    /// # async fn run(client: Hidroweb) -> Result<(), HidrowebError> {
    /// let months = client
    ///     .series()
    ///     .rainfall(2243004)
    ///     .start(NaiveDate::from_ymd_opt(2022, 6, 1).unwrap())
    ///     .end(NaiveDate::from_ymd_opt(2022, 6, 10).unwrap())
    ///     .call()
    ///     .await?;
    /// let days: Vec<_> = months.iter().flat_map(|m| m.daily_readings()).collect();
    /// # Ok(())
    /// # }
    /// ```
    #[builder(start_fn = rainfall)]
    #[doc(hidden)]
    pub async fn build_rainfall(
        &self,
        #[builder(start_fn)] station: u64,
        start: NaiveDate,
        end: NaiveDate,
        cancel: Option<CancellationToken>,
    ) -> Result<Vec<MonthlyRainfall>, HidrowebError> {
        self.records(station, start, end, cancel).await
    }

    /// Daily river levels between `start` and `end` (inclusive), one row per month.
    #[builder(start_fn = level)]
    #[doc(hidden)]
    pub async fn build_level(
        &self,
        #[builder(start_fn)] station: u64,
        start: NaiveDate,
        end: NaiveDate,
        cancel: Option<CancellationToken>,
    ) -> Result<Vec<MonthlyLevel>, HidrowebError> {
        self.records(station, start, end, cancel).await
    }

    /// Daily discharge between `start` and `end` (inclusive), one row per month.
    #[builder(start_fn = discharge)]
    #[doc(hidden)]
    pub async fn build_discharge(
        &self,
        #[builder(start_fn)] station: u64,
        start: NaiveDate,
        end: NaiveDate,
        cancel: Option<CancellationToken>,
    ) -> Result<Vec<MonthlyDischarge>, HidrowebError> {
        self.records(station, start, end, cancel).await
    }

    /// Unvalidated rows of any series kind. An empty result is not an error here.
    #[builder(start_fn = raw)]
    #[doc(hidden)]
    pub async fn build_raw(
        &self,
        #[builder(start_fn)] station: u64,
        #[builder(start_fn)] kind: SeriesKind,
        start: NaiveDate,
        end: NaiveDate,
        cancel: Option<CancellationToken>,
    ) -> Result<Vec<Value>, HidrowebError> {
        let range = DateRange::new(start, end)?;
        let years = range.calendar_years();
        info!(
            "Fetching {} series of station {} for {} ({} year(s))",
            kind,
            station,
            range,
            years.len()
        );
        let endpoint = kind.endpoint();
        self.client
            .fetch(cancel.as_ref(), |token| {
                years
                    .iter()
                    .map(|year| {
                        self.client
                            .authorized(token, &endpoint)
                            .query(params::STATION, station)
                            .query(params::DATE_FILTER, DateFilter::ReadingDate)
                            .query(params::START_DATE, format_date(year.start()))
                            .query(params::END_DATE, format_date(year.end()))
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
        cancel: Option<CancellationToken>,
    ) -> Result<Vec<T>, HidrowebError>
    where
        T: MonthlySeries + DeserializeOwned,
    {
        let items = self
            .raw(station, T::KIND)
            .start(start)
            .end(end)
            .maybe_cancel(cancel)
            .call()
            .await?;
        let items = ensure_not_empty(items, T::RECORD, Some(station))?;
        validate(items, T::RECORD)
    }
}
