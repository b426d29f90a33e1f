//! Provides the `InventoryClient` for looking stations up in the
//! `HidroInventarioEstacoes` endpoint.
//!
//! Obtained via [`Hidroweb::inventory()`].

use crate::config::{paths, params};
use crate::error::HidrowebError;
use crate::fetch::range_fetcher::{ensure_not_empty, validate};
use crate::types::inventory::Inventory;
use crate::types::region::{Basin, State};
use crate::Hidroweb;
use bon::bon;
use log::info;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

const RECORD: &str = "inventory";

/// Station inventory lookups.
pub struct InventoryClient<'a> {
    client: &'a Hidroweb,
}

#[bon]
impl<'a> InventoryClient<'a> {
    pub(crate) fn new(client: &'a Hidroweb) -> Self {
        Self { client }
    }

    /// Searches the inventory by station code, state and/or basin.
    ///
    /// At least one filter is required; the ones given are combined by the service.
    ///
    /// # Errors
    ///
    /// * [`HidrowebError::InvalidArguments`] when no filter is set (nothing is sent).
    /// * [`HidrowebError::NotFound`] when the service returns no station.
    /// * [`HidrowebError::SchemaValidation`] when a row does not match [`Inventory`].
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use hidroweb::{Hidroweb, HidrowebError, State, Basin};
    /// # async fn run(client: Hidroweb) -> Result<(), HidrowebError> {
    /// let stations = client
    ///     .inventory()
    ///     .search()
    ///     .state(State::MinasGerais)
    ///     .basin(Basin::SaoFrancisco)
    ///     .call()
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub async fn search(
        &self,
        station: Option<u64>,
        state: Option<State>,
        basin: Option<Basin>,
        cancel: Option<CancellationToken>,
    ) -> Result<Vec<Inventory>, HidrowebError> {
        let items = self
            .raw_search()
            .maybe_station(station)
            .maybe_state(state)
            .maybe_basin(basin)
            .maybe_cancel(cancel)
            .call()
            .await?;
        let items = ensure_not_empty(items, RECORD, station)?;
        validate(items, RECORD)
    }

    /// Like [`InventoryClient::search`], but returns the unvalidated rows and
    /// an empty list when nothing matches.
    #[builder]
    pub async fn raw_search(
        &self,
        station: Option<u64>,
        state: Option<State>,
        basin: Option<Basin>,
        cancel: Option<CancellationToken>,
    ) -> Result<Vec<Value>, HidrowebError> {
        if station.is_none() && state.is_none() && basin.is_none() {
            return Err(HidrowebError::InvalidArguments(
                "at least one of station, state or basin must be given".to_string(),
            ));
        }
        info!(
            "Searching inventory (station: {:?}, state: {:?}, basin: {:?})",
            station, state, basin
        );
        self.client
            .fetch(cancel.as_ref(), |token| {
                vec![self
                    .client
                    .authorized(token, paths::INVENTORY)
                    .maybe_query(params::STATION, station)
                    .maybe_query(params::STATE, state.map(|s| s.code()))
                    .maybe_query(params::BASIN, basin.map(|b| b.code()))]
            })
            .await
    }

    /// The inventory row of one station: the first the service returns.
    ///
    /// # Errors
    ///
    /// [`HidrowebError::NotFound`] when the station is unknown.
    pub async fn station(&self, station: u64) -> Result<Inventory, HidrowebError> {
        let stations = self.search().station(station).call().await?;
        if stations.len() > 1 {
            info!(
                "Inventory returned {} rows for station {}, using the first",
                stations.len(),
                station
            );
        }
        stations
            .into_iter()
            .next()
            .ok_or(HidrowebError::NotFound {
                what: RECORD,
                station: Some(station),
            })
    }

    /// The complete inventory: every station of the nine basins, fetched
    /// concurrently under one token and concatenated in basin order.
    pub async fn full(&self) -> Result<Vec<Inventory>, HidrowebError> {
        let items = self.raw_full().await?;
        let items = ensure_not_empty(items, RECORD, None)?;
        validate(items, RECORD)
    }

    /// Unvalidated rows of [`InventoryClient::full`].
    pub async fn raw_full(&self) -> Result<Vec<Value>, HidrowebError> {
        info!("Fetching the full inventory over {} basins", Basin::ALL.len());
        self.client
            .fetch(None, |token| {
                Basin::ALL
                    .iter()
                    .map(|basin| {
                        self.client
                            .authorized(token, paths::INVENTORY)
                            .query(params::BASIN, basin.code())
                    })
                    .collect()
            })
            .await
    }
}
