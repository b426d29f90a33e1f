pub mod inventory_client;
pub mod series_client;
pub mod telemetry_client;
