pub mod inventory;
pub(crate) mod lenient;
pub mod parameters;
pub mod region;
pub mod series;
pub mod telemetry;
