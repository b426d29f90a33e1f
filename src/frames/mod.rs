pub mod series_frame;
pub mod telemetry_frame;
