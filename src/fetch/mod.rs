pub mod envelope;
pub mod range;
pub mod range_fetcher;
