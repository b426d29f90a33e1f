pub mod credentials;
pub mod error;
pub mod token_guard;
