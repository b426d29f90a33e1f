use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Credentials not found: {0}")]
    CredentialsNotFound(String),

    #[error("Authentication failed: {reason}")]
    AuthenticationFailed { reason: String },
}
