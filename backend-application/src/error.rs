use backend_domain::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("account not found: {0}")]
    AccountNotFound(String),
    #[error("upstream rejected credentials (HTTP {status})")]
    UpstreamAuth { status: u16 },
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),
    #[error("persistence failed: {0}")]
    PersistenceFatal(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::PersistenceFatal(err.to_string())
    }
}
