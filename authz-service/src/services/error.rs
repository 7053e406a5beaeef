use service_core::error::AppError;
use thiserror::Error;

use crate::stores::StoreError;

/// Faults distinguishable from denial: a denial is an `AccessDecision`, an
/// error here means the engine could not decide at all.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("token signing error: {0}")]
    Signing(#[source] anyhow::Error),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Store(e) => {
                tracing::error!(error = %e, "store unreachable");
                AppError::ServiceUnavailable
            }
            ServiceError::Signing(e) => AppError::ConfigError(e),
            ServiceError::Internal(e) => AppError::InternalError(e),
        }
    }
}
