//! Error taxonomy for the zone service.
//!
//! Validation and not-found errors surface synchronously to the caller.
//! Persistence failures are wrapped and propagated, never retried here;
//! retries belong to the task queue and only for queued side effects.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ZoneError {
    #[error("invalid zone geometry: {0}")]
    Validation(String),

    #[error("zone not found: {0}")]
    NotFound(String),

    #[error("persistence failure: {0}")]
    Persistence(#[source] anyhow::Error),
}

impl ZoneError {
    pub fn persistence(err: anyhow::Error) -> Self {
        ZoneError::Persistence(err)
    }
}

pub type Result<T> = std::result::Result<T, ZoneError>;
