use std::io;

use subtrack_domain::{DraftError, MoneyError, UnknownCategory};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Subscription not found: {0}")]
    NotFound(Uuid),
    #[error("Persistence failed: {0}")]
    Persistence(String),
}

impl CoreError {
    pub fn is_validation(&self) -> bool {
        matches!(self, CoreError::Validation(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, CoreError::NotFound(_))
    }

    pub fn is_persistence(&self) -> bool {
        matches!(self, CoreError::Persistence(_))
    }
}

impl From<DraftError> for CoreError {
    fn from(err: DraftError) -> Self {
        CoreError::Validation(err.to_string())
    }
}

impl From<MoneyError> for CoreError {
    fn from(err: MoneyError) -> Self {
        CoreError::Validation(err.to_string())
    }
}

impl From<UnknownCategory> for CoreError {
    fn from(err: UnknownCategory) -> Self {
        CoreError::Validation(err.to_string())
    }
}

impl From<io::Error> for CoreError {
    fn from(err: io::Error) -> Self {
        CoreError::Persistence(err.to_string())
    }
}
