use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or evaluating group mappers.
///
/// The first three variants are ordered by severity. None of them aborts a
/// login: a failing mapper neither joins nor leaves its group, and the
/// remaining mappers are still evaluated.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum MapperError {
    #[error("unable to find group: {0}")]
    GroupNotFound(String),

    #[error("invalid regular expression: {0}")]
    BadRegex(String),

    #[error("malformed mapper configuration: {0}")]
    MalformedConfig(String),

    #[error("failed to load mapper representations: {0}")]
    LoadError(String),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Poisoned lock error: {0}")]
    PoisonedLockError(String),
}

impl From<regex::Error> for MapperError {
    fn from(err: regex::Error) -> Self {
        MapperError::BadRegex(err.to_string())
    }
}

impl From<serde_json::Error> for MapperError {
    fn from(err: serde_json::Error) -> Self {
        MapperError::LoadError(err.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for MapperError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        MapperError::PoisonedLockError(err.to_string())
    }
}
