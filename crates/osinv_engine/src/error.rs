use osinv_model::{RecordId, RecordKind};
use std::time::Duration;
use thiserror::Error;

/// Failures reported by an inventory provider.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("{kind} {id} not found")]
    NotFound { kind: RecordKind, id: RecordId },
    #[error("inventory provider unavailable: {0}")]
    Unavailable(String),
    #[error("malformed {kind} record: {source}")]
    Malformed {
        kind: RecordKind,
        #[source]
        source: serde_json::Error,
    },
    #[error("{kind} request exceeded the {timeout:?} deadline")]
    DeadlineExceeded { kind: RecordKind, timeout: Duration },
}

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("{0}")]
    InvalidArgument(String),
    #[error("{kind} {id} not found")]
    NotFound { kind: RecordKind, id: RecordId },
    #[error(transparent)]
    Provider(ProviderError),
}

impl QueryError {
    pub fn mutually_exclusive(first: &str, second: &str) -> Self {
        QueryError::InvalidArgument(format!(
            "parameters are mutually exclusive: {first}|{second}"
        ))
    }
}

impl From<ProviderError> for QueryError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::NotFound { kind, id } => QueryError::NotFound { kind, id },
            other => QueryError::Provider(other),
        }
    }
}
