use thiserror::Error;

/// Unified error type for the service and repository layers.
///
/// Each variant maps to a stable machine-readable code and an HTTP status
/// at the transport boundary (see `http::types`).
#[derive(Error, Debug)]
pub enum DomainError {
    /// Resource does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Input data is invalid: missing/overlong title, unknown status,
    /// dangling category reference.
    #[error("{0}")]
    Validation(String),

    /// Sort direction token was neither `asc` nor `desc`.
    #[error("invalid sort direction '{0}'")]
    InvalidSortDirection(String),

    /// Storage backend failure. Not retried, surfaces as a server error.
    #[error("{0}")]
    Storage(String),
}

pub type DomainResult<T> = Result<T, DomainError>;
