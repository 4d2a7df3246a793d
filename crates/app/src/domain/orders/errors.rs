//! Orders service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::{domain::orders::snapshot::SnapshotError, params::ValidationError};

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error("authentication required")]
    Unauthenticated,

    #[error("invalid request: {0}")]
    Validation(#[from] ValidationError),

    #[error("cannot place order: {0}")]
    Snapshot(#[from] SnapshotError),

    #[error("not a valid order code")]
    NotFound,

    #[error("order is already paid and can no longer be cancelled")]
    AlreadyPaid,

    #[error("order already exists")]
    AlreadyExists,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl OrdersServiceError {
    /// Status reported at the request boundary.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Unauthenticated => 401,
            Self::AlreadyExists => 409,
            Self::Validation(_)
            | Self::Snapshot(_)
            | Self::NotFound
            | Self::AlreadyPaid
            | Self::InvalidReference
            | Self::MissingRequiredData
            | Self::InvalidData => 422,
            Self::Sql(_) => 500,
        }
    }
}

impl From<Error> for OrdersServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            _ => Self::Sql(error),
        }
    }
}
