//! Products service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::params::ValidationError;

#[derive(Debug, Error)]
pub enum ProductsServiceError {
    #[error("invalid request: {0}")]
    Validation(#[from] ValidationError),

    #[error("product already exists")]
    AlreadyExists,

    #[error("product not found")]
    NotFound,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("no free product code after {attempts} attempts")]
    CodeUnavailable { attempts: u32 },

    #[error("storage error")]
    Sql(#[source] Error),
}

impl ProductsServiceError {
    /// Status reported at the request boundary.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound => 404,
            Self::AlreadyExists | Self::CodeUnavailable { .. } => 409,
            Self::Validation(_)
            | Self::InvalidReference
            | Self::MissingRequiredData
            | Self::InvalidData => 422,
            Self::Sql(_) => 500,
        }
    }
}

impl From<Error> for ProductsServiceError {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_not_found_maps_to_not_found() {
        let error = ProductsServiceError::from(Error::RowNotFound);

        assert!(matches!(error, ProductsServiceError::NotFound));
        assert_eq!(error.status_code(), 404);
    }

    #[test]
    fn other_errors_are_storage_failures() {
        let error = ProductsServiceError::from(Error::PoolTimedOut);

        assert!(matches!(error, ProductsServiceError::Sql(_)));
        assert_eq!(error.status_code(), 500);
    }

    #[test]
    fn exhausted_codes_are_a_conflict() {
        assert_eq!(
            ProductsServiceError::CodeUnavailable { attempts: 16 }.status_code(),
            409
        );
    }
}
