//! Command errors

use storefront_app::{
    context::AppInitError,
    domain::{
        clients::ClientsServiceError, orders::OrdersServiceError, products::ProductsServiceError,
    },
    params::ValidationError,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum CliError {
    #[error("DATABASE_URL or --database-url is required")]
    MissingDatabaseUrl,

    #[error(transparent)]
    Init(#[from] AppInitError),

    #[error("invalid request: {0}")]
    Params(#[from] ValidationError),

    #[error(transparent)]
    Clients(#[from] ClientsServiceError),

    #[error(transparent)]
    Products(#[from] ProductsServiceError),

    #[error(transparent)]
    Orders(#[from] OrdersServiceError),

    #[error("failed to render output")]
    Output(#[from] serde_json::Error),
}

impl CliError {
    /// Status in the same taxonomy the services report.
    #[must_use]
    pub(crate) fn status_code(&self) -> u16 {
        match self {
            Self::Params(_) => 422,
            Self::Clients(error) => error.status_code(),
            Self::Products(error) => error.status_code(),
            Self::Orders(error) => error.status_code(),
            Self::MissingDatabaseUrl | Self::Init(_) | Self::Output(_) => 500,
        }
    }
}
