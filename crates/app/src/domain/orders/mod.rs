//! Orders

pub mod data;
pub mod errors;
pub mod filters;
pub mod records;
pub(crate) mod repositories;
pub mod service;
pub mod snapshot;

pub use errors::OrdersServiceError;
pub use service::*;
