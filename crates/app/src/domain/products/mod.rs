//! Products

pub mod codes;
pub mod data;
pub mod errors;
pub mod filters;
pub mod records;
pub(crate) mod repositories;
pub mod service;

pub use errors::ProductsServiceError;
pub use service::*;
