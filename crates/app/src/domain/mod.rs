//! Storefront Domain Concerns

pub mod clients;
pub mod identity;
pub mod orders;
pub mod pagination;
pub mod products;
