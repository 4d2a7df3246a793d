//! Storefront catalog and order core.

pub mod context;
pub mod database;
pub mod domain;
pub mod params;

#[cfg(test)]
mod test;

mod uuids;
