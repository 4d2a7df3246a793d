//! Test support: an isolated PostgreSQL database per test, plus helpers.

mod context;
mod db;
pub(crate) mod helpers;

pub(crate) use context::TestContext;
