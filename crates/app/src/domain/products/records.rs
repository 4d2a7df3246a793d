//! Product Records

use std::fmt;

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::uuids::TypedUuid;

/// Product UUID
pub type ProductUuid = TypedUuid<ProductRecord>;

/// Brand UUID
pub type BrandUuid = TypedUuid<BrandRecord>;

/// Category UUID
pub type CategoryUuid = TypedUuid<CategoryRecord>;

/// Brand Record
#[derive(Debug, Clone)]
pub struct BrandRecord;

/// Category Record
#[derive(Debug, Clone)]
pub struct CategoryRecord;

/// Public, human-legible product identifier (e.g. `AW1767225600000`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductCode(String);

impl ProductCode {
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductCode {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Product Record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductRecord {
    #[serde(skip)]
    pub uuid: ProductUuid,
    pub code: ProductCode,
    pub brand: String,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub discount: Decimal,
    pub stock: u32,
    pub thumbnail_url: Option<String>,
    pub image_urls: Vec<String>,
    pub categories: Vec<String>,
    pub added_at: Timestamp,
    pub enabled: bool,
}
