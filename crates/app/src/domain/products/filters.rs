//! Product Filters

use rust_decimal::Decimal;
use smallvec::SmallVec;

use crate::{
    domain::pagination::Pagination,
    params::{Params, ValidationError},
};

const PAGE_SIZE_FIELD: &str = "max_products_per_page";

/// Result ordering for product listings. Ties are always broken by code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProductOrdering {
    /// Most recently added first.
    #[default]
    Newest,
    /// Highest discount first, then most recently added.
    BestDiscount,
}

impl ProductOrdering {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::BestDiscount => "best_discount",
        }
    }
}

/// Inclusive price bounds. A missing bound is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PriceRange {
    pub min: Option<Decimal>,
    pub max: Option<Decimal>,
}

/// Product search criteria. Every present field narrows the result.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProductFilter {
    pub name: Option<String>,
    pub price: PriceRange,
    pub brand: Option<String>,
    /// Matches products in at least one of these categories.
    pub categories: SmallVec<[String; 4]>,
    pub on_sale_only: bool,
    pub ordering: ProductOrdering,
    pub pagination: Pagination,
}

impl ProductFilter {
    /// Parse a product search request.
    ///
    /// Fields are checked in request order and the first failure is
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns an error for blank values, malformed or negative prices,
    /// `min_price > max_price` and invalid pagination.
    pub fn from_params(params: &Params) -> Result<Self, ValidationError> {
        let name = params.text("name")?.map(str::to_string);

        let min = price(params, "min_price")?;
        let max = price(params, "max_price")?;

        if min.zip(max).is_some_and(|(min, max)| min > max) {
            return Err(ValidationError::new(
                "min_price",
                "must not be greater than max_price",
            ));
        }

        let brand = params.text("brand")?.map(str::to_string);

        let categories = params
            .list("categories")?
            .into_iter()
            .map(str::to_string)
            .collect();

        let pagination = Pagination::from_params(params, PAGE_SIZE_FIELD)?;

        Ok(Self {
            name,
            price: PriceRange { min, max },
            brand,
            categories,
            on_sale_only: false,
            ordering: ProductOrdering::Newest,
            pagination,
        })
    }

    /// Newest enabled products.
    #[must_use]
    pub fn novelties(pagination: Pagination) -> Self {
        Self {
            pagination,
            ..Self::default()
        }
    }

    /// Discounted enabled products, best discount first.
    #[must_use]
    pub fn promotions(pagination: Pagination) -> Self {
        Self {
            on_sale_only: true,
            ordering: ProductOrdering::BestDiscount,
            pagination,
            ..Self::default()
        }
    }

    /// Pagination-only listing request (novelties, promotions).
    ///
    /// # Errors
    ///
    /// Returns an error for invalid pagination values.
    pub fn pagination_from_params(params: &Params) -> Result<Pagination, ValidationError> {
        Pagination::from_params(params, PAGE_SIZE_FIELD)
    }

    /// `ILIKE` pattern for the name, with wildcards in the input escaped.
    #[must_use]
    pub fn name_pattern(&self) -> Option<String> {
        self.name.as_deref().map(|name| {
            let mut pattern = String::with_capacity(name.len() + 2);

            pattern.push('%');

            for ch in name.chars() {
                if matches!(ch, '%' | '_' | '\\') {
                    pattern.push('\\');
                }

                pattern.push(ch);
            }

            pattern.push('%');

            pattern
        })
    }

    /// Lowercased category names, or `None` when no category is requested.
    #[must_use]
    pub fn category_keys(&self) -> Option<Vec<String>> {
        if self.categories.is_empty() {
            return None;
        }

        Some(
            self.categories
                .iter()
                .map(|category| category.to_lowercase())
                .collect(),
        )
    }
}

fn price(params: &Params, field: &str) -> Result<Option<Decimal>, ValidationError> {
    let value = params.parse::<Decimal>(field, "a decimal number")?;

    if value.is_some_and(|value| value < Decimal::ZERO) {
        return Err(ValidationError::new(field, "must not be negative"));
    }

    Ok(value)
}
