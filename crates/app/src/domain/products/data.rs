//! Products Data

use jiff::Timestamp;
use rust_decimal::Decimal;
use smallvec::SmallVec;

use crate::params::ValidationError;

/// New Product Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub brand: String,
    pub description: String,
    pub price: Decimal,
    pub discount: Decimal,
    pub stock: u32,
    pub thumbnail_url: Option<String>,
    pub image_urls: Vec<String>,
    pub categories: SmallVec<[String; 4]>,
    /// Addition time; also the seed of the generated product code.
    pub added_at: Timestamp,
}

impl NewProduct {
    pub(crate) fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::blank("name"));
        }

        if self.brand.trim().is_empty() {
            return Err(ValidationError::blank("brand"));
        }

        validate_price(self.price)?;
        validate_discount(self.discount)?;
        validate_stock(self.stock)?;

        if self.categories.iter().any(|category| category.trim().is_empty()) {
            return Err(ValidationError::blank("categories"));
        }

        Ok(())
    }

    /// Trimmed, de-duplicated category names in first-seen order.
    pub(crate) fn category_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::with_capacity(self.categories.len());

        for name in self.categories.iter().map(|name| name.trim()) {
            if !names.contains(&name) {
                names.push(name);
            }
        }

        names
    }
}

/// Product Update Data
///
/// Absent fields are left unchanged.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProductUpdate {
    pub price: Option<Decimal>,
    pub discount: Option<Decimal>,
    pub stock: Option<u32>,
    pub enabled: Option<bool>,
}

impl ProductUpdate {
    pub(crate) fn validate(&self) -> Result<(), ValidationError> {
        if let Some(price) = self.price {
            validate_price(price)?;
        }

        if let Some(discount) = self.discount {
            validate_discount(discount)?;
        }

        if let Some(stock) = self.stock {
            validate_stock(stock)?;
        }

        Ok(())
    }
}

/// Prices are stored as `NUMERIC(12, 2)`.
const PRICE_SCALE: u32 = 2;
/// Exclusive upper bound on whole price units.
const PRICE_LIMIT: i64 = 10_000_000_000;

/// Discounts are stored as `NUMERIC(5, 4)`.
const DISCOUNT_SCALE: u32 = 4;

fn validate_price(price: Decimal) -> Result<(), ValidationError> {
    if price < Decimal::ZERO {
        return Err(ValidationError::new("price", "must not be negative"));
    }

    if price.normalize().scale() > PRICE_SCALE {
        return Err(ValidationError::new("price", "must have at most 2 decimal places"));
    }

    if price >= Decimal::new(PRICE_LIMIT, 0) {
        return Err(ValidationError::new("price", "must be less than 10000000000"));
    }

    Ok(())
}

fn validate_discount(discount: Decimal) -> Result<(), ValidationError> {
    if discount < Decimal::ZERO || discount > Decimal::ONE {
        return Err(ValidationError::new("discount", "must be between 0 and 1"));
    }

    if discount.normalize().scale() > DISCOUNT_SCALE {
        return Err(ValidationError::new("discount", "must have at most 4 decimal places"));
    }

    Ok(())
}

fn validate_stock(stock: u32) -> Result<(), ValidationError> {
    if i32::try_from(stock).is_err() {
        return Err(ValidationError::new("stock", "is out of range"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use smallvec::smallvec;

    use super::*;

    fn product() -> NewProduct {
        NewProduct {
            name: "Acme Widget".to_string(),
            brand: "Acme".to_string(),
            description: String::new(),
            price: Decimal::new(19999, 2),
            discount: Decimal::new(15, 2),
            stock: 3,
            thumbnail_url: None,
            image_urls: vec![],
            categories: smallvec!["Tools".to_string(), " Tools ".to_string(), "Home".to_string()],
            added_at: Timestamp::UNIX_EPOCH,
        }
    }

    #[test]
    fn category_names_are_trimmed_and_deduplicated() {
        assert_eq!(product().category_names(), vec!["Tools", "Home"]);
    }

    #[test]
    fn discount_outside_unit_interval_is_rejected() {
        let mut new = product();

        new.discount = Decimal::new(101, 2);

        assert_eq!(
            new.validate().map_err(|error| error.field),
            Err("discount".to_string())
        );
    }

    #[test]
    fn negative_price_update_is_rejected() {
        let update = ProductUpdate {
            price: Some(Decimal::new(-1, 2)),
            ..ProductUpdate::default()
        };

        assert!(update.validate().is_err());
        assert_eq!(ProductUpdate::default().validate(), Ok(()));
    }

    #[test]
    fn values_beyond_storage_precision_are_rejected() {
        let field = |product: NewProduct| product.validate().map_err(|error| error.field);

        let mut new = product();
        new.price = Decimal::new(199_999, 3);
        assert_eq!(field(new), Err("price".to_string()));

        let mut new = product();
        new.price = Decimal::new(10_000_000_000, 0);
        assert_eq!(field(new), Err("price".to_string()));

        let mut new = product();
        new.discount = Decimal::new(12_345, 5);
        assert_eq!(field(new), Err("discount".to_string()));

        let mut new = product();
        new.stock = u32::MAX;
        assert_eq!(field(new), Err("stock".to_string()));
    }

    #[test]
    fn storage_limits_apply_to_new_products_and_updates() {
        let mut new = product();

        new.price = Decimal::new(999_999_999_999, 2);
        new.discount = Decimal::new(12_340, 5);
        new.stock = 2_147_483_647;

        assert_eq!(new.validate(), Ok(()));

        let update = ProductUpdate {
            price: Some(Decimal::new(199_990, 3)),
            stock: Some(u32::MAX),
            ..ProductUpdate::default()
        };

        assert_eq!(
            update.validate().map_err(|error| error.field),
            Err("stock".to_string())
        );
    }
}
