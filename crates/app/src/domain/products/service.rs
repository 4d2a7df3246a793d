//! Products service.

use async_trait::async_trait;
use mockall::automock;
use tracing::{Span, info, warn};

use crate::{
    database::Db,
    domain::{
        pagination::{Page, Pagination},
        products::{
            codes::{MAX_CODE_ATTEMPTS, ProductCodeGenerator},
            data::{NewProduct, ProductUpdate},
            errors::ProductsServiceError,
            filters::ProductFilter,
            records::{ProductCode, ProductRecord, ProductUuid},
            repositories::{PgBrandsRepository, PgCategoriesRepository, PgProductsRepository},
        },
    },
};

#[derive(Debug, Clone)]
pub struct PgProductsService {
    db: Db,
    products: PgProductsRepository,
    brands: PgBrandsRepository,
    categories: PgCategoriesRepository,
}

impl PgProductsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            products: PgProductsRepository::new(),
            brands: PgBrandsRepository::new(),
            categories: PgCategoriesRepository::new(),
        }
    }
}

#[async_trait]
impl ProductsService for PgProductsService {
    async fn search_products(
        &self,
        filter: &ProductFilter,
    ) -> Result<Page<ProductRecord>, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let rows = self.products.search_products(&mut tx, filter).await?;

        tx.commit().await?;

        Ok(Page::from_rows(rows, filter.pagination))
    }

    async fn list_novelties(
        &self,
        pagination: Pagination,
    ) -> Result<Page<ProductRecord>, ProductsServiceError> {
        self.search_products(&ProductFilter::novelties(pagination)).await
    }

    async fn list_promotions(
        &self,
        pagination: Pagination,
    ) -> Result<Page<ProductRecord>, ProductsServiceError> {
        self.search_products(&ProductFilter::promotions(pagination)).await
    }

    async fn get_product(&self, code: &ProductCode) -> Result<ProductRecord, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let product = self.products.get_product_by_code(&mut tx, code).await?;

        tx.commit().await?;

        Ok(product)
    }

    #[tracing::instrument(
        name = "products.service.create_product",
        skip(self, product),
        fields(
            product_uuid = tracing::field::Empty,
            product_code = tracing::field::Empty,
            category_count = tracing::field::Empty
        ),
        err
    )]
    async fn create_product(&self, product: NewProduct) -> Result<ProductRecord, ProductsServiceError> {
        product.validate()?;

        let mut tx = self.db.begin().await?;

        let brand = self.brands.upsert_brand(&mut tx, product.brand.trim()).await?;

        let generator = ProductCodeGenerator::new(&product.name, product.added_at);
        let uuid = ProductUuid::new();

        let mut inserted = None;

        for code in generator.candidates() {
            if self
                .products
                .create_product(&mut tx, uuid, &code, brand, &product)
                .await?
                .is_some()
            {
                inserted = Some(code);
                break;
            }

            warn!(%code, "product code taken, trying next candidate");
        }

        let Some(code) = inserted else {
            return Err(ProductsServiceError::CodeUnavailable {
                attempts: MAX_CODE_ATTEMPTS,
            });
        };

        let span = Span::current();

        span.record("product_uuid", tracing::field::display(uuid));
        span.record("product_code", tracing::field::display(&code));

        let names = product.category_names();

        span.record("category_count", names.len());

        let categories = self.categories.sync_categories(&mut tx, &names).await?;

        self.categories
            .create_product_categories(&mut tx, uuid, categories.into_values())
            .await?;

        let created = self.products.get_product_by_code(&mut tx, &code).await?;

        tx.commit().await?;

        info!(product_uuid = %uuid, product_code = %code, "created product");

        Ok(created)
    }

    #[tracing::instrument(
        name = "products.service.update_product",
        skip(self, update),
        fields(product_code = %code),
        err
    )]
    async fn update_product(
        &self,
        code: &ProductCode,
        update: ProductUpdate,
    ) -> Result<ProductRecord, ProductsServiceError> {
        update.validate()?;

        let mut tx = self.db.begin().await?;

        self.products.update_product(&mut tx, code, &update).await?;

        let updated = self.products.get_product_by_code(&mut tx, code).await?;

        tx.commit().await?;

        info!(product_code = %code, "updated product");

        Ok(updated)
    }
}

#[automock]
#[async_trait]
pub trait ProductsService: Send + Sync {
    /// Enabled products matching the filter, one page at a time.
    async fn search_products(
        &self,
        filter: &ProductFilter,
    ) -> Result<Page<ProductRecord>, ProductsServiceError>;

    /// Enabled products, newest first.
    async fn list_novelties(
        &self,
        pagination: Pagination,
    ) -> Result<Page<ProductRecord>, ProductsServiceError>;

    /// Enabled discounted products, best discount first.
    async fn list_promotions(
        &self,
        pagination: Pagination,
    ) -> Result<Page<ProductRecord>, ProductsServiceError>;

    /// Product by exact code, regardless of whether it is enabled.
    async fn get_product(&self, code: &ProductCode) -> Result<ProductRecord, ProductsServiceError>;

    /// Creates a product under a freshly generated code.
    async fn create_product(&self, product: NewProduct) -> Result<ProductRecord, ProductsServiceError>;

    /// Changes price, discount, stock or visibility of a product.
    async fn update_product(
        &self,
        code: &ProductCode,
        update: ProductUpdate,
    ) -> Result<ProductRecord, ProductsServiceError>;
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use rust_decimal::Decimal;
    use smallvec::smallvec;
    use testresult::TestResult;

    use crate::{
        params::Params,
        test::{TestContext, helpers},
    };

    use super::*;

    fn codes(page: &Page<ProductRecord>) -> Vec<&str> {
        page.items.iter().map(|product| product.code.as_str()).collect()
    }

    #[tokio::test]
    async fn create_product_generates_code_from_initials_and_time() -> TestResult {
        let ctx = TestContext::new().await;

        let mut product = helpers::new_product("acme rocket skates", Decimal::new(4999, 2));

        product.added_at = Timestamp::from_millisecond(1_643_128_092_123)?;
        product.categories = smallvec!["Outdoor".to_string(), "Toys".to_string()];

        let created = ctx.products.create_product(product).await?;

        assert_eq!(created.code.as_str(), "ARS1643128092123");
        assert_eq!(created.price, Decimal::new(4999, 2));
        assert_eq!(created.categories, vec!["Outdoor", "Toys"]);
        assert!(created.enabled);

        Ok(())
    }

    #[tokio::test]
    async fn same_millisecond_collision_takes_next_candidate() -> TestResult {
        let ctx = TestContext::new().await;
        let at = Timestamp::from_millisecond(1_700_000_000_000)?;

        let mut first = helpers::new_product("Blue Mug", Decimal::new(500, 2));
        first.added_at = at;

        let mut second = helpers::new_product("Big Mat", Decimal::new(900, 2));
        second.added_at = at;

        let first = ctx.products.create_product(first).await?;
        let second = ctx.products.create_product(second).await?;

        assert_eq!(first.code.as_str(), "BM1700000000000");
        assert_eq!(second.code.as_str(), "BM1700000000001");

        Ok(())
    }

    #[tokio::test]
    async fn brands_are_shared_case_insensitively() -> TestResult {
        let ctx = TestContext::new().await;

        let mut first = helpers::new_product("Hammer", Decimal::new(1000, 2));
        first.brand = "Acme".to_string();

        let mut second = helpers::new_product("Wrench", Decimal::new(1200, 2));
        second.brand = "ACME".to_string();

        ctx.products.create_product(first).await?;
        let second = ctx.products.create_product(second).await?;

        assert_eq!(second.brand, "Acme");

        let page = ctx
            .products
            .search_products(&ProductFilter::from_params(&Params::new().with("brand", "acme"))?)
            .await?;

        assert_eq!(page.items.len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn price_range_is_inclusive_and_excludes_outside_prices() -> TestResult {
        let ctx = TestContext::new().await;

        let cheap = helpers::create_product(&ctx, "Cheap Phone", Decimal::new(19999, 2)).await?;
        helpers::create_product(&ctx, "Premium Phone", Decimal::new(49999, 2)).await?;

        let params = Params::new()
            .with("min_price", "100")
            .with("max_price", "300");

        let page = ctx
            .products
            .search_products(&ProductFilter::from_params(&params)?)
            .await?;

        assert_eq!(codes(&page), vec![cheap.code.as_str()]);

        let params = Params::new()
            .with("min_price", "199.99")
            .with("max_price", "199.99");

        let page = ctx
            .products
            .search_products(&ProductFilter::from_params(&params)?)
            .await?;

        assert_eq!(codes(&page), vec![cheap.code.as_str()]);

        Ok(())
    }

    #[tokio::test]
    async fn categories_match_any_of_the_requested_set() -> TestResult {
        let ctx = TestContext::new().await;

        let mut in_a = helpers::new_product("Only A", Decimal::new(100, 0));
        in_a.categories = smallvec!["Alpha".to_string()];

        let mut in_c = helpers::new_product("Only C", Decimal::new(100, 0));
        in_c.categories = smallvec!["Gamma".to_string()];

        let in_a = ctx.products.create_product(in_a).await?;
        ctx.products.create_product(in_c).await?;

        let params = Params::new()
            .with("categories[0]", "alpha")
            .with("categories[1]", "Beta");

        let page = ctx
            .products
            .search_products(&ProductFilter::from_params(&params)?)
            .await?;

        assert_eq!(codes(&page), vec![in_a.code.as_str()]);

        Ok(())
    }

    #[tokio::test]
    async fn name_filter_matches_wildcards_literally() -> TestResult {
        let ctx = TestContext::new().await;

        let literal = helpers::create_product(&ctx, "100% Cotton Shirt", Decimal::new(20, 0)).await?;
        helpers::create_product(&ctx, "1000 Thread Sheets", Decimal::new(80, 0)).await?;

        let page = ctx
            .products
            .search_products(&ProductFilter::from_params(&Params::new().with("name", "100%"))?)
            .await?;

        assert_eq!(codes(&page), vec![literal.code.as_str()]);

        let page = ctx
            .products
            .search_products(&ProductFilter::from_params(&Params::new().with("name", "cotton"))?)
            .await?;

        assert_eq!(codes(&page), vec![literal.code.as_str()]);

        Ok(())
    }

    #[tokio::test]
    async fn disabled_products_are_hidden_from_search_but_not_from_lookup() -> TestResult {
        let ctx = TestContext::new().await;

        let product = helpers::create_product(&ctx, "Old Lamp", Decimal::new(35, 0)).await?;

        let update = ProductUpdate {
            enabled: Some(false),
            ..ProductUpdate::default()
        };

        ctx.products.update_product(&product.code, update).await?;

        let page = ctx.products.search_products(&ProductFilter::default()).await?;

        assert!(page.items.is_empty());

        let found = ctx.products.get_product(&product.code).await?;

        assert!(!found.enabled);

        Ok(())
    }

    #[tokio::test]
    async fn pages_walk_newest_first_and_report_next_page() -> TestResult {
        let ctx = TestContext::new().await;

        let mut created = Vec::new();

        for (offset, name) in [(0, "First"), (1_000, "Second"), (2_000, "Third")] {
            let mut product = helpers::new_product(name, Decimal::new(10, 0));

            product.added_at = Timestamp::from_millisecond(1_700_000_000_000 + offset)?;

            created.push(ctx.products.create_product(product).await?);
        }

        let first = ctx
            .products
            .list_novelties(Pagination {
                page_size: 2,
                page_number: 1,
            })
            .await?;

        let second = ctx
            .products
            .list_novelties(Pagination {
                page_size: 2,
                page_number: 2,
            })
            .await?;

        assert_eq!(codes(&first), vec![created[2].code.as_str(), created[1].code.as_str()]);
        assert!(first.has_next_page);
        assert_eq!(codes(&second), vec![created[0].code.as_str()]);
        assert!(!second.has_next_page);

        Ok(())
    }

    #[tokio::test]
    async fn promotions_list_discounted_products_by_discount() -> TestResult {
        let ctx = TestContext::new().await;

        let mut small = helpers::new_product("Small Sale", Decimal::new(10, 0));
        small.discount = Decimal::new(10, 2);

        let mut big = helpers::new_product("Big Sale", Decimal::new(10, 0));
        big.discount = Decimal::new(50, 2);

        let small = ctx.products.create_product(small).await?;
        let big = ctx.products.create_product(big).await?;
        helpers::create_product(&ctx, "Full Price", Decimal::new(10, 0)).await?;

        let page = ctx.products.list_promotions(Pagination::default()).await?;

        assert_eq!(codes(&page), vec![big.code.as_str(), small.code.as_str()]);

        Ok(())
    }

    #[tokio::test]
    async fn update_unknown_product_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx
            .products
            .update_product(&ProductCode::from("NOPE1"), ProductUpdate::default())
            .await;

        assert!(
            matches!(result, Err(ProductsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn invalid_discount_is_rejected_before_storage() {
        let ctx = TestContext::new().await;

        let mut product = helpers::new_product("Bad Deal", Decimal::new(10, 0));
        product.discount = Decimal::new(2, 0);

        let result = ctx.products.create_product(product).await;

        assert!(
            matches!(result, Err(ProductsServiceError::Validation(_))),
            "expected Validation, got {result:?}"
        );
    }

    #[tokio::test]
    async fn price_beyond_cent_precision_is_rejected_before_storage() -> TestResult {
        let ctx = TestContext::new().await;

        let result = ctx
            .products
            .create_product(helpers::new_product("Odd Price", Decimal::new(199_999, 3)))
            .await;

        assert!(
            matches!(&result, Err(error @ ProductsServiceError::Validation(_)) if error.status_code() == 422),
            "expected Validation, got {result:?}"
        );

        let page = ctx.products.search_products(&ProductFilter::default()).await?;

        assert!(page.items.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn present_predicates_must_all_match() -> TestResult {
        let ctx = TestContext::new().await;

        let product = |name: &str, brand: &str, category: &str, price: i64| {
            let mut product = helpers::new_product(name, Decimal::new(price, 0));

            product.brand = brand.to_string();
            product.categories = smallvec![category.to_string()];

            product
        };

        let wanted = ctx
            .products
            .create_product(product("Walnut Desk", "Oakline", "Office", 250))
            .await?;

        for decoy in [
            product("Pine Shelf", "Oakline", "Office", 250),
            product("Walnut Desk Mini", "Acme", "Office", 250),
            product("Walnut Desk Outdoor", "Oakline", "Garden", 250),
            product("Walnut Desk Pro", "Oakline", "Office", 450),
        ] {
            ctx.products.create_product(decoy).await?;
        }

        let params = Params::new()
            .with("name", "walnut desk")
            .with("brand", "OAKLINE")
            .with("categories[0]", "office")
            .with("min_price", "200")
            .with("max_price", "300");

        let page = ctx
            .products
            .search_products(&ProductFilter::from_params(&params)?)
            .await?;

        assert_eq!(codes(&page), vec![wanted.code.as_str()]);

        Ok(())
    }

    #[tokio::test]
    async fn equal_addition_times_are_ordered_by_code() -> TestResult {
        let ctx = TestContext::new().await;
        let added_at = Timestamp::from_millisecond(1_700_000_000_000)?;

        for name in ["Cosy Lamp", "Alpha Lamp", "Beta Lamp"] {
            let mut product = helpers::new_product(name, Decimal::new(10, 0));

            product.added_at = added_at;

            ctx.products.create_product(product).await?;
        }

        let first = Pagination {
            page_size: 2,
            page_number: 1,
        };
        let second = Pagination {
            page_size: 2,
            page_number: 2,
        };

        let page = ctx.products.list_novelties(first).await?;

        assert_eq!(codes(&page), vec!["AL1700000000000", "BL1700000000000"]);
        assert_eq!(codes(&ctx.products.list_novelties(first).await?), codes(&page));

        let page = ctx.products.list_novelties(second).await?;

        assert_eq!(codes(&page), vec!["CL1700000000000"]);

        Ok(())
    }
}
