//! Products Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as, query_scalar};
use uuid::Uuid;

use crate::domain::products::{
    data::{NewProduct, ProductUpdate},
    filters::ProductFilter,
    records::{BrandUuid, ProductCode, ProductRecord, ProductUuid},
};

const SEARCH_PRODUCTS_SQL: &str = include_str!("../sql/search_products.sql");
const GET_PRODUCT_BY_CODE_SQL: &str = include_str!("../sql/get_product_by_code.sql");
const LOCK_PRODUCTS_BY_CODES_SQL: &str = include_str!("../sql/lock_products_by_codes.sql");
const CREATE_PRODUCT_SQL: &str = include_str!("../sql/create_product.sql");
const UPDATE_PRODUCT_SQL: &str = include_str!("../sql/update_product.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgProductsRepository;

impl PgProductsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Enabled products matching every present criterion, one row past the
    /// requested page.
    #[tracing::instrument(
        name = "products.repository.search_products",
        skip(self, tx, filter),
        fields(
            ordering = filter.ordering.as_str(),
            page_number = filter.pagination.page_number,
            page_size = filter.pagination.page_size,
            row_count = tracing::field::Empty
        ),
        err
    )]
    pub(crate) async fn search_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        filter: &ProductFilter,
    ) -> Result<Vec<ProductRecord>, sqlx::Error> {
        let rows = query_as::<Postgres, ProductRecord>(SEARCH_PRODUCTS_SQL)
            .bind(filter.name_pattern())
            .bind(filter.price.min)
            .bind(filter.price.max)
            .bind(filter.brand.as_deref())
            .bind(filter.category_keys())
            .bind(filter.on_sale_only)
            .bind(filter.ordering.as_str())
            .bind(filter.pagination.fetch_limit())
            .bind(filter.pagination.offset())
            .fetch_all(&mut **tx)
            .await?;

        tracing::Span::current().record("row_count", rows.len());

        Ok(rows)
    }

    /// Product by exact code, enabled or not.
    pub(crate) async fn get_product_by_code(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        code: &ProductCode,
    ) -> Result<ProductRecord, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(GET_PRODUCT_BY_CODE_SQL)
            .bind(code.as_str())
            .fetch_one(&mut **tx)
            .await
    }

    /// Products with any of the given codes, share-locked until the
    /// transaction ends. Unknown codes are simply absent.
    #[tracing::instrument(
        name = "products.repository.lock_products_by_codes",
        skip(self, tx, codes),
        fields(code_count = codes.len(), locked_count = tracing::field::Empty),
        err
    )]
    pub(crate) async fn lock_products_by_codes(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        codes: &[ProductCode],
    ) -> Result<Vec<ProductRecord>, sqlx::Error> {
        let codes: Vec<&str> = codes.iter().map(ProductCode::as_str).collect();

        let rows = query_as::<Postgres, ProductRecord>(LOCK_PRODUCTS_BY_CODES_SQL)
            .bind(&codes)
            .fetch_all(&mut **tx)
            .await?;

        tracing::Span::current().record("locked_count", rows.len());

        Ok(rows)
    }

    /// Inserts the product under `code`. Returns `None` when the code is
    /// already taken.
    pub(crate) async fn create_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuid: ProductUuid,
        code: &ProductCode,
        brand: BrandUuid,
        product: &NewProduct,
    ) -> Result<Option<ProductUuid>, sqlx::Error> {
        let uuid: Option<Uuid> = query_scalar(CREATE_PRODUCT_SQL)
            .bind(uuid.into_uuid())
            .bind(code.as_str())
            .bind(brand.into_uuid())
            .bind(product.name.trim())
            .bind(product.description.trim())
            .bind(product.price)
            .bind(product.discount)
            .bind(i64::from(product.stock))
            .bind(product.thumbnail_url.as_deref())
            .bind(&product.image_urls)
            .bind(SqlxTimestamp::from(product.added_at))
            .fetch_optional(&mut **tx)
            .await?;

        Ok(uuid.map(ProductUuid::from_uuid))
    }

    pub(crate) async fn update_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        code: &ProductCode,
        update: &ProductUpdate,
    ) -> Result<ProductUuid, sqlx::Error> {
        let uuid: Uuid = query_scalar(UPDATE_PRODUCT_SQL)
            .bind(code.as_str())
            .bind(update.price)
            .bind(update.discount)
            .bind(update.stock.map(i64::from))
            .bind(update.enabled)
            .fetch_one(&mut **tx)
            .await?;

        Ok(ProductUuid::from_uuid(uuid))
    }
}

impl<'r> FromRow<'r, PgRow> for ProductRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let stock: i32 = row.try_get("stock")?;

        let stock = u32::try_from(stock).map_err(|error| sqlx::Error::ColumnDecode {
            index: "stock".to_string(),
            source: Box::new(error),
        })?;

        Ok(Self {
            uuid: ProductUuid::from_uuid(row.try_get("uuid")?),
            code: ProductCode::new(row.try_get::<String, _>("code")?),
            brand: row.try_get("brand")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            price: row.try_get("price")?,
            discount: row.try_get("discount")?,
            stock,
            thumbnail_url: row.try_get("thumbnail_url")?,
            image_urls: row.try_get("image_urls")?,
            categories: row.try_get("categories")?,
            added_at: row.try_get::<SqlxTimestamp, _>("added_at")?.to_jiff(),
            enabled: row.try_get("enabled")?,
        })
    }
}
