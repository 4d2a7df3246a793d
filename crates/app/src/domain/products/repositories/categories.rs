//! Categories Repository

use rustc_hash::FxHashMap;
use sqlx::{Postgres, Transaction, query, query_as};
use tracing::debug;
use uuid::Uuid;

use crate::domain::products::records::{CategoryUuid, ProductUuid};

const SYNC_CATEGORIES_SQL: &str = include_str!("../sql/sync_categories.sql");
const CREATE_PRODUCT_CATEGORIES_SQL: &str = include_str!("../sql/create_product_categories.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCategoriesRepository;

impl PgCategoriesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Upserts every named category and returns their uuids keyed by name.
    ///
    /// `names` must not contain duplicates.
    #[tracing::instrument(
        name = "categories.repository.sync_categories",
        skip(self, tx),
        fields(
            names_count = tracing::field::Empty,
            synced_category_count = tracing::field::Empty
        ),
        err
    )]
    pub(crate) async fn sync_categories(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        names: &[&str],
    ) -> Result<FxHashMap<String, CategoryUuid>, sqlx::Error> {
        tracing::Span::current().record("names_count", names.len());

        if names.is_empty() {
            return Ok(FxHashMap::default());
        }

        let new_uuids: Vec<Uuid> = names.iter().map(|_| CategoryUuid::new().into_uuid()).collect();
        let names_vec: Vec<String> = names.iter().map(|name| (*name).to_owned()).collect();

        let rows: Vec<(Uuid, String)> = query_as(SYNC_CATEGORIES_SQL)
            .bind(&new_uuids)
            .bind(&names_vec)
            .fetch_all(&mut **tx)
            .await?;

        let categories: FxHashMap<String, CategoryUuid> = rows
            .into_iter()
            .map(|(uuid, name)| (name, CategoryUuid::from_uuid(uuid)))
            .collect();

        let synced_category_count = categories.len();

        tracing::Span::current().record("synced_category_count", synced_category_count);

        debug!(synced_category_count, "synchronized categories");

        Ok(categories)
    }

    pub(crate) async fn create_product_categories(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        categories: impl IntoIterator<Item = CategoryUuid>,
    ) -> Result<u64, sqlx::Error> {
        let category_uuids: Vec<Uuid> = categories.into_iter().map(CategoryUuid::into_uuid).collect();

        if category_uuids.is_empty() {
            return Ok(0);
        }

        let rows_affected = query(CREATE_PRODUCT_CATEGORIES_SQL)
            .bind(product.into_uuid())
            .bind(&category_uuids)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}
