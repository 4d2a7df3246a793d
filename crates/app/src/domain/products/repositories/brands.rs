//! Brands Repository

use sqlx::{Postgres, Transaction, query_scalar};
use uuid::Uuid;

use crate::domain::products::records::BrandUuid;

const UPSERT_BRAND_SQL: &str = include_str!("../sql/upsert_brand.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgBrandsRepository;

impl PgBrandsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Brand with this name (case-insensitive), created on first use.
    #[tracing::instrument(name = "brands.repository.upsert_brand", skip(self, tx), err)]
    pub(crate) async fn upsert_brand(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        name: &str,
    ) -> Result<BrandUuid, sqlx::Error> {
        let uuid: Uuid = query_scalar(UPSERT_BRAND_SQL)
            .bind(BrandUuid::new().into_uuid())
            .bind(name)
            .fetch_one(&mut **tx)
            .await?;

        Ok(BrandUuid::from_uuid(uuid))
    }
}
