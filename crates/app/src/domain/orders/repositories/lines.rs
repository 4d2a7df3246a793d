//! Order Lines Repository

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query};
use tracing::debug;
use uuid::Uuid;

use crate::domain::{
    orders::records::{OrderCode, OrderLineRecord, OrderLineUuid},
    products::records::{ProductCode, ProductUuid},
};

const LIST_ORDER_LINES_SQL: &str = include_str!("../sql/list_order_lines.sql");
const CREATE_ORDER_LINES_SQL: &str = include_str!("../sql/create_order_lines.sql");
const DELETE_ORDER_LINES_SQL: &str = include_str!("../sql/delete_order_lines.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrderLinesRepository;

impl PgOrderLinesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Lines of each given order, in position order.
    #[tracing::instrument(
        name = "orders.repository.list_order_lines",
        skip(self, tx, orders),
        fields(order_count = orders.len(), line_count = tracing::field::Empty),
        err
    )]
    pub(crate) async fn list_order_lines(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        orders: &[OrderCode],
    ) -> Result<FxHashMap<OrderCode, Vec<OrderLineRecord>>, sqlx::Error> {
        if orders.is_empty() {
            return Ok(FxHashMap::default());
        }

        let order_uuids: Vec<Uuid> = orders.iter().copied().map(OrderCode::into_uuid).collect();

        let rows = query(LIST_ORDER_LINES_SQL)
            .bind(&order_uuids)
            .fetch_all(&mut **tx)
            .await?;

        tracing::Span::current().record("line_count", rows.len());

        let mut lines: FxHashMap<OrderCode, Vec<OrderLineRecord>> = FxHashMap::default();

        for row in &rows {
            let order = OrderCode::from_uuid(row.try_get("order_uuid")?);

            lines
                .entry(order)
                .or_default()
                .push(OrderLineRecord::from_row(row)?);
        }

        Ok(lines)
    }

    /// Stores `lines` at positions `0..lines.len()`.
    pub(crate) async fn create_order_lines(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderCode,
        lines: &[OrderLineRecord],
    ) -> Result<u64, sqlx::Error> {
        let uuids: Vec<Uuid> = lines.iter().map(|_| OrderLineUuid::new().into_uuid()).collect();
        let positions: Vec<i32> = (0..).take(lines.len()).collect();
        let product_uuids: Vec<Uuid> = lines.iter().map(|line| line.product_uuid.into_uuid()).collect();
        let product_codes: Vec<&str> = lines.iter().map(|line| line.product_code.as_str()).collect();
        let prices: Vec<Decimal> = lines.iter().map(|line| line.price).collect();
        let discounts: Vec<Decimal> = lines.iter().map(|line| line.discount).collect();

        let rows_affected = query(CREATE_ORDER_LINES_SQL)
            .bind(order.into_uuid())
            .bind(&uuids)
            .bind(&positions)
            .bind(&product_uuids)
            .bind(&product_codes)
            .bind(&prices)
            .bind(&discounts)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        debug!(order_code = %order, rows_affected, "stored order lines");

        Ok(rows_affected)
    }

    pub(crate) async fn delete_order_lines(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderCode,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_ORDER_LINES_SQL)
            .bind(order.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for OrderLineRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            product_code: ProductCode::new(row.try_get::<String, _>("product_code")?),
            price: row.try_get("price")?,
            discount: row.try_get("discount")?,
        })
    }
}
