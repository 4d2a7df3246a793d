//! Orders Repository

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, types::Json};

use crate::domain::{
    clients::records::ClientUuid,
    orders::{
        filters::OrderFilter,
        records::{AddressSnapshot, INITIAL_ORDER_STATUS, OrderCode, OrderRecord, PaymentMethod},
        snapshot::OrderSnapshot,
    },
    pagination::Pagination,
};

const CREATE_ORDER_SQL: &str = include_str!("../sql/create_order.sql");
const GET_ORDER_SQL: &str = include_str!("../sql/get_order.sql");
const LOCK_ORDER_SQL: &str = include_str!("../sql/lock_order.sql");
const LIST_CLIENT_ORDERS_SQL: &str = include_str!("../sql/list_client_orders.sql");
const LIST_ORDERS_SQL: &str = include_str!("../sql/list_orders.sql");
const UPDATE_ORDER_SQL: &str = include_str!("../sql/update_order.sql");
const FULFILL_ORDER_SQL: &str = include_str!("../sql/fulfill_order.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Inserts an unpaid, unfulfilled order. Lines are stored separately.
    pub(crate) async fn create_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        code: OrderCode,
        client: ClientUuid,
        created_at: Timestamp,
        payment_method: PaymentMethod,
        snapshot: &OrderSnapshot,
    ) -> Result<(), sqlx::Error> {
        query(CREATE_ORDER_SQL)
            .bind(code.into_uuid())
            .bind(client.into_uuid())
            .bind(SqlxTimestamp::from(created_at))
            .bind(Json(&snapshot.charge_address))
            .bind(Json(&snapshot.deliver_address))
            .bind(payment_method.as_str())
            .bind(INITIAL_ORDER_STATUS)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    /// Order header without lines.
    pub(crate) async fn get_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        code: OrderCode,
    ) -> Result<OrderRecord, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(GET_ORDER_SQL)
            .bind(code.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// Order header without lines, locked for update until the transaction
    /// ends.
    pub(crate) async fn lock_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        code: OrderCode,
    ) -> Result<OrderRecord, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(LOCK_ORDER_SQL)
            .bind(code.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    #[tracing::instrument(
        name = "orders.repository.list_client_orders",
        skip(self, tx),
        fields(client_uuid = %client, row_count = tracing::field::Empty),
        err
    )]
    pub(crate) async fn list_client_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        client: ClientUuid,
        pagination: Pagination,
    ) -> Result<Vec<OrderRecord>, sqlx::Error> {
        let rows = query_as::<Postgres, OrderRecord>(LIST_CLIENT_ORDERS_SQL)
            .bind(client.into_uuid())
            .bind(pagination.fetch_limit())
            .bind(pagination.offset())
            .fetch_all(&mut **tx)
            .await?;

        tracing::Span::current().record("row_count", rows.len());

        Ok(rows)
    }

    #[tracing::instrument(
        name = "orders.repository.list_orders",
        skip(self, tx, filter),
        fields(
            page_number = filter.pagination.page_number,
            page_size = filter.pagination.page_size,
            row_count = tracing::field::Empty
        ),
        err
    )]
    pub(crate) async fn list_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        filter: &OrderFilter,
    ) -> Result<Vec<OrderRecord>, sqlx::Error> {
        let rows = query_as::<Postgres, OrderRecord>(LIST_ORDERS_SQL)
            .bind(filter.client_email.as_deref())
            .bind(filter.created_from.map(SqlxTimestamp::from))
            .bind(filter.created_until.map(SqlxTimestamp::from))
            .bind(filter.payment_method.map(PaymentMethod::as_str))
            .bind(filter.paid)
            .bind(filter.status.as_deref())
            .bind(filter.fulfilled)
            .bind(filter.pagination.fetch_limit())
            .bind(filter.pagination.offset())
            .fetch_all(&mut **tx)
            .await?;

        tracing::Span::current().record("row_count", rows.len());

        Ok(rows)
    }

    /// Applies every present field. Returns the number of rows updated.
    pub(crate) async fn update_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        code: OrderCode,
        charge_address: Option<&AddressSnapshot>,
        deliver_address: Option<&AddressSnapshot>,
        paid: Option<bool>,
        status: Option<&str>,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(UPDATE_ORDER_SQL)
            .bind(code.into_uuid())
            .bind(charge_address.map(Json))
            .bind(deliver_address.map(Json))
            .bind(paid)
            .bind(status)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn fulfill_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        code: OrderCode,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(FULFILL_ORDER_SQL)
            .bind(code.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for OrderRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let payment_method: String = row.try_get("payment_method")?;

        let payment_method =
            payment_method
                .parse::<PaymentMethod>()
                .map_err(|error| sqlx::Error::ColumnDecode {
                    index: "payment_method".to_string(),
                    source: error.into(),
                })?;

        Ok(Self {
            code: OrderCode::from_uuid(row.try_get("uuid")?),
            client_uuid: ClientUuid::from_uuid(row.try_get("client_uuid")?),
            client_email: row.try_get("client_email")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            charge_address: row.try_get::<Json<AddressSnapshot>, _>("charge_address")?.0,
            deliver_address: row.try_get::<Json<AddressSnapshot>, _>("deliver_address")?.0,
            payment_method,
            paid: row.try_get("paid")?,
            status: row.try_get("status")?,
            fulfilled: row.try_get("fulfilled")?,
            lines: Vec::new(),
        })
    }
}
