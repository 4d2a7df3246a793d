//! Orders service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use sqlx::{Postgres, Transaction};
use tracing::{Span, info};

use crate::{
    database::Db,
    domain::{
        clients::{records::ClientRecord, repository::PgClientsRepository},
        identity::Identity,
        orders::{
            data::{NewOrder, OrderUpdate},
            errors::OrdersServiceError,
            filters::OrderFilter,
            records::{AddressSnapshot, OrderCode, OrderLineRecord, OrderRecord},
            repositories::{PgOrderLinesRepository, PgOrdersRepository},
            snapshot::OrderSnapshotBuilder,
        },
        pagination::{Page, Pagination},
        products::{
            records::{ProductCode, ProductRecord},
            repositories::PgProductsRepository,
        },
    },
    params::ValidationError,
};

#[derive(Debug, Clone)]
pub struct PgOrdersService {
    db: Db,
    orders: PgOrdersRepository,
    lines: PgOrderLinesRepository,
    clients: PgClientsRepository,
    products: PgProductsRepository,
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            orders: PgOrdersRepository::new(),
            lines: PgOrderLinesRepository::new(),
            clients: PgClientsRepository::new(),
            products: PgProductsRepository::new(),
        }
    }

    /// The enabled client behind `identity`.
    async fn resolve_client(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        identity: &Identity,
    ) -> Result<ClientRecord, OrdersServiceError> {
        let email = identity.email().ok_or(OrdersServiceError::Unauthenticated)?;

        self.clients
            .find_client_by_email(tx, email)
            .await
            .map_err(|error| match OrdersServiceError::from(error) {
                OrdersServiceError::NotFound => OrdersServiceError::Unauthenticated,
                other => other,
            })
    }

    async fn attach_lines(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        orders: &mut [OrderRecord],
    ) -> Result<(), OrdersServiceError> {
        let codes: Vec<OrderCode> = orders.iter().map(|order| order.code).collect();

        let mut lines = self.lines.list_order_lines(tx, &codes).await?;

        for order in orders {
            order.lines = lines.remove(&order.code).unwrap_or_default();
        }

        Ok(())
    }

    async fn load_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        code: OrderCode,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let mut order = self.orders.get_order(tx, code).await?;

        self.attach_lines(tx, std::slice::from_mut(&mut order)).await?;

        Ok(order)
    }

    /// Lines after applying the update's additions and removals.
    async fn updated_lines(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        code: OrderCode,
        update: &OrderUpdate,
    ) -> Result<Vec<OrderLineRecord>, OrdersServiceError> {
        let products = self
            .products
            .lock_products_by_codes(tx, &update.referenced_codes())
            .await?;

        check_codes_exist(&products, "add_product_codes", &update.add_product_codes)?;
        check_codes_exist(&products, "rem_product_codes", &update.rem_product_codes)?;

        let removed = |line_code: &ProductCode| update.rem_product_codes.contains(line_code);

        let existing = self
            .lines
            .list_order_lines(tx, &[code])
            .await?
            .remove(&code)
            .unwrap_or_default();

        let added = update.add_product_codes.iter().filter_map(|code| {
            products
                .iter()
                .find(|product| &product.code == code)
                .map(OrderLineRecord::from)
        });

        let lines: Vec<OrderLineRecord> = existing
            .into_iter()
            .chain(added)
            .filter(|line| !removed(&line.product_code))
            .collect();

        if lines.is_empty() {
            return Err(ValidationError::new(
                "rem_product_codes",
                "would leave the order without products",
            )
            .into());
        }

        Ok(lines)
    }
}

fn check_codes_exist(
    products: &[ProductRecord],
    field: &str,
    codes: &[ProductCode],
) -> Result<(), ValidationError> {
    for (index, code) in codes.iter().enumerate() {
        if !products.iter().any(|product| &product.code == code) {
            return Err(ValidationError::new(
                format!("{field}[{index}]"),
                format!("unknown product code {code}"),
            ));
        }
    }

    Ok(())
}

/// Orders a client may see through the client operations.
fn visible_to(order: &OrderRecord, client: &ClientRecord) -> bool {
    order.client_uuid == client.uuid && !order.fulfilled
}

#[async_trait]
impl OrdersService for PgOrdersService {
    #[tracing::instrument(
        name = "orders.service.create_order",
        skip(self, identity, order),
        fields(
            order_code = tracing::field::Empty,
            client_uuid = tracing::field::Empty,
            line_count = order.product_codes.len()
        ),
        err
    )]
    async fn create_order(
        &self,
        identity: &Identity,
        order: NewOrder,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let client = self.resolve_client(&mut tx, identity).await?;

        let products = self
            .products
            .lock_products_by_codes(&mut tx, &order.product_codes)
            .await?;

        let snapshot = OrderSnapshotBuilder::new(&client, &products).build(&order.product_codes)?;

        let code = OrderCode::new();
        let created_at = Timestamp::from_millisecond(order.created_at.as_millisecond())
            .unwrap_or(order.created_at);

        let span = Span::current();

        span.record("order_code", tracing::field::display(code));
        span.record("client_uuid", tracing::field::display(client.uuid));

        self.orders
            .create_order(
                &mut tx,
                code,
                client.uuid,
                created_at,
                order.payment_method,
                &snapshot,
            )
            .await?;

        self.lines
            .create_order_lines(&mut tx, code, &snapshot.lines)
            .await?;

        let created = self.load_order(&mut tx, code).await?;

        tx.commit().await?;

        info!(order_code = %code, client_uuid = %client.uuid, "created order");

        Ok(created)
    }

    async fn get_order(
        &self,
        identity: &Identity,
        code: OrderCode,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let client = self.resolve_client(&mut tx, identity).await?;

        let order = self.load_order(&mut tx, code).await?;

        tx.commit().await?;

        if !visible_to(&order, &client) {
            return Err(OrdersServiceError::NotFound);
        }

        Ok(order)
    }

    async fn list_orders(
        &self,
        identity: &Identity,
        pagination: Pagination,
    ) -> Result<Page<OrderRecord>, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let client = self.resolve_client(&mut tx, identity).await?;

        let rows = self
            .orders
            .list_client_orders(&mut tx, client.uuid, pagination)
            .await?;

        let mut page = Page::from_rows(rows, pagination);

        self.attach_lines(&mut tx, &mut page.items).await?;

        tx.commit().await?;

        Ok(page)
    }

    #[tracing::instrument(
        name = "orders.service.cancel_order",
        skip(self, identity),
        fields(order_code = %code),
        err
    )]
    async fn cancel_order(
        &self,
        identity: &Identity,
        code: OrderCode,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let client = self.resolve_client(&mut tx, identity).await?;

        let order = self.orders.lock_order(&mut tx, code).await?;

        if !visible_to(&order, &client) {
            return Err(OrdersServiceError::NotFound);
        }

        if order.paid {
            return Err(OrdersServiceError::AlreadyPaid);
        }

        self.orders.fulfill_order(&mut tx, code).await?;

        let cancelled = self.load_order(&mut tx, code).await?;

        tx.commit().await?;

        info!(order_code = %code, client_uuid = %client.uuid, "cancelled order");

        Ok(cancelled)
    }

    async fn admin_get_order(&self, code: OrderCode) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let order = self.load_order(&mut tx, code).await?;

        tx.commit().await?;

        Ok(order)
    }

    async fn admin_list_orders(
        &self,
        filter: &OrderFilter,
    ) -> Result<Page<OrderRecord>, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let rows = self.orders.list_orders(&mut tx, filter).await?;

        let mut page = Page::from_rows(rows, filter.pagination);

        self.attach_lines(&mut tx, &mut page.items).await?;

        tx.commit().await?;

        Ok(page)
    }

    #[tracing::instrument(
        name = "orders.service.admin_update_order",
        skip(self, update),
        fields(
            order_code = %code,
            added_count = update.add_product_codes.len(),
            removed_count = update.rem_product_codes.len()
        ),
        err
    )]
    async fn admin_update_order(
        &self,
        code: OrderCode,
        update: OrderUpdate,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        self.orders.lock_order(&mut tx, code).await?;

        if update.changes_lines() {
            let lines = self.updated_lines(&mut tx, code, &update).await?;

            self.lines.delete_order_lines(&mut tx, code).await?;
            self.lines.create_order_lines(&mut tx, code, &lines).await?;
        }

        let charge_address = update
            .charge_address
            .map(|text| AddressSnapshot::Manual { text });

        let deliver_address = update
            .deliver_address
            .map(|text| AddressSnapshot::Manual { text });

        self.orders
            .update_order(
                &mut tx,
                code,
                charge_address.as_ref(),
                deliver_address.as_ref(),
                update.paid,
                update.status.as_deref(),
            )
            .await?;

        let updated = self.load_order(&mut tx, code).await?;

        tx.commit().await?;

        info!(order_code = %code, "updated order");

        Ok(updated)
    }

    #[tracing::instrument(
        name = "orders.service.admin_cancel_order",
        skip(self),
        fields(order_code = %code),
        err
    )]
    async fn admin_cancel_order(&self, code: OrderCode) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        self.orders.lock_order(&mut tx, code).await?;
        self.orders.fulfill_order(&mut tx, code).await?;

        let cancelled = self.load_order(&mut tx, code).await?;

        tx.commit().await?;

        info!(order_code = %code, "cancelled order as administrator");

        Ok(cancelled)
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Places an order for the calling client, freezing its addresses and
    /// the current product prices.
    async fn create_order(
        &self,
        identity: &Identity,
        order: NewOrder,
    ) -> Result<OrderRecord, OrdersServiceError>;

    /// One of the caller's open orders.
    async fn get_order(
        &self,
        identity: &Identity,
        code: OrderCode,
    ) -> Result<OrderRecord, OrdersServiceError>;

    /// The caller's open orders, newest first.
    async fn list_orders(
        &self,
        identity: &Identity,
        pagination: Pagination,
    ) -> Result<Page<OrderRecord>, OrdersServiceError>;

    /// Cancels one of the caller's unpaid orders.
    async fn cancel_order(
        &self,
        identity: &Identity,
        code: OrderCode,
    ) -> Result<OrderRecord, OrdersServiceError>;

    /// Any order, fulfilled or not.
    async fn admin_get_order(&self, code: OrderCode) -> Result<OrderRecord, OrdersServiceError>;

    /// Orders of every client matching the filter, newest first.
    async fn admin_list_orders(
        &self,
        filter: &OrderFilter,
    ) -> Result<Page<OrderRecord>, OrdersServiceError>;

    /// Edits lines, addresses, payment and status of any order.
    async fn admin_update_order(
        &self,
        code: OrderCode,
        update: OrderUpdate,
    ) -> Result<OrderRecord, OrdersServiceError>;

    /// Cancels any order, paid or not.
    async fn admin_cancel_order(&self, code: OrderCode) -> Result<OrderRecord, OrdersServiceError>;
}
