//! Test context for service-level integration tests.

use crate::{
    database::Db,
    domain::{clients::PgClientsService, orders::PgOrdersService, products::PgProductsService},
};

use super::db::TestDb;

pub(crate) struct TestContext {
    /// Holds the database open for the lifetime of the test.
    _db: TestDb,
    pub clients: PgClientsService,
    pub products: PgProductsService,
    pub orders: PgOrdersService,
}

impl TestContext {
    pub(crate) async fn new() -> Self {
        let test_db = TestDb::new().await;
        let db = Db::new(test_db.pool.clone());

        Self {
            clients: PgClientsService::new(db.clone()),
            products: PgProductsService::new(db.clone()),
            orders: PgOrdersService::new(db),
            _db: test_db,
        }
    }
}
