//! Test Helpers

use jiff::Timestamp;
use rust_decimal::Decimal;
use smallvec::SmallVec;

use crate::{
    domain::{
        clients::{
            ClientsService, ClientsServiceError,
            data::{AddressData, NewClient},
            records::{AddressKind, ClientUuid},
        },
        identity::Identity,
        orders::{
            OrdersService, OrdersServiceError,
            data::NewOrder,
            records::{OrderRecord, PaymentMethod},
        },
        products::{
            ProductsService, ProductsServiceError,
            data::NewProduct,
            records::ProductRecord,
        },
    },
    test::TestContext,
};

/// Registers a client without addresses and returns its identity.
pub(crate) async fn create_client(
    ctx: &TestContext,
    email: &str,
) -> Result<Identity, ClientsServiceError> {
    ctx.clients
        .create_client(NewClient {
            uuid: ClientUuid::new(),
            email: email.to_string(),
            name: email.split('@').next().unwrap_or(email).to_string(),
        })
        .await?;

    Ok(Identity::client(email))
}

/// Registers a client with charge and deliver addresses on the given streets.
pub(crate) async fn create_client_with_addresses(
    ctx: &TestContext,
    email: &str,
    charge_street: &str,
    deliver_street: &str,
) -> Result<Identity, ClientsServiceError> {
    let identity = create_client(ctx, email).await?;

    ctx.clients
        .put_address(&identity, AddressKind::Charge, address(charge_street))
        .await?;

    ctx.clients
        .put_address(&identity, AddressKind::Deliver, address(deliver_street))
        .await?;

    Ok(identity)
}

pub(crate) fn address(street: &str) -> AddressData {
    AddressData {
        recipient: "Ana Ruiz".to_string(),
        street: street.to_string(),
        city: "Sevilla".to_string(),
        province: "Sevilla".to_string(),
        postal_code: "41001".to_string(),
        country: "ES".to_string(),
        phone: None,
    }
}

/// An undiscounted, uncategorised product added now.
pub(crate) fn new_product(name: &str, price: Decimal) -> NewProduct {
    NewProduct {
        name: name.to_string(),
        brand: "Acme".to_string(),
        description: format!("{name} description"),
        price,
        discount: Decimal::ZERO,
        stock: 10,
        thumbnail_url: None,
        image_urls: Vec::new(),
        categories: SmallVec::new(),
        added_at: Timestamp::now(),
    }
}

pub(crate) async fn create_product(
    ctx: &TestContext,
    name: &str,
    price: Decimal,
) -> Result<ProductRecord, ProductsServiceError> {
    ctx.products.create_product(new_product(name, price)).await
}

/// Places a PayPal order for one line per listed product.
pub(crate) async fn place_order(
    ctx: &TestContext,
    identity: &Identity,
    products: &[&ProductRecord],
    created_at: Timestamp,
) -> Result<OrderRecord, OrdersServiceError> {
    ctx.orders
        .create_order(
            identity,
            NewOrder {
                product_codes: products.iter().map(|product| product.code.clone()).collect(),
                payment_method: PaymentMethod::Paypal,
                created_at,
            },
        )
        .await
}
