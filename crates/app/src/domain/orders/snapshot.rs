//! Order Snapshots
//!
//! An order freezes the client's addresses and each product's price and
//! discount at the moment it is placed. Later changes to the live client or
//! product never reach an existing order.

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::domain::{
    clients::records::{AddressKind, ClientRecord},
    orders::records::{AddressSnapshot, CapturedAddress, OrderLineRecord},
    products::records::{ProductCode, ProductRecord},
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    #[error("client has no {0} address")]
    MissingAddress(AddressKind),

    #[error("unknown product code: {0}")]
    UnknownProduct(ProductCode),
}

/// Immutable order content, ready to persist.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderSnapshot {
    pub charge_address: AddressSnapshot,
    pub deliver_address: AddressSnapshot,
    pub lines: Vec<OrderLineRecord>,
}

/// Builds an [`OrderSnapshot`] for a client from already resolved products.
#[derive(Debug)]
pub struct OrderSnapshotBuilder<'a> {
    client: &'a ClientRecord,
    products: FxHashMap<&'a str, &'a ProductRecord>,
}

impl<'a> OrderSnapshotBuilder<'a> {
    #[must_use]
    pub fn new(client: &'a ClientRecord, products: &'a [ProductRecord]) -> Self {
        Self {
            client,
            products: products
                .iter()
                .map(|product| (product.code.as_str(), product))
                .collect(),
        }
    }

    /// One line per requested code, in request order.
    ///
    /// # Errors
    ///
    /// Fails on the charge address, then the deliver address, then the first
    /// code that does not resolve to an enabled product.
    pub fn build(&self, codes: &[ProductCode]) -> Result<OrderSnapshot, SnapshotError> {
        let charge_address = self.capture(AddressKind::Charge)?;
        let deliver_address = self.capture(AddressKind::Deliver)?;

        let lines = codes
            .iter()
            .map(|code| {
                self.products
                    .get(code.as_str())
                    .filter(|product| product.enabled)
                    .map(|product| OrderLineRecord::from(*product))
                    .ok_or_else(|| SnapshotError::UnknownProduct(code.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(OrderSnapshot {
            charge_address,
            deliver_address,
            lines,
        })
    }

    fn capture(&self, kind: AddressKind) -> Result<AddressSnapshot, SnapshotError> {
        self.client
            .address(kind)
            .map(|address| AddressSnapshot::Captured(CapturedAddress::from(address)))
            .ok_or(SnapshotError::MissingAddress(kind))
    }
}
