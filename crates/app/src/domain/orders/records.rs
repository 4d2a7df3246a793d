//! Order Records

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};

use crate::{
    domain::{
        clients::records::{AddressRecord, ClientUuid},
        products::records::{ProductCode, ProductRecord, ProductUuid},
    },
    uuids::TypedUuid,
};

/// Order code, the public identifier of an order.
pub type OrderCode = TypedUuid<OrderRecord>;

/// Order Line UUID
pub type OrderLineUuid = TypedUuid<OrderLineRecord>;

/// Status given to every new order.
pub const INITIAL_ORDER_STATUS: &str = "Waiting for payment";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Paypal,
    CreditCard,
}

impl PaymentMethod {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Paypal => "PAYPAL",
            Self::CreditCard => "CREDIT_CARD",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "PAYPAL" => Ok(Self::Paypal),
            "CREDIT_CARD" => Ok(Self::CreditCard),
            other => Err(format!("unknown payment method: {other}")),
        }
    }
}

/// Fixed-field copy of a client address taken when the order was placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapturedAddress {
    pub recipient: String,
    pub street: String,
    pub city: String,
    pub province: String,
    pub postal_code: String,
    pub country: String,
    pub phone: Option<String>,
}

impl From<&AddressRecord> for CapturedAddress {
    fn from(address: &AddressRecord) -> Self {
        Self {
            recipient: address.recipient.clone(),
            street: address.street.clone(),
            city: address.city.clone(),
            province: address.province.clone(),
            postal_code: address.postal_code.clone(),
            country: address.country.clone(),
            phone: address.phone.clone(),
        }
    }
}

/// Address frozen on an order. Never a reference to the live address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AddressSnapshot {
    Captured(CapturedAddress),
    /// Free text entered by an administrator.
    Manual { text: String },
}

impl fmt::Display for AddressSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Captured(address) => {
                write!(
                    f,
                    "{}, {}, {}, {} {}, {}",
                    address.recipient,
                    address.street,
                    address.city,
                    address.province,
                    address.postal_code,
                    address.country
                )?;

                if let Some(phone) = &address.phone {
                    write!(f, " ({phone})")?;
                }

                Ok(())
            }
            Self::Manual { text } => f.write_str(text),
        }
    }
}

/// Order Line Record
///
/// Price and discount are those of the product when the line was added.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderLineRecord {
    #[serde(skip)]
    pub product_uuid: ProductUuid,
    pub product_code: ProductCode,
    pub price: Decimal,
    pub discount: Decimal,
}

impl From<&ProductRecord> for OrderLineRecord {
    fn from(product: &ProductRecord) -> Self {
        Self {
            product_uuid: product.uuid,
            product_code: product.code.clone(),
            price: product.price,
            discount: product.discount,
        }
    }
}

/// Order Record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderRecord {
    pub code: OrderCode,
    #[serde(skip)]
    pub client_uuid: ClientUuid,
    pub client_email: String,
    #[serde(serialize_with = "epoch_millis")]
    pub created_at: Timestamp,
    pub charge_address: AddressSnapshot,
    pub deliver_address: AddressSnapshot,
    pub payment_method: PaymentMethod,
    pub paid: bool,
    pub status: String,
    pub fulfilled: bool,
    pub lines: Vec<OrderLineRecord>,
}

fn epoch_millis<S: Serializer>(timestamp: &Timestamp, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_i64(timestamp.as_millisecond())
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn captured(phone: Option<&str>) -> AddressSnapshot {
        AddressSnapshot::Captured(CapturedAddress {
            recipient: "Ana Ruiz".to_string(),
            street: "R1".to_string(),
            city: "Sevilla".to_string(),
            province: "Sevilla".to_string(),
            postal_code: "41001".to_string(),
            country: "ES".to_string(),
            phone: phone.map(str::to_string),
        })
    }

    #[test]
    fn captured_address_renders_on_one_line() {
        assert_eq!(
            captured(None).to_string(),
            "Ana Ruiz, R1, Sevilla, Sevilla 41001, ES"
        );
        assert_eq!(
            captured(Some("600000000")).to_string(),
            "Ana Ruiz, R1, Sevilla, Sevilla 41001, ES (600000000)"
        );
    }

    #[test]
    fn manual_address_renders_verbatim() {
        let snapshot = AddressSnapshot::Manual {
            text: "Pick up at store".to_string(),
        };

        assert_eq!(snapshot.to_string(), "Pick up at store");
    }

    #[test]
    fn snapshots_are_tagged_in_json() -> TestResult {
        let json = serde_json::to_value(AddressSnapshot::Manual {
            text: "Dock 4".to_string(),
        })?;

        assert_eq!(json, serde_json::json!({ "kind": "manual", "text": "Dock 4" }));

        let back: AddressSnapshot = serde_json::from_value(serde_json::to_value(captured(None))?)?;

        assert_eq!(back, captured(None));

        Ok(())
    }

    #[test]
    fn payment_methods_parse_their_wire_names_only() {
        assert_eq!("PAYPAL".parse::<PaymentMethod>(), Ok(PaymentMethod::Paypal));
        assert_eq!("CREDIT_CARD".parse::<PaymentMethod>(), Ok(PaymentMethod::CreditCard));
        assert!("paypal".parse::<PaymentMethod>().is_err());
    }
}
