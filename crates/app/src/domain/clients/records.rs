//! Client Records

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::uuids::TypedUuid;

/// Client UUID
pub type ClientUuid = TypedUuid<ClientRecord>;

/// Address UUID
pub type AddressUuid = TypedUuid<AddressRecord>;

/// Role an address plays for its client. A client has at most one of each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressKind {
    Charge,
    Deliver,
}

impl AddressKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Charge => "charge",
            Self::Deliver => "deliver",
        }
    }
}

impl fmt::Display for AddressKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AddressKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "charge" => Ok(Self::Charge),
            "deliver" => Ok(Self::Deliver),
            other => Err(format!("unknown address kind: {other}")),
        }
    }
}

/// Address Record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddressRecord {
    pub uuid: AddressUuid,
    pub client_uuid: ClientUuid,
    pub kind: AddressKind,
    pub recipient: String,
    pub street: String,
    pub city: String,
    pub province: String,
    pub postal_code: String,
    pub country: String,
    pub phone: Option<String>,
    pub updated_at: Timestamp,
}

/// Client Record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientRecord {
    pub uuid: ClientUuid,
    pub email: String,
    pub name: String,
    pub enabled: bool,
    pub created_at: Timestamp,
    pub charge_address: Option<AddressRecord>,
    pub deliver_address: Option<AddressRecord>,
}

impl ClientRecord {
    /// The client's current address of the given kind.
    #[must_use]
    pub fn address(&self, kind: AddressKind) -> Option<&AddressRecord> {
        match kind {
            AddressKind::Charge => self.charge_address.as_ref(),
            AddressKind::Deliver => self.deliver_address.as_ref(),
        }
    }

    pub(crate) fn attach_addresses(&mut self, addresses: Vec<AddressRecord>) {
        for address in addresses {
            match address.kind {
                AddressKind::Charge => self.charge_address = Some(address),
                AddressKind::Deliver => self.deliver_address = Some(address),
            }
        }
    }
}
