//! Client Data

use crate::{domain::clients::records::ClientUuid, params::ValidationError};

/// New Client Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewClient {
    pub uuid: ClientUuid,
    pub email: String,
    pub name: String,
}

impl NewClient {
    pub(crate) fn validate(&self) -> Result<(), ValidationError> {
        let email = self.email.trim();

        if email.is_empty() {
            return Err(ValidationError::blank("email"));
        }

        if !email.split_once('@').is_some_and(|(local, domain)| {
            !local.is_empty() && !domain.is_empty()
        }) {
            return Err(ValidationError::new("email", "must be an email address"));
        }

        if self.name.trim().is_empty() {
            return Err(ValidationError::blank("name"));
        }

        Ok(())
    }
}

/// Address Data
///
/// Replaces the whole address of one kind; there is no partial update.
#[derive(Debug, Clone, PartialEq)]
pub struct AddressData {
    pub recipient: String,
    pub street: String,
    pub city: String,
    pub province: String,
    pub postal_code: String,
    pub country: String,
    pub phone: Option<String>,
}

impl AddressData {
    pub(crate) fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("recipient", &self.recipient),
            ("street", &self.street),
            ("city", &self.city),
            ("province", &self.province),
            ("postal_code", &self.postal_code),
            ("country", &self.country),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::blank(field));
            }
        }

        Ok(())
    }
}
