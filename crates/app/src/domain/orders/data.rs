//! Order Requests

use jiff::Timestamp;
use smallvec::SmallVec;

use crate::{
    domain::{
        orders::records::{OrderCode, PaymentMethod},
        products::records::ProductCode,
    },
    params::{Params, ValidationError},
};

/// Product codes as listed in a request, duplicates preserved.
pub type ProductCodes = SmallVec<[ProductCode; 4]>;

/// Required `code` parameter naming an order.
///
/// # Errors
///
/// Returns an error when the code is absent, blank or not an order code.
pub fn order_code_from_params(params: &Params) -> Result<OrderCode, ValidationError> {
    params
        .required_text("code")?
        .parse::<OrderCode>()
        .map_err(|_parse_error| ValidationError::new("code", "not a valid order code"))
}

fn product_codes(params: &Params, field: &str) -> Result<ProductCodes, ValidationError> {
    Ok(params
        .list(field)?
        .into_iter()
        .map(ProductCode::from)
        .collect())
}

/// New Order Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub product_codes: ProductCodes,
    pub payment_method: PaymentMethod,
    /// Placement time. Stored with millisecond precision.
    pub created_at: Timestamp,
}

impl NewOrder {
    /// Parse an order creation request placed at `created_at`.
    ///
    /// # Errors
    ///
    /// Returns an error when no product code is given, a code is blank, or
    /// the payment method is missing or unknown.
    pub fn from_params(params: &Params, created_at: Timestamp) -> Result<Self, ValidationError> {
        let product_codes = product_codes(params, "product_codes")?;

        if product_codes.is_empty() {
            return Err(ValidationError::missing("product_codes"));
        }

        let payment_method = params
            .parse::<PaymentMethod>("payment_method", "PAYPAL or CREDIT_CARD")?
            .ok_or_else(|| ValidationError::missing("payment_method"))?;

        Ok(Self {
            product_codes,
            payment_method,
            created_at,
        })
    }
}

/// Administrative change to an order. Absent fields are left unchanged.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OrderUpdate {
    pub add_product_codes: ProductCodes,
    /// Removes every line with one of these codes, including lines added by
    /// the same update.
    pub rem_product_codes: ProductCodes,
    pub charge_address: Option<String>,
    pub deliver_address: Option<String>,
    pub paid: Option<bool>,
    pub status: Option<String>,
}

impl OrderUpdate {
    /// Parse the update fields of an admin order update request. The order
    /// `code` is read separately with [`order_code_from_params`].
    ///
    /// # Errors
    ///
    /// Returns the first blank or malformed field.
    pub fn from_params(params: &Params) -> Result<Self, ValidationError> {
        Ok(Self {
            add_product_codes: product_codes(params, "add_product_codes")?,
            rem_product_codes: product_codes(params, "rem_product_codes")?,
            charge_address: params.verbatim("charge_address")?.map(str::to_string),
            deliver_address: params.verbatim("deliver_address")?.map(str::to_string),
            paid: params.flag("order_paid")?,
            status: params.text("status")?.map(str::to_string),
        })
    }

    /// Whether the update touches the order's lines.
    #[must_use]
    pub fn changes_lines(&self) -> bool {
        !self.add_product_codes.is_empty() || !self.rem_product_codes.is_empty()
    }

    /// Every code named by the update, each once.
    #[must_use]
    pub fn referenced_codes(&self) -> Vec<ProductCode> {
        let mut codes: Vec<ProductCode> = Vec::new();

        for code in self.add_product_codes.iter().chain(&self.rem_product_codes) {
            if !codes.contains(code) {
                codes.push(code.clone());
            }
        }

        codes
    }
}
