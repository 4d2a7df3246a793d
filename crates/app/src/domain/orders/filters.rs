//! Order Filters

use jiff::Timestamp;

use crate::{
    domain::{orders::records::PaymentMethod, pagination::Pagination},
    params::{Params, ValidationError},
};

const PAGE_SIZE_FIELD: &str = "max_orders_per_page";

/// Admin order listing criteria. Every present field narrows the result;
/// fulfilled orders are included unless filtered out.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OrderFilter {
    pub client_email: Option<String>,
    /// Inclusive lower bound on the creation time.
    pub created_from: Option<Timestamp>,
    /// Inclusive upper bound on the creation time.
    pub created_until: Option<Timestamp>,
    pub payment_method: Option<PaymentMethod>,
    pub paid: Option<bool>,
    /// Case-insensitive exact status.
    pub status: Option<String>,
    pub fulfilled: Option<bool>,
    pub pagination: Pagination,
}

impl OrderFilter {
    /// Parse an admin order listing request.
    ///
    /// # Errors
    ///
    /// Returns the first blank or malformed field, or an error on
    /// `min_order_date` when it is later than `max_order_date`.
    pub fn from_params(params: &Params) -> Result<Self, ValidationError> {
        let client_email = params.text("client_email")?.map(str::to_string);

        let created_from = epoch_millis(params, "min_order_date")?;
        let created_until = epoch_millis(params, "max_order_date")?;

        if created_from
            .zip(created_until)
            .is_some_and(|(from, until)| from > until)
        {
            return Err(ValidationError::new(
                "min_order_date",
                "must not be later than max_order_date",
            ));
        }

        let payment_method =
            params.parse::<PaymentMethod>("order_payment_method", "PAYPAL or CREDIT_CARD")?;

        let paid = params.flag("order_is_paid")?;
        let status = params.text("order_status")?.map(str::to_string);
        let fulfilled = params.flag("order_is_fulfilled")?;

        let pagination = Pagination::from_params(params, PAGE_SIZE_FIELD)?;

        Ok(Self {
            client_email,
            created_from,
            created_until,
            payment_method,
            paid,
            status,
            fulfilled,
            pagination,
        })
    }

    /// Pagination for a client's own order listing.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid pagination values.
    pub fn pagination_from_params(params: &Params) -> Result<Pagination, ValidationError> {
        Pagination::from_params(params, PAGE_SIZE_FIELD)
    }
}

fn epoch_millis(params: &Params, field: &str) -> Result<Option<Timestamp>, ValidationError> {
    params
        .parse::<i64>(field, "epoch milliseconds")?
        .map(|millis| {
            Timestamp::from_millisecond(millis)
                .map_err(|_range_error| ValidationError::new(field, "is out of range"))
        })
        .transpose()
}
