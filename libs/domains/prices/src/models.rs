use chrono::NaiveDateTime;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::datetime;

/// One price-list entry.
///
/// Multiple entries may share (brand_id, product_id) with overlapping
/// [start_date, end_date] windows; overlap is expected data, disambiguated
/// at query time by `priority` (higher wins) and `price_list` (lower wins
/// among equal priorities). Entries are created by an external
/// data-management process and are read-only here.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Price {
    pub brand_id: i32,
    pub product_id: i32,
    pub price_list: i32,
    /// Start of the validity window, inclusive
    pub start_date: NaiveDateTime,
    /// End of the validity window, inclusive
    pub end_date: NaiveDateTime,
    pub priority: i32,
    /// Exact decimal amount, no floating-point rounding
    pub price: Decimal,
    /// ISO 4217 code
    pub currency: String,
}

/// One resolution request: a concrete instant, never an open range.
///
/// Ordering (priority descending, price_list ascending) and the single-row
/// limit are fixed properties of the resolution contract, applied by every
/// repository implementation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceQuery {
    pub brand_id: i32,
    pub product_id: i32,
    pub as_of: NaiveDateTime,
}

/// Raw query-string input of the read endpoint, validated by the service.
///
/// Fields stay untyped strings so each invalid value can be echoed back in
/// the validation problem instead of being swallowed by deserialization.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PriceQueryParams {
    /// Brand identifier (integer)
    pub brand_id: Option<String>,
    /// Product identifier (integer)
    pub product_id: Option<String>,
    /// Instant to resolve against, `dd/MM/yyyy HH:mm:ss`
    pub application_date: Option<String>,
}

/// Caller-facing shape of a resolved price.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PriceView {
    pub brand_id: i32,
    pub product_id: i32,
    pub price_list: i32,
    /// `dd/MM/yyyy HH:mm:ss`
    pub start_date: String,
    /// `dd/MM/yyyy HH:mm:ss`
    pub end_date: String,
    /// Rounded to exactly two decimal places, half-up
    pub price: Decimal,
    pub currency: String,
}

impl From<Price> for PriceView {
    fn from(price: Price) -> Self {
        Self {
            brand_id: price.brand_id,
            product_id: price.product_id,
            price_list: price.price_list,
            start_date: datetime::format_application_date(price.start_date),
            end_date: datetime::format_application_date(price.end_date),
            price: price
                .price
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
            currency: price.currency,
        }
    }
}
