//! Order arithmetic. Amounts are whole rupiah.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// PPN applied to service bookings.
pub const TAX_RATE_PERCENT: i64 = 11;
/// Rental deposit is this many days of the daily rate, whatever the duration.
pub const DEPOSIT_DAYS: i64 = 10;
pub const MIN_RENTAL_DAYS: i32 = 1;
pub const MAX_RENTAL_DAYS: i32 = 365;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DurationType {
    Weekly,
    Monthly,
    /// Also covers any unrecognised value.
    #[serde(other)]
    Daily,
}

impl DurationType {
    pub fn discount_percent(self) -> i64 {
        match self {
            DurationType::Daily => 0,
            DurationType::Weekly => 10,
            DurationType::Monthly => 20,
        }
    }
}

/// Order-level amounts. `total == subtotal + tax` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Totals {
    pub subtotal: i64,
    pub tax: i64,
    pub discount: i64,
    pub deposit: i64,
    pub total: i64,
}

impl Totals {
    fn untaxed(subtotal: i64) -> Self {
        Self {
            subtotal,
            tax: 0,
            discount: 0,
            deposit: 0,
            total: subtotal,
        }
    }
}

/// `percent`% of `amount`, rounded half up.
pub fn percent_of(amount: i64, percent: i64) -> i64 {
    (amount * percent + 50) / 100
}

/// A ranged service is booked at its lower bound.
pub fn service_unit_price(price: Option<i64>, min_price: Option<i64>) -> Option<i64> {
    min_price.or(price)
}

pub fn service_booking_totals(unit_price: i64) -> Totals {
    let tax = percent_of(unit_price, TAX_RATE_PERCENT);
    Totals {
        subtotal: unit_price,
        tax,
        discount: 0,
        deposit: 0,
        total: unit_price + tax,
    }
}

/// Sparepart purchases carry no tax.
pub fn sparepart_totals(unit_price: i64, quantity: i32) -> Totals {
    Totals::untaxed(unit_price * i64::from(quantity))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct RentalQuote {
    pub base_price: i64,
    pub discount: i64,
    pub deposit: i64,
    pub total: i64,
}

pub fn rental_quote(price_per_day: i64, duration_days: i32, duration_type: DurationType) -> RentalQuote {
    let base_price = price_per_day * i64::from(duration_days);
    let discount = percent_of(base_price, duration_type.discount_percent());
    let deposit = price_per_day * DEPOSIT_DAYS;
    RentalQuote {
        base_price,
        discount,
        deposit,
        total: base_price - discount + deposit,
    }
}

/// The rental line carries the deposit, so the order subtotal equals the quote total.
pub fn rental_totals(quote: &RentalQuote) -> Totals {
    Totals {
        discount: quote.discount,
        deposit: quote.deposit,
        ..Totals::untaxed(quote.total)
    }
}
