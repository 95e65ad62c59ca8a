//! Decimal money helpers.
//!
//! Prices and amounts are exact decimals; shares are whole numbers.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Price per share.
pub type Price = Decimal;

/// Price multiplied by a share count.
pub type Amount = Decimal;

/// Number of shares in an order or a fill.
pub type Shares = u32;

/// Round to the nearest cent, half away from zero.
pub fn round_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Whole number of cents in `price`, rounded to the nearest cent.
///
/// Saturates at the `i64` range. Books only hold prices that pass
/// [`is_tradable_price`], so saturation never reaches ranking.
pub fn to_cents(price: Price) -> i64 {
    checked_cents(price).unwrap_or(if price.is_sign_negative() {
        i64::MIN
    } else {
        i64::MAX
    })
}

fn checked_cents(price: Price) -> Option<i64> {
    round_cents(price)
        .checked_mul(Decimal::ONE_HUNDRED)?
        .to_i64()
}

/// Returns `true` if `price` has an `i64` cent count and any fill at it
/// (up to `Shares::MAX` shares) has a representable amount.
pub fn is_tradable_price(price: Price) -> bool {
    checked_cents(price).is_some() && checked_amount(Shares::MAX, price).is_some()
}

/// Format a value with exactly two decimals, e.g. `12.5` -> `"12.50"`.
pub fn format_money(value: Decimal) -> String {
    format!("{:.2}", round_cents(value))
}

/// Total value of `shares` traded at `price`, `None` on overflow.
pub fn checked_amount(shares: Shares, price: Price) -> Option<Amount> {
    Decimal::from(shares).checked_mul(price)
}

/// Total value of `shares` traded at `price`.
///
/// Saturates at `Decimal::MAX` in magnitude.
pub fn amount(shares: Shares, price: Price) -> Amount {
    checked_amount(shares, price).unwrap_or(if price.is_sign_negative() {
        Decimal::MIN
    } else {
        Decimal::MAX
    })
}
