//! Core price/duration calculation functions.
//!
//! Pure functions for booking math - no I/O, no shared state.

use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

/// Round to the nearest 0.5 currency unit, halfway values away from zero.
///
/// # Examples
/// ```
/// use rust_decimal_macros::dec;
/// use sweepstar_web::booking::round_to_half;
///
/// assert_eq!(round_to_half(dec!(60.2)), dec!(60));
/// assert_eq!(round_to_half(dec!(60.25)), dec!(60.5));
/// assert_eq!(round_to_half(dec!(60.75)), dec!(61));
/// ```
pub fn round_to_half(amount: Decimal) -> Decimal {
    (amount * dec!(2)).round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero) / dec!(2)
}

/// One priced, timed contribution to a booking (an option or an extra)
#[derive(Debug, Clone, Copy)]
pub struct LineItem {
    pub price: Decimal,
    pub duration_minutes: i32,
    pub quantity: u32,
}

/// Raw totals before the multiplier is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Estimate {
    pub price: Decimal,
    pub duration_minutes: i32,
}

/// Sum base price/duration with every line item, each scaled by its quantity.
pub fn sum_lines(base_price: Decimal, base_duration_minutes: i32, lines: &[LineItem]) -> Estimate {
    let mut price = base_price;
    let mut duration_minutes = base_duration_minutes;

    for line in lines {
        let quantity = i32::try_from(line.quantity).unwrap_or(i32::MAX);
        price += line.price * Decimal::from(line.quantity);
        duration_minutes =
            duration_minutes.saturating_add(line.duration_minutes.saturating_mul(quantity));
    }

    Estimate {
        price,
        duration_minutes,
    }
}

/// Inclusive range the final price is allowed to land in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PriceBounds {
    pub min: Decimal,
    pub max: Decimal,
}

impl PriceBounds {
    pub fn clamp(&self, amount: Decimal) -> Decimal {
        amount.max(self.min).min(self.max)
    }
}

/// Range the discount/tip multiplier may take.
///
/// The discount part of the range (`min_factor` below 1) only opens up once
/// at least `discount_unlock_items` line items are selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MultiplierPolicy {
    pub min_factor: Decimal,
    pub max_factor: Decimal,
    pub discount_unlock_items: usize,
}

impl Default for MultiplierPolicy {
    fn default() -> Self {
        Self {
            min_factor: dec!(0.9),
            max_factor: dec!(1.5),
            discount_unlock_items: 2,
        }
    }
}

impl MultiplierPolicy {
    pub fn discount_unlocked(&self, line_items: usize) -> bool {
        line_items >= self.discount_unlock_items
    }

    /// Lowest multiplier allowed for the given number of line items
    pub fn min_factor_for(&self, line_items: usize) -> Decimal {
        if self.discount_unlocked(line_items) {
            self.min_factor.min(self.max_factor)
        } else {
            Decimal::ONE.min(self.max_factor)
        }
    }

    pub fn clamp_multiplier(&self, multiplier: Decimal, line_items: usize) -> Decimal {
        multiplier.max(self.min_factor_for(line_items)).min(self.max_factor)
    }

    /// Price bounds for a raw price; both ends rounded to 0.5 and `max >= min`.
    pub fn bounds(&self, price: Decimal, line_items: usize) -> PriceBounds {
        let min = round_to_half(price * self.min_factor_for(line_items));
        let max = round_to_half(price * self.max_factor).max(min);
        PriceBounds { min, max }
    }
}

/// Apply the multiplier, round to 0.5 and clamp into `bounds`.
pub fn final_price(price: Decimal, multiplier: Decimal, bounds: &PriceBounds) -> Decimal {
    bounds.clamp(round_to_half(price * multiplier))
}

/// Multiplier that would turn `price` into `target`.
///
/// Returns `None` when `price` is not positive, so callers keep their
/// current multiplier.
pub fn multiplier_for_target(price: Decimal, target: Decimal) -> Option<Decimal> {
    if price <= Decimal::ZERO {
        return None;
    }
    target.checked_div(price)
}
