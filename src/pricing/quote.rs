use bigdecimal::{BigDecimal, Zero};
use chrono::{DateTime, Utc};

use crate::domain::fleet::{Car, HighSeason};
use crate::domain::settings::OvertimePolicy;

use super::conflict::overlaps;

/// Chargeable days for a rental window. Partial days round up, and even a
/// sub-day rental counts as one full day.
pub fn rental_days(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    let seconds = (end - start).num_seconds();
    if seconds <= 0 {
        return 1;
    }
    // ceil(seconds / 86_400), min 1
    ((seconds + 86_399) / 86_400).max(1)
}

/// Whole overdue hours between the scheduled end and the actual return,
/// rounded up. Zero when the car comes back on time or early.
pub fn overdue_hours(scheduled_end: DateTime<Utc>, actual_return: DateTime<Utc>) -> i64 {
    let seconds = (actual_return - scheduled_end).num_seconds();
    if seconds <= 0 {
        0
    } else {
        (seconds + 3_599) / 3_600
    }
}

/// Daily rate for a car under the given rental package. Packages without an
/// explicit price fall back to the 24-hour rate, then to zero.
pub fn unit_daily_rate(car: &Car, package: &str) -> BigDecimal {
    car.pricing
        .get(package)
        .cloned()
        .or_else(|| car.price_24h.clone())
        .unwrap_or_else(BigDecimal::zero)
}

/// Overtime charge for `hours` overdue hours. A percentage policy charges
/// that share of the daily rate per hour; a nominal policy charges a flat
/// amount per hour.
pub fn overtime_fee(
    policy: &OvertimePolicy,
    unit_daily_rate: &BigDecimal,
    hours: i64,
) -> BigDecimal {
    if hours <= 0 {
        return BigDecimal::zero();
    }
    let per_hour = match policy {
        OvertimePolicy::Percentage(pct) => (unit_daily_rate * pct) / BigDecimal::from(100),
        OvertimePolicy::Nominal(flat) => flat.clone(),
    };
    per_hour * BigDecimal::from(hours)
}

#[derive(Debug, Clone)]
pub struct PricingInput<'a> {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub unit_daily_rate: BigDecimal,
    /// Per-day driver salary; `None` when the booking has no driver.
    pub driver_salary: Option<BigDecimal>,
    pub high_seasons: &'a [HighSeason],
    pub delivery_fee: BigDecimal,
    pub overtime_fee: BigDecimal,
    pub extra_cost: BigDecimal,
    pub discount: BigDecimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PriceBreakdown {
    pub duration_days: i64,
    pub base_price: BigDecimal,
    pub driver_fee: BigDecimal,
    pub high_season_fee: BigDecimal,
    pub delivery_fee: BigDecimal,
    pub overtime_fee: BigDecimal,
    pub extra_cost: BigDecimal,
    pub discount: BigDecimal,
    pub total_price: BigDecimal,
}

/// Compose the full price for a booking. Pure function of its inputs; the
/// caller re-runs it after every relevant change.
pub fn compute_price(input: &PricingInput) -> PriceBreakdown {
    let days = rental_days(input.start, input.end);
    let days_dec = BigDecimal::from(days);

    let base_price = &input.unit_daily_rate * &days_dec;
    let driver_fee = match &input.driver_salary {
        Some(salary) => salary * &days_dec,
        None => BigDecimal::zero(),
    };

    // Every window touching the rental charges its surcharge for the whole
    // booked duration, not only the days inside the window.
    let mut high_season_fee = BigDecimal::zero();
    for season in input.high_seasons {
        if overlaps(input.start, input.end, season.start_date, season.end_date) {
            high_season_fee += &season.price_increase * &days_dec;
        }
    }

    let subtotal = &base_price
        + &driver_fee
        + &high_season_fee
        + &input.delivery_fee
        + &input.overtime_fee
        + &input.extra_cost;
    let total = &subtotal - &input.discount;
    let total_price = if total < BigDecimal::zero() {
        BigDecimal::zero()
    } else {
        total
    };

    PriceBreakdown {
        duration_days: days,
        base_price,
        driver_fee,
        high_season_fee,
        delivery_fee: input.delivery_fee.clone(),
        overtime_fee: input.overtime_fee.clone(),
        extra_cost: input.extra_cost.clone(),
        discount: input.discount.clone(),
        total_price,
    }
}
