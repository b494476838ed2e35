use bigdecimal::{BigDecimal, Zero};
use chrono::{DateTime, Utc};

use crate::domain::booking::{BookingStatus, PaymentStatus};

/// Status a booking lands in when saved. A recorded actual return always
/// completes the booking; otherwise only an explicitly requested ACTIVE or
/// CANCELLED survives, and everything else defaults to BOOKED.
pub fn resolve_status(
    actual_return: Option<DateTime<Utc>>,
    requested: BookingStatus,
) -> BookingStatus {
    if actual_return.is_some() {
        return BookingStatus::Completed;
    }
    match requested {
        BookingStatus::Active | BookingStatus::Cancelled => requested,
        _ => BookingStatus::Booked,
    }
}

/// PAID once the total is covered (and nonzero), PARTIAL for any smaller
/// payment, UNPAID otherwise.
pub fn resolve_payment_status(
    amount_paid: &BigDecimal,
    total_price: &BigDecimal,
) -> PaymentStatus {
    let zero = BigDecimal::zero();
    if amount_paid >= total_price && *total_price > zero {
        PaymentStatus::Paid
    } else if *amount_paid > zero {
        PaymentStatus::Partial
    } else {
        PaymentStatus::Unpaid
    }
}
