//! The booking pricing and availability engine: conflict detection, price
//! composition and lifecycle resolution, all pure functions over data the
//! caller passes in.

pub mod conflict;
pub mod lifecycle;
pub mod quote;

pub use conflict::{find_car_conflict, find_driver_conflict, overlaps};
pub use lifecycle::{resolve_payment_status, resolve_status};
pub use quote::{
    compute_price, overdue_hours, overtime_fee, rental_days, unit_daily_rate, PriceBreakdown,
    PricingInput,
};
