use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::booking::{Booking, BookingStatus};

/// Half-open interval overlap test: [start, end) intersects
/// [other_start, other_end).
pub fn overlaps(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    other_start: DateTime<Utc>,
    other_end: DateTime<Utc>,
) -> bool {
    start < other_end && end > other_start
}

/// First booking of `car_id` whose window overlaps [start, end), in list
/// order. Cancelled bookings and the excluded id (the booking being edited)
/// never conflict.
pub fn find_car_conflict<'a>(
    bookings: &'a [Booking],
    car_id: Uuid,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    exclude: Option<Uuid>,
) -> Option<&'a Booking> {
    bookings.iter().find(|b| {
        exclude != Some(b.id)
            && b.status != BookingStatus::Cancelled
            && b.car_id == Some(car_id)
            && overlaps(start, end, b.start_date, b.end_date)
    })
}

/// Like [`find_car_conflict`], but matches on the assigned driver regardless
/// of which car the other booking uses.
pub fn find_driver_conflict<'a>(
    bookings: &'a [Booking],
    driver_id: Uuid,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    exclude: Option<Uuid>,
) -> Option<&'a Booking> {
    bookings.iter().find(|b| {
        exclude != Some(b.id)
            && b.status != BookingStatus::Cancelled
            && b.driver_id == Some(driver_id)
            && overlaps(start, end, b.start_date, b.end_date)
    })
}
