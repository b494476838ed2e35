use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found")]
    NotFound,
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Car is already booked by {customer_name}")]
    CarUnavailable {
        booking_id: Uuid,
        customer_name: String,
    },
    #[error("Driver already has another assignment for {customer_name}")]
    DriverUnavailable {
        booking_id: Uuid,
        customer_name: String,
    },
    #[error("Internal error: {0}")]
    Internal(String),
}
