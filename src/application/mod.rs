pub mod booking_service;
pub mod customer_service;
pub mod fleet_service;

pub use booking_service::BookingService;
pub use customer_service::CustomerService;
pub use fleet_service::FleetService;
