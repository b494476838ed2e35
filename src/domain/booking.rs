use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    PendingApproval,
    Booked,
    Active,
    Completed,
    Cancelled,
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BookingStatus::PendingApproval => "PENDING_APPROVAL",
            BookingStatus::Booked => "BOOKED",
            BookingStatus::Active => "ACTIVE",
            BookingStatus::Completed => "COMPLETED",
            BookingStatus::Cancelled => "CANCELLED",
        };
        f.write_str(s)
    }
}

impl FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING_APPROVAL" => Ok(BookingStatus::PendingApproval),
            "BOOKED" => Ok(BookingStatus::Booked),
            "ACTIVE" => Ok(BookingStatus::Active),
            "COMPLETED" => Ok(BookingStatus::Completed),
            "CANCELLED" => Ok(BookingStatus::Cancelled),
            other => Err(format!("unknown booking status '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Unpaid,
    Partial,
    Paid,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PaymentStatus::Unpaid => "UNPAID",
            PaymentStatus::Partial => "PARTIAL",
            PaymentStatus::Paid => "PAID",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Destination {
    InTown,
    OutOfTown,
}

impl FromStr for Destination {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "IN_TOWN" => Ok(Destination::InTown),
            "OUT_OF_TOWN" => Ok(Destination::OutOfTown),
            other => Err(format!("unknown destination '{}'", other)),
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Destination::InTown => "IN_TOWN",
            Destination::OutOfTown => "OUT_OF_TOWN",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SecurityDepositKind {
    Cash,
    Item,
}

impl FromStr for SecurityDepositKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CASH" => Ok(SecurityDepositKind::Cash),
            "ITEM" => Ok(SecurityDepositKind::Item),
            other => Err(format!("unknown security deposit kind '{}'", other)),
        }
    }
}

impl fmt::Display for SecurityDepositKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SecurityDepositKind::Cash => "CASH",
            SecurityDepositKind::Item => "ITEM",
        })
    }
}

/// Collateral held for the rental, either money or a physical item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityDeposit {
    pub kind: SecurityDepositKind,
    pub value: BigDecimal,
    pub description: String,
    pub image: Option<String>,
}

/// Booking fulfilled with a vendor's externally sourced vehicle instead of
/// an owned fleet unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RentToRent {
    pub vendor_id: Option<Uuid>,
    pub external_car_name: String,
    pub external_car_plate: Option<String>,
    pub vendor_fee: BigDecimal,
}

/// Vehicle condition record captured at handover. Completing one moves the
/// booking to ACTIVE.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleChecklist {
    pub odometer: i64,
    pub fuel_level: String,
    pub speedometer_image: Option<String>,
    pub front_image: Option<String>,
    pub back_image: Option<String>,
    pub left_image: Option<String>,
    pub right_image: Option<String>,
    pub notes: Option<String>,
    pub checked_at: DateTime<Utc>,
    pub checked_by: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    /// None for rent-to-rent bookings.
    pub car_id: Option<Uuid>,
    pub rent_to_rent: Option<RentToRent>,
    pub driver_id: Option<Uuid>,
    pub customer_id: Option<Uuid>,
    pub customer_name: String,
    pub customer_phone: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub actual_return_date: Option<DateTime<Utc>>,
    pub package_type: String,
    pub destination: Destination,
    pub security_deposit: SecurityDeposit,
    pub base_price: BigDecimal,
    pub driver_fee: BigDecimal,
    pub high_season_fee: BigDecimal,
    pub delivery_fee: BigDecimal,
    pub overtime_fee: BigDecimal,
    pub extra_cost: BigDecimal,
    pub extra_cost_description: Option<String>,
    pub discount: BigDecimal,
    pub total_price: BigDecimal,
    pub amount_paid: BigDecimal,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub notes: String,
    pub customer_note: Option<String>,
    pub driver_note: Option<String>,
    pub checklist: Option<VehicleChecklist>,
    pub created_at: DateTime<Utc>,
}
