use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CarStatus {
    Available,
    Unavailable,
    Maintenance,
}

impl fmt::Display for CarStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CarStatus::Available => "AVAILABLE",
            CarStatus::Unavailable => "UNAVAILABLE",
            CarStatus::Maintenance => "MAINTENANCE",
        })
    }
}

impl FromStr for CarStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AVAILABLE" => Ok(CarStatus::Available),
            "UNAVAILABLE" => Ok(CarStatus::Unavailable),
            "MAINTENANCE" => Ok(CarStatus::Maintenance),
            other => Err(format!("unknown car status '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Car {
    pub id: Uuid,
    pub name: String,
    pub brand: Option<String>,
    pub plate: String,
    pub category: String,
    /// Daily rate per rental package name. Missing packages fall back to
    /// `price_24h`.
    pub pricing: HashMap<String, BigDecimal>,
    pub price_12h: Option<BigDecimal>,
    pub price_24h: Option<BigDecimal>,
    /// Daily payout owed to the investing partner when the car earns.
    pub investor_setoran: BigDecimal,
    /// Daily salary charged when the booking includes a driver.
    pub driver_salary: BigDecimal,
    pub partner_id: Option<Uuid>,
    pub status: CarStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DriverStatus {
    Active,
    Inactive,
}

impl fmt::Display for DriverStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DriverStatus::Active => "ACTIVE",
            DriverStatus::Inactive => "INACTIVE",
        })
    }
}

impl FromStr for DriverStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(DriverStatus::Active),
            "INACTIVE" => Ok(DriverStatus::Inactive),
            other => Err(format!("unknown driver status '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Driver {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub daily_rate: BigDecimal,
    pub status: DriverStatus,
}

/// Rent-to-rent supplier of external vehicles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vendor {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub address: String,
}

/// Investor owning one or more fleet cars.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Partner {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub split_percentage: BigDecimal,
}

/// Named date range carrying an additive per-day surcharge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighSeason {
    pub id: Uuid,
    pub name: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub price_increase: BigDecimal,
}
