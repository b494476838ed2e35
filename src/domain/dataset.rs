use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::booking::Booking;
use super::customer::Customer;
use super::fleet::{Car, Driver, HighSeason, Partner, Vendor};
use super::ledger::Transaction;
use super::settings::AppSettings;

/// Everything the application owns, persisted as a single blob.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Dataset {
    pub bookings: Vec<Booking>,
    pub cars: Vec<Car>,
    pub drivers: Vec<Driver>,
    pub customers: Vec<Customer>,
    pub vendors: Vec<Vendor>,
    pub partners: Vec<Partner>,
    pub high_seasons: Vec<HighSeason>,
    pub transactions: Vec<Transaction>,
    pub settings: AppSettings,
}

impl Dataset {
    pub fn booking(&self, id: Uuid) -> Option<&Booking> {
        self.bookings.iter().find(|b| b.id == id)
    }

    pub fn booking_mut(&mut self, id: Uuid) -> Option<&mut Booking> {
        self.bookings.iter_mut().find(|b| b.id == id)
    }

    pub fn car(&self, id: Uuid) -> Option<&Car> {
        self.cars.iter().find(|c| c.id == id)
    }

    pub fn customer_mut(&mut self, id: Uuid) -> Option<&mut Customer> {
        self.customers.iter_mut().find(|c| c.id == id)
    }
}
