use bigdecimal::{BigDecimal, Zero};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::fleet::{
    Car, CarStatus, Driver, DriverStatus, HighSeason, Partner, Vendor,
};
use crate::domain::ports::RentalRepository;
use crate::domain::settings::{AppSettings, OvertimePolicy};

#[derive(Debug, Clone)]
pub struct CarDraft {
    pub name: String,
    pub brand: Option<String>,
    pub plate: String,
    pub category: String,
    pub pricing: HashMap<String, BigDecimal>,
    pub price_12h: Option<BigDecimal>,
    pub price_24h: Option<BigDecimal>,
    pub investor_setoran: BigDecimal,
    pub driver_salary: BigDecimal,
    pub partner_id: Option<Uuid>,
    pub status: CarStatus,
}

#[derive(Debug, Clone)]
pub struct DriverDraft {
    pub name: String,
    pub phone: String,
    pub daily_rate: BigDecimal,
    pub status: DriverStatus,
}

#[derive(Debug, Clone)]
pub struct HighSeasonDraft {
    pub name: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub price_increase: BigDecimal,
}

/// Administration of everything the booking flow reads: fleet units,
/// drivers, rent-to-rent vendors, investing partners, high seasons and the
/// company settings.
pub struct FleetService<R> {
    repo: R,
}

impl<R: RentalRepository> FleetService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn add_car(&self, draft: CarDraft) -> Result<Car, DomainError> {
        if draft.name.trim().is_empty() || draft.plate.trim().is_empty() {
            return Err(DomainError::InvalidInput(
                "car name and plate are required".to_string(),
            ));
        }

        let mut data = self.repo.load()?;
        let car = Car {
            id: Uuid::new_v4(),
            name: draft.name,
            brand: draft.brand,
            plate: draft.plate,
            category: draft.category,
            pricing: draft.pricing,
            price_12h: draft.price_12h,
            price_24h: draft.price_24h,
            investor_setoran: draft.investor_setoran,
            driver_salary: draft.driver_salary,
            partner_id: draft.partner_id,
            status: draft.status,
        };
        data.cars.push(car.clone());
        self.repo.save(&data)?;
        log::info!("car {} ({}) added to fleet", car.name, car.plate);
        Ok(car)
    }

    pub fn list_cars(&self) -> Result<Vec<Car>, DomainError> {
        Ok(self.repo.load()?.cars)
    }

    pub fn delete_car(&self, id: Uuid) -> Result<(), DomainError> {
        let mut data = self.repo.load()?;
        let index = data
            .cars
            .iter()
            .position(|c| c.id == id)
            .ok_or(DomainError::NotFound)?;
        data.cars.remove(index);
        self.repo.save(&data)
    }

    pub fn add_driver(&self, draft: DriverDraft) -> Result<Driver, DomainError> {
        if draft.name.trim().is_empty() {
            return Err(DomainError::InvalidInput(
                "driver name is required".to_string(),
            ));
        }

        let mut data = self.repo.load()?;
        let driver = Driver {
            id: Uuid::new_v4(),
            name: draft.name,
            phone: draft.phone,
            daily_rate: draft.daily_rate,
            status: draft.status,
        };
        data.drivers.push(driver.clone());
        self.repo.save(&data)?;
        Ok(driver)
    }

    pub fn list_drivers(&self) -> Result<Vec<Driver>, DomainError> {
        Ok(self.repo.load()?.drivers)
    }

    pub fn delete_driver(&self, id: Uuid) -> Result<(), DomainError> {
        let mut data = self.repo.load()?;
        let index = data
            .drivers
            .iter()
            .position(|d| d.id == id)
            .ok_or(DomainError::NotFound)?;
        data.drivers.remove(index);
        self.repo.save(&data)
    }

    pub fn add_vendor(&self, name: String, phone: String, address: String) -> Result<Vendor, DomainError> {
        if name.trim().is_empty() {
            return Err(DomainError::InvalidInput(
                "vendor name is required".to_string(),
            ));
        }

        let mut data = self.repo.load()?;
        let vendor = Vendor {
            id: Uuid::new_v4(),
            name,
            phone,
            address,
        };
        data.vendors.push(vendor.clone());
        self.repo.save(&data)?;
        Ok(vendor)
    }

    pub fn list_vendors(&self) -> Result<Vec<Vendor>, DomainError> {
        Ok(self.repo.load()?.vendors)
    }

    pub fn add_partner(
        &self,
        name: String,
        phone: String,
        split_percentage: BigDecimal,
    ) -> Result<Partner, DomainError> {
        if name.trim().is_empty() {
            return Err(DomainError::InvalidInput(
                "partner name is required".to_string(),
            ));
        }
        validate_percentage(&split_percentage)?;

        let mut data = self.repo.load()?;
        let partner = Partner {
            id: Uuid::new_v4(),
            name,
            phone,
            split_percentage,
        };
        data.partners.push(partner.clone());
        self.repo.save(&data)?;
        Ok(partner)
    }

    pub fn list_partners(&self) -> Result<Vec<Partner>, DomainError> {
        Ok(self.repo.load()?.partners)
    }

    pub fn add_high_season(&self, draft: HighSeasonDraft) -> Result<HighSeason, DomainError> {
        if draft.end_date <= draft.start_date {
            return Err(DomainError::InvalidInput(
                "high season must end after it starts".to_string(),
            ));
        }

        let mut data = self.repo.load()?;
        let season = HighSeason {
            id: Uuid::new_v4(),
            name: draft.name,
            start_date: draft.start_date,
            end_date: draft.end_date,
            price_increase: draft.price_increase,
        };
        data.high_seasons.push(season.clone());
        self.repo.save(&data)?;
        Ok(season)
    }

    pub fn list_high_seasons(&self) -> Result<Vec<HighSeason>, DomainError> {
        Ok(self.repo.load()?.high_seasons)
    }

    pub fn delete_high_season(&self, id: Uuid) -> Result<(), DomainError> {
        let mut data = self.repo.load()?;
        let index = data
            .high_seasons
            .iter()
            .position(|s| s.id == id)
            .ok_or(DomainError::NotFound)?;
        data.high_seasons.remove(index);
        self.repo.save(&data)
    }

    pub fn settings(&self) -> Result<AppSettings, DomainError> {
        Ok(self.repo.load()?.settings)
    }

    pub fn update_settings(&self, settings: AppSettings) -> Result<AppSettings, DomainError> {
        if let OvertimePolicy::Percentage(pct) = &settings.overtime {
            validate_percentage(pct)?;
        }

        let mut data = self.repo.load()?;
        data.settings = settings.clone();
        self.repo.save(&data)?;
        log::info!("settings updated");
        Ok(settings)
    }
}

fn validate_percentage(value: &BigDecimal) -> Result<(), DomainError> {
    if *value < BigDecimal::zero() || *value > BigDecimal::from(100) {
        return Err(DomainError::InvalidInput(
            "percentage must be between 0 and 100".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::store::JsonStore;
    use chrono::TimeZone;
    use std::sync::Arc;

    fn service() -> FleetService<Arc<JsonStore>> {
        FleetService::new(Arc::new(JsonStore::in_memory()))
    }

    fn car_draft() -> CarDraft {
        CarDraft {
            name: "Avanza".to_string(),
            brand: Some("Toyota".to_string()),
            plate: "B 1234 XY".to_string(),
            category: "MPV".to_string(),
            pricing: HashMap::new(),
            price_12h: None,
            price_24h: Some(BigDecimal::from(350_000)),
            investor_setoran: BigDecimal::zero(),
            driver_salary: BigDecimal::from(150_000),
            partner_id: None,
            status: CarStatus::Available,
        }
    }

    #[test]
    fn added_car_is_listed() {
        let svc = service();
        let car = svc.add_car(car_draft()).expect("add failed");

        let cars = svc.list_cars().expect("list failed");
        assert_eq!(cars.len(), 1);
        assert_eq!(cars[0].id, car.id);
    }

    #[test]
    fn car_requires_name_and_plate() {
        let svc = service();
        let mut draft = car_draft();
        draft.plate = " ".to_string();
        assert!(matches!(
            svc.add_car(draft),
            Err(DomainError::InvalidInput(_))
        ));
    }

    #[test]
    fn high_season_must_end_after_start() {
        let svc = service();
        let start = Utc.with_ymd_and_hms(2024, 12, 20, 0, 0, 0).unwrap();
        let draft = HighSeasonDraft {
            name: "Year end".to_string(),
            start_date: start,
            end_date: start,
            price_increase: BigDecimal::from(50_000),
        };
        assert!(matches!(
            svc.add_high_season(draft),
            Err(DomainError::InvalidInput(_))
        ));
    }

    #[test]
    fn settings_percentage_is_bounded() {
        let svc = service();
        let mut settings = AppSettings::default();
        settings.overtime = OvertimePolicy::Percentage(BigDecimal::from(150));
        assert!(matches!(
            svc.update_settings(settings),
            Err(DomainError::InvalidInput(_))
        ));
    }

    #[test]
    fn settings_roundtrip() {
        let svc = service();
        let mut settings = AppSettings::default();
        settings.company_name = "Arka Rent".to_string();
        settings.overtime = OvertimePolicy::Nominal(BigDecimal::from(35_000));
        svc.update_settings(settings.clone()).expect("update failed");

        let loaded = svc.settings().expect("settings failed");
        assert_eq!(loaded.company_name, "Arka Rent");
        assert_eq!(loaded.overtime, settings.overtime);
    }
}
