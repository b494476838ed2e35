use bigdecimal::{BigDecimal, Zero};
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::domain::booking::{
    Booking, BookingStatus, Destination, PaymentStatus, RentToRent, SecurityDeposit,
    VehicleChecklist,
};
use crate::domain::customer::CustomerStatus;
use crate::domain::dataset::Dataset;
use crate::domain::errors::DomainError;
use crate::domain::fleet::Car;
use crate::domain::ledger::{Transaction, TransactionKind, TransactionStatus};
use crate::domain::ports::RentalRepository;
use crate::pricing::{self, PriceBreakdown, PricingInput};

pub const CATEGORY_RENTAL_PAYMENT: &str = "Rental Payment";
pub const CATEGORY_VENDOR_RENTAL: &str = "Vendor Rental";
pub const CATEGORY_INVESTOR_SHARE: &str = "Investor Share";
pub const CATEGORY_DRIVER_SALARY: &str = "Driver Salary";

/// Everything the operator supplies when creating or editing a booking.
/// Prices are derived, never taken from the caller.
#[derive(Debug, Clone)]
pub struct BookingDraft {
    pub car_id: Option<Uuid>,
    pub rent_to_rent: Option<RentToRent>,
    pub with_driver: bool,
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
    /// Operator override of the per-day rate. Defaults to the car's package
    /// price on create, and to the stored rate on edit.
    pub unit_daily_rate: Option<BigDecimal>,
    pub delivery_fee: BigDecimal,
    /// Manual overtime override; derived from the actual return otherwise.
    pub overtime_fee: Option<BigDecimal>,
    pub extra_cost: BigDecimal,
    pub extra_cost_description: Option<String>,
    pub discount: BigDecimal,
    pub amount_paid: BigDecimal,
    pub requested_status: BookingStatus,
    pub notes: String,
    pub customer_note: Option<String>,
    pub driver_note: Option<String>,
}

/// Inputs for a price preview. Mirrors the booking form: any change to a
/// date, car, driver or fee re-runs the whole derivation.
#[derive(Debug, Clone)]
pub struct QuoteRequest {
    pub car_id: Option<Uuid>,
    pub with_driver: bool,
    pub driver_id: Option<Uuid>,
    pub package_type: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub actual_return_date: Option<DateTime<Utc>>,
    pub unit_daily_rate: Option<BigDecimal>,
    pub delivery_fee: BigDecimal,
    pub overtime_fee: Option<BigDecimal>,
    pub extra_cost: BigDecimal,
    pub discount: BigDecimal,
    pub exclude_booking_id: Option<Uuid>,
}

#[derive(Debug, Clone)]
pub struct ConflictInfo {
    pub booking_id: Uuid,
    pub customer_name: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

impl ConflictInfo {
    fn of(booking: &Booking) -> Self {
        ConflictInfo {
            booking_id: booking.id,
            customer_name: booking.customer_name.clone(),
            start_date: booking.start_date,
            end_date: booking.end_date,
        }
    }
}

/// Price preview plus any availability clashes. Conflicts don't fail a
/// quote; they block only an actual save.
#[derive(Debug, Clone)]
pub struct Quote {
    pub breakdown: PriceBreakdown,
    pub car_conflict: Option<ConflictInfo>,
    pub driver_conflict: Option<ConflictInfo>,
}

#[derive(Debug, Clone, Default)]
pub struct BookingFilter {
    pub status: Option<BookingStatus>,
    pub search: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

pub struct BookingService<R> {
    repo: R,
}

impl<R: RentalRepository> BookingService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Price preview for the current form state, without committing anything.
    pub fn quote(&self, req: &QuoteRequest) -> Result<Quote, DomainError> {
        if req.end_date <= req.start_date {
            return Err(DomainError::InvalidInput(
                "return time must be after pickup time".to_string(),
            ));
        }

        let data = self.repo.load()?;
        let car = req
            .car_id
            .map(|id| data.car(id).ok_or(DomainError::NotFound))
            .transpose()?;

        let unit_rate = req
            .unit_daily_rate
            .clone()
            .or_else(|| car.map(|c| pricing::unit_daily_rate(c, &req.package_type)))
            .unwrap_or_else(BigDecimal::zero);

        let car_conflict = req.car_id.and_then(|car_id| {
            pricing::find_car_conflict(
                &data.bookings,
                car_id,
                req.start_date,
                req.end_date,
                req.exclude_booking_id,
            )
            .map(ConflictInfo::of)
        });
        let driver_conflict = req.driver_id.filter(|_| req.with_driver).and_then(|driver_id| {
            pricing::find_driver_conflict(
                &data.bookings,
                driver_id,
                req.start_date,
                req.end_date,
                req.exclude_booking_id,
            )
            .map(ConflictInfo::of)
        });

        let overtime = derived_overtime(
            &data,
            &req.overtime_fee,
            req.end_date,
            req.actual_return_date,
            &unit_rate,
        );
        let breakdown = pricing::compute_price(&PricingInput {
            start: req.start_date,
            end: req.end_date,
            unit_daily_rate: unit_rate,
            driver_salary: driver_salary(req.with_driver, car),
            high_seasons: &data.high_seasons,
            delivery_fee: req.delivery_fee.clone(),
            overtime_fee: overtime,
            extra_cost: req.extra_cost.clone(),
            discount: req.discount.clone(),
        });

        Ok(Quote {
            breakdown,
            car_conflict,
            driver_conflict,
        })
    }

    pub fn create(&self, draft: BookingDraft) -> Result<Booking, DomainError> {
        self.save(draft, None, false)
    }

    pub fn update(&self, id: Uuid, draft: BookingDraft) -> Result<Booking, DomainError> {
        self.save(draft, Some(id), false)
    }

    /// Public rental request: lands as PENDING_APPROVAL and never touches
    /// the ledger until an operator takes over.
    pub fn submit_request(&self, draft: BookingDraft) -> Result<Booking, DomainError> {
        self.save(draft, None, true)
    }

    fn save(
        &self,
        draft: BookingDraft,
        editing: Option<Uuid>,
        submission: bool,
    ) -> Result<Booking, DomainError> {
        let mut data = self.repo.load()?;

        if let Some(rtr) = &draft.rent_to_rent {
            if rtr.external_car_name.trim().is_empty() {
                return Err(DomainError::InvalidInput(
                    "external car name is required for rent-to-rent bookings".to_string(),
                ));
            }
        } else if draft.car_id.is_none() {
            return Err(DomainError::InvalidInput(
                "a car must be selected".to_string(),
            ));
        }
        if draft.end_date <= draft.start_date {
            return Err(DomainError::InvalidInput(
                "return time must be after pickup time".to_string(),
            ));
        }

        let existing = match editing {
            Some(id) => Some(data.booking(id).ok_or(DomainError::NotFound)?.clone()),
            None => None,
        };

        // Rent-to-rent uses an external vehicle, so only owned cars are
        // availability-checked.
        let car_id = if draft.rent_to_rent.is_some() {
            None
        } else {
            draft.car_id
        };
        let car = car_id
            .map(|id| data.car(id).ok_or(DomainError::NotFound))
            .transpose()?;

        if let Some(car_id) = car_id {
            if let Some(clash) = pricing::find_car_conflict(
                &data.bookings,
                car_id,
                draft.start_date,
                draft.end_date,
                editing,
            ) {
                return Err(DomainError::CarUnavailable {
                    booking_id: clash.id,
                    customer_name: clash.customer_name.clone(),
                });
            }
        }
        if let Some(driver_id) = draft.driver_id.filter(|_| draft.with_driver) {
            if let Some(clash) = pricing::find_driver_conflict(
                &data.bookings,
                driver_id,
                draft.start_date,
                draft.end_date,
                editing,
            ) {
                return Err(DomainError::DriverUnavailable {
                    booking_id: clash.id,
                    customer_name: clash.customer_name.clone(),
                });
            }
        }

        let unit_rate = draft
            .unit_daily_rate
            .clone()
            .or_else(|| {
                existing.as_ref().map(|b| {
                    let days = pricing::rental_days(b.start_date, b.end_date);
                    &b.base_price / BigDecimal::from(days)
                })
            })
            .or_else(|| car.map(|c| pricing::unit_daily_rate(c, &draft.package_type)))
            .unwrap_or_else(BigDecimal::zero);

        let overtime = derived_overtime(
            &data,
            &draft.overtime_fee,
            draft.end_date,
            draft.actual_return_date,
            &unit_rate,
        );
        let breakdown = pricing::compute_price(&PricingInput {
            start: draft.start_date,
            end: draft.end_date,
            unit_daily_rate: unit_rate,
            driver_salary: driver_salary(draft.with_driver, car),
            high_seasons: &data.high_seasons,
            delivery_fee: draft.delivery_fee.clone(),
            overtime_fee: overtime,
            extra_cost: draft.extra_cost.clone(),
            discount: draft.discount.clone(),
        });

        let status = if submission {
            BookingStatus::PendingApproval
        } else {
            pricing::resolve_status(draft.actual_return_date, draft.requested_status)
        };
        let payment_status =
            pricing::resolve_payment_status(&draft.amount_paid, &breakdown.total_price);

        let booking = Booking {
            id: existing.as_ref().map(|b| b.id).unwrap_or_else(Uuid::new_v4),
            car_id: draft.car_id.filter(|_| draft.rent_to_rent.is_none()),
            rent_to_rent: draft.rent_to_rent,
            driver_id: if draft.with_driver {
                draft.driver_id
            } else {
                None
            },
            customer_id: draft.customer_id,
            customer_name: draft.customer_name,
            customer_phone: draft.customer_phone,
            start_date: draft.start_date,
            end_date: draft.end_date,
            actual_return_date: draft.actual_return_date,
            package_type: draft.package_type,
            destination: draft.destination,
            security_deposit: draft.security_deposit,
            base_price: breakdown.base_price.clone(),
            driver_fee: breakdown.driver_fee.clone(),
            high_season_fee: breakdown.high_season_fee.clone(),
            delivery_fee: breakdown.delivery_fee.clone(),
            overtime_fee: breakdown.overtime_fee.clone(),
            extra_cost: breakdown.extra_cost.clone(),
            extra_cost_description: draft.extra_cost_description,
            discount: breakdown.discount.clone(),
            total_price: breakdown.total_price.clone(),
            amount_paid: draft.amount_paid,
            status,
            payment_status,
            notes: draft.notes,
            customer_note: draft.customer_note,
            driver_note: draft.driver_note,
            checklist: existing.as_ref().and_then(|b| b.checklist.clone()),
            created_at: existing
                .as_ref()
                .map(|b| b.created_at)
                .unwrap_or_else(Utc::now),
        };

        if !submission {
            record_ledger_entries(&mut data, &booking, existing.as_ref(), breakdown.duration_days);
        }

        match data.bookings.iter().position(|b| b.id == booking.id) {
            Some(index) => data.bookings[index] = booking.clone(),
            // Newest first, matching the list view's expectations.
            None => data.bookings.insert(0, booking.clone()),
        }
        self.repo.save(&data)?;

        log::info!(
            "booking {} saved for {} ({} -> {}, total {})",
            booking.id,
            booking.customer_name,
            booking.start_date,
            booking.end_date,
            booking.total_price
        );
        Ok(booking)
    }

    /// Promote a pending submission to a confirmed booking; a linked Pending
    /// customer is approved in the same commit.
    pub fn approve(&self, id: Uuid) -> Result<Booking, DomainError> {
        let mut data = self.repo.load()?;

        let (approved, customer_id) = {
            let booking = data.booking_mut(id).ok_or(DomainError::NotFound)?;
            if booking.status != BookingStatus::PendingApproval {
                return Err(DomainError::InvalidInput(
                    "only pending submissions can be approved".to_string(),
                ));
            }
            booking.status = BookingStatus::Booked;
            (booking.clone(), booking.customer_id)
        };

        if let Some(customer_id) = customer_id {
            if let Some(customer) = data.customer_mut(customer_id) {
                if customer.status == CustomerStatus::Pending {
                    customer.status = CustomerStatus::Approved;
                }
            }
        }

        self.repo.save(&data)?;
        log::info!("booking {} approved", id);
        Ok(approved)
    }

    /// Record the handover checklist; the booking goes ACTIVE with it.
    pub fn complete_checklist(
        &self,
        id: Uuid,
        checklist: VehicleChecklist,
    ) -> Result<Booking, DomainError> {
        let mut data = self.repo.load()?;

        let updated = {
            let booking = data.booking_mut(id).ok_or(DomainError::NotFound)?;
            if matches!(
                booking.status,
                BookingStatus::Completed | BookingStatus::Cancelled
            ) {
                return Err(DomainError::InvalidInput(
                    "cannot hand over a completed or cancelled booking".to_string(),
                ));
            }
            booking.checklist = Some(checklist);
            booking.status = BookingStatus::Active;
            booking.clone()
        };

        self.repo.save(&data)?;
        Ok(updated)
    }

    pub fn get(&self, id: Uuid) -> Result<Booking, DomainError> {
        let data = self.repo.load()?;
        data.booking(id).cloned().ok_or(DomainError::NotFound)
    }

    pub fn list(&self, filter: &BookingFilter) -> Result<Vec<Booking>, DomainError> {
        let data = self.repo.load()?;
        let search = filter.search.as_ref().map(|s| s.to_lowercase());

        let mut matches: Vec<Booking> = data
            .bookings
            .iter()
            .filter(|b| {
                if let Some(status) = filter.status {
                    if b.status != status {
                        return false;
                    }
                }
                let start_day = b.start_date.date_naive();
                if let Some(from) = filter.from {
                    if start_day < from {
                        return false;
                    }
                }
                if let Some(to) = filter.to {
                    if start_day > to {
                        return false;
                    }
                }
                if let Some(needle) = &search {
                    let car_name = match &b.rent_to_rent {
                        Some(rtr) => Some(rtr.external_car_name.clone()),
                        None => b
                            .car_id
                            .and_then(|id| data.car(id))
                            .map(|c| c.name.clone()),
                    };
                    let in_customer = b.customer_name.to_lowercase().contains(needle);
                    let in_car = car_name
                        .map(|n| n.to_lowercase().contains(needle))
                        .unwrap_or(false);
                    if !in_customer && !in_car {
                        return false;
                    }
                }
                true
            })
            .cloned()
            .collect();

        matches.sort_by(|a, b| b.start_date.cmp(&a.start_date));
        Ok(matches)
    }

    pub fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        let mut data = self.repo.load()?;
        let index = data
            .bookings
            .iter()
            .position(|b| b.id == id)
            .ok_or(DomainError::NotFound)?;
        data.bookings.remove(index);
        self.repo.save(&data)?;
        log::info!("booking {} deleted", id);
        Ok(())
    }

    /// Cash-flow entries, newest first as stored.
    pub fn transactions(&self) -> Result<Vec<Transaction>, DomainError> {
        Ok(self.repo.load()?.transactions)
    }
}

fn driver_salary(with_driver: bool, car: Option<&Car>) -> Option<BigDecimal> {
    if with_driver {
        Some(
            car.map(|c| c.driver_salary.clone())
                .unwrap_or_else(BigDecimal::zero),
        )
    } else {
        None
    }
}

fn derived_overtime(
    data: &Dataset,
    manual: &Option<BigDecimal>,
    scheduled_end: DateTime<Utc>,
    actual_return: Option<DateTime<Utc>>,
    unit_rate: &BigDecimal,
) -> BigDecimal {
    if let Some(fee) = manual {
        return fee.clone();
    }
    match actual_return {
        Some(actual) => pricing::overtime_fee(
            &data.settings.overtime,
            unit_rate,
            pricing::overdue_hours(scheduled_end, actual),
        ),
        None => BigDecimal::zero(),
    }
}

/// Ledger side effects of a booking save: an income entry for any new
/// payment, and the payout expenses once the booking is completed and fully
/// paid. Each payout is recorded at most once per booking.
fn record_ledger_entries(
    data: &mut Dataset,
    booking: &Booking,
    previous: Option<&Booking>,
    booking_days: i64,
) {
    let old_paid = previous
        .map(|b| b.amount_paid.clone())
        .unwrap_or_else(BigDecimal::zero);

    if booking.amount_paid > old_paid {
        let unit_name = rented_unit_name(data, booking);
        push_entry(
            data,
            Transaction {
                id: Uuid::new_v4(),
                date: Utc::now(),
                amount: &booking.amount_paid - &old_paid,
                kind: TransactionKind::Income,
                category: CATEGORY_RENTAL_PAYMENT.to_string(),
                description: format!("Payment {} - {}", booking.customer_name, unit_name),
                booking_id: Some(booking.id),
                related_id: booking.customer_id,
                status: TransactionStatus::Paid,
            },
        );
    }

    if booking.status != BookingStatus::Completed || booking.payment_status != PaymentStatus::Paid {
        return;
    }

    if let Some(rtr) = &booking.rent_to_rent {
        if let Some(vendor_id) = rtr.vendor_id {
            if rtr.vendor_fee > BigDecimal::zero()
                && !has_entry(data, booking.id, CATEGORY_VENDOR_RENTAL)
            {
                push_entry(
                    data,
                    Transaction {
                        id: Uuid::new_v4(),
                        date: Utc::now(),
                        amount: rtr.vendor_fee.clone(),
                        kind: TransactionKind::Expense,
                        category: CATEGORY_VENDOR_RENTAL.to_string(),
                        description: format!("Vendor fee for booking #{}", short_id(booking.id)),
                        booking_id: Some(booking.id),
                        related_id: Some(vendor_id),
                        status: TransactionStatus::Pending,
                    },
                );
            }
        }
    } else if let Some(car) = booking.car_id.and_then(|id| data.car(id)).cloned() {
        if let Some(partner_id) = car.partner_id {
            if car.investor_setoran > BigDecimal::zero()
                && !has_entry(data, booking.id, CATEGORY_INVESTOR_SHARE)
            {
                push_entry(
                    data,
                    Transaction {
                        id: Uuid::new_v4(),
                        date: Utc::now(),
                        amount: &car.investor_setoran * BigDecimal::from(booking_days),
                        kind: TransactionKind::Expense,
                        category: CATEGORY_INVESTOR_SHARE.to_string(),
                        description: format!(
                            "Investor share #{} - {}",
                            short_id(booking.id),
                            car.name
                        ),
                        booking_id: Some(booking.id),
                        related_id: Some(partner_id),
                        status: TransactionStatus::Pending,
                    },
                );
            }
        }
    }

    if let Some(driver_id) = booking.driver_id {
        if booking.driver_fee > BigDecimal::zero()
            && !has_entry(data, booking.id, CATEGORY_DRIVER_SALARY)
        {
            push_entry(
                data,
                Transaction {
                    id: Uuid::new_v4(),
                    date: Utc::now(),
                    amount: booking.driver_fee.clone(),
                    kind: TransactionKind::Expense,
                    category: CATEGORY_DRIVER_SALARY.to_string(),
                    description: format!("Trip salary #{}", short_id(booking.id)),
                    booking_id: Some(booking.id),
                    related_id: Some(driver_id),
                    status: TransactionStatus::Pending,
                },
            );
        }
    }
}

fn rented_unit_name(data: &Dataset, booking: &Booking) -> String {
    match &booking.rent_to_rent {
        Some(rtr) => rtr.external_car_name.clone(),
        None => booking
            .car_id
            .and_then(|id| data.car(id))
            .map(|c| c.name.clone())
            .unwrap_or_else(|| "unknown unit".to_string()),
    }
}

fn has_entry(data: &Dataset, booking_id: Uuid, category: &str) -> bool {
    data.transactions
        .iter()
        .any(|t| t.booking_id == Some(booking_id) && t.category == category)
}

fn push_entry(data: &mut Dataset, entry: Transaction) {
    data.transactions.insert(0, entry);
}

fn short_id(id: Uuid) -> String {
    id.to_string()[..8].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::booking::SecurityDepositKind;
    use crate::domain::customer::{Customer, CustomerStatus};
    use crate::domain::fleet::{Car, CarStatus, Driver, DriverStatus, Partner};
    use crate::infrastructure::store::JsonStore;
    use chrono::TimeZone;
    use std::sync::Arc;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, day, hour, 0, 0).unwrap()
    }

    struct Fixture {
        svc: BookingService<Arc<JsonStore>>,
        store: Arc<JsonStore>,
        car_id: Uuid,
        other_car_id: Uuid,
        driver_id: Uuid,
        partner_id: Uuid,
        customer_id: Uuid,
    }

    fn fixture() -> Fixture {
        let mut data = Dataset::default();

        let partner = Partner {
            id: Uuid::new_v4(),
            name: "Pak Haji".to_string(),
            phone: "0812".to_string(),
            split_percentage: BigDecimal::from(30),
        };
        let mut car = Car {
            id: Uuid::new_v4(),
            name: "Avanza".to_string(),
            brand: Some("Toyota".to_string()),
            plate: "B 1234 XY".to_string(),
            category: "MPV".to_string(),
            pricing: Default::default(),
            price_12h: None,
            price_24h: Some(BigDecimal::from(300_000)),
            investor_setoran: BigDecimal::from(100_000),
            driver_salary: BigDecimal::from(150_000),
            partner_id: Some(partner.id),
            status: CarStatus::Available,
        };
        car.pricing
            .insert("24 Hour".to_string(), BigDecimal::from(300_000));
        let other_car = Car {
            id: Uuid::new_v4(),
            name: "Brio".to_string(),
            partner_id: None,
            investor_setoran: BigDecimal::zero(),
            plate: "B 5678 ZZ".to_string(),
            ..car.clone()
        };
        let driver = Driver {
            id: Uuid::new_v4(),
            name: "Pak Dedi".to_string(),
            phone: "0813".to_string(),
            daily_rate: BigDecimal::from(150_000),
            status: DriverStatus::Active,
        };
        let customer = Customer {
            id: Uuid::new_v4(),
            name: "Rina".to_string(),
            phone: "0812".to_string(),
            address: "Jl. Melati 1".to_string(),
            nik: None,
            id_card_image: Some("ktp.jpg".to_string()),
            status: CustomerStatus::Pending,
            created_at: at(1, 0),
        };

        let car_id = car.id;
        let other_car_id = other_car.id;
        let driver_id = driver.id;
        let partner_id = partner.id;
        let customer_id = customer.id;

        data.cars.push(car);
        data.cars.push(other_car);
        data.drivers.push(driver);
        data.partners.push(partner);
        data.customers.push(customer);

        let store = Arc::new(JsonStore::in_memory_with(data));
        Fixture {
            svc: BookingService::new(store.clone()),
            store,
            car_id,
            other_car_id,
            driver_id,
            partner_id,
            customer_id,
        }
    }

    fn deposit() -> SecurityDeposit {
        SecurityDeposit {
            kind: SecurityDepositKind::Item,
            value: BigDecimal::zero(),
            description: "Motorbike key".to_string(),
            image: None,
        }
    }

    fn draft(car_id: Uuid, start: DateTime<Utc>, end: DateTime<Utc>) -> BookingDraft {
        BookingDraft {
            car_id: Some(car_id),
            rent_to_rent: None,
            with_driver: false,
            driver_id: None,
            customer_id: None,
            customer_name: "Rina".to_string(),
            customer_phone: "0812".to_string(),
            start_date: start,
            end_date: end,
            actual_return_date: None,
            package_type: "24 Hour".to_string(),
            destination: Destination::InTown,
            security_deposit: deposit(),
            unit_daily_rate: None,
            delivery_fee: BigDecimal::zero(),
            overtime_fee: None,
            extra_cost: BigDecimal::zero(),
            extra_cost_description: None,
            discount: BigDecimal::zero(),
            amount_paid: BigDecimal::zero(),
            requested_status: BookingStatus::Booked,
            notes: String::new(),
            customer_note: None,
            driver_note: None,
        }
    }

    #[test]
    fn create_prices_and_persists_the_booking() {
        let f = fixture();
        let mut d = draft(f.car_id, at(1, 8), at(4, 8));
        d.delivery_fee = BigDecimal::from(50_000);
        d.discount = BigDecimal::from(100_000);

        let booking = f.svc.create(d).expect("create failed");
        assert_eq!(booking.base_price, BigDecimal::from(900_000));
        assert_eq!(booking.total_price, BigDecimal::from(850_000));
        assert_eq!(booking.status, BookingStatus::Booked);
        assert_eq!(booking.payment_status, PaymentStatus::Unpaid);

        let stored = f.svc.get(booking.id).expect("get failed");
        assert_eq!(stored.total_price, BigDecimal::from(850_000));
    }

    #[test]
    fn overlapping_booking_is_rejected_with_the_other_customer() {
        let f = fixture();
        f.svc
            .create(draft(f.car_id, at(1, 8), at(3, 8)))
            .expect("first create failed");

        let err = f
            .svc
            .create(draft(f.car_id, at(2, 8), at(4, 8)))
            .expect_err("second create should clash");
        match err {
            DomainError::CarUnavailable { customer_name, .. } => {
                assert_eq!(customer_name, "Rina")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn editing_a_booking_does_not_conflict_with_itself() {
        let f = fixture();
        let booking = f
            .svc
            .create(draft(f.car_id, at(1, 8), at(3, 8)))
            .expect("create failed");

        let updated = f
            .svc
            .update(booking.id, draft(f.car_id, at(1, 8), at(4, 8)))
            .expect("update should not clash with itself");
        assert_eq!(updated.id, booking.id);
    }

    #[test]
    fn return_before_pickup_is_rejected() {
        let f = fixture();
        let err = f
            .svc
            .create(draft(f.car_id, at(3, 8), at(3, 8)))
            .expect_err("equal times should be rejected");
        assert!(matches!(err, DomainError::InvalidInput(_)));
    }

    #[test]
    fn booking_without_car_is_rejected() {
        let f = fixture();
        let mut d = draft(f.car_id, at(1, 8), at(3, 8));
        d.car_id = None;
        assert!(matches!(
            f.svc.create(d),
            Err(DomainError::InvalidInput(_))
        ));
    }

    #[test]
    fn rent_to_rent_requires_external_car_name() {
        let f = fixture();
        let mut d = draft(f.car_id, at(1, 8), at(3, 8));
        d.car_id = None;
        d.rent_to_rent = Some(RentToRent {
            vendor_id: None,
            external_car_name: "  ".to_string(),
            external_car_plate: None,
            vendor_fee: BigDecimal::zero(),
        });
        assert!(matches!(
            f.svc.create(d),
            Err(DomainError::InvalidInput(_))
        ));
    }

    #[test]
    fn driver_cannot_serve_two_overlapping_bookings() {
        let f = fixture();
        let mut first = draft(f.car_id, at(1, 8), at(3, 8));
        first.with_driver = true;
        first.driver_id = Some(f.driver_id);
        f.svc.create(first).expect("first create failed");

        let mut second = draft(f.other_car_id, at(2, 8), at(4, 8));
        second.with_driver = true;
        second.driver_id = Some(f.driver_id);
        let err = f.svc.create(second).expect_err("driver is double-booked");
        assert!(matches!(err, DomainError::DriverUnavailable { .. }));
    }

    #[test]
    fn driver_fee_comes_from_the_car_salary() {
        let f = fixture();
        let mut d = draft(f.car_id, at(1, 8), at(4, 8));
        d.with_driver = true;
        d.driver_id = Some(f.driver_id);

        let booking = f.svc.create(d).expect("create failed");
        assert_eq!(booking.driver_fee, BigDecimal::from(450_000));
    }

    #[test]
    fn payment_adds_one_income_entry_for_the_delta() {
        let f = fixture();
        let mut d = draft(f.car_id, at(1, 8), at(4, 8));
        d.amount_paid = BigDecimal::from(200_000);
        let booking = f.svc.create(d.clone()).expect("create failed");

        let data = f.store.load().expect("load failed");
        let incomes: Vec<_> = data
            .transactions
            .iter()
            .filter(|t| t.category == CATEGORY_RENTAL_PAYMENT)
            .collect();
        assert_eq!(incomes.len(), 1);
        assert_eq!(incomes[0].amount, BigDecimal::from(200_000));
        assert_eq!(incomes[0].kind, TransactionKind::Income);

        // Saving again with a higher amount records only the delta.
        d.amount_paid = BigDecimal::from(500_000);
        f.svc.update(booking.id, d.clone()).expect("update failed");
        let data = f.store.load().expect("load failed");
        let amounts: Vec<_> = data
            .transactions
            .iter()
            .filter(|t| t.category == CATEGORY_RENTAL_PAYMENT)
            .map(|t| t.amount.clone())
            .collect();
        assert_eq!(amounts.len(), 2);
        assert!(amounts.contains(&BigDecimal::from(300_000)));

        // An unchanged amount adds nothing.
        f.svc.update(booking.id, d).expect("update failed");
        let data = f.store.load().expect("load failed");
        assert_eq!(
            data.transactions
                .iter()
                .filter(|t| t.category == CATEGORY_RENTAL_PAYMENT)
                .count(),
            2
        );
    }

    #[test]
    fn completed_paid_booking_generates_payout_entries_once() {
        let f = fixture();
        let mut d = draft(f.car_id, at(1, 8), at(4, 8));
        d.with_driver = true;
        d.driver_id = Some(f.driver_id);
        d.actual_return_date = Some(at(4, 8));
        // 3 days of car (900,000) plus driver (450,000).
        d.amount_paid = BigDecimal::from(1_350_000);

        let booking = f.svc.create(d.clone()).expect("create failed");
        assert_eq!(booking.status, BookingStatus::Completed);
        assert_eq!(booking.payment_status, PaymentStatus::Paid);

        let data = f.store.load().expect("load failed");
        let investor: Vec<_> = data
            .transactions
            .iter()
            .filter(|t| t.category == CATEGORY_INVESTOR_SHARE)
            .collect();
        assert_eq!(investor.len(), 1);
        // 100,000 setoran per day for 3 days, owed to the partner.
        assert_eq!(investor[0].amount, BigDecimal::from(300_000));
        assert_eq!(investor[0].related_id, Some(f.partner_id));

        let salary: Vec<_> = data
            .transactions
            .iter()
            .filter(|t| t.category == CATEGORY_DRIVER_SALARY)
            .collect();
        assert_eq!(salary.len(), 1);
        assert_eq!(salary[0].amount, BigDecimal::from(450_000));

        // A second save must not duplicate the payouts.
        f.svc.update(booking.id, d).expect("update failed");
        let data = f.store.load().expect("load failed");
        assert_eq!(
            data.transactions
                .iter()
                .filter(|t| t.kind == TransactionKind::Expense)
                .count(),
            2
        );
    }

    #[test]
    fn vendor_fee_is_paid_out_for_rent_to_rent() {
        let f = fixture();
        let vendor_id = Uuid::new_v4();
        let mut d = draft(f.car_id, at(1, 8), at(3, 8));
        d.car_id = None;
        d.rent_to_rent = Some(RentToRent {
            vendor_id: Some(vendor_id),
            external_car_name: "Xenia".to_string(),
            external_car_plate: Some("B 9 XX".to_string()),
            vendor_fee: BigDecimal::from(400_000),
        });
        d.unit_daily_rate = Some(BigDecimal::from(350_000));
        d.actual_return_date = Some(at(3, 8));
        d.amount_paid = BigDecimal::from(700_000);

        f.svc.create(d).expect("create failed");

        let data = f.store.load().expect("load failed");
        let vendor: Vec<_> = data
            .transactions
            .iter()
            .filter(|t| t.category == CATEGORY_VENDOR_RENTAL)
            .collect();
        assert_eq!(vendor.len(), 1);
        assert_eq!(vendor[0].amount, BigDecimal::from(400_000));
        assert_eq!(vendor[0].related_id, Some(vendor_id));
        // No investor payout for a vehicle the fleet does not own.
        assert!(!data
            .transactions
            .iter()
            .any(|t| t.category == CATEGORY_INVESTOR_SHARE));
    }

    #[test]
    fn late_return_charges_overtime_and_completes() {
        let f = fixture();
        let mut d = draft(f.car_id, at(1, 8), at(3, 8));
        // Three hours late at the default 10% per hour of a 300,000 rate.
        d.actual_return_date = Some(Utc.with_ymd_and_hms(2024, 5, 3, 11, 0, 0).unwrap());

        let booking = f.svc.create(d).expect("create failed");
        assert_eq!(booking.status, BookingStatus::Completed);
        assert_eq!(booking.overtime_fee, BigDecimal::from(90_000));
        assert_eq!(booking.total_price, BigDecimal::from(690_000));
    }

    #[test]
    fn manual_overtime_override_wins() {
        let f = fixture();
        let mut d = draft(f.car_id, at(1, 8), at(3, 8));
        d.actual_return_date = Some(Utc.with_ymd_and_hms(2024, 5, 3, 11, 0, 0).unwrap());
        d.overtime_fee = Some(BigDecimal::from(50_000));

        let booking = f.svc.create(d).expect("create failed");
        assert_eq!(booking.overtime_fee, BigDecimal::from(50_000));
    }

    #[test]
    fn submitted_request_waits_for_approval() {
        let f = fixture();
        let mut d = draft(f.car_id, at(1, 8), at(3, 8));
        d.customer_id = Some(f.customer_id);

        let booking = f.svc.submit_request(d).expect("submit failed");
        assert_eq!(booking.status, BookingStatus::PendingApproval);
        // Ledger untouched until an operator takes over.
        let data = f.store.load().expect("load failed");
        assert!(data.transactions.is_empty());
    }

    #[test]
    fn approval_books_the_request_and_approves_the_customer() {
        let f = fixture();
        let mut d = draft(f.car_id, at(1, 8), at(3, 8));
        d.customer_id = Some(f.customer_id);
        let booking = f.svc.submit_request(d).expect("submit failed");

        let approved = f.svc.approve(booking.id).expect("approve failed");
        assert_eq!(approved.status, BookingStatus::Booked);

        let data = f.store.load().expect("load failed");
        let customer = data
            .customers
            .iter()
            .find(|c| c.id == f.customer_id)
            .expect("customer missing");
        assert_eq!(customer.status, CustomerStatus::Approved);
    }

    #[test]
    fn only_pending_submissions_can_be_approved() {
        let f = fixture();
        let booking = f
            .svc
            .create(draft(f.car_id, at(1, 8), at(3, 8)))
            .expect("create failed");
        assert!(matches!(
            f.svc.approve(booking.id),
            Err(DomainError::InvalidInput(_))
        ));
    }

    #[test]
    fn checklist_activates_the_booking() {
        let f = fixture();
        let booking = f
            .svc
            .create(draft(f.car_id, at(1, 8), at(3, 8)))
            .expect("create failed");

        let checklist = VehicleChecklist {
            odometer: 45_210,
            fuel_level: "Full".to_string(),
            speedometer_image: None,
            front_image: None,
            back_image: None,
            left_image: None,
            right_image: None,
            notes: Some("small scratch on rear bumper".to_string()),
            checked_at: at(1, 8),
            checked_by: Some("admin".to_string()),
        };
        let updated = f
            .svc
            .complete_checklist(booking.id, checklist)
            .expect("checklist failed");
        assert_eq!(updated.status, BookingStatus::Active);
        assert_eq!(
            updated.checklist.as_ref().map(|c| c.odometer),
            Some(45_210)
        );
    }

    #[test]
    fn edit_preserves_created_at_and_checklist() {
        let f = fixture();
        let booking = f
            .svc
            .create(draft(f.car_id, at(1, 8), at(3, 8)))
            .expect("create failed");
        let checklist = VehicleChecklist {
            odometer: 100,
            fuel_level: "1/2".to_string(),
            speedometer_image: None,
            front_image: None,
            back_image: None,
            left_image: None,
            right_image: None,
            notes: None,
            checked_at: at(1, 8),
            checked_by: None,
        };
        f.svc
            .complete_checklist(booking.id, checklist)
            .expect("checklist failed");

        let updated = f
            .svc
            .update(booking.id, draft(f.car_id, at(1, 8), at(4, 8)))
            .expect("update failed");
        assert_eq!(updated.created_at, booking.created_at);
        assert!(updated.checklist.is_some());
    }

    #[test]
    fn edit_without_rate_rederives_it_from_the_stored_base() {
        let f = fixture();
        let booking = f
            .svc
            .create(draft(f.car_id, at(1, 8), at(4, 8)))
            .expect("create failed");
        assert_eq!(booking.base_price, BigDecimal::from(900_000));

        // Extending a 3-day booking to 4 days keeps the 300,000 daily rate.
        let updated = f
            .svc
            .update(booking.id, draft(f.car_id, at(1, 8), at(5, 8)))
            .expect("update failed");
        assert_eq!(updated.base_price, BigDecimal::from(1_200_000));
    }

    #[test]
    fn quote_previews_price_and_conflicts_without_saving() {
        let f = fixture();
        f.svc
            .create(draft(f.car_id, at(1, 8), at(3, 8)))
            .expect("create failed");

        let quote = f
            .svc
            .quote(&QuoteRequest {
                car_id: Some(f.car_id),
                with_driver: false,
                driver_id: None,
                package_type: "24 Hour".to_string(),
                start_date: at(2, 8),
                end_date: at(4, 8),
                actual_return_date: None,
                unit_daily_rate: None,
                delivery_fee: BigDecimal::zero(),
                overtime_fee: None,
                extra_cost: BigDecimal::zero(),
                discount: BigDecimal::zero(),
                exclude_booking_id: None,
            })
            .expect("quote failed");

        assert_eq!(quote.breakdown.base_price, BigDecimal::from(600_000));
        assert_eq!(
            quote.car_conflict.as_ref().map(|c| c.customer_name.as_str()),
            Some("Rina")
        );

        // Only the original booking is stored.
        let data = f.store.load().expect("load failed");
        assert_eq!(data.bookings.len(), 1);
    }

    #[test]
    fn list_filters_by_status_and_search() {
        let f = fixture();
        f.svc
            .create(draft(f.car_id, at(1, 8), at(3, 8)))
            .expect("create failed");
        let mut cancelled = draft(f.other_car_id, at(5, 8), at(6, 8));
        cancelled.customer_name = "Budi".to_string();
        cancelled.requested_status = BookingStatus::Cancelled;
        f.svc.create(cancelled).expect("create failed");

        let booked = f
            .svc
            .list(&BookingFilter {
                status: Some(BookingStatus::Booked),
                ..Default::default()
            })
            .expect("list failed");
        assert_eq!(booked.len(), 1);
        assert_eq!(booked[0].customer_name, "Rina");

        let by_car = f
            .svc
            .list(&BookingFilter {
                search: Some("brio".to_string()),
                ..Default::default()
            })
            .expect("list failed");
        assert_eq!(by_car.len(), 1);
        assert_eq!(by_car[0].customer_name, "Budi");

        // Newest start date first.
        let all = f.svc.list(&BookingFilter::default()).expect("list failed");
        assert_eq!(all[0].customer_name, "Budi");
    }

    #[test]
    fn delete_removes_the_booking() {
        let f = fixture();
        let booking = f
            .svc
            .create(draft(f.car_id, at(1, 8), at(3, 8)))
            .expect("create failed");

        f.svc.delete(booking.id).expect("delete failed");
        assert!(matches!(f.svc.get(booking.id), Err(DomainError::NotFound)));
        assert!(matches!(
            f.svc.delete(booking.id),
            Err(DomainError::NotFound)
        ));
    }
}
