use actix_web::{web, HttpResponse};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::booking_service::{BookingDraft, BookingFilter, ConflictInfo, QuoteRequest};
use crate::domain::booking::{
    Booking, BookingStatus, Destination, RentToRent, SecurityDeposit, SecurityDepositKind,
    VehicleChecklist,
};
use crate::domain::ledger::Transaction;
use crate::errors::AppError;
use crate::AppState;

use super::{blocking, parse_money_or_zero, parse_opt_money};

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct RentToRentRequest {
    pub vendor_id: Option<Uuid>,
    pub external_car_name: String,
    pub external_car_plate: Option<String>,
    /// Decimal amount as a string to avoid floating-point issues, e.g. "400000"
    pub vendor_fee: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SecurityDepositRequest {
    /// CASH or ITEM
    pub kind: String,
    pub value: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SaveBookingRequest {
    pub car_id: Option<Uuid>,
    pub rent_to_rent: Option<RentToRentRequest>,
    /// Charges the car's daily driver salary and reserves the driver.
    #[serde(default)]
    pub with_driver: bool,
    pub driver_id: Option<Uuid>,
    pub customer_id: Option<Uuid>,
    pub customer_name: String,
    pub customer_phone: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub actual_return_date: Option<DateTime<Utc>>,
    pub package_type: String,
    /// IN_TOWN (default) or OUT_OF_TOWN
    pub destination: Option<String>,
    pub security_deposit: Option<SecurityDepositRequest>,
    /// Per-day rate override; defaults to the car's package price.
    pub unit_daily_rate: Option<String>,
    pub delivery_fee: Option<String>,
    /// Manual overtime override; derived from the actual return otherwise.
    pub overtime_fee: Option<String>,
    pub extra_cost: Option<String>,
    pub extra_cost_description: Option<String>,
    pub discount: Option<String>,
    pub amount_paid: Option<String>,
    /// Requested status; only ACTIVE and CANCELLED are honored, and a
    /// recorded actual return always completes the booking.
    pub status: Option<String>,
    pub notes: Option<String>,
    pub customer_note: Option<String>,
    pub driver_note: Option<String>,
}

impl SaveBookingRequest {
    fn into_draft(self) -> Result<BookingDraft, AppError> {
        let destination = match self.destination.as_deref() {
            Some(s) => Destination::from_str(s).map_err(AppError::BadRequest)?,
            None => Destination::InTown,
        };
        let security_deposit = match self.security_deposit {
            Some(d) => SecurityDeposit {
                kind: SecurityDepositKind::from_str(&d.kind).map_err(AppError::BadRequest)?,
                value: parse_money_or_zero("security deposit value", d.value.as_deref())?,
                description: d.description.unwrap_or_default(),
                image: d.image,
            },
            None => SecurityDeposit {
                kind: SecurityDepositKind::Item,
                value: bigdecimal::BigDecimal::from(0),
                description: String::new(),
                image: None,
            },
        };
        let rent_to_rent = match self.rent_to_rent {
            Some(r) => Some(RentToRent {
                vendor_id: r.vendor_id,
                external_car_name: r.external_car_name,
                external_car_plate: r.external_car_plate,
                vendor_fee: parse_money_or_zero("vendor fee", r.vendor_fee.as_deref())?,
            }),
            None => None,
        };
        let requested_status = match self.status.as_deref() {
            Some(s) => BookingStatus::from_str(s).map_err(AppError::BadRequest)?,
            None => BookingStatus::Booked,
        };

        Ok(BookingDraft {
            car_id: self.car_id,
            rent_to_rent,
            with_driver: self.with_driver,
            driver_id: self.driver_id,
            customer_id: self.customer_id,
            customer_name: self.customer_name,
            customer_phone: self.customer_phone,
            start_date: self.start_date,
            end_date: self.end_date,
            actual_return_date: self.actual_return_date,
            package_type: self.package_type,
            destination,
            security_deposit,
            unit_daily_rate: parse_opt_money("unit daily rate", self.unit_daily_rate.as_deref())?,
            delivery_fee: parse_money_or_zero("delivery fee", self.delivery_fee.as_deref())?,
            overtime_fee: parse_opt_money("overtime fee", self.overtime_fee.as_deref())?,
            extra_cost: parse_money_or_zero("extra cost", self.extra_cost.as_deref())?,
            extra_cost_description: self.extra_cost_description,
            discount: parse_money_or_zero("discount", self.discount.as_deref())?,
            amount_paid: parse_money_or_zero("amount paid", self.amount_paid.as_deref())?,
            requested_status,
            notes: self.notes.unwrap_or_default(),
            customer_note: self.customer_note,
            driver_note: self.driver_note,
        })
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ChecklistRequest {
    pub odometer: i64,
    /// Free-form fuel gauge reading, e.g. "Full" or "3/4".
    pub fuel_level: String,
    pub speedometer_image: Option<String>,
    pub front_image: Option<String>,
    pub back_image: Option<String>,
    pub left_image: Option<String>,
    pub right_image: Option<String>,
    pub notes: Option<String>,
    pub checked_by: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct QuoteBookingRequest {
    pub car_id: Option<Uuid>,
    #[serde(default)]
    pub with_driver: bool,
    pub driver_id: Option<Uuid>,
    pub package_type: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub actual_return_date: Option<DateTime<Utc>>,
    pub unit_daily_rate: Option<String>,
    pub delivery_fee: Option<String>,
    pub overtime_fee: Option<String>,
    pub extra_cost: Option<String>,
    pub discount: Option<String>,
    /// Booking being edited, so it does not conflict with itself.
    pub exclude_booking_id: Option<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RentToRentResponse {
    pub vendor_id: Option<Uuid>,
    pub external_car_name: String,
    pub external_car_plate: Option<String>,
    pub vendor_fee: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SecurityDepositResponse {
    pub kind: String,
    pub value: String,
    pub description: String,
    pub image: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ChecklistResponse {
    pub odometer: i64,
    pub fuel_level: String,
    pub speedometer_image: Option<String>,
    pub front_image: Option<String>,
    pub back_image: Option<String>,
    pub left_image: Option<String>,
    pub right_image: Option<String>,
    pub notes: Option<String>,
    pub checked_at: String,
    pub checked_by: Option<String>,
}

impl From<VehicleChecklist> for ChecklistResponse {
    fn from(c: VehicleChecklist) -> Self {
        ChecklistResponse {
            odometer: c.odometer,
            fuel_level: c.fuel_level,
            speedometer_image: c.speedometer_image,
            front_image: c.front_image,
            back_image: c.back_image,
            left_image: c.left_image,
            right_image: c.right_image,
            notes: c.notes,
            checked_at: c.checked_at.to_rfc3339(),
            checked_by: c.checked_by,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BookingResponse {
    pub id: Uuid,
    pub car_id: Option<Uuid>,
    pub rent_to_rent: Option<RentToRentResponse>,
    pub driver_id: Option<Uuid>,
    pub customer_id: Option<Uuid>,
    pub customer_name: String,
    pub customer_phone: String,
    pub start_date: String,
    pub end_date: String,
    pub actual_return_date: Option<String>,
    pub package_type: String,
    pub destination: String,
    pub security_deposit: SecurityDepositResponse,
    pub base_price: String,
    pub driver_fee: String,
    pub high_season_fee: String,
    pub delivery_fee: String,
    pub overtime_fee: String,
    pub extra_cost: String,
    pub extra_cost_description: Option<String>,
    pub discount: String,
    pub total_price: String,
    pub amount_paid: String,
    pub status: String,
    pub payment_status: String,
    pub notes: String,
    pub customer_note: Option<String>,
    pub driver_note: Option<String>,
    pub checklist: Option<ChecklistResponse>,
    pub created_at: String,
}

impl From<Booking> for BookingResponse {
    fn from(b: Booking) -> Self {
        BookingResponse {
            id: b.id,
            car_id: b.car_id,
            rent_to_rent: b.rent_to_rent.map(|r| RentToRentResponse {
                vendor_id: r.vendor_id,
                external_car_name: r.external_car_name,
                external_car_plate: r.external_car_plate,
                vendor_fee: r.vendor_fee.to_string(),
            }),
            driver_id: b.driver_id,
            customer_id: b.customer_id,
            customer_name: b.customer_name,
            customer_phone: b.customer_phone,
            start_date: b.start_date.to_rfc3339(),
            end_date: b.end_date.to_rfc3339(),
            actual_return_date: b.actual_return_date.map(|d| d.to_rfc3339()),
            package_type: b.package_type,
            destination: b.destination.to_string(),
            security_deposit: SecurityDepositResponse {
                kind: b.security_deposit.kind.to_string(),
                value: b.security_deposit.value.to_string(),
                description: b.security_deposit.description,
                image: b.security_deposit.image,
            },
            base_price: b.base_price.to_string(),
            driver_fee: b.driver_fee.to_string(),
            high_season_fee: b.high_season_fee.to_string(),
            delivery_fee: b.delivery_fee.to_string(),
            overtime_fee: b.overtime_fee.to_string(),
            extra_cost: b.extra_cost.to_string(),
            extra_cost_description: b.extra_cost_description,
            discount: b.discount.to_string(),
            total_price: b.total_price.to_string(),
            amount_paid: b.amount_paid.to_string(),
            status: b.status.to_string(),
            payment_status: b.payment_status.to_string(),
            notes: b.notes,
            customer_note: b.customer_note,
            driver_note: b.driver_note,
            checklist: b.checklist.map(ChecklistResponse::from),
            created_at: b.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ConflictResponse {
    pub booking_id: Uuid,
    pub customer_name: String,
    pub start_date: String,
    pub end_date: String,
}

impl From<ConflictInfo> for ConflictResponse {
    fn from(c: ConflictInfo) -> Self {
        ConflictResponse {
            booking_id: c.booking_id,
            customer_name: c.customer_name,
            start_date: c.start_date.to_rfc3339(),
            end_date: c.end_date.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct QuoteResponse {
    pub duration_days: i64,
    pub base_price: String,
    pub driver_fee: String,
    pub high_season_fee: String,
    pub delivery_fee: String,
    pub overtime_fee: String,
    pub extra_cost: String,
    pub discount: String,
    pub total_price: String,
    pub car_conflict: Option<ConflictResponse>,
    pub driver_conflict: Option<ConflictResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TransactionResponse {
    pub id: Uuid,
    pub date: String,
    pub amount: String,
    pub kind: String,
    pub category: String,
    pub description: String,
    pub booking_id: Option<Uuid>,
    pub related_id: Option<Uuid>,
    pub status: String,
}

impl From<Transaction> for TransactionResponse {
    fn from(t: Transaction) -> Self {
        TransactionResponse {
            id: t.id,
            date: t.date.to_rfc3339(),
            amount: t.amount.to_string(),
            kind: t.kind.to_string(),
            category: t.category,
            description: t.description,
            booking_id: t.booking_id,
            related_id: t.related_id,
            status: t.status.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ListBookingsParams {
    pub status: Option<String>,
    /// Matches the customer name or the rented unit's name.
    pub search: Option<String>,
    /// Earliest start date (inclusive), e.g. 2024-05-01.
    pub from: Option<NaiveDate>,
    /// Latest start date (inclusive).
    pub to: Option<NaiveDate>,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /bookings
///
/// Creates a booking. Prices are derived server-side from the car, dates,
/// driver and fee inputs; an availability clash rejects the request with the
/// conflicting customer's name.
#[utoipa::path(
    post,
    path = "/bookings",
    request_body = SaveBookingRequest,
    responses(
        (status = 201, description = "Booking created", body = BookingResponse),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Car or driver is not available"),
    ),
    tag = "bookings"
)]
pub async fn create_booking(
    state: web::Data<AppState>,
    body: web::Json<SaveBookingRequest>,
) -> Result<HttpResponse, AppError> {
    let draft = body.into_inner().into_draft()?;
    let state = state.into_inner();
    let booking = blocking(move || Ok(state.bookings.create(draft)?)).await?;
    Ok(HttpResponse::Created().json(BookingResponse::from(booking)))
}

/// PUT /bookings/{id}
///
/// Re-runs the same validation and pricing pipeline as creation; the stored
/// creation time and any handover checklist are preserved.
#[utoipa::path(
    put,
    path = "/bookings/{id}",
    params(("id" = Uuid, Path, description = "Booking UUID")),
    request_body = SaveBookingRequest,
    responses(
        (status = 200, description = "Booking updated", body = BookingResponse),
        (status = 404, description = "Booking not found"),
        (status = 409, description = "Car or driver is not available"),
    ),
    tag = "bookings"
)]
pub async fn update_booking(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<SaveBookingRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let draft = body.into_inner().into_draft()?;
    let state = state.into_inner();
    let booking = blocking(move || Ok(state.bookings.update(id, draft)?)).await?;
    Ok(HttpResponse::Ok().json(BookingResponse::from(booking)))
}

/// POST /bookings/submissions
///
/// Public rental request: lands as PENDING_APPROVAL for an operator to
/// approve or reject.
#[utoipa::path(
    post,
    path = "/bookings/submissions",
    request_body = SaveBookingRequest,
    responses(
        (status = 201, description = "Request submitted", body = BookingResponse),
        (status = 409, description = "Car or driver is not available"),
    ),
    tag = "bookings"
)]
pub async fn submit_booking(
    state: web::Data<AppState>,
    body: web::Json<SaveBookingRequest>,
) -> Result<HttpResponse, AppError> {
    let draft = body.into_inner().into_draft()?;
    let state = state.into_inner();
    let booking = blocking(move || Ok(state.bookings.submit_request(draft)?)).await?;
    Ok(HttpResponse::Created().json(BookingResponse::from(booking)))
}

/// POST /bookings/quote
///
/// Price preview for the current form state. Conflicts are reported, not
/// enforced, so the caller can show them live.
#[utoipa::path(
    post,
    path = "/bookings/quote",
    request_body = QuoteBookingRequest,
    responses(
        (status = 200, description = "Derived price breakdown", body = QuoteResponse),
        (status = 400, description = "Invalid input"),
    ),
    tag = "bookings"
)]
pub async fn quote_booking(
    state: web::Data<AppState>,
    body: web::Json<QuoteBookingRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let request = QuoteRequest {
        car_id: body.car_id,
        with_driver: body.with_driver,
        driver_id: body.driver_id,
        package_type: body.package_type.unwrap_or_default(),
        start_date: body.start_date,
        end_date: body.end_date,
        actual_return_date: body.actual_return_date,
        unit_daily_rate: parse_opt_money("unit daily rate", body.unit_daily_rate.as_deref())?,
        delivery_fee: parse_money_or_zero("delivery fee", body.delivery_fee.as_deref())?,
        overtime_fee: parse_opt_money("overtime fee", body.overtime_fee.as_deref())?,
        extra_cost: parse_money_or_zero("extra cost", body.extra_cost.as_deref())?,
        discount: parse_money_or_zero("discount", body.discount.as_deref())?,
        exclude_booking_id: body.exclude_booking_id,
    };

    let state = state.into_inner();
    let quote = blocking(move || Ok(state.bookings.quote(&request)?)).await?;
    Ok(HttpResponse::Ok().json(QuoteResponse {
        duration_days: quote.breakdown.duration_days,
        base_price: quote.breakdown.base_price.to_string(),
        driver_fee: quote.breakdown.driver_fee.to_string(),
        high_season_fee: quote.breakdown.high_season_fee.to_string(),
        delivery_fee: quote.breakdown.delivery_fee.to_string(),
        overtime_fee: quote.breakdown.overtime_fee.to_string(),
        extra_cost: quote.breakdown.extra_cost.to_string(),
        discount: quote.breakdown.discount.to_string(),
        total_price: quote.breakdown.total_price.to_string(),
        car_conflict: quote.car_conflict.map(ConflictResponse::from),
        driver_conflict: quote.driver_conflict.map(ConflictResponse::from),
    }))
}

/// GET /bookings
#[utoipa::path(
    get,
    path = "/bookings",
    params(
        ("status" = Option<String>, Query, description = "Filter by booking status"),
        ("search" = Option<String>, Query, description = "Customer or unit name fragment"),
        ("from" = Option<String>, Query, description = "Earliest start date, e.g. 2024-05-01"),
        ("to" = Option<String>, Query, description = "Latest start date"),
    ),
    responses(
        (status = 200, description = "Bookings, newest start date first", body = [BookingResponse]),
    ),
    tag = "bookings"
)]
pub async fn list_bookings(
    state: web::Data<AppState>,
    query: web::Query<ListBookingsParams>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();
    let status = params
        .status
        .as_deref()
        .map(BookingStatus::from_str)
        .transpose()
        .map_err(AppError::BadRequest)?;
    let filter = BookingFilter {
        status,
        search: params.search,
        from: params.from,
        to: params.to,
    };

    let state = state.into_inner();
    let bookings = blocking(move || Ok(state.bookings.list(&filter)?)).await?;
    let items: Vec<BookingResponse> = bookings.into_iter().map(BookingResponse::from).collect();
    Ok(HttpResponse::Ok().json(items))
}

/// GET /bookings/{id}
#[utoipa::path(
    get,
    path = "/bookings/{id}",
    params(("id" = Uuid, Path, description = "Booking UUID")),
    responses(
        (status = 200, description = "Booking found", body = BookingResponse),
        (status = 404, description = "Booking not found"),
    ),
    tag = "bookings"
)]
pub async fn get_booking(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let state = state.into_inner();
    let booking = blocking(move || Ok(state.bookings.get(id)?)).await?;
    Ok(HttpResponse::Ok().json(BookingResponse::from(booking)))
}

/// DELETE /bookings/{id}
#[utoipa::path(
    delete,
    path = "/bookings/{id}",
    params(("id" = Uuid, Path, description = "Booking UUID")),
    responses(
        (status = 204, description = "Booking deleted"),
        (status = 404, description = "Booking not found"),
    ),
    tag = "bookings"
)]
pub async fn delete_booking(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let state = state.into_inner();
    blocking(move || Ok(state.bookings.delete(id)?)).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// POST /bookings/{id}/approve
///
/// Promotes a pending submission to BOOKED; a linked Pending customer is
/// approved in the same commit.
#[utoipa::path(
    post,
    path = "/bookings/{id}/approve",
    params(("id" = Uuid, Path, description = "Booking UUID")),
    responses(
        (status = 200, description = "Booking approved", body = BookingResponse),
        (status = 400, description = "Booking is not pending approval"),
        (status = 404, description = "Booking not found"),
    ),
    tag = "bookings"
)]
pub async fn approve_booking(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let state = state.into_inner();
    let booking = blocking(move || Ok(state.bookings.approve(id)?)).await?;
    Ok(HttpResponse::Ok().json(BookingResponse::from(booking)))
}

/// POST /bookings/{id}/checklist
///
/// Records the handover checklist and activates the rental.
#[utoipa::path(
    post,
    path = "/bookings/{id}/checklist",
    params(("id" = Uuid, Path, description = "Booking UUID")),
    request_body = ChecklistRequest,
    responses(
        (status = 200, description = "Checklist recorded, booking active", body = BookingResponse),
        (status = 400, description = "Booking already completed or cancelled"),
        (status = 404, description = "Booking not found"),
    ),
    tag = "bookings"
)]
pub async fn submit_checklist(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<ChecklistRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let body = body.into_inner();
    let checklist = VehicleChecklist {
        odometer: body.odometer,
        fuel_level: body.fuel_level,
        speedometer_image: body.speedometer_image,
        front_image: body.front_image,
        back_image: body.back_image,
        left_image: body.left_image,
        right_image: body.right_image,
        notes: body.notes,
        checked_at: Utc::now(),
        checked_by: body.checked_by,
    };

    let state = state.into_inner();
    let booking = blocking(move || Ok(state.bookings.complete_checklist(id, checklist)?)).await?;
    Ok(HttpResponse::Ok().json(BookingResponse::from(booking)))
}

/// GET /transactions
#[utoipa::path(
    get,
    path = "/transactions",
    responses(
        (status = 200, description = "Ledger entries, newest first", body = [TransactionResponse]),
    ),
    tag = "ledger"
)]
pub async fn list_transactions(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let state = state.into_inner();
    let entries = blocking(move || Ok(state.bookings.transactions()?)).await?;
    let items: Vec<TransactionResponse> =
        entries.into_iter().map(TransactionResponse::from).collect();
    Ok(HttpResponse::Ok().json(items))
}
