use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::fleet_service::{CarDraft, DriverDraft, HighSeasonDraft};
use crate::domain::fleet::{Car, CarStatus, Driver, DriverStatus, HighSeason, Partner, Vendor};
use crate::errors::AppError;
use crate::AppState;

use super::{blocking, parse_money, parse_money_or_zero, parse_opt_money};

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct SaveCarRequest {
    pub name: String,
    pub brand: Option<String>,
    pub plate: String,
    pub category: Option<String>,
    /// Daily rate per rental package name, decimal amounts as strings.
    pub pricing: Option<HashMap<String, String>>,
    pub price_12h: Option<String>,
    pub price_24h: Option<String>,
    pub investor_setoran: Option<String>,
    pub driver_salary: Option<String>,
    pub partner_id: Option<Uuid>,
    /// AVAILABLE (default), UNAVAILABLE or MAINTENANCE
    pub status: Option<String>,
}

impl SaveCarRequest {
    fn into_draft(self) -> Result<CarDraft, AppError> {
        let mut pricing = HashMap::new();
        for (package, amount) in self.pricing.unwrap_or_default() {
            let rate = parse_money("package price", &amount)?;
            pricing.insert(package, rate);
        }
        let status = match self.status.as_deref() {
            Some(s) => CarStatus::from_str(s).map_err(AppError::BadRequest)?,
            None => CarStatus::Available,
        };

        Ok(CarDraft {
            name: self.name,
            brand: self.brand,
            plate: self.plate,
            category: self.category.unwrap_or_default(),
            pricing,
            price_12h: parse_opt_money("12-hour price", self.price_12h.as_deref())?,
            price_24h: parse_opt_money("24-hour price", self.price_24h.as_deref())?,
            investor_setoran: parse_money_or_zero(
                "investor setoran",
                self.investor_setoran.as_deref(),
            )?,
            driver_salary: parse_money_or_zero("driver salary", self.driver_salary.as_deref())?,
            partner_id: self.partner_id,
            status,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CarResponse {
    pub id: Uuid,
    pub name: String,
    pub brand: Option<String>,
    pub plate: String,
    pub category: String,
    pub pricing: HashMap<String, String>,
    pub price_12h: Option<String>,
    pub price_24h: Option<String>,
    pub investor_setoran: String,
    pub driver_salary: String,
    pub partner_id: Option<Uuid>,
    pub status: String,
}

impl From<Car> for CarResponse {
    fn from(c: Car) -> Self {
        CarResponse {
            id: c.id,
            name: c.name,
            brand: c.brand,
            plate: c.plate,
            category: c.category,
            pricing: c
                .pricing
                .into_iter()
                .map(|(k, v)| (k, v.to_string()))
                .collect(),
            price_12h: c.price_12h.map(|p| p.to_string()),
            price_24h: c.price_24h.map(|p| p.to_string()),
            investor_setoran: c.investor_setoran.to_string(),
            driver_salary: c.driver_salary.to_string(),
            partner_id: c.partner_id,
            status: c.status.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SaveDriverRequest {
    pub name: String,
    pub phone: String,
    pub daily_rate: Option<String>,
    /// ACTIVE (default) or INACTIVE
    pub status: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DriverResponse {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub daily_rate: String,
    pub status: String,
}

impl From<Driver> for DriverResponse {
    fn from(d: Driver) -> Self {
        DriverResponse {
            id: d.id,
            name: d.name,
            phone: d.phone,
            daily_rate: d.daily_rate.to_string(),
            status: d.status.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SaveVendorRequest {
    pub name: String,
    pub phone: String,
    pub address: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VendorResponse {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub address: String,
}

impl From<Vendor> for VendorResponse {
    fn from(v: Vendor) -> Self {
        VendorResponse {
            id: v.id,
            name: v.name,
            phone: v.phone,
            address: v.address,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SavePartnerRequest {
    pub name: String,
    pub phone: String,
    /// Revenue share percentage, 0-100.
    pub split_percentage: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PartnerResponse {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub split_percentage: String,
}

impl From<Partner> for PartnerResponse {
    fn from(p: Partner) -> Self {
        PartnerResponse {
            id: p.id,
            name: p.name,
            phone: p.phone,
            split_percentage: p.split_percentage.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SaveHighSeasonRequest {
    pub name: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    /// Additive per-day surcharge as a decimal string.
    pub price_increase: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HighSeasonResponse {
    pub id: Uuid,
    pub name: String,
    pub start_date: String,
    pub end_date: String,
    pub price_increase: String,
}

impl From<HighSeason> for HighSeasonResponse {
    fn from(s: HighSeason) -> Self {
        HighSeasonResponse {
            id: s.id,
            name: s.name,
            start_date: s.start_date.to_rfc3339(),
            end_date: s.end_date.to_rfc3339(),
            price_increase: s.price_increase.to_string(),
        }
    }
}

// ── Car handlers ─────────────────────────────────────────────────────────────

/// POST /cars
#[utoipa::path(
    post,
    path = "/cars",
    request_body = SaveCarRequest,
    responses(
        (status = 201, description = "Car added", body = CarResponse),
        (status = 400, description = "Invalid input"),
    ),
    tag = "fleet"
)]
pub async fn create_car(
    state: web::Data<AppState>,
    body: web::Json<SaveCarRequest>,
) -> Result<HttpResponse, AppError> {
    let draft = body.into_inner().into_draft()?;
    let state = state.into_inner();
    let car = blocking(move || Ok(state.fleet.add_car(draft)?)).await?;
    Ok(HttpResponse::Created().json(CarResponse::from(car)))
}

/// GET /cars
#[utoipa::path(
    get,
    path = "/cars",
    responses((status = 200, description = "Fleet units", body = [CarResponse])),
    tag = "fleet"
)]
pub async fn list_cars(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let state = state.into_inner();
    let cars = blocking(move || Ok(state.fleet.list_cars()?)).await?;
    let items: Vec<CarResponse> = cars.into_iter().map(CarResponse::from).collect();
    Ok(HttpResponse::Ok().json(items))
}

/// DELETE /cars/{id}
#[utoipa::path(
    delete,
    path = "/cars/{id}",
    params(("id" = Uuid, Path, description = "Car UUID")),
    responses(
        (status = 204, description = "Car removed"),
        (status = 404, description = "Car not found"),
    ),
    tag = "fleet"
)]
pub async fn delete_car(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let state = state.into_inner();
    blocking(move || Ok(state.fleet.delete_car(id)?)).await?;
    Ok(HttpResponse::NoContent().finish())
}

// ── Driver handlers ──────────────────────────────────────────────────────────

/// POST /drivers
#[utoipa::path(
    post,
    path = "/drivers",
    request_body = SaveDriverRequest,
    responses(
        (status = 201, description = "Driver added", body = DriverResponse),
        (status = 400, description = "Invalid input"),
    ),
    tag = "fleet"
)]
pub async fn create_driver(
    state: web::Data<AppState>,
    body: web::Json<SaveDriverRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let status = match body.status.as_deref() {
        Some(s) => DriverStatus::from_str(s).map_err(AppError::BadRequest)?,
        None => DriverStatus::Active,
    };
    let draft = DriverDraft {
        name: body.name,
        phone: body.phone,
        daily_rate: parse_money_or_zero("daily rate", body.daily_rate.as_deref())?,
        status,
    };

    let state = state.into_inner();
    let driver = blocking(move || Ok(state.fleet.add_driver(draft)?)).await?;
    Ok(HttpResponse::Created().json(DriverResponse::from(driver)))
}

/// GET /drivers
#[utoipa::path(
    get,
    path = "/drivers",
    responses((status = 200, description = "Drivers", body = [DriverResponse])),
    tag = "fleet"
)]
pub async fn list_drivers(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let state = state.into_inner();
    let drivers = blocking(move || Ok(state.fleet.list_drivers()?)).await?;
    let items: Vec<DriverResponse> = drivers.into_iter().map(DriverResponse::from).collect();
    Ok(HttpResponse::Ok().json(items))
}

/// DELETE /drivers/{id}
#[utoipa::path(
    delete,
    path = "/drivers/{id}",
    params(("id" = Uuid, Path, description = "Driver UUID")),
    responses(
        (status = 204, description = "Driver removed"),
        (status = 404, description = "Driver not found"),
    ),
    tag = "fleet"
)]
pub async fn delete_driver(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let state = state.into_inner();
    blocking(move || Ok(state.fleet.delete_driver(id)?)).await?;
    Ok(HttpResponse::NoContent().finish())
}

// ── Vendor / partner handlers ────────────────────────────────────────────────

/// POST /vendors
#[utoipa::path(
    post,
    path = "/vendors",
    request_body = SaveVendorRequest,
    responses(
        (status = 201, description = "Vendor added", body = VendorResponse),
        (status = 400, description = "Invalid input"),
    ),
    tag = "fleet"
)]
pub async fn create_vendor(
    state: web::Data<AppState>,
    body: web::Json<SaveVendorRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let state = state.into_inner();
    let vendor = blocking(move || {
        Ok(state
            .fleet
            .add_vendor(body.name, body.phone, body.address.unwrap_or_default())?)
    })
    .await?;
    Ok(HttpResponse::Created().json(VendorResponse::from(vendor)))
}

/// GET /vendors
#[utoipa::path(
    get,
    path = "/vendors",
    responses((status = 200, description = "Rent-to-rent vendors", body = [VendorResponse])),
    tag = "fleet"
)]
pub async fn list_vendors(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let state = state.into_inner();
    let vendors = blocking(move || Ok(state.fleet.list_vendors()?)).await?;
    let items: Vec<VendorResponse> = vendors.into_iter().map(VendorResponse::from).collect();
    Ok(HttpResponse::Ok().json(items))
}

/// POST /partners
#[utoipa::path(
    post,
    path = "/partners",
    request_body = SavePartnerRequest,
    responses(
        (status = 201, description = "Partner added", body = PartnerResponse),
        (status = 400, description = "Invalid input"),
    ),
    tag = "fleet"
)]
pub async fn create_partner(
    state: web::Data<AppState>,
    body: web::Json<SavePartnerRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let split = parse_money_or_zero("split percentage", body.split_percentage.as_deref())?;
    let state = state.into_inner();
    let partner =
        blocking(move || Ok(state.fleet.add_partner(body.name, body.phone, split)?)).await?;
    Ok(HttpResponse::Created().json(PartnerResponse::from(partner)))
}

/// GET /partners
#[utoipa::path(
    get,
    path = "/partners",
    responses((status = 200, description = "Investing partners", body = [PartnerResponse])),
    tag = "fleet"
)]
pub async fn list_partners(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let state = state.into_inner();
    let partners = blocking(move || Ok(state.fleet.list_partners()?)).await?;
    let items: Vec<PartnerResponse> = partners.into_iter().map(PartnerResponse::from).collect();
    Ok(HttpResponse::Ok().json(items))
}

// ── High season handlers ─────────────────────────────────────────────────────

/// POST /high-seasons
#[utoipa::path(
    post,
    path = "/high-seasons",
    request_body = SaveHighSeasonRequest,
    responses(
        (status = 201, description = "High season added", body = HighSeasonResponse),
        (status = 400, description = "Invalid input"),
    ),
    tag = "fleet"
)]
pub async fn create_high_season(
    state: web::Data<AppState>,
    body: web::Json<SaveHighSeasonRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let draft = HighSeasonDraft {
        name: body.name,
        start_date: body.start_date,
        end_date: body.end_date,
        price_increase: parse_money("price increase", &body.price_increase)?,
    };

    let state = state.into_inner();
    let season = blocking(move || Ok(state.fleet.add_high_season(draft)?)).await?;
    Ok(HttpResponse::Created().json(HighSeasonResponse::from(season)))
}

/// GET /high-seasons
#[utoipa::path(
    get,
    path = "/high-seasons",
    responses((status = 200, description = "High season windows", body = [HighSeasonResponse])),
    tag = "fleet"
)]
pub async fn list_high_seasons(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let state = state.into_inner();
    let seasons = blocking(move || Ok(state.fleet.list_high_seasons()?)).await?;
    let items: Vec<HighSeasonResponse> =
        seasons.into_iter().map(HighSeasonResponse::from).collect();
    Ok(HttpResponse::Ok().json(items))
}

/// DELETE /high-seasons/{id}
#[utoipa::path(
    delete,
    path = "/high-seasons/{id}",
    params(("id" = Uuid, Path, description = "High season UUID")),
    responses(
        (status = 204, description = "High season removed"),
        (status = 404, description = "High season not found"),
    ),
    tag = "fleet"
)]
pub async fn delete_high_season(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let state = state.into_inner();
    blocking(move || Ok(state.fleet.delete_high_season(id)?)).await?;
    Ok(HttpResponse::NoContent().finish())
}
