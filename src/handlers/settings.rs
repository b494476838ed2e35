use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::settings::{AppSettings, OvertimePolicy};
use crate::errors::AppError;
use crate::AppState;

use super::{blocking, parse_money};

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OvertimePolicyPayload {
    /// PERCENTAGE or NOMINAL
    pub kind: String,
    /// Percentage of the daily rate, or flat amount, per overdue hour.
    pub value: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateSettingsRequest {
    pub company_name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub rental_packages: Vec<String>,
    pub car_categories: Vec<String>,
    pub overtime: OvertimePolicyPayload,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SettingsResponse {
    pub company_name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub rental_packages: Vec<String>,
    pub car_categories: Vec<String>,
    pub overtime: OvertimePolicyPayload,
}

impl From<AppSettings> for SettingsResponse {
    fn from(s: AppSettings) -> Self {
        let overtime = match s.overtime {
            OvertimePolicy::Percentage(pct) => OvertimePolicyPayload {
                kind: "PERCENTAGE".to_string(),
                value: pct.to_string(),
            },
            OvertimePolicy::Nominal(flat) => OvertimePolicyPayload {
                kind: "NOMINAL".to_string(),
                value: flat.to_string(),
            },
        };
        SettingsResponse {
            company_name: s.company_name,
            address: s.address,
            phone: s.phone,
            email: s.email,
            rental_packages: s.rental_packages,
            car_categories: s.car_categories,
            overtime,
        }
    }
}

fn parse_overtime(payload: &OvertimePolicyPayload) -> Result<OvertimePolicy, AppError> {
    let value = parse_money("overtime value", &payload.value)?;
    match payload.kind.as_str() {
        "PERCENTAGE" => Ok(OvertimePolicy::Percentage(value)),
        "NOMINAL" => Ok(OvertimePolicy::Nominal(value)),
        other => Err(AppError::BadRequest(format!(
            "unknown overtime policy '{}'",
            other
        ))),
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /settings
#[utoipa::path(
    get,
    path = "/settings",
    responses((status = 200, description = "Company settings", body = SettingsResponse)),
    tag = "settings"
)]
pub async fn get_settings(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let state = state.into_inner();
    let settings = blocking(move || Ok(state.fleet.settings()?)).await?;
    Ok(HttpResponse::Ok().json(SettingsResponse::from(settings)))
}

/// PUT /settings
#[utoipa::path(
    put,
    path = "/settings",
    request_body = UpdateSettingsRequest,
    responses(
        (status = 200, description = "Settings replaced", body = SettingsResponse),
        (status = 400, description = "Invalid input"),
    ),
    tag = "settings"
)]
pub async fn update_settings(
    state: web::Data<AppState>,
    body: web::Json<UpdateSettingsRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let settings = AppSettings {
        company_name: body.company_name,
        address: body.address.unwrap_or_default(),
        phone: body.phone.unwrap_or_default(),
        email: body.email.unwrap_or_default(),
        rental_packages: body.rental_packages,
        car_categories: body.car_categories,
        overtime: parse_overtime(&body.overtime)?,
    };

    let state = state.into_inner();
    let saved = blocking(move || Ok(state.fleet.update_settings(settings)?)).await?;
    Ok(HttpResponse::Ok().json(SettingsResponse::from(saved)))
}
