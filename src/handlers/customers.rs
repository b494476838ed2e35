use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::customer_service::CustomerDraft;
use crate::domain::customer::{Customer, CustomerStatus};
use crate::errors::AppError;
use crate::AppState;

use super::blocking;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct SaveCustomerRequest {
    pub name: String,
    pub phone: String,
    pub address: String,
    /// National identity card number.
    pub nik: Option<String>,
    pub id_card_image: Option<String>,
}

impl SaveCustomerRequest {
    fn into_draft(self) -> CustomerDraft {
        CustomerDraft {
            name: self.name,
            phone: self.phone,
            address: self.address,
            nik: self.nik,
            id_card_image: self.id_card_image,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CustomerResponse {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub address: String,
    pub nik: Option<String>,
    pub id_card_image: Option<String>,
    pub status: String,
    pub created_at: String,
}

impl From<Customer> for CustomerResponse {
    fn from(c: Customer) -> Self {
        CustomerResponse {
            id: c.id,
            name: c.name,
            phone: c.phone,
            address: c.address,
            nik: c.nik,
            id_card_image: c.id_card_image,
            status: c.status.to_string(),
            created_at: c.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ListCustomersParams {
    pub status: Option<String>,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /customers
///
/// Admin entry; the customer starts Approved.
#[utoipa::path(
    post,
    path = "/customers",
    request_body = SaveCustomerRequest,
    responses(
        (status = 201, description = "Customer created", body = CustomerResponse),
        (status = 400, description = "Invalid input"),
    ),
    tag = "customers"
)]
pub async fn create_customer(
    state: web::Data<AppState>,
    body: web::Json<SaveCustomerRequest>,
) -> Result<HttpResponse, AppError> {
    let draft = body.into_inner().into_draft();
    let state = state.into_inner();
    let customer = blocking(move || Ok(state.customers.create(draft)?)).await?;
    Ok(HttpResponse::Created().json(CustomerResponse::from(customer)))
}

/// POST /customers/register
///
/// Public self-registration: requires an identity card photo and starts
/// Pending until an operator approves it.
#[utoipa::path(
    post,
    path = "/customers/register",
    request_body = SaveCustomerRequest,
    responses(
        (status = 201, description = "Registration submitted", body = CustomerResponse),
        (status = 400, description = "Invalid input"),
    ),
    tag = "customers"
)]
pub async fn register_customer(
    state: web::Data<AppState>,
    body: web::Json<SaveCustomerRequest>,
) -> Result<HttpResponse, AppError> {
    let draft = body.into_inner().into_draft();
    let state = state.into_inner();
    let customer = blocking(move || Ok(state.customers.register(draft)?)).await?;
    Ok(HttpResponse::Created().json(CustomerResponse::from(customer)))
}

/// PUT /customers/{id}
///
/// Edits a customer; the approval status is untouched.
#[utoipa::path(
    put,
    path = "/customers/{id}",
    params(("id" = Uuid, Path, description = "Customer UUID")),
    request_body = SaveCustomerRequest,
    responses(
        (status = 200, description = "Customer updated", body = CustomerResponse),
        (status = 404, description = "Customer not found"),
    ),
    tag = "customers"
)]
pub async fn update_customer(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<SaveCustomerRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let draft = body.into_inner().into_draft();
    let state = state.into_inner();
    let customer = blocking(move || Ok(state.customers.update(id, draft)?)).await?;
    Ok(HttpResponse::Ok().json(CustomerResponse::from(customer)))
}

/// POST /customers/{id}/approve
#[utoipa::path(
    post,
    path = "/customers/{id}/approve",
    params(("id" = Uuid, Path, description = "Customer UUID")),
    responses(
        (status = 200, description = "Customer approved", body = CustomerResponse),
        (status = 404, description = "Customer not found"),
    ),
    tag = "customers"
)]
pub async fn approve_customer(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let state = state.into_inner();
    let customer = blocking(move || Ok(state.customers.approve(id)?)).await?;
    Ok(HttpResponse::Ok().json(CustomerResponse::from(customer)))
}

/// GET /customers
#[utoipa::path(
    get,
    path = "/customers",
    params(("status" = Option<String>, Query, description = "PENDING or APPROVED")),
    responses(
        (status = 200, description = "Customers, newest first", body = [CustomerResponse]),
    ),
    tag = "customers"
)]
pub async fn list_customers(
    state: web::Data<AppState>,
    query: web::Query<ListCustomersParams>,
) -> Result<HttpResponse, AppError> {
    let status = query
        .into_inner()
        .status
        .as_deref()
        .map(CustomerStatus::from_str)
        .transpose()
        .map_err(AppError::BadRequest)?;

    let state = state.into_inner();
    let customers = blocking(move || Ok(state.customers.list(status)?)).await?;
    let items: Vec<CustomerResponse> = customers.into_iter().map(CustomerResponse::from).collect();
    Ok(HttpResponse::Ok().json(items))
}

/// DELETE /customers/{id}
#[utoipa::path(
    delete,
    path = "/customers/{id}",
    params(("id" = Uuid, Path, description = "Customer UUID")),
    responses(
        (status = 204, description = "Customer deleted"),
        (status = 404, description = "Customer not found"),
    ),
    tag = "customers"
)]
pub async fn delete_customer(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let state = state.into_inner();
    blocking(move || Ok(state.customers.delete(id)?)).await?;
    Ok(HttpResponse::NoContent().finish())
}
