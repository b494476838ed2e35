pub mod application;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod pricing;

use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use application::{BookingService, CustomerService, FleetService};

pub use infrastructure::store::JsonStore;

/// Services shared by all handlers, each a thin layer over the same store.
pub struct AppState {
    pub bookings: BookingService<Arc<JsonStore>>,
    pub customers: CustomerService<Arc<JsonStore>>,
    pub fleet: FleetService<Arc<JsonStore>>,
}

impl AppState {
    pub fn new(store: Arc<JsonStore>) -> Self {
        AppState {
            bookings: BookingService::new(store.clone()),
            customers: CustomerService::new(store.clone()),
            fleet: FleetService::new(store),
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "rental_service",
        description = "Car-rental booking and fleet administration API"
    ),
    paths(
        handlers::bookings::create_booking,
        handlers::bookings::update_booking,
        handlers::bookings::submit_booking,
        handlers::bookings::quote_booking,
        handlers::bookings::list_bookings,
        handlers::bookings::get_booking,
        handlers::bookings::delete_booking,
        handlers::bookings::approve_booking,
        handlers::bookings::submit_checklist,
        handlers::bookings::list_transactions,
        handlers::customers::create_customer,
        handlers::customers::update_customer,
        handlers::customers::register_customer,
        handlers::customers::approve_customer,
        handlers::customers::list_customers,
        handlers::customers::delete_customer,
        handlers::fleet::create_car,
        handlers::fleet::list_cars,
        handlers::fleet::delete_car,
        handlers::fleet::create_driver,
        handlers::fleet::list_drivers,
        handlers::fleet::delete_driver,
        handlers::fleet::create_vendor,
        handlers::fleet::list_vendors,
        handlers::fleet::create_partner,
        handlers::fleet::list_partners,
        handlers::fleet::create_high_season,
        handlers::fleet::list_high_seasons,
        handlers::fleet::delete_high_season,
        handlers::settings::get_settings,
        handlers::settings::update_settings,
    ),
    components(schemas(
        handlers::bookings::RentToRentRequest,
        handlers::bookings::SecurityDepositRequest,
        handlers::bookings::SaveBookingRequest,
        handlers::bookings::ChecklistRequest,
        handlers::bookings::QuoteBookingRequest,
        handlers::bookings::RentToRentResponse,
        handlers::bookings::SecurityDepositResponse,
        handlers::bookings::ChecklistResponse,
        handlers::bookings::BookingResponse,
        handlers::bookings::ConflictResponse,
        handlers::bookings::QuoteResponse,
        handlers::bookings::TransactionResponse,
        handlers::customers::SaveCustomerRequest,
        handlers::customers::CustomerResponse,
        handlers::fleet::SaveCarRequest,
        handlers::fleet::CarResponse,
        handlers::fleet::SaveDriverRequest,
        handlers::fleet::DriverResponse,
        handlers::fleet::SaveVendorRequest,
        handlers::fleet::VendorResponse,
        handlers::fleet::SavePartnerRequest,
        handlers::fleet::PartnerResponse,
        handlers::fleet::SaveHighSeasonRequest,
        handlers::fleet::HighSeasonResponse,
        handlers::settings::OvertimePolicyPayload,
        handlers::settings::UpdateSettingsRequest,
        handlers::settings::SettingsResponse,
    )),
    tags(
        (name = "bookings", description = "Booking lifecycle, quoting and approval"),
        (name = "customers", description = "Customer registry and approval"),
        (name = "fleet", description = "Cars, drivers, vendors, partners and high seasons"),
        (name = "settings", description = "Company settings"),
        (name = "ledger", description = "Cash-flow entries written by booking saves"),
    )
)]
pub struct ApiDoc;

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    store: Arc<JsonStore>,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    let state = web::Data::new(AppState::new(store));

    Ok(HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .service(
                web::scope("/bookings")
                    .route("/quote", web::post().to(handlers::bookings::quote_booking))
                    .route(
                        "/submissions",
                        web::post().to(handlers::bookings::submit_booking),
                    )
                    .route("", web::post().to(handlers::bookings::create_booking))
                    .route("", web::get().to(handlers::bookings::list_bookings))
                    .route(
                        "/{id}/approve",
                        web::post().to(handlers::bookings::approve_booking),
                    )
                    .route(
                        "/{id}/checklist",
                        web::post().to(handlers::bookings::submit_checklist),
                    )
                    .route("/{id}", web::get().to(handlers::bookings::get_booking))
                    .route("/{id}", web::put().to(handlers::bookings::update_booking))
                    .route("/{id}", web::delete().to(handlers::bookings::delete_booking)),
            )
            .service(
                web::scope("/customers")
                    .route(
                        "/register",
                        web::post().to(handlers::customers::register_customer),
                    )
                    .route("", web::post().to(handlers::customers::create_customer))
                    .route("", web::get().to(handlers::customers::list_customers))
                    .route(
                        "/{id}/approve",
                        web::post().to(handlers::customers::approve_customer),
                    )
                    .route(
                        "/{id}",
                        web::put().to(handlers::customers::update_customer),
                    )
                    .route(
                        "/{id}",
                        web::delete().to(handlers::customers::delete_customer),
                    ),
            )
            .service(
                web::scope("/cars")
                    .route("", web::post().to(handlers::fleet::create_car))
                    .route("", web::get().to(handlers::fleet::list_cars))
                    .route("/{id}", web::delete().to(handlers::fleet::delete_car)),
            )
            .service(
                web::scope("/drivers")
                    .route("", web::post().to(handlers::fleet::create_driver))
                    .route("", web::get().to(handlers::fleet::list_drivers))
                    .route("/{id}", web::delete().to(handlers::fleet::delete_driver)),
            )
            .service(
                web::scope("/vendors")
                    .route("", web::post().to(handlers::fleet::create_vendor))
                    .route("", web::get().to(handlers::fleet::list_vendors)),
            )
            .service(
                web::scope("/partners")
                    .route("", web::post().to(handlers::fleet::create_partner))
                    .route("", web::get().to(handlers::fleet::list_partners)),
            )
            .service(
                web::scope("/high-seasons")
                    .route("", web::post().to(handlers::fleet::create_high_season))
                    .route("", web::get().to(handlers::fleet::list_high_seasons))
                    .route(
                        "/{id}",
                        web::delete().to(handlers::fleet::delete_high_season),
                    ),
            )
            .route("/settings", web::get().to(handlers::settings::get_settings))
            .route(
                "/settings",
                web::put().to(handlers::settings::update_settings),
            )
            .route(
                "/transactions",
                web::get().to(handlers::bookings::list_transactions),
            )
            .service(
                SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
            )
    })
    .bind((host.to_string(), port))?
    .run())
}
