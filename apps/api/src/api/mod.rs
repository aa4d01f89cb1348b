// API layer module (adapters for controllers)
// Follows Hexagonal Architecture - API is an adapter

pub mod errors;
pub mod extract;
pub mod handlers;
pub mod timestamp;

use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::domain::services::{CompanyService, ShiftService, UserService};

/// Services exposed by one process; a `None` leaves its routes unmounted
#[derive(Clone, Default)]
pub struct ApiServices {
    pub users: Option<UserService>,
    pub companies: Option<CompanyService>,
    pub shifts: Option<ShiftService>,
}

/// Builds the HTTP router for the mounted services
pub fn router(services: ApiServices) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut app = Router::new().route("/health", get(handlers::health::health_check));
    if let Some(users) = services.users {
        app = app.merge(handlers::users::router(users));
    }
    if let Some(companies) = services.companies {
        app = app.merge(handlers::companies::router(companies));
    }
    if let Some(shifts) = services.shifts {
        app = app.merge(handlers::shifts::router(shifts));
    }

    app.layer(TraceLayer::new_for_http()).layer(cors)
}
