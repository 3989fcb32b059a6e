use axum::{Router, routing::get};

use crate::state::AppState;

pub mod admin;
pub mod auth;
pub mod certificates;
pub mod courses;
pub mod doc;
pub mod free_mode;
pub mod health;
pub mod params;
pub mod payments;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .route("/journeys", get(courses::list_journeys))
        .nest("/courses", courses::router())
        .nest("/auth", auth::router())
        .nest("/payments", payments::router())
        .nest("/free-mode", free_mode::router())
        .nest("/certificates", certificates::router())
        .nest("/admin", admin::router())
}
