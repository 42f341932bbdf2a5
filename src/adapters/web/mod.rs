//! Web server adapter.
//!
//! Axum server with an HTMX front end: the calculator form, projection
//! report with CSV download, scenario comparison and saved calculations.

mod error;
mod handlers;
mod templates;

pub use error::WebError;
pub use handlers::*;
pub use templates::*;
pub(crate) use templates::escape_html;

use axum::{
    Router,
    routing::{delete, get, post},
};
use chrono::NaiveDate;
use std::sync::Arc;

use crate::domain::projection::ProjectionConfig;
use crate::ports::store_port::CalculationStore;

/// Date source for projections. Injected so tests can pin "today".
pub type Clock = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

pub struct AppState {
    pub store: Arc<dyn CalculationStore + Send + Sync>,
    pub config: ProjectionConfig,
    pub today: Clock,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::calculator_form))
        .route("/projection", post(handlers::project))
        .route("/projection/csv", post(handlers::project_csv))
        .route("/scenario", post(handlers::scenario))
        .route(
            "/users/{user_id}/calculations",
            get(handlers::list_calculations).post(handlers::save_calculation),
        )
        .route("/calculations/{id}", delete(handlers::delete_calculation))
        .fallback(handlers::not_found)
        .with_state(Arc::new(state))
}

fn is_htmx_request(headers: &axum::http::HeaderMap) -> bool {
    headers.get("HX-Request").is_some()
}
