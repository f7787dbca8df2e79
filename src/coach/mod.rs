//! Coach-facing triage, client bundles and plan edits.

pub mod dto;
pub mod handlers;
pub mod services;
pub mod status;

use axum::Router;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::read_routes())
        .merge(handlers::write_routes())
}
