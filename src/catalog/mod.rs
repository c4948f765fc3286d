pub mod dto;
pub mod handlers;
pub mod repo;
pub mod repo_types;
pub mod services;

#[cfg(test)]
pub(crate) mod memory;

use crate::state::AppState;
use axum::Router;

pub use repo::{CatalogRepo, PgCatalogRepo};

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::lookup_routes())
        .merge(handlers::meal_routes())
}
