pub mod calories;
pub mod client;
mod dto;
pub mod handlers;
pub mod record;

use crate::state::AppState;
use axum::Router;

pub use client::{MealDbClient, RecipeSource};

pub fn router() -> Router<AppState> {
    handlers::routes()
}
