use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};

use crate::{error::AppError, state::AppState};

use super::calories::{compute_calories, CalorieResult};
use super::client::find_fewest_ingredients;
use super::dto::{RecipeView, SearchQuery};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/recipes/search", get(search_recipes))
        .route("/recipes/fewest-ingredients", get(fewest_ingredients))
        .route("/recipes/:id", get(get_recipe))
        .route("/recipes/:id/calories", get(recipe_calories))
}

#[instrument(skip(state))]
pub async fn search_recipes(
    State(state): State<AppState>,
    Query(q): Query<SearchQuery>,
) -> Result<Json<Vec<RecipeView>>, AppError> {
    let records = state.recipes.search(&q.s).await?;
    info!(query = %q.s, results = records.len(), "recipe search");
    Ok(Json(records.into_iter().map(RecipeView::from).collect()))
}

#[instrument(skip(state))]
pub async fn fewest_ingredients(
    State(state): State<AppState>,
    Query(q): Query<SearchQuery>,
) -> Result<Json<RecipeView>, AppError> {
    find_fewest_ingredients(state.recipes.as_ref(), &q.s)
        .await?
        .map(|r| Json(RecipeView::from(r)))
        .ok_or_else(|| AppError::not_found(format!("No meals found for: {}", q.s)))
}

#[instrument(skip(state))]
pub async fn get_recipe(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RecipeView>, AppError> {
    state
        .recipes
        .lookup_by_id(&id)
        .await?
        .map(|r| Json(RecipeView::from(r)))
        .ok_or_else(|| AppError::not_found(format!("Meal not found with id: {id}")))
}

#[instrument(skip(state))]
pub async fn recipe_calories(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CalorieResult>, AppError> {
    let result = compute_calories(state.recipes.as_ref(), state.nutrition.as_ref(), &id).await?;
    Ok(Json(result))
}
