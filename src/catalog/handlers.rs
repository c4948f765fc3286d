use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    routing::get,
    Json, Router,
};
use tracing::instrument;

use crate::{error::AppError, state::AppState};

use super::dto::{CreateMealRequest, MealCard, MealDetail, NameQuery};
use super::services;

pub fn lookup_routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories))
        .route("/areas", get(list_areas))
        .route("/ingredients", get(list_ingredients))
}

pub fn meal_routes() -> Router<AppState> {
    Router::new()
        .route("/meals", get(list_meals).post(create_meal))
        .route("/meals/search", get(search_meals))
        .route("/meals/category/:name", get(meals_by_category))
        .route("/meals/ingredient/:name", get(meals_by_ingredient))
        .route("/meals/:id", get(get_meal))
}

#[instrument(skip(state))]
pub async fn list_categories(State(state): State<AppState>) -> Result<Json<Vec<String>>, AppError> {
    Ok(Json(services::list_categories(state.catalog.as_ref()).await?))
}

#[instrument(skip(state))]
pub async fn list_areas(State(state): State<AppState>) -> Result<Json<Vec<String>>, AppError> {
    Ok(Json(services::list_areas(state.catalog.as_ref()).await?))
}

#[instrument(skip(state))]
pub async fn list_ingredients(State(state): State<AppState>) -> Result<Json<Vec<String>>, AppError> {
    Ok(Json(services::list_ingredients(state.catalog.as_ref()).await?))
}

#[instrument(skip(state))]
pub async fn list_meals(State(state): State<AppState>) -> Result<Json<Vec<MealCard>>, AppError> {
    Ok(Json(services::list_meal_cards(state.catalog.as_ref()).await?))
}

#[instrument(skip(state))]
pub async fn search_meals(
    State(state): State<AppState>,
    Query(q): Query<NameQuery>,
) -> Result<Json<Vec<MealCard>>, AppError> {
    Ok(Json(
        services::search_meals_by_name(state.catalog.as_ref(), &q.name).await?,
    ))
}

#[instrument(skip(state))]
pub async fn meals_by_category(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Vec<MealCard>>, AppError> {
    Ok(Json(services::meals_by_category(state.catalog.as_ref(), &name).await?))
}

#[instrument(skip(state))]
pub async fn meals_by_ingredient(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Vec<MealCard>>, AppError> {
    Ok(Json(services::meals_by_ingredient(state.catalog.as_ref(), &name).await?))
}

#[instrument(skip(state))]
pub async fn get_meal(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MealDetail>, AppError> {
    Ok(Json(services::get_meal_detail(state.catalog.as_ref(), id).await?))
}

/// POST /meals
#[instrument(skip(state, body))]
pub async fn create_meal(
    State(state): State<AppState>,
    Json(body): Json<CreateMealRequest>,
) -> Result<(StatusCode, HeaderMap, Json<MealDetail>), AppError> {
    let detail = services::create_meal(state.catalog.as_ref(), body).await?;

    let mut headers = HeaderMap::new();
    let location = HeaderValue::from_str(&format!("/api/v1/meals/{}", detail.id))
        .map_err(|e| AppError::Internal(e.to_string()))?;
    headers.insert(header::LOCATION, location);

    Ok((StatusCode::CREATED, headers, Json(detail)))
}
