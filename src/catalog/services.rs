use tracing::{info, warn};

use crate::error::AppError;

use super::dto::{CreateMealRequest, MealCard, MealDetail};
use super::repo::{CatalogRepo, NameTable};
use super::repo_types::{MealRow, NewMeal, NewMealIngredient};

fn cards(rows: Vec<MealRow>) -> Vec<MealCard> {
    rows.into_iter().map(MealCard::from).collect()
}

pub async fn list_categories(repo: &dyn CatalogRepo) -> Result<Vec<String>, AppError> {
    Ok(repo.list_names(NameTable::Category).await?)
}

pub async fn list_areas(repo: &dyn CatalogRepo) -> Result<Vec<String>, AppError> {
    Ok(repo.list_names(NameTable::Area).await?)
}

pub async fn list_ingredients(repo: &dyn CatalogRepo) -> Result<Vec<String>, AppError> {
    Ok(repo.list_names(NameTable::Ingredient).await?)
}

pub async fn list_meal_cards(repo: &dyn CatalogRepo) -> Result<Vec<MealCard>, AppError> {
    Ok(cards(repo.list_meals().await?))
}

pub async fn search_meals_by_name(repo: &dyn CatalogRepo, fragment: &str) -> Result<Vec<MealCard>, AppError> {
    Ok(cards(repo.search_meals(fragment).await?))
}

/// Meals in the named category; empty when the category is unknown.
pub async fn meals_by_category(repo: &dyn CatalogRepo, name: &str) -> Result<Vec<MealCard>, AppError> {
    let Some(category) = repo.find_by_name(NameTable::Category, name).await? else {
        return Ok(Vec::new());
    };
    Ok(cards(repo.meals_by_category_id(category.id).await?))
}

/// Meals using the named ingredient; empty when the ingredient is unknown.
/// The repo already yields each meal once.
pub async fn meals_by_ingredient(repo: &dyn CatalogRepo, name: &str) -> Result<Vec<MealCard>, AppError> {
    let Some(ingredient) = repo.find_by_name(NameTable::Ingredient, name).await? else {
        return Ok(Vec::new());
    };
    Ok(cards(repo.meals_by_ingredient_id(ingredient.id).await?))
}

pub async fn get_meal_detail(repo: &dyn CatalogRepo, id: i64) -> Result<MealDetail, AppError> {
    repo.find_meal(id)
        .await?
        .map(MealDetail::from)
        .ok_or_else(|| AppError::not_found(format!("Meal not found with id: {id}")))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Checks a create request and normalises it into a [`NewMeal`].
pub fn validate_new_meal(req: CreateMealRequest) -> Result<NewMeal, AppError> {
    let name = req.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::bad_request("Meal name is required"));
    }

    let mut ingredients = Vec::with_capacity(req.ingredients.len());
    for (i, item) in req.ingredients.into_iter().enumerate() {
        let ingredient = item.name.trim().to_string();
        if ingredient.is_empty() {
            return Err(AppError::bad_request(format!("Ingredient #{} has no name", i + 1)));
        }
        ingredients.push(NewMealIngredient {
            name: ingredient,
            measure: item.measure.map(|m| m.trim().to_string()).unwrap_or_default(),
        });
    }

    Ok(NewMeal {
        name,
        category_name: non_blank(req.category_name),
        area_name: non_blank(req.area_name),
        instructions: req.instructions,
        thumbnail_url: non_blank(req.thumbnail_url),
        youtube_url: non_blank(req.youtube_url),
        tags: non_blank(req.tags),
        ingredients,
    })
}

/// Creates a local meal, reusing categories, areas and ingredients by name.
pub async fn create_meal(repo: &dyn CatalogRepo, req: CreateMealRequest) -> Result<MealDetail, AppError> {
    let new_meal = validate_new_meal(req).inspect_err(|e| warn!(error = %e, "rejected meal"))?;

    let id = repo.create_meal(&new_meal).await?;
    let Some(record) = repo.find_meal(id).await? else {
        return Err(AppError::Internal(format!("Failed to reload meal {id}")));
    };

    info!(meal_id = id, name = %new_meal.name, ingredients = new_meal.ingredients.len(), "meal created");
    Ok(MealDetail::from(record))
}
