use serde::Serialize;
use tracing::info;

use crate::error::AppError;
use crate::nutrition::NutritionSource;

use super::client::RecipeSource;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngredientCalorie {
    pub name: String,
    pub measure: String,
    pub calories: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalorieResult {
    pub recipe_id: String,
    pub recipe_name: String,
    pub ingredients: Vec<IngredientCalorie>,
    pub total_calories: f64,
}

/// Rounds half up to two decimals.
pub fn round_calories(total: f64) -> f64 {
    (total * 100.0 + 0.5).floor() / 100.0
}

/// Estimates the calories of a catalog recipe, one nutrition lookup per
/// populated slot, issued in slot order.
pub async fn compute_calories(
    recipes: &dyn RecipeSource,
    nutrition: &dyn NutritionSource,
    recipe_id: &str,
) -> Result<CalorieResult, AppError> {
    let recipe = recipes
        .lookup_by_id(recipe_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Meal not found with id: {recipe_id}")))?;

    let mut ingredients = Vec::new();
    let mut total = 0.0;
    for (name, measure) in recipe.ingredients() {
        let calories = nutrition.lookup_calories(name, measure).await;
        total += calories;
        ingredients.push(IngredientCalorie {
            name: name.to_string(),
            measure: measure.unwrap_or_default().to_string(),
            calories,
        });
    }

    let total_calories = round_calories(total);
    info!(%recipe_id, ingredients = ingredients.len(), total_calories, "calories computed");

    Ok(CalorieResult {
        recipe_id: recipe_id.to_string(),
        recipe_name: recipe.name.unwrap_or_default(),
        ingredients,
        total_calories,
    })
}
