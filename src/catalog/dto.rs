use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::repo_types::{MealIngredientRow, MealRecord, MealRow};

/// Listing view of a meal.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MealCard {
    pub id: i64,
    pub external_id: Option<i32>,
    pub name: String,
    pub category_name: Option<String>,
    pub area_name: Option<String>,
    pub thumbnail_url: Option<String>,
    pub is_external: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MealIngredientDto {
    pub name: String,
    pub measure: String,
}

/// Full view of a meal, ingredients in stored order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MealDetail {
    pub id: i64,
    pub external_id: Option<i32>,
    pub name: String,
    pub category_name: Option<String>,
    pub area_name: Option<String>,
    pub instructions: Option<String>,
    pub thumbnail_url: Option<String>,
    pub youtube_url: Option<String>,
    pub tags: Option<String>,
    pub is_external: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub ingredients: Vec<MealIngredientDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IngredientRequest {
    pub name: String,
    #[serde(default)]
    pub measure: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMealRequest {
    pub name: String,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub area_name: Option<String>,
    #[serde(default)]
    pub instructions: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub youtube_url: Option<String>,
    #[serde(default)]
    pub tags: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<IngredientRequest>,
}

#[derive(Debug, Deserialize)]
pub struct NameQuery {
    #[serde(default)]
    pub name: String,
}

impl From<MealRow> for MealCard {
    fn from(m: MealRow) -> Self {
        Self {
            id: m.id,
            external_id: m.external_id,
            name: m.name,
            category_name: m.category_name,
            area_name: m.area_name,
            thumbnail_url: m.thumbnail_url,
            is_external: m.is_external,
        }
    }
}

impl From<MealIngredientRow> for MealIngredientDto {
    fn from(r: MealIngredientRow) -> Self {
        Self {
            name: r.name,
            measure: r.measure,
        }
    }
}

impl From<MealRecord> for MealDetail {
    fn from(r: MealRecord) -> Self {
        let m = r.meal;
        Self {
            id: m.id,
            external_id: m.external_id,
            name: m.name,
            category_name: m.category_name,
            area_name: m.area_name,
            instructions: m.instructions,
            thumbnail_url: m.thumbnail_url,
            youtube_url: m.youtube_url,
            tags: m.tags,
            is_external: m.is_external,
            created_at: m.created_at,
            ingredients: r.ingredients.into_iter().map(Into::into).collect(),
        }
    }
}
