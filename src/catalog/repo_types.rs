use sqlx::FromRow;
use time::OffsetDateTime;

/// Row of `category`, `area` or `ingredient`: all three are `{ id, name }`.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct NamedRow {
    pub id: i64,
    pub name: String,
}

/// Meal with its category and area names resolved.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct MealRow {
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
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct MealIngredientRow {
    pub name: String,
    pub measure: String,
}

/// A meal together with its ingredient associations in stored order.
#[derive(Debug, Clone, PartialEq)]
pub struct MealRecord {
    pub meal: MealRow,
    pub ingredients: Vec<MealIngredientRow>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMealIngredient {
    pub name: String,
    pub measure: String,
}

/// Validated input for a locally created meal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewMeal {
    pub name: String,
    pub category_name: Option<String>,
    pub area_name: Option<String>,
    pub instructions: Option<String>,
    pub thumbnail_url: Option<String>,
    pub youtube_url: Option<String>,
    pub tags: Option<String>,
    pub ingredients: Vec<NewMealIngredient>,
}
