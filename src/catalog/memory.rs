//! In-process [`CatalogRepo`] used by tests and [`AppState::fake`](crate::state::AppState::fake).

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use time::OffsetDateTime;

use super::repo::{CatalogRepo, NameTable};
use super::repo_types::{MealIngredientRow, MealRecord, MealRow, NamedRow, NewMeal};

#[derive(Debug, Clone)]
struct StoredMeal {
    id: i64,
    external_id: Option<i32>,
    name: String,
    category_id: Option<i64>,
    area_id: Option<i64>,
    instructions: Option<String>,
    thumbnail_url: Option<String>,
    youtube_url: Option<String>,
    tags: Option<String>,
    is_external: bool,
    created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
struct StoredLink {
    meal_id: i64,
    ingredient_id: i64,
    measure: String,
}

#[derive(Default)]
struct Tables {
    names: HashMap<NameTable, Vec<NamedRow>>,
    meals: Vec<StoredMeal>,
    links: Vec<StoredLink>,
    next_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn upsert(&mut self, table: NameTable, name: &str) -> i64 {
        if let Some(row) = self.names.get(&table).and_then(|rows| rows.iter().find(|r| r.name == name)) {
            return row.id;
        }
        let id = self.next_id();
        self.names.entry(table).or_default().push(NamedRow {
            id,
            name: name.to_string(),
        });
        id
    }

    fn name_of(&self, table: NameTable, id: Option<i64>) -> Option<String> {
        let id = id?;
        self.names
            .get(&table)?
            .iter()
            .find(|r| r.id == id)
            .map(|r| r.name.clone())
    }

    fn row(&self, m: &StoredMeal) -> MealRow {
        MealRow {
            id: m.id,
            external_id: m.external_id,
            name: m.name.clone(),
            category_name: self.name_of(NameTable::Category, m.category_id),
            area_name: self.name_of(NameTable::Area, m.area_id),
            instructions: m.instructions.clone(),
            thumbnail_url: m.thumbnail_url.clone(),
            youtube_url: m.youtube_url.clone(),
            tags: m.tags.clone(),
            is_external: m.is_external,
            created_at: m.created_at,
        }
    }

    fn rows_where(&self, keep: impl Fn(&StoredMeal) -> bool) -> Vec<MealRow> {
        self.meals.iter().filter(|m| keep(m)).map(|m| self.row(m)).collect()
    }
}

#[derive(Default)]
pub struct InMemoryCatalog {
    tables: Mutex<Tables>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows in a lookup table.
    pub fn count(&self, table: NameTable) -> usize {
        self.lock().names.get(&table).map_or(0, Vec::len)
    }

    /// Adds an extra association row, bypassing `create_meal`.
    pub fn link(&self, meal_id: i64, ingredient: &str, measure: &str) {
        let mut t = self.lock();
        let ingredient_id = t.upsert(NameTable::Ingredient, ingredient);
        t.links.push(StoredLink {
            meal_id,
            ingredient_id,
            measure: measure.to_string(),
        });
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl CatalogRepo for InMemoryCatalog {
    async fn list_names(&self, table: NameTable) -> Result<Vec<String>, sqlx::Error> {
        Ok(self
            .lock()
            .names
            .get(&table)
            .map(|rows| rows.iter().map(|r| r.name.clone()).collect())
            .unwrap_or_default())
    }

    async fn find_by_name(&self, table: NameTable, name: &str) -> Result<Option<NamedRow>, sqlx::Error> {
        Ok(self
            .lock()
            .names
            .get(&table)
            .and_then(|rows| rows.iter().find(|r| r.name == name).cloned()))
    }

    async fn list_meals(&self) -> Result<Vec<MealRow>, sqlx::Error> {
        Ok(self.lock().rows_where(|_| true))
    }

    async fn search_meals(&self, fragment: &str) -> Result<Vec<MealRow>, sqlx::Error> {
        let needle = fragment.to_lowercase();
        Ok(self
            .lock()
            .rows_where(|m| m.name.to_lowercase().contains(&needle)))
    }

    async fn meals_by_category_id(&self, category_id: i64) -> Result<Vec<MealRow>, sqlx::Error> {
        Ok(self
            .lock()
            .rows_where(|m| m.category_id == Some(category_id)))
    }

    async fn meals_by_ingredient_id(&self, ingredient_id: i64) -> Result<Vec<MealRow>, sqlx::Error> {
        let t = self.lock();
        Ok(t.rows_where(|m| {
            t.links
                .iter()
                .any(|l| l.meal_id == m.id && l.ingredient_id == ingredient_id)
        }))
    }

    async fn find_meal(&self, id: i64) -> Result<Option<MealRecord>, sqlx::Error> {
        let t = self.lock();
        let Some(stored) = t.meals.iter().find(|m| m.id == id) else {
            return Ok(None);
        };
        let ingredients = t
            .links
            .iter()
            .filter(|l| l.meal_id == id)
            .map(|l| MealIngredientRow {
                name: t
                    .name_of(NameTable::Ingredient, Some(l.ingredient_id))
                    .unwrap_or_default(),
                measure: l.measure.clone(),
            })
            .collect();
        Ok(Some(MealRecord {
            meal: t.row(stored),
            ingredients,
        }))
    }

    async fn create_meal(&self, meal: &NewMeal) -> Result<i64, sqlx::Error> {
        let mut t = self.lock();
        let category_id = meal
            .category_name
            .as_deref()
            .map(|n| t.upsert(NameTable::Category, n));
        let area_id = meal.area_name.as_deref().map(|n| t.upsert(NameTable::Area, n));
        let id = t.next_id();
        t.meals.push(StoredMeal {
            id,
            external_id: None,
            name: meal.name.clone(),
            category_id,
            area_id,
            instructions: meal.instructions.clone(),
            thumbnail_url: meal.thumbnail_url.clone(),
            youtube_url: meal.youtube_url.clone(),
            tags: meal.tags.clone(),
            is_external: false,
            created_at: OffsetDateTime::now_utc(),
        });
        for item in &meal.ingredients {
            let ingredient_id = t.upsert(NameTable::Ingredient, &item.name);
            t.links.push(StoredLink {
                meal_id: id,
                ingredient_id,
                measure: item.measure.clone(),
            });
        }
        Ok(id)
    }
}
