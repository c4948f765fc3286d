use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};

use super::repo_types::{MealIngredientRow, MealRecord, MealRow, NamedRow, NewMeal};

/// The three name-only lookup tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NameTable {
    Category,
    Area,
    Ingredient,
}

impl NameTable {
    fn table(self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::Area => "area",
            Self::Ingredient => "ingredient",
        }
    }
}

/// Persistence for locally known meals and their lookup tables.
#[async_trait]
pub trait CatalogRepo: Send + Sync {
    async fn list_names(&self, table: NameTable) -> Result<Vec<String>, sqlx::Error>;

    /// Exact, case-sensitive name match.
    async fn find_by_name(&self, table: NameTable, name: &str) -> Result<Option<NamedRow>, sqlx::Error>;

    async fn list_meals(&self) -> Result<Vec<MealRow>, sqlx::Error>;

    /// Case-insensitive substring match on the meal name.
    async fn search_meals(&self, fragment: &str) -> Result<Vec<MealRow>, sqlx::Error>;

    async fn meals_by_category_id(&self, category_id: i64) -> Result<Vec<MealRow>, sqlx::Error>;

    /// Meals linked to the ingredient, each meal at most once.
    async fn meals_by_ingredient_id(&self, ingredient_id: i64) -> Result<Vec<MealRow>, sqlx::Error>;

    async fn find_meal(&self, id: i64) -> Result<Option<MealRecord>, sqlx::Error>;

    /// Inserts the meal, finding or creating its category, area and
    /// ingredients, as one unit. Returns the new meal id.
    async fn create_meal(&self, meal: &NewMeal) -> Result<i64, sqlx::Error>;
}

const MEAL_SELECT: &str = r#"
    SELECT m.id, m.external_id, m.name,
           c.name AS category_name, a.name AS area_name,
           m.instructions, m.thumbnail_url, m.youtube_url, m.tags,
           m.is_external, m.created_at
    FROM meal m
    LEFT JOIN category c ON c.id = m.category_id
    LEFT JOIN area a ON a.id = m.area_id
"#;

/// `%fragment%` with LIKE wildcards in `fragment` escaped.
pub(crate) fn like_pattern(fragment: &str) -> String {
    let mut out = String::with_capacity(fragment.len() + 2);
    out.push('%');
    for ch in fragment.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('%');
    out
}

#[derive(Clone)]
pub struct PgCatalogRepo {
    db: PgPool,
}

impl PgCatalogRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    async fn meals_where(&self, clause: &str, bind: impl Into<Bind>) -> Result<Vec<MealRow>, sqlx::Error> {
        let sql = format!("{MEAL_SELECT} WHERE {clause} ORDER BY m.id");
        let query = sqlx::query_as::<_, MealRow>(&sql);
        let query = match bind.into() {
            Bind::Id(id) => query.bind(id),
            Bind::Text(s) => query.bind(s),
        };
        query.fetch_all(&self.db).await
    }
}

enum Bind {
    Id(i64),
    Text(String),
}

impl From<i64> for Bind {
    fn from(v: i64) -> Self {
        Self::Id(v)
    }
}

impl From<String> for Bind {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

/// Find-or-create by name. The UNIQUE constraint makes this safe under
/// concurrent callers.
async fn upsert_name(
    tx: &mut Transaction<'_, Postgres>,
    table: NameTable,
    name: &str,
) -> Result<i64, sqlx::Error> {
    let sql = format!(
        "INSERT INTO {t} (name) VALUES ($1) \
         ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name \
         RETURNING id",
        t = table.table()
    );
    sqlx::query_scalar::<_, i64>(&sql)
        .bind(name)
        .fetch_one(&mut **tx)
        .await
}

#[async_trait]
impl CatalogRepo for PgCatalogRepo {
    async fn list_names(&self, table: NameTable) -> Result<Vec<String>, sqlx::Error> {
        let sql = format!("SELECT name FROM {} ORDER BY id", table.table());
        sqlx::query_scalar::<_, String>(&sql).fetch_all(&self.db).await
    }

    async fn find_by_name(&self, table: NameTable, name: &str) -> Result<Option<NamedRow>, sqlx::Error> {
        let sql = format!("SELECT id, name FROM {} WHERE name = $1", table.table());
        sqlx::query_as::<_, NamedRow>(&sql)
            .bind(name)
            .fetch_optional(&self.db)
            .await
    }

    async fn list_meals(&self) -> Result<Vec<MealRow>, sqlx::Error> {
        let sql = format!("{MEAL_SELECT} ORDER BY m.id");
        sqlx::query_as::<_, MealRow>(&sql).fetch_all(&self.db).await
    }

    async fn search_meals(&self, fragment: &str) -> Result<Vec<MealRow>, sqlx::Error> {
        self.meals_where(r"m.name ILIKE $1 ESCAPE '\'", like_pattern(fragment))
            .await
    }

    async fn meals_by_category_id(&self, category_id: i64) -> Result<Vec<MealRow>, sqlx::Error> {
        self.meals_where("m.category_id = $1", category_id).await
    }

    async fn meals_by_ingredient_id(&self, ingredient_id: i64) -> Result<Vec<MealRow>, sqlx::Error> {
        self.meals_where(
            "m.id IN (SELECT meal_id FROM meal_ingredient WHERE ingredient_id = $1)",
            ingredient_id,
        )
        .await
    }

    async fn find_meal(&self, id: i64) -> Result<Option<MealRecord>, sqlx::Error> {
        let sql = format!("{MEAL_SELECT} WHERE m.id = $1");
        let Some(meal) = sqlx::query_as::<_, MealRow>(&sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let ingredients = sqlx::query_as::<_, MealIngredientRow>(
            r#"
            SELECT i.name, mi.measure
            FROM meal_ingredient mi
            JOIN ingredient i ON i.id = mi.ingredient_id
            WHERE mi.meal_id = $1
            ORDER BY mi.id
            "#,
        )
        .bind(id)
        .fetch_all(&self.db)
        .await?;

        Ok(Some(MealRecord { meal, ingredients }))
    }

    async fn create_meal(&self, meal: &NewMeal) -> Result<i64, sqlx::Error> {
        let mut tx = self.db.begin().await?;

        let category_id = match meal.category_name.as_deref() {
            Some(name) => Some(upsert_name(&mut tx, NameTable::Category, name).await?),
            None => None,
        };
        let area_id = match meal.area_name.as_deref() {
            Some(name) => Some(upsert_name(&mut tx, NameTable::Area, name).await?),
            None => None,
        };

        let meal_id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO meal (name, category_id, area_id, instructions,
                              thumbnail_url, youtube_url, tags, is_external)
            VALUES ($1, $2, $3, $4, $5, $6, $7, FALSE)
            RETURNING id
            "#,
        )
        .bind(&meal.name)
        .bind(category_id)
        .bind(area_id)
        .bind(&meal.instructions)
        .bind(&meal.thumbnail_url)
        .bind(&meal.youtube_url)
        .bind(&meal.tags)
        .fetch_one(&mut *tx)
        .await?;

        for item in &meal.ingredients {
            let ingredient_id = upsert_name(&mut tx, NameTable::Ingredient, &item.name).await?;
            sqlx::query(
                "INSERT INTO meal_ingredient (meal_id, ingredient_id, measure) VALUES ($1, $2, $3)",
            )
            .bind(meal_id)
            .bind(ingredient_id)
            .bind(&item.measure)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(meal_id)
    }
}
