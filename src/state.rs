use std::sync::Arc;

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::{info, warn};

use crate::catalog::{CatalogRepo, PgCatalogRepo};
use crate::config::AppConfig;
use crate::nutrition::{NinjasClient, NutritionSource};
use crate::recipes::{MealDbClient, RecipeSource};

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogRepo>,
    pub recipes: Arc<dyn RecipeSource>,
    pub nutrition: Arc<dyn NutritionSource>,
}

impl AppState {
    /// Connects to the database and builds the remote clients. Returns the
    /// pool separately so the caller can run migrations on it.
    pub async fn init() -> anyhow::Result<(Self, PgPool)> {
        let config = AppConfig::from_env()?;

        let db = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;

        let http = reqwest::Client::builder()
            .timeout(config.http_timeout())
            .build()
            .context("build http client")?;

        if config.nutrition_api.api_key.is_empty() {
            warn!("NUTRITION_API_KEY is not set; calorie lookups will likely resolve to 0");
        }

        let recipes = Arc::new(MealDbClient::new(http.clone(), &config.recipe_api.base_url))
            as Arc<dyn RecipeSource>;
        let nutrition = Arc::new(NinjasClient::new(
            http,
            &config.nutrition_api.url,
            &config.nutrition_api.api_key,
        )) as Arc<dyn NutritionSource>;
        let catalog = Arc::new(PgCatalogRepo::new(db.clone())) as Arc<dyn CatalogRepo>;

        Ok((Self::from_parts(catalog, recipes, nutrition), db))
    }

    pub fn from_parts(
        catalog: Arc<dyn CatalogRepo>,
        recipes: Arc<dyn RecipeSource>,
        nutrition: Arc<dyn NutritionSource>,
    ) -> Self {
        Self {
            catalog,
            recipes,
            nutrition,
        }
    }
}

/// Applies the embedded schema migrations. Startup aborts if this fails.
pub async fn run_migrations(db: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations")
        .run(db)
        .await
        .context("run database migrations")?;
    info!("database migrations applied");
    Ok(())
}

#[cfg(test)]
impl AppState {
    /// In-memory catalog, two canned recipes, and 100 kcal per ingredient.
    pub fn fake() -> Self {
        use async_trait::async_trait;

        use crate::catalog::memory::InMemoryCatalog;
        use crate::error::AppError;
        use crate::recipes::record::RecipeRecord;

        struct FakeRecipes(Vec<RecipeRecord>);
        #[async_trait]
        impl RecipeSource for FakeRecipes {
            async fn search(&self, _q: &str) -> Result<Vec<RecipeRecord>, AppError> {
                Ok(self.0.clone())
            }
            async fn lookup_by_id(&self, id: &str) -> Result<Option<RecipeRecord>, AppError> {
                Ok(self.0.iter().find(|r| r.id.as_deref() == Some(id)).cloned())
            }
        }

        struct FakeNutrition;
        #[async_trait]
        impl NutritionSource for FakeNutrition {
            async fn lookup_calories(&self, _i: &str, _m: Option<&str>) -> f64 {
                100.0
            }
        }

        let recipes = FakeRecipes(vec![
            RecipeRecord::fixture(
                "52771",
                "Spicy Arrabiata Penne",
                &[
                    ("penne rigate", "1 pound"),
                    ("olive oil", "1/4 cup"),
                    ("", ""),
                    ("garlic", "3 cloves"),
                ],
            ),
            RecipeRecord::fixture(
                "52772",
                "Teriyaki Chicken Casserole",
                &[("soy sauce", "3/4 cup"), ("water", "1/2 cup")],
            ),
        ]);

        Self::from_parts(
            Arc::new(InMemoryCatalog::new()),
            Arc::new(recipes),
            Arc::new(FakeNutrition),
        )
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn migrations_fail_when_database_is_unreachable() {
        let db = PgPoolOptions::new()
            .acquire_timeout(Duration::from_millis(500))
            .connect_lazy("postgres://mealmind@127.0.0.1:1/mealmind")
            .unwrap();

        let err = run_migrations(&db).await.unwrap_err();
        assert!(err.to_string().contains("run database migrations"));
    }
}
