use std::time::Duration;

use anyhow::Context;

pub const DEFAULT_RECIPE_API_URL: &str = "https://www.themealdb.com/api/json/v1/1";
pub const DEFAULT_NUTRITION_API_URL: &str = "https://api.api-ninjas.com/v1/nutrition";

/// Remote recipe catalog (TheMealDB compatible).
#[derive(Debug, Clone)]
pub struct RecipeApiConfig {
    pub base_url: String,
}

/// Remote nutrition lookup (API Ninjas compatible).
#[derive(Debug, Clone)]
pub struct NutritionApiConfig {
    pub url: String,
    pub api_key: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    pub http_timeout_secs: u64,
    pub recipe_api: RecipeApiConfig,
    pub nutrition_api: NutritionApiConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let recipe_api = RecipeApiConfig {
            base_url: std::env::var("RECIPE_API_URL")
                .unwrap_or_else(|_| DEFAULT_RECIPE_API_URL.into()),
        };
        let nutrition_api = NutritionApiConfig {
            url: std::env::var("NUTRITION_API_URL")
                .unwrap_or_else(|_| DEFAULT_NUTRITION_API_URL.into()),
            api_key: std::env::var("NUTRITION_API_KEY").unwrap_or_default(),
        };
        Ok(Self {
            database_url,
            db_max_connections: parse_env("DB_MAX_CONNECTIONS").unwrap_or(10),
            http_timeout_secs: parse_env("HTTP_TIMEOUT_SECS").unwrap_or(30),
            recipe_api,
            nutrition_api,
        })
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse::<T>().ok())
}
