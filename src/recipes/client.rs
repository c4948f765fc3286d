use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::AppError;

use super::record::RecipeRecord;

const SERVICE: &str = "recipe catalog";

/// Read access to the remote recipe catalog.
#[async_trait]
pub trait RecipeSource: Send + Sync {
    /// Recipes whose name matches `query`. "No results" is an empty vector.
    async fn search(&self, query: &str) -> Result<Vec<RecipeRecord>, AppError>;

    /// The recipe with catalog id `id`, if any.
    async fn lookup_by_id(&self, id: &str) -> Result<Option<RecipeRecord>, AppError>;
}

/// TheMealDB-compatible HTTP client.
#[derive(Clone)]
pub struct MealDbClient {
    http: reqwest::Client,
    base_url: String,
}

impl MealDbClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Raw `meals` entries of a catalog response, in upstream order.
    async fn fetch_meals(&self, endpoint: &str, param: (&str, &str)) -> Result<Vec<Value>, AppError> {
        let url = format!("{}/{endpoint}", self.base_url);
        let res = self
            .http
            .get(&url)
            .query(&[param])
            .send()
            .await
            .map_err(|e| AppError::upstream(SERVICE, e))?;

        let status = res.status();
        if !status.is_success() {
            warn!(%status, %url, "recipe catalog returned non-success status");
            return Ok(Vec::new());
        }

        let body = res.bytes().await.map_err(|e| AppError::upstream(SERVICE, e))?;
        let meals = meals_from_body(&body);
        debug!(%url, count = meals.len(), "recipe catalog response");
        Ok(meals)
    }
}

#[async_trait]
impl RecipeSource for MealDbClient {
    async fn search(&self, query: &str) -> Result<Vec<RecipeRecord>, AppError> {
        let meals = self.fetch_meals("search.php", ("s", query)).await?;
        Ok(meals.into_iter().filter_map(record_from).collect())
    }

    /// Only the first entry counts; a non-object first entry means no recipe.
    async fn lookup_by_id(&self, id: &str) -> Result<Option<RecipeRecord>, AppError> {
        let meals = self.fetch_meals("lookup.php", ("i", id)).await?;
        Ok(meals.into_iter().next().and_then(record_from))
    }
}

fn record_from(item: Value) -> Option<RecipeRecord> {
    match item {
        Value::Object(map) => Some(RecipeRecord::from(map)),
        _ => None,
    }
}

/// Extracts the `meals` array from a catalog response body.
///
/// An empty or unparsable body, a missing or `null` `meals` field, or a
/// non-array `meals` all mean "no results".
fn meals_from_body(body: &[u8]) -> Vec<Value> {
    if body.is_empty() {
        return Vec::new();
    }
    let value = match serde_json::from_slice::<Value>(body) {
        Ok(v) => v,
        Err(e) => {
            warn!(error = %e, "recipe catalog body is not JSON");
            return Vec::new();
        }
    };
    let Value::Object(mut root) = value else {
        return Vec::new();
    };
    match root.remove("meals") {
        Some(Value::Array(items)) => items,
        _ => Vec::new(),
    }
}

/// Picks the recipe with the fewest populated slots. Ties keep the earlier one.
pub fn fewest_ingredients(records: Vec<RecipeRecord>) -> Option<RecipeRecord> {
    let mut best: Option<(usize, RecipeRecord)> = None;
    for record in records {
        let count = record.ingredient_count();
        match &best {
            Some((min, _)) if count >= *min => {}
            _ => best = Some((count, record)),
        }
    }
    best.map(|(_, record)| record)
}

/// Searches the catalog and returns the matching recipe with the fewest ingredients.
pub async fn find_fewest_ingredients(
    source: &dyn RecipeSource,
    query: &str,
) -> Result<Option<RecipeRecord>, AppError> {
    let records = source.search(query).await?;
    Ok(fewest_ingredients(records))
}
