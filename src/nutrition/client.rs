use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

/// Calorie lookup for a single ingredient.
///
/// Implementations never fail: any lookup problem resolves to `0.0`.
#[async_trait]
pub trait NutritionSource: Send + Sync {
    async fn lookup_calories(&self, ingredient: &str, measure: Option<&str>) -> f64;
}

#[derive(Debug, thiserror::Error)]
pub enum NutritionError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected status {0}")]
    Status(reqwest::StatusCode),
    #[error("response is not a JSON list")]
    NotAList,
    #[error("no nutrition results")]
    Empty,
    #[error("calories missing or not numeric")]
    NoCalories,
}

/// Query text sent to the nutrition API: `"<measure> <ingredient>"`, or the
/// bare ingredient when the measure is absent or blank.
pub fn nutrition_query(ingredient: &str, measure: Option<&str>) -> String {
    match measure {
        Some(m) if !m.trim().is_empty() => format!("{m} {ingredient}"),
        _ => ingredient.to_string(),
    }
}

/// API Ninjas-compatible nutrition client.
#[derive(Clone)]
pub struct NinjasClient {
    http: reqwest::Client,
    url: String,
    api_key: String,
}

impl NinjasClient {
    pub fn new(http: reqwest::Client, url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
            api_key: api_key.into(),
        }
    }

    async fn try_lookup(&self, query: &str) -> Result<f64, NutritionError> {
        let res = self
            .http
            .get(&self.url)
            .query(&[("query", query)])
            .header("X-Api-Key", &self.api_key)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            return Err(NutritionError::Status(status));
        }

        let body: Value = res.json().await?;
        first_calories(body)
    }
}

fn first_calories(body: Value) -> Result<f64, NutritionError> {
    let Value::Array(items) = body else {
        return Err(NutritionError::NotAList);
    };
    let first = items.first().ok_or(NutritionError::Empty)?;
    first
        .get("calories")
        .and_then(Value::as_f64)
        .ok_or(NutritionError::NoCalories)
}

#[async_trait]
impl NutritionSource for NinjasClient {
    async fn lookup_calories(&self, ingredient: &str, measure: Option<&str>) -> f64 {
        let query = nutrition_query(ingredient, measure);
        match self.try_lookup(&query).await {
            Ok(calories) => {
                debug!(%query, calories, "nutrition lookup");
                calories
            }
            Err(e) => {
                warn!(error = %e, %query, "nutrition lookup failed; counting 0 calories");
                0.0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> NinjasClient {
        NinjasClient::new(
            reqwest::Client::new(),
            format!("{}/v1/nutrition", server.uri()),
            "secret",
        )
    }

    #[test]
    fn query_prefixes_non_blank_measure() {
        assert_eq!(nutrition_query("Flour", Some("1 cup")), "1 cup Flour");
        assert_eq!(nutrition_query("Salt", Some("   ")), "Salt");
        assert_eq!(nutrition_query("Salt", None), "Salt");
    }

    #[tokio::test]
    async fn returns_first_result_calories() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/nutrition"))
            .and(query_param("query", "1 cup Flour"))
            .and(header("X-Api-Key", "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "name": "flour", "calories": 455.5 },
                { "name": "other", "calories": 1.0 }
            ])))
            .mount(&server)
            .await;

        let calories = client_for(&server).lookup_calories("Flour", Some("1 cup")).await;
        assert_eq!(calories, 455.5);
    }

    #[tokio::test]
    async fn degrades_to_zero_on_bad_payloads() {
        let server = MockServer::start().await;
        Mock::given(query_param("query", "empty"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;
        Mock::given(query_param("query", "premium"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "calories": "Only available for premium subscribers." }
            ])))
            .mount(&server)
            .await;
        Mock::given(query_param("query", "object"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "calories": 10 })))
            .mount(&server)
            .await;
        Mock::given(query_param("query", "denied"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        Mock::given(query_param("query", "html"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        for q in ["empty", "premium", "object", "denied", "html"] {
            assert_eq!(client.lookup_calories(q, None).await, 0.0, "query {q}");
        }
    }

    #[tokio::test]
    async fn degrades_to_zero_when_unreachable() {
        let client = NinjasClient::new(reqwest::Client::new(), "http://127.0.0.1:1/nutrition", "k");
        assert_eq!(client.lookup_calories("Salt", None).await, 0.0);
    }

    #[test]
    fn first_calories_requires_a_number() {
        assert!(matches!(first_calories(json!([{}])), Err(NutritionError::NoCalories)));
        assert_eq!(first_calories(json!([{ "calories": 12 }])).unwrap(), 12.0);
    }
}
