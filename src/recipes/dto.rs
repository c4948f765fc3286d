use serde::{Deserialize, Serialize};

use super::record::RecipeRecord;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub s: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipeIngredient {
    pub name: String,
    pub measure: String,
}

/// Client-facing shape of a catalog recipe; only populated slots are listed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeView {
    pub id: Option<String>,
    pub name: Option<String>,
    pub category: Option<String>,
    pub area: Option<String>,
    pub instructions: Option<String>,
    pub thumbnail_url: Option<String>,
    pub tags: Option<String>,
    pub youtube_url: Option<String>,
    pub source_url: Option<String>,
    pub ingredients: Vec<RecipeIngredient>,
}

impl From<RecipeRecord> for RecipeView {
    fn from(r: RecipeRecord) -> Self {
        let ingredients = r
            .ingredients()
            .map(|(name, measure)| RecipeIngredient {
                name: name.to_string(),
                measure: measure.map(str::trim).unwrap_or_default().to_string(),
            })
            .collect();
        Self {
            id: r.id,
            name: r.name,
            category: r.category,
            area: r.area,
            instructions: r.instructions,
            thumbnail_url: r.thumbnail,
            tags: r.tags,
            youtube_url: r.youtube,
            source_url: r.source,
            ingredients,
        }
    }
}
