use serde::Deserialize;
use serde_json::{Map, Value};

/// Number of (ingredient, measure) positions in a catalog recipe.
pub const SLOT_COUNT: usize = 20;

/// One ingredient position of a catalog recipe. Either half may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeSlot {
    pub ingredient: Option<String>,
    pub measure: Option<String>,
}

impl RecipeSlot {
    /// Ingredient name, unless absent or whitespace only.
    pub fn ingredient(&self) -> Option<&str> {
        non_blank(self.ingredient.as_deref())
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.filter(|v| !v.trim().is_empty())
}

/// A recipe as returned by the remote catalog.
///
/// Slots keep their upstream position; a blank slot in the middle does not
/// compact the ones after it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct RecipeRecord {
    pub id: Option<String>,
    pub name: Option<String>,
    pub category: Option<String>,
    pub area: Option<String>,
    pub instructions: Option<String>,
    pub thumbnail: Option<String>,
    pub tags: Option<String>,
    pub youtube: Option<String>,
    pub source: Option<String>,
    pub slots: [RecipeSlot; SLOT_COUNT],
}

impl RecipeRecord {
    /// Populated slots in slot order, as `(ingredient, measure)`.
    ///
    /// The measure is returned verbatim (possibly blank) so callers can decide
    /// how to treat it.
    pub fn ingredients(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.slots
            .iter()
            .filter_map(|slot| slot.ingredient().map(|name| (name, slot.measure.as_deref())))
    }

    pub fn ingredient_count(&self) -> usize {
        self.slots.iter().filter(|s| s.ingredient().is_some()).count()
    }
}

impl From<Map<String, Value>> for RecipeRecord {
    fn from(map: Map<String, Value>) -> Self {
        let text = |key: &str| -> Option<String> {
            match map.get(key)? {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            }
        };

        let mut slots: [RecipeSlot; SLOT_COUNT] = Default::default();
        for (i, slot) in slots.iter_mut().enumerate() {
            let n = i + 1;
            slot.ingredient = text(&format!("strIngredient{n}"));
            slot.measure = text(&format!("strMeasure{n}"));
        }

        Self {
            id: text("idMeal"),
            name: text("strMeal"),
            category: text("strCategory"),
            area: text("strArea"),
            instructions: text("strInstructions"),
            thumbnail: text("strMealThumb"),
            tags: text("strTags"),
            youtube: text("strYoutube"),
            source: text("strSource"),
            slots,
        }
    }
}

#[cfg(test)]
impl RecipeRecord {
    /// Recipe with `slots` filled from position 1 onwards.
    pub fn fixture(id: &str, name: &str, slots: &[(&str, &str)]) -> Self {
        let mut record = Self {
            id: Some(id.to_string()),
            name: Some(name.to_string()),
            ..Default::default()
        };
        for (slot, (ingredient, measure)) in record.slots.iter_mut().zip(slots) {
            slot.ingredient = Some((*ingredient).to_string());
            slot.measure = Some((*measure).to_string());
        }
        record
    }
}
