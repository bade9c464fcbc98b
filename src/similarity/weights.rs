use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum WeightsError {
    #[error("Weight `{name}` must be finite and non-negative, got {value}")]
    Invalid { name: &'static str, value: f64 },
    #[error("Weights must not all be zero")]
    ZeroSum,
    #[error("Weights must sum to a finite value")]
    InfiniteSum,
}

/// Relative weight of each similarity component.
///
/// These are product tuning knobs, not fixed rules. Defaults:
/// ingredients 0.70, type 0.15, category 0.15. Weights that do not sum to 1
/// are normalized by their sum, so the combined score stays within [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawWeights")]
pub struct SimilarityWeights {
    pub ingredients: f64,
    pub item_type: f64,
    pub category: f64,
}

#[derive(Deserialize)]
struct RawWeights {
    ingredients: f64,
    item_type: f64,
    category: f64,
}

impl TryFrom<RawWeights> for SimilarityWeights {
    type Error = WeightsError;

    fn try_from(raw: RawWeights) -> Result<Self, Self::Error> {
        SimilarityWeights::new(raw.ingredients, raw.item_type, raw.category)
    }
}

impl Default for SimilarityWeights {
    fn default() -> Self {
        Self {
            ingredients: 0.70,
            item_type: 0.15,
            category: 0.15,
        }
    }
}

impl SimilarityWeights {
    pub fn new(ingredients: f64, item_type: f64, category: f64) -> Result<Self, WeightsError> {
        for (name, value) in [
            ("ingredients", ingredients),
            ("item_type", item_type),
            ("category", category),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(WeightsError::Invalid { name, value });
            }
        }
        let total = ingredients + item_type + category;
        if !total.is_finite() {
            return Err(WeightsError::InfiniteSum);
        }
        if total <= 0.0 {
            return Err(WeightsError::ZeroSum);
        }
        Ok(Self {
            ingredients,
            item_type,
            category,
        })
    }

    /// Ingredients only.
    pub fn ingredients_only() -> Self {
        Self {
            ingredients: 1.0,
            item_type: 0.0,
            category: 0.0,
        }
    }

    pub fn total(&self) -> f64 {
        self.ingredients + self.item_type + self.category
    }

    /// Weighted sum of component scores, each in [0, 100].
    pub fn combine(&self, ingredient_score: f64, type_score: f64, category_score: f64) -> f64 {
        let weighted = ingredient_score * self.ingredients
            + type_score * self.item_type
            + category_score * self.category;

        let total = self.total();
        if (total - 1.0).abs() < 1e-9 {
            weighted
        } else {
            weighted / total
        }
    }
}
