use serde::{Deserialize, Serialize};

use crate::catalog::CatalogItem;
use super::weights::SimilarityWeights;

/// Component scores behind a similarity result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityBreakdown {
    pub shared_ingredients: usize,
    pub union_ingredients: usize,
    /// Jaccard index scaled to [0, 100]; 0 when either side has no ingredients.
    pub ingredient_score: f64,
    pub type_match: bool,
    pub category_match: bool,
}

impl SimilarityBreakdown {
    pub fn between(a: &CatalogItem, b: &CatalogItem) -> Self {
        let shared_ingredients = a.ingredients.intersection_len(&b.ingredients);
        let union_ingredients = a.ingredients.len() + b.ingredients.len() - shared_ingredients;

        let ingredient_score = if a.ingredients.is_empty() || b.ingredients.is_empty() {
            0.0
        } else {
            shared_ingredients as f64 / union_ingredients as f64 * 100.0
        };

        SimilarityBreakdown {
            shared_ingredients,
            union_ingredients,
            ingredient_score,
            type_match: a.item_type == b.item_type,
            category_match: a.same_category(b),
        }
    }

    pub fn type_score(&self) -> f64 {
        if self.type_match {
            100.0
        } else {
            0.0
        }
    }

    pub fn category_score(&self) -> f64 {
        if self.category_match {
            100.0
        } else {
            0.0
        }
    }
}

fn to_percent(raw: f64) -> u8 {
    let rounded = raw.round();
    debug_assert!((0.0..=100.0).contains(&rounded), "score {rounded} out of range [0, 100]");
    rounded.clamp(0.0, 100.0) as u8
}

pub trait SimilarityScorer {
    fn breakdown(&self, a: &CatalogItem, b: &CatalogItem) -> SimilarityBreakdown {
        SimilarityBreakdown::between(a, b)
    }

    fn score_value(&self, details: &SimilarityBreakdown) -> u8;

    /// Integer similarity in [0, 100]. Symmetric in its arguments.
    fn score(&self, a: &CatalogItem, b: &CatalogItem) -> u8 {
        self.score_value(&self.breakdown(a, b))
    }
}

/// Weighted ingredient/type/category scorer. The default production scorer.
#[derive(Debug, Clone, Default)]
pub struct WeightedScorer {
    weights: SimilarityWeights,
}

impl WeightedScorer {
    pub fn new(weights: SimilarityWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &SimilarityWeights {
        &self.weights
    }
}

impl SimilarityScorer for WeightedScorer {
    fn score_value(&self, details: &SimilarityBreakdown) -> u8 {
        to_percent(self.weights.combine(
            details.ingredient_score,
            details.type_score(),
            details.category_score(),
        ))
    }
}

/// Ingredient overlap only; type and category are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct JaccardScorer;

impl SimilarityScorer for JaccardScorer {
    fn score_value(&self, details: &SimilarityBreakdown) -> u8 {
        to_percent(details.ingredient_score)
    }
}
