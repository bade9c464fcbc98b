use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ingredients::{normalize_label, IngredientSet};

/// Product class. Parsed from trimmed, case-insensitive text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProductType {
    Herbicide,
    Insecticide,
    Fungicide,
    /// Any other class, stored normalized.
    Other(String),
}

impl ProductType {
    pub fn as_str(&self) -> &str {
        match self {
            ProductType::Herbicide => "herbicide",
            ProductType::Insecticide => "insecticide",
            ProductType::Fungicide => "fungicide",
            ProductType::Other(s) => s,
        }
    }
}

impl FromStr for ProductType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize_label(s);
        Ok(match normalized.as_str() {
            "herbicide" => ProductType::Herbicide,
            "insecticide" => ProductType::Insecticide,
            "fungicide" => ProductType::Fungicide,
            _ => ProductType::Other(normalized),
        })
    }
}

impl From<String> for ProductType {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(t) => t,
            Err(never) => match never {},
        }
    }
}

impl From<ProductType> for String {
    fn from(t: ProductType) -> Self {
        t.as_str().to_string()
    }
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A catalog product as seen by the similarity scorer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: String,
    #[serde(rename = "type")]
    pub item_type: ProductType,
    pub ingredients: IngredientSet,
    /// Suggested crop.
    pub category: String,
}

impl CatalogItem {
    pub fn new<I, S>(id: impl Into<String>, item_type: &str, ingredients: I, category: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        CatalogItem {
            id: id.into(),
            item_type: ProductType::from(item_type.to_string()),
            ingredients: ingredients.into_iter().collect(),
            category: normalize_label(category),
        }
    }

    /// Category compared the same way as the type: trimmed, case-insensitive.
    pub fn same_category(&self, other: &CatalogItem) -> bool {
        normalize_label(&self.category) == normalize_label(&other.category)
    }
}
