use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Normalize free text for comparison: trimmed, lower-cased.
pub fn normalize_label(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// A set of active ingredient names, normalized on insertion.
///
/// Whitespace and case never distinguish two ingredients. Blank entries are
/// dropped. Ordered storage keeps iteration and serialization deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct IngredientSet {
    inner: BTreeSet<String>,
}

impl IngredientSet {
    pub fn new() -> Self {
        IngredientSet {
            inner: BTreeSet::new(),
        }
    }

    pub fn insert(&mut self, ingredient: &str) {
        let normalized = normalize_label(ingredient);
        if !normalized.is_empty() {
            self.inner.insert(normalized);
        }
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn contains(&self, ingredient: &str) -> bool {
        self.inner.contains(&normalize_label(ingredient))
    }

    pub fn intersection_len(&self, other: &IngredientSet) -> usize {
        self.inner.intersection(&other.inner).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.inner.iter()
    }
}

impl<S: AsRef<str>> FromIterator<S> for IngredientSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = IngredientSet::new();
        for ingredient in iter {
            set.insert(ingredient.as_ref());
        }
        set
    }
}

impl From<Vec<String>> for IngredientSet {
    fn from(raw: Vec<String>) -> Self {
        raw.iter().collect()
    }
}

impl From<IngredientSet> for Vec<String> {
    fn from(set: IngredientSet) -> Self {
        set.inner.into_iter().collect()
    }
}
