//! Category catalog handed to the extractor
//!
//! The catalog is the user's own vocabulary, usually loaded from transaction
//! history. The fallback vocabulary is only guidance for users with no history
//! and is injected through configuration.

use serde::{Deserialize, Serialize};

/// Built-in guidance vocabulary used when the config does not provide one
pub const COMMON_CATEGORIES: &[&str] = &[
    "food", "groceries", "dining", "restaurant", "lunch", "dinner", "snacks",
    "travel", "transport", "taxi", "uber", "bus", "train", "flight", "hotel",
    "entertainment", "movies", "games", "music", "books",
    "shopping", "clothes", "electronics", "household", "personal",
    "healthcare", "medical", "pharmacy", "doctor", "hospital",
    "utilities", "electricity", "water", "gas", "internet", "phone",
    "education", "courses", "school", "tuition",
    "business", "work", "office", "supplies", "professional",
    "other", "miscellaneous", "general",
];

/// Owned copy of [`COMMON_CATEGORIES`]
pub fn common_categories() -> Vec<String> {
    COMMON_CATEGORIES.iter().map(|c| c.to_string()).collect()
}

/// Ordered set of category names
///
/// Insertion order is kept, blank names are dropped and exact duplicates
/// collapse to their first occurrence. Matching is case-sensitive, so
/// "Food" and "food" are distinct entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct CategoryCatalog {
    names: Vec<String>,
}

impl CategoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: &str) {
        let name = name.trim();
        if name.is_empty() || self.contains(name) {
            return;
        }
        self.names.push(name.to_string());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Comma-separated list, as it appears in prompts
    pub fn joined(&self) -> String {
        self.names.join(", ")
    }
}

impl<S: AsRef<str>> FromIterator<S> for CategoryCatalog {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for name in iter {
            catalog.push(name.as_ref());
        }
        catalog
    }
}

impl From<Vec<String>> for CategoryCatalog {
    fn from(names: Vec<String>) -> Self {
        names.into_iter().collect()
    }
}

impl From<CategoryCatalog> for Vec<String> {
    fn from(catalog: CategoryCatalog) -> Self {
        catalog.names
    }
}
