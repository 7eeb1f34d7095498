//! Essential-category classifier
//!
//! Decides whether a category is a necessity (missing or falling spend is
//! benign) or discretionary (worth flagging). Matching is a case-insensitive
//! substring test on the category name.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse class of a spending category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryClass {
    Food,
    Transport,
    Medical,
    Housing,
    Water,
    Groceries,
    Utilities,
    /// Everything that is not a necessity
    Discretionary,
}

/// Name fragments per essential class, checked in order
const ESSENTIAL_KEYWORDS: &[(CategoryClass, &[&str])] = &[
    (CategoryClass::Food, &["food", "eating"]),
    (CategoryClass::Transport, &["transport", "commute", "fuel"]),
    (CategoryClass::Medical, &["medical", "pharmacy"]),
    (CategoryClass::Housing, &["housing", "home", "electricity"]),
    (CategoryClass::Water, &["water"]),
    (CategoryClass::Groceries, &["groceries", "supermarket"]),
    (CategoryClass::Utilities, &["utilities"]),
];

impl CategoryClass {
    /// Classify a category by its display name
    pub fn classify(category_name: &str) -> Self {
        let lower = category_name.to_lowercase();
        ESSENTIAL_KEYWORDS
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
            .map(|(class, _)| *class)
            .unwrap_or(CategoryClass::Discretionary)
    }

    pub fn is_essential(&self) -> bool {
        !matches!(self, CategoryClass::Discretionary)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryClass::Food => "food",
            CategoryClass::Transport => "transport",
            CategoryClass::Medical => "medical",
            CategoryClass::Housing => "housing",
            CategoryClass::Water => "water",
            CategoryClass::Groceries => "groceries",
            CategoryClass::Utilities => "utilities",
            CategoryClass::Discretionary => "discretionary",
        }
    }
}

impl fmt::Display for CategoryClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Shorthand for `CategoryClass::classify(name).is_essential()`
pub fn is_essential(category_name: &str) -> bool {
    CategoryClass::classify(category_name).is_essential()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_essential_categories() {
        assert_eq!(CategoryClass::classify("Food & Drinks"), CategoryClass::Food);
        assert_eq!(CategoryClass::classify("Eating Out"), CategoryClass::Food);
        assert_eq!(CategoryClass::classify("Public Transport"), CategoryClass::Transport);
        assert_eq!(CategoryClass::classify("FUEL"), CategoryClass::Transport);
        assert_eq!(CategoryClass::classify("Pharmacy"), CategoryClass::Medical);
        assert_eq!(CategoryClass::classify("Home"), CategoryClass::Housing);
        assert_eq!(CategoryClass::classify("Electricity bill"), CategoryClass::Housing);
        assert_eq!(CategoryClass::classify("Water"), CategoryClass::Water);
        assert_eq!(CategoryClass::classify("Supermarket"), CategoryClass::Groceries);
        assert_eq!(CategoryClass::classify("Utilities"), CategoryClass::Utilities);
    }

    #[test]
    fn test_discretionary_categories() {
        for name in ["Coffee", "Entertainment", "Shopping", "Travel", "Gym & Fitness", ""] {
            assert_eq!(CategoryClass::classify(name), CategoryClass::Discretionary, "{name}");
            assert!(!is_essential(name));
        }
    }

    #[test]
    fn test_first_matching_class_wins() {
        // Contains both "food" and "home"
        assert_eq!(CategoryClass::classify("Home food delivery"), CategoryClass::Food);
    }
}
