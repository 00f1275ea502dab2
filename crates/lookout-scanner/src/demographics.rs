//! Name-based demographic inference.

use crate::result::Demographic;
use std::collections::HashMap;

/// Raw verdict of a name classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameHint {
    /// Female name
    Female,
    /// Mostly used as a female name
    MostlyFemale,
    /// Male name
    Male,
    /// Mostly used as a male name
    MostlyMale,
    /// Used for both
    Androgynous,
    /// Not in the classifier's data
    Unknown,
}

impl From<NameHint> for Demographic {
    fn from(hint: NameHint) -> Self {
        match hint {
            NameHint::Female | NameHint::MostlyFemale => Self::Female,
            NameHint::Male | NameHint::MostlyMale => Self::Male,
            NameHint::Androgynous | NameHint::Unknown => Self::Uncertain,
        }
    }
}

/// Classifies a first name.
pub trait DemographicClassifier: Send + Sync {
    /// Classify a single given name.
    fn classify(&self, first_name: &str) -> NameHint;
}

/// Map the first whitespace-delimited token of `title` through `classifier`.
///
/// A missing classifier or an empty title gives `Unknown`.
#[must_use]
pub fn infer(classifier: Option<&dyn DemographicClassifier>, title: &str) -> Demographic {
    let Some(classifier) = classifier else {
        return Demographic::Unknown;
    };
    match title.split_whitespace().next() {
        Some(first) => classifier.classify(first).into(),
        None => Demographic::Unknown,
    }
}

/// Lookup-table classifier, case-insensitive on the name.
#[derive(Debug, Clone, Default)]
pub struct NameTableClassifier {
    names: HashMap<String, NameHint>,
}

impl NameTableClassifier {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `name` with `hint`.
    #[must_use]
    pub fn with_name(mut self, name: &str, hint: NameHint) -> Self {
        self.names.insert(name.to_lowercase(), hint);
        self
    }

    /// A small built-in table of common given names.
    #[must_use]
    pub fn common_names() -> Self {
        const FEMALE: &[&str] = &[
            "alice", "anna", "emily", "emma", "hannah", "julia", "laura", "maria", "mary",
            "olivia", "sarah", "sophia",
        ];
        const MALE: &[&str] = &[
            "david", "james", "john", "michael", "robert", "thomas", "william", "daniel",
            "peter", "paul", "mark", "joseph",
        ];
        const EITHER: &[&str] = &["alex", "jordan", "taylor", "sam", "casey", "morgan"];

        let mut table = Self::new();
        for name in FEMALE {
            table = table.with_name(name, NameHint::Female);
        }
        for name in MALE {
            table = table.with_name(name, NameHint::Male);
        }
        for name in EITHER {
            table = table.with_name(name, NameHint::Androgynous);
        }
        table
    }
}

impl DemographicClassifier for NameTableClassifier {
    fn classify(&self, first_name: &str) -> NameHint {
        self.names
            .get(&first_name.to_lowercase())
            .copied()
            .unwrap_or(NameHint::Unknown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hint_mapping() {
        assert_eq!(Demographic::from(NameHint::MostlyFemale), Demographic::Female);
        assert_eq!(Demographic::from(NameHint::MostlyMale), Demographic::Male);
        assert_eq!(Demographic::from(NameHint::Androgynous), Demographic::Uncertain);
        assert_eq!(Demographic::from(NameHint::Unknown), Demographic::Uncertain);
    }

    #[test]
    fn test_infer_uses_first_token() {
        let table = NameTableClassifier::common_names();
        assert_eq!(
            infer(Some(&table), "Sarah Connor - GitHub"),
            Demographic::Female
        );
        assert_eq!(infer(Some(&table), "JOHN smith"), Demographic::Male);
        assert_eq!(infer(Some(&table), "Zorblax"), Demographic::Uncertain);
        assert_eq!(infer(Some(&table), "   "), Demographic::Unknown);
    }

    #[test]
    fn test_infer_without_classifier() {
        assert_eq!(infer(None, "Sarah Connor"), Demographic::Unknown);
    }
}
