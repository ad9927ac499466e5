use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;
use serde::Deserialize;

use crate::map::node::other_category;

const BUILTIN_CATALOG: &str = include_str!("../assets/emotions.json");

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Emotion {
    pub name: String,
    pub color: [u8; 3],
}

#[derive(Clone, Debug, Deserialize)]
pub struct Category {
    pub name: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub emotions: Vec<Emotion>,
}

/// Experience categories and the emotions offered for each.
#[derive(Clone, Debug, Deserialize)]
pub struct Catalog {
    pub categories: Vec<Category>,
    pub fallback: Vec<Emotion>,
}

impl Catalog {
    pub fn builtin() -> Self {
        match Self::parse(BUILTIN_CATALOG) {
            Ok(catalog) => catalog,
            Err(error) => {
                log::error!("built-in emotion catalog is invalid: {error:#}");
                Self {
                    categories: Vec::new(),
                    fallback: Vec::new(),
                }
            }
        }
    }

    pub fn parse(raw: &str) -> Result<Self> {
        let catalog: Self = serde_json::from_str(raw).context("invalid emotion catalog JSON")?;
        if catalog.fallback.is_empty() {
            return Err(anyhow!("emotion catalog needs at least one fallback emotion"));
        }
        Ok(catalog)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read emotion catalog {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("while loading {}", path.display()))
    }

    pub fn category_for(&self, label: &str) -> Option<&Category> {
        if let Some(name) = other_category(label) {
            return self
                .categories
                .iter()
                .find(|category| category.name.eq_ignore_ascii_case(name.trim()));
        }

        let matcher = SkimMatcherV2::default();
        let label = label.to_lowercase();
        self.categories
            .iter()
            .filter_map(|category| {
                category
                    .keywords
                    .iter()
                    .filter_map(|keyword| {
                        matcher
                            .fuzzy_match(&label, &keyword.to_lowercase())
                            .filter(|_| keyword.chars().count() <= label.chars().count())
                    })
                    .max()
                    .map(|score| (score, category))
            })
            .max_by_key(|(score, _)| *score)
            .map(|(_, category)| category)
    }

    pub fn emotions_for(&self, label: &str) -> Vec<Emotion> {
        match self.category_for(label) {
            Some(category) if !category.emotions.is_empty() => category.emotions.clone(),
            _ => self.fallback.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_parses() {
        let catalog = Catalog::builtin();
        assert!(!catalog.categories.is_empty());
        assert!(!catalog.fallback.is_empty());
    }

    #[test]
    fn keywords_pick_category() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.category_for("Exam").map(|c| c.name.as_str()), Some("School"));
        assert_eq!(
            catalog.category_for("My Breakup").map(|c| c.name.as_str()),
            Some("Relationships")
        );
        assert_eq!(catalog.category_for("Move").map(|c| c.name.as_str()), Some("Change"));
    }

    #[test]
    fn other_prefix_names_category_directly() {
        let catalog = Catalog::builtin();
        assert_eq!(
            catalog.category_for("Other - family").map(|c| c.name.as_str()),
            Some("Family")
        );
        assert!(catalog.category_for("Other - Astronomy").is_none());
    }

    #[test]
    fn unknown_label_uses_fallback() {
        let catalog = Catalog::builtin();
        assert!(catalog.category_for("zzz").is_none());
        assert_eq!(catalog.emotions_for("zzz"), catalog.fallback);
    }

    #[test]
    fn rejects_catalog_without_fallback() {
        let error = Catalog::parse(r#"{ "categories": [], "fallback": [] }"#).unwrap_err();
        assert!(error.to_string().contains("fallback"));
        assert!(Catalog::parse("not json").is_err());
    }
}
