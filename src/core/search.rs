//! Relevance ranking of catalog entries against a free-text query.
//!
//! Every check is a case-insensitive substring match and the points add up:
//! title +10 (+5 more for an exact or leading-word title match), description
//! +5, category +3, url +2. Entries scoring zero are dropped and the rest are
//! ordered by descending score, ties keeping catalog order.

use serde::Serialize;
use std::fmt::Display;
use tracing::debug;

use super::catalog::CatalogEntry;

const TITLE_SCORE: u32 = 10;
const TITLE_PREFIX_BONUS: u32 = 5;
const DESCRIPTION_SCORE: u32 = 5;
const CATEGORY_SCORE: u32 = 3;
const URL_SCORE: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    pub fn matches(&self, category: &str) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(wanted) => wanted == category,
        }
    }
}

impl From<&str> for CategoryFilter {
    fn from(s: &str) -> Self {
        if s == "all" {
            CategoryFilter::All
        } else {
            CategoryFilter::Only(s.to_string())
        }
    }
}

impl Display for CategoryFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CategoryFilter::All => write!(f, "all"),
            CategoryFilter::Only(category) => write!(f, "{category}"),
        }
    }
}

/// A catalog entry paired with its relevance for one query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchableEntry {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub url: String,
    pub relevance: u32,
}

impl SearchableEntry {
    fn scored(entry: &CatalogEntry, relevance: u32) -> Self {
        Self {
            id: entry.id.clone(),
            title: entry.title.clone(),
            description: entry.description.clone(),
            category: entry.category.clone(),
            url: entry.url.clone(),
            relevance,
        }
    }
}

/// Relevance of `entry` for `query`. Zero means no match.
pub fn score(entry: &CatalogEntry, query: &str) -> u32 {
    if query.trim().is_empty() {
        return 0;
    }
    score_normalized(entry, &query.to_lowercase())
}

// `needle` is lowercased and not blank; surrounding spaces are significant
fn score_normalized(entry: &CatalogEntry, needle: &str) -> u32 {
    let mut total = 0;

    let title = entry.title.to_lowercase();
    if title.contains(needle) {
        total += TITLE_SCORE;
        if title == needle
            || title
                .strip_prefix(needle)
                .is_some_and(|rest| rest.starts_with(' '))
        {
            total += TITLE_PREFIX_BONUS;
        }
    }
    if entry.description.to_lowercase().contains(needle) {
        total += DESCRIPTION_SCORE;
    }
    if entry.category.to_lowercase().contains(needle) {
        total += CATEGORY_SCORE;
    }
    if entry.url.to_lowercase().contains(needle) {
        total += URL_SCORE;
    }

    total
}

/// Ranks `catalog` against `query`, restricted to `category`.
///
/// An empty (or whitespace-only) query yields no results. Any other query is
/// matched as written, spaces included. The catalog is only read; every
/// result is a fresh copy carrying its relevance.
pub fn search(
    query: &str,
    category: &CategoryFilter,
    catalog: &[CatalogEntry],
) -> Vec<SearchableEntry> {
    if query.trim().is_empty() {
        return Vec::new();
    }
    let needle = query.to_lowercase();

    let mut results: Vec<SearchableEntry> = catalog
        .iter()
        .filter(|entry| category.matches(&entry.category))
        .map(|entry| SearchableEntry::scored(entry, score_normalized(entry, &needle)))
        .filter(|entry| entry.relevance > 0)
        .collect();

    // Stable, so equal scores keep catalog order
    results.sort_by(|a, b| b.relevance.cmp(&a.relevance));

    debug!(
        query = %needle,
        %category,
        matches = results.len(),
        "Search completed"
    );
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::builtin_catalog;

    fn entry(id: &str, title: &str, description: &str, category: &str, url: &str) -> CatalogEntry {
        CatalogEntry::new(id, title, description, category, url)
    }

    #[test]
    fn test_empty_query_returns_nothing() {
        assert!(search("", &CategoryFilter::All, builtin_catalog()).is_empty());
        assert!(search("   ", &CategoryFilter::All, builtin_catalog()).is_empty());
    }

    #[test]
    fn test_score_components_are_additive() {
        let e = entry("a", "Wallet", "Your wallet balance", "wallet", "/wallet");
        assert_eq!(score(&e, "wallet"), 10 + 5 + 5 + 3 + 2);

        let e = entry("b", "Home", "Nothing here", "pages", "/wallet");
        assert_eq!(score(&e, "wallet"), 2);

        let e = entry("c", "Home", "Nothing here", "pages", "/home");
        assert_eq!(score(&e, "wallet"), 0);
    }

    #[test]
    fn test_title_prefix_bonus_requires_word_boundary() {
        let exact = entry("a", "Cards", "", "x", "");
        let leading_word = entry("b", "Cards Overview", "", "x", "");
        let glued = entry("c", "Cardstock", "", "x", "");
        let inner = entry("d", "My Cards", "", "x", "");

        assert_eq!(score(&exact, "cards"), 15);
        assert_eq!(score(&leading_word, "cards"), 15);
        assert_eq!(score(&glued, "card"), 10);
        assert_eq!(score(&inner, "cards"), 10);
    }

    #[test]
    fn test_query_spaces_are_significant() {
        let glued = entry("a", "Cardstock", "", "x", "/x");
        assert_eq!(score(&glued, "card "), 0);
        assert_eq!(score(&glued, " card"), 0);
        assert_eq!(score(&glued, "card"), 10);

        // the trailing space still matches between words
        let word = entry("b", "Card Limits", "", "x", "/x");
        assert_eq!(score(&word, "card "), 10);

        let results = search("card ", &CategoryFilter::All, &[glued, word]);
        let ids: Vec<_> = results.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["b"]);
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let e = entry("a", "Crypto Portfolio", "", "crypto", "/crypto");
        assert_eq!(score(&e, "CRYPTO"), score(&e, "crypto"));
        assert_eq!(score(&e, "Crypto Portfolio"), 15);
    }

    #[test]
    fn test_crypto_search_ranks_title_match_first() {
        let results = search("crypto", &CategoryFilter::All, builtin_catalog());

        assert!(!results.is_empty());
        assert_eq!(results[0].title, "Crypto Portfolio");
        assert_eq!(results[0].relevance, 25);
        for result in &results {
            let haystack = format!(
                "{} {} {} {}",
                result.title, result.description, result.category, result.url
            )
            .to_lowercase();
            assert!(haystack.contains("crypto"));
        }
        assert!(results.windows(2).all(|w| w[0].relevance >= w[1].relevance));
    }

    #[test]
    fn test_category_filter_excludes_other_categories() {
        let results = search(
            "settings",
            &CategoryFilter::from("settings"),
            builtin_catalog(),
        );
        assert!(!results.is_empty());
        assert!(results.iter().all(|r| r.category == "settings"));

        let results = search("card", &CategoryFilter::from("crypto"), builtin_catalog());
        assert!(results.is_empty());
    }

    #[test]
    fn test_unknown_category_yields_nothing() {
        let results = search("card", &CategoryFilter::from("loans"), builtin_catalog());
        assert!(results.is_empty());
    }

    #[test]
    fn test_only_lowercase_all_disables_filter() {
        assert_eq!(CategoryFilter::from("all"), CategoryFilter::All);
        assert_eq!(
            CategoryFilter::from("ALL"),
            CategoryFilter::Only("ALL".to_string())
        );
        assert_eq!(
            CategoryFilter::from("Cards"),
            CategoryFilter::Only("Cards".to_string())
        );
        // Category equality itself is exact
        assert!(!CategoryFilter::from("Cards").matches("cards"));
    }

    #[test]
    fn test_ties_keep_catalog_order() {
        let catalog = vec![
            entry("first", "Send money", "", "pay", "/a"),
            entry("second", "Money transfers", "", "pay", "/b"),
            entry("third", "Receive money", "", "pay", "/c"),
            entry("fourth", "Request money", "", "pay", "/d"),
        ];
        let results = search("money", &CategoryFilter::All, &catalog);
        let ids: Vec<_> = results.iter().map(|r| r.id.as_str()).collect();

        assert_eq!(ids, vec!["second", "first", "third", "fourth"]);
        assert_eq!(results[0].relevance, 15);
        assert!(results[1..].iter().all(|r| r.relevance == 10));
    }

    #[test]
    fn test_search_is_repeatable_and_leaves_catalog_untouched() {
        let catalog = builtin_catalog().to_vec();
        let first = search("card", &CategoryFilter::All, &catalog);
        let second = search("card", &CategoryFilter::All, &catalog);

        assert_eq!(first, second);
        assert_eq!(catalog, builtin_catalog());
    }
}
