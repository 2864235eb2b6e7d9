//! Suggestion lookup rules.
//!
//! The search box asks for short text completions: titles, HS codes and
//! company names of matching active listings, deduplicated and capped. Queries
//! below the minimum length return nothing without touching the store.

use crate::filter::Predicate;
use crate::listing::ProductListing;
use crate::product::ProductStatus;

/// Queries shorter than this return an empty suggestion list.
pub const MIN_QUERY_LEN: usize = 2;

/// Cap applied when the request does not supply a usable limit.
pub const DEFAULT_SUGGESTION_LIMIT: usize = 10;

/// A normalized suggestion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionQuery {
    pub text: String,
    pub limit: usize,
}

impl SuggestionQuery {
    /// Normalize raw query parameters.
    ///
    /// Returns `None` when the query text is absent or shorter than
    /// [`MIN_QUERY_LEN`] — the caller responds with an empty list and skips the
    /// store. A malformed or non-positive limit falls back to the default.
    pub fn parse(text: Option<&str>, limit: Option<&str>) -> Option<Self> {
        let text = text.map(str::trim).unwrap_or_default();
        if text.chars().count() < MIN_QUERY_LEN {
            return None;
        }

        let limit = limit
            .and_then(|s| s.trim().parse::<usize>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_SUGGESTION_LIMIT);

        Some(Self {
            text: text.to_string(),
            limit,
        })
    }

    /// Predicates the store evaluates for this lookup.
    pub fn predicates(&self) -> Vec<Predicate> {
        suggestion_predicates(&self.text)
    }
}

/// Predicate list for a suggestion lookup: active listings whose title, HS
/// code or seller company name matches the text.
pub fn suggestion_predicates(text: &str) -> Vec<Predicate> {
    vec![
        Predicate::Status(ProductStatus::Active),
        Predicate::SuggestionText(text.to_string()),
    ]
}

/// Collect suggestion strings from matched listings.
///
/// Order: all titles first, then HS codes, then company names — deduplicated
/// preserving first occurrence, capped at `limit`.
pub fn suggestions(listings: &[ProductListing], limit: usize) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();

    let titles = listings.iter().map(|l| l.product.title.clone());
    let hs_codes = listings.iter().filter_map(|l| l.product.hs_code.clone());
    let companies = listings
        .iter()
        .filter_map(|l| l.seller.as_ref().and_then(|s| s.company_name.clone()));

    for candidate in titles.chain(hs_codes).chain(companies) {
        if candidate.is_empty() || seen.contains(&candidate) {
            continue;
        }
        seen.push(candidate);
        if seen.len() == limit {
            break;
        }
    }

    seen
}
