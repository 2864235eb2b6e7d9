//! Catalog domain module (product listings, categories, search).
//!
//! Business rules for the product side of the marketplace: listing records and
//! their lifecycle, the translation of request filters into an ordered
//! predicate list, and the suggestion-lookup rules. Deterministic domain logic
//! only — executing predicates against a backend lives in `globaltrade-store`.

pub mod category;
pub mod filter;
pub mod listing;
pub mod product;
pub mod search;

pub use category::Category;
pub use filter::{FilterCriteria, Predicate, build_predicates, lenient_number, lenient_quantity};
pub use listing::{ProductListing, SellerSummary};
pub use product::{NewProduct, Product, ProductStatus};
pub use search::{
    DEFAULT_SUGGESTION_LIMIT, MIN_QUERY_LEN, SuggestionQuery, suggestion_predicates, suggestions,
};
