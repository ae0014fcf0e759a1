//! Search form handling: turning what a user picked into backend predicates.
//!
//! [`SearchFilters`] is the raw form. [`ListingCriteria`] is the normalized
//! predicate set built from the form or from a saved search, and
//! [`ListingCriteria::apply`] adds its clauses to a [`Query`](crate::query::Query).

pub mod criteria;
pub mod search_filters;
pub mod sort;
pub mod url_state;

pub use criteria::ListingCriteria;
pub use search_filters::{PriceRange, SearchFilters, PRICE_RANGE_OPTIONS};
pub use sort::SortOrder;
pub use url_state::{decode_filters, encode_filters, SearchState};
