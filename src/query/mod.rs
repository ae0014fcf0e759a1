//! Backend query construction.
//!
//! Listings, favorites and profiles all live in the hosted Postgres REST
//! backend. Reads are expressed as a [`Query`]: a table, a column selection,
//! a list of [`Predicate`]s, ordering and paging. The query renders to the
//! backend's query-string dialect (`price=gte.500000`, `or=(...)`,
//! `order=price.asc`) and the client sends it as-is.

pub mod builder;
pub mod predicate;

pub use builder::{OrderBy, Query};
pub use predicate::{FilterValue, Operator, Predicate};
