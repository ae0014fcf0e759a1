//! In-process caching of computed results.

pub mod timed_cache;

pub use timed_cache::TimedCache;
