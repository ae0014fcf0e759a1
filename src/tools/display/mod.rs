//! Presentation helpers: money formatting, listing cards and map markers.

pub mod card;
pub mod format;
pub mod map;

pub use card::PropertyCard;
pub use format::{compact_price, format_currency_cents, format_number, format_percent, format_price};
pub use map::{map_markers, MapMarker, MapView, DEFAULT_CENTER};
