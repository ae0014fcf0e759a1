//! Marketplace operations behind the MCP tools.
//!
//! - **Search**: listing search from forms, links or saved criteria
//! - **Favorites**: the saved-listing set and its toggle
//! - **Listings**: the owner dashboard
//! - **Market**: cached market figures
//! - **Mortgage** and **display**: pure calculators and formatters

pub mod display;
pub mod favorites;
pub mod listings;
pub mod market;
pub mod mortgage;
pub mod search;

pub use favorites::{FavoriteTools, ToggleOutcome};
pub use listings::ListingTools;
pub use market::{MarketOverview, MarketSnapshot, MarketTools};
pub use mortgage::{MortgageBreakdown, MortgageInput};
pub use search::{PropertySearchTools, SearchOutcome};
