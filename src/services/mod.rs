//! Application service layer.
//!
//! Services validate input, resolve the signed-in user and orchestrate the
//! tools. They are the boundary between the MCP handlers and everything
//! below them.

mod account_service;
mod favorite_service;
mod listing_service;
mod property_service;

pub use account_service::{AccountService, AccountServiceImpl, SavedSearchRun};
pub use favorite_service::{FavoriteService, FavoriteServiceImpl};
pub use listing_service::{ListingService, ListingServiceImpl};
pub use property_service::{
    PropertyDetails, PropertyService, PropertyServiceImpl, SearchRequest, SearchResults,
};

use crate::domain::{PropertyId, UserId};
use crate::error::{BackendError, BackendResult};

/// The configured user, or `SignInRequired` carrying `message`.
pub(crate) fn require_user<'a>(
    user: &'a Option<UserId>,
    message: &str,
) -> BackendResult<&'a UserId> {
    user.as_ref()
        .ok_or_else(|| BackendError::SignInRequired(message.to_string()))
}

/// Parse a listing id from tool input.
pub(crate) fn parse_property_id(raw: &str) -> BackendResult<PropertyId> {
    if raw.len() > 100 {
        return Err(BackendError::InvalidRequest(
            "Property ID too long".to_string(),
        ));
    }
    Ok(PropertyId::new(raw)?)
}

/// Today's date as `YYYY-MM-DD` (UTC).
pub(crate) fn today() -> String {
    chrono::Utc::now().date_naive().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_user() {
        let none: Option<UserId> = None;
        match require_user(&none, "Please sign in.") {
            Err(BackendError::SignInRequired(msg)) => assert_eq!(msg, "Please sign in."),
            other => panic!("Expected SignInRequired, got {:?}", other),
        }

        let some = Some(UserId::new("u1").unwrap());
        assert_eq!(require_user(&some, "x").unwrap().as_str(), "u1");
    }

    #[test]
    fn test_parse_property_id() {
        assert!(parse_property_id("  ").is_err());
        assert!(parse_property_id(&"x".repeat(101)).is_err());
        assert_eq!(parse_property_id(" p1 ").unwrap().as_str(), "p1");
    }

    #[test]
    fn test_today_format() {
        let date = today();
        assert_eq!(date.len(), 10);
        assert_eq!(&date[4..5], "-");
    }
}
