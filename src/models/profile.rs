//! User profile model and the profile form.

use crate::domain::{EmailAddress, PhoneNumber, ValidationError};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Role a user picks on their profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    #[default]
    Buyer,
    Seller,
    Agent,
}

impl UserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Buyer => "buyer",
            UserType::Seller => "seller",
            UserType::Agent => "agent",
        }
    }
}

impl FromStr for UserType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "buyer" => Ok(UserType::Buyer),
            "seller" => Ok(UserType::Seller),
            "agent" => Ok(UserType::Agent),
            other => Err(ValidationError::OutOfRange {
                field: "user type".into(),
                reason: format!("expected buyer, seller or agent, got {}", other),
            }),
        }
    }
}

/// Display attributes of a user. The `id` is the user's id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Profile {
    pub id: String,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub user_type: Option<String>,
    pub avatar_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Profile {
    /// A blank buyer profile for a user signing in for the first time.
    pub fn initial(user_id: &str, email: Option<&str>) -> Self {
        Self {
            id: user_id.to_string(),
            email: Some(email.unwrap_or_default().to_string()),
            full_name: Some(String::new()),
            phone: Some(String::new()),
            user_type: Some(UserType::Buyer.as_str().to_string()),
            avatar_url: Some(String::new()),
            updated_at: None,
        }
    }

    /// Stored user type, defaulting to buyer.
    pub fn user_type(&self) -> UserType {
        self.user_type
            .as_deref()
            .and_then(|t| t.parse().ok())
            .unwrap_or_default()
    }

    /// Up to two uppercase initials from the full name.
    pub fn initials(&self) -> String {
        self.full_name
            .as_deref()
            .unwrap_or_default()
            .split_whitespace()
            .filter_map(|word| word.chars().next())
            .flat_map(char::to_uppercase)
            .take(2)
            .collect()
    }
}

/// The edit-profile form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct ProfileUpdate {
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub user_type: Option<String>,
}

impl ProfileUpdate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.full_name.trim().is_empty() {
            return Err(ValidationError::MissingField("Full name is required".into()));
        }
        if let Some(email) = self.email.as_deref().filter(|e| !e.trim().is_empty()) {
            EmailAddress::new(email)?;
        }
        if let Some(phone) = self.phone.as_deref().filter(|p| !p.trim().is_empty()) {
            PhoneNumber::new(phone)?;
        }
        if let Some(user_type) = self.user_type.as_deref() {
            user_type.parse::<UserType>()?;
        }
        Ok(())
    }

    /// Row for an upsert keyed on the user id, stamped with `updated_at`.
    pub fn to_row(&self, user_id: &str, updated_at: &str) -> serde_json::Value {
        let user_type = self
            .user_type
            .as_deref()
            .and_then(|t| t.parse::<UserType>().ok())
            .unwrap_or_default();

        serde_json::json!({
            "id": user_id,
            "email": self.email.as_deref().map(str::trim),
            "full_name": self.full_name.trim(),
            "phone": self.phone.as_deref().map(str::trim),
            "user_type": user_type.as_str(),
            "updated_at": updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initials() {
        let mut p = Profile::default();
        assert_eq!(p.initials(), "");

        p.full_name = Some("ada lovelace byron".into());
        assert_eq!(p.initials(), "AL");

        p.full_name = Some("Cher".into());
        assert_eq!(p.initials(), "C");
    }

    #[test]
    fn test_initial_profile_is_buyer() {
        let p = Profile::initial("u1", Some("u1@example.com"));
        assert_eq!(p.user_type(), UserType::Buyer);
        assert_eq!(p.email.as_deref(), Some("u1@example.com"));
        assert_eq!(p.full_name.as_deref(), Some(""));
    }

    #[test]
    fn test_profile_update_validation() {
        let mut form = ProfileUpdate {
            full_name: "Jane Doe".into(),
            email: Some("jane@example.com".into()),
            phone: Some("".into()),
            user_type: Some("agent".into()),
        };
        assert!(form.validate().is_ok());

        form.full_name = "".into();
        assert_eq!(form.validate().unwrap_err().to_string(), "Full name is required");

        form.full_name = "Jane".into();
        form.email = Some("not-an-email".into());
        assert!(matches!(form.validate(), Err(ValidationError::InvalidEmail(_))));

        form.email = None;
        form.user_type = Some("landlord".into());
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_profile_update_row() {
        let form = ProfileUpdate {
            full_name: " Jane Doe ".into(),
            user_type: Some("Seller".into()),
            ..Default::default()
        };
        let row = form.to_row("u1", "2024-01-21T00:00:00Z");
        assert_eq!(row["id"], "u1");
        assert_eq!(row["full_name"], "Jane Doe");
        assert_eq!(row["user_type"], "seller");
        assert_eq!(row["updated_at"], "2024-01-21T00:00:00Z");
    }
}
