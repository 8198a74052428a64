use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::APIError;
use crate::db::models::user_profile::UserProfile as DBUserProfile;

/// Profiles originate from the external auth provider, `user_id` is its
/// opaque identity key.
#[derive(Debug, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub user_id: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub friendly_id: Option<String>,
}

impl From<DBUserProfile> for UserProfile {
    fn from(value: DBUserProfile) -> Self {
        UserProfile {
            id: value.id,
            created_at: value.created_at,
            updated_at: value.updated_at,
            user_id: value.user_id,
            email: value.email,
            first_name: value.first_name,
            last_name: value.last_name,
            friendly_id: value.friendly_id,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpsertProfileRequest {
    pub user_id: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub friendly_id: Option<String>,
}

impl UpsertProfileRequest {
    pub fn validate(&self) -> Result<(), APIError> {
        if self.user_id.trim().is_empty() {
            return Err(APIError::InvalidValue {
                description: "user_id must not be empty".to_owned(),
            });
        }

        if self.email.trim().is_empty() || !self.email.contains('@') {
            return Err(APIError::InvalidValue {
                description: "email is not valid".to_owned(),
            });
        }

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub friendly_id: Option<String>,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_upsert_profile_request_validation() -> () {
        let request = UpsertProfileRequest {
            user_id: "auth0|abc".to_owned(),
            email: "not-an-email".to_owned(),
            first_name: None,
            last_name: None,
            friendly_id: None,
        };
        assert_eq!(request.validate().is_err(), true);

        let request = UpsertProfileRequest {
            email: "jane@example.com".to_owned(),
            ..request
        };
        assert_eq!(request.validate().is_ok(), true);
    }
}
