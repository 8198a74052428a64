use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::APIError;
use crate::db::models::notification::Notification as DBNotification;

#[derive(Debug, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub created_at: NaiveDateTime,
    pub user_id: String,
    pub title: String,
    pub message: String,
    pub kind: String,
    pub is_read: bool,
}

impl From<DBNotification> for Notification {
    fn from(value: DBNotification) -> Self {
        Notification {
            id: value.id,
            created_at: value.created_at,
            user_id: value.user_id,
            title: value.title,
            message: value.message,
            kind: value.kind,
            is_read: value.is_read,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct NewNotificationRequest {
    pub user_id: String,
    pub title: String,
    pub message: String,
    pub kind: Option<String>,
}

impl NewNotificationRequest {
    pub fn validate(&self) -> Result<(), APIError> {
        if self.user_id.trim().is_empty() {
            return Err(APIError::InvalidValue {
                description: "user_id must not be empty".to_owned(),
            });
        }

        if self.title.trim().is_empty() {
            return Err(APIError::InvalidValue {
                description: "title must not be empty".to_owned(),
            });
        }

        Ok(())
    }
}
