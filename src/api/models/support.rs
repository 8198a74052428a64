use std::convert::{TryFrom, TryInto};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::APIError;
use crate::db::models::support_ticket::SupportTicket as DBSupportTicket;
use crate::db::models::ticket_message::TicketMessage as DBTicketMessage;

#[derive(Debug, Serialize, Deserialize)]
pub struct Ticket {
    pub id: Uuid,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub user_id: String,
    pub subject: String,
    pub status: TicketStatus,
}

impl TryFrom<DBSupportTicket> for Ticket {
    type Error = APIError;

    fn try_from(value: DBSupportTicket) -> Result<Self, Self::Error> {
        Ok(Ticket {
            id: value.id,
            created_at: value.created_at,
            updated_at: value.updated_at,
            user_id: value.user_id,
            subject: value.subject,
            status: value.status.try_into()?,
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TicketMessage {
    pub id: Uuid,
    pub created_at: NaiveDateTime,
    pub ticket_id: Uuid,
    pub sender_id: String,
    pub body: String,
    pub from_support: bool,
}

impl From<DBTicketMessage> for TicketMessage {
    fn from(value: DBTicketMessage) -> Self {
        TicketMessage {
            id: value.id,
            created_at: value.created_at,
            ticket_id: value.ticket_id,
            sender_id: value.sender_id,
            body: value.body,
            from_support: value.from_support,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TicketDetails {
    pub ticket: Ticket,
    pub messages: Vec<TicketMessage>,
}

#[derive(Debug, Deserialize)]
pub struct NewTicketRequest {
    pub user_id: String,
    pub subject: String,
    pub message: Option<String>,
}

impl NewTicketRequest {
    pub fn validate(&self) -> Result<(), APIError> {
        if self.user_id.trim().is_empty() {
            return Err(APIError::InvalidValue {
                description: "user_id must not be empty".to_owned(),
            });
        }

        if self.subject.trim().is_empty() {
            return Err(APIError::InvalidValue {
                description: "subject must not be empty".to_owned(),
            });
        }

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct NewTicketMessageRequest {
    pub sender_id: String,
    pub body: String,
    pub from_support: Option<bool>,
}

impl NewTicketMessageRequest {
    pub fn validate(&self) -> Result<(), APIError> {
        if self.sender_id.trim().is_empty() {
            return Err(APIError::InvalidValue {
                description: "sender_id must not be empty".to_owned(),
            });
        }

        if self.body.trim().is_empty() {
            return Err(APIError::InvalidValue {
                description: "body must not be empty".to_owned(),
            });
        }

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateTicketRequest {
    pub status: TicketStatus,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Copy, Clone)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Open = 0,
    InProgress = 1,
    Closed = 2,
}

const OPEN: &'static str = "open";
const IN_PROGRESS: &'static str = "in_progress";
const CLOSED: &'static str = "closed";

impl TryFrom<&str> for TicketStatus {
    type Error = APIError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            OPEN => Ok(TicketStatus::Open),
            IN_PROGRESS => Ok(TicketStatus::InProgress),
            CLOSED => Ok(TicketStatus::Closed),
            _ => Err(APIError::InvalidValue {
                description: format!("ticket status cannot be {}", value),
            }),
        }
    }
}

impl TryFrom<i16> for TicketStatus {
    type Error = APIError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(TicketStatus::Open),
            1 => Ok(TicketStatus::InProgress),
            2 => Ok(TicketStatus::Closed),
            _ => Err(APIError::InvalidValue {
                description: format!("ticket status cannot be {}", value),
            }),
        }
    }
}

impl Into<&'static str> for TicketStatus {
    fn into(self) -> &'static str {
        match self {
            TicketStatus::Open => OPEN,
            TicketStatus::InProgress => IN_PROGRESS,
            TicketStatus::Closed => CLOSED,
        }
    }
}

impl Into<i16> for TicketStatus {
    fn into(self) -> i16 {
        match self {
            TicketStatus::Open => 0,
            TicketStatus::InProgress => 1,
            TicketStatus::Closed => 2,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_ticket_status_round_trip() -> () {
        for status in vec![
            TicketStatus::Open,
            TicketStatus::InProgress,
            TicketStatus::Closed,
        ] {
            let stored: i16 = status.into();
            let restored: TicketStatus = stored.try_into().expect("status is valid");
            assert_eq!(restored, status);
        }
    }

    #[test]
    fn test_new_ticket_request_validation() -> () {
        let request = NewTicketRequest {
            user_id: "auth0|abc".to_owned(),
            subject: "  ".to_owned(),
            message: None,
        };

        assert_eq!(request.validate().is_err(), true);
    }
}
