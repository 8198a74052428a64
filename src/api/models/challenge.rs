use std::convert::{TryFrom, TryInto};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::APIError;
use crate::db::models::challenge_pricing::ChallengePricing as DBChallengePricing;
use crate::db::models::challenge_type::ChallengeType as DBChallengeType;
use crate::db::models::user_challenge::UserChallenge as DBUserChallenge;

#[derive(Debug, Serialize, Deserialize)]
pub struct Challenge {
    pub id: Uuid,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub user_id: String,
    pub challenge_type_id: Uuid,
    pub challenge_type: Option<String>,
    pub account_size: String,
    pub amount_paid: String,
    pub status: ChallengeStatus,
    pub current_phase: i32,
    pub phase_one_completed: bool,
    pub phase_two_completed: bool,
    pub trading_account_number: Option<String>,
    pub trading_server: Option<String>,
    pub credentials_sent: bool,
    pub purchase_date: NaiveDateTime,
    pub start_date: Option<NaiveDateTime>,
    pub admin_note: Option<String>,
}

impl Challenge {
    /// Trading account passwords stay out of API responses, they are
    /// delivered by email only.
    pub fn from(
        challenge: DBUserChallenge,
        challenge_type: Option<&DBChallengeType>,
    ) -> Result<Challenge, APIError> {
        Ok(Challenge {
            id: challenge.id,
            created_at: challenge.created_at,
            updated_at: challenge.updated_at,
            user_id: challenge.user_id,
            challenge_type_id: challenge.challenge_type_id,
            challenge_type: challenge_type.map(|challenge_type| challenge_type.code.clone()),
            account_size: challenge.account_size.to_string(),
            amount_paid: challenge.amount_paid.to_string(),
            status: challenge.status.try_into()?,
            current_phase: challenge.current_phase,
            phase_one_completed: challenge.phase_one_completed,
            phase_two_completed: challenge.phase_two_completed,
            trading_account_number: challenge.trading_account_number,
            trading_server: challenge.trading_server,
            credentials_sent: challenge.credentials_sent,
            purchase_date: challenge.purchase_date,
            start_date: challenge.start_date,
            admin_note: challenge.admin_note,
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChallengeTypeInfo {
    pub id: Uuid,
    pub code: String,
    pub display_name: String,
    pub description: Option<String>,
    pub tiers: Vec<PricingTierInfo>,
}

impl ChallengeTypeInfo {
    pub fn from(
        challenge_type: DBChallengeType,
        pricing: Vec<DBChallengePricing>,
    ) -> ChallengeTypeInfo {
        ChallengeTypeInfo {
            id: challenge_type.id,
            code: challenge_type.code,
            display_name: challenge_type.display_name,
            description: challenge_type.description,
            tiers: pricing
                .into_iter()
                .map(|tier| PricingTierInfo {
                    account_size: tier.account_size.to_string(),
                    price: tier.price.to_string(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PricingTierInfo {
    pub account_size: String,
    pub price: String,
}

#[derive(Debug, Deserialize)]
pub struct NewChallengeRequest {
    pub user_id: String,
    pub challenge_code: String,
    pub account_size: i64,
    pub coupon_code: Option<String>,
}

impl NewChallengeRequest {
    pub fn validate(&self) -> Result<(), APIError> {
        if self.user_id.trim().is_empty() {
            return Err(APIError::InvalidValue {
                description: "user_id must not be empty".to_owned(),
            });
        }

        if self.challenge_code.trim().is_empty() {
            return Err(APIError::InvalidValue {
                description: "challenge_code must not be empty".to_owned(),
            });
        }

        if self.account_size <= 0 {
            return Err(APIError::InvalidValue {
                description: "account_size must be positive".to_owned(),
            });
        }

        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Quote {
    pub challenge_code: String,
    pub account_size: String,
    pub base_price: String,
    pub discount_percent: i32,
    pub final_price: String,
}

#[derive(Debug, Deserialize)]
pub struct CompletePhaseRequest {
    pub phase: i32,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Copy, Clone)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeStatus {
    PendingPayment = 0,
    Active = 1,
    Breached = 2,
    Rejected = 3,
    Funded = 4,
}

const PENDING_PAYMENT: &'static str = "pending_payment";
const ACTIVE: &'static str = "active";
const BREACHED: &'static str = "breached";
const REJECTED: &'static str = "rejected";
const FUNDED: &'static str = "funded";

impl TryFrom<&str> for ChallengeStatus {
    type Error = APIError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            PENDING_PAYMENT => Ok(ChallengeStatus::PendingPayment),
            ACTIVE => Ok(ChallengeStatus::Active),
            BREACHED => Ok(ChallengeStatus::Breached),
            REJECTED => Ok(ChallengeStatus::Rejected),
            FUNDED => Ok(ChallengeStatus::Funded),
            _ => Err(APIError::InvalidValue {
                description: format!("challenge status cannot be {}", value),
            }),
        }
    }
}

impl TryFrom<i16> for ChallengeStatus {
    type Error = APIError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ChallengeStatus::PendingPayment),
            1 => Ok(ChallengeStatus::Active),
            2 => Ok(ChallengeStatus::Breached),
            3 => Ok(ChallengeStatus::Rejected),
            4 => Ok(ChallengeStatus::Funded),
            _ => Err(APIError::InvalidValue {
                description: format!("challenge status cannot be {}", value),
            }),
        }
    }
}

impl Into<&'static str> for ChallengeStatus {
    fn into(self) -> &'static str {
        match self {
            ChallengeStatus::PendingPayment => PENDING_PAYMENT,
            ChallengeStatus::Active => ACTIVE,
            ChallengeStatus::Breached => BREACHED,
            ChallengeStatus::Rejected => REJECTED,
            ChallengeStatus::Funded => FUNDED,
        }
    }
}

impl Into<i16> for ChallengeStatus {
    fn into(self) -> i16 {
        match self {
            ChallengeStatus::PendingPayment => 0,
            ChallengeStatus::Active => 1,
            ChallengeStatus::Breached => 2,
            ChallengeStatus::Rejected => 3,
            ChallengeStatus::Funded => 4,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_challenge_status_round_trip() -> () {
        let statuses = vec![
            ChallengeStatus::PendingPayment,
            ChallengeStatus::Active,
            ChallengeStatus::Breached,
            ChallengeStatus::Rejected,
            ChallengeStatus::Funded,
        ];

        for status in statuses {
            let stored: i16 = status.into();
            let restored: ChallengeStatus = stored.try_into().expect("status is valid");
            assert_eq!(restored, status);
        }
    }

    #[test]
    fn test_challenge_status_rejects_unknown_values() -> () {
        let result: Result<ChallengeStatus, APIError> = 99i16.try_into();
        assert_eq!(result.is_err(), true);
    }

    #[test]
    fn test_new_challenge_request_validation() -> () {
        let request = NewChallengeRequest {
            user_id: "auth0|abc".to_owned(),
            challenge_code: "CLASSIC".to_owned(),
            account_size: 0,
            coupon_code: None,
        };

        assert_eq!(request.validate().is_err(), true);

        let request = NewChallengeRequest {
            account_size: 10000,
            ..request
        };

        assert_eq!(request.validate().is_ok(), true);
    }
}
