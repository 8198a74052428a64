use std::convert::{TryFrom, TryInto};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::APIError;
use crate::db::models::affiliate::Affiliate as DBAffiliate;
use crate::db::models::payout::Payout as DBPayout;
use crate::db::models::referral::Referral as DBReferral;

#[derive(Debug, Serialize, Deserialize)]
pub struct Affiliate {
    pub id: Uuid,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub user_id: String,
    pub referral_code: String,
    pub commission_rate: String,
    pub total_referrals: i32,
    pub total_earnings: String,
    pub available_balance: String,
    pub status: AffiliateStatus,
}

impl TryFrom<DBAffiliate> for Affiliate {
    type Error = APIError;

    fn try_from(value: DBAffiliate) -> Result<Self, Self::Error> {
        Ok(Affiliate {
            id: value.id,
            created_at: value.created_at,
            updated_at: value.updated_at,
            user_id: value.user_id,
            referral_code: value.referral_code,
            commission_rate: value.commission_rate.to_string(),
            total_referrals: value.total_referrals,
            total_earnings: value.total_earnings.to_string(),
            available_balance: value.available_balance.to_string(),
            status: value.status.try_into()?,
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Referral {
    pub id: Uuid,
    pub created_at: NaiveDateTime,
    pub affiliate_id: Uuid,
    pub referred_user_id: String,
    pub status: ReferralStatus,
    pub purchase_amount: Option<String>,
    pub commission_amount: Option<String>,
}

impl TryFrom<DBReferral> for Referral {
    type Error = APIError;

    fn try_from(value: DBReferral) -> Result<Self, Self::Error> {
        Ok(Referral {
            id: value.id,
            created_at: value.created_at,
            affiliate_id: value.affiliate_id,
            referred_user_id: value.referred_user_id,
            status: value.status.try_into()?,
            purchase_amount: value.purchase_amount.map(|amount| amount.to_string()),
            commission_amount: value.commission_amount.map(|amount| amount.to_string()),
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Payout {
    pub id: Uuid,
    pub created_at: NaiveDateTime,
    pub affiliate_id: Uuid,
    pub amount: String,
    pub status: PayoutStatus,
}

impl TryFrom<DBPayout> for Payout {
    type Error = APIError;

    fn try_from(value: DBPayout) -> Result<Self, Self::Error> {
        Ok(Payout {
            id: value.id,
            created_at: value.created_at,
            affiliate_id: value.affiliate_id,
            amount: value.amount.to_string(),
            status: value.status.try_into()?,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateAffiliateRequest {
    pub user_id: String,
}

impl CreateAffiliateRequest {
    pub fn validate(&self) -> Result<(), APIError> {
        if self.user_id.trim().is_empty() {
            return Err(APIError::InvalidValue {
                description: "user_id must not be empty".to_owned(),
            });
        }

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct TrackReferralRequest {
    pub referral_code: String,
    pub referred_user_id: String,
}

impl TrackReferralRequest {
    pub fn validate(&self) -> Result<(), APIError> {
        if self.referral_code.trim().is_empty() {
            return Err(APIError::InvalidValue {
                description: "referral_code must not be empty".to_owned(),
            });
        }

        if self.referred_user_id.trim().is_empty() {
            return Err(APIError::InvalidValue {
                description: "referred_user_id must not be empty".to_owned(),
            });
        }

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct RecordPurchaseRequest {
    pub referred_user_id: String,
    pub amount: f64,
}

impl RecordPurchaseRequest {
    pub fn validate(&self) -> Result<(), APIError> {
        if self.referred_user_id.trim().is_empty() {
            return Err(APIError::InvalidValue {
                description: "referred_user_id must not be empty".to_owned(),
            });
        }

        if self.amount <= 0.0 {
            return Err(APIError::InvalidValue {
                description: "amount must be positive".to_owned(),
            });
        }

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct RequestPayoutRequest {
    pub user_id: String,
    pub amount: f64,
}

impl RequestPayoutRequest {
    pub fn validate(&self) -> Result<(), APIError> {
        if self.user_id.trim().is_empty() {
            return Err(APIError::InvalidValue {
                description: "user_id must not be empty".to_owned(),
            });
        }

        if self.amount <= 0.0 {
            return Err(APIError::InvalidValue {
                description: "amount must be positive".to_owned(),
            });
        }

        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct PayoutResponse {
    pub affiliate: Affiliate,
    pub payout: Payout,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Copy, Clone)]
#[serde(rename_all = "lowercase")]
pub enum AffiliateStatus {
    Active = 0,
    Suspended = 1,
}

const ACTIVE: &'static str = "active";
const SUSPENDED: &'static str = "suspended";

impl TryFrom<&str> for AffiliateStatus {
    type Error = APIError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            ACTIVE => Ok(AffiliateStatus::Active),
            SUSPENDED => Ok(AffiliateStatus::Suspended),
            _ => Err(APIError::InvalidValue {
                description: format!("affiliate status cannot be {}", value),
            }),
        }
    }
}

impl TryFrom<i16> for AffiliateStatus {
    type Error = APIError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(AffiliateStatus::Active),
            1 => Ok(AffiliateStatus::Suspended),
            _ => Err(APIError::InvalidValue {
                description: format!("affiliate status cannot be {}", value),
            }),
        }
    }
}

impl Into<&'static str> for AffiliateStatus {
    fn into(self) -> &'static str {
        match self {
            AffiliateStatus::Active => ACTIVE,
            AffiliateStatus::Suspended => SUSPENDED,
        }
    }
}

impl Into<i16> for AffiliateStatus {
    fn into(self) -> i16 {
        match self {
            AffiliateStatus::Active => 0,
            AffiliateStatus::Suspended => 1,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Copy, Clone)]
#[serde(rename_all = "snake_case")]
pub enum ReferralStatus {
    SignedUp = 0,
    Purchased = 1,
}

const SIGNED_UP: &'static str = "signed_up";
const PURCHASED: &'static str = "purchased";

impl TryFrom<&str> for ReferralStatus {
    type Error = APIError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            SIGNED_UP => Ok(ReferralStatus::SignedUp),
            PURCHASED => Ok(ReferralStatus::Purchased),
            _ => Err(APIError::InvalidValue {
                description: format!("referral status cannot be {}", value),
            }),
        }
    }
}

impl TryFrom<i16> for ReferralStatus {
    type Error = APIError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ReferralStatus::SignedUp),
            1 => Ok(ReferralStatus::Purchased),
            _ => Err(APIError::InvalidValue {
                description: format!("referral status cannot be {}", value),
            }),
        }
    }
}

impl Into<&'static str> for ReferralStatus {
    fn into(self) -> &'static str {
        match self {
            ReferralStatus::SignedUp => SIGNED_UP,
            ReferralStatus::Purchased => PURCHASED,
        }
    }
}

impl Into<i16> for ReferralStatus {
    fn into(self) -> i16 {
        match self {
            ReferralStatus::SignedUp => 0,
            ReferralStatus::Purchased => 1,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Copy, Clone)]
#[serde(rename_all = "lowercase")]
pub enum PayoutStatus {
    Pending = 0,
    Paid = 1,
    Rejected = 2,
}

const PENDING: &'static str = "pending";
const PAID: &'static str = "paid";
const REJECTED: &'static str = "rejected";

impl TryFrom<&str> for PayoutStatus {
    type Error = APIError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            PENDING => Ok(PayoutStatus::Pending),
            PAID => Ok(PayoutStatus::Paid),
            REJECTED => Ok(PayoutStatus::Rejected),
            _ => Err(APIError::InvalidValue {
                description: format!("payout status cannot be {}", value),
            }),
        }
    }
}

impl TryFrom<i16> for PayoutStatus {
    type Error = APIError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(PayoutStatus::Pending),
            1 => Ok(PayoutStatus::Paid),
            2 => Ok(PayoutStatus::Rejected),
            _ => Err(APIError::InvalidValue {
                description: format!("payout status cannot be {}", value),
            }),
        }
    }
}

impl Into<&'static str> for PayoutStatus {
    fn into(self) -> &'static str {
        match self {
            PayoutStatus::Pending => PENDING,
            PayoutStatus::Paid => PAID,
            PayoutStatus::Rejected => REJECTED,
        }
    }
}

impl Into<i16> for PayoutStatus {
    fn into(self) -> i16 {
        match self {
            PayoutStatus::Pending => 0,
            PayoutStatus::Paid => 1,
            PayoutStatus::Rejected => 2,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_payout_request_validation() -> () {
        let request = RequestPayoutRequest {
            user_id: "auth0|abc".to_owned(),
            amount: -5.0,
        };
        assert_eq!(request.validate().is_err(), true);

        let request = RequestPayoutRequest {
            amount: 100.0,
            ..request
        };
        assert_eq!(request.validate().is_ok(), true);
    }

    #[test]
    fn test_referral_status_round_trip() -> () {
        for status in vec![ReferralStatus::SignedUp, ReferralStatus::Purchased] {
            let stored: i16 = status.into();
            let restored: ReferralStatus = stored.try_into().expect("status is valid");
            assert_eq!(restored, status);
        }
    }

    #[test]
    fn test_payout_status_rejects_unknown_values() -> () {
        let result: Result<PayoutStatus, APIError> = 7i16.try_into();
        assert_eq!(result.is_err(), true);
    }
}
