use std::convert::{TryFrom, TryInto};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::challenge::Challenge;
use super::error::APIError;
use crate::db::models::mt5_account::Mt5Account as DBMt5Account;
use crate::db::models::mt5_account_snapshot::Mt5AccountSnapshot as DBMt5AccountSnapshot;
use crate::db::models::mt5_analytics_cache::Mt5AnalyticsCache as DBMt5AnalyticsCache;
use crate::db::models::rule_violation::RuleViolation as DBRuleViolation;
use crate::shards::ShardId;

#[derive(Debug, Serialize, Deserialize)]
pub struct Mt5Account {
    pub id: Uuid,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub user_id: String,
    pub challenge_id: Uuid,
    pub account_number: String,
    pub server: String,
    pub balance: String,
    pub equity: String,
    pub status: AccountStatus,
}

impl TryFrom<DBMt5Account> for Mt5Account {
    type Error = APIError;

    fn try_from(value: DBMt5Account) -> Result<Self, Self::Error> {
        Ok(Mt5Account {
            id: value.id,
            created_at: value.created_at,
            updated_at: value.updated_at,
            user_id: value.user_id,
            challenge_id: value.challenge_id,
            account_number: value.account_number,
            server: value.server,
            balance: value.balance.to_string(),
            equity: value.equity.to_string(),
            status: value.status.try_into()?,
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Snapshot {
    pub id: Uuid,
    pub created_at: NaiveDateTime,
    pub challenge_id: Uuid,
    pub balance: String,
    pub equity: String,
    pub daily_pnl: String,
    pub total_pnl: String,
    pub is_latest: bool,
}

impl From<DBMt5AccountSnapshot> for Snapshot {
    fn from(value: DBMt5AccountSnapshot) -> Self {
        Snapshot {
            id: value.id,
            created_at: value.created_at,
            challenge_id: value.challenge_id,
            balance: value.balance.to_string(),
            equity: value.equity.to_string(),
            daily_pnl: value.daily_pnl.to_string(),
            total_pnl: value.total_pnl.to_string(),
            is_latest: value.is_latest,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Analytics {
    pub challenge_id: Uuid,
    pub starting_balance: String,
    pub current_balance: String,
    pub current_equity: String,
    pub total_pnl: String,
    pub challenge_status: String,
    pub is_valid: bool,
}

impl From<DBMt5AnalyticsCache> for Analytics {
    fn from(value: DBMt5AnalyticsCache) -> Self {
        Analytics {
            challenge_id: value.challenge_id,
            starting_balance: value.starting_balance.to_string(),
            current_balance: value.current_balance.to_string(),
            current_equity: value.current_equity.to_string(),
            total_pnl: value.total_pnl.to_string(),
            challenge_status: value.challenge_status,
            is_valid: value.is_valid,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AccountDetails {
    pub account: Mt5Account,
    pub latest_snapshot: Option<Snapshot>,
    pub analytics: Option<Analytics>,
}

#[derive(Debug, Deserialize)]
pub struct AssignCredentialsRequest {
    pub challenge_id: Uuid,
    pub user_id: String,
    pub account_number: String,
    pub password: String,
    pub server: String,
    pub account_size: Option<i64>,
}

impl AssignCredentialsRequest {
    pub fn validate(&self) -> Result<(), APIError> {
        if self.user_id.trim().is_empty() {
            return Err(APIError::InvalidValue {
                description: "user_id must not be empty".to_owned(),
            });
        }

        if self.account_number.trim().is_empty() {
            return Err(APIError::InvalidValue {
                description: "account_number must not be empty".to_owned(),
            });
        }

        if self.password.trim().is_empty() {
            return Err(APIError::InvalidValue {
                description: "password must not be empty".to_owned(),
            });
        }

        if self.server.trim().is_empty() {
            return Err(APIError::InvalidValue {
                description: "server must not be empty".to_owned(),
            });
        }

        if let Some(account_size) = self.account_size {
            if account_size <= 0 {
                return Err(APIError::InvalidValue {
                    description: "account_size must be positive".to_owned(),
                });
            }
        }

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct BreachRequest {
    pub reason: String,
    pub db_source: Option<ShardId>,
}

impl BreachRequest {
    pub fn validate(&self) -> Result<(), APIError> {
        if self.reason.trim().is_empty() {
            return Err(APIError::InvalidValue {
                description: "reason must not be empty".to_owned(),
            });
        }

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct IngestSnapshotRequest {
    pub balance: f64,
    pub equity: f64,
    pub daily_pnl: Option<f64>,
}

/// Per step result of a multi step workflow. A failed step reports what went
/// wrong instead of silently pretending success.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum StepOutcome {
    Ok,
    Failed { description: String },
}

impl StepOutcome {
    pub fn failed(error: &APIError) -> StepOutcome {
        StepOutcome::Failed {
            description: error.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AssignmentReport {
    pub account: StepOutcome,
    pub snapshot: StepOutcome,
    pub analytics: StepOutcome,
    pub monitoring: StepOutcome,
    pub email: StepOutcome,
    pub audit: StepOutcome,
}

#[derive(Debug, Serialize)]
pub struct BreachReport {
    pub account: StepOutcome,
    pub notification: StepOutcome,
    pub email: StepOutcome,
    pub monitoring: StepOutcome,
    pub audit: StepOutcome,
}

#[derive(Debug, Serialize)]
pub struct CredentialAssignmentResponse {
    pub challenge: Challenge,
    pub account: Option<Mt5Account>,
    pub report: AssignmentReport,
}

#[derive(Debug, Serialize)]
pub struct BreachResponse {
    pub challenge: Challenge,
    pub report: BreachReport,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Violation {
    pub id: Uuid,
    pub created_at: NaiveDateTime,
    pub challenge_id: Uuid,
    pub rule: String,
    pub severity: ViolationSeverity,
    pub description: Option<String>,
    pub resolved: bool,
}

impl TryFrom<DBRuleViolation> for Violation {
    type Error = APIError;

    fn try_from(value: DBRuleViolation) -> Result<Self, Self::Error> {
        Ok(Violation {
            id: value.id,
            created_at: value.created_at,
            challenge_id: value.challenge_id,
            rule: value.rule,
            severity: value.severity.try_into()?,
            description: value.description,
            resolved: value.resolved,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct NewViolationRequest {
    pub rule: String,
    pub severity: ViolationSeverity,
    pub description: Option<String>,
}

impl NewViolationRequest {
    pub fn validate(&self) -> Result<(), APIError> {
        if self.rule.trim().is_empty() {
            return Err(APIError::InvalidValue {
                description: "rule must not be empty".to_owned(),
            });
        }

        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Copy, Clone)]
#[serde(rename_all = "lowercase")]
pub enum ViolationSeverity {
    Info = 0,
    Warning = 1,
    Critical = 2,
}

const INFO: &'static str = "info";
const WARNING: &'static str = "warning";
const CRITICAL: &'static str = "critical";

impl TryFrom<&str> for ViolationSeverity {
    type Error = APIError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            INFO => Ok(ViolationSeverity::Info),
            WARNING => Ok(ViolationSeverity::Warning),
            CRITICAL => Ok(ViolationSeverity::Critical),
            _ => Err(APIError::InvalidValue {
                description: format!("violation severity cannot be {}", value),
            }),
        }
    }
}

impl TryFrom<i16> for ViolationSeverity {
    type Error = APIError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ViolationSeverity::Info),
            1 => Ok(ViolationSeverity::Warning),
            2 => Ok(ViolationSeverity::Critical),
            _ => Err(APIError::InvalidValue {
                description: format!("violation severity cannot be {}", value),
            }),
        }
    }
}

impl Into<&'static str> for ViolationSeverity {
    fn into(self) -> &'static str {
        match self {
            ViolationSeverity::Info => INFO,
            ViolationSeverity::Warning => WARNING,
            ViolationSeverity::Critical => CRITICAL,
        }
    }
}

impl Into<i16> for ViolationSeverity {
    fn into(self) -> i16 {
        match self {
            ViolationSeverity::Info => 0,
            ViolationSeverity::Warning => 1,
            ViolationSeverity::Critical => 2,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Copy, Clone)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Active = 0,
    Breached = 1,
    Suspended = 2,
    Closed = 3,
}

const ACTIVE: &'static str = "active";
const BREACHED: &'static str = "breached";
const SUSPENDED: &'static str = "suspended";
const CLOSED: &'static str = "closed";

impl TryFrom<&str> for AccountStatus {
    type Error = APIError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            ACTIVE => Ok(AccountStatus::Active),
            BREACHED => Ok(AccountStatus::Breached),
            SUSPENDED => Ok(AccountStatus::Suspended),
            CLOSED => Ok(AccountStatus::Closed),
            _ => Err(APIError::InvalidValue {
                description: format!("account status cannot be {}", value),
            }),
        }
    }
}

impl TryFrom<i16> for AccountStatus {
    type Error = APIError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(AccountStatus::Active),
            1 => Ok(AccountStatus::Breached),
            2 => Ok(AccountStatus::Suspended),
            3 => Ok(AccountStatus::Closed),
            _ => Err(APIError::InvalidValue {
                description: format!("account status cannot be {}", value),
            }),
        }
    }
}

impl Into<&'static str> for AccountStatus {
    fn into(self) -> &'static str {
        match self {
            AccountStatus::Active => ACTIVE,
            AccountStatus::Breached => BREACHED,
            AccountStatus::Suspended => SUSPENDED,
            AccountStatus::Closed => CLOSED,
        }
    }
}

impl Into<i16> for AccountStatus {
    fn into(self) -> i16 {
        match self {
            AccountStatus::Active => 0,
            AccountStatus::Breached => 1,
            AccountStatus::Suspended => 2,
            AccountStatus::Closed => 3,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_step_outcome_serializes_ok_as_status() -> () {
        let json = serde_json::to_value(&StepOutcome::Ok).expect("outcome serializes");

        assert_eq!(json, serde_json::json!({ "status": "ok" }));
    }

    #[test]
    fn test_step_outcome_serializes_failure_with_description() -> () {
        let outcome = StepOutcome::failed(&APIError::EmailError {
            description: "relay refused the message".to_owned(),
        });
        let json = serde_json::to_value(&outcome).expect("outcome serializes");

        assert_eq!(json["status"], "failed");
        assert_eq!(json["description"], "email error: relay refused the message");
    }

    #[test]
    fn test_assignment_report_lists_every_step() -> () {
        let report = AssignmentReport {
            account: StepOutcome::Ok,
            snapshot: StepOutcome::Ok,
            analytics: StepOutcome::Ok,
            monitoring: StepOutcome::Failed {
                description: "monitor service is not configured".to_owned(),
            },
            email: StepOutcome::Ok,
            audit: StepOutcome::Ok,
        };
        let json = serde_json::to_value(&report).expect("report serializes");

        for step in &["account", "snapshot", "analytics", "monitoring", "email", "audit"] {
            assert_eq!(json.get(*step).is_some(), true, "missing step {}", step);
        }
        assert_eq!(json["monitoring"]["status"], "failed");
    }

    #[test]
    fn test_account_status_round_trip() -> () {
        let statuses = vec![
            AccountStatus::Active,
            AccountStatus::Breached,
            AccountStatus::Suspended,
            AccountStatus::Closed,
        ];

        for status in statuses {
            let stored: i16 = status.into();
            let restored: AccountStatus = stored.try_into().expect("status is valid");
            assert_eq!(restored, status);
        }
    }
}
