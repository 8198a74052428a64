use std::convert::TryFrom;

use actix_web::{web, web::Path, HttpResponse};
use bigdecimal::BigDecimal;
use chrono::Utc;
use log::{info, warn};
use num_traits::FromPrimitive;
use serde::Deserialize;
use uuid::Uuid;

use crate::api::models::{
    account::{
        AccountStatus, AssignCredentialsRequest, AssignmentReport, BreachReport, BreachRequest,
        BreachResponse, CredentialAssignmentResponse, IngestSnapshotRequest, Mt5Account,
        NewViolationRequest, Snapshot, StepOutcome, Violation,
    },
    challenge::Challenge,
    error::APIError,
};
use crate::db::models::{
    challenge_type::ChallengeType,
    monitoring_log::{MonitoringLog, NewMonitoringLog},
    mt5_account::{Mt5Account as DBMt5Account, NewMt5Account},
    mt5_account_snapshot::{Mt5AccountSnapshot as DBMt5AccountSnapshot, NewMt5AccountSnapshot},
    mt5_analytics_cache::{Mt5AnalyticsCache as DBMt5AnalyticsCache, NewMt5AnalyticsCache},
    notification::{NewNotification, Notification},
    rule_violation::{NewRuleViolation, RuleViolation},
    user_challenge::UserChallenge as DBUserChallenge,
    user_profile::UserProfile,
};
use crate::monitoring::MonitorClient;
use crate::notifications;
use crate::shards::{ShardId, ShardSet};
use crate::{Conn, DbPool};

async fn run_step<T, F>(pool: &DbPool, step: F) -> Result<T, APIError>
where
    T: Send + 'static,
    F: FnOnce(&Conn) -> Result<T, APIError> + Send + 'static,
{
    let conn = pool.get()?;
    let result = web::block(move || step(&conn)).await?;

    Ok(result)
}

fn step_outcome<T>(step: &str, challenge_id: &Uuid, result: &Result<T, APIError>) -> StepOutcome {
    match result {
        Ok(_) => StepOutcome::Ok,
        Err(error) => {
            warn!(
                "{} step failed for challenge {}: {}",
                step, challenge_id, error
            );
            StepOutcome::failed(error)
        }
    }
}

/// Assigns trading credentials to a challenge. The challenge update is the
/// only fatal step, everything after it is best-effort and individually
/// reported, a side effect failure never rolls the assignment back.
pub async fn assign_credentials(
    shards: web::Data<ShardSet>,
    monitor: web::Data<MonitorClient>,
    body: web::Json<AssignCredentialsRequest>,
) -> Result<HttpResponse, APIError> {
    let request = body.into_inner();
    request.validate()?;

    let pool = shards.primary().clone();
    let challenge_id = request.challenge_id;

    let (challenge, challenge_type) = {
        let account_number = request.account_number.clone();
        let password = request.password.clone();
        let server = request.server.clone();
        run_step(&pool, move |conn| {
            let challenge = DBUserChallenge::assign_credentials(
                conn,
                &challenge_id,
                &account_number,
                &password,
                &server,
                Utc::now().naive_utc(),
            )?;
            let challenge_type = ChallengeType::get(conn, &challenge.challenge_type_id).ok();

            Ok((challenge, challenge_type))
        })
        .await?
    };

    info!(
        "credentials assigned to challenge {} for user {}",
        challenge_id, challenge.user_id
    );

    let starting_balance = match request.account_size {
        Some(account_size) => BigDecimal::from(account_size),
        None => challenge.account_size.clone(),
    };

    let account_result = {
        let new_account = NewMt5Account {
            user_id: request.user_id.clone(),
            challenge_id,
            account_number: request.account_number.clone(),
            password: request.password.clone(),
            server: request.server.clone(),
            balance: starting_balance.clone(),
            equity: starting_balance.clone(),
            status: AccountStatus::Active.into(),
        };
        run_step(&pool, move |conn| {
            Ok(DBMt5Account::upsert(conn, &new_account)?)
        })
        .await
    };
    let account_step = step_outcome("account", &challenge_id, &account_result);

    let snapshot_result = {
        let new_snapshot = NewMt5AccountSnapshot {
            challenge_id,
            balance: starting_balance.clone(),
            equity: starting_balance.clone(),
            daily_pnl: BigDecimal::from(0),
            total_pnl: BigDecimal::from(0),
            is_latest: true,
        };
        run_step(&pool, move |conn| {
            Ok(DBMt5AccountSnapshot::insert_latest(conn, &new_snapshot)?)
        })
        .await
    };
    let snapshot_step = step_outcome("snapshot", &challenge_id, &snapshot_result);

    let analytics_result = {
        let new_analytics = NewMt5AnalyticsCache {
            challenge_id,
            starting_balance: starting_balance.clone(),
            current_balance: starting_balance.clone(),
            current_equity: starting_balance.clone(),
            total_pnl: BigDecimal::from(0),
            challenge_status: "in_progress".to_owned(),
            is_valid: true,
        };
        run_step(&pool, move |conn| {
            Ok(DBMt5AnalyticsCache::upsert(conn, &new_analytics)?)
        })
        .await
    };
    let analytics_step = step_outcome("analytics", &challenge_id, &analytics_result);

    let monitoring_result = monitor
        .start_monitoring(&challenge_id, &request.account_number, &request.server)
        .await;
    let monitoring_step = step_outcome("monitoring", &challenge_id, &monitoring_result);

    let email_result = {
        let user_id = request.user_id.clone();
        let account_number = request.account_number.clone();
        let password = request.password.clone();
        let server = request.server.clone();
        run_step(&pool, move |conn| {
            let profile = UserProfile::get_by_user_id(conn, &user_id)?;
            notifications::notify_credentials_assigned(&profile, &account_number, &password, &server)
        })
        .await
    };
    let email_step = step_outcome("email", &challenge_id, &email_result);

    let audit_result = {
        let new_log = NewMonitoringLog {
            challenge_id,
            log_type: "credentials_assigned".to_owned(),
            message: format!(
                "trading account {} on {} assigned",
                request.account_number, request.server
            ),
        };
        run_step(&pool, move |conn| Ok(MonitoringLog::insert(conn, &new_log)?)).await
    };
    let audit_step = step_outcome("audit", &challenge_id, &audit_result);

    let account = match account_result {
        Ok(account) => Some(Mt5Account::try_from(account)?),
        Err(_) => None,
    };

    let response = CredentialAssignmentResponse {
        challenge: Challenge::from(challenge, challenge_type.as_ref())?,
        account,
        report: AssignmentReport {
            account: account_step,
            snapshot: snapshot_step,
            analytics: analytics_step,
            monitoring: monitoring_step,
            email: email_step,
            audit: audit_step,
        },
    };

    Ok(HttpResponse::Ok().json(response))
}

#[derive(Deserialize)]
pub struct PathInfo {
    challenge_id: Uuid,
}

/// Marks a challenge as breached on the targeted shard. The user facing
/// notification always lands in the primary database, profiles of migrated
/// users only exist there.
pub async fn breach(
    shards: web::Data<ShardSet>,
    monitor: web::Data<MonitorClient>,
    path: Path<PathInfo>,
    body: web::Json<BreachRequest>,
) -> Result<HttpResponse, APIError> {
    let request = body.into_inner();
    request.validate()?;

    let challenge_id = path.challenge_id;
    let shard_id = request.db_source.unwrap_or(ShardId::Primary);
    let pool = shards.get(shard_id)?;

    let challenge = {
        let reason = request.reason.clone();
        run_step(&pool, move |conn| {
            Ok(DBUserChallenge::mark_breached(conn, &challenge_id, &reason)?)
        })
        .await?
    };

    info!(
        "challenge {} marked breached on {} shard: {}",
        challenge_id, shard_id, request.reason
    );

    let account_result = run_step(&pool, move |conn| {
        Ok(DBMt5Account::set_status(
            conn,
            &challenge_id,
            AccountStatus::Breached,
        )?)
    })
    .await;
    let account_step = step_outcome("account", &challenge_id, &account_result);

    let primary = shards.primary().clone();

    let notification_result = {
        let new_notification = NewNotification {
            user_id: challenge.user_id.clone(),
            title: "Challenge breached".to_owned(),
            message: format!("Your challenge has been breached: {}", request.reason),
            kind: "challenge_breached".to_owned(),
        };
        run_step(&primary, move |conn| {
            Ok(Notification::insert(conn, &new_notification)?)
        })
        .await
    };
    let notification_step = step_outcome("notification", &challenge_id, &notification_result);

    let email_result = {
        let user_id = challenge.user_id.clone();
        let reason = request.reason.clone();
        run_step(&primary, move |conn| {
            let profile = UserProfile::get_by_user_id(conn, &user_id)?;
            notifications::notify_challenge_breached(&profile, &reason)
        })
        .await
    };
    let email_step = step_outcome("email", &challenge_id, &email_result);

    let monitoring_result = monitor.stop_monitoring(&challenge_id).await;
    let monitoring_step = step_outcome("monitoring", &challenge_id, &monitoring_result);

    let audit_result = {
        let new_log = NewMonitoringLog {
            challenge_id,
            log_type: "breached".to_owned(),
            message: format!(
                "challenge breached on {} shard: {}",
                shard_id, request.reason
            ),
        };
        run_step(&primary, move |conn| Ok(MonitoringLog::insert(conn, &new_log)?)).await
    };
    let audit_step = step_outcome("audit", &challenge_id, &audit_result);

    let response = BreachResponse {
        challenge: Challenge::from(challenge, None)?,
        report: BreachReport {
            account: account_step,
            notification: notification_step,
            email: email_step,
            monitoring: monitoring_step,
            audit: audit_step,
        },
    };

    Ok(HttpResponse::Ok().json(response))
}

/// Ingest endpoint for the external monitor service, records a fresh balance
/// reading as the latest snapshot and refreshes the analytics cache.
pub async fn ingest_snapshot(
    shards: web::Data<ShardSet>,
    path: Path<PathInfo>,
    body: web::Json<IngestSnapshotRequest>,
) -> Result<HttpResponse, APIError> {
    let request = body.into_inner();
    let challenge_id = path.challenge_id;

    let balance = BigDecimal::from_f64(request.balance).ok_or(APIError::InvalidValue {
        description: format!("balance cannot be {}", request.balance),
    })?;
    let equity = BigDecimal::from_f64(request.equity).ok_or(APIError::InvalidValue {
        description: format!("equity cannot be {}", request.equity),
    })?;
    let daily_pnl = match request.daily_pnl {
        Some(daily_pnl) => BigDecimal::from_f64(daily_pnl).ok_or(APIError::InvalidValue {
            description: format!("daily_pnl cannot be {}", daily_pnl),
        })?,
        None => BigDecimal::from(0),
    };

    let conn = shards.primary().get()?;
    let snapshot = web::block::<_, _, APIError>(move || {
        let analytics = DBMt5AnalyticsCache::refresh(&conn, &challenge_id, &balance, &equity)?;
        let total_pnl = analytics
            .map(|analytics| analytics.total_pnl)
            .unwrap_or_else(|| BigDecimal::from(0));

        if let Err(error) = DBMt5Account::update_balances(&conn, &challenge_id, &balance, &equity)
        {
            warn!(
                "balance update failed for challenge {}: {}",
                challenge_id, error
            );
        }

        Ok(DBMt5AccountSnapshot::insert_latest(
            &conn,
            &NewMt5AccountSnapshot {
                challenge_id,
                balance,
                equity,
                daily_pnl,
                total_pnl,
                is_latest: true,
            },
        )?)
    })
    .await?;

    Ok(HttpResponse::Ok().json(Snapshot::from(snapshot)))
}

pub async fn ingest_violation(
    shards: web::Data<ShardSet>,
    path: Path<PathInfo>,
    body: web::Json<NewViolationRequest>,
) -> Result<HttpResponse, APIError> {
    let request = body.into_inner();
    request.validate()?;

    let challenge_id = path.challenge_id;
    let conn = shards.primary().get()?;

    let violation = web::block::<_, _, APIError>(move || {
        Ok(RuleViolation::insert(
            &conn,
            &NewRuleViolation {
                challenge_id,
                rule: request.rule.clone(),
                severity: request.severity.into(),
                description: request.description.clone(),
            },
        )?)
    })
    .await?;

    info!(
        "rule violation recorded for challenge {}: {}",
        challenge_id, violation.rule
    );

    Ok(HttpResponse::Ok().json(Violation::try_from(violation)?))
}
