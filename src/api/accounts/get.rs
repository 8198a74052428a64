use std::convert::TryFrom;

use actix_web::{
    web,
    web::{Path, Query},
    HttpResponse,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::api::models::{
    account::{AccountDetails, Analytics, Mt5Account, Snapshot, Violation},
    common::ListResponse,
    error::APIError,
};
use crate::db::models::mt5_account::Mt5Account as DBMt5Account;
use crate::db::models::mt5_account_snapshot::Mt5AccountSnapshot as DBMt5AccountSnapshot;
use crate::db::models::mt5_analytics_cache::Mt5AnalyticsCache as DBMt5AnalyticsCache;
use crate::db::models::rule_violation::RuleViolation as DBRuleViolation;
use crate::shards::ShardSet;

/// Admin view over every shard, merged by account number.
pub async fn accounts(shards: web::Data<ShardSet>) -> Result<HttpResponse, APIError> {
    let merged = shards
        .collect_merged(
            |conn| DBMt5Account::get_all(conn),
            |account| account.account_number.clone(),
        )
        .await;

    let accounts = merged
        .into_iter()
        .map(Mt5Account::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(HttpResponse::Ok().json(accounts))
}

#[derive(Deserialize)]
pub struct PathInfo {
    challenge_id: Uuid,
}

pub async fn account(
    shards: web::Data<ShardSet>,
    path: Path<PathInfo>,
) -> Result<HttpResponse, APIError> {
    let conn = shards.primary().get()?;
    let challenge_id = path.challenge_id;

    let (account, snapshot, analytics) = web::block::<_, _, APIError>(move || {
        let account = DBMt5Account::get_by_challenge(&conn, &challenge_id)?;
        let snapshot = DBMt5AccountSnapshot::get_latest(&conn, &challenge_id)?;
        let analytics = DBMt5AnalyticsCache::get_for_challenge(&conn, &challenge_id)?;

        Ok((account, snapshot, analytics))
    })
    .await?;

    let details = AccountDetails {
        account: Mt5Account::try_from(account)?,
        latest_snapshot: snapshot.map(Snapshot::from),
        analytics: analytics.map(Analytics::from),
    };

    Ok(HttpResponse::Ok().json(details))
}

#[derive(Deserialize)]
pub struct SnapshotsInfo {
    page: Option<i64>,
    limit: Option<i64>,
}

pub async fn snapshots(
    shards: web::Data<ShardSet>,
    path: Path<PathInfo>,
    query: Query<SnapshotsInfo>,
) -> Result<HttpResponse, APIError> {
    let conn = shards.primary().get()?;
    let challenge_id = path.challenge_id;

    let page = query.page.unwrap_or(0);
    let limit = query.limit.unwrap_or(10);

    let (snapshots, total_pages) = web::block::<_, _, APIError>(move || {
        Ok(DBMt5AccountSnapshot::get_list(
            &conn,
            &challenge_id,
            page,
            limit,
        )?)
    })
    .await?;

    Ok(HttpResponse::Ok().json(ListResponse {
        page,
        total_pages,
        results: snapshots.into_iter().map(Snapshot::from).collect::<Vec<_>>(),
    }))
}

#[derive(Deserialize)]
pub struct ViolationsInfo {
    resolved: Option<bool>,
}

pub async fn violations(
    shards: web::Data<ShardSet>,
    path: Path<PathInfo>,
    query: Query<ViolationsInfo>,
) -> Result<HttpResponse, APIError> {
    let conn = shards.primary().get()?;
    let challenge_id = path.challenge_id;
    let resolved = query.resolved;

    let violations = web::block::<_, _, APIError>(move || {
        Ok(DBRuleViolation::get_for_challenge(
            &conn,
            &challenge_id,
            resolved,
        )?)
    })
    .await?;

    let violations = violations
        .into_iter()
        .map(Violation::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(HttpResponse::Ok().json(violations))
}
