use std::convert::TryFrom;

use actix_web::{web, web::Path, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::api::models::{account::Violation, error::APIError};
use crate::db::models::rule_violation::RuleViolation;
use crate::shards::ShardSet;

#[derive(Deserialize)]
pub struct PathInfo {
    id: Uuid,
}

pub async fn resolve_violation(
    shards: web::Data<ShardSet>,
    path: Path<PathInfo>,
) -> Result<HttpResponse, APIError> {
    let conn = shards.primary().get()?;
    let id = path.id;

    let violation = web::block(move || RuleViolation::resolve(&conn, &id)).await?;

    Ok(HttpResponse::Ok().json(Violation::try_from(violation)?))
}
