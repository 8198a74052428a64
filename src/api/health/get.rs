use actix_web::{web, HttpResponse};
use chrono::Utc;
use log::warn;

use crate::api::models::{common::Health, error::APIError};
use crate::db::models::mt5_account::Mt5Account;
use crate::shards::ShardSet;

/// Liveness probe. A broken primary degrades the payload but never the
/// status code, load balancers only look for a 200.
pub async fn health(shards: web::Data<ShardSet>) -> Result<HttpResponse, APIError> {
    let active_monitors = match shards.primary().get() {
        Ok(conn) => web::block(move || Mt5Account::count_active(&conn))
            .await
            .map_err(APIError::from),
        Err(error) => Err(error.into()),
    };

    let (status, active_monitors) = match active_monitors {
        Ok(count) => ("ok", count),
        Err(error) => {
            warn!("health check failed: {}", error);
            ("degraded", 0)
        }
    };

    Ok(HttpResponse::Ok().json(Health {
        status: status.to_owned(),
        timestamp: Utc::now().to_rfc3339(),
        active_monitors,
    }))
}
