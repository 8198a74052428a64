use actix_web::{web, web::Path, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::api::models::{error::APIError, notification::Notification};
use crate::db::models::notification::Notification as DBNotification;
use crate::shards::ShardSet;

#[derive(Deserialize)]
pub struct PathInfo {
    id: Uuid,
}

pub async fn notification(
    shards: web::Data<ShardSet>,
    path: Path<PathInfo>,
) -> Result<HttpResponse, APIError> {
    let id = path.id;

    let conn = shards.primary().get()?;
    let notification = web::block(move || DBNotification::mark_read(&conn, &id)).await?;

    Ok(HttpResponse::Ok().json(Notification::from(notification)))
}
