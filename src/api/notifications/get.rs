use actix_web::{web, web::Query, HttpResponse};
use serde::Deserialize;

use crate::api::models::{common::ListResponse, error::APIError, notification::Notification};
use crate::db::models::notification::Notification as DBNotification;
use crate::shards::ShardSet;

#[derive(Deserialize)]
pub struct Info {
    user_id: String,
    unread_only: Option<bool>,
    page: Option<i64>,
    limit: Option<i64>,
}

pub async fn notifications(
    shards: web::Data<ShardSet>,
    query: Query<Info>,
) -> Result<HttpResponse, APIError> {
    let conn = shards.primary().get()?;
    let user_id = query.user_id.clone();
    let unread_only = query.unread_only.unwrap_or(false);
    let page = query.page.unwrap_or(0);
    let limit = query.limit.unwrap_or(10);

    let (notifications, total_pages) = web::block(move || {
        DBNotification::get_list(&conn, &user_id, unread_only, page, limit)
    })
    .await?;

    let notifications: Vec<Notification> = notifications
        .into_iter()
        .map(|notification| notification.into())
        .collect();

    Ok(HttpResponse::Ok().json(ListResponse {
        page,
        total_pages,
        results: notifications,
    }))
}
