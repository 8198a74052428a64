use actix_web::{web, HttpResponse};

use crate::api::models::{
    error::APIError,
    notification::{NewNotificationRequest, Notification},
};
use crate::db::models::notification::{NewNotification, Notification as DBNotification};
use crate::shards::ShardSet;

pub async fn notification(
    shards: web::Data<ShardSet>,
    body: web::Json<NewNotificationRequest>,
) -> Result<HttpResponse, APIError> {
    let request = body.into_inner();
    request.validate()?;

    let conn = shards.primary().get()?;
    let notification = web::block(move || {
        DBNotification::insert(
            &conn,
            &NewNotification {
                user_id: request.user_id,
                title: request.title,
                message: request.message,
                kind: request.kind.unwrap_or_else(|| "general".to_owned()),
            },
        )
    })
    .await?;

    Ok(HttpResponse::Ok().json(Notification::from(notification)))
}
