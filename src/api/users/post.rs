use actix_web::{web, HttpResponse};
use log::info;

use crate::api::models::{
    error::APIError,
    user::{UpsertProfileRequest, UserProfile},
};
use crate::db::models::user_profile::{NewUserProfile, UserProfile as DBUserProfile};
use crate::shards::ShardSet;

pub async fn user(
    shards: web::Data<ShardSet>,
    body: web::Json<UpsertProfileRequest>,
) -> Result<HttpResponse, APIError> {
    let request = body.into_inner();
    request.validate()?;

    let conn = shards.primary().get()?;
    let profile = web::block(move || {
        DBUserProfile::upsert(
            &conn,
            &NewUserProfile {
                user_id: request.user_id,
                email: request.email,
                first_name: request.first_name,
                last_name: request.last_name,
                friendly_id: request.friendly_id,
            },
        )
    })
    .await?;

    info!("stored profile for user {}", profile.user_id);

    Ok(HttpResponse::Ok().json(UserProfile::from(profile)))
}
