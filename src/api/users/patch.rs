use actix_web::{web, web::Path, HttpResponse};
use serde::Deserialize;

use crate::api::models::{
    error::APIError,
    user::{UpdateProfileRequest, UserProfile},
};
use crate::db::models::user_profile::{UpdateUserProfile, UserProfile as DBUserProfile};
use crate::shards::ShardSet;

#[derive(Deserialize)]
pub struct PathInfo {
    user_id: String,
}

pub async fn user(
    shards: web::Data<ShardSet>,
    path: Path<PathInfo>,
    body: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse, APIError> {
    let user_id = path.user_id.clone();
    let request = body.into_inner();

    let conn = shards.primary().get()?;
    let profile = web::block(move || {
        DBUserProfile::update(
            &conn,
            &user_id,
            &UpdateUserProfile {
                email: request.email,
                first_name: request.first_name,
                last_name: request.last_name,
                friendly_id: request.friendly_id,
            },
        )
    })
    .await?;

    Ok(HttpResponse::Ok().json(UserProfile::from(profile)))
}
