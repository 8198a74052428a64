use actix_web::{web, web::Path, HttpResponse};
use serde::Deserialize;

use crate::api::models::{error::APIError, user::UserProfile};
use crate::db::models::user_profile::UserProfile as DBUserProfile;
use crate::shards::ShardSet;

/// Merged admin view over every shard that carries profile rows. The same
/// user can exist on several shards, the highest precedence copy wins.
pub async fn users(shards: web::Data<ShardSet>) -> Result<HttpResponse, APIError> {
    let profiles = shards
        .collect_merged(
            |conn| DBUserProfile::get_all(conn),
            |profile| profile.user_id.clone(),
        )
        .await;

    let profiles: Vec<UserProfile> = profiles.into_iter().map(|profile| profile.into()).collect();

    Ok(HttpResponse::Ok().json(profiles))
}

#[derive(Deserialize)]
pub struct PathInfo {
    user_id: String,
}

pub async fn user(
    shards: web::Data<ShardSet>,
    path: Path<PathInfo>,
) -> Result<HttpResponse, APIError> {
    let user_id = path.user_id.clone();

    let conn = shards.primary().get()?;
    let profile = web::block(move || DBUserProfile::get_by_user_id(&conn, &user_id)).await?;

    Ok(HttpResponse::Ok().json(UserProfile::from(profile)))
}
