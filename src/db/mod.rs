use actix_web::web;
use log::info;

use crate::{
    api::models::error::APIError, settings::ChallengeTypeSettings, DbPool,
};

use self::models::challenge_type::ChallengeType;

pub mod models;
pub mod schema;

/// Reconciles the challenge catalog with the configuration file on startup.
/// Types and pricing tiers are added or updated in place, tiers that
/// disappeared from the configuration are removed.
pub async fn sync_catalog(
    pool: &DbPool,
    challenge_types: Vec<ChallengeTypeSettings>,
) -> Result<(), APIError> {
    let conn = pool.get()?;
    let changes = web::block::<_, _, APIError>(move || {
        ChallengeType::sync(&conn, &challenge_types)
    })
    .await?;

    if changes > 0 {
        info!("challenge catalog synced, {} changes applied", changes);
    }

    Ok(())
}
