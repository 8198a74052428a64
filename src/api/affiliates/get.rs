use std::convert::TryInto;

use actix_web::{web, web::Path, HttpResponse};
use serde::Deserialize;

use crate::api::models::{
    affiliate::{Affiliate, Payout, Referral},
    error::APIError,
};
use crate::db::models::{
    affiliate::Affiliate as DBAffiliate, payout::Payout as DBPayout,
    referral::Referral as DBReferral,
};
use crate::shards::ShardSet;

#[derive(Deserialize)]
pub struct PathInfo {
    user_id: String,
}

pub async fn affiliate(
    shards: web::Data<ShardSet>,
    path: Path<PathInfo>,
) -> Result<HttpResponse, APIError> {
    let user_id = path.user_id.clone();

    let conn = shards.primary().get()?;
    let affiliate =
        web::block(move || DBAffiliate::get_by_user_id(&conn, &user_id)).await?;

    let affiliate: Affiliate = affiliate.try_into()?;

    Ok(HttpResponse::Ok().json(affiliate))
}

pub async fn referrals(
    shards: web::Data<ShardSet>,
    path: Path<PathInfo>,
) -> Result<HttpResponse, APIError> {
    let user_id = path.user_id.clone();

    let conn = shards.primary().get()?;
    let referrals = web::block(move || {
        let affiliate = DBAffiliate::get_by_user_id(&conn, &user_id)?;
        DBReferral::get_for_affiliate(&conn, &affiliate.id)
    })
    .await?;

    let referrals = referrals
        .into_iter()
        .map(|referral| referral.try_into())
        .collect::<Result<Vec<Referral>, APIError>>()?;

    Ok(HttpResponse::Ok().json(referrals))
}

pub async fn payouts(
    shards: web::Data<ShardSet>,
    path: Path<PathInfo>,
) -> Result<HttpResponse, APIError> {
    let user_id = path.user_id.clone();

    let conn = shards.primary().get()?;
    let payouts = web::block(move || {
        let affiliate = DBAffiliate::get_by_user_id(&conn, &user_id)?;
        DBPayout::get_for_affiliate(&conn, &affiliate.id)
    })
    .await?;

    let payouts = payouts
        .into_iter()
        .map(|payout| payout.try_into())
        .collect::<Result<Vec<Payout>, APIError>>()?;

    Ok(HttpResponse::Ok().json(payouts))
}
