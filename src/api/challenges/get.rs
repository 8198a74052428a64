use actix_web::{
    web,
    web::{Path, Query},
    HttpResponse,
};
use bigdecimal::BigDecimal;
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::api::models::{
    challenge::{Challenge, ChallengeStatus, ChallengeTypeInfo, Quote},
    common::ListResponse,
    error::APIError,
};
use crate::db::models::{
    challenge_pricing::ChallengePricing,
    challenge_type::ChallengeType,
    coupon::{apply_discount, Coupon},
    user_challenge::UserChallenge as DBUserChallenge,
};
use crate::shards::ShardSet;

pub async fn challenge_types(shards: web::Data<ShardSet>) -> Result<HttpResponse, APIError> {
    let conn = shards.primary().get()?;

    let challenge_types =
        web::block::<_, _, APIError>(move || Ok(ChallengeType::get_all_with_pricing(&conn)?))
            .await?;

    let challenge_types = challenge_types
        .into_iter()
        .map(|(challenge_type, pricing)| ChallengeTypeInfo::from(challenge_type, pricing))
        .collect::<Vec<_>>();

    Ok(HttpResponse::Ok().json(challenge_types))
}

#[derive(Deserialize)]
pub struct Info {
    user_id: Option<String>,
    status: Option<ChallengeStatus>,
    page: Option<i64>,
    limit: Option<i64>,
}

/// A user's challenges come paged from the primary shard. Without a user
/// filter this is the admin view, merged over every shard by challenge id.
pub async fn challenges(
    shards: web::Data<ShardSet>,
    query: Query<Info>,
) -> Result<HttpResponse, APIError> {
    if query.user_id.is_none() {
        let merged = shards
            .collect_merged(
                |conn| DBUserChallenge::get_all_with_type(conn),
                |(challenge, _)| challenge.id,
            )
            .await;

        let challenges = merged
            .into_iter()
            .map(|(challenge, challenge_type)| Challenge::from(challenge, Some(&challenge_type)))
            .collect::<Result<Vec<_>, _>>()?;

        return Ok(HttpResponse::Ok().json(ListResponse {
            page: 0,
            total_pages: 1,
            results: challenges,
        }));
    }

    let conn = shards.primary().get()?;
    let user_id = query.user_id.clone();
    let status = query.status;
    let page = query.page.unwrap_or(0);
    let limit = query.limit.unwrap_or(10);

    let (challenges, total_pages) = web::block::<_, _, APIError>(move || {
        Ok(DBUserChallenge::get_list(&conn, user_id, status, page, limit)?)
    })
    .await?;

    let challenges = challenges
        .into_iter()
        .map(|(challenge, challenge_type)| Challenge::from(challenge, Some(&challenge_type)))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(HttpResponse::Ok().json(ListResponse {
        page,
        total_pages,
        results: challenges,
    }))
}

#[derive(Deserialize)]
pub struct PathInfo {
    id: Uuid,
}

pub async fn challenge(
    shards: web::Data<ShardSet>,
    path: Path<PathInfo>,
) -> Result<HttpResponse, APIError> {
    let conn = shards.primary().get()?;
    let id = path.id;

    let (challenge, challenge_type) =
        web::block::<_, _, APIError>(move || Ok(DBUserChallenge::get_with_type(&conn, &id)?))
            .await?;

    Ok(HttpResponse::Ok().json(Challenge::from(challenge, Some(&challenge_type))?))
}

#[derive(Deserialize)]
pub struct QuoteInfo {
    challenge_code: String,
    account_size: i64,
    coupon_code: Option<String>,
}

/// Composes challenge type, pricing tier and an optional coupon into the
/// final price the storefront displays.
pub async fn quote(
    shards: web::Data<ShardSet>,
    query: Query<QuoteInfo>,
) -> Result<HttpResponse, APIError> {
    let conn = shards.primary().get()?;
    let challenge_code = query.challenge_code.clone();
    let account_size = BigDecimal::from(query.account_size);
    let coupon_code = query.coupon_code.clone();

    let quote = web::block::<_, _, APIError>(move || {
        let challenge_type = ChallengeType::get_by_code(&conn, &challenge_code).map_err(
            |error| match error {
                diesel::result::Error::NotFound => APIError::InvalidValue {
                    description: format!("unknown challenge type {}", challenge_code),
                },
                other => other.into(),
            },
        )?;
        let tier = ChallengePricing::get_tier(&conn, &challenge_type.id, &account_size).map_err(
            |error| match error {
                diesel::result::Error::NotFound => APIError::InvalidValue {
                    description: format!(
                        "no {} tier for account size {}",
                        challenge_code, account_size
                    ),
                },
                other => other.into(),
            },
        )?;

        let discount_percent = match coupon_code {
            Some(coupon_code) => {
                let result = Coupon::validate(
                    &conn,
                    &coupon_code,
                    &challenge_type.code,
                    Utc::now().naive_utc(),
                )?;
                if !result.valid {
                    return Err(APIError::InvalidValue {
                        description: result.message,
                    });
                }
                result.discount_percent.unwrap_or(0)
            }
            None => 0,
        };

        Ok(Quote {
            challenge_code: challenge_type.code,
            account_size: tier.account_size.to_string(),
            base_price: tier.price.to_string(),
            discount_percent,
            final_price: apply_discount(&tier.price, discount_percent).to_string(),
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(quote))
}
