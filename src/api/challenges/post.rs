use std::convert::TryInto;

use actix_web::{web, web::Path, HttpResponse};
use bigdecimal::BigDecimal;
use chrono::Utc;
use diesel::Connection;
use log::{info, warn};
use serde::Deserialize;
use uuid::Uuid;

use crate::api::models::{
    challenge::{Challenge, ChallengeStatus, CompletePhaseRequest, NewChallengeRequest},
    coupon::ValidateCouponRequest,
    error::APIError,
};
use crate::db::models::{
    challenge_pricing::ChallengePricing,
    challenge_type::ChallengeType,
    coupon::{apply_discount, Coupon},
    notification::{NewNotification, Notification},
    user_challenge::{NewUserChallenge, UserChallenge as DBUserChallenge},
    user_profile::UserProfile,
};
use crate::notifications;
use crate::shards::ShardSet;

/// The coupon business rules live in [`Coupon::evaluate`], this endpoint only
/// answers the storefront's pre-purchase check. Both outcomes are 200,
/// `valid` carries the verdict.
pub async fn validate_coupon(
    shards: web::Data<ShardSet>,
    body: web::Json<ValidateCouponRequest>,
) -> Result<HttpResponse, APIError> {
    let request = body.into_inner();
    request.validate()?;

    let conn = shards.primary().get()?;

    let result = web::block::<_, _, APIError>(move || {
        Ok(Coupon::validate(
            &conn,
            &request.coupon_code,
            &request.challenge_type,
            Utc::now().naive_utc(),
        )?)
    })
    .await?;

    Ok(HttpResponse::Ok().json(result))
}

/// Purchase: resolves the type and pricing tier, applies an optional coupon
/// and inserts the challenge. A coupon that makes the challenge free
/// activates it right away, otherwise the challenge awaits payment.
pub async fn challenge(
    shards: web::Data<ShardSet>,
    body: web::Json<NewChallengeRequest>,
) -> Result<HttpResponse, APIError> {
    let request = body.into_inner();
    request.validate()?;

    let conn = shards.primary().get()?;
    let user_id = request.user_id.clone();
    let challenge_code = request.challenge_code.clone();
    let account_size = BigDecimal::from(request.account_size);
    let coupon_code = request.coupon_code.clone();

    let (challenge, challenge_type) = web::block::<_, _, APIError>(move || {
        conn.transaction(|| {
            let challenge_type = ChallengeType::get_by_code(&conn, &challenge_code).map_err(
                |error| match error {
                    diesel::result::Error::NotFound => APIError::InvalidValue {
                        description: format!("unknown challenge type {}", challenge_code),
                    },
                    other => other.into(),
                },
            )?;
            let tier = ChallengePricing::get_tier(&conn, &challenge_type.id, &account_size)
                .map_err(|error| match error {
                    diesel::result::Error::NotFound => APIError::InvalidValue {
                        description: format!(
                            "no {} tier for account size {}",
                            challenge_code, account_size
                        ),
                    },
                    other => other.into(),
                })?;

            // the coupon is resolved once, case insensitively, and redeemed
            // below by its id so validation and redemption cannot disagree
            let (discount_percent, coupon_id) = match &coupon_code {
                Some(coupon_code) => {
                    let coupon = Coupon::get_by_code(&conn, coupon_code)?.ok_or_else(|| {
                        APIError::InvalidValue {
                            description: "Invalid coupon code".to_owned(),
                        }
                    })?;
                    let result = coupon.evaluate(&challenge_type.code, Utc::now().naive_utc());
                    if !result.valid {
                        return Err(APIError::InvalidValue {
                            description: result.message,
                        });
                    }
                    (result.discount_percent.unwrap_or(0), Some(coupon.id))
                }
                None => (0, None),
            };

            let amount_paid = apply_discount(&tier.price, discount_percent);
            let status = if amount_paid == BigDecimal::from(0) {
                ChallengeStatus::Active
            } else {
                ChallengeStatus::PendingPayment
            };

            let challenge = DBUserChallenge::insert(
                &conn,
                &NewUserChallenge {
                    user_id: user_id.clone(),
                    challenge_type_id: challenge_type.id,
                    account_size: tier.account_size.clone(),
                    amount_paid,
                    status: status.into(),
                },
            )?;

            if let Some(coupon_id) = coupon_id {
                Coupon::redeem(&conn, &coupon_id)?;
            }

            Ok((challenge, challenge_type))
        })
    })
    .await?;

    info!(
        "user {} purchased {} challenge {}",
        challenge.user_id, challenge_type.code, challenge.id
    );

    let pool = shards.primary().clone();
    let notify_user_id = challenge.user_id.clone();
    let challenge_name = challenge_type.display_name.clone();
    let notify_account_size = challenge.account_size.to_string();
    let notify_amount_paid = challenge.amount_paid.to_string();
    let conn = pool.get()?;
    let side_effects = web::block::<_, _, APIError>(move || {
        Notification::insert(
            &conn,
            &NewNotification {
                user_id: notify_user_id.clone(),
                title: "Challenge purchased".to_owned(),
                message: format!("Your {} is ready to start", challenge_name),
                kind: "challenge_purchased".to_owned(),
            },
        )?;

        let profile = UserProfile::get_by_user_id(&conn, &notify_user_id)?;
        notifications::notify_challenge_purchased(
            &profile,
            &challenge_name,
            &notify_account_size,
            &notify_amount_paid,
        )
    })
    .await;
    if let Err(error) = side_effects {
        let error: APIError = error.into();
        warn!(
            "purchase side effects failed for challenge {}: {}",
            challenge.id, error
        );
    }

    Ok(HttpResponse::Ok().json(Challenge::from(challenge, Some(&challenge_type))?))
}

#[derive(Deserialize)]
pub struct PathInfo {
    id: Uuid,
}

pub async fn complete_phase(
    shards: web::Data<ShardSet>,
    path: Path<PathInfo>,
    body: web::Json<CompletePhaseRequest>,
) -> Result<HttpResponse, APIError> {
    let id = path.id;
    let phase = body.phase;

    let conn = shards.primary().get()?;
    let challenge =
        web::block::<_, _, APIError>(move || DBUserChallenge::complete_phase(&conn, &id, phase))
            .await?;

    let status: ChallengeStatus = challenge.status.try_into()?;
    let funded = status == ChallengeStatus::Funded;

    info!(
        "challenge {} completed phase {}{}",
        id,
        phase,
        if funded { ", now funded" } else { "" }
    );

    let pool = shards.primary().clone();
    let notify_user_id = challenge.user_id.clone();
    let conn = pool.get()?;
    let side_effects = web::block::<_, _, APIError>(move || {
        let (title, message) = if funded {
            (
                "You are funded".to_owned(),
                "You passed the final evaluation phase".to_owned(),
            )
        } else {
            (
                format!("Phase {} completed", phase),
                format!("Phase {} is done, the next phase has started", phase),
            )
        };
        Notification::insert(
            &conn,
            &NewNotification {
                user_id: notify_user_id.clone(),
                title,
                message,
                kind: "phase_completed".to_owned(),
            },
        )?;

        let profile = UserProfile::get_by_user_id(&conn, &notify_user_id)?;
        notifications::notify_phase_completed(&profile, phase, funded)
    })
    .await;
    if let Err(error) = side_effects {
        let error: APIError = error.into();
        warn!("phase side effects failed for challenge {}: {}", id, error);
    }

    Ok(HttpResponse::Ok().json(Challenge::from(challenge, None)?))
}
