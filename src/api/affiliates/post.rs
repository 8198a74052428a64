use std::convert::TryInto;

use actix_web::{web, HttpResponse};
use bigdecimal::BigDecimal;
use chrono::Utc;
use diesel::Connection;
use log::{info, warn};
use num_traits::FromPrimitive;

use crate::api::models::{
    affiliate::{
        Affiliate, CreateAffiliateRequest, Payout, PayoutResponse, RecordPurchaseRequest,
        Referral, ReferralStatus, RequestPayoutRequest, TrackReferralRequest,
    },
    error::APIError,
};
use crate::db::models::{
    affiliate::{referral_code_base, Affiliate as DBAffiliate},
    payout::{NewPayout, Payout as DBPayout},
    referral::{NewReferral, Referral as DBReferral},
    user_profile::UserProfile,
};
use crate::notifications;
use crate::shards::ShardSet;
use crate::CONFIG;

pub async fn affiliate(
    shards: web::Data<ShardSet>,
    body: web::Json<CreateAffiliateRequest>,
) -> Result<HttpResponse, APIError> {
    let request = body.into_inner();
    request.validate()?;

    let conn = shards.primary().get()?;
    let user_id = request.user_id.clone();
    let affiliate = web::block::<_, _, APIError>(move || {
        let profile = UserProfile::get_by_user_id(&conn, &user_id).ok();
        let base = referral_code_base(profile.as_ref(), Utc::now().timestamp());
        let commission_rate = BigDecimal::from_f64(CONFIG.affiliates.default_commission_rate)
            .ok_or_else(|| APIError::Internal {
                description: "default commission rate is not a number".to_owned(),
            })?;

        DBAffiliate::create_with_code(&conn, &user_id, &base, &commission_rate)
    })
    .await?;

    info!(
        "created affiliate {} with code {}",
        affiliate.id, affiliate.referral_code
    );

    let affiliate: Affiliate = affiliate.try_into()?;

    Ok(HttpResponse::Ok().json(affiliate))
}

pub async fn track_referral(
    shards: web::Data<ShardSet>,
    body: web::Json<TrackReferralRequest>,
) -> Result<HttpResponse, APIError> {
    let request = body.into_inner();
    request.validate()?;

    let conn = shards.primary().get()?;
    let referral = web::block::<_, _, APIError>(move || {
        conn.transaction(|| {
            let affiliate = DBAffiliate::get_by_referral_code(&conn, &request.referral_code)
                .map_err(|error| match error {
                    diesel::result::Error::NotFound => APIError::InvalidValue {
                        description: format!("unknown referral code {}", request.referral_code),
                    },
                    other => other.into(),
                })?;
            let referral = DBReferral::insert(
                &conn,
                &NewReferral {
                    affiliate_id: affiliate.id,
                    referred_user_id: request.referred_user_id.clone(),
                },
            )?;
            DBAffiliate::increment_referrals(&conn, &affiliate.id)?;

            Ok(referral)
        })
    })
    .await?;

    let referral: Referral = referral.try_into()?;

    Ok(HttpResponse::Ok().json(referral))
}

pub async fn record_purchase(
    shards: web::Data<ShardSet>,
    body: web::Json<RecordPurchaseRequest>,
) -> Result<HttpResponse, APIError> {
    let request = body.into_inner();
    request.validate()?;

    let amount = BigDecimal::from_f64(request.amount).ok_or_else(|| APIError::InvalidValue {
        description: "amount is not a number".to_owned(),
    })?;

    let conn = shards.primary().get()?;
    let referral = web::block::<_, _, APIError>(move || {
        conn.transaction(|| {
            let (referral, affiliate) =
                DBReferral::get_by_referred_user(&conn, &request.referred_user_id)?;
            check_not_yet_purchased(&referral)?;
            let commission = &amount * &affiliate.commission_rate;
            let referral = DBReferral::mark_purchased(&conn, &referral.id, &amount, &commission)?;
            DBAffiliate::credit_commission(&conn, &affiliate.id, &commission)?;

            Ok(referral)
        })
    })
    .await?;

    info!(
        "recorded purchase for referral {}, commission {}",
        referral.id,
        referral
            .commission_amount
            .as_ref()
            .map(|amount| amount.to_string())
            .unwrap_or_default()
    );

    let referral: Referral = referral.try_into()?;

    Ok(HttpResponse::Ok().json(referral))
}

// a replayed purchase report must not credit the commission twice
fn check_not_yet_purchased(referral: &DBReferral) -> Result<(), APIError> {
    let status: ReferralStatus = referral.status.try_into()?;
    if status == ReferralStatus::Purchased {
        return Err(APIError::Conflict {
            description: "Purchase already recorded for this referral".to_owned(),
        });
    }

    Ok(())
}

fn check_minimum(amount: f64, min_payout: i64) -> Result<(), APIError> {
    if amount < min_payout as f64 {
        return Err(APIError::PayoutRejected {
            description: format!("Minimum payout amount is ${}", min_payout),
        });
    }

    Ok(())
}

pub async fn request_payout(
    shards: web::Data<ShardSet>,
    body: web::Json<RequestPayoutRequest>,
) -> Result<HttpResponse, APIError> {
    let request = body.into_inner();
    request.validate()?;

    check_minimum(request.amount, CONFIG.affiliates.min_payout)?;

    let amount = BigDecimal::from_f64(request.amount).ok_or_else(|| APIError::InvalidValue {
        description: "amount is not a number".to_owned(),
    })?;

    let conn = shards.primary().get()?;
    let user_id = request.user_id.clone();
    let (affiliate, payout) = web::block::<_, _, APIError>(move || {
        conn.transaction(|| {
            let affiliate = DBAffiliate::get_by_user_id(&conn, &user_id)?;
            let affiliate =
                DBAffiliate::debit_balance(&conn, &affiliate.id, &amount).map_err(|error| {
                    match error {
                        diesel::result::Error::NotFound => APIError::PayoutRejected {
                            description: "Insufficient available balance".to_owned(),
                        },
                        other => other.into(),
                    }
                })?;
            let payout = DBPayout::insert(
                &conn,
                &NewPayout {
                    affiliate_id: affiliate.id,
                    amount,
                },
            )?;

            Ok((affiliate, payout))
        })
    })
    .await?;

    info!(
        "payout {} of {} requested by affiliate {}",
        payout.id, payout.amount, affiliate.id
    );

    let pool = shards.primary().clone();
    let notify_user_id = affiliate.user_id.clone();
    let notify_amount = payout.amount.to_string();
    let conn = pool.get()?;
    let side_effects = web::block::<_, _, APIError>(move || {
        let profile = UserProfile::get_by_user_id(&conn, &notify_user_id)?;
        notifications::notify_payout_requested(&profile, &notify_amount)
    })
    .await;
    if let Err(error) = side_effects {
        let error: APIError = error.into();
        warn!("payout side effects failed for {}: {}", payout.id, error);
    }

    Ok(HttpResponse::Ok().json(PayoutResponse {
        affiliate: affiliate.try_into()?,
        payout: payout.try_into()?,
    }))
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn referral(status: ReferralStatus) -> crate::db::models::referral::Referral {
        let timestamp = NaiveDate::from_ymd(2021, 6, 1).and_hms(12, 0, 0);
        crate::db::models::referral::Referral {
            id: Uuid::new_v4(),
            created_at: timestamp,
            updated_at: timestamp,
            affiliate_id: Uuid::new_v4(),
            referred_user_id: "auth0|abc".to_owned(),
            status: status.into(),
            purchase_amount: None,
            commission_amount: None,
        }
    }

    #[test]
    fn test_repeated_purchase_reports_answer_with_conflict() -> () {
        let fresh = referral(ReferralStatus::SignedUp);
        assert_eq!(check_not_yet_purchased(&fresh).is_ok(), true);

        let replayed = referral(ReferralStatus::Purchased);
        match check_not_yet_purchased(&replayed) {
            Err(APIError::Conflict { description }) => {
                assert_eq!(description, "Purchase already recorded for this referral")
            }
            other => panic!("expected a conflict, got ok: {}", other.is_ok()),
        }
    }

    #[test]
    fn test_payouts_below_the_minimum_are_rejected() -> () {
        let result = check_minimum(50.0, 100);
        match result {
            Err(APIError::PayoutRejected { description }) => {
                assert_eq!(description, "Minimum payout amount is $100")
            }
            other => panic!("expected a rejection, got {:?}", other.is_ok()),
        }

        assert_eq!(check_minimum(99.5, 100).is_err(), true);
        assert_eq!(check_minimum(100.0, 100).is_ok(), true);
        assert_eq!(check_minimum(250.0, 100).is_ok(), true);
    }
}
