use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use uuid::Uuid;

use crate::api::models::affiliate::ReferralStatus;
use crate::db::models::affiliate::Affiliate;
use crate::db::schema::{affiliates, referrals};
use crate::Conn;

#[derive(Queryable, Identifiable, Associations, Clone, Debug)]
#[belongs_to(Affiliate, foreign_key = "affiliate_id")]
#[table_name = "referrals"]
pub struct Referral {
    pub id: Uuid,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub affiliate_id: Uuid,
    pub referred_user_id: String,
    pub status: i16,
    pub purchase_amount: Option<BigDecimal>,
    pub commission_amount: Option<BigDecimal>,
}

impl Referral {
    pub fn get_for_affiliate(
        conn: &Conn,
        affiliate_id: &Uuid,
    ) -> Result<Vec<Referral>, diesel::result::Error> {
        referrals::table
            .filter(referrals::dsl::affiliate_id.eq(affiliate_id))
            .order_by(referrals::dsl::created_at.desc())
            .load(conn)
    }

    pub fn get_by_referred_user(
        conn: &Conn,
        referred_user_id: &str,
    ) -> Result<(Referral, Affiliate), diesel::result::Error> {
        referrals::table
            .inner_join(affiliates::table)
            .filter(referrals::dsl::referred_user_id.eq(referred_user_id))
            .first(conn)
    }

    pub fn insert(
        conn: &Conn,
        new_referral: &NewReferral,
    ) -> Result<Referral, diesel::result::Error> {
        diesel::insert_into(referrals::table)
            .values(new_referral)
            .get_result(conn)
    }

    pub fn mark_purchased(
        conn: &Conn,
        id: &Uuid,
        purchase_amount: &BigDecimal,
        commission_amount: &BigDecimal,
    ) -> Result<Referral, diesel::result::Error> {
        diesel::update(referrals::table.find(id))
            .set((
                referrals::dsl::status.eq::<i16>(ReferralStatus::Purchased.into()),
                referrals::dsl::purchase_amount.eq(purchase_amount.clone()),
                referrals::dsl::commission_amount.eq(commission_amount.clone()),
            ))
            .get_result(conn)
    }
}

#[derive(Insertable, Debug)]
#[table_name = "referrals"]
pub struct NewReferral {
    pub affiliate_id: Uuid,
    pub referred_user_id: String,
}
