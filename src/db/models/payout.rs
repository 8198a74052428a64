use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::models::affiliate::Affiliate;
use crate::db::schema::payouts;
use crate::Conn;

#[derive(Queryable, Identifiable, Associations, Clone, Debug)]
#[belongs_to(Affiliate, foreign_key = "affiliate_id")]
#[table_name = "payouts"]
pub struct Payout {
    pub id: Uuid,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub affiliate_id: Uuid,
    pub amount: BigDecimal,
    pub status: i16,
}

impl Payout {
    pub fn get_for_affiliate(
        conn: &Conn,
        affiliate_id: &Uuid,
    ) -> Result<Vec<Payout>, diesel::result::Error> {
        payouts::table
            .filter(payouts::dsl::affiliate_id.eq(affiliate_id))
            .order_by(payouts::dsl::created_at.desc())
            .load(conn)
    }

    pub fn insert(conn: &Conn, new_payout: &NewPayout) -> Result<Payout, diesel::result::Error> {
        diesel::insert_into(payouts::table)
            .values(new_payout)
            .get_result(conn)
    }
}

#[derive(Insertable, Debug)]
#[table_name = "payouts"]
pub struct NewPayout {
    pub affiliate_id: Uuid,
    pub amount: BigDecimal,
}
