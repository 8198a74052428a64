use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::models::challenge_type::ChallengeType;
use crate::db::schema::challenge_pricing;
use crate::Conn;

#[derive(Queryable, Identifiable, Associations, Clone, Debug)]
#[belongs_to(ChallengeType, foreign_key = "challenge_type_id")]
#[table_name = "challenge_pricing"]
pub struct ChallengePricing {
    pub id: Uuid,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub challenge_type_id: Uuid,
    pub account_size: BigDecimal,
    pub price: BigDecimal,
}

impl ChallengePricing {
    pub fn get_for_type(
        conn: &Conn,
        challenge_type_id: &Uuid,
    ) -> Result<Vec<ChallengePricing>, diesel::result::Error> {
        challenge_pricing::table
            .filter(challenge_pricing::dsl::challenge_type_id.eq(challenge_type_id))
            .order_by(challenge_pricing::dsl::account_size.asc())
            .load(conn)
    }

    pub fn get_tier(
        conn: &Conn,
        challenge_type_id: &Uuid,
        account_size: &BigDecimal,
    ) -> Result<ChallengePricing, diesel::result::Error> {
        challenge_pricing::table
            .filter(challenge_pricing::dsl::challenge_type_id.eq(challenge_type_id))
            .filter(challenge_pricing::dsl::account_size.eq(account_size))
            .first(conn)
    }

    pub fn insert(
        conn: &Conn,
        new_pricing: Vec<NewChallengePricing>,
    ) -> Result<usize, diesel::result::Error> {
        diesel::insert_into(challenge_pricing::table)
            .values(&new_pricing)
            .execute(conn)
    }

    pub fn update(
        conn: &Conn,
        update: UpdateChallengePricing,
    ) -> Result<usize, diesel::result::Error> {
        diesel::update(challenge_pricing::table.find(update.id))
            .set(update)
            .execute(conn)
    }

    pub fn delete(conn: &Conn, to_remove: Vec<Uuid>) -> Result<usize, diesel::result::Error> {
        diesel::delete(
            challenge_pricing::table.filter(challenge_pricing::dsl::id.eq_any(to_remove)),
        )
        .execute(conn)
    }
}

#[derive(Insertable, Debug)]
#[table_name = "challenge_pricing"]
pub struct NewChallengePricing {
    pub challenge_type_id: Uuid,
    pub account_size: BigDecimal,
    pub price: BigDecimal,
}

#[derive(AsChangeset, Identifiable, Debug)]
#[table_name = "challenge_pricing"]
pub struct UpdateChallengePricing {
    pub id: Uuid,
    pub price: BigDecimal,
}
