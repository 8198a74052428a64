use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::schema::mt5_analytics_cache;
use crate::Conn;

#[derive(Queryable, Identifiable, Clone, Debug)]
#[table_name = "mt5_analytics_cache"]
pub struct Mt5AnalyticsCache {
    pub id: Uuid,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub challenge_id: Uuid,
    pub starting_balance: BigDecimal,
    pub current_balance: BigDecimal,
    pub current_equity: BigDecimal,
    pub total_pnl: BigDecimal,
    pub challenge_status: String,
    pub is_valid: bool,
}

impl Mt5AnalyticsCache {
    pub fn get_for_challenge(
        conn: &Conn,
        challenge_id: &Uuid,
    ) -> Result<Option<Mt5AnalyticsCache>, diesel::result::Error> {
        mt5_analytics_cache::table
            .filter(mt5_analytics_cache::dsl::challenge_id.eq(challenge_id))
            .first(conn)
            .optional()
    }

    pub fn upsert(
        conn: &Conn,
        new_entry: &NewMt5AnalyticsCache,
    ) -> Result<Mt5AnalyticsCache, diesel::result::Error> {
        diesel::insert_into(mt5_analytics_cache::table)
            .values(new_entry)
            .on_conflict(mt5_analytics_cache::dsl::challenge_id)
            .do_update()
            .set((
                mt5_analytics_cache::dsl::starting_balance.eq(&new_entry.starting_balance),
                mt5_analytics_cache::dsl::current_balance.eq(&new_entry.current_balance),
                mt5_analytics_cache::dsl::current_equity.eq(&new_entry.current_equity),
                mt5_analytics_cache::dsl::total_pnl.eq(&new_entry.total_pnl),
                mt5_analytics_cache::dsl::challenge_status.eq(&new_entry.challenge_status),
                mt5_analytics_cache::dsl::is_valid.eq(new_entry.is_valid),
            ))
            .get_result(conn)
    }

    /// Recomputes the cached figures from a fresh balance reading, keeping
    /// the stored starting balance as the baseline.
    pub fn refresh(
        conn: &Conn,
        challenge_id: &Uuid,
        balance: &BigDecimal,
        equity: &BigDecimal,
    ) -> Result<Option<Mt5AnalyticsCache>, diesel::result::Error> {
        conn.transaction::<Option<Mt5AnalyticsCache>, diesel::result::Error, _>(|| {
            let entry = Self::get_for_challenge(conn, challenge_id)?;
            let entry = match entry {
                Some(entry) => entry,
                None => return Ok(None),
            };

            let total_pnl = balance - &entry.starting_balance;
            let updated = diesel::update(mt5_analytics_cache::table.find(entry.id))
                .set((
                    mt5_analytics_cache::dsl::current_balance.eq(balance.clone()),
                    mt5_analytics_cache::dsl::current_equity.eq(equity.clone()),
                    mt5_analytics_cache::dsl::total_pnl.eq(total_pnl),
                    mt5_analytics_cache::dsl::is_valid.eq(true),
                ))
                .get_result(conn)?;

            Ok(Some(updated))
        })
    }

    pub fn set_status(
        conn: &Conn,
        challenge_id: &Uuid,
        challenge_status: &str,
    ) -> Result<usize, diesel::result::Error> {
        diesel::update(
            mt5_analytics_cache::table
                .filter(mt5_analytics_cache::dsl::challenge_id.eq(challenge_id)),
        )
        .set(mt5_analytics_cache::dsl::challenge_status.eq(challenge_status))
        .execute(conn)
    }

    pub fn invalidate(conn: &Conn, challenge_id: &Uuid) -> Result<usize, diesel::result::Error> {
        diesel::update(
            mt5_analytics_cache::table
                .filter(mt5_analytics_cache::dsl::challenge_id.eq(challenge_id)),
        )
        .set(mt5_analytics_cache::dsl::is_valid.eq(false))
        .execute(conn)
    }
}

#[derive(Insertable, Debug)]
#[table_name = "mt5_analytics_cache"]
pub struct NewMt5AnalyticsCache {
    pub challenge_id: Uuid,
    pub starting_balance: BigDecimal,
    pub current_balance: BigDecimal,
    pub current_equity: BigDecimal,
    pub total_pnl: BigDecimal,
    pub challenge_status: String,
    pub is_valid: bool,
}
