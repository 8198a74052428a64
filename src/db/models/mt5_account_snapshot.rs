use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::schema::mt5_account_snapshots;
use crate::Conn;

use super::pagination::Paginate;

#[derive(Queryable, Identifiable, Clone, Debug)]
#[table_name = "mt5_account_snapshots"]
pub struct Mt5AccountSnapshot {
    pub id: Uuid,
    pub created_at: NaiveDateTime,
    pub challenge_id: Uuid,
    pub balance: BigDecimal,
    pub equity: BigDecimal,
    pub daily_pnl: BigDecimal,
    pub total_pnl: BigDecimal,
    pub is_latest: bool,
}

impl Mt5AccountSnapshot {
    pub fn get_latest(
        conn: &Conn,
        challenge_id: &Uuid,
    ) -> Result<Option<Mt5AccountSnapshot>, diesel::result::Error> {
        mt5_account_snapshots::table
            .filter(mt5_account_snapshots::dsl::challenge_id.eq(challenge_id))
            .filter(mt5_account_snapshots::dsl::is_latest.eq(true))
            .order_by(mt5_account_snapshots::dsl::created_at.desc())
            .first(conn)
            .optional()
    }

    pub fn get_list(
        conn: &Conn,
        challenge_id: &Uuid,
        page: i64,
        limit: i64,
    ) -> Result<(Vec<Mt5AccountSnapshot>, i64), diesel::result::Error> {
        let query = mt5_account_snapshots::table
            .filter(mt5_account_snapshots::dsl::challenge_id.eq(*challenge_id))
            .order_by(mt5_account_snapshots::dsl::created_at.desc())
            .paginate(page)
            .per_page(limit);

        query.load_and_count_pages::<Mt5AccountSnapshot>(conn)
    }

    /// The previous latest snapshot is demoted in the same transaction, at
    /// most one row per challenge carries the is_latest flag.
    pub fn insert_latest(
        conn: &Conn,
        new_snapshot: &NewMt5AccountSnapshot,
    ) -> Result<Mt5AccountSnapshot, diesel::result::Error> {
        conn.transaction::<Mt5AccountSnapshot, diesel::result::Error, _>(|| {
            diesel::update(
                mt5_account_snapshots::table
                    .filter(
                        mt5_account_snapshots::dsl::challenge_id.eq(new_snapshot.challenge_id),
                    )
                    .filter(mt5_account_snapshots::dsl::is_latest.eq(true)),
            )
            .set(mt5_account_snapshots::dsl::is_latest.eq(false))
            .execute(conn)?;

            diesel::insert_into(mt5_account_snapshots::table)
                .values(new_snapshot)
                .get_result(conn)
        })
    }
}

#[derive(Insertable, Debug)]
#[table_name = "mt5_account_snapshots"]
pub struct NewMt5AccountSnapshot {
    pub challenge_id: Uuid,
    pub balance: BigDecimal,
    pub equity: BigDecimal,
    pub daily_pnl: BigDecimal,
    pub total_pnl: BigDecimal,
    pub is_latest: bool,
}
