use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use uuid::Uuid;

use crate::api::models::account::AccountStatus;
use crate::db::schema::mt5_accounts;
use crate::Conn;

#[derive(Queryable, Identifiable, Clone, Debug)]
#[table_name = "mt5_accounts"]
pub struct Mt5Account {
    pub id: Uuid,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub user_id: String,
    pub challenge_id: Uuid,
    pub account_number: String,
    pub password: String,
    pub server: String,
    pub balance: BigDecimal,
    pub equity: BigDecimal,
    pub status: i16,
}

impl Mt5Account {
    pub fn get_by_challenge(
        conn: &Conn,
        challenge_id: &Uuid,
    ) -> Result<Mt5Account, diesel::result::Error> {
        mt5_accounts::table
            .filter(mt5_accounts::dsl::challenge_id.eq(challenge_id))
            .first(conn)
    }

    pub fn get_all(conn: &Conn) -> Result<Vec<Mt5Account>, diesel::result::Error> {
        mt5_accounts::table
            .order_by(mt5_accounts::dsl::created_at.desc())
            .load(conn)
    }

    /// One trading account per challenge. A second assignment replaces the
    /// stored credentials in place instead of creating a duplicate row.
    pub fn upsert(
        conn: &Conn,
        new_account: &NewMt5Account,
    ) -> Result<Mt5Account, diesel::result::Error> {
        diesel::insert_into(mt5_accounts::table)
            .values(new_account)
            .on_conflict(mt5_accounts::dsl::challenge_id)
            .do_update()
            .set((
                mt5_accounts::dsl::user_id.eq(&new_account.user_id),
                mt5_accounts::dsl::account_number.eq(&new_account.account_number),
                mt5_accounts::dsl::password.eq(&new_account.password),
                mt5_accounts::dsl::server.eq(&new_account.server),
                mt5_accounts::dsl::balance.eq(&new_account.balance),
                mt5_accounts::dsl::equity.eq(&new_account.equity),
                mt5_accounts::dsl::status.eq(new_account.status),
            ))
            .get_result(conn)
    }

    pub fn set_status(
        conn: &Conn,
        challenge_id: &Uuid,
        status: AccountStatus,
    ) -> Result<Mt5Account, diesel::result::Error> {
        diesel::update(
            mt5_accounts::table.filter(mt5_accounts::dsl::challenge_id.eq(challenge_id)),
        )
        .set(mt5_accounts::dsl::status.eq::<i16>(status.into()))
        .get_result(conn)
    }

    pub fn update_balances(
        conn: &Conn,
        challenge_id: &Uuid,
        balance: &BigDecimal,
        equity: &BigDecimal,
    ) -> Result<Mt5Account, diesel::result::Error> {
        diesel::update(
            mt5_accounts::table.filter(mt5_accounts::dsl::challenge_id.eq(challenge_id)),
        )
        .set((
            mt5_accounts::dsl::balance.eq(balance.clone()),
            mt5_accounts::dsl::equity.eq(equity.clone()),
        ))
        .get_result(conn)
    }

    pub fn count_active(conn: &Conn) -> Result<i64, diesel::result::Error> {
        mt5_accounts::table
            .filter(mt5_accounts::dsl::status.eq::<i16>(AccountStatus::Active.into()))
            .count()
            .get_result(conn)
    }
}

#[derive(Insertable, Debug)]
#[table_name = "mt5_accounts"]
pub struct NewMt5Account {
    pub user_id: String,
    pub challenge_id: Uuid,
    pub account_number: String,
    pub password: String,
    pub server: String,
    pub balance: BigDecimal,
    pub equity: BigDecimal,
    pub status: i16,
}
