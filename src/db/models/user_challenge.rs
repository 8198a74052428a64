use std::convert::TryInto;

use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use uuid::Uuid;

use crate::api::models::challenge::ChallengeStatus;
use crate::api::models::error::APIError;
use crate::db::models::challenge_type::ChallengeType;
use crate::db::schema::{challenge_types, user_challenges};
use crate::Conn;

use super::pagination::Paginate;

#[derive(Queryable, Identifiable, Associations, Clone, Debug)]
#[belongs_to(ChallengeType, foreign_key = "challenge_type_id")]
#[table_name = "user_challenges"]
pub struct UserChallenge {
    pub id: Uuid,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub user_id: String,
    pub challenge_type_id: Uuid,
    pub account_size: BigDecimal,
    pub amount_paid: BigDecimal,
    pub status: i16,
    pub current_phase: i32,
    pub phase_one_completed: bool,
    pub phase_two_completed: bool,
    pub trading_account_number: Option<String>,
    pub trading_account_password: Option<String>,
    pub trading_server: Option<String>,
    pub credentials_sent: bool,
    pub purchase_date: NaiveDateTime,
    pub start_date: Option<NaiveDateTime>,
    pub admin_note: Option<String>,
}

impl UserChallenge {
    pub fn get(conn: &Conn, id: &Uuid) -> Result<UserChallenge, diesel::result::Error> {
        user_challenges::table.find(id).first(conn)
    }

    pub fn get_with_type(
        conn: &Conn,
        id: &Uuid,
    ) -> Result<(UserChallenge, ChallengeType), diesel::result::Error> {
        user_challenges::table
            .find(id)
            .inner_join(challenge_types::table)
            .first(conn)
    }

    pub fn get_all_with_type(
        conn: &Conn,
    ) -> Result<Vec<(UserChallenge, ChallengeType)>, diesel::result::Error> {
        user_challenges::table
            .inner_join(challenge_types::table)
            .order_by(user_challenges::dsl::created_at.desc())
            .load(conn)
    }

    pub fn get_list(
        conn: &Conn,
        user_id: Option<String>,
        status: Option<ChallengeStatus>,
        page: i64,
        limit: i64,
    ) -> Result<(Vec<(UserChallenge, ChallengeType)>, i64), diesel::result::Error> {
        let mut query = user_challenges::table
            .inner_join(challenge_types::table)
            .order_by(user_challenges::dsl::created_at.desc())
            .into_boxed();

        if let Some(user_id) = user_id {
            query = query.filter(user_challenges::dsl::user_id.eq(user_id));
        }

        if let Some(status) = status {
            query = query.filter(user_challenges::dsl::status.eq::<i16>(status.into()));
        }

        let query = query.paginate(page).per_page(limit);

        query.load_and_count_pages::<(UserChallenge, ChallengeType)>(conn)
    }

    pub fn insert(
        conn: &Conn,
        new_user_challenge: &NewUserChallenge,
    ) -> Result<UserChallenge, diesel::result::Error> {
        diesel::insert_into(user_challenges::table)
            .values(new_user_challenge)
            .get_result(conn)
    }

    pub fn assign_credentials(
        conn: &Conn,
        id: &Uuid,
        account_number: &str,
        password: &str,
        server: &str,
        start_date: NaiveDateTime,
    ) -> Result<UserChallenge, diesel::result::Error> {
        diesel::update(user_challenges::table.find(id))
            .set((
                user_challenges::dsl::trading_account_number.eq(account_number),
                user_challenges::dsl::trading_account_password.eq(password),
                user_challenges::dsl::trading_server.eq(server),
                user_challenges::dsl::status.eq::<i16>(ChallengeStatus::Active.into()),
                user_challenges::dsl::credentials_sent.eq(true),
                user_challenges::dsl::start_date.eq(start_date),
            ))
            .get_result(conn)
    }

    pub fn mark_breached(
        conn: &Conn,
        id: &Uuid,
        reason: &str,
    ) -> Result<UserChallenge, diesel::result::Error> {
        diesel::update(user_challenges::table.find(id))
            .set((
                user_challenges::dsl::status.eq::<i16>(ChallengeStatus::Breached.into()),
                user_challenges::dsl::admin_note.eq(reason),
            ))
            .get_result(conn)
    }

    /// Phase progression is strictly sequential: completing phase one moves
    /// the challenge to phase two, completing phase two funds it.
    pub fn complete_phase(conn: &Conn, id: &Uuid, phase: i32) -> Result<UserChallenge, APIError> {
        conn.transaction::<UserChallenge, APIError, _>(|| {
            let challenge: UserChallenge = user_challenges::table.find(id).first(conn)?;

            let status: ChallengeStatus = challenge.status.try_into()?;
            if status != ChallengeStatus::Active {
                let status_name: &'static str = status.into();
                return Err(APIError::InvalidValue {
                    description: format!(
                        "challenge is not active, current status is {}",
                        status_name
                    ),
                });
            }

            if phase != 1 && phase != 2 {
                return Err(APIError::InvalidValue {
                    description: format!("invalid phase {}", phase),
                });
            }

            if phase != challenge.current_phase {
                return Err(APIError::InvalidValue {
                    description: format!(
                        "challenge is in phase {}, cannot complete phase {}",
                        challenge.current_phase, phase
                    ),
                });
            }

            let updated = if phase == 1 {
                diesel::update(user_challenges::table.find(id))
                    .set((
                        user_challenges::dsl::phase_one_completed.eq(true),
                        user_challenges::dsl::current_phase.eq(2),
                    ))
                    .get_result(conn)?
            } else {
                diesel::update(user_challenges::table.find(id))
                    .set((
                        user_challenges::dsl::phase_two_completed.eq(true),
                        user_challenges::dsl::status.eq::<i16>(ChallengeStatus::Funded.into()),
                    ))
                    .get_result(conn)?
            };

            Ok(updated)
        })
    }
}

#[derive(Insertable, Debug)]
#[table_name = "user_challenges"]
pub struct NewUserChallenge {
    pub user_id: String,
    pub challenge_type_id: Uuid,
    pub account_size: BigDecimal,
    pub amount_paid: BigDecimal,
    pub status: i16,
}
