use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use num_traits::FromPrimitive;
use uuid::Uuid;

use crate::api::models::error::APIError;
use crate::db::models::challenge_pricing::{
    ChallengePricing, NewChallengePricing, UpdateChallengePricing,
};
use crate::db::schema::{challenge_pricing, challenge_types};
use crate::settings::ChallengeTypeSettings;
use crate::Conn;

#[derive(Queryable, Identifiable, Clone, Debug)]
#[table_name = "challenge_types"]
pub struct ChallengeType {
    pub id: Uuid,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub code: String,
    pub display_name: String,
    pub description: Option<String>,
}

impl ChallengeType {
    pub fn get(conn: &Conn, id: &Uuid) -> Result<ChallengeType, diesel::result::Error> {
        challenge_types::table.find(id).first(conn)
    }

    pub fn get_by_code(conn: &Conn, code: &str) -> Result<ChallengeType, diesel::result::Error> {
        challenge_types::table
            .filter(challenge_types::dsl::code.eq(code))
            .first(conn)
    }

    pub fn get_all(conn: &Conn) -> Result<Vec<ChallengeType>, diesel::result::Error> {
        challenge_types::table
            .order_by(challenge_types::dsl::code.asc())
            .load(conn)
    }

    pub fn get_all_with_pricing(
        conn: &Conn,
    ) -> Result<Vec<(ChallengeType, Vec<ChallengePricing>)>, diesel::result::Error> {
        let challenge_types = Self::get_all(conn)?;
        let pricing: Vec<ChallengePricing> = ChallengePricing::belonging_to(&challenge_types)
            .order_by(challenge_pricing::dsl::account_size.asc())
            .load(conn)?;
        let grouped = pricing.grouped_by(&challenge_types);

        Ok(challenge_types.into_iter().zip(grouped).collect())
    }

    /// Applies the configured catalog to the database. Types missing from the
    /// configuration are kept, historical purchases still reference them.
    pub fn sync(
        conn: &Conn,
        challenge_types: &Vec<ChallengeTypeSettings>,
    ) -> Result<usize, APIError> {
        let stored_types = Self::get_all(conn)?;
        let mut changes: usize = 0;

        for settings_type in challenge_types {
            let stored_type = stored_types
                .iter()
                .find(|stored| stored.code == settings_type.code);

            let challenge_type = match stored_type {
                Some(stored) => {
                    if stored.display_name != settings_type.display_name
                        || stored.description != settings_type.description
                    {
                        changes += diesel::update(challenge_types::table.find(stored.id))
                            .set((
                                challenge_types::dsl::display_name
                                    .eq(settings_type.display_name.clone()),
                                challenge_types::dsl::description
                                    .eq(settings_type.description.clone()),
                            ))
                            .execute(conn)?;
                    }
                    stored.clone()
                }
                None => {
                    let inserted: ChallengeType = diesel::insert_into(challenge_types::table)
                        .values(NewChallengeType {
                            code: settings_type.code.clone(),
                            display_name: settings_type.display_name.clone(),
                            description: settings_type.description.clone(),
                        })
                        .get_result(conn)?;
                    changes += 1;
                    inserted
                }
            };

            changes += Self::sync_pricing(conn, &challenge_type, settings_type)?;
        }

        Ok(changes)
    }

    fn sync_pricing(
        conn: &Conn,
        challenge_type: &ChallengeType,
        settings_type: &ChallengeTypeSettings,
    ) -> Result<usize, APIError> {
        let stored_tiers = ChallengePricing::get_for_type(conn, &challenge_type.id)?;
        let mut changes: usize = 0;

        let configured: Vec<(BigDecimal, BigDecimal)> = settings_type
            .tiers
            .iter()
            .map(|tier| {
                let price = BigDecimal::from_f64(tier.price).ok_or(APIError::InvalidValue {
                    description: format!(
                        "invalid price {} for challenge type {}",
                        tier.price, settings_type.code
                    ),
                })?;
                Ok((BigDecimal::from(tier.account_size), price))
            })
            .collect::<Result<Vec<_>, APIError>>()?;

        let to_remove: Vec<Uuid> = stored_tiers
            .iter()
            .filter(|stored| {
                configured
                    .iter()
                    .find(|(account_size, _)| account_size == &stored.account_size)
                    .is_none()
            })
            .map(|stored| stored.id)
            .collect();

        let to_add: Vec<NewChallengePricing> = configured
            .iter()
            .filter(|(account_size, _)| {
                stored_tiers
                    .iter()
                    .find(|stored| &stored.account_size == account_size)
                    .is_none()
            })
            .map(|(account_size, price)| NewChallengePricing {
                challenge_type_id: challenge_type.id,
                account_size: account_size.clone(),
                price: price.clone(),
            })
            .collect();

        let to_update: Vec<UpdateChallengePricing> = configured
            .iter()
            .filter_map(|(account_size, price)| {
                let found = stored_tiers.iter().find(|stored| {
                    &stored.account_size == account_size && &stored.price != price
                });

                found.map(|stored| UpdateChallengePricing {
                    id: stored.id,
                    price: price.clone(),
                })
            })
            .collect();

        if !to_remove.is_empty() {
            changes += ChallengePricing::delete(conn, to_remove)?;
        }

        if !to_add.is_empty() {
            changes += ChallengePricing::insert(conn, to_add)?;
        }

        for update in to_update {
            changes += ChallengePricing::update(conn, update)?;
        }

        Ok(changes)
    }
}

#[derive(Insertable, Debug)]
#[table_name = "challenge_types"]
pub struct NewChallengeType {
    pub code: String,
    pub display_name: String,
    pub description: Option<String>,
}
