use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;
use rand::Rng;
use uuid::Uuid;

use crate::api::models::error::APIError;
use crate::db::models::user_profile::UserProfile;
use crate::db::schema::affiliates;
use crate::Conn;

const MAX_CODE_ATTEMPTS: usize = 10;
const USER_ID_CONSTRAINT: &str = "affiliates_user_id_key";

#[derive(Queryable, Identifiable, Clone, Debug)]
#[table_name = "affiliates"]
pub struct Affiliate {
    pub id: Uuid,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub user_id: String,
    pub referral_code: String,
    pub commission_rate: BigDecimal,
    pub total_referrals: i32,
    pub total_earnings: BigDecimal,
    pub available_balance: BigDecimal,
    pub status: i16,
}

impl Affiliate {
    pub fn get(conn: &Conn, id: &Uuid) -> Result<Affiliate, diesel::result::Error> {
        affiliates::table.find(id).first(conn)
    }

    pub fn get_by_user_id(conn: &Conn, user_id: &str) -> Result<Affiliate, diesel::result::Error> {
        affiliates::table
            .filter(affiliates::dsl::user_id.eq(user_id))
            .first(conn)
    }

    pub fn get_by_referral_code(
        conn: &Conn,
        referral_code: &str,
    ) -> Result<Affiliate, diesel::result::Error> {
        affiliates::table
            .filter(affiliates::dsl::referral_code.eq(referral_code))
            .first(conn)
    }

    /// Uniqueness of the referral code is enforced by the database, a
    /// collision shows up as a constraint violation and triggers a fresh
    /// candidate instead of a pre-check query.
    pub fn create_with_code(
        conn: &Conn,
        user_id: &str,
        base: &str,
        commission_rate: &BigDecimal,
    ) -> Result<Affiliate, APIError> {
        let mut rng = rand::thread_rng();
        allocate_code(base, &mut rng, |candidate| {
            let new_affiliate = NewAffiliate {
                user_id: user_id.to_owned(),
                referral_code: candidate.to_owned(),
                commission_rate: commission_rate.clone(),
            };
            let result = diesel::insert_into(affiliates::table)
                .values(&new_affiliate)
                .get_result(conn);

            match result {
                Ok(affiliate) => Ok(Some(affiliate)),
                Err(diesel::result::Error::DatabaseError(
                    DatabaseErrorKind::UniqueViolation,
                    information,
                )) => {
                    if information.constraint_name() == Some(USER_ID_CONSTRAINT) {
                        Err(APIError::Conflict {
                            description: format!(
                                "affiliate account already exists for user {}",
                                user_id
                            ),
                        })
                    } else {
                        Ok(None)
                    }
                }
                Err(error) => Err(error.into()),
            }
        })
    }

    pub fn increment_referrals(conn: &Conn, id: &Uuid) -> Result<usize, diesel::result::Error> {
        diesel::update(affiliates::table.find(id))
            .set(affiliates::dsl::total_referrals.eq(affiliates::dsl::total_referrals + 1))
            .execute(conn)
    }

    pub fn credit_commission(
        conn: &Conn,
        id: &Uuid,
        amount: &BigDecimal,
    ) -> Result<Affiliate, diesel::result::Error> {
        diesel::update(affiliates::table.find(id))
            .set((
                affiliates::dsl::total_earnings.eq(affiliates::dsl::total_earnings + amount.clone()),
                affiliates::dsl::available_balance
                    .eq(affiliates::dsl::available_balance + amount.clone()),
            ))
            .get_result(conn)
    }

    /// The balance check is part of the update statement, a concurrent debit
    /// cannot drive the balance negative. No matching row reads as NotFound.
    pub fn debit_balance(
        conn: &Conn,
        id: &Uuid,
        amount: &BigDecimal,
    ) -> Result<Affiliate, diesel::result::Error> {
        diesel::update(
            affiliates::table
                .find(id)
                .filter(affiliates::dsl::available_balance.ge(amount.clone())),
        )
        .set(affiliates::dsl::available_balance.eq(affiliates::dsl::available_balance - amount.clone()))
        .get_result(conn)
    }
}

/// Derives the human readable part of a referral code: first and last three
/// letters of the full name, else the first six alphanumerics of the friendly
/// id, else USER plus the trailing digits of the timestamp.
pub fn referral_code_base(profile: Option<&UserProfile>, timestamp: i64) -> String {
    if let Some(profile) = profile {
        let letters: String = profile
            .full_name()
            .chars()
            .filter(|c| c.is_ascii_alphabetic())
            .collect::<String>()
            .to_uppercase();
        if letters.len() >= 6 {
            return format!("{}{}", &letters[..3], &letters[letters.len() - 3..]);
        }

        if let Some(friendly_id) = &profile.friendly_id {
            let alphanumerics: String = friendly_id
                .chars()
                .filter(|c| c.is_ascii_alphanumeric())
                .take(6)
                .collect::<String>()
                .to_uppercase();
            if !alphanumerics.is_empty() {
                return alphanumerics;
            }
        }
    }

    format!("USER{:04}", timestamp.rem_euclid(10000))
}

fn candidate_code<R: Rng>(base: &str, rng: &mut R) -> String {
    format!("{}{:04}", base, rng.gen_range(0..10000))
}

/// Runs `attempt` with fresh candidates until one sticks. `Ok(None)` means
/// the candidate was taken. The budget guards against a pathologically dense
/// code space, exhausting it is an error rather than a silent duplicate.
fn allocate_code<T, R, F>(base: &str, rng: &mut R, mut attempt: F) -> Result<T, APIError>
where
    R: Rng,
    F: FnMut(&str) -> Result<Option<T>, APIError>,
{
    for _ in 0..MAX_CODE_ATTEMPTS {
        let candidate = candidate_code(base, rng);
        if let Some(created) = attempt(&candidate)? {
            return Ok(created);
        }
    }

    Err(APIError::Internal {
        description: format!("could not allocate a unique referral code for base {}", base),
    })
}

#[derive(Insertable, Debug)]
#[table_name = "affiliates"]
pub struct NewAffiliate {
    pub user_id: String,
    pub referral_code: String,
    pub commission_rate: BigDecimal,
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::NaiveDate;

    fn profile(
        first_name: Option<&str>,
        last_name: Option<&str>,
        friendly_id: Option<&str>,
    ) -> UserProfile {
        let timestamp = NaiveDate::from_ymd(2021, 6, 1).and_hms(12, 0, 0);
        UserProfile {
            id: Uuid::new_v4(),
            created_at: timestamp,
            updated_at: timestamp,
            user_id: "auth0|abc123".to_owned(),
            email: "jane@example.com".to_owned(),
            first_name: first_name.map(|value| value.to_owned()),
            last_name: last_name.map(|value| value.to_owned()),
            friendly_id: friendly_id.map(|value| value.to_owned()),
        }
    }

    #[test]
    fn test_referral_code_base_from_name() -> () {
        let profile = profile(Some("Jane"), Some("Trader"), None);
        let base = referral_code_base(Some(&profile), 1622547800);

        assert_eq!(base, "JANDER");
    }

    #[test]
    fn test_referral_code_base_strips_non_letters() -> () {
        let profile = profile(Some("Anne-Marie"), Some("O'Neil"), None);
        let base = referral_code_base(Some(&profile), 1622547800);

        assert_eq!(base, "ANNEIL");
    }

    #[test]
    fn test_referral_code_base_from_friendly_id() -> () {
        let profile = profile(None, None, Some("jt-2042x"));
        let base = referral_code_base(Some(&profile), 1622547800);

        assert_eq!(base, "JT2042");
    }

    #[test]
    fn test_referral_code_base_fallback() -> () {
        let base = referral_code_base(None, 1622547800);

        assert_eq!(base, "USER7800");
    }

    #[test]
    fn test_candidate_code_appends_four_digits() -> () {
        let mut rng = rand::thread_rng();
        let candidate = candidate_code("JANDER", &mut rng);

        assert_eq!(candidate.len(), 10);
        assert_eq!(&candidate[..6], "JANDER");
        assert_eq!(candidate[6..].chars().all(|c| c.is_ascii_digit()), true);
    }

    #[test]
    fn test_allocate_code_retries_on_collisions() -> () {
        let mut rng = rand::thread_rng();
        let mut attempts = 0;
        let result = allocate_code("JANDER", &mut rng, |candidate| {
            attempts += 1;
            if attempts <= 3 {
                Ok(None)
            } else {
                Ok(Some(candidate.to_owned()))
            }
        });

        assert_eq!(attempts, 4);
        assert_eq!(result.unwrap().starts_with("JANDER"), true);
    }

    #[test]
    fn test_allocate_code_budget_exhausted() -> () {
        let mut rng = rand::thread_rng();
        let mut attempts = 0;
        let result: Result<String, APIError> = allocate_code("JANDER", &mut rng, |_| {
            attempts += 1;
            Ok(None)
        });

        assert_eq!(attempts, 10);
        assert_eq!(result.is_err(), true);
    }

    #[test]
    fn test_allocate_code_propagates_fatal_errors() -> () {
        let mut rng = rand::thread_rng();
        let mut attempts = 0;
        let result: Result<String, APIError> = allocate_code("JANDER", &mut rng, |_| {
            attempts += 1;
            Err(APIError::Conflict {
                description: "affiliate account already exists".to_owned(),
            })
        });

        assert_eq!(attempts, 1);
        match result {
            Err(APIError::Conflict { .. }) => (),
            other => panic!("expected conflict, got {:?}", other),
        }
    }
}
