use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::sql_types::Text;
use uuid::Uuid;

use crate::api::models::coupon::CouponValidationResult;
use crate::api::models::error::APIError;
use crate::db::schema::coupons;
use crate::Conn;

sql_function!(fn lower(x: Text) -> Text);

pub const CHALLENGE_TYPE_ALL: &str = "all";

#[derive(Queryable, Identifiable, Clone, Debug)]
#[table_name = "coupons"]
pub struct Coupon {
    pub id: Uuid,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub code: String,
    pub discount_percent: i32,
    pub is_active: bool,
    pub expires_at: Option<NaiveDateTime>,
    pub max_uses: Option<i32>,
    pub used_count: i32,
    pub challenge_type: String,
}

impl Coupon {
    pub fn get_by_code(
        conn: &Conn,
        code: &str,
    ) -> Result<Option<Coupon>, diesel::result::Error> {
        coupons::table
            .filter(lower(coupons::dsl::code).eq(code.to_lowercase()))
            .first(conn)
            .optional()
    }

    /// Code matching is case insensitive, the business rules live in
    /// [`Coupon::evaluate`].
    pub fn validate(
        conn: &Conn,
        code: &str,
        challenge_type: &str,
        now: NaiveDateTime,
    ) -> Result<CouponValidationResult, diesel::result::Error> {
        let coupon = Self::get_by_code(conn, code)?;
        match coupon {
            Some(coupon) => Ok(coupon.evaluate(challenge_type, now)),
            None => Ok(CouponValidationResult::invalid("Invalid coupon code")),
        }
    }

    /// Redemption is keyed by id: a case variant of the code can never
    /// validate against one row and then update a different one, or none.
    pub fn redeem(conn: &Conn, id: &Uuid) -> Result<(), APIError> {
        let updated = diesel::update(coupons::table.find(id))
            .set(coupons::dsl::used_count.eq(coupons::dsl::used_count + 1))
            .execute(conn)?;

        check_redeemed(id, updated)
    }

    pub fn evaluate(&self, challenge_type: &str, now: NaiveDateTime) -> CouponValidationResult {
        if !self.is_active {
            return CouponValidationResult::invalid("This coupon is no longer active");
        }

        if let Some(expires_at) = self.expires_at {
            if expires_at < now {
                return CouponValidationResult::invalid("This coupon has expired");
            }
        }

        if let Some(max_uses) = self.max_uses {
            if self.used_count >= max_uses {
                return CouponValidationResult::invalid(
                    "This coupon has reached its usage limit",
                );
            }
        }

        if self.challenge_type != CHALLENGE_TYPE_ALL
            && !self.challenge_type.eq_ignore_ascii_case(challenge_type)
        {
            return CouponValidationResult::invalid(
                "This coupon is not valid for the selected challenge type",
            );
        }

        CouponValidationResult::valid(&self.code, self.discount_percent)
    }
}

fn check_redeemed(id: &Uuid, updated: usize) -> Result<(), APIError> {
    if updated == 0 {
        return Err(APIError::Internal {
            description: format!("coupon {} disappeared during redemption", id),
        });
    }

    Ok(())
}

/// Discounts are whole percentages, 100 means free.
pub fn apply_discount(price: &BigDecimal, discount_percent: i32) -> BigDecimal {
    let discount = discount_percent.max(0).min(100);
    price * BigDecimal::from(100 - discount) / BigDecimal::from(100)
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::NaiveDate;

    fn coupon(code: &str, discount_percent: i32, challenge_type: &str) -> Coupon {
        let timestamp = NaiveDate::from_ymd(2021, 6, 1).and_hms(12, 0, 0);
        Coupon {
            id: Uuid::new_v4(),
            created_at: timestamp,
            updated_at: timestamp,
            code: code.to_owned(),
            discount_percent,
            is_active: true,
            expires_at: None,
            max_uses: None,
            used_count: 0,
            challenge_type: challenge_type.to_owned(),
        }
    }

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd(2021, 7, 1).and_hms(9, 30, 0)
    }

    #[test]
    fn test_evaluate_free_trial() -> () {
        let coupon = coupon("FREETRIAL100", 100, CHALLENGE_TYPE_ALL);
        let result = coupon.evaluate("COMPETITION", now());

        assert_eq!(result.valid, true);
        assert_eq!(result.discount_percent, Some(100));
        assert_eq!(result.code, Some("FREETRIAL100".to_owned()));
    }

    #[test]
    fn test_evaluate_inactive() -> () {
        let mut coupon = coupon("WELCOME10", 10, CHALLENGE_TYPE_ALL);
        coupon.is_active = false;

        let result = coupon.evaluate("CLASSIC", now());

        assert_eq!(result.valid, false);
        assert_eq!(result.message, "This coupon is no longer active");
        assert_eq!(result.discount_percent, None);
    }

    #[test]
    fn test_evaluate_expired() -> () {
        let mut coupon = coupon("WELCOME10", 10, CHALLENGE_TYPE_ALL);
        coupon.expires_at = Some(NaiveDate::from_ymd(2021, 6, 30).and_hms(23, 59, 59));

        let result = coupon.evaluate("CLASSIC", now());

        assert_eq!(result.valid, false);
        assert_eq!(result.message, "This coupon has expired");
    }

    #[test]
    fn test_evaluate_not_yet_expired() -> () {
        let mut coupon = coupon("WELCOME10", 10, CHALLENGE_TYPE_ALL);
        coupon.expires_at = Some(NaiveDate::from_ymd(2021, 7, 2).and_hms(0, 0, 0));

        let result = coupon.evaluate("CLASSIC", now());

        assert_eq!(result.valid, true);
    }

    #[test]
    fn test_evaluate_usage_limit() -> () {
        let mut coupon = coupon("WELCOME10", 10, CHALLENGE_TYPE_ALL);
        coupon.max_uses = Some(5);
        coupon.used_count = 5;

        let result = coupon.evaluate("CLASSIC", now());

        assert_eq!(result.valid, false);
        assert_eq!(result.message, "This coupon has reached its usage limit");
    }

    #[test]
    fn test_evaluate_wrong_challenge_type() -> () {
        let coupon = coupon("RAPID20", 20, "RAPID");
        let result = coupon.evaluate("CLASSIC", now());

        assert_eq!(result.valid, false);
        assert_eq!(
            result.message,
            "This coupon is not valid for the selected challenge type"
        );
    }

    #[test]
    fn test_evaluate_challenge_type_case_insensitive() -> () {
        let coupon = coupon("RAPID20", 20, "RAPID");
        let result = coupon.evaluate("rapid", now());

        assert_eq!(result.valid, true);
        assert_eq!(result.discount_percent, Some(20));
    }

    #[test]
    fn test_redeem_requires_an_updated_row() -> () {
        let id = Uuid::new_v4();

        assert_eq!(check_redeemed(&id, 1).is_ok(), true);

        match check_redeemed(&id, 0) {
            Err(APIError::Internal { description }) => {
                assert_eq!(description.contains(&id.to_string()), true)
            }
            other => panic!("expected an internal error, got ok: {}", other.is_ok()),
        }
    }

    #[test]
    fn test_apply_discount() -> () {
        let price = BigDecimal::from(200);

        assert_eq!(apply_discount(&price, 0), BigDecimal::from(200));
        assert_eq!(apply_discount(&price, 25), BigDecimal::from(150));
        assert_eq!(apply_discount(&price, 100), BigDecimal::from(0));
    }

    #[test]
    fn test_apply_discount_clamps_out_of_range_values() -> () {
        let price = BigDecimal::from(80);

        assert_eq!(apply_discount(&price, 150), BigDecimal::from(0));
        assert_eq!(apply_discount(&price, -10), BigDecimal::from(80));
    }
}
