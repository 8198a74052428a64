use serde::{Deserialize, Serialize};

use super::error::APIError;

#[derive(Debug, Deserialize)]
pub struct ValidateCouponRequest {
    pub coupon_code: String,
    pub challenge_type: String,
}

impl ValidateCouponRequest {
    pub fn validate(&self) -> Result<(), APIError> {
        if self.coupon_code.trim().is_empty() {
            return Err(APIError::InvalidValue {
                description: "coupon_code must not be empty".to_owned(),
            });
        }

        Ok(())
    }
}

/// Mirrors the shape the storefront expects: `code` and `discount_percent`
/// are only present on a successful validation.
#[derive(Debug, Serialize, Deserialize)]
pub struct CouponValidationResult {
    pub valid: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_percent: Option<i32>,
}

impl CouponValidationResult {
    pub fn valid(code: &str, discount_percent: i32) -> CouponValidationResult {
        CouponValidationResult {
            valid: true,
            message: "Coupon applied".to_owned(),
            code: Some(code.to_owned()),
            discount_percent: Some(discount_percent),
        }
    }

    pub fn invalid(message: &str) -> CouponValidationResult {
        CouponValidationResult {
            valid: false,
            message: message.to_owned(),
            code: None,
            discount_percent: None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_invalid_result_omits_optional_fields() -> () {
        let result = CouponValidationResult::invalid("Invalid coupon code");
        let json = serde_json::to_value(&result).expect("result serializes");

        assert_eq!(json["valid"], false);
        assert_eq!(json["message"], "Invalid coupon code");
        assert_eq!(json.get("code"), None);
        assert_eq!(json.get("discount_percent"), None);
    }

    #[test]
    fn test_valid_result_carries_code_and_discount() -> () {
        let result = CouponValidationResult::valid("FREETRIAL100", 100);
        let json = serde_json::to_value(&result).expect("result serializes");

        assert_eq!(json["valid"], true);
        assert_eq!(json["code"], "FREETRIAL100");
        assert_eq!(json["discount_percent"], 100);
    }
}
