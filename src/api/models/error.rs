use actix_web::{error::BlockingError, http::StatusCode, HttpResponse, ResponseError};
use derive_more::{Display, Error};
use log::error;
use serde::Serialize;

use crate::shards::ShardId;

#[derive(Serialize)]
struct ErrorResponse {
    code: u16,
    error: String,
    message: String,
}

#[derive(Error, Display, Debug)]
pub enum APIError {
    #[display(fmt = "not found")]
    NotFound,

    #[display(fmt = "invalid value: {}", description)]
    InvalidValue { description: String },

    #[display(fmt = "conflict: {}", description)]
    Conflict { description: String },

    // payout rejections carry their message verbatim, the storefront shows
    // them to the user as-is
    #[display(fmt = "{}", description)]
    PayoutRejected { description: String },

    #[display(fmt = "{} database is not available", shard)]
    ShardUnavailable { shard: ShardId },

    #[display(fmt = "Database error: {}", description)]
    DBError { description: String },

    #[display(fmt = "email error: {}", description)]
    EmailError { description: String },

    #[display(fmt = "monitoring error: {}", description)]
    MonitoringError { description: String },

    #[display(fmt = "internal: {}", description)]
    Internal { description: String },

    #[display(fmt = "unknown error")]
    Unknown,
}

impl APIError {
    pub fn name(&self) -> String {
        match self {
            APIError::NotFound => "NotFound".to_string(),
            APIError::InvalidValue { description: _ } => "InvalidValue".to_string(),
            APIError::Conflict { description: _ } => "Conflict".to_string(),
            APIError::PayoutRejected { description: _ } => "PayoutRejected".to_string(),
            APIError::ShardUnavailable { shard: _ } => "ShardUnavailable".to_string(),
            APIError::DBError { description: _ } => "DBError".to_string(),
            APIError::EmailError { description: _ } => "EmailError".to_string(),
            APIError::MonitoringError { description: _ } => "MonitoringError".to_string(),
            APIError::Internal { description: _ } => "Internal".to_string(),
            APIError::Unknown => "Unknown".to_string(),
        }
    }
}

impl ResponseError for APIError {
    fn status_code(&self) -> StatusCode {
        match self {
            APIError::NotFound => StatusCode::NOT_FOUND,
            APIError::InvalidValue { description: _ } => StatusCode::BAD_REQUEST,
            APIError::Conflict { description: _ } => StatusCode::CONFLICT,
            APIError::PayoutRejected { description: _ } => StatusCode::BAD_REQUEST,
            APIError::ShardUnavailable { shard: _ } => StatusCode::SERVICE_UNAVAILABLE,
            APIError::DBError { description: _ } => StatusCode::INTERNAL_SERVER_ERROR,
            APIError::EmailError { description: _ } => StatusCode::INTERNAL_SERVER_ERROR,
            APIError::MonitoringError { description: _ } => StatusCode::BAD_GATEWAY,
            APIError::Internal { description: _ } => StatusCode::INTERNAL_SERVER_ERROR,
            APIError::Unknown => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Server side failures are logged in full and answered with a generic
    /// body, the error details never reach the client.
    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();
        let message = match self {
            APIError::ShardUnavailable { shard: _ } => self.to_string(),
            _ if status_code.is_server_error() => {
                error!("{}", self);
                "internal server error".to_string()
            }
            _ => self.to_string(),
        };
        let error_response = ErrorResponse {
            code: status_code.as_u16(),
            message,
            error: self.name(),
        };
        HttpResponse::build(status_code).json(error_response)
    }
}

impl From<diesel::result::Error> for APIError {
    fn from(error: diesel::result::Error) -> Self {
        match error {
            diesel::result::Error::NotFound => APIError::NotFound,
            diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::UniqueViolation,
                information,
            ) => APIError::Conflict {
                description: information.message().to_string(),
            },
            _ => APIError::DBError {
                description: error.to_string(),
            },
        }
    }
}

impl From<BlockingError<diesel::result::Error>> for APIError {
    fn from(error: BlockingError<diesel::result::Error>) -> Self {
        match error {
            BlockingError::Error(db_error) => APIError::from(db_error),
            BlockingError::Canceled => APIError::DBError {
                description: error.to_string(),
            },
        }
    }
}

impl From<BlockingError<APIError>> for APIError {
    fn from(error: BlockingError<APIError>) -> Self {
        match error {
            BlockingError::Error(api_error) => api_error,
            BlockingError::Canceled => APIError::DBError {
                description: format!("{}", error),
            },
        }
    }
}

impl From<r2d2::Error> for APIError {
    fn from(error: r2d2::Error) -> Self {
        APIError::DBError {
            description: error.to_string(),
        }
    }
}

impl From<reqwest::Error> for APIError {
    fn from(error: reqwest::Error) -> Self {
        APIError::MonitoringError {
            description: error.to_string(),
        }
    }
}

impl From<lettre_email::error::Error> for APIError {
    fn from(error: lettre_email::error::Error) -> Self {
        APIError::EmailError {
            description: error.to_string(),
        }
    }
}

impl From<lettre::smtp::error::Error> for APIError {
    fn from(error: lettre::smtp::error::Error) -> Self {
        APIError::EmailError {
            description: error.to_string(),
        }
    }
}

impl From<native_tls::Error> for APIError {
    fn from(error: native_tls::Error) -> Self {
        APIError::EmailError {
            description: error.to_string(),
        }
    }
}

impl From<std::num::ParseIntError> for APIError {
    fn from(error: std::num::ParseIntError) -> Self {
        APIError::InvalidValue {
            description: error.to_string(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use actix_web::dev::{Body, ResponseBody};

    fn body_json(response: &HttpResponse) -> serde_json::Value {
        match response.body() {
            ResponseBody::Body(Body::Bytes(bytes)) => {
                serde_json::from_slice(bytes).expect("body is json")
            }
            _ => panic!("expected a bytes body"),
        }
    }

    #[test]
    fn test_server_errors_answer_with_generic_body() -> () {
        let error = APIError::DBError {
            description: "connection refused on 10.0.0.12".to_string(),
        };
        let response = error.error_response();
        let body = body_json(&response);

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "DBError");
        assert_eq!(body["message"], "internal server error");
    }

    #[test]
    fn test_client_errors_keep_their_message() -> () {
        let error = APIError::InvalidValue {
            description: "account_size must be positive".to_string(),
        };
        let response = error.error_response();
        let body = body_json(&response);

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "invalid value: account_size must be positive");
    }

    #[test]
    fn test_shard_unavailable_names_the_shard() -> () {
        let error = APIError::ShardUnavailable {
            shard: ShardId::Bolt,
        };
        let response = error.error_response();
        let body = body_json(&response);

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["message"], "bolt database is not available");
    }

    #[test]
    fn test_payout_rejections_keep_their_exact_message() -> () {
        let error = APIError::PayoutRejected {
            description: "Minimum payout amount is $100".to_string(),
        };
        let response = error.error_response();
        let body = body_json(&response);

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Minimum payout amount is $100");
    }

    #[test]
    fn test_unique_violations_convert_to_conflict() -> () {
        let error = APIError::from(diesel::result::Error::NotFound);

        match error {
            APIError::NotFound => (),
            other => panic!("expected not found, got {:?}", other),
        }
    }
}
