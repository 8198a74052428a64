use actix_web::{web, HttpResponse};
use log::info;
use serde::Deserialize;
use serde_json::json;

use crate::api::models::error::APIError;
use crate::notifications;

#[derive(Debug, Deserialize)]
pub struct SendEmailRequest {
    pub to: Vec<String>,
    pub subject: String,
    pub message: String,
}

impl SendEmailRequest {
    fn validate(&self) -> Result<(), APIError> {
        if self.to.is_empty() {
            return Err(APIError::InvalidValue {
                description: "to must not be empty".to_owned(),
            });
        }

        if self.to.iter().any(|address| !address.contains('@')) {
            return Err(APIError::InvalidValue {
                description: "to contains an invalid address".to_owned(),
            });
        }

        if self.subject.trim().is_empty() {
            return Err(APIError::InvalidValue {
                description: "subject must not be empty".to_owned(),
            });
        }

        Ok(())
    }
}

pub async fn send(body: web::Json<SendEmailRequest>) -> Result<HttpResponse, APIError> {
    let request = body.into_inner();
    request.validate()?;

    let recipients = request.to.len();
    web::block::<_, _, APIError>(move || {
        notifications::send_email(request.to, request.subject, request.message)
    })
    .await?;

    info!("sent ad hoc email to {} recipients", recipients);

    Ok(HttpResponse::Ok().json(json!({ "sent": true })))
}
