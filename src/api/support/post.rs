use std::convert::TryInto;

use actix_web::{web, web::Path, HttpResponse};
use diesel::Connection;
use log::info;
use serde::Deserialize;
use uuid::Uuid;

use crate::api::models::{
    error::APIError,
    support::{NewTicketMessageRequest, NewTicketRequest, Ticket, TicketDetails, TicketMessage},
};
use crate::db::models::{
    support_ticket::{NewSupportTicket, SupportTicket as DBSupportTicket},
    ticket_message::{NewTicketMessage, TicketMessage as DBTicketMessage},
};
use crate::shards::ShardSet;

/// Opens a ticket, optionally with the user's first message in the same
/// transaction.
pub async fn ticket(
    shards: web::Data<ShardSet>,
    body: web::Json<NewTicketRequest>,
) -> Result<HttpResponse, APIError> {
    let request = body.into_inner();
    request.validate()?;

    let conn = shards.primary().get()?;
    let (ticket, messages) = web::block::<_, _, APIError>(move || {
        conn.transaction(|| {
            let ticket = DBSupportTicket::insert(
                &conn,
                &NewSupportTicket {
                    user_id: request.user_id.clone(),
                    subject: request.subject.clone(),
                },
            )?;

            let mut messages = Vec::new();
            if let Some(message) = request.message {
                messages.push(DBTicketMessage::insert(
                    &conn,
                    &NewTicketMessage {
                        ticket_id: ticket.id,
                        sender_id: request.user_id.clone(),
                        body: message,
                        from_support: false,
                    },
                )?);
            }

            Ok((ticket, messages))
        })
    })
    .await?;

    info!("opened support ticket {}", ticket.id);

    Ok(HttpResponse::Ok().json(TicketDetails {
        ticket: ticket.try_into()?,
        messages: messages
            .into_iter()
            .map(|message| TicketMessage::from(message))
            .collect(),
    }))
}

#[derive(Deserialize)]
pub struct PathInfo {
    id: Uuid,
}

pub async fn ticket_message(
    shards: web::Data<ShardSet>,
    path: Path<PathInfo>,
    body: web::Json<NewTicketMessageRequest>,
) -> Result<HttpResponse, APIError> {
    let id = path.id;
    let request = body.into_inner();
    request.validate()?;

    let conn = shards.primary().get()?;
    let message = web::block::<_, _, APIError>(move || {
        // the ticket lookup keeps messages from landing on missing tickets
        DBSupportTicket::get(&conn, &id)?;
        Ok(DBTicketMessage::insert(
            &conn,
            &NewTicketMessage {
                ticket_id: id,
                sender_id: request.sender_id,
                body: request.body,
                from_support: request.from_support.unwrap_or(false),
            },
        )?)
    })
    .await?;

    Ok(HttpResponse::Ok().json(TicketMessage::from(message)))
}
