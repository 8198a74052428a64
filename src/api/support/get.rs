use std::convert::TryInto;

use actix_web::{
    web,
    web::{Path, Query},
    HttpResponse,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::api::models::{
    common::ListResponse,
    error::APIError,
    support::{Ticket, TicketDetails, TicketMessage, TicketStatus},
};
use crate::db::models::{
    support_ticket::SupportTicket as DBSupportTicket,
    ticket_message::TicketMessage as DBTicketMessage,
};
use crate::shards::ShardSet;

#[derive(Deserialize)]
pub struct Info {
    user_id: Option<String>,
    status: Option<TicketStatus>,
    page: Option<i64>,
    limit: Option<i64>,
}

pub async fn tickets(
    shards: web::Data<ShardSet>,
    query: Query<Info>,
) -> Result<HttpResponse, APIError> {
    let conn = shards.primary().get()?;
    let user_id = query.user_id.clone();
    let status = query.status;
    let page = query.page.unwrap_or(0);
    let limit = query.limit.unwrap_or(10);

    let (tickets, total_pages) =
        web::block(move || DBSupportTicket::get_list(&conn, user_id, status, page, limit)).await?;

    let tickets = tickets
        .into_iter()
        .map(|ticket| ticket.try_into())
        .collect::<Result<Vec<Ticket>, APIError>>()?;

    Ok(HttpResponse::Ok().json(ListResponse {
        page,
        total_pages,
        results: tickets,
    }))
}

#[derive(Deserialize)]
pub struct PathInfo {
    id: Uuid,
}

pub async fn ticket(
    shards: web::Data<ShardSet>,
    path: Path<PathInfo>,
) -> Result<HttpResponse, APIError> {
    let id = path.id;

    let conn = shards.primary().get()?;
    let (ticket, messages) = web::block::<_, _, APIError>(move || {
        let ticket = DBSupportTicket::get(&conn, &id)?;
        let messages = DBTicketMessage::get_for_ticket(&conn, &id)?;

        Ok((ticket, messages))
    })
    .await?;

    Ok(HttpResponse::Ok().json(TicketDetails {
        ticket: ticket.try_into()?,
        messages: messages
            .into_iter()
            .map(|message| TicketMessage::from(message))
            .collect(),
    }))
}
