use std::convert::TryInto;

use actix_web::{web, web::Path, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::api::models::{
    error::APIError,
    support::{Ticket, UpdateTicketRequest},
};
use crate::db::models::support_ticket::SupportTicket as DBSupportTicket;
use crate::shards::ShardSet;

#[derive(Deserialize)]
pub struct PathInfo {
    id: Uuid,
}

pub async fn ticket(
    shards: web::Data<ShardSet>,
    path: Path<PathInfo>,
    body: web::Json<UpdateTicketRequest>,
) -> Result<HttpResponse, APIError> {
    let id = path.id;
    let status = body.status;

    let conn = shards.primary().get()?;
    let ticket = web::block(move || DBSupportTicket::set_status(&conn, &id, status)).await?;

    let ticket: Ticket = ticket.try_into()?;

    Ok(HttpResponse::Ok().json(ticket))
}
