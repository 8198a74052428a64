use chrono::NaiveDateTime;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::models::support_ticket::SupportTicket;
use crate::db::schema::ticket_messages;
use crate::Conn;

#[derive(Queryable, Identifiable, Associations, Clone, Debug)]
#[belongs_to(SupportTicket, foreign_key = "ticket_id")]
#[table_name = "ticket_messages"]
pub struct TicketMessage {
    pub id: Uuid,
    pub created_at: NaiveDateTime,
    pub ticket_id: Uuid,
    pub sender_id: String,
    pub body: String,
    pub from_support: bool,
}

impl TicketMessage {
    pub fn get_for_ticket(
        conn: &Conn,
        ticket_id: &Uuid,
    ) -> Result<Vec<TicketMessage>, diesel::result::Error> {
        ticket_messages::table
            .filter(ticket_messages::dsl::ticket_id.eq(ticket_id))
            .order_by(ticket_messages::dsl::created_at.asc())
            .load(conn)
    }

    pub fn insert(
        conn: &Conn,
        new_message: &NewTicketMessage,
    ) -> Result<TicketMessage, diesel::result::Error> {
        diesel::insert_into(ticket_messages::table)
            .values(new_message)
            .get_result(conn)
    }
}

#[derive(Insertable, Debug)]
#[table_name = "ticket_messages"]
pub struct NewTicketMessage {
    pub ticket_id: Uuid,
    pub sender_id: String,
    pub body: String,
    pub from_support: bool,
}
