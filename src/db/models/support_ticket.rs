use chrono::NaiveDateTime;
use diesel::prelude::*;
use uuid::Uuid;

use crate::api::models::support::TicketStatus;
use crate::db::schema::support_tickets;
use crate::Conn;

use super::pagination::Paginate;

#[derive(Queryable, Identifiable, Clone, Debug)]
#[table_name = "support_tickets"]
pub struct SupportTicket {
    pub id: Uuid,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub user_id: String,
    pub subject: String,
    pub status: i16,
}

impl SupportTicket {
    pub fn get(conn: &Conn, id: &Uuid) -> Result<SupportTicket, diesel::result::Error> {
        support_tickets::table.find(id).first(conn)
    }

    pub fn get_list(
        conn: &Conn,
        user_id: Option<String>,
        status: Option<TicketStatus>,
        page: i64,
        limit: i64,
    ) -> Result<(Vec<SupportTicket>, i64), diesel::result::Error> {
        let mut query = support_tickets::table
            .order_by(support_tickets::dsl::created_at.desc())
            .into_boxed();

        if let Some(user_id) = user_id {
            query = query.filter(support_tickets::dsl::user_id.eq(user_id));
        }

        if let Some(status) = status {
            query = query.filter(support_tickets::dsl::status.eq::<i16>(status.into()));
        }

        let query = query.paginate(page).per_page(limit);

        query.load_and_count_pages::<SupportTicket>(conn)
    }

    pub fn insert(
        conn: &Conn,
        new_ticket: &NewSupportTicket,
    ) -> Result<SupportTicket, diesel::result::Error> {
        diesel::insert_into(support_tickets::table)
            .values(new_ticket)
            .get_result(conn)
    }

    pub fn set_status(
        conn: &Conn,
        id: &Uuid,
        status: TicketStatus,
    ) -> Result<SupportTicket, diesel::result::Error> {
        diesel::update(support_tickets::table.find(id))
            .set(support_tickets::dsl::status.eq::<i16>(status.into()))
            .get_result(conn)
    }
}

#[derive(Insertable, Debug)]
#[table_name = "support_tickets"]
pub struct NewSupportTicket {
    pub user_id: String,
    pub subject: String,
}
