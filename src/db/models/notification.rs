use chrono::NaiveDateTime;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::schema::notifications;
use crate::Conn;

use super::pagination::Paginate;

#[derive(Queryable, Identifiable, Clone, Debug)]
#[table_name = "notifications"]
pub struct Notification {
    pub id: Uuid,
    pub created_at: NaiveDateTime,
    pub user_id: String,
    pub title: String,
    pub message: String,
    pub kind: String,
    pub is_read: bool,
}

impl Notification {
    pub fn get_list(
        conn: &Conn,
        user_id: &str,
        unread_only: bool,
        page: i64,
        limit: i64,
    ) -> Result<(Vec<Notification>, i64), diesel::result::Error> {
        let mut query = notifications::table
            .filter(notifications::dsl::user_id.eq(user_id.to_owned()))
            .order_by(notifications::dsl::created_at.desc())
            .into_boxed();

        if unread_only {
            query = query.filter(notifications::dsl::is_read.eq(false));
        }

        let query = query.paginate(page).per_page(limit);

        query.load_and_count_pages::<Notification>(conn)
    }

    pub fn insert(
        conn: &Conn,
        new_notification: &NewNotification,
    ) -> Result<Notification, diesel::result::Error> {
        diesel::insert_into(notifications::table)
            .values(new_notification)
            .get_result(conn)
    }

    pub fn mark_read(conn: &Conn, id: &Uuid) -> Result<Notification, diesel::result::Error> {
        diesel::update(notifications::table.find(id))
            .set(notifications::dsl::is_read.eq(true))
            .get_result(conn)
    }
}

#[derive(Insertable, Debug)]
#[table_name = "notifications"]
pub struct NewNotification {
    pub user_id: String,
    pub title: String,
    pub message: String,
    pub kind: String,
}
