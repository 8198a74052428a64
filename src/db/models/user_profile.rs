use chrono::NaiveDateTime;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::schema::user_profiles;
use crate::Conn;

#[derive(Queryable, Identifiable, Clone, Debug)]
#[table_name = "user_profiles"]
pub struct UserProfile {
    pub id: Uuid,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub user_id: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub friendly_id: Option<String>,
}

impl UserProfile {
    pub fn get(conn: &Conn, id: &Uuid) -> Result<UserProfile, diesel::result::Error> {
        user_profiles::table.find(id).first(conn)
    }

    pub fn get_by_user_id(conn: &Conn, user_id: &str) -> Result<UserProfile, diesel::result::Error> {
        user_profiles::table
            .filter(user_profiles::dsl::user_id.eq(user_id))
            .first(conn)
    }

    pub fn get_all(conn: &Conn) -> Result<Vec<UserProfile>, diesel::result::Error> {
        user_profiles::table
            .order_by(user_profiles::dsl::created_at.asc())
            .load(conn)
    }

    /// Profiles come from the external auth provider, a repeated sign up
    /// refreshes the stored copy instead of failing.
    pub fn upsert(
        conn: &Conn,
        new_user_profile: &NewUserProfile,
    ) -> Result<UserProfile, diesel::result::Error> {
        diesel::insert_into(user_profiles::table)
            .values(new_user_profile)
            .on_conflict(user_profiles::dsl::user_id)
            .do_update()
            .set((
                user_profiles::dsl::email.eq(&new_user_profile.email),
                user_profiles::dsl::first_name.eq(&new_user_profile.first_name),
                user_profiles::dsl::last_name.eq(&new_user_profile.last_name),
                user_profiles::dsl::friendly_id.eq(&new_user_profile.friendly_id),
            ))
            .get_result(conn)
    }

    pub fn update(
        conn: &Conn,
        user_id: &str,
        update: &UpdateUserProfile,
    ) -> Result<UserProfile, diesel::result::Error> {
        diesel::update(user_profiles::table.filter(user_profiles::dsl::user_id.eq(user_id)))
            .set(update)
            .get_result(conn)
    }

    pub fn full_name(&self) -> String {
        let mut parts: Vec<&str> = Vec::new();
        if let Some(first_name) = &self.first_name {
            parts.push(first_name);
        }
        if let Some(last_name) = &self.last_name {
            parts.push(last_name);
        }
        parts.join(" ")
    }
}

#[derive(Insertable, Debug)]
#[table_name = "user_profiles"]
pub struct NewUserProfile {
    pub user_id: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub friendly_id: Option<String>,
}

#[derive(AsChangeset, Debug)]
#[table_name = "user_profiles"]
pub struct UpdateUserProfile {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub friendly_id: Option<String>,
}
