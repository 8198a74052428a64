use chrono::NaiveDateTime;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::schema::rule_violations;
use crate::Conn;

#[derive(Queryable, Identifiable, Clone, Debug)]
#[table_name = "rule_violations"]
pub struct RuleViolation {
    pub id: Uuid,
    pub created_at: NaiveDateTime,
    pub challenge_id: Uuid,
    pub rule: String,
    pub severity: i16,
    pub description: Option<String>,
    pub resolved: bool,
}

impl RuleViolation {
    pub fn get_for_challenge(
        conn: &Conn,
        challenge_id: &Uuid,
        resolved: Option<bool>,
    ) -> Result<Vec<RuleViolation>, diesel::result::Error> {
        let mut query = rule_violations::table
            .filter(rule_violations::dsl::challenge_id.eq(*challenge_id))
            .order_by(rule_violations::dsl::created_at.desc())
            .into_boxed();

        if let Some(resolved) = resolved {
            query = query.filter(rule_violations::dsl::resolved.eq(resolved));
        }

        query.load(conn)
    }

    pub fn insert(
        conn: &Conn,
        new_violation: &NewRuleViolation,
    ) -> Result<RuleViolation, diesel::result::Error> {
        diesel::insert_into(rule_violations::table)
            .values(new_violation)
            .get_result(conn)
    }

    pub fn resolve(conn: &Conn, id: &Uuid) -> Result<RuleViolation, diesel::result::Error> {
        diesel::update(rule_violations::table.find(id))
            .set(rule_violations::dsl::resolved.eq(true))
            .get_result(conn)
    }
}

#[derive(Insertable, Debug)]
#[table_name = "rule_violations"]
pub struct NewRuleViolation {
    pub challenge_id: Uuid,
    pub rule: String,
    pub severity: i16,
    pub description: Option<String>,
}
