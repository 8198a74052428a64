use chrono::NaiveDateTime;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::schema::monitoring_logs;
use crate::Conn;

#[derive(Queryable, Identifiable, Clone, Debug)]
#[table_name = "monitoring_logs"]
pub struct MonitoringLog {
    pub id: Uuid,
    pub created_at: NaiveDateTime,
    pub challenge_id: Uuid,
    pub log_type: String,
    pub message: String,
}

impl MonitoringLog {
    pub fn insert(
        conn: &Conn,
        new_log: &NewMonitoringLog,
    ) -> Result<MonitoringLog, diesel::result::Error> {
        diesel::insert_into(monitoring_logs::table)
            .values(new_log)
            .get_result(conn)
    }
}

#[derive(Insertable, Debug)]
#[table_name = "monitoring_logs"]
pub struct NewMonitoringLog {
    pub challenge_id: Uuid,
    pub log_type: String,
    pub message: String,
}
