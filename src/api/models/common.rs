use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
pub struct ListResponse<T> {
    pub page: i64,
    pub total_pages: i64,
    pub results: Vec<T>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct Health {
    pub status: String,
    pub timestamp: String,
    pub active_monitors: i64,
}
