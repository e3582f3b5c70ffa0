use serde::{Deserialize, Serialize};

use crate::orders::repo::PointsEntry;

#[derive(Debug, Deserialize)]
pub struct UpsertProfileRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub default_address: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PointsResponse {
    pub balance: i64,
    pub history: Vec<PointsEntry>,
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    20
}
