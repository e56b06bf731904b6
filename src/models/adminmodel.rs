use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Admin {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub password: String,
    pub created_at: DateTime<Utc>,
}
