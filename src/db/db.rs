// db/db.rs
use sqlx::{Pool, Postgres};

/// Postgres error code raised when a row is still referenced elsewhere.
pub const FOREIGN_KEY_VIOLATION: &str = "23503";
/// Postgres error code raised on a duplicate unique key.
pub const UNIQUE_VIOLATION: &str = "23505";

#[derive(Debug, Clone)]
pub struct DBClient {
    pub pool: Pool<Postgres>,
}

impl DBClient {
    pub fn new(pool: Pool<Postgres>) -> Self {
        DBClient { pool }
    }
}

/// SQLSTATE code of a database error, if the error came from Postgres.
pub fn pg_code(err: &sqlx::Error) -> Option<String> {
    err.as_database_error()
        .and_then(|db_err| db_err.code())
        .map(|code| code.into_owned())
}

pub fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    pg_code(err).as_deref() == Some(FOREIGN_KEY_VIOLATION)
}

pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    pg_code(err).as_deref() == Some(UNIQUE_VIOLATION)
}
