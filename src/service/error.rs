use thiserror::Error;

use crate::{
    db::db::{is_foreign_key_violation, is_unique_violation},
    error::HttpError,
    service::storage::StorageError,
};

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Property {0} not found")]
    PropertyNotFound(i64),

    #[error("Agent {0} not found")]
    AgentNotFound(i64),

    #[error("agent is still assigned to one or more properties")]
    AgentInUse,

    #[error("Sector {0} not found")]
    SectorNotFound(i64),

    #[error("Sector '{0}' already exists")]
    SectorExists(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ServiceError {
    /// Turns the agent-delete foreign-key violation into `AgentInUse`.
    pub fn from_agent_delete(err: sqlx::Error) -> Self {
        if is_foreign_key_violation(&err) {
            ServiceError::AgentInUse
        } else {
            ServiceError::Database(err)
        }
    }

    pub fn from_sector_insert(err: sqlx::Error, name: &str) -> Self {
        if is_unique_violation(&err) {
            ServiceError::SectorExists(name.to_string())
        } else {
            ServiceError::Database(err)
        }
    }
}

impl From<StorageError> for ServiceError {
    fn from(err: StorageError) -> Self {
        ServiceError::Storage(err.to_string())
    }
}

impl From<ServiceError> for HttpError {
    fn from(error: ServiceError) -> Self {
        match error {
            ServiceError::PropertyNotFound(_)
            | ServiceError::AgentNotFound(_)
            | ServiceError::SectorNotFound(_) => HttpError::not_found(error.to_string()),

            ServiceError::AgentInUse | ServiceError::SectorExists(_) => {
                HttpError::conflict(error.to_string())
            }

            ServiceError::Validation(_) => HttpError::bad_request(error.to_string()),

            ServiceError::Storage(_) => HttpError::bad_gateway(error.to_string()),

            ServiceError::Database(_) => HttpError::server_error(error.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::db::tests::pg_error;
    use axum::http::StatusCode;

    #[test]
    fn maps_to_http_statuses() {
        let cases = [
            (ServiceError::PropertyNotFound(7), StatusCode::NOT_FOUND),
            (ServiceError::AgentInUse, StatusCode::CONFLICT),
            (ServiceError::SectorExists("Sector A".into()), StatusCode::CONFLICT),
            (ServiceError::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (ServiceError::Storage("down".into()), StatusCode::BAD_GATEWAY),
            (ServiceError::Database(sqlx::Error::RowNotFound), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (error, status) in cases {
            assert_eq!(HttpError::from(error).status, status);
        }
    }

    #[test]
    fn agent_in_use_message_is_targeted() {
        let http = HttpError::from(ServiceError::AgentInUse);
        assert_eq!(http.message, "agent is still assigned to one or more properties");
    }

    #[test]
    fn non_constraint_errors_stay_database_errors() {
        assert!(matches!(
            ServiceError::from_agent_delete(sqlx::Error::RowNotFound),
            ServiceError::Database(_)
        ));
        assert!(matches!(
            ServiceError::from_sector_insert(sqlx::Error::PoolTimedOut, "Sector A"),
            ServiceError::Database(_)
        ));
    }

    #[test]
    fn referenced_agent_delete_is_a_conflict() {
        let error = ServiceError::from_agent_delete(pg_error("23503"));
        assert!(matches!(error, ServiceError::AgentInUse));

        let http = HttpError::from(error);
        assert_eq!(http.status, StatusCode::CONFLICT);
        assert_eq!(http.message, "agent is still assigned to one or more properties");
    }

    #[test]
    fn duplicate_sector_is_a_conflict() {
        let error = ServiceError::from_sector_insert(pg_error("23505"), "Sector A");
        assert!(matches!(&error, ServiceError::SectorExists(name) if name == "Sector A"));
        assert_eq!(HttpError::from(error).status, StatusCode::CONFLICT);
    }

    #[test]
    fn other_constraint_codes_stay_database_errors() {
        assert!(matches!(
            ServiceError::from_agent_delete(pg_error("23505")),
            ServiceError::Database(_)
        ));
        assert!(matches!(
            ServiceError::from_sector_insert(pg_error("23503"), "Sector A"),
            ServiceError::Database(_)
        ));
    }
}
