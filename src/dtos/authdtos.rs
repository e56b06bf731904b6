use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::adminmodel::Admin;

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct LoginAdminDto {
    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Email is invalid")
    )]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AdminLoginResponseDto {
    pub status: String,
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterAdminDto {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl FilterAdminDto {
    pub fn filter_admin(admin: &Admin) -> Self {
        FilterAdminDto {
            id: admin.id,
            email: admin.email.clone(),
            name: admin.name.clone(),
            created_at: admin.created_at,
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct Response {
    pub status: &'static str,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_requires_a_valid_email() {
        let dto = LoginAdminDto {
            email: "not-an-email".to_string(),
            password: "secret".to_string(),
        };
        assert!(dto.validate().is_err());

        let dto = LoginAdminDto {
            email: "admin@faisaltown.pk".to_string(),
            password: "secret".to_string(),
        };
        assert!(dto.validate().is_ok());
    }
}
