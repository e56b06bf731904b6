use async_trait::async_trait;

use super::db::DBClient;
use crate::models::adminmodel::Admin;

#[async_trait]
pub trait AdminExt {
    async fn get_admin(
        &self,
        admin_id: Option<i64>,
        email: Option<&str>,
    ) -> Result<Option<Admin>, sqlx::Error>;

    /// Creates the admin, or resets name and password when the email exists.
    async fn upsert_admin(
        &self,
        email: &str,
        name: &str,
        password: &str,
    ) -> Result<Admin, sqlx::Error>;
}

#[async_trait]
impl AdminExt for DBClient {
    async fn get_admin(
        &self,
        admin_id: Option<i64>,
        email: Option<&str>,
    ) -> Result<Option<Admin>, sqlx::Error> {
        let mut admin: Option<Admin> = None;

        if let Some(admin_id) = admin_id {
            admin = sqlx::query_as::<_, Admin>(
                "SELECT id, email, name, password, created_at FROM admins WHERE id = $1",
            )
            .bind(admin_id)
            .fetch_optional(&self.pool)
            .await?;
        } else if let Some(email) = email {
            admin = sqlx::query_as::<_, Admin>(
                "SELECT id, email, name, password, created_at FROM admins WHERE LOWER(email) = LOWER($1)",
            )
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        }

        Ok(admin)
    }

    async fn upsert_admin(
        &self,
        email: &str,
        name: &str,
        password: &str,
    ) -> Result<Admin, sqlx::Error> {
        sqlx::query_as::<_, Admin>(
            r#"
            INSERT INTO admins (email, name, password)
            VALUES (LOWER($1), $2, $3)
            ON CONFLICT (email) DO UPDATE SET name = EXCLUDED.name, password = EXCLUDED.password
            RETURNING id, email, name, password, created_at
            "#,
        )
        .bind(email)
        .bind(name)
        .bind(password)
        .fetch_one(&self.pool)
        .await
    }
}
