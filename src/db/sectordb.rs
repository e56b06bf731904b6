use async_trait::async_trait;

use super::db::DBClient;
use crate::models::sectormodel::Sector;

#[async_trait]
pub trait SectorExt {
    /// Sectors by name; `limit` caps the result (footer links).
    async fn get_sectors(&self, limit: Option<i64>) -> Result<Vec<Sector>, sqlx::Error>;

    async fn save_sector(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> Result<Sector, sqlx::Error>;

    async fn delete_sector(&self, sector_id: i64) -> Result<Option<Sector>, sqlx::Error>;
}

#[async_trait]
impl SectorExt for DBClient {
    async fn get_sectors(&self, limit: Option<i64>) -> Result<Vec<Sector>, sqlx::Error> {
        // LIMIT NULL is no limit in Postgres
        sqlx::query_as::<_, Sector>(
            r#"
            SELECT id, name, description, created_at
            FROM sectors
            ORDER BY name ASC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }

    async fn save_sector(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> Result<Sector, sqlx::Error> {
        sqlx::query_as::<_, Sector>(
            r#"
            INSERT INTO sectors (name, description)
            VALUES ($1, $2)
            RETURNING id, name, description, created_at
            "#,
        )
        .bind(name)
        .bind(description)
        .fetch_one(&self.pool)
        .await
    }

    async fn delete_sector(&self, sector_id: i64) -> Result<Option<Sector>, sqlx::Error> {
        sqlx::query_as::<_, Sector>(
            r#"
            DELETE FROM sectors
            WHERE id = $1
            RETURNING id, name, description, created_at
            "#,
        )
        .bind(sector_id)
        .fetch_optional(&self.pool)
        .await
    }
}
