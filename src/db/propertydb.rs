use async_trait::async_trait;
use sqlx::{postgres::PgArguments, query::QueryAs, types::Json, Postgres};
use uuid::Uuid;

use crate::{
    db::{
        db::DBClient,
        query::{property_listing_query, EqConstraint, PROPERTY_SELECT},
    },
    models::propertymodel::{Counter, PropertyRow},
};

/// A listing in its persisted (snake_case) shape, as written by the admin
/// forms. Counters, ids and timestamps are owned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyRecord {
    pub title: String,
    pub description: String,
    pub price: i64,
    pub listing_type: String,
    pub category: String,
    pub property_type: String,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub area: f64,
    pub area_unit: String,
    pub sector_id: Option<i64>,
    pub street: Option<String>,
    pub address: String,
    pub images: Vec<String>,
    pub features: Vec<String>,
    pub ready_to_move: bool,
    pub is_featured: bool,
    pub agent_id: Option<i64>,
}

const JOIN_SECTORS: &str = "LEFT JOIN sectors s ON s.id = p.sector_id";

const IMAGES_IN_USE_SQL: &str = r#"
    SELECT DISTINCT img
    FROM properties p,
         jsonb_array_elements_text(COALESCE(p.images, '[]'::jsonb)) AS img
    WHERE img = ANY($1)
"#;

fn select_from(source: &str, condition: &str) -> String {
    format!("{} FROM {} p {} {}", PROPERTY_SELECT, source, JOIN_SECTORS, condition)
}

fn bind_record<'q>(
    query: QueryAs<'q, Postgres, PropertyRow, PgArguments>,
    record: &'q PropertyRecord,
) -> QueryAs<'q, Postgres, PropertyRow, PgArguments> {
    query
        .bind(record.title.as_str())
        .bind(record.description.as_str())
        .bind(record.price)
        .bind(record.listing_type.as_str())
        .bind(record.category.as_str())
        .bind(record.property_type.as_str())
        .bind(record.bedrooms)
        .bind(record.bathrooms)
        .bind(record.area)
        .bind(record.area_unit.as_str())
        .bind(record.sector_id)
        .bind(record.street.as_deref())
        .bind(record.address.as_str())
        .bind(Json(&record.images))
        .bind(Json(&record.features))
        .bind(record.ready_to_move)
        .bind(record.is_featured)
        .bind(record.agent_id)
}

#[async_trait]
pub trait PropertyExt {
    async fn get_properties(
        &self,
        constraints: &[EqConstraint],
        limit: Option<i64>,
    ) -> Result<Vec<PropertyRow>, sqlx::Error>;

    async fn get_property_by_uuid(
        &self,
        property_uuid: Uuid,
    ) -> Result<Option<PropertyRow>, sqlx::Error>;

    async fn get_property_by_id(
        &self,
        property_id: i64,
    ) -> Result<Option<PropertyRow>, sqlx::Error>;

    async fn save_property(
        &self,
        record: &PropertyRecord,
    ) -> Result<PropertyRow, sqlx::Error>;

    async fn update_property(
        &self,
        property_id: i64,
        record: &PropertyRecord,
    ) -> Result<Option<PropertyRow>, sqlx::Error>;

    async fn delete_property(
        &self,
        property_id: i64,
    ) -> Result<Option<PropertyRow>, sqlx::Error>;

    async fn set_featured(
        &self,
        property_id: i64,
        is_featured: bool,
    ) -> Result<Option<PropertyRow>, sqlx::Error>;

    /// Which of `urls` some listing still lists among its images.
    async fn images_in_use(&self, urls: &[String]) -> Result<Vec<String>, sqlx::Error>;
}

#[async_trait]
impl PropertyExt for DBClient {
    async fn get_properties(
        &self,
        constraints: &[EqConstraint],
        limit: Option<i64>,
    ) -> Result<Vec<PropertyRow>, sqlx::Error> {
        let mut builder = property_listing_query(constraints, limit);
        let rows = builder
            .build_query_as::<PropertyRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    async fn get_property_by_uuid(
        &self,
        property_uuid: Uuid,
    ) -> Result<Option<PropertyRow>, sqlx::Error> {
        let sql = select_from("properties", "WHERE p.uuid = $1");
        sqlx::query_as::<_, PropertyRow>(&sql)
            .bind(property_uuid)
            .fetch_optional(&self.pool)
            .await
    }

    async fn get_property_by_id(
        &self,
        property_id: i64,
    ) -> Result<Option<PropertyRow>, sqlx::Error> {
        let sql = select_from("properties", "WHERE p.id = $1");
        sqlx::query_as::<_, PropertyRow>(&sql)
            .bind(property_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn save_property(
        &self,
        record: &PropertyRecord,
    ) -> Result<PropertyRow, sqlx::Error> {
        let sql = format!(
            r#"
            WITH inserted AS (
                INSERT INTO properties (
                    title, description, price, listing_type, category, property_type,
                    bedrooms, bathrooms, area, area_unit, sector_id, street, address,
                    images, features, ready_to_move, is_featured, agent_id
                ) VALUES (
                    $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18
                )
                RETURNING *
            )
            {}
            "#,
            select_from("inserted", "")
        );

        bind_record(sqlx::query_as::<_, PropertyRow>(&sql), record)
            .fetch_one(&self.pool)
            .await
    }

    async fn update_property(
        &self,
        property_id: i64,
        record: &PropertyRecord,
    ) -> Result<Option<PropertyRow>, sqlx::Error> {
        let sql = format!(
            r#"
            WITH updated AS (
                UPDATE properties
                SET title = $1, description = $2, price = $3, listing_type = $4,
                    category = $5, property_type = $6, bedrooms = $7, bathrooms = $8,
                    area = $9, area_unit = $10, sector_id = $11, street = $12, address = $13,
                    images = $14, features = $15, ready_to_move = $16, is_featured = $17,
                    agent_id = $18, updated_at = NOW()
                WHERE id = $19
                RETURNING *
            )
            {}
            "#,
            select_from("updated", "")
        );

        bind_record(sqlx::query_as::<_, PropertyRow>(&sql), record)
            .bind(property_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn delete_property(
        &self,
        property_id: i64,
    ) -> Result<Option<PropertyRow>, sqlx::Error> {
        let sql = format!(
            "WITH deleted AS (DELETE FROM properties WHERE id = $1 RETURNING *) {}",
            select_from("deleted", "")
        );

        sqlx::query_as::<_, PropertyRow>(&sql)
            .bind(property_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn set_featured(
        &self,
        property_id: i64,
        is_featured: bool,
    ) -> Result<Option<PropertyRow>, sqlx::Error> {
        let sql = format!(
            r#"
            WITH updated AS (
                UPDATE properties SET is_featured = $1, updated_at = NOW()
                WHERE id = $2
                RETURNING *
            )
            {}
            "#,
            select_from("updated", "")
        );

        sqlx::query_as::<_, PropertyRow>(&sql)
            .bind(is_featured)
            .bind(property_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn images_in_use(&self, urls: &[String]) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>(IMAGES_IN_USE_SQL)
            .bind(urls)
            .fetch_all(&self.pool)
            .await
    }
}

/// Atomic +1 on one engagement counter.
#[async_trait]
pub trait CounterExt: Send + Sync {
    /// Returns the new value, or `None` when no listing has that id.
    async fn increment_counter(
        &self,
        property_id: i64,
        counter: Counter,
    ) -> Result<Option<i64>, sqlx::Error>;
}

fn increment_sql(counter: Counter) -> &'static str {
    match counter {
        Counter::View => "SELECT increment_view($1)",
        Counter::Call => "SELECT increment_call($1)",
        Counter::Whatsapp => "SELECT increment_whatsapp($1)",
    }
}

#[async_trait]
impl CounterExt for DBClient {
    async fn increment_counter(
        &self,
        property_id: i64,
        counter: Counter,
    ) -> Result<Option<i64>, sqlx::Error> {
        sqlx::query_scalar::<_, Option<i64>>(increment_sql(counter))
            .bind(property_id)
            .fetch_one(&self.pool)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_call_their_own_procedure() {
        for counter in [Counter::View, Counter::Call, Counter::Whatsapp] {
            assert!(increment_sql(counter).contains(counter.procedure()));
        }
    }

    #[test]
    fn reads_join_sector_names() {
        let sql = select_from("properties", "WHERE p.id = $1");
        assert!(sql.contains("s.name AS sector"));
        assert!(sql.trim_end().ends_with("FROM properties p LEFT JOIN sectors s ON s.id = p.sector_id WHERE p.id = $1"));
    }
}
