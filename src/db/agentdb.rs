use async_trait::async_trait;

use super::db::DBClient;
use crate::models::agentmodel::Agent;

#[async_trait]
pub trait AgentExt {
    async fn get_agents(&self) -> Result<Vec<Agent>, sqlx::Error>;

    async fn get_agent(&self, agent_id: i64) -> Result<Option<Agent>, sqlx::Error>;

    async fn save_agent(
        &self,
        name: &str,
        company: &str,
        phone: &str,
        whatsapp: &str,
        rating: f64,
        image_url: Option<&str>,
    ) -> Result<Agent, sqlx::Error>;

    async fn delete_agent(&self, agent_id: i64) -> Result<Option<Agent>, sqlx::Error>;
}

#[async_trait]
impl AgentExt for DBClient {
    async fn get_agents(&self) -> Result<Vec<Agent>, sqlx::Error> {
        sqlx::query_as::<_, Agent>(
            r#"
            SELECT id, name, company, phone, whatsapp, rating, image_url, created_at
            FROM agents
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    async fn get_agent(&self, agent_id: i64) -> Result<Option<Agent>, sqlx::Error> {
        sqlx::query_as::<_, Agent>(
            r#"
            SELECT id, name, company, phone, whatsapp, rating, image_url, created_at
            FROM agents
            WHERE id = $1
            "#,
        )
        .bind(agent_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn save_agent(
        &self,
        name: &str,
        company: &str,
        phone: &str,
        whatsapp: &str,
        rating: f64,
        image_url: Option<&str>,
    ) -> Result<Agent, sqlx::Error> {
        sqlx::query_as::<_, Agent>(
            r#"
            INSERT INTO agents (name, company, phone, whatsapp, rating, image_url)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, company, phone, whatsapp, rating, image_url, created_at
            "#,
        )
        .bind(name)
        .bind(company)
        .bind(phone)
        .bind(whatsapp)
        .bind(rating)
        .bind(image_url)
        .fetch_one(&self.pool)
        .await
    }

    // Fails with a foreign-key violation while listings still reference the agent.
    async fn delete_agent(&self, agent_id: i64) -> Result<Option<Agent>, sqlx::Error> {
        sqlx::query_as::<_, Agent>(
            r#"
            DELETE FROM agents
            WHERE id = $1
            RETURNING id, name, company, phone, whatsapp, rating, image_url, created_at
            "#,
        )
        .bind(agent_id)
        .fetch_optional(&self.pool)
        .await
    }
}
