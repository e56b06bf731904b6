use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    pub id: i64,
    pub name: String,
    pub company: String,
    pub phone: String,
    pub whatsapp: String,
    pub rating: f64,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Contact details shown next to a listing.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AgentContact {
    pub name: String,
    pub company: String,
    pub phone: String,
    pub whatsapp: String,
    pub image_url: Option<String>,
}

impl From<Agent> for AgentContact {
    fn from(agent: Agent) -> Self {
        AgentContact {
            name: agent.name,
            company: agent.company,
            phone: agent.phone,
            whatsapp: agent.whatsapp,
            image_url: agent.image_url,
        }
    }
}
