// service/directory_service.rs
use std::sync::Arc;

use chrono::Utc;

use crate::{
    db::{agentdb::AgentExt, sectordb::SectorExt},
    dtos::{agentdtos::CreateAgentDto, sectordtos::CreateSectorDto},
    models::{agentmodel::Agent, sectormodel::Sector},
    service::{error::ServiceError, storage::ImageStore},
    utils::image_utils::{decode_image, storage_file_name},
};

/// Persistence the directory needs; `DBClient` in production.
pub trait DirectoryStore: AgentExt + SectorExt + Send + Sync {}

impl<T: AgentExt + SectorExt + Send + Sync> DirectoryStore for T {}

/// Admin management of agents and sectors.
pub struct DirectoryService {
    db_client: Arc<dyn DirectoryStore>,
    storage: Arc<dyn ImageStore>,
    agent_bucket: String,
}

impl DirectoryService {
    pub fn new(db_client: Arc<dyn DirectoryStore>, storage: Arc<dyn ImageStore>, agent_bucket: impl Into<String>) -> Self {
        Self {
            db_client,
            storage,
            agent_bucket: agent_bucket.into(),
        }
    }

    pub async fn agents(&self) -> Result<Vec<Agent>, ServiceError> {
        Ok(self.db_client.get_agents().await?)
    }

    pub async fn create_agent(&self, dto: CreateAgentDto) -> Result<Agent, ServiceError> {
        let image_url = match &dto.image {
            Some(image) => {
                let decoded = decode_image(&image.data, &image.file_name)
                    .map_err(|e| ServiceError::Validation(format!("{}: {}", image.file_name, e)))?;
                let object_name = storage_file_name(&image.file_name, Utc::now().timestamp_millis());
                Some(
                    self.storage
                        .upload(&self.agent_bucket, &object_name, decoded.bytes, &decoded.content_type)
                        .await?,
                )
            }
            None => None,
        };

        let saved = self
            .db_client
            .save_agent(
                dto.name.trim(),
                dto.company.trim(),
                dto.phone.trim(),
                dto.whatsapp.trim(),
                dto.rating,
                image_url.as_deref(),
            )
            .await;

        match saved {
            Ok(agent) => {
                tracing::info!("Created agent {} ({})", agent.id, agent.name);
                Ok(agent)
            }
            Err(e) => {
                if let Some(url) = &image_url {
                    self.discard_image(url).await;
                }
                Err(e.into())
            }
        }
    }

    /// Refused while any listing still references the agent.
    pub async fn delete_agent(&self, agent_id: i64) -> Result<(), ServiceError> {
        let agent = self
            .db_client
            .delete_agent(agent_id)
            .await
            .map_err(ServiceError::from_agent_delete)?
            .ok_or(ServiceError::AgentNotFound(agent_id))?;

        if let Some(url) = &agent.image_url {
            self.discard_image(url).await;
        }
        tracing::info!("Deleted agent {}", agent_id);
        Ok(())
    }

    pub async fn create_sector(&self, dto: CreateSectorDto) -> Result<Sector, ServiceError> {
        let name = dto.name.trim();
        let description = dto
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty());

        self.db_client
            .save_sector(name, description)
            .await
            .map_err(|e| ServiceError::from_sector_insert(e, name))
    }

    /// Listings in the sector keep existing with no sector.
    pub async fn delete_sector(&self, sector_id: i64) -> Result<(), ServiceError> {
        self.db_client
            .delete_sector(sector_id)
            .await?
            .ok_or(ServiceError::SectorNotFound(sector_id))?;
        tracing::info!("Deleted sector {}", sector_id);
        Ok(())
    }

    async fn discard_image(&self, url: &str) {
        if let Some(name) = self.storage.filename_from_public_url(&self.agent_bucket, url) {
            self.storage.remove(&self.agent_bucket, &[name]).await;
        }
    }
}
