// service/property_service.rs
use std::sync::Arc;

use chrono::Utc;

use crate::{
    db::{
        db::DBClient,
        propertydb::{PropertyExt, PropertyRecord},
    },
    dtos::propertydtos::{
        DashboardDto, DashboardStatsDto, ImageUploadDto, PropertyCardDto, PropertyFormDto,
    },
    filter::{filter_properties, PropertyFilter},
    models::propertymodel::{map_rows, string_array, Property, PropertyRow},
    service::{error::ServiceError, storage::ImageStore},
    utils::image_utils::{decode_image, storage_file_name, DecodedImage},
};

/// Listings shown under "recent" on the dashboard.
pub const RECENT_LIMIT: usize = 5;

/// Admin listing writes. Unlike the public reads every failure is returned
/// to the caller.
pub struct PropertyService {
    db_client: Arc<DBClient>,
    storage: Arc<dyn ImageStore>,
    bucket: String,
}

impl PropertyService {
    pub fn new(db_client: Arc<DBClient>, storage: Arc<dyn ImageStore>, bucket: impl Into<String>) -> Self {
        Self {
            db_client,
            storage,
            bucket: bucket.into(),
        }
    }

    pub async fn list(&self, search: Option<String>) -> Result<Vec<Property>, ServiceError> {
        let rows = self.db_client.get_properties(&[], None).await?;
        let filter = PropertyFilter {
            search: search.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()),
            ..Default::default()
        };
        Ok(filter_properties(&map_rows(rows), &filter))
    }

    pub async fn get(&self, property_id: i64) -> Result<Property, ServiceError> {
        let row = self
            .db_client
            .get_property_by_id(property_id)
            .await?
            .ok_or(ServiceError::PropertyNotFound(property_id))?;
        to_property(row)
    }

    pub async fn create(&self, mut dto: PropertyFormDto) -> Result<Property, ServiceError> {
        let new_images = std::mem::take(&mut dto.new_images);
        let kept = dto.existing_images.take().unwrap_or_default();
        let (record, uploaded) = self.build_record(dto, kept, &new_images).await?;

        match self.db_client.save_property(&record).await {
            Ok(row) => {
                tracing::info!("Created property {} ({})", row.id, row.title);
                to_property(row)
            }
            Err(e) => {
                self.discard(&uploaded).await;
                Err(e.into())
            }
        }
    }

    pub async fn update(&self, property_id: i64, mut dto: PropertyFormDto) -> Result<Property, ServiceError> {
        let current = self
            .db_client
            .get_property_by_id(property_id)
            .await?
            .ok_or(ServiceError::PropertyNotFound(property_id))?;
        let previous_images = row_images(&current);

        let new_images = std::mem::take(&mut dto.new_images);
        let kept = images_to_keep(dto.existing_images.take(), &previous_images);
        let (record, uploaded) = self.build_record(dto, kept, &new_images).await?;

        let row = match self.db_client.update_property(property_id, &record).await {
            Ok(Some(row)) => row,
            Ok(None) => {
                self.discard(&uploaded).await;
                return Err(ServiceError::PropertyNotFound(property_id));
            }
            Err(e) => {
                self.discard(&uploaded).await;
                return Err(e.into());
            }
        };

        self.release(&removed_images(&previous_images, &record)).await;
        tracing::info!("Updated property {}", property_id);
        to_property(row)
    }

    pub async fn delete(&self, property_id: i64) -> Result<(), ServiceError> {
        let row = self
            .db_client
            .delete_property(property_id)
            .await?
            .ok_or(ServiceError::PropertyNotFound(property_id))?;

        self.release(&row_images(&row)).await;
        tracing::info!("Deleted property {}", property_id);
        Ok(())
    }

    pub async fn set_featured(&self, property_id: i64, is_featured: bool) -> Result<Property, ServiceError> {
        let row = self
            .db_client
            .set_featured(property_id, is_featured)
            .await?
            .ok_or(ServiceError::PropertyNotFound(property_id))?;
        to_property(row)
    }

    pub async fn dashboard(&self) -> Result<DashboardDto, ServiceError> {
        let properties = map_rows(self.db_client.get_properties(&[], None).await?);
        let stats = DashboardStatsDto::from_properties(&properties);
        let recent = properties.into_iter().take(RECENT_LIMIT).collect();

        Ok(DashboardDto {
            stats,
            recent: PropertyCardDto::from_properties(recent),
        })
    }

    /// Validates the form, uploads the new images and builds the record
    /// over `kept` followed by the uploads. Also returns the uploaded URLs so
    /// a failed write can remove them again.
    async fn build_record(
        &self,
        dto: PropertyFormDto,
        kept: Vec<String>,
        new_images: &[ImageUploadDto],
    ) -> Result<(PropertyRecord, Vec<String>), ServiceError> {
        dto.check().map_err(ServiceError::Validation)?;

        let uploaded = self.upload_images(new_images).await?;
        let images = kept.into_iter().chain(uploaded.iter().cloned()).collect();

        match dto.into_record(images) {
            Ok(record) => Ok((record, uploaded)),
            Err(e) => {
                self.discard(&uploaded).await;
                Err(ServiceError::Validation(e))
            }
        }
    }

    /// Decodes every image first, then uploads in order. If any upload
    /// fails the ones already stored are removed again.
    pub async fn upload_images(&self, images: &[ImageUploadDto]) -> Result<Vec<String>, ServiceError> {
        let decoded = images
            .iter()
            .map(|image| {
                decode_image(&image.data, &image.file_name)
                    .map(|d| (image.file_name.as_str(), d))
                    .map_err(|e| ServiceError::Validation(format!("{}: {}", image.file_name, e)))
            })
            .collect::<Result<Vec<(&str, DecodedImage)>, ServiceError>>()?;

        let mut urls = Vec::with_capacity(decoded.len());
        for (file_name, image) in decoded {
            let object_name = storage_file_name(file_name, Utc::now().timestamp_millis());
            match self
                .storage
                .upload(&self.bucket, &object_name, image.bytes, &image.content_type)
                .await
            {
                Ok(url) => urls.push(url),
                Err(e) => {
                    tracing::error!("Upload of {} failed: {}", object_name, e);
                    self.discard(&urls).await;
                    return Err(e.into());
                }
            }
        }

        Ok(urls)
    }

    /// Removes images a listing no longer shows, keeping any that another
    /// listing still references. Nothing is removed when that can't be checked.
    async fn release(&self, urls: &[String]) {
        if urls.is_empty() {
            return;
        }
        match self.db_client.images_in_use(urls).await {
            Ok(in_use) => self.discard(&unreferenced(urls, &in_use)).await,
            Err(e) => tracing::warn!("Keeping {} image(s), reference check failed: {}", urls.len(), e),
        }
    }

    /// Removes objects of this service's bucket. Foreign URLs are left alone.
    async fn discard(&self, urls: &[String]) {
        let names: Vec<String> = urls
            .iter()
            .filter_map(|url| self.storage.filename_from_public_url(&self.bucket, url))
            .collect();
        if !names.is_empty() {
            self.storage.remove(&self.bucket, &names).await;
        }
    }
}

fn to_property(row: PropertyRow) -> Result<Property, ServiceError> {
    Property::try_from(row).map_err(|e| ServiceError::Validation(e.to_string()))
}

fn row_images(row: &PropertyRow) -> Vec<String> {
    string_array(row.images.as_ref().map(|j| &j.0))
}

/// Images present before an edit and absent after it.
pub fn removed_images(previous: &[String], record: &PropertyRecord) -> Vec<String> {
    previous
        .iter()
        .filter(|url| !record.images.contains(url))
        .cloned()
        .collect()
}

/// An edit that doesn't send `existingImages` keeps the current images.
fn images_to_keep(existing: Option<Vec<String>>, current: &[String]) -> Vec<String> {
    existing.unwrap_or_else(|| current.to_vec())
}

fn unreferenced(candidates: &[String], in_use: &[String]) -> Vec<String> {
    candidates
        .iter()
        .filter(|url| !in_use.contains(url))
        .cloned()
        .collect()
}
