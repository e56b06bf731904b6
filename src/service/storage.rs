// service/storage.rs
use async_trait::async_trait;
use reqwest::{header, Client};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("storage rejected the upload ({status}): {body}")]
    Rejected { status: u16, body: String },
}

/// Public image bucket. Uploads return a public URL; removal never fails
/// the caller.
#[async_trait]
pub trait ImageStore: Send + Sync {
    async fn upload(
        &self,
        bucket: &str,
        file_name: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StorageError>;

    async fn remove(&self, bucket: &str, file_names: &[String]);

    fn public_url(&self, bucket: &str, file_name: &str) -> String;

    /// Object name inside `bucket` for a URL this store handed out.
    /// Anything else (external links, other buckets) yields `None`.
    fn filename_from_public_url(&self, bucket: &str, url: &str) -> Option<String> {
        let prefix = self.public_url(bucket, "");
        let name = url.strip_prefix(prefix.as_str())?;
        let name = name.split(['?', '#']).next().unwrap_or_default();
        (!name.is_empty()).then(|| name.to_string())
    }
}

/// Supabase-storage compatible REST client.
#[derive(Debug, Clone)]
pub struct StorageClient {
    http: Client,
    base_url: String,
    service_key: String,
}

impl StorageClient {
    pub fn new(base_url: impl Into<String>, service_key: impl Into<String>) -> Self {
        StorageClient {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            service_key: service_key.into(),
        }
    }

    fn object_url(&self, bucket: &str, file_name: &str) -> String {
        format!("{}/object/{}/{}", self.base_url, bucket, file_name)
    }
}

#[async_trait]
impl ImageStore for StorageClient {
    async fn upload(
        &self,
        bucket: &str,
        file_name: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StorageError> {
        let response = self
            .http
            .post(self.object_url(bucket, file_name))
            .bearer_auth(&self.service_key)
            .header("apikey", &self.service_key)
            .header(header::CONTENT_TYPE, content_type)
            .header(header::CACHE_CONTROL, "max-age=3600")
            .header("x-upsert", "false")
            .body(bytes)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!("Uploaded {}/{}", bucket, file_name);
        Ok(self.public_url(bucket, file_name))
    }

    async fn remove(&self, bucket: &str, file_names: &[String]) {
        for file_name in file_names {
            let result = self
                .http
                .delete(self.object_url(bucket, file_name))
                .bearer_auth(&self.service_key)
                .header("apikey", &self.service_key)
                .send()
                .await;

            match result {
                Ok(response) if response.status().is_success() => {
                    tracing::debug!("Removed {}/{}", bucket, file_name);
                }
                Ok(response) => {
                    tracing::warn!(
                        "Failed to remove {}/{}: status {}",
                        bucket,
                        file_name,
                        response.status()
                    );
                }
                Err(e) => {
                    tracing::warn!("Failed to remove {}/{}: {}", bucket, file_name, e);
                }
            }
        }
    }

    fn public_url(&self, bucket: &str, file_name: &str) -> String {
        format!("{}/object/public/{}/{}", self.base_url, bucket, file_name)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use tokio::sync::Mutex;

    /// In-memory bucket that records every upload and removal.
    #[derive(Default)]
    pub(crate) struct FakeStore {
        pub fail_on: Option<String>,
        pub stored: Mutex<Vec<String>>,
        pub removed: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ImageStore for FakeStore {
        async fn upload(
            &self,
            bucket: &str,
            file_name: &str,
            _bytes: Vec<u8>,
            _content_type: &str,
        ) -> Result<String, StorageError> {
            if self.fail_on.as_deref().is_some_and(|name| file_name.ends_with(name)) {
                return Err(StorageError::Rejected {
                    status: 500,
                    body: "boom".to_string(),
                });
            }
            self.stored.lock().await.push(file_name.to_string());
            Ok(self.public_url(bucket, file_name))
        }

        async fn remove(&self, _bucket: &str, file_names: &[String]) {
            self.removed.lock().await.extend_from_slice(file_names);
        }

        fn public_url(&self, bucket: &str, file_name: &str) -> String {
            format!("https://cdn.example/object/public/{}/{}", bucket, file_name)
        }
    }

    fn client() -> StorageClient {
        StorageClient::new("https://project.supabase.co/storage/v1/", "key")
    }

    #[test]
    fn public_urls_point_at_the_public_object_path() {
        assert_eq!(
            client().public_url("property-images", "1700000000000-front.jpg"),
            "https://project.supabase.co/storage/v1/object/public/property-images/1700000000000-front.jpg"
        );
    }

    #[test]
    fn recovers_object_names_from_own_public_urls() {
        let storage = client();
        let url = storage.public_url("property-images", "1700000000000-front.jpg");
        assert_eq!(
            storage.filename_from_public_url("property-images", &url),
            Some("1700000000000-front.jpg".to_string())
        );
        assert_eq!(
            storage.filename_from_public_url("property-images", &format!("{}?width=400", url)),
            Some("1700000000000-front.jpg".to_string())
        );
        assert_eq!(
            storage.filename_from_public_url("property-images", &storage.public_url("property-images", "")),
            None
        );
    }

    #[test]
    fn foreign_urls_have_no_object_name() {
        let storage = client();
        for url in [
            "https://elsewhere.example/img/a.png?w=200",
            "https://images.unsplash.com/photo-1600585154340-be6161a56a0c?w=800",
            "https://other.supabase.co/storage/v1/object/public/property-images/a.png",
        ] {
            assert_eq!(storage.filename_from_public_url("property-images", url), None, "{}", url);
        }
        let agent_url = storage.public_url("agent-images", "a.png");
        assert_eq!(storage.filename_from_public_url("property-images", &agent_url), None);
    }
}
