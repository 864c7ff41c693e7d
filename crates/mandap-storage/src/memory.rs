//! In-memory object storage.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use mandap_core::{AppError, AppResult};

use crate::object::ObjectStorage;

/// A stored object and its metadata.
struct StoredObject {
    bytes: Vec<u8>,
    content_type: Option<String>,
}

/// Object storage backed by process memory.
///
/// Serves development setups and tests where no blob store is available.
/// Objects live for the lifetime of the process; URLs follow the same
/// `{endpoint}/{bucket}/{key}` shape a bucket-style backend would produce.
pub struct MemoryObjectStorage {
    /// Endpoint prefix used when building object URLs.
    base_url: String,
    /// Bucket name segment of object URLs.
    bucket: String,
    /// Stored objects by key.
    objects: RwLock<HashMap<String, StoredObject>>,
}

impl MemoryObjectStorage {
    /// Creates a new in-memory store.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Endpoint prefix for object URLs
    /// * `bucket` - Bucket name segment for object URLs
    #[must_use]
    pub fn new(base_url: impl Into<String>, bucket: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            bucket: bucket.into(),
            objects: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the bytes stored under `key`, if any.
    pub async fn get(&self, key: &str) -> Option<Vec<u8>> {
        let objects = self.objects.read().await;
        objects.get(key).map(|o| o.bytes.clone())
    }

    /// Returns the number of stored objects.
    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    /// Returns `true` if no objects are stored.
    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }

    fn url_for(&self, key: &str) -> String {
        format!(
            "{}/{}/{}",
            self.base_url.trim_end_matches('/'),
            self.bucket,
            key
        )
    }
}

fn validate_key(key: &str) -> AppResult<()> {
    if key.trim().is_empty() {
        return Err(AppError::validation_field("File key cannot be empty", "key"));
    }
    Ok(())
}

#[async_trait]
impl ObjectStorage for MemoryObjectStorage {
    async fn upload(
        &self,
        bytes: Vec<u8>,
        key: &str,
        content_type: Option<&str>,
    ) -> AppResult<String> {
        validate_key(key)?;

        let mut objects = self.objects.write().await;
        objects.insert(
            key.to_string(),
            StoredObject {
                bytes,
                content_type: content_type.map(str::to_string),
            },
        );

        tracing::debug!("Stored object: {}", key);

        Ok(self.url_for(key))
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        validate_key(key)?;

        let mut objects = self.objects.write().await;
        if objects.remove(key).is_some() {
            tracing::debug!("Deleted object: {}", key);
        }

        Ok(())
    }

    async fn object_url(&self, key: &str) -> AppResult<String> {
        validate_key(key)?;

        Ok(self.url_for(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> MemoryObjectStorage {
        MemoryObjectStorage::new("https://assets.mandap.example", "partner-uploads")
    }

    #[tokio::test]
    async fn test_upload_returns_public_url() {
        let storage = store();

        let url = storage
            .upload(b"logo bytes".to_vec(), "logos/p1.png", Some("image/png"))
            .await
            .unwrap();

        assert_eq!(
            url,
            "https://assets.mandap.example/partner-uploads/logos/p1.png"
        );
        assert_eq!(storage.get("logos/p1.png").await.unwrap(), b"logo bytes");
    }

    #[tokio::test]
    async fn test_upload_replaces_existing_object() {
        let storage = store();

        storage
            .upload(b"v1".to_vec(), "logos/p1.png", None)
            .await
            .unwrap();
        storage
            .upload(b"v2".to_vec(), "logos/p1.png", None)
            .await
            .unwrap();

        assert_eq!(storage.len().await, 1);
        assert_eq!(storage.get("logos/p1.png").await.unwrap(), b"v2");
    }

    #[tokio::test]
    async fn test_upload_rejects_empty_key() {
        let storage = store();

        for key in ["", "   "] {
            let err = storage.upload(b"x".to_vec(), key, None).await.unwrap_err();
            assert!(matches!(err, AppError::Validation { .. }));
            assert!(err.to_string().contains("File key cannot be empty"));
        }

        assert!(storage.is_empty().await);
    }

    #[tokio::test]
    async fn test_upload_records_content_type() {
        let storage = store();

        storage
            .upload(b"{}".to_vec(), "docs/terms.json", Some("application/json"))
            .await
            .unwrap();

        let objects = storage.objects.read().await;
        assert_eq!(
            objects["docs/terms.json"].content_type.as_deref(),
            Some("application/json")
        );
    }

    #[tokio::test]
    async fn test_delete_removes_object() {
        let storage = store();

        storage
            .upload(b"x".to_vec(), "logos/p1.png", None)
            .await
            .unwrap();
        storage.delete("logos/p1.png").await.unwrap();

        assert!(storage.is_empty().await);
        assert!(storage.get("logos/p1.png").await.is_none());
    }

    #[tokio::test]
    async fn test_delete_missing_key_is_ok() {
        let storage = store();

        assert!(storage.delete("never/stored.png").await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_rejects_empty_key() {
        let storage = store();

        let err = storage.delete("").await.unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_object_url_without_object() {
        let storage = store();

        let url = storage.object_url("logos/p9.png").await.unwrap();
        assert_eq!(
            url,
            "https://assets.mandap.example/partner-uploads/logos/p9.png"
        );
    }

    #[tokio::test]
    async fn test_object_url_rejects_empty_key() {
        let storage = store();

        let err = storage.object_url(" ").await.unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_trailing_slash_in_base_url() {
        let storage = MemoryObjectStorage::new("https://assets.mandap.example/", "uploads");

        let url = storage.object_url("a.png").await.unwrap();
        assert_eq!(url, "https://assets.mandap.example/uploads/a.png");
    }
}
