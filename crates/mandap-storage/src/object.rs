//! Object storage contract.

use async_trait::async_trait;

use mandap_core::AppResult;

/// Contract for storing uploaded files (logos, gallery images, documents)
/// in a bucket-style object store.
///
/// Keys are opaque paths within a single configured bucket. Every
/// operation rejects an empty or whitespace-only key with
/// `AppError::Validation` (field `key`); backend failures surface as
/// `AppError::Storage`.
///
/// # Implementations
///
/// [`MemoryObjectStorage`](crate::MemoryObjectStorage) keeps objects in
/// process memory and backs development and tests. Production deployments
/// provide an implementation against their blob store.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Stores an object under `key` and returns its public URL.
    ///
    /// An existing object under the same key is replaced.
    ///
    /// # Arguments
    ///
    /// * `bytes` - The object content
    /// * `key` - Path of the object within the bucket
    /// * `content_type` - Optional MIME type stored alongside the object
    ///
    /// # Errors
    ///
    /// - `AppError::Validation` when `key` is empty
    /// - `AppError::Storage` when the backend rejects the write
    async fn upload(
        &self,
        bytes: Vec<u8>,
        key: &str,
        content_type: Option<&str>,
    ) -> AppResult<String>;

    /// Deletes the object under `key`.
    ///
    /// Deleting a key that holds no object is not an error.
    ///
    /// # Errors
    ///
    /// - `AppError::Validation` when `key` is empty
    /// - `AppError::Storage` when the backend rejects the delete
    async fn delete(&self, key: &str) -> AppResult<()>;

    /// Returns the public URL an object under `key` is served from.
    ///
    /// The URL is derived from configuration alone; the object does not
    /// have to exist.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` when `key` is empty.
    async fn object_url(&self, key: &str) -> AppResult<String>;
}
