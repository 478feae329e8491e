use async_trait::async_trait;
use motorent_core::image;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{MotorentError, Result};

/// Bucket that holds deliverer license images.
pub const DELIVERER_IMAGE_BUCKET: &str = "deliverer-images";

/// Blob store for license images. Upload takes the base64 payload as
/// received from the caller and returns the generated object key.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    async fn upload(&self, owner_id: &str, base64_payload: &str) -> Result<String>;
    async fn download(&self, key: &str) -> Result<Vec<u8>>;
}

/// Bucket emulation in process memory.
pub struct InMemoryObjectStorage {
    bucket: String,
    objects: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemoryObjectStorage {
    pub fn new() -> Self {
        Self {
            bucket: DELIVERER_IMAGE_BUCKET.to_string(),
            objects: RwLock::new(HashMap::new()),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

impl Default for InMemoryObjectStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ObjectStorage for InMemoryObjectStorage {
    async fn upload(&self, owner_id: &str, base64_payload: &str) -> Result<String> {
        let bytes = image::decode_image(base64_payload)
            .map_err(|e| MotorentError::ObjectStorage(format!("invalid base64 payload: {}", e)))?;

        // Keys carry a .png extension regardless of the sniffed format.
        let key = format!("{}-{}.png", owner_id, Uuid::new_v4());
        let mut objects = self.objects.write().await;
        objects.insert(key.clone(), bytes);
        Ok(key)
    }

    async fn download(&self, key: &str) -> Result<Vec<u8>> {
        let objects = self.objects.read().await;
        objects
            .get(key)
            .cloned()
            .ok_or_else(|| MotorentError::ObjectStorage(format!("object not found: {}", key)))
    }
}
