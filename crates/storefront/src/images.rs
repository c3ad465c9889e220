//! Image host.
//!
//! Uploads are best-effort: each file is one multipart `POST`, and files that
//! fail to upload are logged and left out of the result so a listing can still
//! be saved with the images that made it.

use std::future::Future;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use tracing::{instrument, warn};

use crate::config::CloudinaryConfig;

/// An image selected for upload.
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    /// Read an image from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map_or_else(|| "image".to_string(), |n| n.to_string_lossy().into_owned());
        Ok(Self { file_name, bytes })
    }
}

/// Somewhere images can be uploaded to, returning public URLs.
pub trait ImageHost: Send + Sync {
    /// Upload `files` and return the URLs of the ones that succeeded, in order.
    fn upload(&self, files: Vec<ImageFile>) -> impl Future<Output = Vec<String>> + Send;
}

/// Image host used when uploads are not configured: accepts nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoImageHost;

impl ImageHost for NoImageHost {
    async fn upload(&self, files: Vec<ImageFile>) -> Vec<String> {
        if !files.is_empty() {
            warn!(count = files.len(), "Image uploads are not configured, skipping");
        }
        Vec::new()
    }
}

/// Cloudinary unsigned-upload client.
#[derive(Clone)]
pub struct CloudinaryHost {
    inner: Arc<CloudinaryHostInner>,
}

struct CloudinaryHostInner {
    client: reqwest::Client,
    endpoint: String,
    upload_preset: String,
}

/// The part of Cloudinary's upload response we use.
#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
}

impl CloudinaryHost {
    /// Create a new Cloudinary client.
    #[must_use]
    pub fn new(config: &CloudinaryConfig) -> Self {
        let endpoint = format!(
            "https://api.cloudinary.com/v1_1/{}/image/upload",
            config.cloud_name
        );

        Self {
            inner: Arc::new(CloudinaryHostInner {
                client: reqwest::Client::new(),
                endpoint,
                upload_preset: config.upload_preset.clone(),
            }),
        }
    }

    async fn upload_one(&self, file: ImageFile) -> Result<Option<String>, reqwest::Error> {
        let part = reqwest::multipart::Part::bytes(file.bytes).file_name(file.file_name);
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("upload_preset", self.inner.upload_preset.clone());

        let response: UploadResponse = self
            .inner
            .client
            .post(&self.inner.endpoint)
            .multipart(form)
            .send()
            .await?
            .json()
            .await?;

        Ok(response.secure_url)
    }
}

impl ImageHost for CloudinaryHost {
    #[instrument(skip(self, files), fields(count = files.len()))]
    async fn upload(&self, files: Vec<ImageFile>) -> Vec<String> {
        let mut urls = Vec::with_capacity(files.len());
        for file in files {
            let name = file.file_name.clone();
            match self.upload_one(file).await {
                Ok(Some(url)) => urls.push(url),
                Ok(None) => warn!(file = %name, "Upload response had no secure_url"),
                Err(e) => warn!(file = %name, error = %e, "Image upload failed"),
            }
        }
        urls
    }
}
