//! Image upload to the external image host.
//!
//! Unsigned multipart upload: the file plus an upload preset. The host
//! answers with the hosted copy's `secure_url`.

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::instrument;
use url::Url;

use crate::config::UploadConfig;

use super::{ApiError, error_message, truncate};

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
}

/// An image read from disk or received from a form.
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Client for the image host's upload endpoint.
#[derive(Clone)]
pub struct UploadClient {
    client: reqwest::Client,
    url: Url,
    preset: SecretString,
}

impl UploadClient {
    /// Create a new upload client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &UploadConfig, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            url: config.url.clone(),
            preset: config.preset.clone(),
        })
    }

    /// Upload an image and return its hosted URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the host rejects the file or returns no usable URL.
    #[instrument(skip(self, image), fields(file_name = %image.file_name, bytes = image.bytes.len()))]
    pub async fn upload_image(&self, image: ImageFile) -> Result<Url, ApiError> {
        let part = Part::bytes(image.bytes).file_name(image.file_name);
        let form = Form::new()
            .part("file", part)
            .text("upload_preset", self.preset.expose_secret().to_string());

        let response = self.client.post(self.url.clone()).multipart(form).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            tracing::warn!(
                status = %status,
                body = %truncate(&text, 500),
                "Image upload rejected"
            );
            return Err(ApiError::Api {
                status: status.as_u16(),
                message: error_message(&text),
            });
        }

        let uploaded: UploadResponse =
            serde_json::from_str(&text).map_err(|e| ApiError::Parse(e.to_string()))?;
        let url = Url::parse(&uploaded.secure_url)
            .map_err(|e| ApiError::Parse(format!("secure_url: {e}")))?;

        tracing::info!(url = %url, "Image uploaded");
        Ok(url)
    }
}

impl std::fmt::Debug for UploadClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadClient")
            .field("url", &self.url.as_str())
            .field("preset", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}
