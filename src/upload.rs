// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

//! Image uploads forwarded to the hosted image service.

use async_trait::async_trait;
use reqwest::multipart;
use serde_json::Value;
use tracing::{debug, error, info};

use crate::config::ImageHostConfig;
use crate::error::{AdminError, Result};

/// Largest accepted image, 5 MiB
pub const MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024;

/// File picked by the operator
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Reject anything that is not an image or is over `max_bytes`.
///
/// Runs before any network call.
pub fn validate_image(content_type: &str, size: u64, max_bytes: u64) -> Result<()> {
    if !content_type.trim().to_ascii_lowercase().starts_with("image/") {
        return Err(AdminError::validation(
            "Invalid file type",
            "Please select an image file",
        ));
    }

    if size > max_bytes {
        return Err(AdminError::validation(
            "File too large",
            format!("Please select an image under {}MB", megabytes(max_bytes)),
        ));
    }

    Ok(())
}

/// Limit in MiB for messages: "5", "1.5"
fn megabytes(bytes: u64) -> String {
    let formatted = format!("{:.2}", bytes as f64 / (1024.0 * 1024.0));
    formatted
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

/// Remote store handing back a public URL for an uploaded image
#[async_trait]
pub trait ImageHost: Send + Sync {
    async fn upload(&self, file: ImageFile) -> Result<String>;
}

/// Unsigned uploads to a Cloudinary-style endpoint
pub struct CloudinaryHost {
    client: reqwest::Client,
    config: ImageHostConfig,
}

impl CloudinaryHost {
    pub fn new(config: ImageHostConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn upload_url(&self) -> String {
        format!(
            "{}/{}/image/upload",
            self.config.base_url.trim_end_matches('/'),
            self.config.cloud_name
        )
    }
}

#[async_trait]
impl ImageHost for CloudinaryHost {
    async fn upload(&self, file: ImageFile) -> Result<String> {
        let url = self.upload_url();
        debug!(
            "Uploading {} ({} bytes) to {}",
            file.file_name,
            file.bytes.len(),
            url
        );

        let part = multipart::Part::bytes(file.bytes)
            .file_name(file.file_name)
            .mime_str(&file.content_type)
            .map_err(|e| AdminError::Upload(format!("invalid content type: {}", e)))?;

        let form = multipart::Form::new()
            .part("file", part)
            .text("upload_preset", self.config.upload_preset.clone())
            .text("cloud_name", self.config.cloud_name.clone());

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                error!("Image upload request failed: {}", e);
                AdminError::Upload(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            error!("Image host returned status {}", status);
            return Err(AdminError::Upload(format!("image host returned {}", status)));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| AdminError::Upload(format!("unreadable response: {}", e)))?;

        let secure_url = secure_url(&body)
            .ok_or_else(|| AdminError::Upload("response has no secure_url".to_string()))?;
        info!("Image uploaded to {}", secure_url);
        Ok(secure_url)
    }
}

fn secure_url(body: &Value) -> Option<String> {
    body.get("secure_url")
        .and_then(Value::as_str)
        .filter(|url| !url.is_empty())
        .map(str::to_string)
}

/// Validate, then hand the file to the host
pub async fn upload_image(host: &dyn ImageHost, file: ImageFile, max_bytes: u64) -> Result<String> {
    validate_image(&file.content_type, file.bytes.len() as u64, max_bytes)?;
    host.upload(file).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingHost {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ImageHost for CountingHost {
        async fn upload(&self, file: ImageFile) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("https://images.example/{}", file.file_name))
        }
    }

    fn file(content_type: &str, size: usize) -> ImageFile {
        ImageFile {
            file_name: "photo.png".to_string(),
            content_type: content_type.to_string(),
            bytes: vec![0; size],
        }
    }

    fn title_of(err: AdminError) -> String {
        match err {
            AdminError::Validation { title, .. } => title,
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn non_images_are_rejected() {
        let err = validate_image("application/pdf", 10, MAX_IMAGE_BYTES).unwrap_err();
        assert_eq!(title_of(err), "Invalid file type");
    }

    #[test]
    fn size_limit_is_inclusive() {
        assert!(validate_image("image/png", MAX_IMAGE_BYTES, MAX_IMAGE_BYTES).is_ok());

        let err = validate_image("image/png", MAX_IMAGE_BYTES + 1, MAX_IMAGE_BYTES).unwrap_err();
        assert!(err.to_string().contains("under 5MB"));
    }

    #[test]
    fn fractional_limit_is_not_rounded_down() {
        let err = validate_image("image/png", 2 * 1024 * 1024, 1_572_864).unwrap_err();
        assert!(err.to_string().contains("under 1.5MB"), "{}", err);

        assert_eq!(megabytes(MAX_IMAGE_BYTES), "5");
        assert_eq!(megabytes(10 * 1024 * 1024), "10");
        assert_eq!(megabytes(512 * 1024), "0.5");
    }

    #[tokio::test]
    async fn oversized_upload_never_reaches_the_host() {
        let host = CountingHost::default();

        let err = upload_image(&host, file("image/jpeg", 6 * 1024 * 1024), MAX_IMAGE_BYTES)
            .await
            .unwrap_err();

        assert_eq!(title_of(err), "File too large");
        assert_eq!(host.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn valid_png_is_forwarded_once() {
        let host = CountingHost::default();

        let url = upload_image(&host, file("image/png", 2 * 1024 * 1024), MAX_IMAGE_BYTES)
            .await
            .unwrap();

        assert_eq!(url, "https://images.example/photo.png");
        assert_eq!(host.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn upload_url_includes_cloud_name() {
        let host = CloudinaryHost::new(ImageHostConfig {
            base_url: "https://api.cloudinary.com/v1_1/".to_string(),
            cloud_name: "demo".to_string(),
            upload_preset: "preset".to_string(),
            max_bytes: MAX_IMAGE_BYTES,
        });
        assert_eq!(
            host.upload_url(),
            "https://api.cloudinary.com/v1_1/demo/image/upload"
        );
    }

    #[test]
    fn secure_url_is_required() {
        assert_eq!(
            secure_url(&json!({"secure_url": "https://res.example/a.png"})).as_deref(),
            Some("https://res.example/a.png")
        );
        assert_eq!(secure_url(&json!({"url": "http://res.example/a.png"})), None);
    }
}
