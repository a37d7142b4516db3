// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;
use tracing::debug;

use crate::api::routes::{mutation, ApiResponse, Toast};
use crate::api::AppState;
use crate::error::{AdminError, Result};
use crate::upload::{self, ImageFile};

const ENTITY: &str = "images";

#[derive(Debug, Serialize)]
pub struct UploadedImage {
    pub url: String,
}

/// First `file` field of the form
async fn read_file_field(multipart: &mut Multipart) -> Result<ImageFile> {
    let unreadable = |e: axum::extract::multipart::MultipartError| {
        debug!("Unreadable upload: {}", e);
        AdminError::validation("Invalid upload", "The uploaded file could not be read")
    };

    while let Some(field) = multipart.next_field().await.map_err(unreadable)? {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field.bytes().await.map_err(unreadable)?;

        return Ok(ImageFile {
            file_name,
            content_type,
            bytes: bytes.to_vec(),
        });
    }

    Err(AdminError::validation(
        "Invalid file type",
        "Please select an image file",
    ))
}

pub async fn upload_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<UploadedImage>>> {
    let file = read_file_field(&mut multipart).await?;
    debug!(
        "Received {} ({}, {} bytes)",
        file.file_name,
        file.content_type,
        file.bytes.len()
    );

    let url = mutation(
        ENTITY,
        "upload",
        upload::upload_image(
            state.images.as_ref(),
            file,
            state.config.images.max_bytes,
        )
        .await,
    )?;

    Ok(Json(ApiResponse::with_toast(
        UploadedImage { url },
        Toast::success("Image uploaded successfully"),
    )))
}
