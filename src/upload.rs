//! Profile photo uploads: naming and multipart extraction.

use std::path::Path;

use actix_multipart::Multipart;
use chrono::Utc;
use futures::TryStreamExt;

use crate::error::{AppError, AppResult};

/// Multipart form field carrying the photo.
pub const PHOTO_FIELD: &str = "photo";

const ALLOWED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// A photo read from the request, before it is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoUpload {
    /// Name the file will be stored under, see [`photo_file_name`].
    pub file_name: String,
    pub contents: Vec<u8>,
}

/// Builds the stored name `<unix-nanos>_<original>` with every space removed.
///
/// Only `.jpg`, `.jpeg` and `.png` (any case) are accepted. Directory components
/// of the client-supplied name are dropped.
pub fn photo_file_name(original: &str) -> AppResult<String> {
    let base = Path::new(original)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default();

    // Everything after the last dot, so a bare ".png" still counts as a png.
    let supported = base
        .rsplit_once('.')
        .map(|(_, ext)| ALLOWED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false);
    if !supported {
        return Err(AppError::UnsupportedMediaType("unsupported media type".into()));
    }

    let stamp = Utc::now().timestamp_nanos_opt().unwrap_or_default();
    Ok(format!("{}_{}", stamp, base).replace(' ', ""))
}

/// Pulls the `photo` field out of a multipart body.
///
/// Other fields are drained and ignored. Bodies over `max_bytes` are rejected.
pub async fn read_photo(mut payload: Multipart, max_bytes: usize) -> AppResult<PhotoUpload> {
    while let Some(mut field) = payload.try_next().await? {
        if field.name() != PHOTO_FIELD {
            while field.try_next().await?.is_some() {}
            continue;
        }

        let original = field
            .content_disposition()
            .get_filename()
            .map(str::to_owned)
            .ok_or_else(|| AppError::BadRequest("photo field is not a file".into()))?;
        let file_name = photo_file_name(&original)?;

        let mut contents = Vec::new();
        while let Some(chunk) = field.try_next().await? {
            if contents.len() + chunk.len() > max_bytes {
                return Err(AppError::BadRequest("photo is too large".into()));
            }
            contents.extend_from_slice(&chunk);
        }

        return Ok(PhotoUpload {
            file_name,
            contents,
        });
    }

    Err(AppError::BadRequest("photo field is missing".into()))
}
