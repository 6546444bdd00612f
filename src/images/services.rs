use std::time::Duration;

use anyhow::Context;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Descriptor of an image stored on the image host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredAsset {
    pub url: String,
    pub key: String,
    pub content_type: String,
    pub bytes: u64,
    pub format: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// A single uploaded file, checked to be a non-empty image we know how to store.
#[derive(Debug)]
pub struct UploadItem {
    pub body: Bytes,
    pub content_type: String,
}

impl UploadItem {
    pub fn new(body: Bytes, content_type: impl Into<String>) -> AppResult<Self> {
        let content_type = content_type.into();
        if body.is_empty() {
            return Err(AppError::validation("Uploaded file is empty"));
        }
        if ext_from_mime(&content_type).is_none() {
            return Err(AppError::validation(format!(
                "Unsupported image type: {}",
                content_type
            )));
        }
        Ok(Self { body, content_type })
    }
}

/// Uploads one image under `folder`, bounded by the configured timeout.
pub async fn upload_image(st: &AppState, folder: &str, img: UploadItem) -> anyhow::Result<StoredAsset> {
    let format = ext_from_mime(&img.content_type).unwrap_or("bin");
    let key = format!("{}/{}.{}", folder, Uuid::new_v4(), format);
    let bytes = img.body.len() as u64;
    let timeout = Duration::from_secs(st.config.images.upload_timeout_secs);

    tokio::time::timeout(timeout, st.images.put_object(&key, img.body, &img.content_type))
        .await
        .with_context(|| format!("upload of {} timed out after {:?}", key, timeout))?
        .with_context(|| format!("put_object {}", key))?;

    debug!(%key, bytes, "image uploaded");
    Ok(StoredAsset {
        url: st.images.public_url(&key),
        key,
        content_type: img.content_type,
        bytes,
        format: format.to_string(),
        created_at: OffsetDateTime::now_utc(),
    })
}

/// Best-effort removal of an image whose owning record was never written.
pub async fn discard_image(st: &AppState, asset: &StoredAsset) {
    if let Err(e) = st.images.delete_object(&asset.key).await {
        warn!(error = %e, key = %asset.key, "failed to delete orphaned image");
    }
}

fn ext_from_mime(ct: &str) -> Option<&'static str> {
    match ct {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        "image/gif" => Some("gif"),
        "image/heic" => Some("heic"),
        _ => None,
    }
}
