use bytes::Bytes;
use tracing::debug;
use uuid::Uuid;

use crate::{error::AppError, state::AppState};

const KEY_PREFIX: &str = "uploads";

/// Validate the declared type against the allow-list and persist the bytes
/// under a fresh random key, so concurrent uploads can never collide. The
/// returned reference is the relative path stored on the post.
pub async fn accept(
    state: &AppState,
    data: Bytes,
    declared_mime: &str,
    original_name: &str,
) -> Result<String, AppError> {
    let ext = ext_for_mime(declared_mime).ok_or(AppError::UnsupportedMediaType)?;
    let key = format!("{KEY_PREFIX}/{}.{ext}", Uuid::new_v4());
    debug!(key = %key, original = %original_name, size = data.len(), "storing upload");
    state
        .storage
        .put_object(&key, data, declared_mime)
        .await
        .map_err(AppError::Internal)?;
    Ok(format!("/{key}"))
}

/// Allow-list: JPEG and PNG only.
pub(crate) fn ext_for_mime(ct: &str) -> Option<&'static str> {
    match ct {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        _ => None,
    }
}

pub(crate) fn mime_for_key(key: &str) -> &'static str {
    match key.rsplit('.').next() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        _ => "application/octet-stream",
    }
}
