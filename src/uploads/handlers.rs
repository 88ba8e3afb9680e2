use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use tracing::{instrument, warn};

use crate::{error::AppError, state::AppState};

use super::service::mime_for_key;

pub fn routes() -> Router<AppState> {
    Router::new().route("/uploads/*key", get(fetch_upload))
}

/// Serve stored bytes back under the reference returned at accept time.
#[instrument(skip(state))]
pub async fn fetch_upload(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    // Keys are flat UUID names; anything else was never issued by us.
    if key.contains("..") || key.contains('/') {
        return Err(AppError::NotFound("File not found"));
    }

    let object_key = format!("uploads/{key}");
    let bytes = state.storage.get_object(&object_key).await.map_err(|e| {
        warn!(error = %e, key = %object_key, "upload fetch failed");
        AppError::NotFound("File not found")
    })?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(mime_for_key(&object_key)),
    );
    Ok((StatusCode::OK, headers, bytes))
}
