use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use media_blob::BlobError;
use media_core::errors::MediaError;

#[derive(Debug)]
pub struct MediaAxumError(pub anyhow::Error);

impl From<anyhow::Error> for MediaAxumError {
    fn from(e: anyhow::Error) -> Self {
        Self(e)
    }
}

impl From<BlobError> for MediaAxumError {
    fn from(e: BlobError) -> Self {
        Self(to_media_error(e).into_anyhow())
    }
}

impl From<axum::http::Error> for MediaAxumError {
    fn from(e: axum::http::Error) -> Self {
        Self(MediaError::general_error("Failed to build response").with_source(e.into()).into_anyhow())
    }
}

/// Map a delivery failure onto the client-facing taxonomy.
///
/// Messages stay generic for server-side failures; the original error is
/// kept as the source so it reaches the logs but never the client.
pub fn to_media_error(err: BlobError) -> MediaError {
    let media = match &err {
        BlobError::NotFound { id } => MediaError::not_found(format!("No media found for id '{id}'")),
        BlobError::RangeNotSatisfiable { .. } => {
            MediaError::range_not_satisfiable("Requested range not satisfiable")
        }
        e if e.is_backing_store() => {
            MediaError::bad_gateway("Storage backend failed to serve the media")
        }
        _ => MediaError::general_error("Internal error while preparing the media"),
    };
    media.with_source(err.into())
}

impl IntoResponse for MediaAxumError {
    fn into_response(self) -> Response {
        let media = match self.0.chain().find_map(|e| e.downcast_ref::<MediaError>()) {
            Some(media) => media.sanitize_for_client(),
            None => MediaError::general_error(self.0.to_string()).sanitize_for_client(),
        };

        let status =
            StatusCode::from_u16(media.code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %format!("{:#}", self.0), "request failed");
        }

        if !media.kind.has_body() {
            return status.into_response();
        }
        (status, Json(media.to_json())).into_response()
    }
}
