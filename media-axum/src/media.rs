use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, Method},
    response::Response,
};
use media_core::RequestCtx;

use crate::{response, MediaAxumError, MediaAxumState, REQUEST_ID_HEADER};

/// Build the per-request context from the incoming headers.
///
/// The request-id layer guarantees `x-request-id` is set by the time a
/// handler runs; a fresh id is only generated when the handler is used
/// without it.
pub fn request_ctx(headers: &HeaderMap) -> RequestCtx {
    match headers.get(REQUEST_ID_HEADER).and_then(|v| v.to_str().ok()) {
        Some(id) => RequestCtx::new().with_request_id(id),
        None => RequestCtx::new(),
    }
}

/// `GET /media/{id}`, and `HEAD` which plans but never opens the object.
pub async fn serve_media(
    State(state): State<MediaAxumState>,
    method: Method,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, MediaAxumError> {
    let ctx = request_ctx(&headers);

    // A value that is not visible ASCII can never be a byte range, so it is
    // passed on as an empty string and rejected by the parser.
    let range = headers
        .get(header::RANGE)
        .map(|v| v.to_str().unwrap_or_default());

    let cache_max_age = state.delivery.config().cache_max_age;
    if method == Method::HEAD {
        let planned = state.delivery.plan(&ctx, &id, range).await?;
        return response::head_response(planned, cache_max_age);
    }

    let prepared = state.delivery.prepare(&ctx, &id, range).await?;
    response::delivery_response(prepared, cache_max_age)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn ctx_uses_request_id_header() {
        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static("req-42"));

        let ctx = request_ctx(&headers);
        assert_eq!(ctx.request_id, "req-42");
    }

    #[test]
    fn ctx_generates_an_id_when_missing() {
        let ctx = request_ctx(&HeaderMap::new());
        assert!(!ctx.request_id.is_empty());
    }
}
