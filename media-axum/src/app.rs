use std::sync::Arc;

use axum::body::Body;
use axum::http::{HeaderName, Request};
use axum::routing::get;
use axum::Router;
use media_blob::MediaDelivery;
use tokio::net::{TcpListener, ToSocketAddrs};
use tower::ServiceBuilder;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::{media, MediaAxumState};

pub const REQUEST_ID_HEADER: &str = "x-request-id";

pub struct AxumApp {
    pub delivery: Arc<MediaDelivery>,
    pub router: Router<()>,
}

impl Clone for AxumApp {
    fn clone(&self) -> Self {
        Self {
            delivery: Arc::clone(&self.delivery),
            router: self.router.clone(),
        }
    }
}

impl AxumApp {
    /// Routes `GET /media/{id}` and `GET /health`.
    pub fn new(delivery: MediaDelivery) -> Self {
        let state = MediaAxumState::new(delivery);
        let delivery = Arc::clone(&state.delivery);
        let router = Router::new()
            .route("/media/{id}", get(media::serve_media))
            .route("/health", get(|| async { "ok" }))
            .with_state(state);
        Self { delivery, router }
    }

    /// The router with request-id and tracing layers applied.
    ///
    /// `x-request-id` is taken from the request when present, generated
    /// otherwise, and echoed on every response.
    pub fn into_router(self) -> Router<()> {
        let header = HeaderName::from_static(REQUEST_ID_HEADER);
        let trace = TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
            let request_id = req
                .headers()
                .get(REQUEST_ID_HEADER)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default();
            tracing::info_span!(
                "http_request",
                method = %req.method(),
                uri = %req.uri(),
                request_id,
            )
        });

        self.router.layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(header.clone(), MakeRequestUuid))
                .layer(trace)
                .layer(PropagateRequestIdLayer::new(header)),
        )
    }

    pub async fn listen<A>(self, addr: A) -> anyhow::Result<()>
    where
        A: ToSocketAddrs,
    {
        let listener = TcpListener::bind(addr).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!(addr = %local_addr, "media server listening");
        axum::serve(listener, self.into_router()).await?;
        Ok(())
    }
}

pub fn axum(delivery: MediaDelivery) -> AxumApp {
    AxumApp::new(delivery)
}
