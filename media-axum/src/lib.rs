//! media-axum: Axum surface for media delivery.
//!
//! Exposes `GET /media/{id}` backed by a [`media_blob::MediaDelivery`],
//! maps delivery failures onto status codes and Feathers-style JSON
//! bodies, and tags every request with an `x-request-id`.

pub mod app;
pub mod media;
pub mod response;
pub mod state;
mod error;
pub use error::{to_media_error, MediaAxumError};
pub use state::MediaAxumState;

pub use app::{axum, AxumApp, REQUEST_ID_HEADER};
