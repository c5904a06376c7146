//! media-core: transport-agnostic building blocks for media delivery.
//!
//! Holds the pieces every other crate in the workspace leans on:
//! structured client-facing errors, the key/value configuration store,
//! the per-request context and the record store capability that maps a
//! public media identifier to its backing object.

pub mod config;
pub mod context;
pub mod errors;
pub mod record;

pub use config::{MediaConfig, MediaConfigSnapshot};
pub use context::RequestCtx;
pub use errors::{ErrorKind, MediaError, MediaResult};
pub use record::{ManifestRecordStore, MediaRecord, MemoryRecordStore, RecordStore};
