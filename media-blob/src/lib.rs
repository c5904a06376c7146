//! # media-blob: range-aware delivery of stored objects
//!
//! `media-blob` turns "give me media `X`, maybe bytes `a-b` of it" into a
//! delivery plan and a byte stream that yields exactly those bytes. It is
//! server agnostic: the HTTP crate decides how the plan becomes headers.
//!
//! ## Pipeline
//!
//! ```text
//! identifier ─▶ RecordStore::lookup ─▶ BlobStore::head ─▶ classify
//!            ─▶ parse_range ─▶ DeliveryPlan ─▶ BlobStore::get ─▶ executor
//! ```
//!
//! Stores that cannot seek are opened at offset zero and the executor
//! discards the leading bytes. Stores that advertise native range reads
//! are asked for the interval directly.
//!
//! ## Quick start
//!
//! ```rust
//! use std::sync::Arc;
//! use bytes::Bytes;
//! use futures::StreamExt;
//! use media_blob::prelude::*;
//! use media_core::{MediaRecord, MemoryRecordStore, RequestCtx};
//!
//! # #[tokio::main]
//! # async fn main() -> BlobResult<()> {
//! let blobs = MemoryBlobStore::new();
//! blobs.insert("videos/intro.mp4", Bytes::from(vec![7u8; 1000]), Some("video/mp4"));
//!
//! let records = MemoryRecordStore::with_records([
//!     MediaRecord::new("intro", "videos/intro.mp4", "intro.mp4", "video/mp4"),
//! ]);
//!
//! let delivery = MediaDelivery::new(Arc::new(records), Arc::new(blobs), DeliveryConfig::default());
//! let prepared = delivery.prepare(&RequestCtx::new(), "intro", Some("bytes=0-99")).await?;
//!
//! assert_eq!(prepared.plan.status_code(), 206);
//! let bytes: Vec<_> = prepared.body.collect().await;
//! assert_eq!(bytes.into_iter().map(|c| c.unwrap().len()).sum::<usize>(), 100);
//! # Ok(())
//! # }
//! ```

mod classify;
mod config;
mod delivery;
mod error;
pub mod executor;
mod memory_store;
mod plan;
pub mod range;
mod s3_store;
pub mod store;
mod types;

pub use classify::MediaClass;
pub use config::DeliveryConfig;
pub use delivery::{MediaDelivery, PlannedDelivery, PreparedDelivery};
pub use error::{BlobError, BlobResult};
pub use memory_store::MemoryBlobStore;
pub use plan::DeliveryPlan;
pub use range::{parse_range, RangeOptions, RangeRejection, RangeSpec};
pub use s3_store::{S3CompatibleStore, S3Config};
pub use store::{BlobStore, GetResult, ObjectHead, StoreCapabilities};
pub use types::{ByteRange, ByteStream};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        BlobError, BlobResult, BlobStore, ByteStream, DeliveryConfig, DeliveryPlan, MediaClass,
        MediaDelivery, MemoryBlobStore, RangeSpec,
    };
}
