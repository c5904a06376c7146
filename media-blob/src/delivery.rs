use std::future::Future;
use std::sync::Arc;

use media_core::{MediaRecord, RecordStore, RequestCtx};
use tracing::{debug, error, info, info_span, instrument, warn, Instrument};

use crate::executor::{self, Transfer};
use crate::{
    parse_range, BlobError, BlobResult, BlobStore, ByteStream, DeliveryConfig, DeliveryPlan,
    MediaClass, ObjectHead,
};

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// What a request will be answered with, before any stream is opened.
///
/// Enough to build every response header; `HEAD` requests stop here.
#[derive(Debug, Clone)]
pub struct PlannedDelivery {
    pub record: MediaRecord,
    pub content_type: String,
    pub plan: DeliveryPlan,
}

/// Everything the HTTP layer needs to answer one request.
///
/// The body stream is already primed: the backing stream is open, any skip
/// phase has run and the first chunk is buffered.
pub struct PreparedDelivery {
    pub record: MediaRecord,
    pub content_type: String,
    pub plan: DeliveryPlan,
    pub body: ByteStream,
}

impl std::fmt::Debug for PreparedDelivery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreparedDelivery")
            .field("record", &self.record)
            .field("content_type", &self.content_type)
            .field("plan", &self.plan)
            .field("body", &"<stream>")
            .finish()
    }
}

/// Per-request orchestration: resolve, fetch metadata, classify, parse the
/// range, plan, then open and prime the body.
#[derive(Clone)]
pub struct MediaDelivery {
    records: Arc<dyn RecordStore>,
    store: Arc<dyn BlobStore>,
    config: DeliveryConfig,
}

impl MediaDelivery {
    pub fn new(
        records: Arc<dyn RecordStore>,
        store: Arc<dyn BlobStore>,
        config: DeliveryConfig,
    ) -> Self {
        Self {
            records,
            store,
            config,
        }
    }

    pub fn config(&self) -> &DeliveryConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn BlobStore> {
        &self.store
    }

    /// Resolve, fetch metadata, classify, parse the range and plan.
    ///
    /// Touches the record store and the backing store's metadata only.
    #[instrument(skip(self, ctx), fields(request_id = %ctx.request_id))]
    pub async fn plan(
        &self,
        ctx: &RequestCtx,
        media_id: &str,
        range_header: Option<&str>,
    ) -> BlobResult<PlannedDelivery> {
        let record = self
            .records
            .lookup(media_id)
            .await
            .map_err(BlobError::record_store)?
            .ok_or_else(|| BlobError::not_found(media_id))?;

        let head = self
            .deadline("head", &record.key, self.store.head(&record.key))
            .await
            .inspect_err(|err| {
                error!(media_id, key = %record.key, error = %err, "metadata lookup failed");
            })?;

        if let Some(declared) = record.size.filter(|declared| *declared != head.size_bytes) {
            warn!(
                media_id,
                key = %record.key,
                declared,
                actual = head.size_bytes,
                "declared size differs from backing store, using backing store size"
            );
        }

        let content_type = resolve_content_type(&record, &head);
        let class = MediaClass::of(&content_type);

        let range = parse_range(range_header, head.size_bytes, self.config.range_options())
            .map_err(|reason| {
                info!(
                    media_id,
                    size = head.size_bytes,
                    range = range_header.unwrap_or_default(),
                    %reason,
                    "range not satisfiable"
                );
                BlobError::range_not_satisfiable(head.size_bytes, reason)
            })?;

        Ok(PlannedDelivery {
            record,
            content_type,
            plan: DeliveryPlan::new(range, head.size_bytes, class),
        })
    }

    /// Run every step up to header commit.
    ///
    /// Any error returned here happened before a status line was chosen, so
    /// the caller can still map it to a status code. Failures after this
    /// point only show up in the body stream and in the logs.
    pub async fn prepare(
        &self,
        ctx: &RequestCtx,
        media_id: &str,
        range_header: Option<&str>,
    ) -> BlobResult<PreparedDelivery> {
        let PlannedDelivery {
            record,
            content_type,
            plan,
        } = self.plan(ctx, media_id, range_header).await?;

        let body = self
            .open(ctx, &record, &plan)
            .instrument(info_span!("open", request_id = %ctx.request_id, media_id))
            .await?;

        Ok(PreparedDelivery {
            record,
            content_type,
            plan,
            body,
        })
    }

    async fn open(
        &self,
        ctx: &RequestCtx,
        record: &MediaRecord,
        plan: &DeliveryPlan,
    ) -> BlobResult<ByteStream> {
        let native = plan.partial
            && self.config.prefer_native_range
            && self.store.capabilities().supports_range;
        let range = native.then(|| plan.byte_range());

        debug!(
            key = %record.key,
            start = plan.start,
            end = plan.end,
            native,
            "opening backing stream"
        );

        let opened = self
            .deadline("get", &record.key, self.store.get(&record.key, range))
            .await
            .inspect_err(|err| {
                error!(media_id = %record.id, key = %record.key, error = %err, "stream open failed");
            })?;

        let opened_at_zero = match range {
            None => true,
            Some(_) if opened.size_bytes == plan.content_length => false,
            // Some backends answer a range read with the whole object.
            Some(_) if opened.size_bytes == plan.size => {
                warn!(
                    key = %record.key,
                    start = plan.start,
                    "store ignored the requested range, skipping to start"
                );
                true
            }
            Some(requested) => {
                error!(
                    key = %record.key,
                    requested = %requested.to_header_value(),
                    returned = opened.size_bytes,
                    expected = plan.content_length,
                    "range read returned an unexpected length"
                );
                return Err(BlobError::backend(std::io::Error::other(format!(
                    "range read of {} returned {} bytes, expected {}",
                    record.key, opened.size_bytes, plan.content_length
                ))));
            }
        };

        let body = Transfer::for_plan(ctx, &record.key, plan, opened_at_zero).run(opened.stream);
        Ok(executor::prime(body).await?)
    }

    async fn deadline<T, F>(&self, operation: &'static str, key: &str, fut: F) -> BlobResult<T>
    where
        F: Future<Output = BlobResult<T>>,
    {
        match tokio::time::timeout(self.config.backend_timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(BlobError::Timeout {
                operation,
                key: key.to_string(),
                after_ms: self.config.backend_timeout.as_millis(),
            }),
        }
    }
}

/// The record's declared type wins; the store's type fills in when the
/// record has none.
fn resolve_content_type(record: &MediaRecord, head: &ObjectHead) -> String {
    if !record.content_type.trim().is_empty() {
        return record.content_type.clone();
    }
    head.content_type
        .clone()
        .filter(|ct| !ct.trim().is_empty())
        .unwrap_or_else(|| FALLBACK_CONTENT_TYPE.to_string())
}
