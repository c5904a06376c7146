//! Stream executor.
//!
//! Turns a backing-store stream into a body stream that yields exactly the
//! planned bytes: an optional skip phase discards leading bytes, then at
//! most `length` bytes are forwarded. Chunks are sliced, never copied.
//!
//! The backing stream is owned by the returned stream, so it is released
//! on every exit path: completion, error, or the consumer dropping the body
//! (client disconnect).

use std::io;

use bytes::Bytes;
use futures::StreamExt;
use media_core::RequestCtx;
use tracing::{debug, error, info, warn};

use crate::{ByteStream, DeliveryPlan};

/// One planned copy from a backing stream to a response body.
#[derive(Debug, Clone)]
pub struct Transfer {
    pub request_id: String,
    pub key: String,
    /// Bytes to discard before forwarding anything
    pub skip: u64,
    /// Bytes to forward
    pub length: u64,
}

impl Transfer {
    /// Plan a transfer. `opened_at_zero` is true when the source stream
    /// starts at offset zero and the executor has to skip to `plan.start`.
    pub fn for_plan(ctx: &RequestCtx, key: &str, plan: &DeliveryPlan, opened_at_zero: bool) -> Self {
        Self {
            request_id: ctx.request_id.clone(),
            key: key.to_string(),
            skip: if opened_at_zero { plan.start } else { 0 },
            length: plan.content_length,
        }
    }

    /// Run the transfer lazily; nothing is read until the result is polled.
    pub fn run(self, source: ByteStream) -> ByteStream {
        let stream = async_stream::stream! {
            let mut source = source;
            let mut guard = TransferGuard::new(self.request_id, self.key, self.length);
            let mut to_skip = self.skip;
            let mut remaining = self.length;

            if remaining == 0 {
                guard.complete();
            }

            while remaining > 0 {
                let mut chunk: Bytes = match source.next().await {
                    Some(Ok(chunk)) => chunk,
                    Some(Err(err)) => {
                        guard.fail(phase(to_skip), &err);
                        yield Err(err);
                        return;
                    }
                    None if to_skip > 0 => {
                        let err = io::Error::new(
                            io::ErrorKind::UnexpectedEof,
                            format!("backing stream ended with {to_skip} bytes left to skip"),
                        );
                        guard.fail("skip", &err);
                        yield Err(err);
                        return;
                    }
                    None => {
                        guard.short();
                        return;
                    }
                };

                if to_skip > 0 {
                    let len = chunk.len() as u64;
                    if len <= to_skip {
                        to_skip -= len;
                        continue;
                    }
                    chunk = chunk.slice(to_skip as usize..);
                    to_skip = 0;
                }

                if chunk.is_empty() {
                    continue;
                }
                if chunk.len() as u64 > remaining {
                    chunk = chunk.slice(..remaining as usize);
                }

                remaining -= chunk.len() as u64;
                guard.record(chunk.len());
                if remaining == 0 {
                    guard.complete();
                }
                yield Ok(chunk);
            }
        };

        Box::pin(stream)
    }
}

/// Pull the first item before any header is committed.
///
/// Errors raised while opening or skipping surface here, while a status
/// code can still report them. The item is put back in front of the stream.
pub async fn prime(mut stream: ByteStream) -> io::Result<ByteStream> {
    match stream.next().await {
        Some(Ok(first)) => {
            let primed: ByteStream =
                Box::pin(futures::stream::once(async move { Ok(first) }).chain(stream));
            Ok(primed)
        }
        Some(Err(err)) => Err(err),
        None => Ok(Box::pin(futures::stream::empty())),
    }
}

fn phase(to_skip: u64) -> &'static str {
    if to_skip > 0 {
        "skip"
    } else {
        "copy"
    }
}

/// Logs how a transfer ended. Dropped unfinished means the body was dropped
/// by the consumer, which is how a client disconnect shows up.
struct TransferGuard {
    request_id: String,
    key: String,
    expected: u64,
    written: u64,
    finished: bool,
}

impl TransferGuard {
    fn new(request_id: String, key: String, expected: u64) -> Self {
        Self {
            request_id,
            key,
            expected,
            written: 0,
            finished: false,
        }
    }

    fn record(&mut self, n: usize) {
        self.written += n as u64;
    }

    fn complete(&mut self) {
        self.finished = true;
        info!(
            request_id = %self.request_id,
            key = %self.key,
            bytes_written = self.written,
            "media transfer complete"
        );
    }

    fn short(&mut self) {
        self.finished = true;
        warn!(
            request_id = %self.request_id,
            key = %self.key,
            bytes_written = self.written,
            expected = self.expected,
            "backing stream ended early, transfer incomplete"
        );
    }

    fn fail(&mut self, phase: &'static str, err: &io::Error) {
        self.finished = true;
        error!(
            request_id = %self.request_id,
            key = %self.key,
            bytes_written = self.written,
            phase,
            error = %err,
            "media transfer failed"
        );
    }
}

impl Drop for TransferGuard {
    fn drop(&mut self) {
        if !self.finished {
            debug!(
                request_id = %self.request_id,
                key = %self.key,
                bytes_written = self.written,
                expected = self.expected,
                "body dropped before transfer completed, client disconnected"
            );
        }
    }
}
