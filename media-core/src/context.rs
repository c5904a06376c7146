//! Per-request context.

use uuid::Uuid;

/// Context carried with every delivery request.
///
/// Passed explicitly into the orchestrator and executor so each log line
/// can be tied back to the request that produced it.
#[derive(Debug, Clone)]
pub struct RequestCtx {
    pub request_id: String,
}

impl RequestCtx {
    /// Fresh context with a random request id.
    pub fn new() -> Self {
        Self {
            request_id: Uuid::new_v4().to_string(),
        }
    }

    pub fn with_request_id<S: Into<String>>(mut self, request_id: S) -> Self {
        self.request_id = request_id.into();
        self
    }
}

impl Default for RequestCtx {
    fn default() -> Self {
        Self::new()
    }
}
