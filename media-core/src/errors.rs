//! # Errors (Feathers-style)
//!
//! Client-facing errors for the delivery surface.
//! Core goals:
//! - one status code + class name per failure kind
//! - can be carried through anyhow::Error
//! - transport-agnostic (the HTTP crate decides how to serialize)

use std::fmt;

use anyhow::Error as AnyError;

/// A convenience result type for media-core APIs.
pub type MediaResult<T> = std::result::Result<T, AnyError>;

/// Error class names + status codes used by the delivery surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,            // 404
    RangeNotSatisfiable, // 416
    GeneralError,        // 500
    BadGateway,          // 502
}

impl ErrorKind {
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorKind::NotFound => 404,
            ErrorKind::RangeNotSatisfiable => 416,
            ErrorKind::GeneralError => 500,
            ErrorKind::BadGateway => 502,
        }
    }

    /// Error `name` (e.g. "NotFound")
    pub fn name(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "NotFound",
            ErrorKind::RangeNotSatisfiable => "RangeNotSatisfiable",
            ErrorKind::GeneralError => "GeneralError",
            ErrorKind::BadGateway => "BadGateway",
        }
    }

    /// Error `className` (kebab-cased)
    pub fn class_name(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not-found",
            ErrorKind::RangeNotSatisfiable => "range-not-satisfiable",
            ErrorKind::GeneralError => "general-error",
            ErrorKind::BadGateway => "bad-gateway",
        }
    }

    /// Whether a response for this kind carries a JSON body.
    ///
    /// 416 is answered with an empty body.
    pub fn has_body(&self) -> bool {
        !matches!(self, ErrorKind::RangeNotSatisfiable)
    }
}

/// A structured error that can live inside `anyhow::Error`.
///
/// Serialized Feathers-style as `name`, `message`, `code` (HTTP status)
/// and `className`. The `source` is for logs only.
#[derive(Debug)]
pub struct MediaError {
    pub kind: ErrorKind,
    pub message: String,
    pub source: Option<AnyError>,
}

impl MediaError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(mut self, source: AnyError) -> Self {
        self.source = Some(source);
        self
    }

    pub fn code(&self) -> u16 {
        self.kind.status_code()
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn class_name(&self) -> &'static str {
        self.kind.class_name()
    }

    /// Convert into `anyhow::Error`.
    pub fn into_anyhow(self) -> AnyError {
        AnyError::new(self)
    }

    /// A copy suitable for returning to clients: the inner `source`
    /// (backend detail, credentials in URLs, ...) is dropped.
    pub fn sanitize_for_client(&self) -> MediaError {
        MediaError {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }

    /// Feathers-ish JSON payload.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "name": self.name(),
            "message": self.message,
            "code": self.code(),
            "className": self.class_name(),
        })
    }

    // ---- Constructors ----

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, msg)
    }
    pub fn range_not_satisfiable(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::RangeNotSatisfiable, msg)
    }
    pub fn general_error(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::GeneralError, msg)
    }
    pub fn bad_gateway(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::BadGateway, msg)
    }
}

impl fmt::Display for MediaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.name(), self.code(), self.message)
    }
}

impl std::error::Error for MediaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn survives_anyhow_round_trip() {
        let err = MediaError::not_found("media 'abc' not found").into_anyhow();
        let media = err.downcast_ref::<MediaError>().unwrap();
        assert_eq!(media.kind, ErrorKind::NotFound);
        assert_eq!(media.code(), 404);
    }

    #[test]
    fn sanitize_drops_source() {
        let err = MediaError::bad_gateway("backing store unavailable")
            .with_source(anyhow::anyhow!("https://secret@host/bucket"));
        let safe = err.sanitize_for_client();
        assert!(safe.source.is_none());
        assert_eq!(safe.message, "backing store unavailable");
        assert!(!safe.to_json().to_string().contains("secret"));
    }

    #[test]
    fn json_shape() {
        let body = MediaError::not_found("gone fishing").to_json();
        assert_eq!(body["name"], "NotFound");
        assert_eq!(body["code"], 404);
        assert_eq!(body["className"], "not-found");
        assert_eq!(body["message"], "gone fishing");
    }

    #[test]
    fn display_includes_status() {
        let err = MediaError::general_error("boom");
        assert_eq!(err.to_string(), "GeneralError (500): boom");
    }

    #[test]
    fn range_not_satisfiable_has_no_body() {
        assert_eq!(ErrorKind::RangeNotSatisfiable.status_code(), 416);
        assert!(!ErrorKind::RangeNotSatisfiable.has_body());
        assert!(ErrorKind::NotFound.has_body());
        assert_eq!(ErrorKind::BadGateway.class_name(), "bad-gateway");
    }
}
