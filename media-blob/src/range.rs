//! `Range` header parsing.
//!
//! Only the single-interval byte form is honored: `bytes=<start>-<end>` and
//! `bytes=<start>-`. Suffix ranges (`bytes=-<n>`) are rejected unless
//! [`RangeOptions::allow_suffix`] is set. Every rejection ends in the same
//! 416 response; [`RangeRejection`] only says why, for the logs.

use thiserror::Error;

/// Outcome of a successful parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeSpec {
    /// No header: serve the entire object.
    Unbounded,
    /// Inclusive interval with `start <= end < size`.
    Bounded { start: u64, end: u64 },
}

impl RangeSpec {
    pub fn is_bounded(&self) -> bool {
        matches!(self, RangeSpec::Bounded { .. })
    }
}

/// Why a header was refused.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeRejection {
    #[error("range unit is not `bytes=`")]
    WrongUnit,

    #[error("range is not a single `start-end` pair")]
    Malformed,

    #[error("suffix ranges are not supported")]
    SuffixUnsupported,

    #[error("range bound is not a non-negative integer")]
    NotANumber,

    #[error("empty suffix range")]
    EmptySuffix,

    #[error("range end {end} is past the last byte")]
    EndOutOfBounds { end: u64 },

    #[error("range start {start} is past the last byte")]
    StartOutOfBounds { start: u64 },

    #[error("range start {start} is after end {end}")]
    Inverted { start: u64, end: u64 },
}

/// Parser switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RangeOptions {
    /// Honor `bytes=-<n>` as "the last n bytes".
    pub allow_suffix: bool,
}

impl RangeOptions {
    pub fn with_suffix(mut self, allow: bool) -> Self {
        self.allow_suffix = allow;
        self
    }
}

/// Parse an optional `Range` header value against an object of `size` bytes.
pub fn parse_range(
    header: Option<&str>,
    size: u64,
    options: RangeOptions,
) -> Result<RangeSpec, RangeRejection> {
    let Some(value) = header else {
        return Ok(RangeSpec::Unbounded);
    };

    let spec = value
        .strip_prefix("bytes=")
        .ok_or(RangeRejection::WrongUnit)?;

    let parts: Vec<&str> = spec.split('-').collect();
    let [start_str, end_str] = parts.as_slice() else {
        return Err(RangeRejection::Malformed);
    };

    if start_str.is_empty() {
        return parse_suffix(end_str, size, options);
    }

    let start = parse_offset(start_str)?;
    if start >= size {
        return Err(RangeRejection::StartOutOfBounds { start });
    }

    let end = if end_str.is_empty() {
        size - 1
    } else {
        let end = parse_offset(end_str)?;
        if end >= size {
            return Err(RangeRejection::EndOutOfBounds { end });
        }
        end
    };

    if start > end {
        return Err(RangeRejection::Inverted { start, end });
    }

    Ok(RangeSpec::Bounded { start, end })
}

fn parse_suffix(
    len_str: &str,
    size: u64,
    options: RangeOptions,
) -> Result<RangeSpec, RangeRejection> {
    if !options.allow_suffix {
        return Err(RangeRejection::SuffixUnsupported);
    }
    if len_str.is_empty() {
        return Err(RangeRejection::Malformed);
    }

    let len = parse_offset(len_str)?;
    if len == 0 {
        return Err(RangeRejection::EmptySuffix);
    }
    if size == 0 {
        return Err(RangeRejection::StartOutOfBounds { start: 0 });
    }

    let start = size - len.min(size);
    Ok(RangeSpec::Bounded {
        start,
        end: size - 1,
    })
}

// `u64::from_str` accepts a leading `+`; range bounds are digits only.
fn parse_offset(raw: &str) -> Result<u64, RangeRejection> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(RangeRejection::NotANumber);
    }
    raw.parse::<u64>().map_err(|_| RangeRejection::NotANumber)
}
