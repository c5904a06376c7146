//! Response builder.
//!
//! Every header is derived from the [`DeliveryPlan`] before the body is
//! attached, so the status line never depends on how the transfer goes.

use std::time::Duration;

use axum::{
    body::Body,
    http::{header, response::Builder, StatusCode},
    response::Response,
};
use media_blob::{DeliveryPlan, PlannedDelivery, PreparedDelivery};

use crate::MediaAxumError;

/// Turn a prepared delivery into a streaming response.
pub fn delivery_response(
    prepared: PreparedDelivery,
    cache_max_age: Duration,
) -> Result<Response, MediaAxumError> {
    let builder = response_builder(
        &prepared.plan,
        &prepared.content_type,
        &prepared.record.file_name,
        cache_max_age,
    );
    Ok(builder.body(Body::from_stream(prepared.body))?)
}

/// Same headers as the matching `GET`, no body.
pub fn head_response(
    planned: PlannedDelivery,
    cache_max_age: Duration,
) -> Result<Response, MediaAxumError> {
    let builder = response_builder(
        &planned.plan,
        &planned.content_type,
        &planned.record.file_name,
        cache_max_age,
    );
    Ok(builder.body(Body::empty())?)
}

fn response_builder(
    plan: &DeliveryPlan,
    content_type: &str,
    file_name: &str,
    cache_max_age: Duration,
) -> Builder {
    let status = if plan.partial {
        StatusCode::PARTIAL_CONTENT
    } else {
        StatusCode::OK
    };

    let mut builder = Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, plan.content_length)
        .header(header::ACCEPT_RANGES, "bytes")
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition(plan.is_streaming(), file_name),
        );

    if let Some(content_range) = plan.content_range() {
        builder = builder.header(header::CONTENT_RANGE, content_range);
    }
    if let Some(cache_control) = cache_control(plan, cache_max_age) {
        builder = builder.header(header::CACHE_CONTROL, cache_control);
    }
    builder
}

/// `public, max-age=N` on the streaming path, nothing for plain downloads.
pub fn cache_control(plan: &DeliveryPlan, max_age: Duration) -> Option<String> {
    plan.is_streaming()
        .then(|| format!("public, max-age={}", max_age.as_secs()))
}

/// `inline` or `attachment` with the declared file name.
///
/// The quoted `filename` is always plain ASCII. Names with anything else
/// also get an RFC 5987 `filename*` carrying the exact UTF-8 name.
pub fn content_disposition(inline: bool, file_name: &str) -> String {
    let kind = if inline { "inline" } else { "attachment" };

    let mut ascii = String::with_capacity(file_name.len());
    for c in file_name.chars() {
        match c {
            '"' | '\\' => {
                ascii.push('\\');
                ascii.push(c);
            }
            c if c.is_ascii() && !c.is_ascii_control() => ascii.push(c),
            _ => ascii.push('_'),
        }
    }

    let plain = file_name
        .chars()
        .all(|c| c.is_ascii() && !c.is_ascii_control());
    if plain {
        format!("{kind}; filename=\"{ascii}\"")
    } else {
        format!(
            "{kind}; filename=\"{ascii}\"; filename*=UTF-8''{}",
            urlencoding::encode(file_name)
        )
    }
}
