//! Text rendering of captured exchanges.

use std::fmt::Write;
use std::time::Duration;

use http::HeaderMap;
use tracing::debug;

use super::{CaptureBody, Exchange};
use crate::mask::{is_sensitive, mask};
use crate::stream::TextEncoding;

/// Printed instead of a body that was counted rather than stored.
pub const BODY_NOT_STORED: &str =
    "--- Can't read the body. This is not the part of the request or response. ---";

/// Printed instead of a stored body that could not be decoded.
pub const BODY_DECODE_FAILED: &str =
    "--- Failed to read the body. This is not the part of the request or response. ---";

/// Renders an [`Exchange`] as log text.
pub trait ExchangeFormatter {
    /// Formats the exchange.
    fn format(&self, exchange: &Exchange) -> String;
}

/// One line per exchange: request line, body sizes, status and timing.
#[derive(Debug, Clone, Copy, Default)]
pub struct SummaryFormatter;

/// Request and response with headers and decoded bodies.
///
/// `Authorization` values are masked.
#[derive(Debug, Clone, Copy, Default)]
pub struct FullFormatter;

impl ExchangeFormatter for SummaryFormatter {
    fn format(&self, exchange: &Exchange) -> String {
        let mut out = String::with_capacity(512);
        push_target(&mut out, exchange);
        let _ = write!(out, " {} bytes from ", exchange.request_body.len());
        push_remote(&mut out, exchange);
        let _ = write!(
            out,
            " at {} {} {} bytes in ",
            exchange.timestamp.format("%H:%M:%S%.3f"),
            exchange.status.as_u16(),
            exchange.response_body.len(),
        );
        push_elapsed(&mut out, exchange.elapsed);
        out.push('\n');
        out
    }
}

impl ExchangeFormatter for FullFormatter {
    fn format(&self, exchange: &Exchange) -> String {
        let mut out = String::with_capacity(512);

        push_target(&mut out, exchange);
        out.push_str(" from ");
        push_remote(&mut out, exchange);
        let _ = writeln!(out, " at {}", exchange.timestamp.format("%H:%M:%S%.3f"));
        push_headers(&mut out, &exchange.request_headers);
        push_body(&mut out, &exchange.request_body);

        let _ = write!(out, "{} in ", exchange.status.as_u16());
        push_elapsed(&mut out, exchange.elapsed);
        out.push('\n');
        push_headers(&mut out, &exchange.response_headers);
        push_body(&mut out, &exchange.response_body);

        out
    }
}

/// `{method} {scheme}://{host}{path}{query} {protocol}`
fn push_target(out: &mut String, exchange: &Exchange) {
    let _ = write!(
        out,
        "{} {}://{}{}{} {:?}",
        exchange.method,
        exchange.scheme,
        exchange.host,
        exchange.path,
        exchange.query,
        exchange.version,
    );
}

fn push_remote(out: &mut String, exchange: &Exchange) {
    match exchange.remote_addr {
        Some(addr) => {
            let _ = write!(out, "{}:{}", addr.ip(), addr.port());
        }
        None => out.push_str("-"),
    }
}

fn push_elapsed(out: &mut String, elapsed: Duration) {
    let _ = write!(
        out,
        "{}.{:03} seconds",
        elapsed.as_secs(),
        elapsed.subsec_millis()
    );
}

fn push_headers(out: &mut String, headers: &HeaderMap) {
    for name in headers.keys() {
        let value = headers
            .get_all(name)
            .iter()
            .map(|value| String::from_utf8_lossy(value.as_bytes()))
            .collect::<Vec<_>>()
            .join(",");

        let value = if is_sensitive(name) { mask(&value) } else { value };
        let _ = writeln!(out, "{}: {}", name, value);
    }
}

fn push_body(out: &mut String, body: &CaptureBody) {
    let Some(stream) = body.stored() else {
        out.push_str(BODY_NOT_STORED);
        out.push('\n');
        return;
    };

    match stream.get_string(TextEncoding::Utf8) {
        Ok(text) => out.push_str(text.as_deref().unwrap_or_default()),
        Err(e) => {
            debug!(error = %e, len = stream.len(), "captured body is not valid text");
            out.push_str(BODY_DECODE_FAILED);
        }
    }
    out.push('\n');
}
