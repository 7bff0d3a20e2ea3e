//! The record of one request/response pair.

use std::net::SocketAddr;
use std::time::Duration;

use chrono::{DateTime, Local};
use http::{HeaderMap, Method, StatusCode, Version, request, response};

use super::CaptureBody;

/// Everything known about a captured exchange.
///
/// Request fields are filled when the capture begins, before the request is
/// handed on, because the request may be consumed by the handler. Response
/// fields are filled when it finishes.
#[derive(Debug)]
pub struct Exchange {
    /// When the request arrived.
    pub timestamp: DateTime<Local>,
    /// Request method.
    pub method: Method,
    /// URI scheme, `http` if the request URI has none.
    pub scheme: String,
    /// Authority from the URI or the `Host` header.
    pub host: String,
    /// Request path.
    pub path: String,
    /// Query string including the leading `?`, or empty.
    pub query: String,
    /// Protocol version.
    pub version: Version,
    /// Peer address, when the transport knows it.
    pub remote_addr: Option<SocketAddr>,
    /// Request headers.
    pub request_headers: HeaderMap,
    /// Sniffed request body.
    pub request_body: CaptureBody,
    /// Response status.
    pub status: StatusCode,
    /// Response headers.
    pub response_headers: HeaderMap,
    /// Sniffed response body.
    pub response_body: CaptureBody,
    /// Time between the start of the capture and the response.
    pub elapsed: Duration,
}

impl Exchange {
    /// Starts a record from request metadata.
    pub fn from_request(
        parts: &request::Parts,
        remote_addr: Option<SocketAddr>,
        request_body: CaptureBody,
        response_body: CaptureBody,
    ) -> Self {
        let uri = &parts.uri;
        let host = uri
            .authority()
            .map(|authority| authority.as_str().to_owned())
            .or_else(|| {
                parts
                    .headers
                    .get(http::header::HOST)
                    .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
            })
            .unwrap_or_default();

        Self {
            timestamp: Local::now(),
            method: parts.method.clone(),
            scheme: uri.scheme_str().unwrap_or("http").to_owned(),
            host,
            path: uri.path().to_owned(),
            query: uri.query().map(|q| format!("?{q}")).unwrap_or_default(),
            version: parts.version,
            remote_addr,
            request_headers: parts.headers.clone(),
            request_body,
            status: StatusCode::OK,
            response_headers: HeaderMap::new(),
            response_body,
            elapsed: Duration::ZERO,
        }
    }

    /// Fills in the response side.
    pub fn record_response(&mut self, parts: &response::Parts, elapsed: Duration) {
        self.status = parts.status;
        self.response_headers = parts.headers.clone();
        self.elapsed = elapsed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::LengthCountingStream;

    fn counted() -> CaptureBody {
        CaptureBody::Counted(LengthCountingStream::new())
    }

    #[test]
    fn test_from_absolute_uri() {
        let (parts, ()) = http::Request::post("https://api.example.com/orders?page=2")
            .body(())
            .unwrap()
            .into_parts();

        let exchange = Exchange::from_request(&parts, None, counted(), counted());
        assert_eq!(exchange.scheme, "https");
        assert_eq!(exchange.host, "api.example.com");
        assert_eq!(exchange.path, "/orders");
        assert_eq!(exchange.query, "?page=2");
        assert_eq!(exchange.method, Method::POST);
    }

    #[test]
    fn test_host_header_fallback() {
        let (parts, ()) = http::Request::get("/health")
            .header("host", "localhost:8080")
            .body(())
            .unwrap()
            .into_parts();

        let exchange = Exchange::from_request(&parts, None, counted(), counted());
        assert_eq!(exchange.scheme, "http");
        assert_eq!(exchange.host, "localhost:8080");
        assert_eq!(exchange.query, "");
    }

    #[test]
    fn test_record_response() {
        let (parts, ()) = http::Request::get("/").body(()).unwrap().into_parts();
        let mut exchange = Exchange::from_request(&parts, None, counted(), counted());

        let (response, ()) = http::Response::builder()
            .status(StatusCode::NOT_FOUND)
            .header("content-type", "text/plain")
            .body(())
            .unwrap()
            .into_parts();
        exchange.record_response(&response, Duration::from_millis(1500));

        assert_eq!(exchange.status, StatusCode::NOT_FOUND);
        assert_eq!(exchange.response_headers.len(), 1);
        assert_eq!(exchange.elapsed.as_millis(), 1500);
    }
}
