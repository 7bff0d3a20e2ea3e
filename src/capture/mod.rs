//! Capturing request/response exchanges for logging.
//!
//! A [`Capture`] is started for each request. It picks sinks for both bodies
//! based on the [`CaptureLevel`], hands out [`SnifferStream`]s that copy the
//! bodies into those sinks while the pipeline streams them, and at the end
//! formats the exchange and emits it as one `tracing` event at `INFO`.
//!
//! ```
//! use std::io::{Read, Write};
//! use std::sync::Arc;
//! use chunkstream::{Capture, CaptureConfig, CaptureLevel, SharedPool};
//!
//! let config = CaptureConfig::default().with_level(CaptureLevel::Full);
//! let (request, body) = http::Request::post("http://localhost/echo")
//!     .body(&b"ping"[..])
//!     .unwrap()
//!     .into_parts();
//!
//! let mut capture = Capture::begin(&config, SharedPool::global(), &request, None)?
//!     .expect("capture is enabled");
//!
//! let mut received = Vec::new();
//! capture.sniff_request(body).read_to_end(&mut received)?;
//!
//! let mut response_body = Vec::new();
//! capture.sniff_response(&mut response_body).write_all(b"pong")?;
//!
//! let (response, ()) = http::Response::new(()).into_parts();
//! let message = capture.finish(&response);
//! assert!(message.contains("ping"));
//! assert!(message.contains("pong"));
//! # Ok::<(), chunkstream::StreamError>(())
//! ```

mod body;
mod exchange;
mod format;
mod level;

pub use body::CaptureBody;
pub use exchange::Exchange;
pub use format::{
    BODY_DECODE_FAILED, BODY_NOT_STORED, ExchangeFormatter, FullFormatter, SummaryFormatter,
};
pub use level::CaptureLevel;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use http::{request, response};
use tracing::info;

use crate::config::CaptureConfig;
use crate::error::StreamError;
use crate::io::SnifferStream;
use crate::pool::ChunkPool;

/// An exchange being captured.
///
/// Dropping a capture without calling [`Capture::finish`] discards it and
/// returns any stored body chunks to the pool.
#[derive(Debug)]
pub struct Capture {
    level: CaptureLevel,
    started: Instant,
    exchange: Exchange,
}

impl Capture {
    /// Starts capturing the request described by `parts`.
    ///
    /// Returns `Ok(None)` when the effective level is [`CaptureLevel::Off`];
    /// the caller should then pass traffic through untouched.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::InvalidConfig`] if `config` is invalid.
    pub fn begin(
        config: &CaptureConfig,
        pool: Arc<dyn ChunkPool>,
        parts: &request::Parts,
        remote_addr: Option<SocketAddr>,
    ) -> Result<Option<Self>, StreamError> {
        config.validate()?;

        let level = config.effective_level();
        let stream_config = config.stream_config();

        let Some(request_body) = CaptureBody::for_level(level, &pool, stream_config)? else {
            return Ok(None);
        };
        let Some(response_body) = CaptureBody::for_level(level, &pool, stream_config)? else {
            return Ok(None);
        };

        Ok(Some(Self {
            level,
            started: Instant::now(),
            exchange: Exchange::from_request(parts, remote_addr, request_body, response_body),
        }))
    }

    /// Returns the level this capture runs at.
    pub fn level(&self) -> CaptureLevel {
        self.level
    }

    /// Returns the exchange recorded so far.
    pub fn exchange(&self) -> &Exchange {
        &self.exchange
    }

    /// Wraps the request body so that everything read from it is captured.
    pub fn sniff_request<M>(&mut self, master: M) -> SnifferStream<M, &mut CaptureBody> {
        SnifferStream::new(master, &mut self.exchange.request_body)
    }

    /// Wraps the response body so that everything written to it is captured.
    pub fn sniff_response<M>(&mut self, master: M) -> SnifferStream<M, &mut CaptureBody> {
        SnifferStream::new(master, &mut self.exchange.response_body)
    }

    /// Completes the capture with the response metadata.
    ///
    /// Formats the exchange with the formatter matching the level, emits it
    /// at `INFO` and returns the formatted text. Stored bodies are released
    /// back to the pool before this returns.
    pub fn finish(mut self, parts: &response::Parts) -> String {
        self.exchange.record_response(parts, self.started.elapsed());

        let message = match self.level {
            CaptureLevel::Full => FullFormatter.format(&self.exchange),
            _ => SummaryFormatter.format(&self.exchange),
        };

        info!("{}", message.trim_end());
        message
    }
}
