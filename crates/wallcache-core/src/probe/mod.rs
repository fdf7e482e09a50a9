//! Liveness / content-type probing of media URLs.
//!
//! A probe is a HEAD request (redirects followed) and, when the HEAD answers
//! but does not prove an image, a GET that stops as soon as the response
//! headers are in. Each probe ends in a typed [`ProbeOutcome`]; a dead URL is
//! an ordinary value, never an error. Probes are issued in batches through a
//! [`ProbeBackend`]; the production backend drives one curl multi handle
//! (see `multi`).

mod classify;
mod handler;
mod multi;

use anyhow::Result;
use std::fmt;
use std::time::Duration;

pub use classify::classify_curl_error;
pub use handler::{parse_content_type, ProbeHandler};
pub use multi::CurlProber;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Browser-like user agent; the CDN answers bare clients less reliably.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Referer sent with every probe.
pub const DEFAULT_REFERER: &str = "https://www.pinterest.com/";

/// Issues one batch of probes and waits for all of them.
///
/// Implementations must return exactly one outcome per URL, in the order of
/// `urls`, and must not return before every probe of the batch has finished.
/// Individual URL failures are outcomes; `Err` is reserved for failures of the
/// backend itself.
pub trait ProbeBackend {
    fn probe_batch(&mut self, urls: &[&str]) -> Result<Vec<ProbeOutcome>>;
}

/// Request method of a probe stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeMethod {
    Head,
    Get,
}

/// Settings applied to every probe request.
#[derive(Debug, Clone)]
pub struct ProbeOptions {
    /// Total time limit per request (connect included).
    pub timeout: Duration,
    pub user_agent: String,
    pub referer: String,
}

impl Default for ProbeOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            referer: DEFAULT_REFERER.to_string(),
        }
    }
}

/// Category of a transport-level failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportKind {
    Timeout,
    /// Refused, reset, TLS handshake or send/receive failure.
    Connection,
    /// Host (or proxy) name did not resolve.
    Dns,
    /// Garbled, empty or truncated response, or an unusable URL.
    Malformed,
    Other,
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TransportKind::Timeout => "timeout",
            TransportKind::Connection => "connection",
            TransportKind::Dns => "dns",
            TransportKind::Malformed => "malformed",
            TransportKind::Other => "other",
        };
        f.write_str(s)
    }
}

/// Why a URL is considered dead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeFailure {
    /// Final response status was 400 or above.
    HttpStatus(u32),
    /// Response was not an error but did not declare an image content type.
    NotImage {
        status: u32,
        content_type: Option<String>,
    },
    /// The request never produced a usable response.
    Transport { kind: TransportKind, message: String },
}

impl ProbeFailure {
    /// Short category label for diagnostics.
    pub fn category(&self) -> String {
        match self {
            ProbeFailure::HttpStatus(code) => format!("http {code}"),
            ProbeFailure::NotImage { .. } => "not an image".to_string(),
            ProbeFailure::Transport { kind, .. } => format!("transport/{kind}"),
        }
    }
}

impl fmt::Display for ProbeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeFailure::HttpStatus(code) => write!(f, "HTTP {code}"),
            ProbeFailure::NotImage {
                status,
                content_type,
            } => write!(
                f,
                "HTTP {status} with content type {}",
                content_type.as_deref().unwrap_or("<none>")
            ),
            ProbeFailure::Transport { kind, message } => write!(f, "{kind}: {message}"),
        }
    }
}

/// Result of probing one URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Live {
        status: u32,
        content_type: String,
    },
    Dead(ProbeFailure),
}

impl ProbeOutcome {
    pub fn is_live(&self) -> bool {
        matches!(self, ProbeOutcome::Live { .. })
    }

    /// True when a HEAD answered but was inconclusive, so a GET should
    /// decide. Transport failures are final.
    pub fn needs_full_fetch(&self) -> bool {
        matches!(
            self,
            ProbeOutcome::Dead(ProbeFailure::HttpStatus(_) | ProbeFailure::NotImage { .. })
        )
    }

    pub fn transport(kind: TransportKind, message: impl Into<String>) -> Self {
        ProbeOutcome::Dead(ProbeFailure::Transport {
            kind,
            message: message.into(),
        })
    }
}

/// Applies the success rule to a finished response: status below 400 and a
/// content type mentioning `image`.
pub fn judge_response(status: u32, content_type: Option<&str>) -> ProbeOutcome {
    if status >= 400 {
        return ProbeOutcome::Dead(ProbeFailure::HttpStatus(status));
    }
    match content_type {
        Some(ct) if ct.to_ascii_lowercase().contains("image") => ProbeOutcome::Live {
            status,
            content_type: ct.to_string(),
        },
        _ => ProbeOutcome::Dead(ProbeFailure::NotImage {
            status,
            content_type: content_type.map(str::to_string),
        }),
    }
}
