//! Tenant routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (Host header, path)
//!     → host.rs (Host header → tenant label)
//!     → site::lookup (label → website → page)
//! ```
//!
//! # Design Decisions
//! - Resolution is a pure function of the Host header and config
//! - Resolver is rebuilt on config reload, never mutated
//! - Deterministic: same input always resolves to the same tenant

pub mod host;

pub use host::HostResolver;

use axum::http::{header, HeaderMap, Uri};

/// Host the client addressed: the `Host` header, or the URI authority for
/// HTTP/2 requests that only carry `:authority`.
pub fn request_host(headers: &HeaderMap, uri: &Uri) -> String {
    headers
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .map(str::to_string)
        .or_else(|| uri.authority().map(|a| a.to_string()))
        .unwrap_or_default()
}
