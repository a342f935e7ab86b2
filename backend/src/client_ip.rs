//! Best-effort client address lookup.

use std::net::{IpAddr, SocketAddr};

use axum::http::HeaderMap;

/// Resolve the caller's address.
///
/// Tries `X-Forwarded-For` (first hop), then `X-Real-IP`, then the socket
/// peer. Returns `None` when nothing usable is found.
pub fn lookup(headers: &HeaderMap, peer: Option<SocketAddr>) -> Option<String> {
    if let Some(ip) = from_forwarded_for(headers) {
        return Some(ip.to_string());
    }

    if let Some(ip) = header_ip(headers, "x-real-ip") {
        return Some(ip.to_string());
    }

    peer.map(|addr| addr.ip().to_string())
}

fn from_forwarded_for(headers: &HeaderMap) -> Option<IpAddr> {
    let value = headers.get("x-forwarded-for")?.to_str().ok()?;
    value.split(',').next()?.trim().parse().ok()
}

fn header_ip(headers: &HeaderMap, name: &str) -> Option<IpAddr> {
    headers.get(name)?.to_str().ok()?.trim().parse().ok()
}
