//! Real client IP resolution.
//!
//! Trusts `X-Forwarded-For` (first hop) then `X-Real-IP`, falling back to
//! the socket peer address. The resolved IP is attached as a request
//! extension for access logging and rate limiting.

use std::net::{IpAddr, SocketAddr};

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{HeaderMap, Request},
    middleware::Next,
    response::Response,
};

/// Resolved client IP, stored as a request extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientIp(pub IpAddr);

pub async fn resolve_client_ip(
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let ip = from_headers(request.headers()).unwrap_or_else(|| peer.ip());
    request.extensions_mut().insert(ClientIp(ip));
    next.run(request).await
}

fn from_headers(headers: &HeaderMap) -> Option<IpAddr> {
    if let Some(forwarded) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        if let Some(first) = forwarded.split(',').next() {
            if let Ok(ip) = first.trim().parse() {
                return Some(ip);
            }
        }
    }

    headers
        .get("x-real-ip")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}
