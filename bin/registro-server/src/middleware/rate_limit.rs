//! Creation throttling in front of `POST /registros`.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{ConnectInfo, Request, State},
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::ServerError;
use crate::state::AppState;

pub const RATELIMIT_LIMIT: HeaderName = HeaderName::from_static("ratelimit-limit");
pub const RATELIMIT_REMAINING: HeaderName = HeaderName::from_static("ratelimit-remaining");
const X_FORWARDED_FOR: &str = "x-forwarded-for";

/// Count the request against the caller's window before the body is read,
/// so requests that later fail validation still count.
pub async fn rate_limit_middleware(
    State(state): State<Arc<AppState>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let key = client_key(&request, state.config.trust_proxy);

    match state.registry.admit(&key) {
        Ok(remaining) => {
            let mut response = next.run(request).await;
            let headers = response.headers_mut();
            headers.insert(
                RATELIMIT_LIMIT,
                HeaderValue::from(state.registry.limiter().limit()),
            );
            headers.insert(RATELIMIT_REMAINING, HeaderValue::from(remaining));
            response
        }
        Err(e) => ServerError::from(e).into_response(),
    }
}

/// Identity the limiter keys on: the peer address, or the first
/// `X-Forwarded-For` hop when the server sits behind a trusted proxy.
pub fn client_key(request: &Request<Body>, trust_proxy: bool) -> String {
    if trust_proxy {
        let forwarded = request
            .headers()
            .get(X_FORWARDED_FOR)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty());
        if let Some(ip) = forwarded {
            return ip.to_owned();
        }
    }
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_owned())
}

#[cfg(test)]
mod test {
    use super::*;

    fn request(peer: Option<&str>, forwarded: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri("/registros");
        if let Some(f) = forwarded {
            builder = builder.header(X_FORWARDED_FOR, f);
        }
        let mut req = builder.body(Body::empty()).unwrap();
        if let Some(p) = peer {
            req.extensions_mut()
                .insert(ConnectInfo(p.parse::<SocketAddr>().unwrap()));
        }
        req
    }

    #[test]
    fn keys_on_peer_ip_without_port() {
        let req = request(Some("192.0.2.7:5123"), Some("203.0.113.1"));
        assert_eq!(client_key(&req, false), "192.0.2.7");
    }

    #[test]
    fn trusted_proxy_uses_first_forwarded_hop() {
        let req = request(Some("10.0.0.1:80"), Some(" 203.0.113.1 , 10.0.0.1"));
        assert_eq!(client_key(&req, true), "203.0.113.1");
        let req = request(Some("10.0.0.1:80"), None);
        assert_eq!(client_key(&req, true), "10.0.0.1");
    }

    #[test]
    fn missing_peer_falls_back_to_unknown() {
        assert_eq!(client_key(&request(None, None), false), "unknown");
    }
}
