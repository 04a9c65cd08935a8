//! Client IP resolution
//!
//! Order: `CF-Connecting-IP`, `X-Real-IP`, first `X-Forwarded-For` entry, connection
//! address, then `"unknown"`. Header values count only if they parse as an IP address.
//! Headers are taken at face value; the service is expected to sit behind a proxy that
//! overwrites them.

use axum::{
    extract::{ConnectInfo, FromRequestParts},
    http::{request::Parts, HeaderMap},
};
use std::convert::Infallible;
use std::net::{IpAddr, SocketAddr};

pub const UNKNOWN_IP: &str = "unknown";

/// Resolved client IP of the current request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIp(pub String);

impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let socket_addr = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);

        Ok(ClientIp(resolve_client_ip(&parts.headers, socket_addr.as_ref())))
    }
}

pub fn resolve_client_ip(headers: &HeaderMap, socket_addr: Option<&SocketAddr>) -> String {
    let candidates = [
        header_str(headers, "cf-connecting-ip"),
        header_str(headers, "x-real-ip"),
        header_str(headers, "x-forwarded-for").and_then(|v| v.split(',').next()),
    ];

    for candidate in candidates.into_iter().flatten() {
        if let Some(ip) = parse_ip(candidate) {
            return ip.to_string();
        }
    }

    socket_addr
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_IP.to_string())
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn parse_ip(value: &str) -> Option<IpAddr> {
    value.trim().parse::<IpAddr>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&'static str, &str)]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for (name, value) in pairs {
            headers.insert(*name, HeaderValue::from_str(value).unwrap());
        }
        headers
    }

    #[test]
    fn test_cf_connecting_ip_wins() {
        let h = headers(&[
            ("cf-connecting-ip", "203.0.113.7"),
            ("x-real-ip", "198.51.100.2"),
            ("x-forwarded-for", "192.0.2.1, 10.0.0.1"),
        ]);
        assert_eq!(resolve_client_ip(&h, None), "203.0.113.7");
    }

    #[test]
    fn test_x_real_ip_before_forwarded_for() {
        let h = headers(&[
            ("x-real-ip", "198.51.100.2"),
            ("x-forwarded-for", "192.0.2.1"),
        ]);
        assert_eq!(resolve_client_ip(&h, None), "198.51.100.2");
    }

    #[test]
    fn test_first_forwarded_for_entry() {
        let h = headers(&[("x-forwarded-for", " 192.0.2.1 , 10.0.0.1, 10.0.0.2")]);
        assert_eq!(resolve_client_ip(&h, None), "192.0.2.1");
    }

    #[test]
    fn test_invalid_header_falls_through() {
        let h = headers(&[
            ("cf-connecting-ip", "not-an-ip"),
            ("x-forwarded-for", "2001:db8::1"),
        ]);
        assert_eq!(resolve_client_ip(&h, None), "2001:db8::1");
    }

    #[test]
    fn test_socket_fallback_and_unknown() {
        let socket = SocketAddr::from(([127, 0, 0, 1], 5000));
        assert_eq!(resolve_client_ip(&HeaderMap::new(), Some(&socket)), "127.0.0.1");
        assert_eq!(resolve_client_ip(&HeaderMap::new(), None), "unknown");
    }

    #[tokio::test]
    async fn test_extractor_reads_connect_info() {
        let (mut parts, _) = axum::http::Request::builder()
            .uri("/")
            .body(())
            .unwrap()
            .into_parts();
        parts
            .extensions
            .insert(ConnectInfo(SocketAddr::from(([10, 1, 2, 3], 4444))));

        let ClientIp(ip) = ClientIp::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(ip, "10.1.2.3");
    }
}
