//! Client IP extraction from HTTP headers
//!
//! Precedence: CF-Connecting-IP, then X-Forwarded-For, then the socket peer
//! address with the port stripped. Header values are trusted as-is, which is
//! only sound behind a reverse proxy (Cloudflare or similar) that overwrites
//! them; there is no spoofing defense here by intent.

use axum::http::HeaderMap;
use std::net::SocketAddr;

/// Pick the first non-empty signal from the ordered list of sources.
pub fn extract_client_ip(headers: &HeaderMap, remote_addr: SocketAddr) -> String {
    if let Some(ip) = header_value(headers, "cf-connecting-ip") {
        return ip;
    }

    // X-Forwarded-For may carry a proxy chain; the leftmost entry is the
    // original client.
    if let Some(value) = header_value(headers, "x-forwarded-for") {
        if let Some(first) = value.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }

    remote_addr.ip().to_string()
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn remote() -> SocketAddr {
        "3.3.3.3:8080".parse().unwrap()
    }

    #[test]
    fn cloudflare_header_wins() {
        let mut headers = HeaderMap::new();
        headers.insert("cf-connecting-ip", HeaderValue::from_static("1.1.1.1"));
        headers.insert("x-forwarded-for", HeaderValue::from_static("2.2.2.2"));

        assert_eq!(extract_client_ip(&headers, remote()), "1.1.1.1");
    }

    #[test]
    fn forwarded_for_when_no_cloudflare() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("2.2.2.2"));

        assert_eq!(extract_client_ip(&headers, remote()), "2.2.2.2");
    }

    #[test]
    fn forwarded_for_takes_first_of_chain() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("2.2.2.2, 10.0.0.1"),
        );

        assert_eq!(extract_client_ip(&headers, remote()), "2.2.2.2");
    }

    #[test]
    fn falls_back_to_peer_address_without_port() {
        let headers = HeaderMap::new();
        assert_eq!(extract_client_ip(&headers, remote()), "3.3.3.3");
    }

    #[test]
    fn empty_headers_are_skipped() {
        let mut headers = HeaderMap::new();
        headers.insert("cf-connecting-ip", HeaderValue::from_static(""));
        headers.insert("x-forwarded-for", HeaderValue::from_static(""));

        assert_eq!(extract_client_ip(&headers, remote()), "3.3.3.3");
    }

    #[test]
    fn ipv6_peer_address() {
        let headers = HeaderMap::new();
        let remote: SocketAddr = "[2001:db8::1]:443".parse().unwrap();
        assert_eq!(extract_client_ip(&headers, remote), "2001:db8::1");
    }
}
