//! Ingress filter.
//! Rejects requests whose source address is not allow-listed, before the
//! body is read.

use std::collections::HashSet;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::http::response::RelayError;

/// Fixed set of permitted source addresses.
#[derive(Debug, Clone)]
pub struct AllowList {
    addresses: Arc<HashSet<String>>,
}

impl AllowList {
    pub fn new<I, S>(addresses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            addresses: Arc::new(addresses.into_iter().map(Into::into).collect()),
        }
    }

    /// Exact string match on the rendered address. An IPv4-mapped IPv6
    /// peer also matches on its plain IPv4 rendering, and a plain IPv4 peer
    /// also matches on its `::ffff:` rendering.
    pub fn permits(&self, ip: IpAddr) -> bool {
        if self.addresses.contains(&ip.to_string()) {
            return true;
        }

        let alternate = match ip {
            IpAddr::V6(v6) => v6.to_ipv4_mapped().map(|v4| v4.to_string()),
            IpAddr::V4(v4) => Some(format!("::ffff:{}", v4)),
        };
        alternate.is_some_and(|addr| self.addresses.contains(&addr))
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }
}

/// Middleware: 403 for any source not on the allow-list.
pub async fn ingress_filter(
    State(allow_list): State<AllowList>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    req: Request<Body>,
    next: Next,
) -> Response {
    if !allow_list.permits(peer.ip()) {
        return RelayError::Forbidden(peer.ip().to_string()).into_response();
    }

    next.run(req).await
}
