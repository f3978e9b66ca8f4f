use crate::{session::RequesterId, states::AppState};
use axum::{
    extract::{ConnectInfo, FromRequestParts},
    http::{HeaderMap, request::Parts},
};
use std::{convert::Infallible, net::SocketAddr};

/// Decides who a request belongs to, as far as the access gate cares.
pub trait RequesterIdentity: Send + Sync {
    fn identify(&self, peer: Option<SocketAddr>, headers: &HeaderMap) -> Option<RequesterId>;
}

/// Peer IP address. The port is ignored so that parallel connections from
/// one browser share a session.
#[derive(Debug, Default, Clone, Copy)]
pub struct PeerAddress;

impl RequesterIdentity for PeerAddress {
    fn identify(&self, peer: Option<SocketAddr>, _headers: &HeaderMap) -> Option<RequesterId> {
        peer.map(|addr| RequesterId::new(addr.ip().to_string()))
    }
}

/// First hop of `X-Forwarded-For`, falling back to the peer IP.
/// Only sensible behind a reverse proxy that sets the header.
#[derive(Debug, Default, Clone, Copy)]
pub struct ForwardedFor;

impl RequesterIdentity for ForwardedFor {
    fn identify(&self, peer: Option<SocketAddr>, headers: &HeaderMap) -> Option<RequesterId> {
        let forwarded = headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty());

        match forwarded {
            Some(client) => Some(RequesterId::new(client)),
            None => PeerAddress.identify(peer, headers),
        }
    }
}

/// Extractor resolving the requester through the configured identity strategy.
/// `None` when nothing usable is available.
pub struct Requester(pub Option<RequesterId>);

impl Requester {
    pub fn id(&self) -> Option<&RequesterId> {
        self.0.as_ref()
    }
}

impl FromRequestParts<AppState> for Requester {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);

        Ok(Requester(state.identity.identify(peer, &parts.headers)))
    }
}
