use crate::errors::FailureCause;
use axum::{
    extract::{ConnectInfo, Request},
    middleware::Next,
    response::Response,
};
use std::net::SocketAddr;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

pub fn init() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();
}

/// One line per request: method, path, status, peer, and on failure the
/// condition the handler reported.
pub async fn log_requests(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_else(|| "unknown".to_string());

    let response = next.run(req).await;

    let status = response.status();
    match response.extensions().get::<FailureCause>() {
        Some(FailureCause(cause)) if status.is_server_error() => {
            error!("{} {} {} ({}): {}", method, path, status.as_u16(), peer, cause)
        }
        Some(FailureCause(cause)) => {
            warn!("{} {} {} ({}): {}", method, path, status.as_u16(), peer, cause)
        }
        None => info!("{} {} {} ({})", method, path, status.as_u16(), peer),
    }

    response
}
