use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use axum::extract::ConnectInfo;
use axum::http::Request;
use governor::middleware::NoOpMiddleware;
use tower_governor::governor::{GovernorConfig, GovernorConfigBuilder};
use tower_governor::{GovernorError, key_extractor::KeyExtractor};

use crate::config::Config;
use crate::error::{AppError, AppResult};

/// Client IP for rate limiting.
/// Order: first X-Forwarded-For entry, X-Real-IP, peer address, then loopback,
/// so requests without an identifiable client share one bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientIpKeyExtractor;

fn header_ip<T>(req: &Request<T>, name: &str) -> Option<IpAddr> {
    let value = req.headers().get(name)?.to_str().ok()?;
    value.split(',').next()?.trim().parse().ok()
}

impl KeyExtractor for ClientIpKeyExtractor {
    type Key = IpAddr;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        let forwarded = header_ip(req, "x-forwarded-for").or_else(|| header_ip(req, "x-real-ip"));
        if let Some(ip) = forwarded {
            return Ok(ip);
        }

        if let Some(ConnectInfo(peer)) = req.extensions().get::<ConnectInfo<SocketAddr>>() {
            return Ok(peer.ip());
        }

        Ok(IpAddr::V4(Ipv4Addr::LOCALHOST))
    }
}

/// Limiter for the routes that forward commands to the rig.
///
/// # Errors
///
/// Returns `AppError::Internal` if the configured rate or burst is zero.
pub fn command_limiter(
    config: &Config,
) -> AppResult<Arc<GovernorConfig<ClientIpKeyExtractor, NoOpMiddleware>>> {
    GovernorConfigBuilder::default()
        .key_extractor(ClientIpKeyExtractor)
        .per_second(config.rate_limit_commands_per_second)
        .burst_size(config.rate_limit_commands_burst)
        .finish()
        .map(Arc::new)
        .ok_or_else(|| AppError::Internal("invalid command rate limit".to_string()))
}
