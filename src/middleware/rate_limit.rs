//! Per-client rate limiting middleware.
//!
//! Clients are keyed by remote IP address. Two quotas apply at once, one per
//! second and one per minute; a request must fit both.

use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    num::NonZeroU32,
};

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};

use crate::{error::AppError, state::AppState};

/// Keyed limiters shared by every request.
pub struct RateLimits {
    per_second: DefaultKeyedRateLimiter<IpAddr>,
    per_minute: DefaultKeyedRateLimiter<IpAddr>,
}

impl RateLimits {
    /// Build limiters allowing `per_second` and `per_minute` requests per client.
    ///
    /// A zero quota is raised to one.
    pub fn new(per_second: u32, per_minute: u32) -> Self {
        let per_second = NonZeroU32::new(per_second).unwrap_or(NonZeroU32::MIN);
        let per_minute = NonZeroU32::new(per_minute).unwrap_or(NonZeroU32::MIN);

        Self {
            per_second: RateLimiter::keyed(Quota::per_second(per_second)),
            per_minute: RateLimiter::keyed(Quota::per_minute(per_minute)),
        }
    }

    /// Take one request from `client`'s quotas.
    pub fn check(&self, client: IpAddr) -> Result<(), AppError> {
        if self.per_second.check_key(&client).is_err() || self.per_minute.check_key(&client).is_err() {
            tracing::warn!(client = %client, "Rate limit exceeded");
            return Err(AppError::TooManyRequests);
        }
        Ok(())
    }

    /// Drop state for clients whose quotas have fully replenished.
    pub fn retain_recent(&self) {
        self.per_second.retain_recent();
        self.per_minute.retain_recent();
    }

    pub fn tracked_clients(&self) -> usize {
        self.per_minute.len()
    }
}

/// Reject requests that exceed the client's quota with HTTP 429.
///
/// Requests without connection info (e.g. driven in-process) share the
/// unspecified address as their key.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let client = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));

    state.rate_limits.check(client)?;

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLIENT: IpAddr = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1));
    const OTHER: IpAddr = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 2));

    #[test]
    fn burst_beyond_per_second_quota_is_rejected() {
        let limits = RateLimits::new(5, 100);

        for _ in 0..5 {
            assert!(limits.check(CLIENT).is_ok());
        }
        assert!(matches!(limits.check(CLIENT), Err(AppError::TooManyRequests)));
    }

    #[test]
    fn per_minute_quota_applies_independently() {
        let limits = RateLimits::new(100, 3);

        for _ in 0..3 {
            assert!(limits.check(CLIENT).is_ok());
        }
        assert!(limits.check(CLIENT).is_err());
    }

    #[test]
    fn clients_do_not_share_quotas() {
        let limits = RateLimits::new(1, 100);

        assert!(limits.check(CLIENT).is_ok());
        assert!(limits.check(CLIENT).is_err());
        assert!(limits.check(OTHER).is_ok());
        assert_eq!(limits.tracked_clients(), 2);
    }

    #[test]
    fn zero_quota_still_admits_one_request() {
        let limits = RateLimits::new(0, 0);

        assert!(limits.check(CLIENT).is_ok());
        assert!(limits.check(CLIENT).is_err());
    }
}
