//! # 요청 속도 제한
//!
//! 클라이언트 IP마다 분당 요청 수를 GCRA(토큰 버킷) 방식으로 제한합니다.
//! 한도를 넘은 요청은 핸들러까지 가지 않고 바로 429(E004)와 `Retry-After`를 받습니다.
//!
//! 연결 정보가 없는 요청은 모두 `0.0.0.0` 하나의 버킷을 공유합니다.
//!
//! IP별 상태는 한 번 본 주소마다 쌓이므로 `spawn_pruner`로 주기적으로
//! 한도가 다 회복된 주소를 지웁니다.

use std::net::{IpAddr, Ipv4Addr};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use governor::{
    clock::{Clock, DefaultClock},
    DefaultKeyedRateLimiter, Quota,
};

use super::ClientIp;
use crate::error::AppError;

/// IP별 속도 제한기. 복제해도 같은 상태를 공유합니다.
#[derive(Clone)]
pub struct RateLimiter {
    limiter: Arc<DefaultKeyedRateLimiter<IpAddr>>,
    clock: DefaultClock,
}

impl RateLimiter {
    pub fn per_minute(requests: NonZeroU32) -> Self {
        Self::with_quota(Quota::per_minute(requests))
    }

    pub fn with_quota(quota: Quota) -> Self {
        Self {
            limiter: Arc::new(governor::RateLimiter::keyed(quota)),
            clock: DefaultClock::default(),
        }
    }

    /// 현재 상태를 들고 있는 클라이언트 수
    pub fn tracked_clients(&self) -> usize {
        self.limiter.len()
    }

    /// 한도가 모두 회복된 클라이언트의 상태를 지웁니다.
    ///
    /// 지워진 클라이언트는 다음 요청 때 새 버킷으로 시작하므로 제한 결과는 같습니다.
    pub fn prune(&self) {
        let before = self.limiter.len();
        self.limiter.retain_recent();
        self.limiter.shrink_to_fit();
        let after = self.limiter.len();
        if before != after {
            tracing::debug!(before, after, "Pruned rate limiter state");
        }
    }

    /// `every`마다 `prune`을 호출하는 백그라운드 작업을 시작합니다.
    pub fn spawn_pruner(&self, every: Duration) -> tokio::task::JoinHandle<()> {
        let limiter = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            // 첫 tick은 바로 끝나므로 건너뜁니다.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                limiter.prune();
            }
        })
    }

    /// 허용되면 `Ok(())`, 아니면 다시 시도할 수 있을 때까지의 초(최소 1)
    pub fn check(&self, client: IpAddr) -> Result<(), u64> {
        self.limiter.check_key(&client).map_err(|not_until| {
            let wait = not_until.wait_time_from(self.clock.now());
            // 소수점 이하는 올림해서 너무 이른 재시도를 막습니다.
            let secs = wait.as_secs() + u64::from(wait.subsec_nanos() > 0);
            secs.max(1)
        })
    }
}

/// `middleware::from_fn_with_state`에 쓰는 속도 제한 미들웨어
pub async fn rate_limit(
    State(limiter): State<RateLimiter>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let client = ClientIp::from_extensions(request.extensions())
        .0
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));

    if let Err(retry_after) = limiter.check(client) {
        tracing::warn!(client = %client, retry_after, "Rate limit exceeded");
        return Err(AppError::RateLimited(retry_after));
    }

    Ok(next.run(request).await)
}
