//! # 미들웨어 모듈
//!
//! - `client_ip`: 요청을 보낸 클라이언트 IP 추출기
//! - `rate_limit`: 클라이언트 IP별 요청 속도 제한

pub mod client_ip;
pub mod rate_limit;

pub use client_ip::ClientIp;
pub use rate_limit::{rate_limit, RateLimiter};
