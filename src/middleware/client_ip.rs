//! # 클라이언트 IP 추출기
//!
//! `into_make_service_with_connect_info::<SocketAddr>()`로 서버를 띄우면
//! 요청 확장(extensions)에 `ConnectInfo<SocketAddr>`가 들어갑니다.
//! 이 추출기는 그 값을 읽어 세션의 `created_by`와 속도 제한 키로 씁니다.
//!
//! 연결 정보가 없으면(테스트의 `oneshot` 등) 실패하지 않고 `None`을 담습니다.

use std::convert::Infallible;
use std::net::{IpAddr, SocketAddr};

use axum::{
    extract::{ConnectInfo, FromRequestParts},
    http::{request::Parts, Extensions},
};

/// 연결 정보가 없을 때 `created_by`에 기록하는 값
pub const UNKNOWN_CLIENT: &str = "system";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientIp(pub Option<IpAddr>);

impl ClientIp {
    pub fn from_extensions(extensions: &Extensions) -> Self {
        Self(
            extensions
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip()),
        )
    }

    /// 세션 문서에 남길 생성자 표기
    pub fn label(&self) -> String {
        self.0
            .map(|ip| ip.to_string())
            .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
    }
}

impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_extensions(&parts.extensions))
    }
}
