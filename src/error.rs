//! # 에러 처리 모듈
//!
//! 애플리케이션에서 발생할 수 있는 모든 에러 타입을 정의합니다.
//!
//! 이 모듈의 핵심:
//! - `AppError` 열거형(enum): 모든 에러 종류를 하나의 타입으로 통합
//! - `IntoResponse` 구현: 에러를 HTTP 응답과 고정된 에러 코드로 자동 변환
//!
//! 모든 에러 응답은 같은 모양(envelope)을 가집니다:
//! ```text
//! { "status": "error", "message": "...", "error_code": "E001" }
//! ```
//!
//! | 코드 | 의미 | HTTP |
//! |------|------|------|
//! | E001 | 잘못된 YouTube URL | 400 |
//! | E002 | 자막을 가져올 수 없음 | 404 |
//! | E004 | 요청 속도 제한 초과 | 429 |
//! | E006 | 세션 만료 | 410 |
//! | E007 | 세션 파일 없음 / 읽기·쓰기 실패 | 404 / 500 |
//! | E008 | 외부 API 오류 | 502 |
//! | E009 | 동영상을 찾을 수 없음 | 404 |
//! | E010 | 필수 설정(API 키) 누락 | 500 |
//! | E999 | 그 밖의 HTTP 에러 (잘못된 JSON 본문, 없는 경로 등) | 상황별 |

use axum::{
    extract::rejection::JsonRejection,
    http::{header::RETRY_AFTER, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// 애플리케이션에서 발생할 수 있는 모든 에러 종류
///
/// 핸들러에서 `Result<T, AppError>`를 반환하면,
/// Axum이 자동으로 `IntoResponse`를 호출하여 HTTP 응답으로 변환합니다.
#[derive(Debug, Error)]
pub enum AppError {
    /// URL에서 동영상 ID를 추출할 수 없음 (HTTP 400, E001)
    #[error("Invalid YouTube URL.")]
    InvalidUrl,

    /// 자막 트랙이 없거나 가져오지 못함 (HTTP 404, E002)
    /// 수집(collect) 단계 전체의 실패로 취급합니다.
    #[error("Transcript not found or could not be fetched: {0}")]
    TranscriptUnavailable(String),

    /// 클라이언트가 허용된 요청 수를 초과함 (HTTP 429, E004)
    /// 값은 다시 시도할 수 있을 때까지 남은 초(Retry-After 헤더로 전달)
    #[error("レート制限を超えました: retry after {0} seconds")]
    RateLimited(u64),

    /// 세션 만료 시각이 지남 (HTTP 410, E006)
    #[error("Session has expired.")]
    SessionExpired,

    /// 세션 파일이 없음 (HTTP 404, E007)
    #[error("Session ID '{0}' not found.")]
    SessionNotFound(String),

    /// 세션 파일 읽기/쓰기/직렬화 실패 (HTTP 500, E007)
    #[error("Failed to access session data: {0}")]
    Storage(String),

    /// 외부 API(YouTube, Gemini, Notion) 통신 실패 또는 응답 형식 오류 (HTTP 502, E008)
    #[error("An error occurred while communicating with the {service} service: {message}")]
    Upstream {
        service: &'static str,
        message: String,
    },

    /// 동영상 메타데이터 API가 결과를 돌려주지 않음 (HTTP 404, E009)
    #[error("Video not found.")]
    VideoNotFound,

    /// 필수 자격 증명이 비어 있음 (HTTP 500, E010)
    #[error("{0} is not configured.")]
    Misconfigured(&'static str),

    /// 프레임워크 수준의 HTTP 에러: 본문 파싱 실패, 없는 경로 등 (E999)
    #[error("{message}")]
    Http { status: StatusCode, message: String },
}

impl AppError {
    /// 외부 서비스 에러를 만드는 짧은 헬퍼
    pub fn upstream(service: &'static str, message: impl ToString) -> Self {
        AppError::Upstream {
            service,
            message: message.to_string(),
        }
    }

    /// 이 에러가 응답할 HTTP 상태 코드
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidUrl => StatusCode::BAD_REQUEST,
            AppError::TranscriptUnavailable(_) => StatusCode::NOT_FOUND,
            AppError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            AppError::SessionExpired => StatusCode::GONE,
            AppError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Upstream { .. } => StatusCode::BAD_GATEWAY,
            AppError::VideoNotFound => StatusCode::NOT_FOUND,
            AppError::Misconfigured(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Http { status, .. } => *status,
        }
    }

    /// 클라이언트가 분기 처리에 사용하는 고정 에러 코드
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::InvalidUrl => "E001",
            AppError::TranscriptUnavailable(_) => "E002",
            AppError::RateLimited(_) => "E004",
            AppError::SessionExpired => "E006",
            AppError::SessionNotFound(_) | AppError::Storage(_) => "E007",
            AppError::Upstream { .. } => "E008",
            AppError::VideoNotFound => "E009",
            AppError::Misconfigured(_) => "E010",
            AppError::Http { .. } => "E999",
        }
    }
}

// 파일 입출력 에러는 모두 세션 저장소 실패로 취급합니다.
// (파일이 없는 경우는 저장소에서 SessionNotFound로 먼저 걸러냅니다)
impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

// 잘못된 JSON 본문, Content-Type 누락 등은 axum이 알려준 상태 코드를 그대로 씁니다.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Http {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for AppError {
    /// AppError를 HTTP 응답으로 변환합니다.
    ///
    /// 서버 쪽 원인(저장소, 외부 API, 설정)은 로그에 자세히 남기고,
    /// 클라이언트에는 어떤 단계가 실패했는지 알 수 있는 메시지를 돌려줍니다.
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();

        match &self {
            AppError::Storage(_) | AppError::Misconfigured(_) => {
                tracing::error!(error_code = code, "{}", self)
            }
            AppError::Upstream { service, message } => {
                tracing::error!(error_code = code, service = *service, "Upstream error: {}", message)
            }
            _ => tracing::warn!(error_code = code, status = status.as_u16(), "{}", self),
        }

        let body = Json(json!({
            "status": "error",
            "message": self.to_string(),
            "error_code": code,
        }));

        let mut response = (status, body).into_response();

        // 429 응답에는 언제 다시 시도할 수 있는지 알려주는 헤더를 붙입니다.
        if let AppError::RateLimited(retry_after) = self {
            if let Ok(value) = HeaderValue::from_str(&retry_after.to_string()) {
                response.headers_mut().insert(RETRY_AFTER, value);
            }
        }

        response
    }
}
