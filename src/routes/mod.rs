//! # 라우트 핸들러 모듈
//!
//! HTTP 요청을 처리하는 핸들러 함수들과 라우터 조립 코드를 모아둔 모듈입니다.
//!
//! ## 엔드포인트 목록 (`/api/v1` 아래)
//! | 메서드 | 경로 | 핸들러 | 세션 상태 변화 |
//! |--------|------|--------|----------------|
//! | GET | /health | `health_check` | - |
//! | POST | /collect | `collect` | (새 세션) → collected |
//! | POST | /analyze | `analyze` | → analyzed |
//! | POST | /register | `register` | → registered |
//! | GET | /session/{id} | `get_session` | 읽기 전용 |
//!
//! health를 뺀 네 엔드포인트에는 클라이언트 IP별 속도 제한이 걸립니다.

pub mod analyze;
pub mod collect;
pub mod health;
pub mod register;
pub mod session;

pub use analyze::*;
pub use collect::*;
pub use health::*;
pub use register::*;
pub use session::*;

use std::path::Path;
use std::sync::Arc;

use axum::{
    extract::FromRequest,
    http::{header, HeaderValue, Method, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
    LatencyUnit,
};
use tracing::Level;

use crate::{
    config::Config,
    error::AppError,
    middleware::{rate_limit, RateLimiter},
    services::{Publisher, Summarizer, VideoPlatform},
    store::SessionStore,
};

/// 모든 핸들러가 공유하는 애플리케이션 상태
///
/// 외부 서비스는 서버 시작 시 한 번 만들어 트레이트 객체로 주입합니다.
/// `Arc`라서 요청마다 clone해도 실제 클라이언트는 복제되지 않습니다.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub sessions: SessionStore,
    pub platform: Arc<dyn VideoPlatform>,
    pub summarizer: Arc<dyn Summarizer>,
    pub publisher: Arc<dyn Publisher>,
    pub limiter: RateLimiter,
}

/// JSON 본문 추출기 겸 응답 래퍼
///
/// `axum::Json`과 같지만, 본문 파싱 실패를 `AppError`(E999)로 바꿔
/// 에러 응답도 항상 같은 envelope을 갖게 합니다.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

impl<T: Serialize> IntoResponse for AppJson<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

async fn not_found() -> AppError {
    AppError::Http {
        status: StatusCode::NOT_FOUND,
        message: "Not Found".to_string(),
    }
}

async fn method_not_allowed() -> AppError {
    AppError::Http {
        status: StatusCode::METHOD_NOT_ALLOWED,
        message: "Method Not Allowed".to_string(),
    }
}

/// 설정된 출처(origin)만 허용하는 CORS 레이어
///
/// 헤더 값으로 쓸 수 없는 출처는 건너뜁니다.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION])
        .allow_credentials(true)
}

/// 전체 애플리케이션 라우터를 조립합니다.
///
/// `frontend_dist`가 주어지면 API에 매칭되지 않는 요청은 프론트엔드로 보냅니다.
/// (SPA이므로 찾을 수 없는 파일은 index.html로 돌려보냅니다)
pub fn router(state: AppState, frontend_dist: Option<&Path>) -> Router {
    let limited = Router::new()
        .route("/collect", post(collect))
        .route("/analyze", post(analyze))
        .route("/register", post(register))
        .route("/session/{id}", get(get_session))
        // route_layer: 매칭된 경로에만 적용되므로 404 요청은 한도를 소모하지 않습니다.
        .route_layer(middleware::from_fn_with_state(
            state.limiter.clone(),
            rate_limit,
        ));

    let api_routes = Router::new()
        .route("/health", get(health_check))
        .merge(limited)
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .with_state(state.clone());

    let app = Router::new().nest("/api/v1", api_routes);

    let app = match frontend_dist {
        Some(dist) => {
            tracing::info!("Serving frontend static files from {}", dist.display());
            let serve_dir =
                ServeDir::new(dist).not_found_service(ServeFile::new(dist.join("index.html")));
            app.fallback_service(serve_dir)
        }
        None => app.fallback(not_found),
    };

    app.layer(cors_layer(&state.config.cors_origins)).layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_response(
                DefaultOnResponse::new()
                    .level(Level::INFO)
                    .latency_unit(LatencyUnit::Millis),
            ),
    )
}
