//! # yt-notion 웹 서버 진입점
//!
//! 1. 환경변수(.env) 로딩
//! 2. 설정 로딩 (필수 API 키가 없으면 여기서 종료)
//! 3. 로깅(tracing) 초기화: 표준 출력 + logs/app.log, logs/error.log
//! 4. 외부 서비스 클라이언트 생성
//! 5. 세션 저장 디렉토리 생성
//! 6. 라우터 조립과 HTTP 서버 시작

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use yt_notion::{
    config::Config,
    logging,
    middleware::RateLimiter,
    routes::{self, AppState},
    services::{GeminiClient, NotionClient, YouTubeClient},
    store::SessionStore,
};

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1단계: 환경변수 로딩 ──
    // .env 파일이 없어도 에러 없이 넘어갑니다.
    dotenvy::dotenv().ok();

    // ── 2단계: 설정 로딩 ──
    let config = Arc::new(Config::from_env()?);

    // ── 3단계: 로깅 초기화 ──
    // 가드가 드롭되면 파일 로그가 멈추므로 main 끝까지 유지합니다.
    let _log_guards = logging::init(config.log_dir.as_deref().map(Path::new))?;
    tracing::info!("Starting yt-notion server on {}:{}", config.host, config.port);

    // ── 4단계: 외부 서비스 클라이언트 ──
    // reqwest::Client는 내부적으로 연결 풀을 가지므로 하나를 만들어 모두 공유합니다.
    let http = reqwest::Client::builder()
        .timeout(config.http_timeout())
        .build()?;

    let platform = YouTubeClient::new(http.clone(), &config.youtube_api_key)?;
    let summarizer = GeminiClient::new(
        http.clone(),
        &config.gemini_api_key,
        &config.gemini_model,
        config.gemini_temperature,
    )?;
    let publisher = NotionClient::new(http, &config.notion_api_key, &config.notion_database_id)?;

    // ── 5단계: 세션 저장 디렉토리 ──
    let data_dir = Path::new(&config.data_dir);
    if !data_dir.exists() {
        tokio::fs::create_dir_all(data_dir).await?;
        tracing::info!("Created session directory: {}", config.data_dir);
    }

    let state = AppState {
        sessions: SessionStore::new(&config.data_dir),
        platform: Arc::new(platform),
        summarizer: Arc::new(summarizer),
        publisher: Arc::new(publisher),
        limiter: RateLimiter::per_minute(config.rate_limit_per_minute),
        config: config.clone(),
    };

    // 한도가 회복된 클라이언트 IP 상태를 1분마다 정리합니다.
    state.limiter.spawn_pruner(Duration::from_secs(60));

    // ── 6단계: 라우터와 서버 ──
    let frontend_dist = Path::new(&config.frontend_dist);
    let frontend = if frontend_dist.exists() {
        Some(frontend_dist)
    } else {
        tracing::warn!("Frontend dist directory not found, serving API only");
        None
    };
    let app = routes::router(state, frontend);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    // ConnectInfo: 핸들러와 속도 제한기가 클라이언트 IP를 읽을 수 있게 합니다.
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// SIGINT(Ctrl-C) 또는 SIGTERM을 기다립니다.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl-C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received SIGINT, shutting down"),
        () = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
