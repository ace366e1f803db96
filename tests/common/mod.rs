#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, Method, Request, StatusCode};
use axum::Router;
use chrono::NaiveDate;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use yt_notion::config::Config;
use yt_notion::error::AppError;
use yt_notion::middleware::RateLimiter;
use yt_notion::models::{AnalysisResult, RegisterModifications, VideoMetadata};
use yt_notion::routes::{self, AppState};
use yt_notion::services::{Publisher, Summarizer, Transcript, VideoPlatform};
use yt_notion::store::SessionStore;

pub const VIDEO_ID: &str = "dQw4w9WgXcQ";
pub const NOTION_URL: &str = "https://www.notion.so/test-page-123";

/// 더미 API 키와 주어진 덮어쓰기 값으로 테스트용 `Config`를 만듭니다.
pub fn test_config(overrides: &[(&str, &str)]) -> Config {
    let mut vars: HashMap<String, String> = [
        ("YOUTUBE_API_KEY", "test-youtube-key"),
        ("GEMINI_API_KEY", "test-gemini-key"),
        ("NOTION_API_KEY", "test-notion-key"),
        ("NOTION_DATABASE_ID", "test-database"),
        ("RATE_LIMIT_PER_MINUTE", "1000"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();

    for (k, v) in overrides {
        vars.insert(k.to_string(), v.to_string());
    }

    Config::from_lookup(|key| vars.get(key).cloned()).unwrap()
}

pub fn sample_video() -> VideoMetadata {
    VideoMetadata {
        video_id: VIDEO_ID.to_string(),
        title: "Test Video Title".to_string(),
        channel_name: "Test Channel".to_string(),
        published_at: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
        duration: "PT5M30S".to_string(),
        duration_seconds: 330,
        view_count: Some(12345),
        url: VideoMetadata::watch_url(VIDEO_ID),
        thumbnail_url: Some("http://example.com/thumb.jpg".to_string()),
    }
}

pub fn sample_analysis() -> AnalysisResult {
    AnalysisResult {
        summary: "## 要約\nこれはテスト用の要約です。".to_string(),
        suggested_titles: "テスト動画のタイトル".to_string(),
        categories: vec!["教育".to_string(), "科学".to_string()],
        emotions: "啓発".to_string(),
    }
}

pub fn sample_modifications() -> RegisterModifications {
    RegisterModifications {
        title: "編集済みタイトル".to_string(),
        summary: "編集済みの要約".to_string(),
        categories: vec!["ドキュメンタリー".to_string()],
        emotions: "考察".to_string(),
    }
}

// ---------------------------------------------------------------------------
// 가짜 외부 서비스
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakePlatform {
    pub video_missing: bool,
    pub transcript_missing: bool,
}

#[async_trait]
impl VideoPlatform for FakePlatform {
    async fn video_metadata(&self, video_id: &str) -> Result<VideoMetadata, AppError> {
        if self.video_missing {
            return Err(AppError::VideoNotFound);
        }
        let mut video = sample_video();
        video.video_id = video_id.to_string();
        video.url = VideoMetadata::watch_url(video_id);
        Ok(video)
    }

    async fn transcript(&self, _video_id: &str, languages: &[String]) -> Result<Transcript, AppError> {
        if self.transcript_missing {
            return Err(AppError::TranscriptUnavailable(
                "video has no caption tracks".to_string(),
            ));
        }
        Ok(Transcript {
            text: "テスト用字幕A テスト用字幕B".to_string(),
            language: languages.first().cloned().unwrap_or_default(),
        })
    }
}

#[derive(Default)]
pub struct FakeSummarizer {
    pub fail: bool,
}

#[async_trait]
impl Summarizer for FakeSummarizer {
    async fn summarize(&self, _transcript: &str) -> Result<AnalysisResult, AppError> {
        if self.fail {
            return Err(AppError::upstream("Gemini", "invalid analysis JSON"));
        }
        Ok(sample_analysis())
    }
}

/// 등록 호출을 모두 기록해 테스트에서 보낸 내용을 확인합니다.
#[derive(Default)]
pub struct FakePublisher {
    pub fail: bool,
    pub published: Mutex<Vec<(RegisterModifications, VideoMetadata)>>,
}

#[async_trait]
impl Publisher for FakePublisher {
    async fn publish(
        &self,
        modifications: &RegisterModifications,
        video: &VideoMetadata,
    ) -> Result<String, AppError> {
        if self.fail {
            return Err(AppError::upstream("Notion", "Notion API returned 400 Bad Request"));
        }
        self.published
            .lock()
            .unwrap()
            .push((modifications.clone(), video.clone()));
        Ok(NOTION_URL.to_string())
    }
}

// ---------------------------------------------------------------------------
// 테스트 애플리케이션
// ---------------------------------------------------------------------------

pub struct TestApp {
    pub router: Router,
    pub store: SessionStore,
    pub publisher: Arc<FakePublisher>,
    // 앱이 살아 있는 동안 세션 디렉토리를 유지합니다.
    _dir: TempDir,
}

pub struct TestAppBuilder {
    platform: FakePlatform,
    summarizer: FakeSummarizer,
    publisher: FakePublisher,
    overrides: Vec<(&'static str, &'static str)>,
}

impl TestAppBuilder {
    pub fn platform(mut self, platform: FakePlatform) -> Self {
        self.platform = platform;
        self
    }

    pub fn summarizer(mut self, summarizer: FakeSummarizer) -> Self {
        self.summarizer = summarizer;
        self
    }

    pub fn publisher(mut self, publisher: FakePublisher) -> Self {
        self.publisher = publisher;
        self
    }

    pub fn config(mut self, key: &'static str, value: &'static str) -> Self {
        self.overrides.push((key, value));
        self
    }

    pub fn build(self) -> TestApp {
        let dir = tempfile::tempdir().unwrap();
        let config = Arc::new(test_config(&self.overrides));
        let store = SessionStore::new(dir.path().join("sessions"));
        let publisher = Arc::new(self.publisher);

        let state = AppState {
            sessions: store.clone(),
            platform: Arc::new(self.platform),
            summarizer: Arc::new(self.summarizer),
            publisher: publisher.clone(),
            limiter: RateLimiter::per_minute(config.rate_limit_per_minute),
            config,
        };

        TestApp {
            router: routes::router(state, None),
            store,
            publisher,
            _dir: dir,
        }
    }
}

impl TestApp {
    pub fn builder() -> TestAppBuilder {
        TestAppBuilder {
            platform: FakePlatform::default(),
            summarizer: FakeSummarizer::default(),
            publisher: FakePublisher::default(),
            overrides: Vec::new(),
        }
    }

    pub fn new() -> Self {
        Self::builder().build()
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(request(Method::GET, uri, None)).await
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> TestResponse {
        self.send(request(Method::POST, uri, Some(body))).await
    }

    /// collect를 실행하고 새 세션 ID를 돌려줍니다.
    pub async fn collect(&self) -> String {
        let response = self
            .post_json(
                "/api/v1/collect",
                serde_json::json!({ "url": format!("https://www.youtube.com/watch?v={VIDEO_ID}") }),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.body);
        response.body["session_id"].as_str().unwrap().to_string()
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    pub fn assert_error(&self, status: StatusCode, code: &str) {
        assert_eq!(self.status, status, "{}", self.body);
        assert_eq!(self.body["status"], "error");
        assert_eq!(self.body["error_code"], code);
        assert!(self.body["message"].is_string());
    }
}

pub fn request(method: Method, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder().method(method).uri(uri);
    match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// `into_make_service_with_connect_info`처럼 접속한 클라이언트 주소를 붙입니다.
pub fn from_client(mut request: Request<Body>, addr: [u8; 4]) -> Request<Body> {
    request
        .extensions_mut()
        .insert(ConnectInfo(SocketAddr::from((addr, 40000))));
    request
}
