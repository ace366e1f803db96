//! # YouTube 동영상 정보 수집 서비스
//!
//! URL 하나를 받아 다음을 수행합니다:
//! 1. URL에서 11자리 동영상 ID 추출 (`extract_video_id`)
//! 2. YouTube Data API v3로 메타데이터 조회 (`VideoPlatform::video_metadata`)
//! 3. 자막 트랙을 찾아 텍스트로 합치기 (`VideoPlatform::transcript`)
//!
//! 외부 API 호출은 `VideoPlatform` 트레이트 뒤에 있으므로,
//! 테스트에서는 네트워크 없이 가짜 구현을 주입할 수 있습니다.

use std::sync::LazyLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use regex::Regex;
use reqwest::header::ACCEPT_LANGUAGE;
use serde::Deserialize;

use super::transcript::{extract_caption_tracks, select_track, transcript_text, Json3Transcript};
use crate::error::AppError;
use crate::models::VideoMetadata;

const DATA_API_BASE: &str = "https://www.googleapis.com/youtube/v3";
const WATCH_PAGE_BASE: &str = "https://www.youtube.com";

// LazyLock: 처음 사용될 때 한 번만 정규식을 컴파일합니다.
static VIDEO_ID_PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        // https://www.youtube.com/watch?v=XXXXXXXXXXX
        Regex::new(r"v=([A-Za-z0-9_-]{11})").expect("valid regex"),
        // https://youtu.be/XXXXXXXXXXX
        Regex::new(r"youtu\.be/([A-Za-z0-9_-]{11})").expect("valid regex"),
        // https://www.youtube.com/embed/XXXXXXXXXXX
        Regex::new(r"embed/([A-Za-z0-9_-]{11})").expect("valid regex"),
    ]
});

static DURATION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^PT(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?$").expect("valid regex")
});

/// URL에서 11자리 동영상 ID를 추출합니다.
///
/// 쿼리 파라미터(`v=`), 단축 링크(`youtu.be/`), 임베드(`embed/`) 형식을 순서대로 시도하고
/// 처음 일치한 값을 돌려줍니다. 어느 것도 맞지 않으면 None입니다.
pub fn extract_video_id(url: &str) -> Option<String> {
    VIDEO_ID_PATTERNS
        .iter()
        .find_map(|re| re.captures(url))
        .map(|caps| caps[1].to_string())
}

/// ISO-8601 재생 시간(`PT#H#M#S`)을 초 단위로 바꿉니다.
///
/// 각 구성 요소는 생략 가능하며 기본값은 0입니다.
/// 형식에 맞지 않는 입력은 에러가 아니라 0초로 취급합니다.
pub fn parse_duration(duration: &str) -> u64 {
    let Some(caps) = DURATION_PATTERN.captures(duration) else {
        return 0;
    };

    let part = |i: usize| {
        caps.get(i)
            .and_then(|m| m.as_str().parse::<u64>().ok())
            .unwrap_or(0)
    };

    part(1) * 3600 + part(2) * 60 + part(3)
}

/// 자막 텍스트와 실제로 사용한 언어 코드
#[derive(Debug, Clone, PartialEq)]
pub struct Transcript {
    pub text: String,
    pub language: String,
}

/// 동영상 플랫폼 API에 대한 추상화
///
/// `Send + Sync`: 여러 요청 핸들러가 `Arc<dyn VideoPlatform>`으로 동시에 공유하기 위한 조건
#[async_trait]
pub trait VideoPlatform: Send + Sync {
    /// 동영상 ID로 메타데이터를 조회합니다.
    ///
    /// - 결과가 없으면 `AppError::VideoNotFound`
    /// - 통신/HTTP/응답 형식 오류는 `AppError::Upstream`
    async fn video_metadata(&self, video_id: &str) -> Result<VideoMetadata, AppError>;

    /// 언어 우선순위에 따라 자막을 가져옵니다.
    ///
    /// 어떤 이유로든 자막을 얻지 못하면 `AppError::TranscriptUnavailable`
    async fn transcript(&self, video_id: &str, languages: &[String]) -> Result<Transcript, AppError>;
}

/// 수집 단계 전체: URL → (메타데이터, 자막)
///
/// 자막을 가져오지 못하면 메타데이터가 있어도 전체를 실패로 처리합니다.
pub async fn collect(
    platform: &dyn VideoPlatform,
    url: &str,
    languages: &[String],
) -> Result<(VideoMetadata, Transcript), AppError> {
    let video_id = extract_video_id(url).ok_or_else(|| {
        tracing::error!("Invalid YouTube URL: {}", url);
        AppError::InvalidUrl
    })?;

    let metadata = platform.video_metadata(&video_id).await?;
    tracing::info!(video_id = %video_id, "Fetched video info: {}", metadata.title);

    let transcript = platform.transcript(&video_id, languages).await?;
    tracing::info!(
        video_id = %video_id,
        language = %transcript.language,
        chars = transcript.text.chars().count(),
        "Fetched transcript"
    );

    Ok((metadata, transcript))
}

// ── YouTube Data API 응답 구조체 ──
// 필요한 필드만 정의하고, 나머지 필드는 serde가 무시합니다.
// `rename_all = "camelCase"`: JSON의 channelTitle ↔ Rust의 channel_title

#[derive(Debug, Deserialize)]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoItem {
    snippet: Snippet,
    content_details: ContentDetails,
    #[serde(default)]
    statistics: Option<Statistics>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snippet {
    title: String,
    channel_title: String,
    published_at: DateTime<Utc>,
    #[serde(default)]
    thumbnails: Option<Thumbnails>,
}

#[derive(Debug, Deserialize)]
struct Thumbnails {
    high: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ContentDetails {
    duration: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Statistics {
    /// API는 숫자를 문자열로 돌려줍니다 ("12345")
    view_count: Option<String>,
}

impl VideoItem {
    fn into_metadata(self, video_id: &str) -> VideoMetadata {
        VideoMetadata {
            video_id: video_id.to_string(),
            title: self.snippet.title,
            channel_name: self.snippet.channel_title,
            published_at: self.snippet.published_at.date_naive(),
            duration_seconds: parse_duration(&self.content_details.duration),
            duration: self.content_details.duration,
            view_count: self
                .statistics
                .and_then(|s| s.view_count)
                .and_then(|v| v.parse().ok()),
            url: VideoMetadata::watch_url(video_id),
            thumbnail_url: self.snippet.thumbnails.and_then(|t| t.high).map(|t| t.url),
        }
    }
}

/// 메타데이터 API 응답 본문을 해석합니다.
fn parse_video_list(body: &str, video_id: &str) -> Result<VideoMetadata, AppError> {
    let response: VideoListResponse = serde_json::from_str(body)
        .map_err(|e| AppError::upstream("YouTube", format!("unexpected response: {}", e)))?;

    let item = response.items.into_iter().next().ok_or_else(|| {
        tracing::error!("Video not found: {}", video_id);
        AppError::VideoNotFound
    })?;

    Ok(item.into_metadata(video_id))
}

/// YouTube Data API v3 + 공개 자막 트랙을 사용하는 실제 구현
pub struct YouTubeClient {
    http: reqwest::Client,
    api_key: String,
}

impl YouTubeClient {
    /// 공유 HTTP 클라이언트와 API 키로 생성합니다.
    ///
    /// API 키가 비어 있으면 `AppError::Misconfigured`를 반환합니다.
    pub fn new(http: reqwest::Client, api_key: &str) -> Result<Self, AppError> {
        if api_key.trim().is_empty() {
            tracing::error!("YOUTUBE_API_KEY is not configured.");
            return Err(AppError::Misconfigured("YouTube API key"));
        }
        Ok(Self {
            http,
            api_key: api_key.to_string(),
        })
    }

    async fn fetch_transcript(
        &self,
        video_id: &str,
        languages: &[String],
    ) -> Result<Transcript, String> {
        // 1. 시청 페이지에서 자막 트랙 목록을 찾습니다.
        let html = self
            .http
            .get(format!("{}/watch", WATCH_PAGE_BASE))
            .query(&[("v", video_id)])
            .header(ACCEPT_LANGUAGE, languages.join(","))
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| e.to_string())?
            .text()
            .await
            .map_err(|e| e.to_string())?;

        let tracks = extract_caption_tracks(&html)?;
        let track = select_track(&tracks, languages).ok_or_else(|| {
            format!(
                "no caption track in {:?} (available: {:?})",
                languages,
                tracks.iter().map(|t| t.language_code.as_str()).collect::<Vec<_>>()
            )
        })?;

        // 2. 선택한 트랙을 json3 형식으로 내려받아 텍스트로 합칩니다.
        let json3: Json3Transcript = self
            .http
            .get(&track.base_url)
            .query(&[("fmt", "json3")])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| e.to_string())?
            .json()
            .await
            .map_err(|e| e.to_string())?;

        let text = transcript_text(&json3);
        if text.is_empty() {
            return Err("caption track is empty".to_string());
        }

        Ok(Transcript {
            text,
            language: track.language_code.clone(),
        })
    }
}

#[async_trait]
impl VideoPlatform for YouTubeClient {
    async fn video_metadata(&self, video_id: &str) -> Result<VideoMetadata, AppError> {
        let response = self
            .http
            .get(format!("{}/videos", DATA_API_BASE))
            .query(&[
                ("part", "snippet,contentDetails,statistics"),
                ("id", video_id),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AppError::upstream("YouTube", e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::upstream("YouTube", e))?;

        if !status.is_success() {
            tracing::error!("HTTP error {} occurred: {}", status, body);
            return Err(AppError::upstream(
                "YouTube",
                format!("failed to fetch video info ({})", status),
            ));
        }

        parse_video_list(&body, video_id)
    }

    async fn transcript(&self, video_id: &str, languages: &[String]) -> Result<Transcript, AppError> {
        self.fetch_transcript(video_id, languages)
            .await
            .map_err(|reason| {
                tracing::warn!("Failed to fetch transcript for video ID {}: {}", video_id, reason);
                AppError::TranscriptUnavailable(reason)
            })
    }
}
