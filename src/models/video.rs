//! # 동영상 메타데이터 모델
//!
//! 수집(collect) 단계에서 YouTube Data API 응답으로부터 만들어지며,
//! 세션에 저장된 뒤에는 바뀌지 않습니다.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 동영상 한 개의 메타데이터
///
/// Notion 페이지의 읽기 전용 속성(URL, 채널명, 공개일, 재생 시간, 조회수)의 원본입니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoMetadata {
    /// 11자리 YouTube 동영상 ID
    pub video_id: String,
    pub title: String,
    pub channel_name: String,
    /// 공개일 (시각 정보 없이 날짜만, "2023-01-01")
    pub published_at: NaiveDate,
    /// ISO-8601 재생 시간 원문 (예: "PT5M30S")
    pub duration: String,
    /// `duration`을 초 단위로 환산한 값
    pub duration_seconds: u64,
    /// 조회수: 통계가 비공개인 동영상은 None
    pub view_count: Option<u64>,
    /// 정규화된 시청 URL ("https://www.youtube.com/watch?v={id}")
    pub url: String,
    pub thumbnail_url: Option<String>,
}

impl VideoMetadata {
    /// 동영상 ID로부터 정규화된 시청 URL을 만듭니다.
    pub fn watch_url(video_id: &str) -> String {
        format!("https://www.youtube.com/watch?v={}", video_id)
    }
}

/// 수집 요청: `POST /api/v1/collect`의 요청 본문
#[derive(Debug, Deserialize)]
pub struct CollectRequest {
    pub url: String,
    /// 프론트엔드가 함께 보내는 채널 ID (로그에만 남김)
    pub channel_id: Option<String>,
}

/// 수집 응답의 `data` 부분
#[derive(Debug, Serialize)]
pub struct CollectResponseData {
    pub video_id: String,
    pub title: String,
    pub channel_name: String,
}

/// 수집 응답 전체: `session_id`는 `data` 바깥에 위치합니다.
#[derive(Debug, Serialize)]
pub struct CollectResponse {
    pub status: &'static str,
    pub session_id: String,
    pub data: CollectResponseData,
}
