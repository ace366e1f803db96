//! # 세션 모델 정의
//!
//! 세션은 collect → analyze → register 세 단계에 걸친 작업 상태를 담습니다.
//! 세션 ID 하나당 JSON 문서 하나로 저장됩니다.
//!
//! ## 상태 흐름
//! ```text
//! [collect] Collected → [analyze] Analyzed → [register] Registered
//! ```
//! 상태는 앞으로만 진행하며, 만료 시각(`expires_at`)은 생성 시 한 번 정해진 뒤
//! 연장되지 않습니다. 만료된 세션을 지우는 작업은 없고, 조회할 때만 검사합니다.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::{AnalysisResult, VideoMetadata};

/// 세션 처리 상태
///
/// `#[serde(rename_all = "lowercase")]`: JSON에서는 "collected"처럼 소문자로 표현합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Collected,
    Analyzed,
    Registered,
    /// 값으로는 존재하지만 현재 이 상태로 전이하는 경로는 없습니다.
    /// 실패한 단계는 세션을 바꾸지 않고 그대로 둡니다.
    Error,
}

/// 세션 문서: `{DATA_DIR}/{session_id}.json` 파일 하나에 대응합니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub session_id: String,
    /// 세션 생성 시각 (UTC)
    pub timestamp: DateTime<Utc>,
    /// 생성 시각 + TTL. 이 시각을 "지난" 뒤부터 만료로 취급합니다.
    pub expires_at: DateTime<Utc>,
    pub video_data: VideoMetadata,
    /// 자막 조각들을 공백으로 이어 붙인 원문
    pub transcript: String,
    /// 실제로 사용한 자막 트랙의 언어 코드 (예: "ja")
    pub transcript_language: String,
    pub status: SessionStatus,
    /// 생성자 정보: 클라이언트 IP를 알 수 있으면 IP, 아니면 "system"
    pub created_by: String,
    /// 분석 전에는 None
    #[serde(default)]
    pub analysis_result: Option<AnalysisResult>,
}

impl SessionInfo {
    /// 수집이 끝난 직후의 새 세션을 만듭니다.
    ///
    /// 세션 ID는 UUIDv7로 생성하고, 만료 시각은 `now + ttl`로 고정합니다.
    pub fn new_collected(
        video_data: VideoMetadata,
        transcript: String,
        transcript_language: String,
        created_by: String,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        Self {
            session_id: uuid::Uuid::now_v7().to_string(),
            timestamp: now,
            expires_at: now + ttl,
            video_data,
            transcript,
            transcript_language,
            status: SessionStatus::Collected,
            created_by,
            analysis_result: None,
        }
    }

    /// `now`가 만료 시각보다 엄격하게 뒤일 때만 만료입니다 (`>`, `>=` 아님).
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// 분석 결과를 붙이고 상태를 Analyzed로 바꿉니다.
    ///
    /// 이전 상태와 관계없이 항상 Analyzed가 됩니다 (재분석 허용).
    pub fn mark_analyzed(&mut self, result: AnalysisResult) {
        self.analysis_result = Some(result);
        self.status = SessionStatus::Analyzed;
    }

    /// 원격 페이지 생성이 성공한 뒤 상태를 Registered로 바꿉니다.
    pub fn mark_registered(&mut self) {
        self.status = SessionStatus::Registered;
    }
}

/// 세션 조회 응답: `GET /api/v1/session/{id}`
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub status: &'static str,
    pub data: SessionInfo,
}
