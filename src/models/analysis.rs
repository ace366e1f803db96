//! # 분석(요약) 결과와 등록용 수정 내용 모델

use serde::{Deserialize, Serialize};

/// 생성형 언어 모델이 돌려준 분석 결과
///
/// `deny_unknown_fields`: 정해진 네 개의 키 외에 다른 키가 있으면
/// 역직렬화를 실패시켜 응답 스키마를 엄격하게 검증합니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnalysisResult {
    /// Markdown 형식 요약
    pub summary: String,
    /// 추천 제목 (문자열 하나)
    pub suggested_titles: String,
    /// 분류 태그 (프롬프트상 최대 3개, 코드에서 강제하지 않음)
    pub categories: Vec<String>,
    /// 감정 태그 (하나)
    pub emotions: String,
}

/// 분석 요청: `POST /api/v1/analyze`의 요청 본문
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub session_id: String,
}

/// 사용자가 편집한 최종 내용: 분석 결과에서 파생되지 않고 그대로 등록에 사용됩니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterModifications {
    pub title: String,
    pub summary: String,
    pub categories: Vec<String>,
    pub emotions: String,
}

/// 등록 요청: `POST /api/v1/register`의 요청 본문
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub session_id: String,
    pub modifications: RegisterModifications,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponseData {
    pub notion_url: String,
}
