//! # 자막 요약 서비스 (Gemini)
//!
//! 자막 텍스트로 프롬프트를 만들어 생성형 언어 모델에 보내고,
//! JSON으로 돌아온 답을 네 개의 키(summary, suggested_titles, categories, emotions)를
//! 가진 `AnalysisResult`로 엄격하게 검증합니다.
//!
//! 재시도나 부분 결과 대체는 하지 않습니다. 호출 실패와 검증 실패는 모두
//! `AppError::Upstream`(E008)이 됩니다.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::error::AppError;
use crate::models::AnalysisResult;

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// 분류 태그 선택지
pub const CATEGORY_TAGS: [&str; 16] = [
    "音楽",
    "動物",
    "スポーツ",
    "旅行",
    "ゲーム",
    "コメディ",
    "エンターテインメント",
    "教育",
    "科学",
    "映画",
    "アニメ",
    "クラシック",
    "ドキュメンタリー",
    "ドラマ",
    "ショートムービー",
    "その他",
];

/// 감정 태그 선택지
pub const EMOTION_TAGS: [&str; 7] = ["感動", "愉快", "驚愕", "啓発", "考察", "癒着", "その他"];

/// 자막 → 분석 결과
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, transcript: &str) -> Result<AnalysisResult, AppError>;
}

/// 자막 텍스트를 끼워 넣은 고정 프롬프트를 만듭니다.
pub fn build_prompt(transcript: &str) -> String {
    format!(
        r#"以下のYouTube動画の字幕テキストを分析し、内容を要約してJSON形式で回答してください：

制約：
- 要約は400-1000文字、Markdown形式
- タイトルは30文字以内
- 分類タグは最大3つ
- 感情タグは1つのみ

分類タグ選択肢: [{categories}]
感情タグ選択肢: [{emotions}]

字幕テキスト:
{transcript}

回答は必ずJSON形式で、以下のキーを持つオブジェクトとしてください:
{{
"summary": "Markdown形式の要約",
"suggested_titles": "提案タイトル",
"categories": ["タグ1", "タグ2"],
"emotions": "感情タグ"
}}
"#,
        categories = quote_tags(&CATEGORY_TAGS),
        emotions = quote_tags(&EMOTION_TAGS),
        transcript = transcript,
    )
}

/// ["a", "b"] → "\"a\", \"b\""
fn quote_tags(tags: &[&str]) -> String {
    tags.iter()
        .map(|t| format!("\"{}\"", t))
        .collect::<Vec<_>>()
        .join(", ")
}

/// 모델이 돌려준 텍스트를 분석 결과로 검증합니다.
///
/// JSON 객체가 아니거나, 키가 빠졌거나, 정해지지 않은 키가 있거나,
/// 값의 타입이 다르면 모두 실패입니다.
pub fn parse_analysis(text: &str) -> Result<AnalysisResult, AppError> {
    serde_json::from_str::<AnalysisResult>(text.trim())
        .map_err(|e| AppError::upstream("Gemini", format!("invalid analysis JSON: {}", e)))
}

// ── generateContent 응답 구조체 ──

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

/// 첫 번째 후보의 텍스트 조각을 이어 붙입니다.
fn response_text(response: GenerateContentResponse) -> Option<String> {
    let content = response.candidates.into_iter().next()?.content?;
    let text: String = content.parts.into_iter().map(|p| p.text).collect();
    (!text.trim().is_empty()).then_some(text)
}

/// Gemini `generateContent` REST API 클라이언트
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    temperature: f32,
}

impl GeminiClient {
    /// API 키가 비어 있으면 `AppError::Misconfigured`를 반환합니다.
    pub fn new(
        http: reqwest::Client,
        api_key: &str,
        model: &str,
        temperature: f32,
    ) -> Result<Self, AppError> {
        if api_key.trim().is_empty() {
            tracing::error!("GEMINI_API_KEY is not configured.");
            return Err(AppError::Misconfigured("Gemini API key"));
        }
        tracing::info!(model, "Gemini client initialized");
        Ok(Self {
            http,
            api_key: api_key.to_string(),
            model: model.to_string(),
            temperature,
        })
    }

    fn request_body(&self, prompt: &str) -> serde_json::Value {
        json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": prompt }]
            }],
            "generationConfig": {
                "temperature": self.temperature,
                "responseMimeType": "application/json"
            }
        })
    }
}

#[async_trait]
impl Summarizer for GeminiClient {
    async fn summarize(&self, transcript: &str) -> Result<AnalysisResult, AppError> {
        let prompt = build_prompt(transcript);

        tracing::info!("Sending analysis request to Gemini API.");
        let response = self
            .http
            .post(format!("{}/models/{}:generateContent", API_BASE, self.model))
            .header("x-goog-api-key", &self.api_key)
            .json(&self.request_body(&prompt))
            .send()
            .await
            .map_err(|e| AppError::upstream("Gemini", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Analysis failed: {} {}", status, body);
            return Err(AppError::upstream(
                "Gemini",
                format!("Gemini API returned {}", status),
            ));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| AppError::upstream("Gemini", e))?;
        let text = response_text(parsed)
            .ok_or_else(|| AppError::upstream("Gemini", "response contained no text"))?;

        let result = parse_analysis(&text)?;
        tracing::info!("Analysis completed successfully.");
        Ok(result)
    }
}
