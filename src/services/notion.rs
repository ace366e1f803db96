//! # Notion 페이지 등록 서비스
//!
//! 사용자가 편집한 최종 내용(`RegisterModifications`)과 동영상 메타데이터를
//! 고정된 데이터베이스 속성 스키마와 블록 순서로 바꿔 페이지를 만듭니다.
//!
//! ## 페이지 구성
//! - 속성: Name(제목), 分類(다중 선택), 感情(단일 선택),
//!   動画URL, チャンネル名, 公開日, 動画時間(초), 視聴回数
//! - 본문: heading_2 → 요약 문단 → 구분선 → heading_3 → 북마크

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::AppError;
use crate::models::{RegisterModifications, VideoMetadata};

const API_BASE: &str = "https://api.notion.com/v1";
const NOTION_VERSION: &str = "2022-06-28";

/// Notion rich_text 한 조각에 넣을 수 있는 최대 글자 수
const RICH_TEXT_LIMIT: usize = 2000;

/// 편집된 내용 → 원격 문서 URL
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(
        &self,
        modifications: &RegisterModifications,
        video: &VideoMetadata,
    ) -> Result<String, AppError>;
}

/// 긴 텍스트를 2000자 단위 rich_text 조각 배열로 나눕니다.
///
/// 바이트가 아닌 문자(char) 단위로 나누므로 멀티바이트 문자가 잘리지 않습니다.
fn rich_text(content: &str) -> Vec<Value> {
    let chars: Vec<char> = content.chars().collect();
    if chars.is_empty() {
        return vec![json!({ "text": { "content": "" } })];
    }
    chars
        .chunks(RICH_TEXT_LIMIT)
        .map(|chunk| json!({ "text": { "content": chunk.iter().collect::<String>() } }))
        .collect()
}

/// `pages.create` 요청 본문을 만듭니다.
pub fn build_page(
    database_id: &str,
    modifications: &RegisterModifications,
    video: &VideoMetadata,
) -> Value {
    let categories: Vec<Value> = modifications
        .categories
        .iter()
        .map(|name| json!({ "name": name }))
        .collect();

    json!({
        "parent": { "database_id": database_id },
        "properties": {
            "Name": { "title": rich_text(&modifications.title) },
            "分類": { "multi_select": categories },
            "感情": { "select": { "name": modifications.emotions } },
            "動画URL": { "url": video.url },
            "チャンネル名": { "rich_text": rich_text(&video.channel_name) },
            "公開日": { "date": { "start": video.published_at.format("%Y-%m-%d").to_string() } },
            "動画時間": { "number": video.duration_seconds },
            "視聴回数": { "number": video.view_count },
        },
        "children": [
            {
                "object": "block",
                "type": "heading_2",
                "heading_2": { "rich_text": rich_text("📋 要約") }
            },
            {
                "object": "block",
                "type": "paragraph",
                "paragraph": { "rich_text": rich_text(&modifications.summary) }
            },
            {
                "object": "block",
                "type": "divider",
                "divider": {}
            },
            {
                "object": "block",
                "type": "heading_3",
                "heading_3": { "rich_text": rich_text("🔗 元動画") }
            },
            {
                "object": "block",
                "type": "bookmark",
                "bookmark": { "url": video.url }
            }
        ]
    })
}

#[derive(Debug, Deserialize)]
struct CreatedPage {
    url: String,
}

/// Notion REST API 클라이언트
pub struct NotionClient {
    http: reqwest::Client,
    api_key: String,
    database_id: String,
}

impl NotionClient {
    /// API 키나 데이터베이스 ID가 비어 있으면 `AppError::Misconfigured`를 반환합니다.
    pub fn new(http: reqwest::Client, api_key: &str, database_id: &str) -> Result<Self, AppError> {
        if api_key.trim().is_empty() || database_id.trim().is_empty() {
            tracing::error!("Notion API key or Database ID is not configured.");
            return Err(AppError::Misconfigured("Notion API key or Database ID"));
        }
        Ok(Self {
            http,
            api_key: api_key.to_string(),
            database_id: database_id.to_string(),
        })
    }
}

#[async_trait]
impl Publisher for NotionClient {
    async fn publish(
        &self,
        modifications: &RegisterModifications,
        video: &VideoMetadata,
    ) -> Result<String, AppError> {
        let body = build_page(&self.database_id, modifications, video);

        let response = self
            .http
            .post(format!("{}/pages", API_BASE))
            .bearer_auth(&self.api_key)
            .header("Notion-Version", NOTION_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::upstream("Notion", e))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            tracing::error!("Notion API error: {} {}", status, detail);
            return Err(AppError::upstream(
                "Notion",
                format!("Notion API returned {}", status),
            ));
        }

        let page: CreatedPage = response
            .json()
            .await
            .map_err(|e| AppError::upstream("Notion", e))?;

        tracing::info!("Successfully created Notion page: {}", page.url);
        Ok(page.url)
    }
}
