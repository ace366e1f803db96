//! # 등록(register) 핸들러
//!
//! `POST /api/v1/register` + `{ "session_id": "...", "modifications": { ... } }`
//!
//! 사용자가 편집한 내용을 그대로 Notion 페이지로 만듭니다.
//! 세션에 저장된 분석 결과는 쓰지 않고, 동영상 메타데이터만 가져다 씁니다.

use axum::extract::State;
use serde::Serialize;

use super::{AppJson, AppState};
use crate::{
    error::AppError,
    models::{RegisterRequest, RegisterResponseData},
};

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub status: &'static str,
    pub data: RegisterResponseData,
}

pub async fn register(
    State(state): State<AppState>,
    AppJson(req): AppJson<RegisterRequest>,
) -> Result<AppJson<RegisterResponse>, AppError> {
    let mut session = state.sessions.load(&req.session_id).await?;

    let notion_url = state
        .publisher
        .publish(&req.modifications, &session.video_data)
        .await?;

    session.mark_registered();
    state.sessions.save(&session).await?;
    tracing::info!(session_id = %session.session_id, notion_url = %notion_url, "Session registered");

    Ok(AppJson(RegisterResponse {
        status: "success",
        data: RegisterResponseData { notion_url },
    }))
}
