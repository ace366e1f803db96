//! # 세션 조회 핸들러
//!
//! `GET /api/v1/session/{id}` → `{ "status": "success", "data": <SessionInfo> }`
//!
//! 읽기 전용입니다. 만료 여부는 읽을 때만 검사하고 파일은 지우지 않습니다.

use axum::extract::{Path, State};
use chrono::Utc;

use super::{AppJson, AppState};
use crate::{error::AppError, models::SessionResponse};

pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<AppJson<SessionResponse>, AppError> {
    let session = state.sessions.load(&id).await?;

    if session.is_expired_at(Utc::now()) {
        return Err(AppError::SessionExpired);
    }

    Ok(AppJson(SessionResponse {
        status: "success",
        data: session,
    }))
}
