//! # 분석(analyze) 핸들러
//!
//! `POST /api/v1/analyze` + `{ "session_id": "..." }`
//!
//! 저장된 자막을 요약 서비스에 보내고 결과를 세션에 붙입니다.
//! 요약이 실패하면 세션 파일은 건드리지 않습니다.

use axum::extract::State;
use serde::Serialize;

use super::{AppJson, AppState};
use crate::{
    error::AppError,
    models::{AnalysisResult, AnalyzeRequest},
};

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub status: &'static str,
    pub data: AnalysisResult,
}

pub async fn analyze(
    State(state): State<AppState>,
    AppJson(req): AppJson<AnalyzeRequest>,
) -> Result<AppJson<AnalyzeResponse>, AppError> {
    let mut session = state.sessions.load(&req.session_id).await?;
    tracing::info!(session_id = %session.session_id, "Analyzing transcript");

    let result = state.summarizer.summarize(&session.transcript).await?;

    session.mark_analyzed(result.clone());
    state.sessions.save(&session).await?;
    tracing::info!(session_id = %session.session_id, "Session analyzed");

    Ok(AppJson(AnalyzeResponse {
        status: "success",
        data: result,
    }))
}
