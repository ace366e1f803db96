//! # 수집(collect) 핸들러
//!
//! `POST /api/v1/collect` + `{ "url": "...", "channel_id": "..." }`
//!
//! URL에서 동영상 ID를 뽑아 메타데이터와 자막을 가져오고, 새 세션을
//! `collected` 상태로 저장합니다. 자막이 없으면 세션을 만들지 않습니다.

use axum::extract::State;
use chrono::Utc;

use super::{AppJson, AppState};
use crate::{
    error::AppError,
    middleware::ClientIp,
    models::{CollectRequest, CollectResponse, CollectResponseData, SessionInfo},
    services::youtube,
};

pub async fn collect(
    State(state): State<AppState>,
    client: ClientIp,
    AppJson(req): AppJson<CollectRequest>,
) -> Result<AppJson<CollectResponse>, AppError> {
    tracing::info!(
        url = %req.url,
        channel_id = req.channel_id.as_deref().unwrap_or("-"),
        "Collect request received"
    );

    let (video, transcript) = youtube::collect(
        state.platform.as_ref(),
        &req.url,
        &state.config.transcript_languages,
    )
    .await?;

    let session = SessionInfo::new_collected(
        video,
        transcript.text,
        transcript.language,
        client.label(),
        Utc::now(),
        state.config.session_ttl(),
    );
    state.sessions.save(&session).await?;
    tracing::info!(session_id = %session.session_id, "Session created");

    Ok(AppJson(CollectResponse {
        status: "success",
        data: CollectResponseData {
            video_id: session.video_data.video_id.clone(),
            title: session.video_data.title.clone(),
            channel_name: session.video_data.channel_name.clone(),
        },
        session_id: session.session_id,
    }))
}
