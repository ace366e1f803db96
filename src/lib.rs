//! # yt-notion
//!
//! YouTube 동영상의 자막을 수집하고, 생성형 언어 모델로 요약한 뒤,
//! 사용자가 편집한 결과를 Notion 데이터베이스에 등록하는 백엔드입니다.
//!
//! 작업은 세션 단위로 진행됩니다: collect → analyze → register.
//! 세션은 JSON 파일 하나로 저장되고 만료 시각은 읽을 때만 검사합니다.

pub mod config;
pub mod error;
pub mod logging;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;
