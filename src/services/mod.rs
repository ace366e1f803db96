//! # 외부 서비스 모듈
//!
//! 세 가지 외부 API와의 통신을 담당합니다. 각 서비스는 트레이트 뒤에 숨어 있어
//! 핸들러는 `Arc<dyn Trait>`만 알고, 테스트에서는 가짜 구현으로 바꿔 끼웁니다.
//! - `youtube`: 동영상 메타데이터 조회와 수집 단계 (`VideoPlatform`)
//! - `transcript`: 자막 트랙 선택과 json3 자막 해석 (순수 함수)
//! - `gemini`: 자막 요약과 응답 스키마 검증 (`Summarizer`)
//! - `notion`: 데이터베이스 페이지 등록 (`Publisher`)

pub mod gemini;
pub mod notion;
pub mod transcript;
pub mod youtube;

pub use gemini::{GeminiClient, Summarizer};
pub use notion::{NotionClient, Publisher};
pub use youtube::{Transcript, VideoPlatform, YouTubeClient};
