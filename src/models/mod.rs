//! # 데이터 모델 모듈
//!
//! 애플리케이션에서 사용하는 데이터 구조체(struct)들을 정의합니다.
//! - `video`: 동영상 메타데이터와 수집 요청/응답
//! - `analysis`: 분석 결과, 등록용 수정 내용과 그 요청/응답
//! - `session`: 세션 문서와 상태
//!
//! `pub use X::*;`로 재공개하여 `crate::models::SessionInfo`처럼 짧게 접근합니다.

pub mod analysis;
pub mod session;
pub mod video;

pub use analysis::*;
pub use session::*;
pub use video::*;
