//! # 세션 저장소 계층
//!
//! 세션 문서를 파일 시스템에 읽고 쓰는 코드를 모아둔 모듈입니다.
//! 라우트 핸들러(routes/)는 이 모듈을 통해서만 세션을 다룹니다.
//!
//! - `sessions`: 세션 ID당 JSON 파일 하나를 저장/조회

pub mod sessions;

pub use sessions::*;
