//! # 세션 파일 저장소
//!
//! 세션 하나를 `{data_dir}/{session_id}.json` 파일 하나로 저장합니다.
//!
//! ## 계약
//! - `save()`: 세션 문서 전체를 덮어씁니다. 잠금이 없으므로 같은 ID에 대한
//!   동시 쓰기는 마지막에 쓴 쪽이 이깁니다.
//! - `load()`: 문서 전체를 읽습니다. 파일이 없으면 `SessionNotFound`.
//! - 저장 후 다시 읽으면 모든 필드가 원래 값과 같습니다.

use std::io::ErrorKind;
use std::path::PathBuf;

use tokio::fs;

use crate::error::AppError;
use crate::models::SessionInfo;

/// 세션 파일 디렉토리에 대한 핸들
///
/// 내부에는 경로 하나만 있으므로 clone 비용이 작습니다.
#[derive(Debug, Clone)]
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// 세션 문서를 저장합니다. 디렉토리가 없으면 먼저 만듭니다.
    pub async fn save(&self, session: &SessionInfo) -> Result<(), AppError> {
        let path = self
            .path_for(&session.session_id)
            .ok_or_else(|| AppError::Storage(format!("invalid session id '{}'", session.session_id)))?;

        // 사람이 열어봐도 읽기 쉽도록 들여쓰기한 JSON으로 저장합니다.
        let body = serde_json::to_string_pretty(session)
            .map_err(|e| AppError::Storage(format!("failed to serialize session: {}", e)))?;

        fs::create_dir_all(&self.dir).await?;
        fs::write(&path, body).await?;

        tracing::debug!(session_id = %session.session_id, path = %path.display(), "Session saved");
        Ok(())
    }

    /// 세션 문서를 읽어 옵니다.
    ///
    /// # 반환값
    /// - `Ok(SessionInfo)`: 파일을 읽고 파싱까지 성공
    /// - `Err(AppError::SessionNotFound)`: 파일이 없거나, 파일 이름으로 쓸 수 없는 ID
    /// - `Err(AppError::Storage)`: 읽기 실패 또는 JSON 형식이 깨진 경우
    pub async fn load(&self, session_id: &str) -> Result<SessionInfo, AppError> {
        let path = self
            .path_for(session_id)
            .ok_or_else(|| AppError::SessionNotFound(session_id.to_string()))?;

        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(AppError::SessionNotFound(session_id.to_string()))
            }
            Err(e) => return Err(e.into()),
        };

        serde_json::from_str(&content)
            .map_err(|e| AppError::Storage(format!("failed to parse session '{}': {}", session_id, e)))
    }

    /// 세션 ID를 파일 경로로 바꿉니다.
    ///
    /// 영문자, 숫자, `-`, `_` 외의 문자가 들어간 ID는 경로로 만들지 않습니다.
    /// ("../" 같은 값으로 디렉토리 밖을 읽는 것을 막습니다)
    fn path_for(&self, session_id: &str) -> Option<PathBuf> {
        let valid = !session_id.is_empty()
            && session_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        valid.then(|| self.dir.join(format!("{}.json", session_id)))
    }
}
