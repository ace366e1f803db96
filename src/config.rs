//! # 애플리케이션 설정(Configuration) 모듈
//!
//! 환경변수에서 서버 설정값을 읽어오는 모듈입니다.
//! `.env` 파일이나 시스템 환경변수에서 값을 가져오며,
//! 서버 시작 시 한 번만 읽어 불변(immutable) 구조체로 모든 컴포넌트에 전달합니다.
//!
//! 필수 설정 항목 (없으면 서버가 시작되지 않음):
//! - `YOUTUBE_API_KEY`: YouTube Data API v3 키
//! - `GEMINI_API_KEY`: Gemini(생성형 언어 모델) API 키
//! - `NOTION_API_KEY`: Notion 통합(Integration) 토큰
//! - `NOTION_DATABASE_ID`: 페이지를 등록할 Notion 데이터베이스 ID
//!
//! 선택 설정 항목:
//! - `GEMINI_MODEL`, `GEMINI_TEMPERATURE`
//! - `DATA_DIR`: 세션 JSON 파일 저장 디렉토리
//! - `CORS_ORIGINS`: 허용할 출처 목록 (쉼표 구분)
//! - `RATE_LIMIT_PER_MINUTE`: 클라이언트 IP당 분당 요청 수
//! - `TRANSCRIPT_LANGUAGES`: 자막 언어 우선순위 (쉼표 구분)
//! - `SESSION_TTL_HOURS`: 세션 유효 기간
//! - `HTTP_TIMEOUT_SECS`: 외부 API 호출 타임아웃
//! - `HOST`, `PORT`: 서버 바인딩 주소와 포트
//! - `LOG_DIR`: 로그 파일 디렉토리 (`off`면 파일 로그를 끕니다)

use std::env;
use std::num::NonZeroU32;
use std::time::Duration;

use thiserror::Error;

/// 설정 로딩 실패: 서버 시작 단계에서만 발생합니다.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// 필수 환경변수가 없거나 공백뿐인 경우
    #[error("required environment variable `{0}` is not set")]
    Missing(&'static str),

    /// 값은 있지만 해석할 수 없는 경우 (숫자가 아니거나 0 등)
    #[error("environment variable `{name}` has an invalid value: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// 애플리케이션 전체 설정을 담는 구조체
///
/// 서버 시작 시 환경변수에서 한 번 읽어온 후 `Arc<Config>`로 공유됩니다.
#[derive(Debug, Clone)]
pub struct Config {
    pub youtube_api_key: String,
    pub gemini_api_key: String,
    /// 요약에 사용할 모델 이름 (기본값: "gemini-1.5-flash")
    pub gemini_model: String,
    pub gemini_temperature: f32,
    pub notion_api_key: String,
    pub notion_database_id: String,
    /// 세션 파일이 저장되는 디렉토리 경로 (기본값: "data/sessions")
    pub data_dir: String,
    pub cors_origins: Vec<String>,
    pub rate_limit_per_minute: NonZeroU32,
    /// 자막 언어 우선순위. 앞에 있을수록 먼저 시도합니다. (기본값: ja, en)
    pub transcript_languages: Vec<String>,
    pub session_ttl_hours: u32,
    pub http_timeout_secs: u64,
    /// 빌드된 프론트엔드 경로. 디렉토리가 있으면 같은 서버에서 서빙합니다.
    pub frontend_dist: String,
    pub host: String,
    pub port: u16,
    /// app.log / error.log를 쓸 디렉토리. `None`이면 표준 출력에만 씁니다.
    pub log_dir: Option<String>,
}

impl Config {
    /// 환경변수에서 설정값을 읽어 Config 인스턴스를 생성합니다.
    ///
    /// # 에러
    /// 필수 키가 하나라도 없으면 `ConfigError::Missing`을 반환합니다.
    /// 숫자 항목의 값이 잘못되면 `ConfigError::Invalid`를 반환합니다.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 임의의 조회 함수로 설정을 만듭니다.
    ///
    /// `from_env()`는 `std::env::var`를 넘기고, 테스트에서는 HashMap을 넘깁니다.
    /// `impl Fn(&str) -> Option<String>`: 클로저를 제네릭 인자로 받는 문법입니다.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        // 공백만 있는 값은 "설정되지 않음"으로 취급합니다.
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let required = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        // 0은 "제한 없음"이 아니라 잘못된 값으로 취급합니다.
        let rate_limit = parse_or(get("RATE_LIMIT_PER_MINUTE"), "RATE_LIMIT_PER_MINUTE", 10u32)?;
        let rate_limit_per_minute =
            NonZeroU32::new(rate_limit).ok_or_else(|| ConfigError::Invalid {
                name: "RATE_LIMIT_PER_MINUTE",
                value: rate_limit.to_string(),
            })?;

        let session_ttl_hours = parse_or(get("SESSION_TTL_HOURS"), "SESSION_TTL_HOURS", 24u32)?;
        if session_ttl_hours == 0 {
            return Err(ConfigError::Invalid {
                name: "SESSION_TTL_HOURS",
                value: "0".to_string(),
            });
        }

        Ok(Self {
            youtube_api_key: required("YOUTUBE_API_KEY")?,
            gemini_api_key: required("GEMINI_API_KEY")?,
            notion_api_key: required("NOTION_API_KEY")?,
            notion_database_id: required("NOTION_DATABASE_ID")?,

            gemini_model: get("GEMINI_MODEL").unwrap_or_else(|| "gemini-1.5-flash".to_string()),
            gemini_temperature: parse_or(get("GEMINI_TEMPERATURE"), "GEMINI_TEMPERATURE", 0.8)?,
            data_dir: get("DATA_DIR").unwrap_or_else(|| "data/sessions".to_string()),
            cors_origins: non_empty_list(
                "CORS_ORIGINS",
                &get("CORS_ORIGINS").unwrap_or_else(|| "http://localhost:5173".to_string()),
            )?,
            rate_limit_per_minute,
            transcript_languages: non_empty_list(
                "TRANSCRIPT_LANGUAGES",
                &get("TRANSCRIPT_LANGUAGES").unwrap_or_else(|| "ja,en".to_string()),
            )?,
            session_ttl_hours,
            http_timeout_secs: parse_or(get("HTTP_TIMEOUT_SECS"), "HTTP_TIMEOUT_SECS", 60)?,
            frontend_dist: get("FRONTEND_DIST").unwrap_or_else(|| "../frontend/dist".to_string()),
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(get("PORT"), "PORT", 8000)?,
            log_dir: match get("LOG_DIR") {
                Some(dir) if dir.eq_ignore_ascii_case("off") => None,
                Some(dir) => Some(dir),
                None => Some("logs".to_string()),
            },
        })
    }

    /// 세션 유효 기간 (생성 시각 + TTL = 만료 시각)
    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(i64::from(self.session_ttl_hours))
    }

    /// 외부 API 호출에 적용할 요청 타임아웃
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

/// 값이 있으면 파싱하고, 없으면 기본값을 사용합니다.
///
/// 파싱에 실패하면 조용히 기본값으로 넘어가지 않고 에러를 돌려줍니다.
fn parse_or<T: std::str::FromStr>(
    value: Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid { name, value: raw }),
        None => Ok(default),
    }
}

/// "a, b,,c" → ["a", "b", "c"]
fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// `","`처럼 항목이 하나도 남지 않는 목록은 잘못된 값입니다.
fn non_empty_list(name: &'static str, raw: &str) -> Result<Vec<String>, ConfigError> {
    let items = split_list(raw);
    if items.is_empty() {
        return Err(ConfigError::Invalid {
            name,
            value: raw.to_string(),
        });
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn required_only() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("YOUTUBE_API_KEY", "yt-key"),
            ("GEMINI_API_KEY", "gemini-key"),
            ("NOTION_API_KEY", "notion-key"),
            ("NOTION_DATABASE_ID", "db-id"),
        ])
    }

    fn load(vars: &HashMap<&'static str, &'static str>) -> Result<Config, ConfigError> {
        Config::from_lookup(|key| vars.get(key).map(|v| v.to_string()))
    }

    #[test]
    fn defaults_apply_when_only_required_keys_are_set() {
        let config = load(&required_only()).unwrap();

        assert_eq!(config.gemini_model, "gemini-1.5-flash");
        assert_eq!(config.data_dir, "data/sessions");
        assert_eq!(config.cors_origins, vec!["http://localhost:5173"]);
        assert_eq!(config.rate_limit_per_minute.get(), 10);
        assert_eq!(config.transcript_languages, vec!["ja", "en"]);
        assert_eq!(config.session_ttl(), chrono::Duration::days(1));
        assert_eq!(config.port, 8000);
        assert_eq!(config.log_dir.as_deref(), Some("logs"));
    }

    #[test]
    fn log_dir_can_be_turned_off() {
        let mut vars = required_only();
        vars.insert("LOG_DIR", "OFF");
        assert_eq!(load(&vars).unwrap().log_dir, None);

        vars.insert("LOG_DIR", "/var/log/yt-notion");
        assert_eq!(load(&vars).unwrap().log_dir.as_deref(), Some("/var/log/yt-notion"));
    }

    #[test]
    fn missing_credential_fails_fast() {
        let mut vars = required_only();
        vars.remove("NOTION_DATABASE_ID");

        let err = load(&vars).unwrap_err();
        assert_eq!(err, ConfigError::Missing("NOTION_DATABASE_ID"));
    }

    #[test]
    fn blank_credential_counts_as_missing() {
        let mut vars = required_only();
        vars.insert("GEMINI_API_KEY", "   ");

        assert_eq!(load(&vars).unwrap_err(), ConfigError::Missing("GEMINI_API_KEY"));
    }

    #[test]
    fn lists_are_trimmed_and_empty_entries_dropped() {
        let mut vars = required_only();
        vars.insert("CORS_ORIGINS", "http://a.test, http://b.test,,");
        vars.insert("TRANSCRIPT_LANGUAGES", "en , ja");

        let config = load(&vars).unwrap();
        assert_eq!(config.cors_origins, vec!["http://a.test", "http://b.test"]);
        assert_eq!(config.transcript_languages, vec!["en", "ja"]);
    }

    #[test]
    fn invalid_numbers_are_rejected() {
        let mut vars = required_only();
        vars.insert("RATE_LIMIT_PER_MINUTE", "0");
        assert!(matches!(
            load(&vars).unwrap_err(),
            ConfigError::Invalid { name: "RATE_LIMIT_PER_MINUTE", .. }
        ));

        let mut vars = required_only();
        vars.insert("PORT", "eighty");
        assert!(matches!(
            load(&vars).unwrap_err(),
            ConfigError::Invalid { name: "PORT", .. }
        ));

        let mut vars = required_only();
        vars.insert("SESSION_TTL_HOURS", "0");
        assert!(matches!(
            load(&vars).unwrap_err(),
            ConfigError::Invalid { name: "SESSION_TTL_HOURS", .. }
        ));
    }

    #[test]
    fn lists_without_entries_are_rejected() {
        for raw in [",", " , ", ",,,"] {
            let mut vars = required_only();
            vars.insert("TRANSCRIPT_LANGUAGES", raw);
            assert_eq!(
                load(&vars).unwrap_err(),
                ConfigError::Invalid {
                    name: "TRANSCRIPT_LANGUAGES",
                    value: raw.trim().to_string(),
                }
            );

            let mut vars = required_only();
            vars.insert("CORS_ORIGINS", raw);
            assert!(matches!(
                load(&vars).unwrap_err(),
                ConfigError::Invalid { name: "CORS_ORIGINS", .. }
            ));
        }
    }
}
