//! # 로깅 초기화
//!
//! 표준 출력 외에 로그 디렉토리에 두 파일을 씁니다.
//! - `app.log`: INFO 이상 전체
//! - `error.log`: ERROR만
//!
//! 파일은 하루 단위로 바뀌고(`app.log.2026-10-17` 형식) 최근 5개만 남깁니다.
//! 쓰기는 별도 스레드에서 처리하므로 요청 처리 중에 디스크를 기다리지 않습니다.

use std::path::Path;

use tracing::Subscriber;
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{
    filter::LevelFilter, fmt, layer::SubscriberExt, registry::LookupSpan,
    util::SubscriberInitExt, EnvFilter, Layer,
};

const DEFAULT_FILTER: &str = "yt_notion=debug,tower_http=debug,axum=debug";

/// 보관할 롤링 파일 수
const MAX_LOG_FILES: usize = 5;

/// 파일 writer 스레드의 가드
///
/// 드롭될 때 남은 로그를 파일에 다 쓰므로 `main`이 끝날 때까지 들고 있어야 합니다.
pub struct LogGuards(Vec<WorkerGuard>);

type BoxedLayer<S> = Box<dyn Layer<S> + Send + Sync>;

fn rolling_file(dir: &Path, file_name: &str) -> anyhow::Result<RollingFileAppender> {
    Ok(RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(file_name)
        .max_log_files(MAX_LOG_FILES)
        .build(dir)?)
}

/// `dir` 아래 app.log / error.log 레이어를 만듭니다.
pub fn file_layers<S>(dir: &Path) -> anyhow::Result<(Vec<BoxedLayer<S>>, LogGuards)>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    std::fs::create_dir_all(dir)?;

    let mut layers = Vec::new();
    let mut guards = Vec::new();
    for (file_name, level) in [("app.log", LevelFilter::INFO), ("error.log", LevelFilter::ERROR)] {
        let (writer, guard) = tracing_appender::non_blocking(rolling_file(dir, file_name)?);
        guards.push(guard);
        layers.push(
            fmt::layer()
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(level)
                .boxed(),
        );
    }

    Ok((layers, LogGuards(guards)))
}

/// 전역 subscriber를 설치합니다.
///
/// `RUST_LOG`가 없으면 이 크레이트와 tower_http, axum을 debug로 봅니다.
/// `log_dir`가 `None`이면 표준 출력에만 씁니다.
pub fn init(log_dir: Option<&Path>) -> anyhow::Result<Option<LogGuards>> {
    let (files, guards) = match log_dir {
        Some(dir) => {
            let (layers, guards) = file_layers(dir)?;
            (Some(layers), Some(guards))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(files)
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()))
        .with(fmt::layer())
        .try_init()?;

    Ok(guards)
}
