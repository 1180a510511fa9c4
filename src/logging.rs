//! tracing 初始化
//!
//! 日志只写入按天滚动的文件；过滤规则优先取 `RUST_LOG`，否则用配置里的 filter。

use std::io;
use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::services::config::{LoggingConfig, DEFAULT_LOG_FILTER};

pub const LOG_FILE_PREFIX: &str = "zform.log";

/// 持有后台写线程；drop 时刷盘
pub struct LoggingGuard {
    _guard: WorkerGuard,
    log_dir: PathBuf,
}

impl LoggingGuard {
    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }
}

fn resolve_log_dir(config: &LoggingConfig) -> io::Result<PathBuf> {
    let dir = config
        .directory
        .clone()
        .unwrap_or_else(|| std::env::temp_dir().join("zform").join("logs"));
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// 配置里的 filter 写错时退回默认值，而不是放弃初始化
fn config_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_new(config.filter.as_str()).unwrap_or_else(|err| {
        eprintln!(
            "zform: invalid log filter {:?} ({}), using {:?}",
            config.filter, err, DEFAULT_LOG_FILTER
        );
        EnvFilter::new(DEFAULT_LOG_FILTER)
    })
}

/// 安装全局 subscriber；已安装或目录不可用时返回 None
pub fn init(config: &LoggingConfig) -> Option<LoggingGuard> {
    let log_dir = resolve_log_dir(config).ok()?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| config_filter(config));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(config.ansi)
                .with_target(true),
        )
        .try_init()
        .ok()?;

    tracing::info!(log_dir = %log_dir.display(), "tracing initialized");

    Some(LoggingGuard {
        _guard: guard,
        log_dir,
    })
}

#[cfg(test)]
#[path = "../tests/unit/logging.rs"]
mod tests;
