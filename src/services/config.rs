//! 配置：表单编辑器的可调项
//!
//! 以 JSON 存储，所有字段都可省略

use crate::models::edit_history::DEFAULT_UNDO_LIMIT;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

pub const DEFAULT_LOG_FILTER: &str = "zform=info";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoggingConfig {
    /// `EnvFilter` 语法；`RUST_LOG` 优先
    pub filter: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
    pub ansi: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_LOG_FILTER.to_string(),
            directory: None,
            ansi: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FormEditorConfig {
    /// 不允许用户新建的属性名
    pub reserved_property_names: Vec<String>,
    pub undo_limit: usize,
    /// 没有 schema 的属性不显示
    pub hide_unschematized_properties: bool,
    pub translations: BTreeMap<String, String>,
    pub logging: LoggingConfig,
}

impl Default for FormEditorConfig {
    fn default() -> Self {
        Self {
            reserved_property_names: Vec::new(),
            undo_limit: DEFAULT_UNDO_LIMIT,
            hide_unschematized_properties: false,
            translations: BTreeMap::new(),
            logging: LoggingConfig::default(),
        }
    }
}

impl FormEditorConfig {
    pub fn is_reserved(&self, name: &str) -> bool {
        self.reserved_property_names.iter().any(|n| n == name)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "cannot read config {}: {}", path.display(), source)
            }
            ConfigError::Parse(err) => write!(f, "invalid config: {}", err),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Parse(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err)
    }
}

pub fn parse_config(text: &str) -> Result<FormEditorConfig, ConfigError> {
    Ok(serde_json::from_str(text)?)
}

pub fn load_config(path: &Path) -> Result<FormEditorConfig, ConfigError> {
    let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_config(&data)?;
    tracing::info!(path = %path.display(), "config loaded");
    Ok(config)
}

#[cfg(test)]
#[path = "../../tests/unit/services/config.rs"]
mod tests;
