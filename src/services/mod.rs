//! 服务层
//!
//! - config: 编辑器配置
//! - lookup: 按类型/按 schema 字段查值
//! - translation: 文本解析

pub mod config;
pub mod lookup;
pub mod translation;

pub use config::{load_config, parse_config, ConfigError, FormEditorConfig, LoggingConfig};
pub use lookup::{ConversionFactory, LookupViaSchemaProperty, TypeMappedValueFactory};
pub use translation::{
    echo_key_text, EchoTextTranslator, KeyedTextTranslator, TextContext, TextKey, TextTranslator,
};
