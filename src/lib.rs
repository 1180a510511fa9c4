//! zform - 基于 schema 的可撤销表单编辑核心
//!
//! 模块结构：
//! - models: 数据模型（属性 schema 解析、值路径、可撤销编辑、撤销轨道、值转移）
//! - services: 服务层（配置、按类型查值、文本解析）
//! - editor: 表单编辑器（把以上组合起来供渲染层调用）
//! - logging: tracing 初始化

pub mod editor;
pub mod logging;
pub mod models;
pub mod services;

pub use editor::{EditorError, FormEditor};
