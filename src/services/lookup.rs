//! 按类型查值
//!
//! 编辑器的很多行为（默认值、用哪个编辑组件、图标）只取决于值的类型或
//! schema 上的某个字段，这里提供两种可互换的查找策略。

use crate::models::schema::get_expanded_type_of;
use rustc_hash::FxHashMap;
use serde_json::Value;

/// 给定源值与可选的上下文 schema，得出一个值
pub trait ConversionFactory {
    type Output;

    fn process(&self, source: &Value, context: Option<&Value>) -> Option<&Self::Output>;
}

/// 先按源值的扩展类型名查；查不到再用上下文 schema 的 `type` 字段
#[derive(Debug, Clone)]
pub struct TypeMappedValueFactory<T> {
    type_values: FxHashMap<String, T>,
}

impl<T> Default for TypeMappedValueFactory<T> {
    fn default() -> Self {
        Self {
            type_values: FxHashMap::default(),
        }
    }
}

impl<T> TypeMappedValueFactory<T> {
    pub fn new<I, K>(type_values: I) -> Self
    where
        I: IntoIterator<Item = (K, T)>,
        K: Into<String>,
    {
        Self {
            type_values: type_values
                .into_iter()
                .map(|(key, value)| (key.into(), value))
                .collect(),
        }
    }

    pub fn insert(&mut self, type_name: impl Into<String>, value: T) -> Option<T> {
        self.type_values.insert(type_name.into(), value)
    }

    pub fn get(&self, type_name: &str) -> Option<&T> {
        self.type_values.get(type_name)
    }
}

impl<T> ConversionFactory for TypeMappedValueFactory<T> {
    type Output = T;

    fn process(&self, source: &Value, context: Option<&Value>) -> Option<&T> {
        if let Some(value) = self.type_values.get(get_expanded_type_of(source)) {
            return Some(value);
        }
        let type_name = context?.as_object()?.get("type")?.as_str()?;
        self.type_values.get(type_name)
    }
}

/// 读取 schema 上指定字段（如 `format`）的字符串值作为键
#[derive(Debug, Clone)]
pub struct LookupViaSchemaProperty<T> {
    property: String,
    values: FxHashMap<String, T>,
}

impl<T> LookupViaSchemaProperty<T> {
    pub fn new<I, K>(property: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = (K, T)>,
        K: Into<String>,
    {
        Self {
            property: property.into(),
            values: values
                .into_iter()
                .map(|(key, value)| (key.into(), value))
                .collect(),
        }
    }

    pub fn property(&self) -> &str {
        &self.property
    }

    pub fn insert(&mut self, key: impl Into<String>, value: T) -> Option<T> {
        self.values.insert(key.into(), value)
    }
}

impl<T> ConversionFactory for LookupViaSchemaProperty<T> {
    type Output = T;

    fn process(&self, _source: &Value, schema: Option<&Value>) -> Option<&T> {
        let key = schema?.as_object()?.get(&self.property)?.as_str()?;
        self.values.get(key)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/services/lookup.rs"]
mod tests;
