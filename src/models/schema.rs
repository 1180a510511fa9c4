//! 属性 schema 解析
//!
//! 为对象上的某个属性名找到约束它的子 schema，顺序是：
//! 1. `properties` 中的同名条目
//! 2. `patternProperties` 中第一个匹配的正则
//! 3. `additionalProperties`（受 `propertyNames.pattern` 限制）

use regex::Regex;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug)]
pub enum SchemaError {
    InvalidPattern { pattern: String, source: regex::Error },
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaError::InvalidPattern { pattern, source } => {
                write!(f, "invalid property name pattern {:?}: {}", pattern, source)
            }
        }
    }
}

impl std::error::Error for SchemaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SchemaError::InvalidPattern { source, .. } => Some(source),
        }
    }
}

/// schema 与可选的属性名正则；正则为空表示匹配任意名字
#[derive(Debug, Clone)]
pub struct PatternedSchema<'a> {
    pub schema: &'a Value,
    pub expression: Option<Regex>,
}

impl PatternedSchema<'_> {
    pub fn matches(&self, name: &str) -> bool {
        self.expression
            .as_ref()
            .map_or(true, |expression| expression.is_match(name))
    }
}

pub fn is_object(value: &Value) -> bool {
    value.is_object()
}

/// 能否作为 schema：布尔值或对象
pub fn is_flag_or_object(value: &Value) -> bool {
    matches!(value, Value::Bool(_) | Value::Object(_))
}

/// 比原始类型更细的类型名
pub fn get_expanded_type_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) => {
            let integral = n.is_i64()
                || n.is_u64()
                || n.as_f64().is_some_and(|f| f.is_finite() && f.fract() == 0.0);
            if integral {
                "integer"
            } else {
                "number"
            }
        }
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// 只保留值像 schema 的条目，其余静默丢弃
pub fn get_property_schemas(source: &Value) -> BTreeMap<&str, &Value> {
    let Some(map) = source.as_object() else {
        return BTreeMap::new();
    };
    map.iter()
        .filter(|(_, value)| is_flag_or_object(value))
        .map(|(key, value)| (key.as_str(), value))
        .collect()
}

fn compile(pattern: &str) -> Result<Regex, SchemaError> {
    Regex::new(pattern).map_err(|source| SchemaError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}

/// 按优先级排列的后备 schema：所有 patternProperties 在前，additionalProperties 在后
pub fn get_additional_property_schemas(
    source: &Value,
) -> Result<Vec<PatternedSchema<'_>>, SchemaError> {
    let mut schemas = Vec::new();
    if let Some(patterns) = source.get("patternProperties").and_then(Value::as_object) {
        for (pattern, schema) in patterns {
            if is_flag_or_object(schema) {
                schemas.push(PatternedSchema {
                    schema,
                    expression: Some(compile(pattern)?),
                });
            }
        }
    }
    if let Some(schema) = source
        .get("additionalProperties")
        .filter(|value| is_flag_or_object(value))
    {
        let expression = source
            .get("propertyNames")
            .and_then(Value::as_object)
            .and_then(|names| names.get("pattern"))
            .and_then(Value::as_str)
            .map(compile)
            .transpose()?;
        schemas.push(PatternedSchema { schema, expression });
    }
    Ok(schemas)
}

pub fn find_patterned_schema_for<'s, 'a>(
    patterns: &'s [PatternedSchema<'a>],
    name: &str,
) -> Option<&'s PatternedSchema<'a>> {
    patterns.iter().find(|pattern| pattern.matches(name))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyNameError {
    EmptyName,
    ReservedName,
    NoSchema,
}

impl PropertyNameError {
    /// 翻译用的消息键
    pub fn code(&self) -> &'static str {
        match self {
            PropertyNameError::EmptyName => "noEmptyPropertyName",
            PropertyNameError::ReservedName => "noReservedPropertyName",
            PropertyNameError::NoSchema => "noSchemaForProperty",
        }
    }
}

impl fmt::Display for PropertyNameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl std::error::Error for PropertyNameError {}

/// 依次检查：空名、保留名、无 schema
pub fn get_property_name_error(
    name: &str,
    reserved_names: &[String],
    schema: Option<&Value>,
) -> Option<PropertyNameError> {
    if name.is_empty() {
        return Some(PropertyNameError::EmptyName);
    }
    if reserved_names.iter().any(|reserved| reserved == name) {
        return Some(PropertyNameError::ReservedName);
    }
    if schema.is_none() {
        return Some(PropertyNameError::NoSchema);
    }
    None
}

/// 对象 schema 预编译后的视图，避免每次查找都重新编译正则
#[derive(Debug, Clone)]
pub struct ObjectSchemaResolver<'a> {
    schema: &'a Value,
    named: BTreeMap<&'a str, &'a Value>,
    additional: Vec<PatternedSchema<'a>>,
}

impl<'a> ObjectSchemaResolver<'a> {
    pub fn new(schema: &'a Value) -> Result<Self, SchemaError> {
        let named = schema
            .get("properties")
            .map(get_property_schemas)
            .unwrap_or_default();
        Ok(Self {
            schema,
            named,
            additional: get_additional_property_schemas(schema)?,
        })
    }

    pub fn named_properties(&self) -> &BTreeMap<&'a str, &'a Value> {
        &self.named
    }

    pub fn additional_properties(&self) -> &[PatternedSchema<'a>] {
        &self.additional
    }

    pub fn schema_for(&self, name: &str) -> Option<&'a Value> {
        if let Value::Bool(_) = self.schema {
            return Some(self.schema);
        }
        if let Some(schema) = self.named.get(name).copied() {
            return Some(schema);
        }
        find_patterned_schema_for(&self.additional, name).map(|entry| entry.schema)
    }

    pub fn name_error(&self, name: &str, reserved_names: &[String]) -> Option<PropertyNameError> {
        get_property_name_error(name, reserved_names, self.schema_for(name))
    }
}

/// 完整的属性解析流程
pub fn resolve_property_schema<'a>(
    schema: &'a Value,
    name: &str,
) -> Result<Option<&'a Value>, SchemaError> {
    Ok(ObjectSchemaResolver::new(schema)?.schema_for(name))
}

/// 数组元素的 schema
pub fn item_schema(schema: &Value) -> Option<&Value> {
    match schema {
        Value::Bool(_) => Some(schema),
        Value::Object(map) => map.get("items").filter(|items| is_flag_or_object(items)),
        _ => None,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/models/schema.rs"]
mod tests;
