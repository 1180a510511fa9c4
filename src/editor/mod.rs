//! 表单编辑器
//!
//! 持有文档、schema、撤销轨道与转移会话；渲染层通过它读取 schema、
//! 发起编辑。翻译器与配置在构造时注入。

use crate::models::edit_op::{array_ref, object_ref, EditError, UndoableEdit};
use crate::models::schema::{
    get_property_name_error, item_schema, resolve_property_schema, ObjectSchemaResolver,
    PropertyNameError, SchemaError,
};
use crate::models::value_path::{parse_index, ValueLocation, ValuePath};
use crate::models::{TransferSession, UndoTrack, UndoTrackConfig};
use crate::services::config::FormEditorConfig;
use crate::services::translation::{KeyedTextTranslator, TextKey, TextTranslator};
use serde_json::Value;
use std::fmt;

#[derive(Debug)]
pub enum EditorError {
    Edit(EditError),
    Schema(SchemaError),
    InvalidPropertyName {
        error: PropertyNameError,
        message: String,
    },
    PropertyExists(String),
}

impl fmt::Display for EditorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditorError::Edit(err) => write!(f, "edit failed: {}", err),
            EditorError::Schema(err) => write!(f, "schema error: {}", err),
            EditorError::InvalidPropertyName { message, .. } => f.write_str(message),
            EditorError::PropertyExists(name) => write!(f, "property {:?} already exists", name),
        }
    }
}

impl std::error::Error for EditorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EditorError::Edit(err) => Some(err),
            EditorError::Schema(err) => Some(err),
            EditorError::InvalidPropertyName { error, .. } => Some(error),
            EditorError::PropertyExists(_) => None,
        }
    }
}

impl From<EditError> for EditorError {
    fn from(err: EditError) -> Self {
        EditorError::Edit(err)
    }
}

impl From<SchemaError> for EditorError {
    fn from(err: SchemaError) -> Self {
        EditorError::Schema(err)
    }
}

pub type Result<T> = std::result::Result<T, EditorError>;

pub struct FormEditor {
    document: Value,
    schema: Value,
    history: UndoTrack,
    transfer: TransferSession,
    translator: Box<dyn TextTranslator>,
    config: FormEditorConfig,
}

impl FormEditor {
    pub fn new(
        document: Value,
        schema: Value,
        config: FormEditorConfig,
        translator: Box<dyn TextTranslator>,
    ) -> Self {
        let history = UndoTrack::new().with_config(UndoTrackConfig {
            max_applied: config.undo_limit,
        });
        Self {
            document,
            schema,
            history,
            transfer: TransferSession::new(),
            translator,
            config,
        }
    }

    /// 使用内置英文消息，再叠加配置里的翻译
    pub fn with_config(document: Value, schema: Value, config: FormEditorConfig) -> Self {
        let mut translator = KeyedTextTranslator::with_default_messages();
        translator.extend(
            config
                .translations
                .iter()
                .map(|(key, text)| (key.clone(), text.clone())),
        );
        Self::new(document, schema, config, Box::new(translator))
    }

    pub fn document(&self) -> &Value {
        &self.document
    }

    pub fn into_document(self) -> Value {
        self.document
    }

    pub fn schema(&self) -> &Value {
        &self.schema
    }

    pub fn config(&self) -> &FormEditorConfig {
        &self.config
    }

    pub fn history(&self) -> &UndoTrack {
        &self.history
    }

    pub fn transfer(&self) -> &TransferSession {
        &self.transfer
    }

    pub fn value_at(&self, path: &ValuePath) -> Option<&Value> {
        path.resolve(&self.document)
    }

    /// 沿路径同时走文档与 schema；对象用属性解析，数组用 `items`
    pub fn schema_at(&self, path: &ValuePath) -> Result<Option<&Value>> {
        let mut schema = &self.schema;
        let mut value = &self.document;
        for segment in path.segments() {
            let (next_schema, next_value) = match value {
                Value::Object(map) => (resolve_property_schema(schema, segment)?, map.get(segment)),
                Value::Array(items) => (
                    item_schema(schema),
                    parse_index(segment).and_then(|i| items.get(i)),
                ),
                _ => return Ok(None),
            };
            match (next_schema, next_value) {
                (Some(s), Some(v)) => {
                    schema = s;
                    value = v;
                }
                _ => return Ok(None),
            }
        }
        Ok(Some(schema))
    }

    pub fn property_name_error(
        &self,
        container: &ValuePath,
        name: &str,
    ) -> Result<Option<PropertyNameError>> {
        let reserved = &self.config.reserved_property_names;
        match self.schema_at(container)? {
            Some(schema) => Ok(ObjectSchemaResolver::new(schema)?.name_error(name, reserved)),
            None => Ok(get_property_name_error(name, reserved, None)),
        }
    }

    pub fn property_message(&self, error: PropertyNameError) -> String {
        self.translator.translate(TextKey::Single(error.code()), None)
    }

    pub fn translate(&self, key: TextKey<'_>) -> String {
        self.translator.translate(key, None)
    }

    /// 容器中应显示的属性名
    pub fn visible_properties(&self, container: &ValuePath) -> Result<Vec<String>> {
        let map = object_ref(&self.document, container)?;
        if !self.config.hide_unschematized_properties {
            return Ok(map.keys().cloned().collect());
        }
        let Some(schema) = self.schema_at(container)? else {
            return Ok(Vec::new());
        };
        let resolver = ObjectSchemaResolver::new(schema)?;
        Ok(map
            .keys()
            .filter(|key| resolver.schema_for(key).is_some())
            .cloned()
            .collect())
    }

    pub fn apply(&mut self, edit: UndoableEdit) -> Result<()> {
        self.history.apply(&mut self.document, edit)?;
        Ok(())
    }

    pub fn undo(&mut self) -> Result<bool> {
        Ok(self.history.undo(&mut self.document)?)
    }

    pub fn redo(&mut self) -> Result<bool> {
        Ok(self.history.redo(&mut self.document)?)
    }

    /// 新建属性：名字须通过校验且尚不存在
    pub fn add_property(&mut self, container: &ValuePath, name: &str, value: Value) -> Result<()> {
        if object_ref(&self.document, container)?.contains_key(name) {
            return Err(EditorError::PropertyExists(name.to_string()));
        }
        if let Some(error) = self.property_name_error(container, name)? {
            let message = self.property_message(error);
            tracing::debug!(name, code = error.code(), "property name rejected");
            return Err(EditorError::InvalidPropertyName { error, message });
        }
        self.apply(UndoableEdit::set_property(container.clone(), name, value))
    }

    pub fn set_property(&mut self, container: &ValuePath, key: &str, value: Value) -> Result<()> {
        self.apply(UndoableEdit::set_property(container.clone(), key, value))
    }

    pub fn remove_property(&mut self, container: &ValuePath, key: &str) -> Result<()> {
        if !object_ref(&self.document, container)?.contains_key(key) {
            return Err(EditError::PropertyNotFound {
                container: container.clone(),
                key: key.to_string(),
            }
            .into());
        }
        self.apply(UndoableEdit::delete_property(container.clone(), key))
    }

    pub fn insert_item(&mut self, container: &ValuePath, index: usize, value: Value) -> Result<()> {
        self.apply(UndoableEdit::splice(container.clone(), index, 0, vec![value]))
    }

    pub fn remove_item(&mut self, container: &ValuePath, index: usize) -> Result<()> {
        let len = array_ref(&self.document, container)?.len();
        if index >= len {
            return Err(EditError::IndexOutOfBounds {
                container: container.clone(),
                index,
                len,
            }
            .into());
        }
        self.apply(UndoableEdit::splice(container.clone(), index, 1, Vec::new()))
    }

    pub fn start_transfer(&mut self, from: ValueLocation) {
        self.transfer.start_transfer(from);
    }

    /// 完成转移并记入撤销轨道；无操作时返回 false
    pub fn complete_transfer(&mut self, to: ValueLocation) -> Result<bool> {
        match self.transfer.complete_transfer(&mut self.document, to)? {
            Some(action) => {
                self.history.push(action);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/editor/form_editor.rs"]
mod tests;
