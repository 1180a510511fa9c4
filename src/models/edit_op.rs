//! 可撤销的编辑原语
//!
//! 每个原语都同时知道正向（redo）与逆向（undo）的做法；redo 时记下被覆盖的值，
//! undo 时据此还原。`Sequence` 把多个原语组合为一个原子单元。

use super::value_path::{ArrayElementRef, ValuePath};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum EditError {
    InvalidPointer(String),
    ContainerNotFound(ValuePath),
    NotAnObject(ValuePath),
    NotAnArray(ValuePath),
    IndexOutOfBounds {
        container: ValuePath,
        index: usize,
        len: usize,
    },
    PropertyNotFound {
        container: ValuePath,
        key: String,
    },
    MoveIntoDescendant,
}

impl fmt::Display for EditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditError::InvalidPointer(pointer) => write!(f, "invalid value path: {:?}", pointer),
            EditError::ContainerNotFound(path) => write!(f, "no value at {:?}", path.to_string()),
            EditError::NotAnObject(path) => {
                write!(f, "value at {:?} is not an object", path.to_string())
            }
            EditError::NotAnArray(path) => {
                write!(f, "value at {:?} is not an array", path.to_string())
            }
            EditError::IndexOutOfBounds {
                container,
                index,
                len,
            } => write!(
                f,
                "index {} out of bounds for array at {:?} (len {})",
                index,
                container.to_string(),
                len
            ),
            EditError::PropertyNotFound { container, key } => {
                write!(f, "no property {:?} at {:?}", key, container.to_string())
            }
            EditError::MoveIntoDescendant => write!(f, "cannot move a value into its own subtree"),
        }
    }
}

impl std::error::Error for EditError {}

pub(crate) fn object_at<'a>(
    root: &'a mut Value,
    container: &ValuePath,
) -> Result<&'a mut Map<String, Value>, EditError> {
    match container.resolve_mut(root) {
        Some(Value::Object(map)) => Ok(map),
        Some(_) => Err(EditError::NotAnObject(container.clone())),
        None => Err(EditError::ContainerNotFound(container.clone())),
    }
}

pub(crate) fn array_at<'a>(
    root: &'a mut Value,
    container: &ValuePath,
) -> Result<&'a mut Vec<Value>, EditError> {
    match container.resolve_mut(root) {
        Some(Value::Array(items)) => Ok(items),
        Some(_) => Err(EditError::NotAnArray(container.clone())),
        None => Err(EditError::ContainerNotFound(container.clone())),
    }
}

pub(crate) fn object_ref<'a>(
    root: &'a Value,
    container: &ValuePath,
) -> Result<&'a Map<String, Value>, EditError> {
    match container.resolve(root) {
        Some(Value::Object(map)) => Ok(map),
        Some(_) => Err(EditError::NotAnObject(container.clone())),
        None => Err(EditError::ContainerNotFound(container.clone())),
    }
}

pub(crate) fn array_ref<'a>(
    root: &'a Value,
    container: &ValuePath,
) -> Result<&'a Vec<Value>, EditError> {
    match container.resolve(root) {
        Some(Value::Array(items)) => Ok(items),
        Some(_) => Err(EditError::NotAnArray(container.clone())),
        None => Err(EditError::ContainerNotFound(container.clone())),
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum UndoableEdit {
    #[serde(rename_all = "camelCase")]
    DeleteProperty {
        container: ValuePath,
        key: String,
        /// redo 时被删除的值
        #[serde(default, skip_serializing_if = "Option::is_none")]
        previous: Option<Value>,
        /// 被删除键原来的位置，undo 时插回原处
        #[serde(default, skip_serializing_if = "Option::is_none")]
        position: Option<usize>,
    },
    #[serde(rename_all = "camelCase")]
    SetProperty {
        container: ValuePath,
        key: String,
        value: Value,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        previous: Option<Value>,
    },
    #[serde(rename_all = "camelCase")]
    Splice {
        container: ValuePath,
        index: usize,
        delete_count: usize,
        items: Vec<Value>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        removed: Vec<Value>,
    },
    /// 数组元素之间的直接移动；`to.index` 是移除之后的下标
    TransferItem {
        from: ArrayElementRef,
        to: ArrayElementRef,
    },
    Sequence {
        edits: Vec<UndoableEdit>,
    },
}

impl UndoableEdit {
    pub fn delete_property(container: ValuePath, key: impl Into<String>) -> Self {
        UndoableEdit::DeleteProperty {
            container,
            key: key.into(),
            previous: None,
            position: None,
        }
    }

    pub fn set_property(container: ValuePath, key: impl Into<String>, value: Value) -> Self {
        UndoableEdit::SetProperty {
            container,
            key: key.into(),
            value,
            previous: None,
        }
    }

    pub fn splice(
        container: ValuePath,
        index: usize,
        delete_count: usize,
        items: Vec<Value>,
    ) -> Self {
        UndoableEdit::Splice {
            container,
            index,
            delete_count,
            items,
            removed: Vec::new(),
        }
    }

    pub fn transfer_item(from: ArrayElementRef, to: ArrayElementRef) -> Self {
        UndoableEdit::TransferItem { from, to }
    }

    pub fn sequence(edits: Vec<UndoableEdit>) -> Self {
        UndoableEdit::Sequence { edits }
    }

    pub fn name(&self) -> &'static str {
        match self {
            UndoableEdit::DeleteProperty { .. } => "deleteProperty",
            UndoableEdit::SetProperty { .. } => "setProperty",
            UndoableEdit::Splice { .. } => "splice",
            UndoableEdit::TransferItem { .. } => "transferItem",
            UndoableEdit::Sequence { .. } => "sequence",
        }
    }

    pub fn redo(&mut self, root: &mut Value) -> Result<(), EditError> {
        match self {
            UndoableEdit::DeleteProperty {
                container,
                key,
                previous,
                position,
            } => {
                let map = object_at(root, container)?;
                *position = map.keys().position(|k| k == key);
                *previous = map.shift_remove(key.as_str());
                Ok(())
            }
            UndoableEdit::SetProperty {
                container,
                key,
                value,
                previous,
            } => {
                *previous = object_at(root, container)?.insert(key.clone(), value.clone());
                Ok(())
            }
            UndoableEdit::Splice {
                container,
                index,
                delete_count,
                items,
                removed,
            } => {
                let array = array_at(root, container)?;
                let start = *index;
                if start > array.len() {
                    return Err(EditError::IndexOutOfBounds {
                        container: container.clone(),
                        index: start,
                        len: array.len(),
                    });
                }
                let end = start + (*delete_count).min(array.len() - start);
                *removed = array.splice(start..end, items.iter().cloned()).collect();
                Ok(())
            }
            UndoableEdit::TransferItem { from, to } => move_element(root, from, to),
            UndoableEdit::Sequence { edits } => {
                for i in 0..edits.len() {
                    if let Err(err) = edits[i].redo(root) {
                        tracing::warn!(step = i, error = %err, "sequence redo failed, rolling back");
                        for done in edits[..i].iter_mut().rev() {
                            if let Err(rollback) = done.undo(root) {
                                tracing::error!(
                                    step = i,
                                    error = %err,
                                    rollback = %rollback,
                                    "sequence rollback failed, document left partially applied"
                                );
                                break;
                            }
                        }
                        return Err(err);
                    }
                }
                Ok(())
            }
        }
    }

    pub fn undo(&mut self, root: &mut Value) -> Result<(), EditError> {
        match self {
            UndoableEdit::DeleteProperty {
                container,
                key,
                previous,
                position,
            } => {
                let map = object_at(root, container)?;
                if let Some(value) = previous.take() {
                    let index = position.take().unwrap_or(map.len()).min(map.len());
                    map.shift_insert(index, key.clone(), value);
                }
                Ok(())
            }
            UndoableEdit::SetProperty {
                container,
                key,
                previous,
                ..
            } => {
                let map = object_at(root, container)?;
                match previous.take() {
                    Some(value) => {
                        map.insert(key.clone(), value);
                    }
                    None => {
                        map.shift_remove(key.as_str());
                    }
                }
                Ok(())
            }
            UndoableEdit::Splice {
                container,
                index,
                items,
                removed,
                ..
            } => {
                let array = array_at(root, container)?;
                let end = *index + items.len();
                if end > array.len() {
                    return Err(EditError::IndexOutOfBounds {
                        container: container.clone(),
                        index: end,
                        len: array.len(),
                    });
                }
                drop(array.splice(*index..end, removed.drain(..)));
                Ok(())
            }
            UndoableEdit::TransferItem { from, to } => move_element(root, to, from),
            UndoableEdit::Sequence { edits } => {
                let count = edits.len();
                for i in (0..count).rev() {
                    if let Err(err) = edits[i].undo(root) {
                        tracing::warn!(step = i, error = %err, "sequence undo failed, rolling back");
                        for done in edits[i + 1..].iter_mut() {
                            if let Err(rollback) = done.redo(root) {
                                tracing::error!(
                                    step = i,
                                    error = %err,
                                    rollback = %rollback,
                                    "sequence rollback failed, document left partially undone"
                                );
                                break;
                            }
                        }
                        return Err(err);
                    }
                }
                Ok(())
            }
        }
    }

    pub fn to_json_line(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn from_json_line(line: &str) -> Option<Self> {
        serde_json::from_str(line).ok()
    }
}

/// 把 `from` 处的元素挪到 `to`；目标无效时先把元素放回原处再报错
fn move_element(
    root: &mut Value,
    from: &ArrayElementRef,
    to: &ArrayElementRef,
) -> Result<(), EditError> {
    let source = array_at(root, &from.container)?;
    if from.index >= source.len() {
        return Err(EditError::IndexOutOfBounds {
            container: from.container.clone(),
            index: from.index,
            len: source.len(),
        });
    }
    let value = source.remove(from.index);

    let error = match array_at(root, &to.container) {
        Ok(target) if to.index <= target.len() => {
            target.insert(to.index, value);
            return Ok(());
        }
        Ok(target) => EditError::IndexOutOfBounds {
            container: to.container.clone(),
            index: to.index,
            len: target.len(),
        },
        Err(err) => err,
    };

    array_at(root, &from.container)?.insert(from.index, value);
    Err(error)
}

#[cfg(test)]
#[path = "../../tests/unit/models/edit_op.rs"]
mod tests;
