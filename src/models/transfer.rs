//! 值转移：把一个值从一处挪到另一处，构造成单个可撤销编辑
//!
//! 典型用法是拖拽：按下时 `start_transfer`，松开时 `complete_transfer`，
//! 返回的编辑已经生效，调用方负责放进撤销轨道。

use super::edit_op::{array_ref, object_ref, EditError, UndoableEdit};
use super::value_path::{ArrayElementRef, ValueLocation};
use serde_json::Value;

/// 构造把 `from` 处的值移到 `to` 的编辑；两者是同一槽位时返回 `None`。
///
/// 两个位置都以转移前的文档为准。若源是数组元素，且目标容器位于同一数组中
/// 更靠后的元素之下，则目标路径会按移除后的下标改写。
pub fn create_transfer_action(
    document: &Value,
    from: &ValueLocation,
    to: &ValueLocation,
) -> Result<Option<UndoableEdit>, EditError> {
    if from.is_same_slot(to) {
        return Ok(None);
    }
    if to.container().starts_with(&from.path()) {
        return Err(EditError::MoveIntoDescendant);
    }

    let (removal, value, target) = match from {
        ValueLocation::Property(source) => {
            let value = object_ref(document, &source.container)?
                .get(&source.key)
                .cloned()
                .ok_or_else(|| EditError::PropertyNotFound {
                    container: source.container.clone(),
                    key: source.key.clone(),
                })?;
            let removal =
                UndoableEdit::delete_property(source.container.clone(), source.key.as_str());
            (removal, value, to.container().clone())
        }
        ValueLocation::ArrayElement(source) => {
            if let ValueLocation::ArrayElement(dest) = to {
                let dest = ArrayElementRef {
                    container: dest.container.after_removal(&source.container, source.index),
                    index: dest.index,
                };
                return Ok(Some(UndoableEdit::transfer_item(source.clone(), dest)));
            }
            let items = array_ref(document, &source.container)?;
            let value = items
                .get(source.index)
                .cloned()
                .ok_or_else(|| EditError::IndexOutOfBounds {
                    container: source.container.clone(),
                    index: source.index,
                    len: items.len(),
                })?;
            let removal =
                UndoableEdit::splice(source.container.clone(), source.index, 1, Vec::new());
            let target = to.container().after_removal(&source.container, source.index);
            (removal, value, target)
        }
    };

    let insertion = match to {
        ValueLocation::Property(dest) => {
            UndoableEdit::set_property(target, dest.key.as_str(), value)
        }
        ValueLocation::ArrayElement(dest) => {
            UndoableEdit::splice(target, dest.index, 0, vec![value])
        }
    };
    Ok(Some(UndoableEdit::sequence(vec![removal, insertion])))
}

/// 一次拖拽/剪切粘贴的交互状态；可反复使用
#[derive(Debug, Default)]
pub struct TransferSession {
    from: Option<ValueLocation>,
    to: Option<ValueLocation>,
    action: Option<UndoableEdit>,
}

impl TransferSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from(&self) -> Option<&ValueLocation> {
        self.from.as_ref()
    }

    pub fn to(&self) -> Option<&ValueLocation> {
        self.to.as_ref()
    }

    pub fn action(&self) -> Option<&UndoableEdit> {
        self.action.as_ref()
    }

    pub fn is_pending(&self) -> bool {
        self.from.is_some() && self.to.is_none()
    }

    pub fn get_action(&self, document: &Value) -> Result<Option<UndoableEdit>, EditError> {
        match (&self.from, &self.to) {
            (Some(from), Some(to)) => create_transfer_action(document, from, to),
            _ => Ok(None),
        }
    }

    pub fn start_transfer(&mut self, from: ValueLocation) {
        tracing::debug!(from = %from.path(), "start transfer");
        self.from = Some(from);
        self.to = None;
        self.action = None;
    }

    /// 计算并立即应用转移；无操作时返回 `None`
    pub fn complete_transfer(
        &mut self,
        document: &mut Value,
        to: ValueLocation,
    ) -> Result<Option<UndoableEdit>, EditError> {
        self.to = Some(to);
        self.action = None;
        let Some(mut action) = self.get_action(document)? else {
            return Ok(None);
        };
        action.redo(document)?;
        tracing::debug!(op = action.name(), edit = %action.to_json_line(), "transfer applied");
        self.action = Some(action.clone());
        Ok(Some(action))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/models/transfer.rs"]
mod tests;
