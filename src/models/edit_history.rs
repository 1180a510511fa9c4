//! 撤销轨道
//!
//! 两个栈：已应用（applied）与已撤销（undone）。
//! - push 记录一次已经生效的编辑，并清空 undone
//! - undo/redo 在两个栈之间搬运编辑，同时作用于文档

use super::edit_op::{EditError, UndoableEdit};
use serde_json::Value;

/// 默认最多保留的已应用编辑数
pub const DEFAULT_UNDO_LIMIT: usize = 100;

#[derive(Clone, Debug)]
pub struct UndoTrackConfig {
    /// 0 表示不限
    pub max_applied: usize,
}

impl Default for UndoTrackConfig {
    fn default() -> Self {
        Self {
            max_applied: DEFAULT_UNDO_LIMIT,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct UndoTrack {
    applied: Vec<UndoableEdit>,
    undone: Vec<UndoableEdit>,
    config: UndoTrackConfig,
}

impl UndoTrack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: UndoTrackConfig) -> Self {
        self.config = config;
        self.trim();
        self
    }

    pub fn config(&self) -> &UndoTrackConfig {
        &self.config
    }

    pub fn applied_actions(&self) -> &[UndoableEdit] {
        &self.applied
    }

    pub fn undone_actions(&self) -> &[UndoableEdit] {
        &self.undone
    }

    pub fn can_undo(&self) -> bool {
        !self.applied.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.undone.is_empty()
    }

    /// 记录一个已经 redo 过的编辑
    pub fn push(&mut self, edit: UndoableEdit) {
        tracing::debug!(op = edit.name(), edit = %edit.to_json_line(), "push edit");
        self.applied.push(edit);
        self.undone.clear();
        self.trim();
    }

    /// 应用并记录
    pub fn apply(&mut self, document: &mut Value, mut edit: UndoableEdit) -> Result<(), EditError> {
        edit.redo(document)?;
        self.push(edit);
        Ok(())
    }

    pub fn undo(&mut self, document: &mut Value) -> Result<bool, EditError> {
        let Some(mut edit) = self.applied.pop() else {
            return Ok(false);
        };
        if let Err(err) = edit.undo(document) {
            tracing::warn!(op = edit.name(), error = %err, "undo failed");
            self.applied.push(edit);
            return Err(err);
        }
        tracing::debug!(op = edit.name(), "undo");
        self.undone.push(edit);
        Ok(true)
    }

    pub fn redo(&mut self, document: &mut Value) -> Result<bool, EditError> {
        let Some(mut edit) = self.undone.pop() else {
            return Ok(false);
        };
        if let Err(err) = edit.redo(document) {
            tracing::warn!(op = edit.name(), error = %err, "redo failed");
            self.undone.push(edit);
            return Err(err);
        }
        tracing::debug!(op = edit.name(), "redo");
        self.applied.push(edit);
        Ok(true)
    }

    pub fn clear(&mut self) {
        self.applied.clear();
        self.undone.clear();
    }

    fn trim(&mut self) {
        let limit = self.config.max_applied;
        if limit > 0 && self.applied.len() > limit {
            let excess = self.applied.len() - limit;
            self.applied.drain(..excess);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/models/edit_history.rs"]
mod tests;
