//! 值路径与位置引用
//!
//! - ValuePath: 从文档根定位某个容器（JSON Pointer 语义）
//! - ValueLocation: 对象属性或数组槽位，二者之一

use super::edit_op::EditError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// 文档内的路径（RFC 6901 reference tokens）
#[derive(Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ValuePath {
    segments: Vec<String>,
}

impl ValuePath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// 解析 JSON Pointer：空串为根，其余必须以 `/` 开头
    pub fn parse_pointer(pointer: &str) -> Result<Self, EditError> {
        if pointer.is_empty() {
            return Ok(Self::root());
        }
        let Some(rest) = pointer.strip_prefix('/') else {
            return Err(EditError::InvalidPointer(pointer.to_string()));
        };
        let segments = rest
            .split('/')
            .map(unescape_token)
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| EditError::InvalidPointer(pointer.to_string()))?;
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Self { segments }
    }

    pub fn index(&self, index: usize) -> Self {
        self.child(index.to_string())
    }

    pub fn parent(&self) -> Option<(Self, &str)> {
        let (last, rest) = self.segments.split_last()?;
        Some((
            Self {
                segments: rest.to_vec(),
            },
            last.as_str(),
        ))
    }

    pub fn starts_with(&self, prefix: &ValuePath) -> bool {
        self.segments.starts_with(&prefix.segments)
    }

    pub fn resolve<'a>(&self, root: &'a Value) -> Option<&'a Value> {
        let mut current = root;
        for segment in &self.segments {
            current = match current {
                Value::Object(map) => map.get(segment)?,
                Value::Array(items) => items.get(parse_index(segment)?)?,
                _ => return None,
            };
        }
        Some(current)
    }

    pub fn resolve_mut<'a>(&self, root: &'a mut Value) -> Option<&'a mut Value> {
        let mut current = root;
        for segment in &self.segments {
            current = match current {
                Value::Object(map) => map.get_mut(segment)?,
                Value::Array(items) => items.get_mut(parse_index(segment)?)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// 从 `container` 的 `index` 处移除一个元素后，本路径应指向的新位置。
    ///
    /// 只有经过 `container` 且下一段是更大下标的路径会左移一位。
    pub fn after_removal(&self, container: &ValuePath, index: usize) -> ValuePath {
        let depth = container.len();
        if self.len() <= depth || !self.starts_with(container) {
            return self.clone();
        }
        match parse_index(&self.segments[depth]) {
            Some(i) if i > index => {
                let mut segments = self.segments.clone();
                segments[depth] = (i - 1).to_string();
                Self { segments }
            }
            _ => self.clone(),
        }
    }
}

/// 只接受规范十进制下标（无前导零）
pub(crate) fn parse_index(segment: &str) -> Option<usize> {
    if segment.len() > 1 && segment.starts_with('0') {
        return None;
    }
    if !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}

fn unescape_token(raw: &str) -> Option<String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(ch) = chars.next() {
        if ch != '~' {
            out.push(ch);
            continue;
        }
        match chars.next()? {
            '0' => out.push('~'),
            '1' => out.push('/'),
            _ => return None,
        }
    }
    Some(out)
}

impl fmt::Display for ValuePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            write!(f, "/{}", segment.replace('~', "~0").replace('/', "~1"))?;
        }
        Ok(())
    }
}

impl fmt::Debug for ValuePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ValuePath({:?})", self.to_string())
    }
}

impl FromStr for ValuePath {
    type Err = EditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_pointer(s)
    }
}

impl TryFrom<String> for ValuePath {
    type Error = EditError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse_pointer(&value)
    }
}

impl From<ValuePath> for String {
    fn from(path: ValuePath) -> Self {
        path.to_string()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PropertyRef {
    pub container: ValuePath,
    pub key: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArrayElementRef {
    pub container: ValuePath,
    pub index: usize,
}

/// 值所在的位置：对象属性或数组槽位
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ValueLocation {
    Property(PropertyRef),
    ArrayElement(ArrayElementRef),
}

impl ValueLocation {
    pub fn property(container: ValuePath, key: impl Into<String>) -> Self {
        ValueLocation::Property(PropertyRef {
            container,
            key: key.into(),
        })
    }

    pub fn element(container: ValuePath, index: usize) -> Self {
        ValueLocation::ArrayElement(ArrayElementRef { container, index })
    }

    pub fn container(&self) -> &ValuePath {
        match self {
            ValueLocation::Property(p) => &p.container,
            ValueLocation::ArrayElement(e) => &e.container,
        }
    }

    /// 值本身的完整路径
    pub fn path(&self) -> ValuePath {
        match self {
            ValueLocation::Property(p) => p.container.child(p.key.as_str()),
            ValueLocation::ArrayElement(e) => e.container.index(e.index),
        }
    }

    /// 同一种位置、同一容器、同一 key/下标
    pub fn is_same_slot(&self, other: &ValueLocation) -> bool {
        match (self, other) {
            (ValueLocation::Property(a), ValueLocation::Property(b)) => a == b,
            (ValueLocation::ArrayElement(a), ValueLocation::ArrayElement(b)) => a == b,
            _ => false,
        }
    }

    pub fn resolve<'a>(&self, root: &'a Value) -> Option<&'a Value> {
        self.path().resolve(root)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/models/value_path.rs"]
mod tests;
