//! 文本解析：把消息键（或一串候选键）解析为显示文本

use rustc_hash::FxHashMap;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextKey<'a> {
    Single(&'a str),
    /// 依次尝试的候选键
    Chain(&'a [&'a str]),
}

impl<'a> From<&'a str> for TextKey<'a> {
    fn from(key: &'a str) -> Self {
        TextKey::Single(key)
    }
}

impl<'a> From<&'a [&'a str]> for TextKey<'a> {
    fn from(keys: &'a [&'a str]) -> Self {
        TextKey::Chain(keys)
    }
}

impl<'a, const N: usize> From<&'a [&'a str; N]> for TextKey<'a> {
    fn from(keys: &'a [&'a str; N]) -> Self {
        TextKey::Chain(keys)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TextContext<'a> {
    /// 直接给出的文本
    Literal(&'a str),
    /// 插值参数
    Values(&'a Value),
}

pub trait TextTranslator {
    fn translate(&self, key: TextKey<'_>, context: Option<&TextContext<'_>>) -> String;
}

/// 无本地化时的回退：字面文本优先，否则原样返回键
pub fn echo_key_text(key: TextKey<'_>, context: Option<&TextContext<'_>>) -> String {
    if let Some(TextContext::Literal(text)) = context {
        return text.to_string();
    }
    match key {
        TextKey::Single(key) => key.to_string(),
        TextKey::Chain(keys) => keys.first().map(|key| key.to_string()).unwrap_or_default(),
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EchoTextTranslator;

impl TextTranslator for EchoTextTranslator {
    fn translate(&self, key: TextKey<'_>, context: Option<&TextContext<'_>>) -> String {
        echo_key_text(key, context)
    }
}

const DEFAULT_MESSAGES: &[(&str, &str)] = &[
    ("noEmptyPropertyName", "Property name cannot be empty."),
    ("noReservedPropertyName", "That property name is reserved."),
    ("noSchemaForProperty", "No schema allows a property with that name."),
    ("undo", "Undo"),
    ("redo", "Redo"),
];

/// 基于字典的翻译
#[derive(Debug, Clone, Default)]
pub struct KeyedTextTranslator {
    translations: FxHashMap<String, String>,
}

impl KeyedTextTranslator {
    pub fn new<I, K, V>(translations: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut translator = Self::default();
        translator.extend(translations);
        translator
    }

    pub fn with_default_messages() -> Self {
        Self::new(DEFAULT_MESSAGES.iter().copied())
    }

    pub fn extend<I, K, V>(&mut self, translations: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.translations.extend(
            translations
                .into_iter()
                .map(|(key, text)| (key.into(), text.into())),
        );
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.translations.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.translations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.translations.is_empty()
    }
}

impl TextTranslator for KeyedTextTranslator {
    /// 字面文本上下文在这里不生效
    fn translate(&self, key: TextKey<'_>, _context: Option<&TextContext<'_>>) -> String {
        match key {
            TextKey::Single(key) => self.get(key).unwrap_or(key).to_string(),
            TextKey::Chain(keys) => keys
                .iter()
                .find_map(|key| self.get(key))
                .or_else(|| keys.first().copied())
                .unwrap_or_default()
                .to_string(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/services/translation.rs"]
mod tests;
