//! # Command Template Module / 命令模板模块
//!
//! Substitution of `{attribute}` placeholders in a command template with a
//! job spec's attribute values. `{{` and `}}` escape literal braces.
//!
//! 将命令模板中的 `{attribute}` 占位符替换为作业规格的属性值。
//! `{{` 和 `}}` 转义字面大括号。

use crate::core::models::JobSpec;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A command string with named placeholders, resolved once per job spec.
/// 带命名占位符的命令字符串，每个作业规格解析一次。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommandTemplate(String);

/// Why a template could not be resolved against a particular job spec.
/// Scoped to that spec; sibling jobs are unaffected.
/// 模板无法针对某个作业规格解析的原因。仅影响该规格；同级作业不受影响。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// The template references an attribute the spec does not carry.
    /// 模板引用了规格中不存在的属性。
    UnknownAttribute { placeholder: String },
    /// A `{` was never closed.
    /// 某个 `{` 没有闭合。
    UnterminatedPlaceholder,
}

impl fmt::Display for TemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateError::UnknownAttribute { placeholder } => {
                write!(f, "template references unknown attribute '{{{placeholder}}}'")
            }
            TemplateError::UnterminatedPlaceholder => {
                write!(f, "unterminated '{{' in command template")
            }
        }
    }
}

impl std::error::Error for TemplateError {}

impl CommandTemplate {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The raw, unresolved template text.
    pub fn raw(&self) -> &str {
        &self.0
    }

    /// Resolves every placeholder against the spec's attributes.
    ///
    /// 针对规格的属性解析所有占位符。
    pub fn resolve(&self, spec: &JobSpec) -> Result<String, TemplateError> {
        let mut resolved = String::with_capacity(self.0.len());
        let mut chars = self.0.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    resolved.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    resolved.push('}');
                }
                '{' => {
                    let mut placeholder = String::new();
                    loop {
                        match chars.next() {
                            Some('}') => break,
                            Some(inner) => placeholder.push(inner),
                            None => return Err(TemplateError::UnterminatedPlaceholder),
                        }
                    }
                    match spec.get(placeholder.trim()) {
                        Some(value) => resolved.push_str(&value.to_string()),
                        None => {
                            return Err(TemplateError::UnknownAttribute { placeholder });
                        }
                    }
                }
                other => resolved.push(other),
            }
        }

        Ok(resolved)
    }
}

impl fmt::Display for CommandTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
