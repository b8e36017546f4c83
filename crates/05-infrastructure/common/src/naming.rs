//! 组件名称与组件类型的约定
//!
//! 组件名称必须满足标识符规则：字母或下划线开头，后跟字母、数字或下划线。

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// 引用路径中表示当前容器的段
pub const CURRENT_SEGMENT: &str = ".";
/// 引用路径中表示父容器的段
pub const PARENT_SEGMENT: &str = "..";
/// 引用路径分隔符
pub const PATH_SEPARATOR: char = '/';

static COMPONENT_NAME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap_or_else(|e| unreachable!("{e}"))
});

/// 检查字符串是否为合法的组件名称
pub fn is_valid_component_name(name: &str) -> bool {
    COMPONENT_NAME_REGEX.is_match(name)
}

/// 组件名称
///
/// 空名称表示匿名组件
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentName(String);

impl ComponentName {
    /// 创建组件名称（不做校验）
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// 名称是否满足标识符规则
    pub fn validate(&self) -> bool {
        is_valid_component_name(&self.0)
    }

    /// 是否为匿名（空）名称
    pub fn is_anonymous(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ComponentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ComponentName {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ComponentName {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Borrow<str> for ComponentName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// 组件类型标识
///
/// 空值表示描述不通过工厂构造（引用组件）
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentTypeId(String);

impl ComponentTypeId {
    pub fn new(type_id: impl Into<String>) -> Self {
        Self(type_id.into())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ComponentTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ComponentTypeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ComponentTypeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}
