//! 引用路径解析
//!
//! 引用路径形如 `a/b/c`、`../sibling` 或 `/top/child`：
//! 以 `/` 开头表示从根容器开始，`.` 表示当前容器，`..` 表示父容器，
//! 其余段为组件名称，非末尾的名称段必须指向一个容器组件。

use di_abstractions::{Component, ComponentContainer, Instance};
use infrastructure_common::{
    is_valid_component_name, ComponentError, ComponentName, ComponentResult, CURRENT_SEGMENT,
    PARENT_SEGMENT, PATH_SEPARATOR,
};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// 引用路径中的一段
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Current,
    Parent,
    Name(ComponentName),
}

/// 解析后的引用路径
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferPath {
    raw: String,
    absolute: bool,
    segments: Vec<PathSegment>,
}

impl ReferPath {
    /// 解析引用路径
    ///
    /// 除开头的 `/` 外不允许出现空段，名称段必须满足组件名称规则
    pub fn parse(path: &str) -> ComponentResult<Self> {
        let invalid = || ComponentError::NameInvalid {
            name: path.to_string(),
        };

        let (absolute, rest) = match path.strip_prefix(PATH_SEPARATOR) {
            Some(rest) => (true, rest),
            None => (false, path),
        };

        let mut segments = Vec::new();
        if !rest.is_empty() {
            for segment in rest.split(PATH_SEPARATOR) {
                let segment = match segment {
                    CURRENT_SEGMENT => PathSegment::Current,
                    PARENT_SEGMENT => PathSegment::Parent,
                    name if is_valid_component_name(name) => PathSegment::Name(name.into()),
                    _ => return Err(invalid()),
                };
                segments.push(segment);
            }
        } else if !absolute {
            return Err(invalid());
        }

        Ok(Self {
            raw: path.to_string(),
            absolute,
            segments,
        })
    }

    pub fn is_absolute(&self) -> bool {
        self.absolute
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for ReferPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// 从 `start` 容器出发解析引用路径，返回路径指向的组件
///
/// 路径不以名称段结尾时（如 `.`、`..`、`/`），返回最终所在容器自身作为组件
pub fn resolve(start: Arc<dyn ComponentContainer>, path: &ReferPath) -> ComponentResult<Component> {
    debug!("解析引用路径: {}", path);

    let mut current = start;
    if path.is_absolute() {
        while let Some(parent) = current.parent() {
            current = parent;
        }
    }

    let last = path.segments().len().saturating_sub(1);
    for (index, segment) in path.segments().iter().enumerate() {
        match segment {
            PathSegment::Current => {}
            PathSegment::Parent => {
                current = current.parent().ok_or_else(|| ComponentError::ParentNotFound {
                    path: path.to_string(),
                })?;
            }
            PathSegment::Name(name) => {
                let component = current.get_component(name)?;
                if index == last {
                    return Ok(component);
                }
                current = component.instance.as_container().ok_or_else(|| {
                    ComponentError::NotAContainer {
                        path: path.to_string(),
                        segment: name.to_string(),
                    }
                })?;
            }
        }
    }

    let context = current.context();
    let instance = match context.mount() {
        Some(instance) => instance.clone(),
        None => Instance::container(current.clone()),
    };
    Ok(Component::new(context, instance))
}
