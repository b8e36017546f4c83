//! 组件构造上下文

use crate::component::{ComponentConfig, Instance};
use crate::container::ComponentContainer;
use infrastructure_common::{ComponentError, ComponentName, ComponentResult};
use std::fmt;
use std::sync::{Arc, Weak};

/// 构造组件时使用的上下文
///
/// 持有所属容器的弱引用、组件描述，以及构造完成后的组件实例
#[derive(Clone, Default)]
pub struct Context {
    container: Option<Weak<dyn ComponentContainer>>,
    config: ComponentConfig,
    mount: Option<Instance>,
}

impl Context {
    /// 创建属于某个容器的上下文
    pub fn new(container: Weak<dyn ComponentContainer>, config: ComponentConfig) -> Self {
        Self {
            container: Some(container),
            config,
            mount: None,
        }
    }

    /// 创建不属于任何容器的上下文（根容器自身）
    pub fn detached(config: ComponentConfig) -> Self {
        Self {
            container: None,
            config,
            mount: None,
        }
    }

    /// 挂载构造完成的实例
    pub fn with_mount(mut self, instance: Instance) -> Self {
        self.mount = Some(instance);
        self
    }

    /// 所属容器
    pub fn container(&self) -> Option<Arc<dyn ComponentContainer>> {
        self.container.as_ref().and_then(Weak::upgrade)
    }

    /// 所属容器，不存在时报错
    pub fn require_container(&self) -> ComponentResult<Arc<dyn ComponentContainer>> {
        self.container().ok_or_else(|| {
            ComponentError::config_invalid(self.config.name.as_str(), "上下文不属于任何容器")
        })
    }

    pub fn config(&self) -> &ComponentConfig {
        &self.config
    }

    pub fn name(&self) -> &ComponentName {
        &self.config.name
    }

    /// 构造完成后的组件实例
    pub fn mount(&self) -> Option<&Instance> {
        self.mount.as_ref()
    }

    /// 沿父容器一路向上，返回根容器自身的上下文
    pub fn find_root(&self) -> Context {
        let Some(mut current) = self.container() else {
            return self.clone();
        };
        while let Some(parent) = current.parent() {
            current = parent;
        }
        current.context()
    }

    /// 从根容器到当前组件的名称路径
    ///
    /// 根容器本身不计入路径
    pub fn absolute_path(&self) -> Vec<ComponentName> {
        let mut path = vec![self.config.name.clone()];
        let mut current = self.container();
        while let Some(node) = current {
            let parent = node.parent();
            if parent.is_none() {
                break;
            }
            path.push(node.context().config.name.clone());
            current = parent;
        }
        path.reverse();
        path
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("has_container", &self.container.is_some())
            .field("config", &self.config)
            .field("mount", &self.mount)
            .finish()
    }
}
