//! 组件工厂注册表实现

use di_abstractions::{ComponentFactory, FactoryRegistry};
use infrastructure_common::{ComponentError, ComponentResult, ComponentTypeId};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// 进程级默认工厂注册表
///
/// 仅供顶层便捷使用；容器内部只使用自身持有的注册表
static DEFAULT_FACTORY_REGISTRY: Lazy<Arc<FactoryRegistryImpl>> =
    Lazy::new(|| Arc::new(FactoryRegistryImpl::new()));

/// 获取进程级默认工厂注册表
pub fn default_factory_registry() -> Arc<FactoryRegistryImpl> {
    DEFAULT_FACTORY_REGISTRY.clone()
}

/// 基于读写锁的组件工厂注册表
#[derive(Default)]
pub struct FactoryRegistryImpl {
    factories: RwLock<HashMap<ComponentTypeId, Arc<dyn ComponentFactory>>>,
}

impl FactoryRegistryImpl {
    /// 创建新的空注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 已注册的工厂数量
    pub fn len(&self) -> usize {
        self.factories.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.read().is_empty()
    }
}

impl std::fmt::Debug for FactoryRegistryImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FactoryRegistryImpl")
            .field("component_types", &self.registered_component_types())
            .finish()
    }
}

impl FactoryRegistry for FactoryRegistryImpl {
    fn register(&self, factory: Arc<dyn ComponentFactory>) -> ComponentResult<()> {
        let component_type = factory.component_type();
        let mut factories = self.factories.write();
        if factories.contains_key(&component_type) {
            return Err(ComponentError::TypeAlreadyRegistered {
                type_id: component_type.to_string(),
            });
        }
        debug!("注册组件工厂: {}", component_type);
        factories.insert(component_type, factory);
        Ok(())
    }

    fn unregister(&self, component_type: &ComponentTypeId) -> ComponentResult<()> {
        let mut factories = self.factories.write();
        if factories.remove(component_type).is_none() {
            return Err(ComponentError::TypeNotRegistered {
                type_id: component_type.to_string(),
            });
        }
        debug!("取消注册组件工厂: {}", component_type);
        Ok(())
    }

    fn registered_component_types(&self) -> Vec<ComponentTypeId> {
        self.factories.read().keys().cloned().collect()
    }

    fn get_factory(
        &self,
        component_type: &ComponentTypeId,
    ) -> ComponentResult<Arc<dyn ComponentFactory>> {
        self.factories
            .read()
            .get(component_type)
            .cloned()
            .ok_or_else(|| ComponentError::TypeNotRegistered {
                type_id: component_type.to_string(),
            })
    }
}
