//! 组件工厂抽象接口
//!
//! 提供按组件类型创建和销毁实例的工厂，以及工厂注册表

use crate::component::{Instance, RawConfig};
use crate::context::Context;
use infrastructure_common::{ComponentResult, ComponentTypeId};
use std::sync::Arc;

/// 组件工厂 trait
pub trait ComponentFactory: Send + Sync {
    /// 工厂支持的组件类型，全局唯一
    fn component_type(&self) -> ComponentTypeId;

    /// 创建组件实例
    ///
    /// `config` 可以是通用的键值结构，也可以是强类型配置，由具体实现决定如何解释
    fn create_instance(&self, ctx: &Context, config: &RawConfig) -> ComponentResult<Instance>;

    /// 销毁组件实例
    fn destroy_instance(&self, ctx: &Context, instance: &Instance) -> ComponentResult<()>;
}

/// 组件工厂注册表 trait
///
/// 同一组件类型同一时刻只能注册一个工厂
pub trait FactoryRegistry: Send + Sync {
    /// 注册组件工厂
    fn register(&self, factory: Arc<dyn ComponentFactory>) -> ComponentResult<()>;

    /// 取消注册组件工厂
    fn unregister(&self, component_type: &ComponentTypeId) -> ComponentResult<()>;

    /// 获取所有已注册的组件类型，顺序无意义
    fn registered_component_types(&self) -> Vec<ComponentTypeId>;

    /// 根据组件类型获取组件工厂
    fn get_factory(&self, component_type: &ComponentTypeId)
        -> ComponentResult<Arc<dyn ComponentFactory>>;
}
