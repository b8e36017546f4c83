//! 组件容器抽象接口
//!
//! 组件容器是容器树上的一个节点，持有一组具名组件

use crate::component::{Component, ComponentConfig};
use crate::context::Context;
use crate::factory::FactoryRegistry;
use infrastructure_common::{ComponentName, ComponentResult};
use std::sync::Arc;

/// 组件容器 trait
///
/// 容器本身也可以作为组件存放在父容器中
pub trait ComponentContainer: Send + Sync {
    /// 容器自身作为组件时的上下文
    fn context(&self) -> Context;

    /// 该容器使用的组件工厂注册表
    fn factory_registry(&self) -> Arc<dyn FactoryRegistry>;

    /// 获取所有已加载的组件名
    fn loaded_component_names(&self) -> Vec<ComponentName>;

    /// 加载一批具名组件，按依赖关系的拓扑顺序依次构造
    fn load_named_components(&self, configs: Vec<ComponentConfig>) -> ComponentResult<()>;

    /// 卸载一批具名组件；`recursive` 为真时连同依赖它们的组件一起卸载
    fn unload_named_components(&self, names: &[ComponentName], recursive: bool)
        -> ComponentResult<()>;

    /// 立即加载一个匿名组件，其生命周期由调用方管理
    fn load_anonymous_component(&self, config: ComponentConfig) -> ComponentResult<Component>;

    /// 获取一个已加载的具名组件
    fn get_component(&self, name: &ComponentName) -> ComponentResult<Component>;

    /// 直接放入一个组件，同名组件会被覆盖
    fn put_component(&self, name: ComponentName, component: Component) -> ComponentResult<()>;

    /// 父容器，根容器返回 `None`
    fn parent(&self) -> Option<Arc<dyn ComponentContainer>>;
}
