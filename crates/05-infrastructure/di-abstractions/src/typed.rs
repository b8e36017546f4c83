//! 类型化的组件访问
//!
//! 在无类型的容器接口之上提供按实例类型检查的获取与加载

use crate::component::{Component, ComponentConfig, RawConfig};
use crate::container::ComponentContainer;
use crate::context::Context;
use infrastructure_common::{ComponentError, ComponentName, ComponentResult, ComponentTypeId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;

/// 实例已确定为 `T` 的组件
#[derive(Debug, Clone)]
pub struct TypedComponent<T> {
    pub context: Context,
    pub instance: T,
}

impl<T> TypedComponent<T>
where
    T: Clone + 'static,
{
    /// 检查组件实例的类型
    pub fn try_from_component(component: Component) -> ComponentResult<Self> {
        match component.instance.downcast_ref::<T>() {
            Some(instance) => Ok(Self {
                instance: instance.clone(),
                context: component.context,
            }),
            None => Err(ComponentError::TypeMismatch {
                name: component.context.name().to_string(),
                type_id: component.context.config().type_id.to_string(),
                expected: std::any::type_name::<T>(),
                actual: component.instance.type_name(),
            }),
        }
    }
}

/// 获取一个具名组件，并要求其实例类型为 `T`
pub fn get_component<T, C>(container: &C, name: &ComponentName) -> ComponentResult<TypedComponent<T>>
where
    T: Clone + 'static,
    C: ComponentContainer + ?Sized,
{
    let component = container.get_component(name)?;
    TypedComponent::try_from_component(component)
}

/// 加载一个匿名组件，并要求其实例类型为 `T`
pub fn load_anonymous_component<T, C>(
    container: &C,
    config: ComponentConfig,
) -> ComponentResult<TypedComponent<T>>
where
    T: Clone + 'static,
    C: ComponentContainer + ?Sized,
{
    let component = container.load_anonymous_component(config)?;
    TypedComponent::try_from_component(component)
}

/// 配置为具体类型 `C`、实例类型为 `T` 的组件描述
///
/// 常用于在某个组件的配置中内联描述一个子组件
#[derive(Serialize, Deserialize)]
#[serde(bound(
    serialize = "C: Serialize",
    deserialize = "C: Deserialize<'de> + Default"
))]
pub struct TypedComponentConfig<C, T> {
    #[serde(default)]
    pub name: ComponentName,
    #[serde(default, rename = "type")]
    pub type_id: ComponentTypeId,
    #[serde(default)]
    pub refer: String,
    #[serde(default)]
    pub deps: Vec<ComponentName>,
    #[serde(default)]
    pub config: C,
    #[serde(skip)]
    _instance: PhantomData<fn() -> T>,
}

impl<C, T> TypedComponentConfig<C, T> {
    pub fn new(type_id: impl Into<ComponentTypeId>, config: C) -> Self {
        Self {
            name: ComponentName::default(),
            type_id: type_id.into(),
            refer: String::new(),
            deps: Vec::new(),
            config,
            _instance: PhantomData,
        }
    }

    pub fn with_name(mut self, name: impl Into<ComponentName>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_deps<I, N>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<ComponentName>,
    {
        self.deps = deps.into_iter().map(Into::into).collect();
        self
    }
}

impl<C, T> TypedComponentConfig<C, T>
where
    C: Clone + Send + Sync + 'static,
{
    /// 转换为无类型的组件描述
    pub fn to_any(&self) -> ComponentConfig {
        ComponentConfig {
            name: self.name.clone(),
            type_id: self.type_id.clone(),
            refer: self.refer.clone(),
            deps: self.deps.clone(),
            config: RawConfig::typed(self.config.clone()),
        }
    }
}

impl<C, T> TypedComponentConfig<C, T>
where
    C: Clone + Send + Sync + 'static,
    T: Clone + 'static,
{
    /// 在指定容器中匿名加载该组件
    pub fn load_component<K>(&self, container: &K) -> ComponentResult<TypedComponent<T>>
    where
        K: ComponentContainer + ?Sized,
    {
        load_anonymous_component(container, self.to_any())
    }
}

impl<C: Clone, T> Clone for TypedComponentConfig<C, T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            type_id: self.type_id.clone(),
            refer: self.refer.clone(),
            deps: self.deps.clone(),
            config: self.config.clone(),
            _instance: PhantomData,
        }
    }
}

impl<C: Default, T> Default for TypedComponentConfig<C, T> {
    fn default() -> Self {
        Self::new(ComponentTypeId::default(), C::default())
    }
}

impl<C: fmt::Debug, T> fmt::Debug for TypedComponentConfig<C, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedComponentConfig")
            .field("name", &self.name)
            .field("type_id", &self.type_id)
            .field("refer", &self.refer)
            .field("deps", &self.deps)
            .field("config", &self.config)
            .finish()
    }
}

impl<C: PartialEq, T> PartialEq for TypedComponentConfig<C, T> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.type_id == other.type_id
            && self.refer == other.refer
            && self.deps == other.deps
            && self.config == other.config
    }
}
