//! 组件描述与运行时组件
//!
//! 提供组件描述（配置）、原始配置值、实例句柄和运行时组件的定义

use crate::container::ComponentContainer;
use crate::context::Context;
use infrastructure_common::{ComponentName, ComponentTypeId};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::any::Any;
use std::fmt;
use std::sync::{Arc, Weak};

/// 组件的原始配置
///
/// 既可以是通用的键值结构，也可以是已经强类型化的配置值
#[derive(Clone, Default)]
pub enum RawConfig {
    /// 未提供配置
    #[default]
    None,
    /// 通用配置值，通常是一个键值映射
    Value(Value),
    /// 已经强类型化的配置值
    Typed {
        value: Arc<dyn Any + Send + Sync>,
        type_name: &'static str,
    },
}

impl RawConfig {
    /// 包装一个强类型配置值
    pub fn typed<C: Send + Sync + 'static>(config: C) -> Self {
        Self::Typed {
            value: Arc::new(config),
            type_name: std::any::type_name::<C>(),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// 获取键值映射形式的配置
    pub fn as_map(&self) -> Option<&Map<String, Value>> {
        match self {
            Self::Value(Value::Object(map)) => Some(map),
            _ => None,
        }
    }

    /// 获取强类型配置
    pub fn downcast_ref<C: 'static>(&self) -> Option<&C> {
        match self {
            Self::Typed { value, .. } => value.downcast_ref::<C>(),
            _ => None,
        }
    }

    /// 配置形态的描述，用于错误信息
    pub fn describe(&self) -> String {
        match self {
            Self::None => "none".to_string(),
            Self::Value(value) => match value {
                Value::Null => "null".to_string(),
                Value::Bool(_) => "bool".to_string(),
                Value::Number(_) => "number".to_string(),
                Value::String(_) => "string".to_string(),
                Value::Array(_) => "array".to_string(),
                Value::Object(_) => "map".to_string(),
            },
            Self::Typed { type_name, .. } => (*type_name).to_string(),
        }
    }
}

impl fmt::Debug for RawConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Self::Typed { type_name, .. } => f.debug_tuple("Typed").field(type_name).finish(),
        }
    }
}

impl From<Value> for RawConfig {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::None,
            other => Self::Value(other),
        }
    }
}

impl Serialize for RawConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Value(value) => value.serialize(serializer),
            // 强类型配置无法还原为通用结构
            Self::None | Self::Typed { .. } => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for RawConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::from)
    }
}

/// 组件描述
///
/// `type_id` 与 `refer` 必须且只能有一个非空；`name` 为空表示匿名组件
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ComponentConfig {
    /// 组件名称
    pub name: ComponentName,
    /// 组件类型
    #[serde(rename = "type")]
    pub type_id: ComponentTypeId,
    /// 对其他已加载组件的引用路径
    pub refer: String,
    /// 构造该组件所依赖的其他组件名称
    pub deps: Vec<ComponentName>,
    /// 组件自身的配置
    pub config: RawConfig,
}

impl ComponentConfig {
    /// 创建一个通过工厂构造的组件描述
    pub fn new(name: impl Into<ComponentName>, type_id: impl Into<ComponentTypeId>) -> Self {
        Self {
            name: name.into(),
            type_id: type_id.into(),
            ..Self::default()
        }
    }

    /// 创建一个匿名组件描述
    pub fn anonymous(type_id: impl Into<ComponentTypeId>) -> Self {
        Self::new(ComponentName::default(), type_id)
    }

    /// 创建一个引用组件描述
    pub fn reference(name: impl Into<ComponentName>, refer: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            refer: refer.into(),
            ..Self::default()
        }
    }

    /// 添加依赖
    pub fn with_dep(mut self, dep: impl Into<ComponentName>) -> Self {
        self.deps.push(dep.into());
        self
    }

    /// 设置依赖列表
    pub fn with_deps<I, N>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<ComponentName>,
    {
        self.deps = deps.into_iter().map(Into::into).collect();
        self
    }

    /// 设置配置
    pub fn with_config(mut self, config: impl Into<RawConfig>) -> Self {
        self.config = config.into();
        self
    }

    /// 是否为引用组件描述
    pub fn is_reference(&self) -> bool {
        self.type_id.is_empty() && !self.refer.is_empty()
    }
}

/// 组件实例句柄
///
/// 实例本身是不透明的，能力通过显式查询获得：
/// [`Instance::downcast_ref`] 判断实例是否为某个具体类型，
/// [`Instance::as_container`] 判断实例是否为组件容器
#[derive(Clone)]
pub struct Instance {
    value: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl Instance {
    /// 包装一个实例
    ///
    /// 需要按 trait 取用的实例应以 `Arc<dyn Trait>` 的形式存入
    pub fn new<T: Send + Sync + 'static>(value: T) -> Self {
        Self {
            value: Arc::new(value),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// 包装一个组件容器，使实例具备容器能力
    pub fn container(container: Arc<dyn ComponentContainer>) -> Self {
        Self::new(container)
    }

    /// 包装一个不持有所有权的容器句柄
    ///
    /// 容器释放后 [`Instance::as_container`] 返回 `None`
    pub fn container_ref(container: &Arc<dyn ComponentContainer>) -> Self {
        Self {
            value: Arc::new(ContainerRef(Arc::downgrade(container))),
            type_name: std::any::type_name::<ContainerRef>(),
        }
    }

    /// 实例的具体类型名称
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn is<T: 'static>(&self) -> bool {
        self.value.is::<T>()
    }

    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    /// 容器能力查询
    pub fn as_container(&self) -> Option<Arc<dyn ComponentContainer>> {
        if let Some(handle) = self.downcast_ref::<ContainerRef>() {
            return handle.0.upgrade();
        }
        self.downcast_ref::<Arc<dyn ComponentContainer>>().cloned()
    }

    /// 是否为不持有所有权的容器句柄
    pub fn is_container_ref(&self) -> bool {
        self.is::<ContainerRef>()
    }

    /// 容器实例对应的弱句柄，非容器实例返回 `None`
    pub fn downgrade_container(&self) -> Option<Instance> {
        if self.is_container_ref() {
            return Some(self.clone());
        }
        self.downcast_ref::<Arc<dyn ComponentContainer>>()
            .map(Self::container_ref)
    }

    /// 两个句柄是否指向同一个实例
    pub fn ptr_eq(&self, other: &Instance) -> bool {
        Arc::ptr_eq(&self.value, &other.value)
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("type_name", &self.type_name)
            .finish()
    }
}

/// 指向容器的弱句柄
///
/// 引用组件指向容器时以此存放，避免名称表之间形成强引用环
pub struct ContainerRef(Weak<dyn ComponentContainer>);

/// 运行时组件
///
/// 一旦创建不再修改
#[derive(Debug, Clone)]
pub struct Component {
    /// 构造上下文
    pub context: Context,
    /// 组件实例
    pub instance: Instance,
}

impl Component {
    pub fn new(context: Context, instance: Instance) -> Self {
        Self { context, instance }
    }

    /// 组件描述中的名称
    pub fn name(&self) -> &ComponentName {
        &self.context.config().name
    }
}
