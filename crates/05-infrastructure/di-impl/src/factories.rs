//! 内置组件工厂
//!
//! - [`SimpleComponentFactory`] - 由闭包构造、配置为具体类型的通用工厂
//! - [`ContainerFactory`] - 创建子容器的工厂，组件类型为 `container`

use crate::container::ComponentContainerBuilder;
use config_abstractions::ConfigDecoder;
use config_impl::StrictConfigDecoder;
use di_abstractions::{
    ComponentConfig, ComponentContainer, ComponentFactory, Context, Instance, RawConfig,
};
use infrastructure_common::{ComponentError, ComponentResult, ComponentTypeId};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

type CreateFn<C, T> = Arc<dyn Fn(&Context, C) -> ComponentResult<T> + Send + Sync>;
type DestroyFn<T> = Arc<dyn Fn(&Context, &T) -> ComponentResult<()> + Send + Sync>;

/// 配置类型为 `C`、实例类型为 `T` 的组件工厂
///
/// 原始配置的处理方式：
/// - 未提供配置时使用 `C::default()`
/// - 强类型配置必须正是 `C`
/// - 键值映射交给解码器 `D` 解码
pub struct SimpleComponentFactory<C, T, D = StrictConfigDecoder> {
    component_type: ComponentTypeId,
    create: Option<CreateFn<C, T>>,
    destroy: Option<DestroyFn<T>>,
    decoder: D,
}

impl<C, T> SimpleComponentFactory<C, T> {
    pub fn new(component_type: impl Into<ComponentTypeId>) -> Self {
        Self {
            component_type: component_type.into(),
            create: None,
            destroy: None,
            decoder: StrictConfigDecoder::new(),
        }
    }
}

impl<C, T, D> SimpleComponentFactory<C, T, D> {
    /// 设置构造函数
    pub fn with_create<F>(mut self, create: F) -> Self
    where
        F: Fn(&Context, C) -> ComponentResult<T> + Send + Sync + 'static,
    {
        self.create = Some(Arc::new(create));
        self
    }

    /// 设置返回外部错误的构造函数
    ///
    /// 外部错误包装为 [`ComponentError::CreationFailed`]，带上组件名称与类型
    pub fn with_fallible_create<F, E>(self, create: F) -> Self
    where
        F: Fn(&Context, C) -> Result<T, E> + Send + Sync + 'static,
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let component_type = self.component_type.clone();
        self.with_create(move |ctx, config| {
            create(ctx, config).map_err(|e| {
                ComponentError::creation_failed(ctx.name().as_str(), component_type.as_str(), e)
            })
        })
    }

    /// 设置销毁函数
    pub fn with_destroy<F>(mut self, destroy: F) -> Self
    where
        F: Fn(&Context, &T) -> ComponentResult<()> + Send + Sync + 'static,
    {
        self.destroy = Some(Arc::new(destroy));
        self
    }

    /// 替换配置解码器
    pub fn with_decoder<D2>(self, decoder: D2) -> SimpleComponentFactory<C, T, D2> {
        SimpleComponentFactory {
            component_type: self.component_type,
            create: self.create,
            destroy: self.destroy,
            decoder,
        }
    }
}

impl<C, T, D> SimpleComponentFactory<C, T, D>
where
    C: DeserializeOwned + Serialize + Default + Clone + 'static,
    D: ConfigDecoder,
{
    fn decode_config(&self, ctx: &Context, raw: &RawConfig) -> ComponentResult<C> {
        let name = ctx.name().as_str();
        match raw {
            RawConfig::None => Ok(C::default()),
            RawConfig::Typed { .. } => raw.downcast_ref::<C>().cloned().ok_or_else(|| {
                ComponentError::config_invalid(
                    name,
                    format!(
                        "配置类型不匹配: 期望 {}, 实际 {}",
                        std::any::type_name::<C>(),
                        raw.describe()
                    ),
                )
            }),
            RawConfig::Value(Value::Object(map)) => self
                .decoder
                .decode::<C>(map)
                .map_err(|e| ComponentError::config_invalid(name, e.to_string())),
            other => Err(ComponentError::config_invalid(
                name,
                format!("不支持的配置形态: {}", other.describe()),
            )),
        }
    }
}

impl<C, T, D> ComponentFactory for SimpleComponentFactory<C, T, D>
where
    C: DeserializeOwned + Serialize + Default + Clone + Send + Sync + 'static,
    T: Send + Sync + 'static,
    D: ConfigDecoder + 'static,
{
    fn component_type(&self) -> ComponentTypeId {
        self.component_type.clone()
    }

    fn create_instance(&self, ctx: &Context, config: &RawConfig) -> ComponentResult<Instance> {
        let Some(create) = &self.create else {
            return Err(ComponentError::config_invalid(
                ctx.name().as_str(),
                format!("组件类型 {} 未提供构造函数", self.component_type),
            ));
        };
        let config = self.decode_config(ctx, config)?;
        let instance = create(ctx, config)?;
        Ok(Instance::new(instance))
    }

    fn destroy_instance(&self, ctx: &Context, instance: &Instance) -> ComponentResult<()> {
        let Some(destroy) = &self.destroy else {
            return Ok(());
        };
        let typed = instance
            .downcast_ref::<T>()
            .ok_or_else(|| ComponentError::TypeMismatch {
                name: ctx.name().to_string(),
                type_id: self.component_type.to_string(),
                expected: std::any::type_name::<T>(),
                actual: instance.type_name(),
            })?;
        destroy(ctx, typed)
    }
}

impl<C, T, D> fmt::Debug for SimpleComponentFactory<C, T, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimpleComponentFactory")
            .field("component_type", &self.component_type)
            .field("config", &std::any::type_name::<C>())
            .field("instance", &std::any::type_name::<T>())
            .field("has_create", &self.create.is_some())
            .field("has_destroy", &self.destroy.is_some())
            .finish()
    }
}

/// 子容器组件的类型标识
pub const CONTAINER_COMPONENT_TYPE: &str = "container";

/// 子容器组件的配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerFactoryConfig {
    /// 在子容器中加载的具名组件
    pub components: Vec<ComponentConfig>,
}

/// 子容器工厂
///
/// 新容器的父容器为构造上下文所属的容器，沿用其工厂注册表，
/// 配置中的组件作为一个批次加载到新容器中
#[derive(Debug, Default, Clone)]
pub struct ContainerFactory {
    decoder: StrictConfigDecoder,
}

impl ContainerFactory {
    pub fn new() -> Self {
        Self::default()
    }

    fn decode_config(&self, ctx: &Context, raw: &RawConfig) -> ComponentResult<ContainerFactoryConfig> {
        let name = ctx.name().as_str();
        match raw {
            RawConfig::None => Ok(ContainerFactoryConfig::default()),
            RawConfig::Typed { .. } => raw
                .downcast_ref::<ContainerFactoryConfig>()
                .cloned()
                .ok_or_else(|| {
                    ComponentError::config_invalid(
                        name,
                        format!("配置类型不匹配: 实际 {}", raw.describe()),
                    )
                }),
            RawConfig::Value(Value::Object(map)) => self
                .decoder
                .decode::<ContainerFactoryConfig>(map)
                .map_err(|e| ComponentError::config_invalid(name, e.to_string())),
            other => Err(ComponentError::config_invalid(
                name,
                format!("不支持的配置形态: {}", other.describe()),
            )),
        }
    }
}

impl ComponentFactory for ContainerFactory {
    fn component_type(&self) -> ComponentTypeId {
        CONTAINER_COMPONENT_TYPE.into()
    }

    fn create_instance(&self, ctx: &Context, config: &RawConfig) -> ComponentResult<Instance> {
        let parent = ctx.require_container()?;
        let config = self.decode_config(ctx, config)?;
        debug!(
            "创建子容器: name={}, components={}",
            ctx.name(),
            config.components.len()
        );

        let child = ComponentContainerBuilder::new()
            .parent(parent)
            .context(ctx.clone())
            .build();
        child.load_named_components(config.components)?;
        Ok(Instance::container(child))
    }

    fn destroy_instance(&self, ctx: &Context, instance: &Instance) -> ComponentResult<()> {
        let container = instance
            .as_container()
            .ok_or_else(|| ComponentError::TypeMismatch {
                name: ctx.name().to_string(),
                type_id: CONTAINER_COMPONENT_TYPE.to_string(),
                expected: std::any::type_name::<Arc<dyn ComponentContainer>>(),
                actual: instance.type_name(),
            })?;
        let names = container.loaded_component_names();
        debug!("销毁子容器: name={}, components={}", ctx.name(), names.len());
        container.unload_named_components(&names, true)
    }
}
