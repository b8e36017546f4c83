//! 集成测试共用的组件与工厂
#![allow(dead_code)]

use di_abstractions::{FactoryRegistry, TypedComponentConfig};
use di_impl::{ComponentContainerImpl, ContainerFactory, FactoryRegistryImpl, SimpleComponentFactory};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigA {
    pub test_a: String,
}

pub trait ComponentA: Send + Sync {
    fn config_a(&self) -> ConfigA;
}

struct ComponentAImpl {
    config: ConfigA,
}

impl ComponentA for ComponentAImpl {
    fn config_a(&self) -> ConfigA {
        self.config.clone()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigB {
    pub test_b: String,
    pub inner_a: TypedComponentConfig<ConfigA, Arc<dyn ComponentA>>,
}

pub trait ComponentB: Send + Sync {
    fn config_b(&self) -> ConfigB;
    fn component_a(&self) -> Arc<dyn ComponentA>;
}

struct ComponentBImpl {
    config: ConfigB,
    component_a: Arc<dyn ComponentA>,
}

impl ComponentB for ComponentBImpl {
    fn config_b(&self) -> ConfigB {
        self.config.clone()
    }

    fn component_a(&self) -> Arc<dyn ComponentA> {
        self.component_a.clone()
    }
}

pub fn factory_a() -> SimpleComponentFactory<ConfigA, Arc<dyn ComponentA>> {
    SimpleComponentFactory::new("a").with_create(|_ctx, config: ConfigA| {
        let component: Arc<dyn ComponentA> = Arc::new(ComponentAImpl { config });
        Ok(component)
    })
}

/// `b` 在构造时匿名加载内联描述的 `a`
pub fn factory_b() -> SimpleComponentFactory<ConfigB, Arc<dyn ComponentB>> {
    SimpleComponentFactory::new("b").with_create(|ctx, config: ConfigB| {
        let container = ctx.require_container()?;
        let inner = config.inner_a.load_component(container.as_ref())?;
        let component: Arc<dyn ComponentB> = Arc::new(ComponentBImpl {
            component_a: inner.instance,
            config,
        });
        Ok(component)
    })
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValueConfig {
    pub value: String,
}

/// 实例为字符串的组件，销毁时记录组件名
pub fn value_factory(destroyed: Arc<Mutex<Vec<String>>>) -> SimpleComponentFactory<ValueConfig, String> {
    SimpleComponentFactory::new("value")
        .with_create(|_ctx, config: ValueConfig| Ok(config.value))
        .with_destroy(move |ctx, _value: &String| {
            destroyed.lock().push(ctx.name().to_string());
            Ok(())
        })
}

/// 注册了 a、b、value 与 container 工厂的注册表
pub fn registry(destroyed: Arc<Mutex<Vec<String>>>) -> Arc<FactoryRegistryImpl> {
    let registry = Arc::new(FactoryRegistryImpl::new());
    registry.register(Arc::new(factory_a())).unwrap();
    registry.register(Arc::new(factory_b())).unwrap();
    registry.register(Arc::new(value_factory(destroyed))).unwrap();
    registry.register(Arc::new(ContainerFactory::new())).unwrap();
    registry
}

pub fn root_container() -> Arc<ComponentContainerImpl> {
    ComponentContainerImpl::with_registry(registry(Arc::default()))
}
