//! # 组件装配具体实现
//!
//! 提供组件工厂注册表、依赖图排序、引用路径解析和组件容器的具体实现。
//!
//! ## 核心类型
//!
//! - [`FactoryRegistryImpl`] - 基于读写锁的组件工厂注册表
//! - [`ComponentContainerImpl`] - 层级组件容器
//! - [`DependencyGraph`] - 组件依赖图与拓扑排序
//! - [`ReferPath`] - 引用路径
//! - [`SimpleComponentFactory`] / [`ContainerFactory`] - 内置组件工厂

pub mod container;
pub mod dependency_graph;
pub mod factories;
pub mod registry;
pub mod resolver;

pub use container::{ComponentContainerBuilder, ComponentContainerImpl};
pub use dependency_graph::DependencyGraph;
pub use factories::{
    ContainerFactory, ContainerFactoryConfig, SimpleComponentFactory, CONTAINER_COMPONENT_TYPE,
};
pub use registry::{default_factory_registry, FactoryRegistryImpl};
pub use resolver::{resolve, PathSegment, ReferPath};
