//! # Component Wiring Abstractions
//!
//! 组件装配抽象层，定义组件描述、构造上下文、组件工厂和组件容器的核心接口。
//!
//! ## 核心接口
//!
//! - [`ComponentContainer`] - 组件容器接口
//! - [`ComponentFactory`] - 组件工厂接口
//! - [`FactoryRegistry`] - 组件工厂注册表接口
//! - [`Context`] - 组件构造上下文
//! - [`TypedComponentConfig`] - 类型化的组件描述

pub mod component;
pub mod container;
pub mod context;
pub mod factory;
pub mod typed;

pub use component::*;
pub use container::*;
pub use context::*;
pub use factory::*;
pub use typed::*;
