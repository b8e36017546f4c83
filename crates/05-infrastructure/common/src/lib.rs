//! # Infrastructure Common
//!
//! 这个 crate 提供了组件装配引擎各层共享的基础类型。
//!
//! ## 核心内容
//!
//! - [`ComponentName`] / [`ComponentTypeId`] - 组件名称与类型标识
//! - [`ComponentError`] - 组件装配错误
//! - [`ConfigError`] - 配置解码错误
//! - [`InfrastructureError`] - 基础设施组合层错误

pub mod errors;
pub mod naming;

pub use errors::*;
pub use naming::*;
