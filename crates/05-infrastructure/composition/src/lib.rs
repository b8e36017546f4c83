//! # 组件装配组合层
//!
//! 这个 crate 是组件装配引擎的组合层，负责初始化日志、注册组件工厂，
//! 并根据组件描述列表组装出根容器。
//!
//! ## 基本使用
//!
//! ```rust,no_run
//! use di_abstractions::get_component;
//! use di_impl::SimpleComponentFactory;
//! use infrastructure_composition::{LoggingConfig, WiringBuilder};
//! use serde_json::json;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let greeter = SimpleComponentFactory::<serde_json::Map<String, serde_json::Value>, String>::new("greeter")
//!         .with_create(|ctx, _config| Ok(format!("hello from {}", ctx.name())));
//!
//!     let container = WiringBuilder::new()
//!         .with_logging(LoggingConfig::development())
//!         .register_factory(greeter)
//!         .add_components_json(json!([{ "name": "greeter", "type": "greeter" }]))?
//!         .build()?;
//!
//!     let greeter = get_component::<String, _>(container.as_ref(), &"greeter".into())?;
//!     println!("{}", greeter.instance);
//!     Ok(())
//! }
//! ```

pub mod builder;

// 重新导出主要类型
pub use builder::{LoggingConfig, WiringBuilder};

// 重新导出错误类型
pub use infrastructure_common::InfrastructureError;
