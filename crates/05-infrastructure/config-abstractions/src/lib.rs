//! # Configuration Abstractions
//!
//! 配置解码抽象层，定义组件配置从通用键值结构到强类型结构的转换接口。
//!
//! ## 核心接口
//!
//! - [`ConfigDecoder`] - 配置解码器接口
//! - [`DecodeOptions`] - 解码选项

pub mod decoder;

pub use decoder::*;
