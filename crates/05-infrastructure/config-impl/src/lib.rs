//! # Configuration Implementation
//!
//! 组件配置解码的具体实现。
//!
//! ## 主要组件
//!
//! - [`StrictConfigDecoder`] - 严格模式配置解码器（拒绝未知字段、缺失字段取零值）
//! - [`serde_helpers`] - 时长、时间字段的解析辅助

pub mod decoder;
pub mod serde_helpers;

pub use decoder::*;
