//! 配置解码器抽象接口
//!
//! 把通用的键值配置解码为强类型的配置结构

use infrastructure_common::ConfigResult;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

/// 配置解码器 trait
///
/// 组件工厂拿到的原始配置是一个通用的键值映射时，由解码器负责转换为工厂需要的配置类型
pub trait ConfigDecoder: Send + Sync {
    /// 把键值映射解码为指定类型
    fn decode<T>(&self, map: &Map<String, Value>) -> ConfigResult<T>
    where
        T: DeserializeOwned + Serialize + Default;

    /// 获取解码器名称
    fn name(&self) -> &str;
}

/// 解码选项
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// 配置中存在目标类型未使用的字段时是否报错
    pub error_unused: bool,
    /// 解码前是否以目标类型的默认值为基底
    pub zero_fields: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            error_unused: true,
            zero_fields: true,
        }
    }
}

impl DecodeOptions {
    /// 宽松模式：忽略多余字段
    pub fn lenient() -> Self {
        Self {
            error_unused: false,
            ..Self::default()
        }
    }
}
