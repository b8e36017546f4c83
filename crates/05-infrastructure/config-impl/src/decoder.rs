//! 严格模式配置解码器实现

use config_abstractions::{ConfigDecoder, DecodeOptions};
use infrastructure_common::{ConfigError, ConfigResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// 基于 serde_json 的严格配置解码器
///
/// - 解码前以目标类型的默认值为基底，缺失字段保持零值
/// - 输入中存在目标类型不认识的字段时报错
///
/// 未知字段通过比较输入与解码结果重新序列化后的结构来判断，
/// 因此带有 `#[serde(skip_serializing)]` 的字段会被视为未知字段。
///
/// 零值基底按键递归合并：默认值非空的映射字段（如 `HashMap`）不会先被清空，
/// 输入中的键覆盖或追加到默认条目上，未出现的默认条目保留在结果中。
/// 需要完全替换映射时应让该字段的默认值为空。
#[derive(Debug, Clone, Default)]
pub struct StrictConfigDecoder {
    options: DecodeOptions,
}

impl StrictConfigDecoder {
    /// 创建默认（严格）解码器
    pub fn new() -> Self {
        Self::default()
    }

    /// 使用指定选项创建解码器
    pub fn with_options(options: DecodeOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> DecodeOptions {
        self.options
    }
}

impl ConfigDecoder for StrictConfigDecoder {
    fn decode<T>(&self, map: &Map<String, Value>) -> ConfigResult<T>
    where
        T: DeserializeOwned + Serialize + Default,
    {
        let type_name = std::any::type_name::<T>();
        debug!("解码配置到类型: {}", type_name);

        let input = Value::Object(map.clone());
        let merged = if self.options.zero_fields {
            let mut base = serde_json::to_value(T::default())?;
            overlay(&mut base, &input);
            base
        } else {
            input.clone()
        };

        let decoded: T =
            serde_json::from_value(merged).map_err(|e| ConfigError::TypeConversionError {
                message: format!("{}: {}", type_name, e),
            })?;

        if self.options.error_unused {
            let shape = serde_json::to_value(&decoded)?;
            if let Some(path) = find_unused_field(&input, &shape, "") {
                warn!("配置包含未知字段: {} ({})", path, type_name);
                return Err(ConfigError::UnknownField { path });
            }
        }

        Ok(decoded)
    }

    fn name(&self) -> &str {
        "strict"
    }
}

/// 将 `patch` 覆盖到 `base` 上，对象按键递归合并，其余类型直接替换
fn overlay(base: &mut Value, patch: &Value) {
    match (base, patch) {
        (Value::Object(base_map), Value::Object(patch_map)) => {
            for (key, value) in patch_map {
                let nested = value.is_object() && base_map.get(key).is_some_and(Value::is_object);
                if !nested {
                    base_map.insert(key.clone(), value.clone());
                } else if let Some(existing) = base_map.get_mut(key) {
                    overlay(existing, value);
                }
            }
        }
        (base, patch) => *base = patch.clone(),
    }
}

/// 查找输入中没有出现在解码结果里的字段，返回其点分路径
fn find_unused_field(input: &Value, shape: &Value, prefix: &str) -> Option<String> {
    match (input, shape) {
        (Value::Object(input_map), Value::Object(shape_map)) => {
            for (key, value) in input_map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", prefix, key)
                };
                match shape_map.get(key) {
                    None => return Some(path),
                    Some(shape_value) => {
                        if let Some(found) = find_unused_field(value, shape_value, &path) {
                            return Some(found);
                        }
                    }
                }
            }
            None
        }
        (Value::Array(input_items), Value::Array(shape_items)) => input_items
            .iter()
            .zip(shape_items)
            .enumerate()
            .find_map(|(index, (item, shape_item))| {
                find_unused_field(item, shape_item, &format!("{}[{}]", prefix, index))
            }),
        _ => None,
    }
}
