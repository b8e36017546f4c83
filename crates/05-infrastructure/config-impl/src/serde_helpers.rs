//! 配置字段的特殊解析
//!
//! 与 `#[serde(with = "...")]` 配合使用：
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use std::time::Duration;
//!
//! #[derive(Debug, Default, Serialize, Deserialize)]
//! struct PoolConfig {
//!     #[serde(with = "config_impl::serde_helpers::duration")]
//!     idle_timeout: Duration,
//! }
//! ```

/// `std::time::Duration` 字段：接受 `"1s"`、`"1m 30s"`、`"250ms"` 形式的字符串，
/// 也接受表示毫秒数的整数
pub mod duration {
    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};
    use std::fmt;
    use std::time::Duration;

    pub fn serialize<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&humantime::format_duration(*value).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(DurationVisitor)
    }

    struct DurationVisitor;

    impl<'de> Visitor<'de> for DurationVisitor {
        type Value = Duration;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("时长字符串（如 \"1s\"）或毫秒数")
        }

        fn visit_str<E>(self, value: &str) -> Result<Duration, E>
        where
            E: de::Error,
        {
            humantime::parse_duration(value)
                .map_err(|e| E::custom(format!("无效的时长 {:?}: {}", value, e)))
        }

        fn visit_u64<E>(self, value: u64) -> Result<Duration, E>
        where
            E: de::Error,
        {
            Ok(Duration::from_millis(value))
        }

        fn visit_i64<E>(self, value: i64) -> Result<Duration, E>
        where
            E: de::Error,
        {
            u64::try_from(value)
                .map(Duration::from_millis)
                .map_err(|_| E::custom(format!("时长不能为负数: {}", value)))
        }
    }
}

/// `std::time::SystemTime` 字段：RFC3339 时间字符串
pub mod rfc3339 {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::SystemTime;

    pub fn serialize<S>(value: &SystemTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let datetime: DateTime<Utc> = (*value).into();
        serializer.serialize_str(&datetime.to_rfc3339())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<SystemTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|datetime| SystemTime::from(datetime.with_timezone(&Utc)))
            .map_err(|e| serde::de::Error::custom(format!("无效的 RFC3339 时间 {:?}: {}", raw, e)))
    }
}
