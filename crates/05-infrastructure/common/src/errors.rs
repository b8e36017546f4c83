//! 错误类型定义

use thiserror::Error;

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置包含未知字段: {path}")]
    UnknownField { path: String },

    #[error("配置类型转换失败: {message}")]
    TypeConversionError { message: String },

    #[error("配置序列化失败: {source}")]
    SerializationError {
        #[from]
        source: serde_json::Error,
    },
}

/// 组件错误的类别
///
/// 用于调用方按类别分支，不携带上下文信息
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentErrorKind {
    AlreadyExists,
    TypeMismatch,
    ConfigInvalid,
    NameNotFound,
    NameInvalid,
    DependencyNotFound,
    TypeNotRegistered,
    TypeAlreadyRegistered,
    CircularDependency,
    NotAContainer,
    ParentNotFound,
    HasDependents,
    CreationFailed,
}

/// 组件装配错误类型
#[derive(Error, Debug)]
pub enum ComponentError {
    #[error("组件已存在: {name}")]
    AlreadyExists { name: String },

    #[error("组件类型不匹配: name: {name}, type: {type_id}, 期望 {expected}, 实际 {actual}")]
    TypeMismatch {
        name: String,
        type_id: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("组件配置无效: name: {name}, 原因: {message}")]
    ConfigInvalid { name: String, message: String },

    #[error("组件名称不存在: {name}")]
    NameNotFound { name: String },

    #[error("组件名称无效: {name}")]
    NameInvalid { name: String },

    #[error("组件依赖不存在: {dependency} (被 {required_by} 依赖)")]
    DependencyNotFound {
        dependency: String,
        required_by: String,
    },

    #[error("组件类型未注册: {type_id}")]
    TypeNotRegistered { type_id: String },

    #[error("组件类型已注册: {type_id}")]
    TypeAlreadyRegistered { type_id: String },

    #[error("检测到循环依赖: {cycle:?}")]
    CircularDependency { cycle: Vec<String> },

    #[error("引用路径错误: {path} 中的 {segment} 不是容器")]
    NotAContainer { path: String, segment: String },

    #[error("引用路径错误: {path} 已到达根容器, 无法继续向上")]
    ParentNotFound { path: String },

    #[error("组件仍被依赖: {name}, 依赖方: {dependents:?}")]
    HasDependents {
        name: String,
        dependents: Vec<String>,
    },

    #[error("组件创建失败: name: {name}, type: {type_id}, 原因: {source}")]
    CreationFailed {
        name: String,
        type_id: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl ComponentError {
    /// 获取错误类别
    pub fn kind(&self) -> ComponentErrorKind {
        match self {
            Self::AlreadyExists { .. } => ComponentErrorKind::AlreadyExists,
            Self::TypeMismatch { .. } => ComponentErrorKind::TypeMismatch,
            Self::ConfigInvalid { .. } => ComponentErrorKind::ConfigInvalid,
            Self::NameNotFound { .. } => ComponentErrorKind::NameNotFound,
            Self::NameInvalid { .. } => ComponentErrorKind::NameInvalid,
            Self::DependencyNotFound { .. } => ComponentErrorKind::DependencyNotFound,
            Self::TypeNotRegistered { .. } => ComponentErrorKind::TypeNotRegistered,
            Self::TypeAlreadyRegistered { .. } => ComponentErrorKind::TypeAlreadyRegistered,
            Self::CircularDependency { .. } => ComponentErrorKind::CircularDependency,
            Self::NotAContainer { .. } => ComponentErrorKind::NotAContainer,
            Self::ParentNotFound { .. } => ComponentErrorKind::ParentNotFound,
            Self::HasDependents { .. } => ComponentErrorKind::HasDependents,
            Self::CreationFailed { .. } => ComponentErrorKind::CreationFailed,
        }
    }

    /// 创建配置无效错误
    pub fn config_invalid(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigInvalid {
            name: name.into(),
            message: message.into(),
        }
    }

    /// 包装工厂内部产生的外部错误
    pub fn creation_failed(
        name: impl Into<String>,
        type_id: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::CreationFailed {
            name: name.into(),
            type_id: type_id.into(),
            source: source.into(),
        }
    }
}

/// 基础设施错误类型
#[derive(Error, Debug)]
pub enum InfrastructureError {
    #[error("组件装配错误: {source}")]
    Component {
        #[from]
        source: ComponentError,
    },

    #[error("配置错误: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("基础设施启动失败: {message}")]
    BootstrapFailed { message: String },
}

/// 结果类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
pub type ComponentResult<T> = Result<T, ComponentError>;
pub type InfrastructureResult<T> = Result<T, InfrastructureError>;
