//! 组件装配构建器

use di_abstractions::{ComponentConfig, ComponentContainer, ComponentFactory, FactoryRegistry};
use di_impl::{
    ComponentContainerBuilder, ComponentContainerImpl, ContainerFactory, FactoryRegistryImpl,
    CONTAINER_COMPONENT_TYPE,
};
use infrastructure_common::{ConfigError, InfrastructureError};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

/// 组件装配构建器
///
/// 使用建造者模式注册组件工厂、收集组件描述，并构建根容器
pub struct WiringBuilder {
    /// 工厂注册表，未指定时为每次构建创建一个新的注册表
    factory_registry: Option<Arc<dyn FactoryRegistry>>,
    /// 待注册的组件工厂
    factories: Vec<Arc<dyn ComponentFactory>>,
    /// 根容器中加载的组件描述
    components: Vec<ComponentConfig>,
    /// 是否注册内置的子容器工厂
    container_factory_enabled: bool,
    /// 是否启用日志初始化
    logging_enabled: bool,
    /// 日志配置
    logging_config: LoggingConfig,
}

impl WiringBuilder {
    /// 创建新的组件装配构建器
    pub fn new() -> Self {
        Self {
            factory_registry: None,
            factories: Vec::new(),
            components: Vec::new(),
            container_factory_enabled: true,
            logging_enabled: false, // 默认不启用日志初始化
            logging_config: LoggingConfig::default(),
        }
    }

    /// 使用指定的工厂注册表
    pub fn factory_registry(mut self, registry: Arc<dyn FactoryRegistry>) -> Self {
        self.factory_registry = Some(registry);
        self
    }

    /// 注册组件工厂
    pub fn register_factory<F: ComponentFactory + 'static>(mut self, factory: F) -> Self {
        self.factories.push(Arc::new(factory));
        self
    }

    /// 注册共享的组件工厂
    pub fn register_shared_factory(mut self, factory: Arc<dyn ComponentFactory>) -> Self {
        self.factories.push(factory);
        self
    }

    /// 是否注册内置的 `container` 工厂，默认启用
    pub fn with_container_factory(mut self, enabled: bool) -> Self {
        self.container_factory_enabled = enabled;
        self
    }

    /// 添加一个组件描述
    pub fn add_component(mut self, config: ComponentConfig) -> Self {
        self.components.push(config);
        self
    }

    /// 添加一组组件描述
    pub fn add_components<I>(mut self, configs: I) -> Self
    where
        I: IntoIterator<Item = ComponentConfig>,
    {
        self.components.extend(configs);
        self
    }

    /// 从 JSON 数组添加组件描述
    pub fn add_components_json(mut self, value: Value) -> Result<Self, InfrastructureError> {
        if !value.is_array() {
            return Err(InfrastructureError::BootstrapFailed {
                message: "组件描述必须是一个 JSON 数组".to_string(),
            });
        }
        let configs: Vec<ComponentConfig> =
            serde_json::from_value(value).map_err(ConfigError::from)?;
        debug!("添加组件描述: {} 个", configs.len());
        self.components.extend(configs);
        Ok(self)
    }

    /// 配置日志
    pub fn with_logging(mut self, config: LoggingConfig) -> Self {
        self.logging_config = config;
        self.logging_enabled = true; // 启用日志初始化
        self
    }

    /// 构建根容器，并加载所有组件描述
    pub fn build(self) -> Result<Arc<ComponentContainerImpl>, InfrastructureError> {
        // 只有在明确配置了日志时才初始化日志
        // 避免在测试环境中重复初始化
        if self.logging_enabled {
            self.initialize_logging()?;
        }

        info!("开始装配组件");

        let registry: Arc<dyn FactoryRegistry> = match self.factory_registry {
            Some(registry) => registry,
            None => Arc::new(FactoryRegistryImpl::new()),
        };

        if self.container_factory_enabled
            && registry.get_factory(&CONTAINER_COMPONENT_TYPE.into()).is_err()
        {
            registry.register(Arc::new(ContainerFactory::new()))?;
        }
        for factory in self.factories {
            registry.register(factory)?;
        }

        let container = ComponentContainerBuilder::new()
            .factory_registry(registry)
            .build();
        container.load_named_components(self.components)?;

        info!(
            "组件装配完成: {:?}",
            container.loaded_component_names()
        );
        Ok(container)
    }

    /// 初始化日志系统
    fn initialize_logging(&self) -> Result<(), InfrastructureError> {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(self.logging_config.level)
            .with_target(self.logging_config.show_target)
            .with_thread_ids(self.logging_config.show_thread_ids)
            .with_file(self.logging_config.show_file)
            .with_line_number(self.logging_config.show_line_number);

        let result = if self.logging_config.json_format {
            subscriber.json().try_init()
        } else {
            subscriber.try_init()
        };
        result.map_err(|e| InfrastructureError::BootstrapFailed {
            message: format!("日志初始化失败: {}", e),
        })?;

        info!("日志系统初始化完成");
        Ok(())
    }
}

impl Default for WiringBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// 日志配置
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// 日志级别
    pub level: tracing::Level,
    /// 是否显示目标
    pub show_target: bool,
    /// 是否显示线程ID
    pub show_thread_ids: bool,
    /// 是否显示文件名
    pub show_file: bool,
    /// 是否显示行号
    pub show_line_number: bool,
    /// 是否使用 JSON 格式
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: tracing::Level::INFO,
            show_target: true,
            show_thread_ids: false,
            show_file: false,
            show_line_number: false,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// 创建开发环境日志配置
    pub fn development() -> Self {
        Self {
            level: tracing::Level::DEBUG,
            show_target: true,
            show_thread_ids: true,
            show_file: true,
            show_line_number: true,
            json_format: false,
        }
    }

    /// 创建生产环境日志配置
    pub fn production() -> Self {
        Self {
            level: tracing::Level::INFO,
            show_target: false,
            show_thread_ids: false,
            show_file: false,
            show_line_number: false,
            json_format: true,
        }
    }
}
