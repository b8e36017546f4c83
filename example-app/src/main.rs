//! # 示例应用程序
//!
//! 演示如何用组件描述装配一棵容器树：注册工厂、声明依赖、跨容器引用，
//! 以及按依赖顺序卸载组件

use clap::Parser;
use di_abstractions::{get_component, ComponentContainer};
use di_impl::SimpleComponentFactory;
use infrastructure_common::ComponentName;
use infrastructure_composition::{LoggingConfig, WiringBuilder};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::net::{AddrParseError, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "example-app")]
#[command(about = "组件装配示例应用")]
struct Args {
    /// 组件描述文件路径（JSON 数组），不指定时使用内置描述
    #[arg(short, long)]
    components: Option<String>,

    /// 日志级别
    #[arg(long, default_value = "info")]
    log_level: String,

    /// 是否输出 JSON 格式日志
    #[arg(long)]
    json_logs: bool,

    /// 演示结束前递归卸载的组件
    #[arg(long, default_value = "pool")]
    unload: String,
}

/// 连接池配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct PoolConfig {
    url: String,
    address: String,
    max_connections: u32,
    #[serde(with = "config_impl::serde_helpers::duration")]
    idle_timeout: Duration,
}

#[derive(Debug)]
struct ConnectionPool {
    config: PoolConfig,
    address: SocketAddr,
}

/// 仓储配置：`pool` 为同一容器中连接池组件的名称
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RepositoryConfig {
    table: String,
    pool: String,
}

#[derive(Debug)]
struct Repository {
    table: String,
    pool: Arc<ConnectionPool>,
}

fn pool_factory() -> SimpleComponentFactory<PoolConfig, Arc<ConnectionPool>> {
    SimpleComponentFactory::new("pool")
        .with_fallible_create(|ctx, config: PoolConfig| {
            let address: SocketAddr = config.address.parse()?;
            info!(
                "创建连接池 {}: {} ({}, 最大连接数 {})",
                ctx.name(),
                config.url,
                address,
                config.max_connections
            );
            Ok::<_, AddrParseError>(Arc::new(ConnectionPool { config, address }))
        })
        .with_destroy(|ctx, pool: &Arc<ConnectionPool>| {
            info!("关闭连接池 {}: {}", ctx.name(), pool.config.url);
            Ok(())
        })
}

fn repository_factory() -> SimpleComponentFactory<RepositoryConfig, Arc<Repository>> {
    SimpleComponentFactory::new("repository")
        .with_create(|ctx, config: RepositoryConfig| {
            let container = ctx.require_container()?;
            let pool = get_component::<Arc<ConnectionPool>, _>(
                container.as_ref(),
                &ComponentName::from(config.pool.as_str()),
            )?;
            info!("创建仓储 {}: 表 {}", ctx.name(), config.table);
            Ok(Arc::new(Repository {
                table: config.table,
                pool: pool.instance,
            }))
        })
        .with_destroy(|ctx, repository: &Arc<Repository>| {
            info!("释放仓储 {}: 表 {}", ctx.name(), repository.table);
            Ok(())
        })
}

/// 内置的组件描述：根容器中的连接池与仓储，以及引用它们的 `api` 子容器
fn builtin_components() -> serde_json::Value {
    json!([
        {
            "name": "users",
            "type": "repository",
            "deps": ["pool"],
            "config": { "table": "users", "pool": "pool" }
        },
        {
            "name": "pool",
            "type": "pool",
            "config": {
                "url": "postgres://localhost/app",
                "address": "127.0.0.1:5432",
                "max_connections": 16,
                "idle_timeout": "5m"
            }
        },
        {
            "name": "api",
            "type": "container",
            "deps": ["users"],
            "config": {
                "components": [
                    { "name": "users", "refer": "../users" },
                    { "name": "shared_pool", "refer": "/pool" }
                ]
            }
        }
    ])
}

fn load_components(args: &Args) -> anyhow::Result<serde_json::Value> {
    match &args.components {
        Some(path) => {
            let content = std::fs::read_to_string(path)?;
            Ok(serde_json::from_str(&content)?)
        }
        None => Ok(builtin_components()),
    }
}

fn build_logging(args: &Args) -> LoggingConfig {
    let mut config = if args.json_logs {
        LoggingConfig::production()
    } else {
        LoggingConfig::default()
    };
    config.level = parse_log_level(&args.log_level);
    config
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let container = WiringBuilder::new()
        .with_logging(build_logging(&args))
        .register_factory(pool_factory())
        .register_factory(repository_factory())
        .add_components_json(load_components(&args)?)?
        .build()?;

    info!("根容器已装配: {:?}", container.loaded_component_names());

    demonstrate_references(container.as_ref())?;

    let target = ComponentName::from(args.unload.as_str());
    if container.contains(&target) {
        container.unload_named_components(&[target], true)?;
        info!("卸载后剩余组件: {:?}", container.loaded_component_names());
    } else {
        warn!("组件 {} 不存在，跳过卸载", target);
    }

    info!("示例结束");
    Ok(())
}

/// 演示子容器中的引用与根容器中的组件共享同一实例
fn demonstrate_references(root: &dyn ComponentContainer) -> anyhow::Result<()> {
    let api = root
        .get_component(&"api".into())?
        .instance
        .as_container()
        .ok_or_else(|| anyhow::anyhow!("api 不是一个容器"))?;

    let users = get_component::<Arc<Repository>, _>(api.as_ref(), &"users".into())?;
    info!(
        "api/users 来自 {:?}, 表 {}",
        users.context.absolute_path(),
        users.instance.table
    );

    let pool = get_component::<Arc<ConnectionPool>, _>(api.as_ref(), &"shared_pool".into())?;
    info!(
        "api/shared_pool 与仓储共享连接池: {} ({}, 空闲超时 {:?})",
        Arc::ptr_eq(&pool.instance, &users.instance.pool),
        pool.instance.address,
        pool.instance.config.idle_timeout
    );
    Ok(())
}

/// 解析日志级别
fn parse_log_level(level: &str) -> tracing::Level {
    match level.to_lowercase().as_str() {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "info" => tracing::Level::INFO,
        "warn" => tracing::Level::WARN,
        "error" => tracing::Level::ERROR,
        _ => tracing::Level::INFO,
    }
}
