//! 组件容器实现

use crate::dependency_graph::DependencyGraph;
use crate::registry::default_factory_registry;
use crate::resolver::{self, ReferPath};
use di_abstractions::{
    Component, ComponentConfig, ComponentContainer, Context, FactoryRegistry, Instance,
};
use infrastructure_common::{ComponentError, ComponentName, ComponentResult};
use parking_lot::RwLock;
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tracing::{debug, warn};

/// 名称表中的一项
#[derive(Debug, Clone)]
struct LoadedComponent {
    component: Component,
    /// 组件描述中声明的依赖
    deps: Vec<ComponentName>,
    /// 首次放入名称表的序号
    sequence: u64,
    /// 是否由本容器通过工厂以该名称构造
    owned: bool,
}

/// 组件容器实现
///
/// 容器总是以 `Arc` 形式创建，持有自身的弱引用，以便为子组件构造上下文。
/// 子容器通过名称表被父容器持有，指向父容器的链接是弱引用。
pub struct ComponentContainerImpl {
    context: Context,
    parent: Option<Weak<dyn ComponentContainer>>,
    factory_registry: Arc<dyn FactoryRegistry>,
    components: RwLock<HashMap<ComponentName, LoadedComponent>>,
    sequence: AtomicU64,
    self_ref: Weak<ComponentContainerImpl>,
}

/// 组件容器构建器
#[derive(Default)]
pub struct ComponentContainerBuilder {
    factory_registry: Option<Arc<dyn FactoryRegistry>>,
    parent: Option<Arc<dyn ComponentContainer>>,
    context: Option<Context>,
}

impl ComponentContainerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 指定工厂注册表
    ///
    /// 未指定时子容器沿用父容器的注册表，根容器使用进程级默认注册表
    pub fn factory_registry(mut self, registry: Arc<dyn FactoryRegistry>) -> Self {
        self.factory_registry = Some(registry);
        self
    }

    /// 指定父容器
    pub fn parent(mut self, parent: Arc<dyn ComponentContainer>) -> Self {
        self.parent = Some(parent);
        self
    }

    /// 指定容器自身作为组件时的上下文
    pub fn context(mut self, context: Context) -> Self {
        self.context = Some(context);
        self
    }

    pub fn build(self) -> Arc<ComponentContainerImpl> {
        let factory_registry: Arc<dyn FactoryRegistry> = match (self.factory_registry, &self.parent) {
            (Some(registry), _) => registry,
            (None, Some(parent)) => parent.factory_registry(),
            (None, None) => default_factory_registry(),
        };
        let parent = self.parent.as_ref().map(Arc::downgrade);
        let context = self.context.unwrap_or_default();

        debug!(
            "创建组件容器: name={}, has_parent={}",
            context.name(),
            parent.is_some()
        );

        Arc::new_cyclic(|self_ref| ComponentContainerImpl {
            context,
            parent,
            factory_registry,
            components: RwLock::new(HashMap::new()),
            sequence: AtomicU64::new(0),
            self_ref: self_ref.clone(),
        })
    }
}

impl ComponentContainerImpl {
    /// 使用进程级默认注册表创建根容器
    pub fn new() -> Arc<Self> {
        ComponentContainerBuilder::new().build()
    }

    /// 使用指定注册表创建根容器
    pub fn with_registry(registry: Arc<dyn FactoryRegistry>) -> Arc<Self> {
        ComponentContainerBuilder::new()
            .factory_registry(registry)
            .build()
    }

    pub fn builder() -> ComponentContainerBuilder {
        ComponentContainerBuilder::new()
    }

    /// 创建一个子容器，并以 `name` 放入当前容器
    pub fn add_child(&self, name: impl Into<ComponentName>) -> ComponentResult<Arc<Self>> {
        let name = name.into();
        if !name.validate() {
            return Err(ComponentError::NameInvalid {
                name: name.to_string(),
            });
        }
        let parent = self.arc_self(&name)?;
        let placeholder = Context::new(self.weak_self(), ComponentConfig::new(name.clone(), ""));
        let child = ComponentContainerBuilder::new()
            .parent(parent)
            .context(placeholder)
            .build();

        let instance = Instance::container(child.clone());
        let component = Component::new(child.context.clone().with_mount(instance.clone()), instance);
        self.insert(name, component, Vec::new(), false)?;
        Ok(child)
    }

    /// 已加载组件数量
    pub fn len(&self) -> usize {
        self.components.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.read().is_empty()
    }

    pub fn contains(&self, name: &ComponentName) -> bool {
        self.components.read().contains_key(name)
    }

    fn weak_self(&self) -> Weak<dyn ComponentContainer> {
        self.self_ref.clone()
    }

    fn arc_self(&self, name: &ComponentName) -> ComponentResult<Arc<dyn ComponentContainer>> {
        match self.self_ref.upgrade() {
            Some(container) => Ok(container as Arc<dyn ComponentContainer>),
            None => Err(ComponentError::config_invalid(name.as_str(), "容器已被释放")),
        }
    }

    fn next_sequence(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::Relaxed)
    }

    /// 按组件描述构造组件，不放入名称表
    fn load_component(&self, config: ComponentConfig) -> ComponentResult<Component> {
        if !config.type_id.is_empty() {
            self.construct(config)
        } else if config.is_reference() {
            self.refer(config)
        } else {
            Err(ComponentError::config_invalid(
                config.name.as_str(),
                "组件描述必须指定 type 或 refer",
            ))
        }
    }

    fn construct(&self, config: ComponentConfig) -> ComponentResult<Component> {
        {
            let components = self.components.read();
            if let Some(missing) = config.deps.iter().find(|dep| !components.contains_key(*dep)) {
                return Err(ComponentError::DependencyNotFound {
                    dependency: missing.to_string(),
                    required_by: config.name.to_string(),
                });
            }
        }

        let factory = self.factory_registry.get_factory(&config.type_id)?;
        let context = Context::new(self.weak_self(), config);
        let instance = factory.create_instance(&context, &context.config().config)?;
        debug!(
            "构造组件: name={}, type={}, instance={}",
            context.name(),
            context.config().type_id,
            instance.type_name()
        );
        Ok(Component::new(context.with_mount(instance.clone()), instance))
    }

    fn refer(&self, config: ComponentConfig) -> ComponentResult<Component> {
        let path = ReferPath::parse(&config.refer)?;
        let start = self.arc_self(&config.name)?;
        let component = resolver::resolve(start, &path)?;
        debug!("引用组件: name={}, refer={}", config.name, path);

        // 引用不拥有目标容器，只保存弱句柄
        match component.instance.downgrade_container() {
            Some(instance) => Ok(Component::new(
                component.context.with_mount(instance.clone()),
                instance,
            )),
            None => Ok(component),
        }
    }

    /// 调用工厂销毁本容器构造的组件
    fn destroy(&self, name: &ComponentName, component: &Component) -> ComponentResult<()> {
        let context = &component.context;
        let factory = self.factory_registry.get_factory(&context.config().type_id)?;
        factory
            .destroy_instance(context, &component.instance)
            .map_err(|e| {
                warn!("组件销毁失败: {}: {}", name, e);
                e
            })
    }

    fn insert(
        &self,
        name: ComponentName,
        component: Component,
        deps: Vec<ComponentName>,
        owned: bool,
    ) -> ComponentResult<()> {
        let mut components = self.components.write();
        match components.entry(name) {
            Entry::Occupied(entry) => Err(ComponentError::AlreadyExists {
                name: entry.key().to_string(),
            }),
            Entry::Vacant(entry) => {
                entry.insert(LoadedComponent {
                    component,
                    deps,
                    sequence: self.next_sequence(),
                    owned,
                });
                Ok(())
            }
        }
    }

    /// 名称表上的依赖图，节点按插入顺序编号
    fn tracked_graph(components: &HashMap<ComponentName, LoadedComponent>) -> DependencyGraph {
        let mut entries: Vec<_> = components.iter().collect();
        entries.sort_by_key(|(_, entry)| entry.sequence);
        DependencyGraph::from_entries(
            entries
                .into_iter()
                .map(|(name, entry)| (name, entry.deps.as_slice())),
        )
    }

    /// 计算卸载顺序（依赖方在前）
    fn unload_order(
        &self,
        names: &[ComponentName],
        recursive: bool,
    ) -> ComponentResult<Vec<ComponentName>> {
        let components = self.components.read();
        if let Some(missing) = names.iter().find(|name| !components.contains_key(*name)) {
            return Err(ComponentError::NameNotFound {
                name: missing.to_string(),
            });
        }

        let graph = Self::tracked_graph(&components);
        let roots: Vec<usize> = names.iter().filter_map(|name| graph.index_of(name)).collect();
        let closure = graph.dependents_closure(&roots);

        if !recursive {
            let requested: HashSet<usize> = roots.iter().copied().collect();
            for &root in &roots {
                let mut dependents: Vec<String> = graph
                    .dependents_closure(&[root])
                    .into_iter()
                    .filter(|node| !requested.contains(node))
                    .map(|node| graph.name(node).to_string())
                    .collect();
                if !dependents.is_empty() {
                    dependents.sort();
                    return Err(ComponentError::HasDependents {
                        name: graph.name(root).to_string(),
                        dependents,
                    });
                }
            }
        }

        let mut order: Vec<ComponentName> = graph
            .topological_order_lenient()
            .into_iter()
            .filter(|name| graph.index_of(name).is_some_and(|node| closure.contains(&node)))
            .collect();
        order.reverse();
        Ok(order)
    }
}

impl ComponentContainer for ComponentContainerImpl {
    fn context(&self) -> Context {
        match self.self_ref.upgrade() {
            Some(container) => self.context.clone().with_mount(Instance::container(container)),
            None => self.context.clone(),
        }
    }

    fn factory_registry(&self) -> Arc<dyn FactoryRegistry> {
        self.factory_registry.clone()
    }

    fn loaded_component_names(&self) -> Vec<ComponentName> {
        let components = self.components.read();
        Self::tracked_graph(&components).topological_order_lenient()
    }

    fn load_named_components(&self, configs: Vec<ComponentConfig>) -> ComponentResult<()> {
        if configs.is_empty() {
            return Ok(());
        }

        if let Some(invalid) = configs.iter().find(|config| !config.name.validate()) {
            return Err(ComponentError::NameInvalid {
                name: invalid.name.to_string(),
            });
        }

        let order = {
            let components = self.components.read();
            if let Some(existing) = configs.iter().find(|c| components.contains_key(&c.name)) {
                return Err(ComponentError::AlreadyExists {
                    name: existing.name.to_string(),
                });
            }
            DependencyGraph::for_batch(&configs, |name| components.contains_key(name))?
                .topological_order()?
        };
        debug!("加载组件批次: count={}, order={:?}", order.len(), order);

        let mut pending: HashMap<ComponentName, ComponentConfig> = configs
            .into_iter()
            .map(|config| (config.name.clone(), config))
            .collect();

        for name in order {
            let Some(config) = pending.remove(&name) else {
                continue;
            };
            let owned = !config.type_id.is_empty();
            let deps = config.deps.clone();
            let component = self.load_component(config).map_err(|e| {
                warn!("组件加载失败: {}: {}", name, e);
                e
            })?;
            if let Err(err) = self.insert(name.clone(), component.clone(), deps, owned) {
                // 并发加载的同名组件已先放入名称表
                if owned {
                    let _ = self.destroy(&name, &component);
                }
                return Err(err);
            }
        }
        Ok(())
    }

    fn unload_named_components(
        &self,
        names: &[ComponentName],
        recursive: bool,
    ) -> ComponentResult<()> {
        let order = self.unload_order(names, recursive)?;
        debug!("卸载组件: order={:?}", order);

        for name in order {
            let Some(entry) = self.components.write().remove(&name) else {
                continue;
            };
            if entry.owned {
                self.destroy(&name, &entry.component)?;
            }
        }
        Ok(())
    }

    fn load_anonymous_component(&self, config: ComponentConfig) -> ComponentResult<Component> {
        self.load_component(config)
    }

    fn get_component(&self, name: &ComponentName) -> ComponentResult<Component> {
        self.components
            .read()
            .get(name)
            .map(|entry| entry.component.clone())
            .ok_or_else(|| ComponentError::NameNotFound {
                name: name.to_string(),
            })
    }

    fn put_component(&self, name: ComponentName, component: Component) -> ComponentResult<()> {
        let mut components = self.components.write();
        match components.entry(name) {
            Entry::Occupied(mut entry) => {
                let existing = entry.get_mut();
                existing.component = component;
                existing.deps.clear();
                existing.owned = false;
            }
            Entry::Vacant(entry) => {
                entry.insert(LoadedComponent {
                    component,
                    deps: Vec::new(),
                    sequence: self.next_sequence(),
                    owned: false,
                });
            }
        }
        Ok(())
    }

    fn parent(&self) -> Option<Arc<dyn ComponentContainer>> {
        self.parent.as_ref().and_then(Weak::upgrade)
    }
}

impl fmt::Debug for ComponentContainerImpl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentContainerImpl")
            .field("name", self.context.name())
            .field("has_parent", &self.parent.is_some())
            .field("components", &self.loaded_component_names())
            .finish()
    }
}
