//! 组件依赖图
//!
//! 用于按依赖关系对一批组件做拓扑排序，并计算卸载时的反向依赖闭包

use di_abstractions::ComponentConfig;
use infrastructure_common::{ComponentError, ComponentName, ComponentResult};
use std::collections::{HashMap, HashSet, VecDeque};

/// 组件依赖图
///
/// 节点按加入顺序编号，边从依赖方指向被依赖方
#[derive(Debug, Default, Clone)]
pub struct DependencyGraph {
    nodes: Vec<ComponentName>,
    index: HashMap<ComponentName, usize>,
    /// 每个节点依赖的节点
    dependencies: Vec<Vec<usize>>,
    /// 每个节点被哪些节点依赖
    dependents: Vec<Vec<usize>>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// 为一批待加载的组件描述构建依赖图
    ///
    /// 依赖已存在于容器中（`is_loaded` 为真）的边视为已满足，不加入图中；
    /// 既不在容器中也不在本批次中的依赖直接报错
    pub fn for_batch<F>(configs: &[ComponentConfig], is_loaded: F) -> ComponentResult<Self>
    where
        F: Fn(&ComponentName) -> bool,
    {
        let mut graph = Self::new();
        for config in configs {
            graph.add_node(config.name.clone())?;
        }

        for (dependent, config) in configs.iter().enumerate() {
            for dep in &config.deps {
                if is_loaded(dep) {
                    continue;
                }
                let Some(dependency) = graph.index_of(dep) else {
                    return Err(ComponentError::DependencyNotFound {
                        dependency: dep.to_string(),
                        required_by: config.name.to_string(),
                    });
                };
                graph.add_dependency(dependent, dependency);
            }
        }
        Ok(graph)
    }

    /// 由已加载组件的（名称，依赖）列表构建依赖图，节点按给定顺序编号
    ///
    /// 重复名称只保留第一次出现，指向列表之外的依赖被忽略
    pub fn from_entries<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a ComponentName, &'a [ComponentName])>,
    {
        let entries: Vec<_> = entries.into_iter().collect();
        let mut graph = Self::new();
        for (name, _) in &entries {
            if graph.index_of(name).is_none() {
                let _ = graph.add_node((*name).clone());
            }
        }
        for (name, deps) in &entries {
            let Some(dependent) = graph.index_of(name) else {
                continue;
            };
            for dep in deps.iter() {
                if let Some(dependency) = graph.index_of(dep) {
                    graph.add_dependency(dependent, dependency);
                }
            }
        }
        graph
    }

    /// 加入一个节点，返回节点编号
    pub fn add_node(&mut self, name: ComponentName) -> ComponentResult<usize> {
        if self.index.contains_key(&name) {
            return Err(ComponentError::AlreadyExists {
                name: name.to_string(),
            });
        }
        let id = self.nodes.len();
        self.index.insert(name.clone(), id);
        self.nodes.push(name);
        self.dependencies.push(Vec::new());
        self.dependents.push(Vec::new());
        Ok(id)
    }

    /// 加入依赖边：`dependent` 依赖 `dependency`，重复的边会被忽略
    pub fn add_dependency(&mut self, dependent: usize, dependency: usize) {
        if self.dependencies[dependent].contains(&dependency) {
            return;
        }
        self.dependencies[dependent].push(dependency);
        self.dependents[dependency].push(dependent);
    }

    pub fn index_of(&self, name: &ComponentName) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// 依赖优先的拓扑顺序
    ///
    /// 存在环时返回 [`ComponentError::CircularDependency`]，并列出环上剩余的节点
    pub fn topological_order(&self) -> ComponentResult<Vec<ComponentName>> {
        let (order, remaining) = self.kahn();
        if !remaining.is_empty() {
            return Err(ComponentError::CircularDependency {
                cycle: remaining.iter().map(|&id| self.nodes[id].to_string()).collect(),
            });
        }
        Ok(self.names(&order))
    }

    /// 尽力而为的拓扑顺序：环上的节点按加入顺序追加在末尾
    pub fn topological_order_lenient(&self) -> Vec<ComponentName> {
        let (mut order, remaining) = self.kahn();
        order.extend(remaining);
        self.names(&order)
    }

    /// 所有直接或间接依赖 `roots` 的节点（含 `roots` 自身）
    pub fn dependents_closure(&self, roots: &[usize]) -> HashSet<usize> {
        let mut closure: HashSet<usize> = roots.iter().copied().collect();
        let mut queue: VecDeque<usize> = roots.iter().copied().collect();
        while let Some(node) = queue.pop_front() {
            for &dependent in &self.dependents[node] {
                if closure.insert(dependent) {
                    queue.push_back(dependent);
                }
            }
        }
        closure
    }

    pub fn name(&self, node: usize) -> &ComponentName {
        &self.nodes[node]
    }

    fn names(&self, ids: &[usize]) -> Vec<ComponentName> {
        ids.iter().map(|&id| self.nodes[id].clone()).collect()
    }

    /// Kahn 算法，返回（已排序节点，环上剩余节点）
    fn kahn(&self) -> (Vec<usize>, Vec<usize>) {
        let mut in_degree: Vec<usize> = self.dependencies.iter().map(Vec::len).collect();
        let mut queue: VecDeque<usize> = (0..self.nodes.len())
            .filter(|&id| in_degree[id] == 0)
            .collect();

        let mut order = Vec::with_capacity(self.nodes.len());
        while let Some(node) = queue.pop_front() {
            order.push(node);
            for &dependent in &self.dependents[node] {
                in_degree[dependent] -= 1;
                if in_degree[dependent] == 0 {
                    queue.push_back(dependent);
                }
            }
        }

        let remaining = (0..self.nodes.len())
            .filter(|&id| in_degree[id] > 0)
            .collect();
        (order, remaining)
    }
}
