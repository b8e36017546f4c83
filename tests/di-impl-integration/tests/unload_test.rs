//! 组件卸载集成测试

mod common;

use common::registry;
use di_abstractions::{ComponentConfig, ComponentContainer};
use di_impl::ComponentContainerImpl;
use infrastructure_common::{ComponentError, ComponentErrorKind, ComponentName};
use parking_lot::Mutex;
use serde_json::json;
use std::sync::Arc;

fn value(name: &str) -> ComponentConfig {
    ComponentConfig::new(name, "value").with_config(json!({ "value": name }))
}

fn setup() -> (Arc<ComponentContainerImpl>, Arc<Mutex<Vec<String>>>) {
    let destroyed = Arc::new(Mutex::new(Vec::new()));
    let container = ComponentContainerImpl::with_registry(registry(destroyed.clone()));
    container
        .load_named_components(vec![
            value("config"),
            value("db").with_dep("config"),
            value("cache").with_dep("config"),
            value("repo").with_deps(["db", "cache"]),
            value("metrics"),
        ])
        .unwrap();
    (container, destroyed)
}

fn names(list: &[&str]) -> Vec<ComponentName> {
    list.iter().map(|&name| name.into()).collect()
}

#[test]
fn test_loaded_names_are_dependency_ordered() {
    let (container, _destroyed) = setup();
    let order = container.loaded_component_names();
    let position = |name: &str| order.iter().position(|n| n.as_str() == name).unwrap();
    assert!(position("config") < position("db"));
    assert!(position("config") < position("cache"));
    assert!(position("db") < position("repo"));
    assert!(position("cache") < position("repo"));
    assert_eq!(order.len(), 5);
}

#[test]
fn test_unload_leaf() {
    let (container, destroyed) = setup();
    container
        .unload_named_components(&names(&["repo"]), false)
        .unwrap();
    assert_eq!(*destroyed.lock(), vec!["repo".to_string()]);
    assert!(container.get_component(&"repo".into()).is_err());
    assert!(container.get_component(&"db".into()).is_ok());
}

#[test]
fn test_unload_with_dependents_refused() {
    let (container, destroyed) = setup();
    let err = container
        .unload_named_components(&names(&["config"]), false)
        .unwrap_err();
    match err {
        ComponentError::HasDependents { name, dependents } => {
            assert_eq!(name, "config");
            assert_eq!(dependents, vec!["cache", "db", "repo"]);
        }
        other => panic!("期望存在依赖方, 实际: {other:?}"),
    }
    assert!(destroyed.lock().is_empty());
    assert_eq!(container.loaded_component_names().len(), 5);
}

#[test]
fn test_recursive_unload_removes_dependents_first() {
    let (container, destroyed) = setup();
    container
        .unload_named_components(&names(&["config"]), true)
        .unwrap();

    let destroyed = destroyed.lock().clone();
    assert_eq!(destroyed.len(), 4);
    assert_eq!(destroyed.first().map(String::as_str), Some("repo"));
    assert_eq!(destroyed.last().map(String::as_str), Some("config"));
    assert_eq!(container.loaded_component_names(), names(&["metrics"]));
}

#[test]
fn test_unload_unknown_name_removes_nothing() {
    let (container, destroyed) = setup();
    let err = container
        .unload_named_components(&names(&["repo", "ghost"]), true)
        .unwrap_err();
    assert_eq!(err.kind(), ComponentErrorKind::NameNotFound);
    assert!(destroyed.lock().is_empty());
    assert_eq!(container.loaded_component_names().len(), 5);
}

#[test]
fn test_unload_child_container() {
    let destroyed = Arc::new(Mutex::new(Vec::new()));
    let container = ComponentContainerImpl::with_registry(registry(destroyed.clone()));
    container
        .load_named_components(vec![ComponentConfig::new("group", "container").with_config(
            json!({
                "components": [
                    { "name": "first", "type": "value" },
                    { "name": "second", "type": "value", "deps": ["first"] },
                    { "name": "alias", "refer": "first", "deps": ["first"] }
                ]
            }),
        )])
        .unwrap();

    container
        .unload_named_components(&names(&["group"]), false)
        .unwrap();
    assert_eq!(
        *destroyed.lock(),
        vec!["second".to_string(), "first".to_string()]
    );
    assert!(container.loaded_component_names().is_empty());
}
