//! 容器树集成测试：子容器、引用路径与上下文路径

mod common;

use common::{registry, root_container};
use di_abstractions::{get_component, ComponentConfig, ComponentContainer};
use di_impl::{ComponentContainerImpl, CONTAINER_COMPONENT_TYPE};
use infrastructure_common::{ComponentError, ComponentErrorKind, ComponentName};
use infrastructure_composition::WiringBuilder;
use parking_lot::Mutex;
use serde_json::json;
use std::sync::Arc;

/// 三层容器树：root -> outer -> inner
fn layered_descriptions() -> serde_json::Value {
    json!([
        { "name": "top", "type": "value", "config": { "value": "top" } },
        {
            "name": "outer",
            "type": "container",
            "deps": ["top"],
            "config": {
                "components": [
                    { "name": "sibling", "type": "value", "config": { "value": "sibling" } },
                    {
                        "name": "inner",
                        "type": "container",
                        "deps": ["sibling"],
                        "config": {
                            "components": [
                                { "name": "leaf", "type": "value", "config": { "value": "leaf" } },
                                { "name": "up", "refer": "../sibling" },
                                { "name": "grand", "refer": "../../top" },
                                { "name": "from_root", "refer": "/top" },
                                { "name": "same", "refer": "./leaf", "deps": ["leaf"] }
                            ]
                        }
                    }
                ]
            }
        }
    ])
}

fn layered() -> Arc<ComponentContainerImpl> {
    WiringBuilder::new()
        .factory_registry(registry(Arc::default()))
        .add_components_json(layered_descriptions())
        .unwrap()
        .build()
        .unwrap()
}

fn child(container: &dyn ComponentContainer, name: &str) -> Arc<dyn ComponentContainer> {
    container
        .get_component(&name.into())
        .unwrap()
        .instance
        .as_container()
        .unwrap_or_else(|| panic!("{name} 应该是一个容器"))
}

fn value(container: &dyn ComponentContainer, name: &str) -> String {
    get_component::<String, _>(container, &name.into())
        .unwrap()
        .instance
}

#[test]
fn test_references_across_levels() {
    let root = layered();
    let outer = child(root.as_ref(), "outer");
    let inner = child(outer.as_ref(), "inner");

    assert_eq!(value(inner.as_ref(), "leaf"), "leaf");
    assert_eq!(value(inner.as_ref(), "up"), "sibling");
    assert_eq!(value(inner.as_ref(), "grand"), "top");
    assert_eq!(value(inner.as_ref(), "from_root"), "top");
    assert_eq!(value(inner.as_ref(), "same"), "leaf");
}

#[test]
fn test_absolute_reference_after_load() {
    let root = layered();
    let outer = child(root.as_ref(), "outer");
    let inner = child(outer.as_ref(), "inner");

    // 装配过程中 outer 尚未放入根容器，绝对路径只能在装配完成后经过它
    inner
        .load_named_components(vec![ComponentConfig::reference(
            "absolute",
            "/outer/inner/leaf",
        )])
        .unwrap();
    assert_eq!(value(inner.as_ref(), "absolute"), "leaf");
}

#[test]
fn test_reference_keeps_target_context() {
    let root = layered();
    let outer = child(root.as_ref(), "outer");
    let inner = child(outer.as_ref(), "inner");

    let up = inner.get_component(&"up".into()).unwrap();
    let sibling = outer.get_component(&"sibling".into()).unwrap();
    assert!(up.instance.ptr_eq(&sibling.instance));
    assert_eq!(up.context.name().as_str(), "sibling");
}

#[test]
fn test_context_paths() {
    let root = layered();
    let outer = child(root.as_ref(), "outer");
    let inner = child(outer.as_ref(), "inner");

    let leaf = inner.get_component(&"leaf".into()).unwrap();
    assert_eq!(
        leaf.context.absolute_path(),
        vec![
            ComponentName::from("outer"),
            ComponentName::from("inner"),
            ComponentName::from("leaf"),
        ]
    );

    let top = root.get_component(&"top".into()).unwrap();
    assert_eq!(top.context.absolute_path(), vec![ComponentName::from("top")]);

    let found = leaf.context.find_root();
    assert!(found.container().is_none());
    let mounted = found.mount().and_then(|m| m.as_container()).unwrap();
    assert_eq!(mounted.loaded_component_names(), root.loaded_component_names());
}

#[test]
fn test_child_container_context() {
    let root = layered();
    let outer = child(root.as_ref(), "outer");
    let inner = child(outer.as_ref(), "inner");

    let context = inner.context();
    assert_eq!(context.name().as_str(), "inner");
    assert_eq!(context.config().type_id.as_str(), CONTAINER_COMPONENT_TYPE);
    assert!(context.mount().and_then(|m| m.as_container()).is_some());

    let parent = inner.parent().unwrap();
    assert_eq!(parent.context().name().as_str(), "outer");
    assert!(inner.context().container().is_some());
}

#[test]
fn test_reference_to_container_itself() {
    let root = layered();
    let outer = child(root.as_ref(), "outer");
    let inner = child(outer.as_ref(), "inner");

    inner
        .load_named_components(vec![ComponentConfig::reference("parent", "..")])
        .unwrap();
    let parent = child(inner.as_ref(), "parent");
    assert!(parent.get_component(&"sibling".into()).is_ok());
}

#[test]
fn test_non_container_intermediate() {
    let root = layered();
    let err = root
        .load_named_components(vec![ComponentConfig::reference("bad", "top/anything")])
        .unwrap_err();
    match err {
        ComponentError::NotAContainer { path, segment } => {
            assert_eq!(path, "top/anything");
            assert_eq!(segment, "top");
        }
        other => panic!("期望非容器错误, 实际: {other:?}"),
    }
}

#[test]
fn test_parent_of_root() {
    let root = root_container();
    let err = root
        .load_named_components(vec![ComponentConfig::reference("bad", "../x")])
        .unwrap_err();
    assert_eq!(err.kind(), ComponentErrorKind::ParentNotFound);
}

#[test]
fn test_invalid_reference_paths() {
    let root = layered();
    for refer in ["a//b", "outer/", "outer/1x", "outer/a.b"] {
        let err = root
            .load_named_components(vec![ComponentConfig::reference("bad", refer)])
            .unwrap_err();
        assert_eq!(err.kind(), ComponentErrorKind::NameInvalid, "{refer}");
    }
}

#[test]
fn test_missing_reference_target() {
    let root = layered();
    let err = root
        .load_named_components(vec![ComponentConfig::reference("bad", "outer/ghost")])
        .unwrap_err();
    assert_eq!(err.kind(), ComponentErrorKind::NameNotFound);
}

#[test]
fn test_child_failure_fails_parent_batch() {
    let destroyed = Arc::new(Mutex::new(Vec::new()));
    let root = ComponentContainerImpl::with_registry(registry(destroyed));
    let err = root
        .load_named_components(vec![ComponentConfig::new("outer", "container").with_config(
            json!({ "components": [ { "name": "broken", "refer": "../missing" } ] }),
        )])
        .unwrap_err();
    assert_eq!(err.kind(), ComponentErrorKind::NameNotFound);
    assert!(root.loaded_component_names().is_empty());
}
