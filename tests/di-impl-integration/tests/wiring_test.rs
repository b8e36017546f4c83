//! 组件装配集成测试：构造、类型化获取与依赖顺序

mod common;

use common::{root_container, ComponentA, ComponentB, ConfigA, ConfigB};
use di_abstractions::{
    get_component, load_anonymous_component, ComponentConfig, ComponentContainer, FactoryRegistry,
    TypedComponentConfig,
};
use di_impl::{default_factory_registry, ComponentContainerImpl};
use infrastructure_common::{ComponentError, ComponentErrorKind, ComponentName};
use serde_json::json;
use std::sync::Arc;

#[test]
fn test_component_from_map_config() {
    let container = root_container();
    container
        .load_named_components(vec![
            ComponentConfig::new("ca", "a").with_config(json!({ "test_a": "testa" }))
        ])
        .unwrap();

    let ca = get_component::<Arc<dyn ComponentA>, _>(container.as_ref(), &"ca".into()).unwrap();
    assert_eq!(ca.instance.config_a().test_a, "testa");
    assert_eq!(ca.context.name().as_str(), "ca");
}

#[test]
fn test_nested_typed_component_config() {
    let container = root_container();
    let cb = TypedComponentConfig::<ConfigB, Arc<dyn ComponentB>>::new(
        "b",
        ConfigB {
            test_b: "testb".to_string(),
            inner_a: TypedComponentConfig::new(
                "a",
                ConfigA {
                    test_a: "testa".to_string(),
                },
            ),
        },
    )
    .with_name("cb");
    container.load_named_components(vec![cb.to_any()]).unwrap();

    let cb = get_component::<Arc<dyn ComponentB>, _>(container.as_ref(), &"cb".into()).unwrap();
    assert_eq!(cb.instance.config_b().test_b, "testb");
    assert_eq!(cb.instance.config_b().inner_a.config.test_a, "testa");
    assert_eq!(cb.instance.component_a().config_a().test_a, "testa");

    // 内联的 a 是匿名组件，不进入名称表
    assert_eq!(container.loaded_component_names(), vec![ComponentName::from("cb")]);
}

#[test]
fn test_nested_config_from_json() {
    let container = root_container();
    container
        .load_named_components(vec![ComponentConfig::new("cb", "b").with_config(json!({
            "test_b": "testb",
            "inner_a": { "type": "a", "config": { "test_a": "testa" } }
        }))])
        .unwrap();

    let cb = get_component::<Arc<dyn ComponentB>, _>(container.as_ref(), &"cb".into()).unwrap();
    assert_eq!(cb.instance.component_a().config_a().test_a, "testa");
}

#[test]
fn test_unknown_config_field_rejected() {
    let container = root_container();
    let err = container
        .load_named_components(vec![
            ComponentConfig::new("ca", "a").with_config(json!({ "test_a": "x", "test_c": 1 }))
        ])
        .unwrap_err();
    match err {
        ComponentError::ConfigInvalid { name, message } => {
            assert_eq!(name, "ca");
            assert!(message.contains("test_c"), "{message}");
        }
        other => panic!("期望配置非法, 实际: {other:?}"),
    }
}

#[test]
fn test_missing_config_fields_are_zeroed() {
    let container = root_container();
    container
        .load_named_components(vec![ComponentConfig::new("cb", "b").with_config(json!({
            "inner_a": { "type": "a" }
        }))])
        .unwrap();

    let cb = get_component::<Arc<dyn ComponentB>, _>(container.as_ref(), &"cb".into()).unwrap();
    assert!(cb.instance.config_b().test_b.is_empty());
    assert!(cb.instance.component_a().config_a().test_a.is_empty());
}

#[test]
fn test_dependency_constructed_first() {
    let container = root_container();
    container
        .load_named_components(vec![
            ComponentConfig::new("cb", "b")
                .with_dep("ca")
                .with_config(json!({ "inner_a": { "refer": "ca" } })),
            ComponentConfig::new("ca", "a").with_config(json!({ "test_a": "shared" })),
        ])
        .unwrap();

    assert_eq!(
        container.loaded_component_names(),
        vec![ComponentName::from("ca"), ComponentName::from("cb")]
    );
    let ca = get_component::<Arc<dyn ComponentA>, _>(container.as_ref(), &"ca".into()).unwrap();
    let cb = get_component::<Arc<dyn ComponentB>, _>(container.as_ref(), &"cb".into()).unwrap();
    assert!(Arc::ptr_eq(&ca.instance, &cb.instance.component_a()));
}

#[test]
fn test_cycle_reports_members() {
    let container = root_container();
    let err = container
        .load_named_components(vec![
            ComponentConfig::new("x", "a").with_dep("y"),
            ComponentConfig::new("y", "a").with_dep("x"),
        ])
        .unwrap_err();
    assert_eq!(err.kind(), ComponentErrorKind::CircularDependency);
    assert!(container.loaded_component_names().is_empty());
}

#[test]
fn test_typed_get_errors() {
    let container = root_container();
    container
        .load_named_components(vec![ComponentConfig::new("ca", "a")])
        .unwrap();

    let err = get_component::<Arc<dyn ComponentA>, _>(container.as_ref(), &"ghost".into())
        .err()
        .unwrap();
    assert_eq!(err.kind(), ComponentErrorKind::NameNotFound);

    let err = get_component::<Arc<dyn ComponentB>, _>(container.as_ref(), &"ca".into())
        .err()
        .unwrap();
    match err {
        ComponentError::TypeMismatch {
            name,
            type_id,
            expected,
            actual,
        } => {
            assert_eq!(name, "ca");
            assert_eq!(type_id, "a");
            assert!(expected.contains("ComponentB"), "{expected}");
            assert!(actual.contains("ComponentA"), "{actual}");
        }
        other => panic!("期望类型不匹配, 实际: {other:?}"),
    }
}

#[test]
fn test_anonymous_typed_load() {
    let container = root_container();
    let ca = load_anonymous_component::<Arc<dyn ComponentA>, _>(
        container.as_ref(),
        ComponentConfig::anonymous("a").with_config(json!({ "test_a": "anon" })),
    )
    .unwrap();
    assert_eq!(ca.instance.config_a().test_a, "anon");
    assert!(container.loaded_component_names().is_empty());

    let err = load_anonymous_component::<String, _>(container.as_ref(), ComponentConfig::anonymous("a"))
        .err()
        .unwrap();
    assert_eq!(err.kind(), ComponentErrorKind::TypeMismatch);
}

#[test]
fn test_invalid_component_names() {
    let container = root_container();
    for name in ["1abc", "名称", "a-b", "with space"] {
        let err = container
            .load_named_components(vec![ComponentConfig::new(name, "a")])
            .unwrap_err();
        assert_eq!(err.kind(), ComponentErrorKind::NameInvalid, "{name}");
    }
    container
        .load_named_components(vec![ComponentConfig::new("_ok1", "a")])
        .unwrap();
}

#[test]
fn test_description_deserialized_from_json() {
    let configs: Vec<ComponentConfig> = serde_json::from_value(json!([
        { "name": "ca", "type": "a", "config": { "test_a": "json" } },
        { "name": "alias", "refer": "ca", "deps": ["ca"] }
    ]))
    .unwrap();
    assert!(configs[1].is_reference());

    let container = root_container();
    container.load_named_components(configs).unwrap();
    let alias = get_component::<Arc<dyn ComponentA>, _>(container.as_ref(), &"alias".into()).unwrap();
    assert_eq!(alias.instance.config_a().test_a, "json");
}

#[test]
fn test_default_registry_container() {
    let registry = default_factory_registry();
    let _ = registry.unregister(&"default_a".into());
    let factory = di_impl::SimpleComponentFactory::<ConfigA, Arc<dyn ComponentA>>::new("default_a")
        .with_create(|_ctx, config: ConfigA| {
            let component: Arc<dyn ComponentA> = Arc::new(Echo(config));
            Ok(component)
        });
    registry.register(Arc::new(factory)).unwrap();

    let container = ComponentContainerImpl::new();
    container
        .load_named_components(vec![
            ComponentConfig::new("ca", "default_a").with_config(json!({ "test_a": "global" }))
        ])
        .unwrap();
    let ca = get_component::<Arc<dyn ComponentA>, _>(container.as_ref(), &"ca".into()).unwrap();
    assert_eq!(ca.instance.config_a().test_a, "global");

    // 同一注册表中的类型对新建的根容器同样可见
    let other = ComponentContainerImpl::new();
    assert!(other.factory_registry().get_factory(&"default_a".into()).is_ok());
}

struct Echo(ConfigA);

impl ComponentA for Echo {
    fn config_a(&self) -> ConfigA {
        self.0.clone()
    }
}
