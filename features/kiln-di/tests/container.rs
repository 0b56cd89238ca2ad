//! Behavior suite for the resolution engine: registration, alias chasing,
//! memoization, override frames, and the get facade.

use std::sync::Arc;

use kiln_di::classes::{ClassMetadata, Param};
use kiln_di::container::Container;
use kiln_di::errors::{AliasError, GetError, ResolveError};
use kiln_di::overrides::Overrides;
use kiln_di::types::{Concrete, Instance};

struct Engine;

struct TurboEngine;

struct Car {
    engine: Instance,
}

struct Garage {
    car: Arc<Car>,
}

struct Trim {
    engine: Instance,
    level: Arc<String>,
}

/// A container with the fixture classes registered: a plain `Engine`, an
/// `EngineContract` interface with a `TurboEngine` implementation, dependent
/// classes one and two levels deep, a class mixing a typed dependency with a
/// defaulted primitive, and one with an undefaulted primitive.
fn fixture() -> Container {
    let container = Container::new();

    container.register_class(ClassMetadata::new("Engine", |_| Ok(Instance::new(Engine))));

    container.register_class(ClassMetadata::interface("EngineContract"));

    container.register_class(
        ClassMetadata::new("TurboEngine", |_| Ok(Instance::new(TurboEngine)))
            .implements("EngineContract"),
    );

    container.register_class(
        ClassMetadata::new("Car", |args| {
            let engine = args.raw(0).cloned().ok_or("missing engine")?;
            Ok(Instance::new(Car { engine }))
        })
        .param(Param::typed("engine", "EngineContract")),
    );

    container.register_class(
        ClassMetadata::new("Garage", |args| {
            Ok(Instance::new(Garage {
                car: args.get::<Car>(0)?,
            }))
        })
        .param(Param::typed("car", "Car")),
    );

    container.register_class(
        ClassMetadata::new("Trim", |args| {
            Ok(Instance::new(Trim {
                engine: args.raw(0).cloned().ok_or("missing engine")?,
                level: args.get::<String>(1)?,
            }))
        })
        .param(Param::typed("engine", "Engine"))
        .param(Param::untyped("level").with_default(String::from("base"))),
    );

    container.register_class(
        ClassMetadata::new("Order", |_| Ok(Instance::new(())))
            .param(Param::untyped("first"))
            .param(Param::typed("engine", "Engine"))
            .param(Param::untyped("last")),
    );

    container
}

fn string_value(value: &Instance) -> String {
    value.downcast::<String>().expect("string value").as_ref().clone()
}

#[test]
fn global_slot_is_an_opt_in_default() {
    let container = Container::set_global(Some(Container::new())).expect("installed");
    assert!(container.ptr_eq(&Container::global()));

    Container::set_global(None);

    let fresh = Container::global();
    assert!(!fresh.ptr_eq(&container));

    Container::set_global(None);
}

#[test]
fn closure_binding_resolves_through_its_factory() {
    let container = Container::new();
    container.bind(
        "greeting",
        Concrete::factory(|_, _| Ok(Instance::new(String::from("hello")))),
    );

    let greeting = container.make("greeting").unwrap();
    assert_eq!(string_value(&greeting), "hello");
    assert!(greeting.type_name().contains("String"));
}

#[test]
fn shared_closure_returns_the_captured_value() {
    let container = Container::new();
    let captured = Instance::new(Engine);

    let value = captured.clone();
    container.singleton(
        "engine.shared",
        Concrete::factory(move |_, _| Ok(value.clone())),
    );

    assert!(container.make("engine.shared").unwrap().ptr_eq(&captured));
}

#[test]
fn unbound_class_name_resolves_reflectively() {
    let container = fixture();
    let engine = container.make("Engine").unwrap();
    assert!(engine.downcast::<Engine>().is_ok());
    assert_eq!(engine.class(), Some("Engine"));
}

#[test]
fn self_singleton_memoizes() {
    let container = fixture();
    container.singleton("Engine", "Engine");

    let first = container.make("Engine").unwrap();
    let second = container.make("Engine").unwrap();
    assert!(first.ptr_eq(&second));
}

// The shared flag is recorded but never consulted: memoization is driven
// solely by the absence of explicit parameters, so a plain bind behaves
// exactly like a singleton under parameterless resolution.
#[test]
fn bind_without_singleton_is_still_memoized() {
    let container = fixture();
    container.bind("motor", "Engine");

    let first = container.make("motor").unwrap();
    let second = container.make("motor").unwrap();
    assert!(first.ptr_eq(&second));
}

#[test]
fn interface_binding_autowires_dependents() {
    let container = fixture();
    container.bind("EngineContract", "TurboEngine");

    let car = container.make("Car").unwrap();
    let car = car.downcast::<Car>().unwrap();
    assert_eq!(car.engine.class(), Some("TurboEngine"));
    assert!(car.engine.downcast::<TurboEngine>().is_ok());
}

#[test]
fn nested_dependencies_resolve_two_levels_deep() {
    let container = fixture();
    container.bind("EngineContract", "TurboEngine");

    let garage = container.make("Garage").unwrap();
    let garage = garage.downcast::<Garage>().unwrap();
    assert_eq!(garage.car.engine.class(), Some("TurboEngine"));
}

#[test]
fn factories_receive_the_owning_container() {
    let container = Container::new();
    container.bind(
        "self-check",
        Concrete::factory(|c, _| Ok(Instance::new(c.clone()))),
    );

    let resolved = container.make("self-check").unwrap();
    assert!(resolved.downcast::<Container>().unwrap().ptr_eq(&container));
}

#[test]
fn set_contains_unset_sugar() {
    let container = Container::new();

    assert!(!container.contains("flag"));
    container.set("flag", String::from("up"));
    assert!(container.contains("flag"));
    assert_eq!(string_value(&container.make("flag").unwrap()), "up");

    container.unset("flag");
    assert!(!container.contains("flag"));
}

#[test]
fn aliases_are_transparent_for_resolution() {
    let container = Container::new();
    container.set("origin", String::from("value"));
    container.alias("origin", "mirror").unwrap();
    container.alias("mirror", "echo").unwrap();

    let direct = container.make("origin").unwrap();
    let mirror = container.make("mirror").unwrap();
    let echo = container.make("echo").unwrap();

    assert_eq!(string_value(&direct), "value");
    assert!(direct.ptr_eq(&mirror));
    assert!(mirror.ptr_eq(&echo));
}

#[test]
fn alias_resolution_honors_fresh_build_parameters() {
    let container = Container::new();
    container.bind(
        "cfg",
        Concrete::factory(|_, overrides| Ok(Instance::new(overrides.clone()))),
    );
    container.alias("cfg", "settings").unwrap();

    let frame = container
        .make_with("settings", Overrides::new().with("retries", 3_u32))
        .unwrap();
    let frame = frame.downcast::<Overrides>().unwrap();
    assert!(frame.contains("retries"));
}

#[test]
fn rebinding_replaces_the_previous_binding() {
    let container = Container::new();
    container.set("flag", String::from("first"));
    container.set("flag", String::from("second"));

    assert_eq!(string_value(&container.make("flag").unwrap()), "second");
}

#[test]
fn instance_returns_the_stored_value() {
    let container = Container::new();
    let stored = Instance::new(Engine);

    let returned = container.instance("engine", stored.clone());
    assert!(returned.ptr_eq(&stored));
    assert!(container.make("engine").unwrap().ptr_eq(&stored));
}

#[test]
fn default_values_fill_unsupplied_primitives() {
    let container = fixture();

    let trim = container.make("Trim").unwrap();
    let trim = trim.downcast::<Trim>().unwrap();
    assert_eq!(trim.level.as_str(), "base");
    assert_eq!(trim.engine.class(), Some("Engine"));
}

#[test]
fn unset_removes_bound_instances() {
    let container = Container::new();
    container.instance("engine", Instance::new(Engine));

    container.unset("engine");
    assert!(!container.bound("engine"));
}

#[test]
fn instances_and_aliases_answer_contains() {
    let container = Container::new();
    container.instance("wheel", Instance::new(Engine));
    container.alias("wheel", "rim").unwrap();

    assert!(container.contains("wheel"));
    assert!(container.contains("rim"));
}

#[test]
fn untyped_parameter_without_default_fails() {
    let container = fixture();

    let err = container.make("Order").unwrap_err();
    match err {
        ResolveError::UnresolvableDependency { parameter, class } => {
            assert_eq!(parameter, "first");
            assert_eq!(class, "Order");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn interfaces_are_not_instantiable() {
    let container = fixture();

    let err = container.make("EngineContract").unwrap_err();
    assert!(matches!(err, ResolveError::NotInstantiable(name) if name == "EngineContract"));
}

#[test]
fn missing_class_reports_the_target() {
    let container = Container::new();

    let err = container.build(Concrete::class("Phantom")).unwrap_err();
    assert!(matches!(err, ResolveError::MissingClass(name) if name == "Phantom"));
}

#[test]
fn self_alias_is_rejected() {
    let container = Container::new();

    let err = container.alias("name", "name").unwrap_err();
    assert!(matches!(err, AliasError::SelfAlias(name) if name == "name"));
}

#[test]
fn factory_handles_defer_resolution() {
    let container = Container::new();
    container.bind(
        "greeting",
        Concrete::factory(|_, _| Ok(Instance::new(String::from("hello")))),
    );

    let handle = container.factory("greeting");
    assert!(handle().unwrap().ptr_eq(&container.make("greeting").unwrap()));
}

#[test]
fn overrides_force_a_fresh_build_and_never_touch_the_cache() {
    let container = fixture();

    let cached = container.make("Trim").unwrap();

    let tuned = container
        .make_with("Trim", Overrides::new().with("level", String::from("sport")))
        .unwrap();
    assert!(!tuned.ptr_eq(&cached));
    assert_eq!(tuned.downcast::<Trim>().unwrap().level.as_str(), "sport");

    // The fresh build did not displace the memoized instance.
    let again = container.make("Trim").unwrap();
    assert!(again.ptr_eq(&cached));
    assert_eq!(again.downcast::<Trim>().unwrap().level.as_str(), "base");
}

#[test]
fn overrides_flow_through_class_binding_indirection() {
    let container = fixture();
    container.bind("trim.current", "Trim");

    let tuned = container
        .make_with(
            "trim.current",
            Overrides::new().with("level", String::from("sport")),
        )
        .unwrap();
    assert_eq!(tuned.downcast::<Trim>().unwrap().level.as_str(), "sport");
}

#[test]
fn nested_override_frames_are_isolated() {
    let container = Container::new();
    container.bind(
        "outer",
        Concrete::factory(|c, _| {
            c.make_with("inner", Overrides::new().with("name", String::from("X")))
        }),
    );
    container.bind(
        "inner",
        Concrete::factory(|_, overrides| Ok(Instance::new(overrides.clone()))),
    );

    let frame = container
        .make_with("outer", Overrides::new().with("junk", 1_u8))
        .unwrap();
    let frame = frame.downcast::<Overrides>().unwrap();

    assert_eq!(frame.len(), 1);
    assert!(!frame.contains("junk"));
    assert_eq!(string_value(frame.get("name").unwrap()), "X");
}

#[test]
fn singleton_bindings_yield_fresh_builds_with_parameters() {
    let container = Container::new();
    container.singleton(
        "cfg",
        Concrete::factory(|_, overrides| Ok(Instance::new(overrides.clone()))),
    );

    let first = container
        .make_with("cfg", Overrides::new().with("name", String::from("ada")))
        .unwrap();
    let second = container
        .make_with("cfg", Overrides::new().with("name", String::from("lin")))
        .unwrap();

    let first = first.downcast::<Overrides>().unwrap();
    let second = second.downcast::<Overrides>().unwrap();
    assert_eq!(string_value(first.get("name").unwrap()), "ada");
    assert_eq!(string_value(second.get("name").unwrap()), "lin");
}

#[test]
fn bound_knows_bindings() {
    let container = fixture();
    container.bind("EngineContract", "TurboEngine");

    assert!(container.has("EngineContract"));
    assert!(!container.has("Phantom"));
}

#[test]
fn any_word_binds_to_a_class() {
    let container = fixture();
    container.bind("roadster", "Engine");

    let resolved = container.get("roadster").unwrap();
    assert!(resolved.downcast::<Engine>().is_ok());
}

#[test]
fn unknown_entry_fails_with_not_found() {
    let container = Container::new();

    let err = container.get("phantom").unwrap_err();
    assert!(matches!(err, GetError::NotFound(id) if id == "phantom"));
}

#[test]
fn bound_but_unresolvable_keeps_the_resolution_error() {
    let container = fixture();
    container.bind("svc", "EngineContract");

    let err = container.get("svc").unwrap_err();
    assert!(matches!(
        err,
        GetError::Resolve(ResolveError::NotInstantiable(name)) if name == "EngineContract"
    ));
}

#[test]
fn forgetting_an_instance_allows_a_rebuild() {
    let container = fixture();

    let first = container.make("Engine").unwrap();
    container.forget_instance("Engine");
    let second = container.make("Engine").unwrap();

    assert!(!first.ptr_eq(&second));
}

#[test]
fn factory_failures_propagate_unchanged() {
    let container = Container::new();
    container.bind(
        "flaky",
        Concrete::factory(|_, _| Err(ResolveError::factory("flaky", "smtp unreachable"))),
    );

    let err = container.get("flaky").unwrap_err();
    assert!(matches!(
        err,
        GetError::Resolve(ResolveError::FactoryFailed { id, .. }) if id == "flaky"
    ));
}

#[test]
fn get_resolves_classes_directly() {
    let container = fixture();

    let engine = container.get("Engine").unwrap();
    assert!(engine.downcast::<Engine>().is_ok());
}
