//! Fallback resolution across interfaces, implementations and bridges.

use std::sync::Arc;

use distlock::{
    Callable, CallableKind, DeclaredConfigSource, FallbackResolver, LockDeclaration,
    OverrideTable, StaticDeclarations, TypeDefaults, TypeName,
};

fn billing_charge() -> Callable {
    Callable::new("Billing", "charge").key_param("order_id", "u64")
}

fn stripe() -> TypeName {
    TypeName::new("StripeBilling")
}

#[test]
fn implementation_declaration_overrides_interface() {
    let implementation = billing_charge().declared_on("StripeBilling");
    let declarations = StaticDeclarations::new()
        .on_callable(&billing_charge(), LockDeclaration::new().prefix("interface"))
        .on_callable(&implementation, LockDeclaration::new().prefix("impl"));
    let resolver = FallbackResolver::new(DeclaredConfigSource::new(declarations))
        .with_normalizer(OverrideTable::new().implementation(implementation));

    let configs = resolver
        .resolve(&billing_charge(), &stripe())
        .unwrap()
        .unwrap();
    assert_eq!(configs[0].prefix(), "impl");
    assert_eq!(configs[0].name(), "StripeBilling::charge(u64)");
}

#[test]
fn implementation_type_declaration_beats_interface_method() {
    let implementation = billing_charge().declared_on("StripeBilling");
    let declarations = StaticDeclarations::new()
        .on_callable(&billing_charge(), LockDeclaration::new().prefix("interface"))
        .on_type("StripeBilling", LockDeclaration::new().prefix("impl-type"));
    let resolver = FallbackResolver::new(DeclaredConfigSource::new(declarations))
        .with_normalizer(OverrideTable::new().implementation(implementation));

    let configs = resolver
        .resolve(&billing_charge(), &stripe())
        .unwrap()
        .unwrap();
    assert_eq!(configs[0].prefix(), "impl-type");
}

#[test]
fn falls_back_to_interface_method_then_interface_type() {
    let implementation = billing_charge().declared_on("StripeBilling");

    let method_only = StaticDeclarations::new()
        .on_callable(&billing_charge(), LockDeclaration::new().prefix("interface"));
    let resolver = FallbackResolver::new(DeclaredConfigSource::new(method_only))
        .with_normalizer(OverrideTable::new().implementation(implementation.clone()));
    let configs = resolver
        .resolve(&billing_charge(), &stripe())
        .unwrap()
        .unwrap();
    assert_eq!(configs[0].prefix(), "interface");

    let type_only = StaticDeclarations::new()
        .on_type("Billing", LockDeclaration::new().prefix("interface-type"));
    let resolver = FallbackResolver::new(DeclaredConfigSource::new(type_only))
        .with_normalizer(OverrideTable::new().implementation(implementation));
    let configs = resolver
        .resolve(&billing_charge(), &stripe())
        .unwrap()
        .unwrap();
    assert_eq!(configs[0].prefix(), "interface-type");
}

#[test]
fn bridge_resolves_to_original_declaration() {
    let original = Callable::new("OrderRepo", "save").key_param("order", "Order");
    let bridge = Callable::new("OrderRepo", "save")
        .key_param("order", "Object")
        .with_kind(CallableKind::Bridge);
    let declarations =
        StaticDeclarations::new().on_callable(&original, LockDeclaration::new().prefix("save"));
    let resolver = FallbackResolver::new(DeclaredConfigSource::new(declarations))
        .with_normalizer(OverrideTable::new().bridge(bridge.clone(), original));

    let configs = resolver
        .resolve(&bridge, &TypeName::new("OrderRepo"))
        .unwrap()
        .unwrap();
    assert_eq!(configs[0].prefix(), "save");
}

#[test]
fn bridge_does_not_pick_up_type_level_declarations() {
    let bridge = Callable::new("OrderRepo", "save")
        .key_param("order", "Object")
        .with_kind(CallableKind::Bridge);
    let declarations =
        StaticDeclarations::new().on_type("OrderRepo", LockDeclaration::new().prefix("type"));
    let resolver = FallbackResolver::new(DeclaredConfigSource::new(declarations));

    assert!(resolver
        .resolve(&bridge, &TypeName::new("OrderRepo"))
        .unwrap()
        .is_none());
}

#[test]
fn manifest_declarations_resolve_with_type_defaults() {
    let manifest = r#"{
        "types": {
            "Payments": { "defaults": { "lock_manager": "payments" } }
        },
        "callables": {
            "Payments::charge(u64, String)": [{ "prefix": "pay", "max_wait_ms": 250 }]
        }
    }"#;
    let resolver = FallbackResolver::new(DeclaredConfigSource::new(
        StaticDeclarations::from_json(manifest).unwrap(),
    ));

    let configs = resolver
        .resolve(&crate::support::charge(), &TypeName::new("Payments"))
        .unwrap()
        .unwrap();
    assert_eq!(configs[0].prefix(), "pay");
    assert_eq!(configs[0].lock_manager(), Some("payments"));
    assert_eq!(configs[0].max_wait().as_millis(), 250);
}

#[test]
fn type_defaults_never_conflict_with_literal_keys() {
    let declarations = StaticDeclarations::new()
        .defaults("Reports", TypeDefaults::new().key_generator("daily"))
        .on_type("Reports", LockDeclaration::new().key("reports-rebuild"));
    let resolver = FallbackResolver::new(DeclaredConfigSource::new(declarations));

    let rebuild = Callable::new("Reports", "rebuild");
    let configs = resolver
        .resolve(&rebuild, &TypeName::new("Reports"))
        .unwrap()
        .unwrap();
    assert_eq!(configs[0].key(), Some("reports-rebuild"));
    assert_eq!(configs[0].key_generator(), None);
}

#[test]
fn concurrent_resolution_agrees() {
    let declarations = StaticDeclarations::new()
        .on_callable(&billing_charge(), LockDeclaration::new().prefix("m"));
    let resolver = Arc::new(FallbackResolver::new(DeclaredConfigSource::new(declarations)));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let resolver = Arc::clone(&resolver);
            std::thread::spawn(move || {
                let configs = resolver
                    .resolve(&billing_charge(), &TypeName::new("Billing"))
                    .unwrap()
                    .unwrap();
                configs[0].prefix().to_string()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), "m");
    }
    assert_eq!(resolver.cached_len(), 1);
}
