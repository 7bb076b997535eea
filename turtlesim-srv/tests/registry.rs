use turtlesim_srv::srv::{
    kill, set_pen, spawn, teleport_absolute, teleport_relative, Kill, KillRequest, SetPen,
    SetPenRequest, Spawn, SpawnResponse, TeleportAbsolute, TeleportRelative,
};
use turtlesim_srv::{
    lookup, registry, MessageKind, RosMessage, RosService, ServiceName, TurtlesimSrvError,
};

#[test]
fn registry_exposes_exactly_the_five_services() {
    let names: Vec<&str> = registry().names().collect();
    assert_eq!(
        names,
        ["TeleportAbsolute", "Kill", "SetPen", "Spawn", "TeleportRelative"]
    );

    for name in &names {
        let service = lookup(name).unwrap();
        assert_eq!(service.name().as_str(), *name);
    }
}

#[test]
fn registry_fields_are_the_module_bindings() {
    let registry = registry();
    assert!(std::ptr::eq(registry.teleport_absolute, &teleport_absolute::DESCRIPTOR));
    assert!(std::ptr::eq(registry.kill, &kill::DESCRIPTOR));
    assert!(std::ptr::eq(registry.set_pen, &set_pen::DESCRIPTOR));
    assert!(std::ptr::eq(registry.spawn, &spawn::DESCRIPTOR));
    assert!(std::ptr::eq(registry.teleport_relative, &teleport_relative::DESCRIPTOR));

    assert!(std::ptr::eq(registry.teleport_absolute, TeleportAbsolute::descriptor()));
    assert!(std::ptr::eq(registry.kill, Kill::descriptor()));
    assert!(std::ptr::eq(registry.set_pen, SetPen::descriptor()));
    assert!(std::ptr::eq(registry.spawn, Spawn::descriptor()));
    assert!(std::ptr::eq(registry.teleport_relative, TeleportRelative::descriptor()));
}

#[test]
fn repeated_lookups_return_the_same_binding() {
    for name in ServiceName::ALL {
        let first = lookup(name.as_str()).unwrap();
        let second = registry().lookup(name.as_str()).unwrap();
        assert!(std::ptr::eq(first, second), "{name}");
        assert!(std::ptr::eq(first, registry().get(name)), "{name}");
    }
}

#[test]
fn unknown_service_is_not_found() {
    for name in ["", "Clear", "spawn", "TeleportAbsolute ", "turtlesim/"] {
        assert!(
            matches!(lookup(name), Err(TurtlesimSrvError::ServiceNotFound { .. })),
            "{name:?}"
        );
    }
}

#[test]
fn service_checksums() {
    let expected = [
        ("TeleportAbsolute", "a130bc60ee6513855dc62ea83fcc5b20"),
        ("Kill", "c1f3d28f1b044c871e6eff2e9fc3c667"),
        ("SetPen", "9f452acce566bf0c0954594f69a8e41b"),
        ("Spawn", "0b2d2e872a8e2887d5ed626f2bf2c561"),
        ("TeleportRelative", "9d5c2dcd348ac8f76ce2a4307bd63a13"),
    ];
    for (name, md5sum) in expected {
        assert_eq!(lookup(name).unwrap().md5sum(), md5sum, "{name}");
    }
    assert_eq!(Spawn::MD5SUM, registry().spawn.md5sum());
}

#[test]
fn typed_and_dynamic_decoding_agree() {
    let request = SetPenRequest {
        r: 10,
        g: 20,
        b: 30,
        width: 4,
        off: 1,
    };
    let bytes = request.to_bytes();

    let dynamic = registry()
        .set_pen
        .decode(MessageKind::Request, &bytes)
        .unwrap();
    let typed = serde_json::to_value(SetPenRequest::from_bytes(&bytes).unwrap()).unwrap();
    assert_eq!(dynamic.to_json(), typed);
}

#[test]
fn kill_then_spawn_exchange() {
    let kill_bytes = turtlesim_srv::srv::encode_json(
        ServiceName::Kill,
        MessageKind::Request,
        r#"{"name": "turtle1"}"#,
    )
    .unwrap();
    assert_eq!(
        KillRequest::from_bytes(&kill_bytes).unwrap().name,
        "turtle1"
    );

    let response = SpawnResponse {
        name: "turtle2".to_string(),
    };
    let value = turtlesim_srv::srv::decode_json(
        ServiceName::Spawn,
        MessageKind::Response,
        &response.to_bytes(),
    )
    .unwrap();
    assert_eq!(value["name"], "turtle2");
}
