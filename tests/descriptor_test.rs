//! Integration tests for the exported descriptor contracts.

use std::collections::HashMap;

use zbus::zvariant::Value;

use ble_beacon::bluetooth::{
    AdvertisementDescriptor, ObjectProperties, PropertyError, RegistrationOutcome,
    ServiceDescriptor,
};

#[test]
fn test_service_identity() {
    let service = ServiceDescriptor::new(0);

    assert_eq!(
        service.get("UUID").unwrap(),
        Value::from("c4e3409f-7723-42e0-ad14-bd1a23469eb9")
    );
    assert_eq!(service.get("Primary").unwrap(), Value::from(true));

    let all = service.get_all();
    assert_eq!(all.len(), 3);
    for (name, value) in &all {
        assert_eq!(&service.get(name).unwrap(), value);
    }
}

#[test]
fn test_advertisement_base_fields_always_enumerated() {
    let adv = AdvertisementDescriptor::new(0);
    let all = adv.get_all();

    let mut keys: Vec<_> = all.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(
        keys,
        ["Flags", "IncludeTxPower", "LocalName", "ServiceUUIDs", "Type"]
    );
    assert_eq!(all["Flags"], Value::from(6u8));
    assert_eq!(all["LocalName"], Value::from("MyDevice"));
}

#[test]
fn test_advertisement_optionals_present_iff_set() {
    let adv = AdvertisementDescriptor::new(0)
        .with_manufacturer_data(HashMap::from([(0xffff, vec![1, 2, 3])]));

    let all = adv.get_all();
    assert!(all.contains_key("ManufacturerData"));
    assert!(!all.contains_key("ServiceData"));
    assert!(!all.contains_key("SolicitUUIDs"));

    // Declared but unset fields are a tagged condition, not a missing name.
    assert!(matches!(
        adv.get("ServiceData"),
        Err(PropertyError::Unset(_))
    ));
    assert!(matches!(
        adv.get("NoSuchField"),
        Err(PropertyError::Unknown(_))
    ));
}

#[test]
fn test_descriptors_are_immutable_through_set() {
    let service = ServiceDescriptor::new(0);
    let adv = AdvertisementDescriptor::new(0);

    service.set("UUID", &Value::from("00000000-0000-0000-0000-000000000000"));
    adv.set("Flags", &Value::from(0u8));
    adv.set("LocalName", &Value::from("Hijacked"));

    assert_eq!(
        service.get("UUID").unwrap(),
        Value::from("c4e3409f-7723-42e0-ad14-bd1a23469eb9")
    );
    assert_eq!(adv.get("Flags").unwrap(), Value::from(6u8));
    assert_eq!(adv.get("LocalName").unwrap(), Value::from("MyDevice"));
}

#[test]
fn test_object_paths_are_namespaced_by_index() {
    let service = ServiceDescriptor::new(2);
    let adv = AdvertisementDescriptor::new(2);
    assert_eq!(service.object_path().as_str(), "/com/blebeacon/service2");
    assert_eq!(adv.object_path().as_str(), "/com/blebeacon/advertisement2");
}

#[tokio::test]
async fn test_registration_outcomes_share_one_queue() {
    // Failure reported by the manager is an ordinary queued event; consuming
    // it must leave the channel usable, mirroring a process that keeps
    // serving after a failed registration.
    let (tx, mut rx) = tokio::sync::mpsc::channel(8);

    tx.send(RegistrationOutcome::Failed(
        "org.bluez.Error.InProgress: Operation already in progress".into(),
    ))
    .await
    .unwrap();
    tx.send(RegistrationOutcome::Registered).await.unwrap();

    match rx.recv().await.unwrap() {
        RegistrationOutcome::Failed(text) => assert!(text.contains("InProgress")),
        other => panic!("expected failure first, got {:?}", other),
    }
    assert!(matches!(
        rx.recv().await.unwrap(),
        RegistrationOutcome::Registered
    ));
}
