/// Unit tests for ServiceId and Key

use ferrous_container::{key_of_type, Key, ServiceId};
use std::collections::{HashMap, HashSet};

trait Plugin: Send + Sync {}

#[test]
fn test_service_id_equality_is_by_type() {
    assert_eq!(ServiceId::of::<String>(), ServiceId::of::<String>());
    assert_ne!(ServiceId::of::<String>(), ServiceId::of::<&'static str>());
    assert_ne!(ServiceId::of::<dyn Plugin>(), ServiceId::of::<Box<dyn Plugin>>());
}

#[test]
fn test_service_id_name() {
    assert_eq!(ServiceId::of::<String>().name(), "alloc::string::String");
    assert_eq!(ServiceId::of::<u32>().to_string(), "u32");
    assert!(ServiceId::of::<dyn Plugin>().name().contains("Plugin"));
}

#[test]
fn test_service_id_type_id() {
    assert_eq!(ServiceId::of::<u8>().type_id(), std::any::TypeId::of::<u8>());
}

#[test]
fn test_key_new_selects_variant() {
    let plain = Key::new(ServiceId::of::<u32>(), None);
    let named = Key::new(ServiceId::of::<u32>(), Some("port"));

    assert!(matches!(plain, Key::Type(_)));
    assert!(matches!(named, Key::Named(_, _)));
    assert_eq!(plain, key_of_type::<u32>());
}

#[test]
fn test_key_accessors() {
    let named = Key::new(ServiceId::of::<u32>(), Some("port"));

    assert_eq!(named.service(), ServiceId::of::<u32>());
    assert_eq!(named.name(), Some("port"));
    assert_eq!(named.display_name(), "u32");
    assert_eq!(key_of_type::<u32>().name(), None);
}

#[test]
fn test_key_display() {
    assert_eq!(key_of_type::<u32>().to_string(), "u32");
    assert_eq!(
        Key::new(ServiceId::of::<u32>(), Some("port")).to_string(),
        "u32[\"port\"]"
    );
}

#[test]
fn test_key_equality() {
    let a = Key::new(ServiceId::of::<u32>(), Some("a"));
    let a2 = Key::new(ServiceId::of::<u32>(), Some("a"));
    let b = Key::new(ServiceId::of::<u32>(), Some("b"));
    let other_type = Key::new(ServiceId::of::<u64>(), Some("a"));

    assert_eq!(a, a2);
    assert_ne!(a, b);
    assert_ne!(a, other_type);
    assert_ne!(a, key_of_type::<u32>());
}

#[test]
fn test_key_hashing() {
    let mut set = HashSet::new();
    set.insert(key_of_type::<u32>());
    set.insert(Key::new(ServiceId::of::<u32>(), Some("a")));
    set.insert(Key::new(ServiceId::of::<u32>(), Some("a")));
    set.insert(Key::new(ServiceId::of::<u64>(), Some("a")));
    assert_eq!(set.len(), 3);

    let mut map = HashMap::new();
    map.insert(Key::new(ServiceId::of::<u32>(), Some("port")), 8080);
    assert_eq!(map.get(&Key::new(ServiceId::of::<u32>(), Some("port"))), Some(&8080));
    assert_eq!(map.get(&key_of_type::<u32>()), None);
}
