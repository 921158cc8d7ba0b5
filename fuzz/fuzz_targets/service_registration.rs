#![no_main]

use ferrous_container::{Container, ContainerError, ContainerOptions, Resolver};
use libfuzzer_sys::fuzz_target;
use std::collections::HashSet;
use std::sync::Arc;

// Arbitrary registration sequences keep (service, key) unique
fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    let threshold = data[0] as usize % 32;
    let mut container = Container::with_options(ContainerOptions::default().with_small_threshold(threshold));
    let mut seen: HashSet<Option<u8>> = HashSet::new();

    for chunk in data[1..].chunks(2) {
        let key = match chunk {
            [0, ..] => None,
            [_, k] => Some(*k % 16),
            _ => None,
        };
        let name = key.map(|k| format!("k{}", k));
        let result = match &name {
            Some(name) => container.instance_keyed(name, Arc::new(chunk[0])),
            None => container.instance(Arc::new(chunk[0])),
        };

        if seen.insert(key) {
            assert!(result.is_ok());
        } else {
            assert!(matches!(result, Err(ContainerError::AlreadyRegistered(_))));
        }
    }

    assert_eq!(container.len(), seen.len());
    for key in &seen {
        let resolved = match key {
            Some(k) => container.resolve_keyed::<u8>(&format!("k{}", k)),
            None => container.resolve::<u8>(),
        };
        assert!(resolved.unwrap().is_some());
    }
});
