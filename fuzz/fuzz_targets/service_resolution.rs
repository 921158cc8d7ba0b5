#![no_main]

use ferrous_container::{Constructor, Container, Injectable, Resolver};
use libfuzzer_sys::fuzz_target;
use std::sync::Arc;

struct Leaf(u8);

impl Injectable for Leaf {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![Constructor::unary(|v: Arc<u8>| Ok(Leaf(*v)))]
    }
}

struct Branch {
    leaf: Arc<Leaf>,
}

impl Injectable for Branch {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![Constructor::unary(|leaf: Arc<Leaf>| Ok(Branch { leaf }))]
    }
}

// Resolution never fails for acyclic registrations, whatever is missing
fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    let mask = data[0];
    let mut container = Container::new();
    if mask & 1 != 0 {
        container.instance(Arc::new(data[1])).unwrap();
    }
    if mask & 2 != 0 {
        container.singleton::<Leaf, Leaf>().unwrap();
    }
    if mask & 4 != 0 {
        container.per_request::<Branch, Branch>().unwrap();
    }

    for &op in &data[2..] {
        match op % 3 {
            0 => {
                let leaf = container.resolve::<Leaf>().unwrap();
                assert_eq!(leaf.is_some(), mask & 3 == 3);
            }
            1 => {
                let branch = container.resolve::<Branch>().unwrap();
                assert_eq!(branch.is_some(), mask & 7 == 7);
                if let Some(branch) = branch {
                    assert_eq!(branch.leaf.0, data[1]);
                }
            }
            _ => {
                assert!(container.resolve_keyed::<u8>("absent").unwrap().is_none());
            }
        }
    }
});
