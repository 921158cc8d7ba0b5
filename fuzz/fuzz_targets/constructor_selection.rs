#![no_main]

use ferrous_container::{ConstructError, Constructor, Container, Implementation, ServiceId};
use libfuzzer_sys::fuzz_target;
use std::sync::Arc;

struct Picked(usize);

// The first constructor whose parameters resolve and whose guard accepts wins
fuzz_target!(|data: &[u8]| {
    if data.is_empty() || data.len() > 16 {
        return;
    }

    let registered = data[0] & 1 != 0;
    let mut container = Container::new();
    if registered {
        container.instance(Arc::new(7u16)).unwrap();
    }

    let constructors = data[1..]
        .iter()
        .enumerate()
        .map(|(index, &byte)| {
            let accepts = byte & 1 != 0;
            if byte & 2 != 0 {
                Constructor::unary(move |_: Arc<u16>| {
                    if accepts {
                        Ok(Picked(index))
                    } else {
                        Err(ConstructError::rejected("guard"))
                    }
                })
            } else {
                Constructor::new(Vec::new(), move |_| {
                    if accepts {
                        Ok(Picked(index))
                    } else {
                        Err(ConstructError::rejected("guard"))
                    }
                })
            }
        })
        .collect();

    container
        .register_per_request(
            Some(ServiceId::of::<Picked>()),
            Some(Implementation::from_constructors::<Picked, Picked>(constructors)),
            None,
        )
        .unwrap();

    let expected = data[1..]
        .iter()
        .position(|&byte| byte & 1 != 0 && (byte & 2 == 0 || registered));

    let trace = container
        .resolve_traced(Some(ServiceId::of::<Picked>()), None)
        .unwrap();
    let picked = trace.downcast::<Picked>().unwrap().map(|p| p.0);
    assert_eq!(picked, expected);
    assert_eq!(trace.rejections.len(), expected.unwrap_or(data.len() - 1));
});
