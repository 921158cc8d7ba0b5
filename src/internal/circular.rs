//! Circular dependency and depth detection.

use std::cell::RefCell;

use crate::error::{ContainerError, ContainerResult};
use crate::key::Key;

// Thread-local resolution state; entries are (container id, key)
thread_local! {
    static RESOLUTION_TLS: RefCell<ResolutionTls> = RefCell::new(ResolutionTls::default());
}

#[derive(Default)]
struct ResolutionTls {
    stack: Vec<(usize, Key)>,
}

/// Guard for managing the thread-local resolution stack.
///
/// A key is pushed for the duration of one construction and popped on drop,
/// including when the construction unwinds.
pub(crate) struct StackGuard {
    container: usize,
}

impl StackGuard {
    pub(crate) fn enter(container: usize, key: &Key, max_depth: usize) -> ContainerResult<Self> {
        RESOLUTION_TLS.with(|tls| {
            let mut tls = tls.borrow_mut();

            // Circular detection BEFORE pushing the new key
            if let Some(start) = tls
                .stack
                .iter()
                .position(|(owner, active)| *owner == container && active == key)
            {
                let mut path: Vec<Key> = tls.stack[start..]
                    .iter()
                    .filter(|(owner, _)| *owner == container)
                    .map(|(_, active)| active.clone())
                    .collect();
                path.push(key.clone());
                return Err(ContainerError::Circular(path));
            }

            if tls.stack.len() >= max_depth {
                return Err(ContainerError::DepthExceeded(max_depth));
            }

            tls.stack.push((container, key.clone()));
            Ok(())
        })?;

        Ok(Self { container })
    }
}

impl Drop for StackGuard {
    fn drop(&mut self) {
        RESOLUTION_TLS.with(|tls| {
            let mut tls = tls.borrow_mut();
            if let Some((owner, _)) = tls.stack.pop() {
                debug_assert_eq!(owner, self.container);
            }
        });
    }
}

#[cfg(test)]
pub(crate) fn depth() -> usize {
    RESOLUTION_TLS.with(|tls| tls.borrow().stack.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::key_of_type;

    #[test]
    fn guard_pops_on_drop() {
        {
            let _outer = StackGuard::enter(1, &key_of_type::<u8>(), 8).unwrap();
            let _inner = StackGuard::enter(1, &key_of_type::<u16>(), 8).unwrap();
            assert_eq!(depth(), 2);
        }
        assert_eq!(depth(), 0);
    }

    #[test]
    fn reentry_reports_cycle_from_first_occurrence() {
        let _a = StackGuard::enter(1, &key_of_type::<u8>(), 8).unwrap();
        let _b = StackGuard::enter(1, &key_of_type::<u16>(), 8).unwrap();
        match StackGuard::enter(1, &key_of_type::<u16>(), 8) {
            Err(ContainerError::Circular(path)) => {
                assert_eq!(path, vec![key_of_type::<u16>(), key_of_type::<u16>()]);
            }
            _ => panic!("expected Circular"),
        }
        assert_eq!(depth(), 2);
    }

    #[test]
    fn same_key_in_other_container_is_not_a_cycle() {
        let _a = StackGuard::enter(1, &key_of_type::<u8>(), 8).unwrap();
        assert!(StackGuard::enter(2, &key_of_type::<u8>(), 8).is_ok());
    }

    #[test]
    fn depth_limit() {
        let _a = StackGuard::enter(1, &key_of_type::<u8>(), 1).unwrap();
        assert!(matches!(
            StackGuard::enter(1, &key_of_type::<u16>(), 1),
            Err(ContainerError::DepthExceeded(1))
        ));
    }
}
