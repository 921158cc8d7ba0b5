//! Collection of rejected constructors for traced resolutions.

use std::cell::RefCell;

use crate::diagnostics::RejectedConstructor;

thread_local! {
    static TRACE: RefCell<Option<Vec<RejectedConstructor>>> = const { RefCell::new(None) };
}

/// Records a rejection if a traced resolution is active on this thread.
pub(crate) fn record(rejection: &RejectedConstructor) {
    TRACE.with(|trace| {
        if let Some(collected) = trace.borrow_mut().as_mut() {
            collected.push(rejection.clone());
        }
    });
}

/// Restores the enclosing collector, handing it our rejections as well.
struct Restore {
    previous: Option<Vec<RejectedConstructor>>,
}

impl Drop for Restore {
    fn drop(&mut self) {
        let previous = std::mem::take(&mut self.previous);
        TRACE.with(|trace| {
            let ours = trace.replace(previous);
            if let (Some(outer), Some(ours)) = (trace.borrow_mut().as_mut(), ours) {
                outer.extend(ours);
            }
        });
    }
}

/// Runs `f` with rejection collection enabled and returns what it recorded.
///
/// Nested collections are supported: an enclosing collection also receives
/// everything recorded by the inner one.
pub(crate) fn collect<T>(f: impl FnOnce() -> T) -> (T, Vec<RejectedConstructor>) {
    let previous = TRACE.with(|trace| trace.replace(Some(Vec::new())));
    let restore = Restore { previous };

    let value = f();

    let collected = TRACE
        .with(|trace| trace.borrow().clone())
        .unwrap_or_default();
    drop(restore);

    (value, collected)
}
