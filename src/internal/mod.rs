//! Internal implementation details.

pub(crate) mod circular;
pub(crate) mod trace;

pub(crate) use circular::StackGuard;
