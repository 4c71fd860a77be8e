//! Core identifier types.
//!
//! IDs are lightweight Copy newtypes minted from atomic counters.

use std::sync::atomic::{AtomicU64, Ordering};

/// Unique identifier for effect dispatches.
///
/// Each operation-shaped handler invocation gets a fresh DispatchId so that
/// one-shot tactic violations and trace events can name the exact occurrence.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct DispatchId(pub u64);

static DISPATCH_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

impl DispatchId {
    /// Create a fresh unique DispatchId.
    pub fn fresh() -> Self {
        DispatchId(DISPATCH_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw value.
    pub fn raw(&self) -> u64 {
        self.0
    }

    pub fn from_raw(value: u64) -> Self {
        DispatchId(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_id_fresh_is_unique() {
        let d1 = DispatchId::fresh();
        let d2 = DispatchId::fresh();
        assert_ne!(d1, d2);
    }

    #[test]
    fn test_dispatch_id_raw_roundtrip() {
        let id = DispatchId::from_raw(42);
        assert_eq!(id.raw(), 42);
    }
}
