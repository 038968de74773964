//! Id generation behind an injectable provider.
//!
//! Production code uses UUID v4; tests inject [`SequentialIdProvider`] so
//! ids can be asserted deterministically.

use std::sync::atomic::{AtomicU64, Ordering};

/// Source of fresh event/log ids. Implementations must never repeat an id
/// within a process lifetime.
pub trait IdProvider: Send + Sync {
    /// Return a fresh id with the given prefix (e.g. `event`, `log`).
    fn next_id(&self, prefix: &str) -> String;
}

/// UUID v4 backed provider. The default for every composition root.
#[derive(Debug, Default)]
pub struct UuidProvider;

impl IdProvider for UuidProvider {
    fn next_id(&self, prefix: &str) -> String {
        format!("{}-{}", prefix, uuid::Uuid::new_v4())
    }
}

/// Monotonic counter provider for deterministic ids.
#[derive(Debug, Default)]
pub struct SequentialIdProvider {
    counter: AtomicU64,
}

impl SequentialIdProvider {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdProvider for SequentialIdProvider {
    fn next_id(&self, prefix: &str) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{}-{}", prefix, n)
    }
}
