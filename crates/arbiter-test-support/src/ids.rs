//! Test id generator — deterministic `IdGenerator` implementation for tests.

use std::sync::atomic::{AtomicU64, Ordering};

use arbiter_core::id::IdGenerator;
use uuid::Uuid;

/// Issues `00000000-0000-0000-0000-000000000001`, `...02`, ... in order, so
/// tests can predict every identifier the ledger or latch mints.
#[derive(Debug, Default)]
pub struct SequentialIds {
    counter: AtomicU64,
}

impl SequentialIds {
    /// Create a generator whose first id is `1`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the id that the `n`th call (1-based) produces.
    #[must_use]
    pub fn nth(n: u64) -> Uuid {
        Uuid::from_u128(u128::from(n))
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> Uuid {
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        Self::nth(n)
    }
}
