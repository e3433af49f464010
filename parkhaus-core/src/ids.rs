//! ## parkhaus-core::ids
//! **Monotonic identity generator**
//!
//! One generator is shared between whoever builds vehicles, slots and levels
//! and the lot that issues tickets. Ids start at 1 and are never reused.

use std::sync::atomic::{AtomicU64, Ordering};

/// Identifier carried by every entity.
pub type Id = u64;

/// Lock-free source of unique, strictly increasing ids.
#[derive(Debug)]
pub struct IdGenerator {
    next: AtomicU64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }

    /// Issues the next id.
    #[inline]
    pub fn next(&self) -> Id {
        self.next.fetch_add(1, Ordering::Relaxed)
    }

    /// The id the next call to [`IdGenerator::next`] would return.
    pub fn peek(&self) -> Id {
        self.next.load(Ordering::Relaxed)
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
