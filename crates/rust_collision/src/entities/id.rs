//! Entity identity

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Entity identifier
///
/// Two collidable objects are the same object exactly when their ids are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId {
    id: u64,
}

impl EntityId {
    /// Allocate a fresh id, unique for the lifetime of the process
    pub fn next() -> Self {
        Self {
            id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
        }
    }

    /// Wrap a raw id assigned by an outer entity system
    pub const fn from_raw(id: u64) -> Self {
        Self { id }
    }

    /// Get the raw id
    pub const fn id(&self) -> u64 {
        self.id
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.id)
    }
}
