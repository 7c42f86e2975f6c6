pub mod capability;
pub mod database;

use crate::core::Result;
use std::sync::atomic::{AtomicU64, Ordering};

pub use capability::{CapabilityProbe, json1_available, probe_in_memory};
pub use database::Database;

static NEXT_HANDLE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of an open database handle.
///
/// Allocated once when the handle is opened and never reused, so two handles
/// on the same file are always told apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandleId(pub(crate) u64);

impl HandleId {
    /// Allocate a fresh id; custom [`SqlHandle`] implementations call this once
    pub fn allocate() -> Self {
        HandleId(NEXT_HANDLE_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for HandleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "db#{}", self.0)
    }
}

/// The part of a database handle the JSON field machinery needs.
///
/// Capability probing and index provisioning only ever run a single
/// statement and care about success or failure, never about rows.
pub trait SqlHandle {
    /// Identity used as the capability cache key
    fn handle_id(&self) -> HandleId;

    /// Run one statement to completion, discarding any rows it yields
    fn execute_sql(&self, sql: &str) -> Result<()>;
}
