//! JSON1 capability detection
//!
//! Whether an SQLite build ships the JSON1 functions cannot change while a
//! handle is open, so each handle is probed at most once and the answer is
//! kept in a side table keyed by [`HandleId`].

use super::{Database, HandleId, SqlHandle};
use lazy_static::lazy_static;
use log::{debug, warn};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Minimal JSON1 invocation used as the probe
pub const PROBE_SQL: &str = r#"SELECT json('{"x":1}')"#;

lazy_static! {
    static ref GLOBAL_PROBE: CapabilityProbe = CapabilityProbe::new();
    static ref JSON1_AVAILABLE: bool = probe_in_memory();
}

/// Per-handle JSON1 capability cache
#[derive(Debug, Default)]
pub struct CapabilityProbe {
    cache: Mutex<HashMap<HandleId, bool>>,
}

impl CapabilityProbe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide probe shared by fields and index provisioning
    pub fn global() -> &'static CapabilityProbe {
        &GLOBAL_PROBE
    }

    /// Whether `handle` supports JSON1.
    ///
    /// The first call for a handle runs [`PROBE_SQL`]; later calls are served
    /// from the cache. The lock is released while probing, so two threads
    /// racing on a fresh handle may both probe; the outcome is the same.
    pub fn probe(&self, handle: &dyn SqlHandle) -> bool {
        let id = handle.handle_id();
        if let Some(available) = self.cached(id) {
            return available;
        }

        let available = run_probe(handle);
        self.lock().insert(id, available);
        available
    }

    /// Cached answer for a handle, without probing
    pub fn cached(&self, id: HandleId) -> Option<bool> {
        self.lock().get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<HandleId, bool>> {
        // The map is always left consistent, so a poisoned lock is still usable
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn run_probe(handle: &dyn SqlHandle) -> bool {
    match handle.execute_sql(PROBE_SQL) {
        Ok(()) => {
            debug!("JSON1 available on {}", handle.handle_id());
            true
        }
        Err(err) if err.is_missing_function() => {
            warn!("SQLite build behind {} lacks JSON1: {}", handle.handle_id(), err);
            false
        }
        Err(err) => {
            warn!("JSON1 probe failed on {}: {}", handle.handle_id(), err);
            false
        }
    }
}

/// Probe the linked SQLite build through a throwaway in-memory handle.
///
/// Nothing is cached here; use [`json1_available`] for the process-wide flag.
pub fn probe_in_memory() -> bool {
    match Database::open_in_memory() {
        Ok(db) => run_probe(&db),
        Err(err) => {
            warn!("cannot open in-memory database for JSON1 probe: {}", err);
            false
        }
    }
}

/// Process-wide JSON1 flag, computed on first use
pub fn json1_available() -> bool {
    *JSON1_AVAILABLE
}
