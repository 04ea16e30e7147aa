//! The shared-table registry.
//!
//! All record types sharing one physical table register here explicitly,
//! ideally at startup. The table name is the sorted, `-`-joined list of
//! registered type names and is recomputed on every call, so it tracks late
//! registrations instead of going stale.
//!
//! Init-order requirement: every type must register before the first
//! operation that resolves the table name, otherwise different processes can
//! compute different names for the same logical table.

use std::collections::BTreeSet;
use std::sync::{OnceLock, RwLock};

use crate::model::Model;

/// Registry of the record types sharing one physical table.
#[derive(Debug, Default)]
pub struct TableRegistry {
    types: RwLock<BTreeSet<&'static str>>,
}

impl TableRegistry {
    /// Create an empty registry.
    pub fn new() -> TableRegistry {
        TableRegistry::default()
    }

    /// The process-wide registry used by default.
    pub fn global() -> &'static TableRegistry {
        static GLOBAL: OnceLock<TableRegistry> = OnceLock::new();
        GLOBAL.get_or_init(TableRegistry::new)
    }

    /// Register a record type. Idempotent.
    pub fn register<M: Model>(&self) {
        self.register_name(M::TYPE_NAME);
    }

    /// Register a type by name. Idempotent.
    pub fn register_name(&self, type_name: &'static str) {
        self.types
            .write()
            .expect("table registry lock poisoned")
            .insert(type_name);
    }

    /// The shared table name: sorted type names joined with `-`.
    ///
    /// Recomputed on every call. Returns an empty string when nothing has
    /// registered yet; callers must treat that as an error before issuing
    /// real store operations.
    pub fn table_name(&self) -> String {
        self.types
            .read()
            .expect("table registry lock poisoned")
            .iter()
            .copied()
            .collect::<Vec<_>>()
            .join("-")
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.types
            .read()
            .expect("table registry lock poisoned")
            .len()
    }

    /// Whether no type has registered yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
