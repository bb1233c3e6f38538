//! Thread-safe in-memory instance store.
//!
//! [`MemoryStore`] keeps instances in a `DashMap` and answers filters by
//! scanning. It has no domain logic and no ordering guarantees across
//! records; it exists for tests, examples, and embedded hosts.

use async_trait::async_trait;
use dashmap::DashMap;

use super::{Filter, Instance, InstanceId, InstanceStore, StoreError};

/// In-memory [`InstanceStore`] backed by [`DashMap`].
///
/// Matching scans every record, so this store is only suitable for
/// small data sets. [`find`](InstanceStore::find) returns matches in an
/// unspecified order.
///
/// # Examples
///
/// ```
/// use rowsource::store::memory::MemoryStore;
/// use rowsource::store::{DefinitionId, Instance};
///
/// let store = MemoryStore::new();
/// assert!(store.is_empty());
///
/// store.insert(Instance::new(DefinitionId::new()));
/// assert_eq!(store.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    instances: DashMap<InstanceId, Instance>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an instance, replacing any record with the same id.
    /// Returns the instance's id.
    pub fn insert(&self, instance: Instance) -> InstanceId {
        let id = instance.id;
        self.instances.insert(id, instance);
        id
    }

    /// Returns a copy of the instance with the given id.
    pub fn get(&self, id: &InstanceId) -> Option<Instance> {
        self.instances.get(id).map(|entry| entry.value().clone())
    }

    /// Returns the number of stored instances.
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Returns `true` if the store holds no instances.
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

#[async_trait]
impl InstanceStore for MemoryStore {
    async fn find(&self, filter: &Filter) -> Result<Vec<Instance>, StoreError> {
        let matches = self
            .instances
            .iter()
            .filter(|entry| filter.matches(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        Ok(matches)
    }
}
