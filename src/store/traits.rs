use crate::model::{Id, Stored};
use anyhow::Result;
use std::sync::Arc;

/// In-place edit applied by [`EntityStore::update`] while the row is locked.
pub type Mutator<T> = Box<dyn FnOnce(&mut T) + Send>;

/// Shared handle to the store for one record type.
pub type SharedStore<T> = Arc<dyn EntityStore<T>>;

/// Keyed storage for one record type with store-assigned identifiers.
///
/// Identifiers are handed out in increasing order and are never reused,
/// deleted ones included. `reset` is the one exception: it drops and
/// recreates the table, numbering restarts at 1.
#[async_trait::async_trait]
pub trait EntityStore<T>: Send + Sync {
    /// Persist a new record and return it with its assigned id
    async fn create(&self, data: T) -> Result<Stored<T>>;
    async fn get(&self, id: Id) -> Result<Option<Stored<T>>>;
    /// All records in insertion order
    async fn list(&self) -> Result<Vec<Stored<T>>>;
    /// Apply `mutate` to the record under the store's write lock.
    /// Returns `None` when no record has this id.
    async fn update(&self, id: Id, mutate: Mutator<T>) -> Result<Option<Stored<T>>>;
    /// Returns false if the record did not exist
    async fn delete(&self, id: Id) -> Result<bool>;
    /// Drop every record and restart id assignment
    async fn reset(&self) -> Result<()>;
}
