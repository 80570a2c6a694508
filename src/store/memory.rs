use anyhow::Result;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::model::{Id, Stored};
use crate::store::traits::{EntityStore, Mutator, SharedStore};

#[derive(Debug)]
struct Table<T> {
    next_id: Id,
    // Ids only grow, so key order is insertion order.
    rows: BTreeMap<Id, T>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            next_id: 1,
            rows: BTreeMap::new(),
        }
    }
}

/// Process-local store for one record type
#[derive(Debug)]
pub struct MemoryStore<T> {
    table: Mutex<Table<T>>,
}

impl<T> Default for MemoryStore<T> {
    fn default() -> Self {
        Self {
            table: Mutex::new(Table::default()),
        }
    }
}

impl<T> MemoryStore<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience for wiring a fresh table into service state
    pub fn shared() -> SharedStore<T> {
        Arc::new(Self::new())
    }

    pub fn len(&self) -> usize {
        self.table.lock().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait::async_trait]
impl<T> EntityStore<T> for MemoryStore<T>
where
    T: Clone + Send + Sync + 'static,
{
    async fn create(&self, data: T) -> Result<Stored<T>> {
        let mut table = self.table.lock();
        let id = table.next_id;
        table.next_id += 1;
        table.rows.insert(id, data.clone());
        Ok(Stored::new(id, data))
    }

    async fn get(&self, id: Id) -> Result<Option<Stored<T>>> {
        let table = self.table.lock();
        Ok(table.rows.get(&id).cloned().map(|data| Stored::new(id, data)))
    }

    async fn list(&self) -> Result<Vec<Stored<T>>> {
        let table = self.table.lock();
        Ok(table
            .rows
            .iter()
            .map(|(id, data)| Stored::new(*id, data.clone()))
            .collect())
    }

    async fn update(&self, id: Id, mutate: Mutator<T>) -> Result<Option<Stored<T>>> {
        let mut table = self.table.lock();
        let Some(row) = table.rows.get_mut(&id) else {
            return Ok(None);
        };
        mutate(row);
        Ok(Some(Stored::new(id, row.clone())))
    }

    async fn delete(&self, id: Id) -> Result<bool> {
        Ok(self.table.lock().rows.remove(&id).is_some())
    }

    async fn reset(&self) -> Result<()> {
        *self.table.lock() = Table::default();
        Ok(())
    }
}
