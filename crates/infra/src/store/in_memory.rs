use std::sync::RwLock;

use shelfkeep_core::Entity;

use super::r#trait::{Filter, Repository, StoreError};

/// In-memory repository.
///
/// Rows are kept in insertion order. Intended for tests/dev.
#[derive(Debug)]
pub struct InMemoryRepository<E> {
    rows: RwLock<Vec<E>>,
}

impl<E> InMemoryRepository<E> {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
        }
    }
}

impl<E> Default for InMemoryRepository<E> {
    fn default() -> Self {
        Self::new()
    }
}

fn check_unique<E: Entity>(rows: &[E], record: &E) -> Result<(), StoreError> {
    for (key, value) in record.unique_keys() {
        let taken = rows
            .iter()
            .filter(|row| row.id() != record.id())
            .any(|row| row.unique_keys().iter().any(|(k, v)| *k == key && *v == value));
        if taken {
            return Err(StoreError::UniqueViolation {
                kind: E::KIND,
                key,
                value,
            });
        }
    }
    Ok(())
}

impl<E> Repository<E> for InMemoryRepository<E>
where
    E: Entity + Clone + Send + Sync,
{
    fn find_by_id(&self, id: &E::Id) -> Result<Option<E>, StoreError> {
        let rows = self.rows.read().map_err(|_| StoreError::Poisoned)?;
        Ok(rows.iter().find(|row| row.id() == id).cloned())
    }

    fn find_all(&self) -> Result<Vec<E>, StoreError> {
        let rows = self.rows.read().map_err(|_| StoreError::Poisoned)?;
        Ok(rows.clone())
    }

    fn find_where(&self, filter: Filter<'_, E>) -> Result<Vec<E>, StoreError> {
        let rows = self.rows.read().map_err(|_| StoreError::Poisoned)?;
        Ok(rows.iter().filter(|row| filter(row)).cloned().collect())
    }

    fn count_where(&self, filter: Filter<'_, E>) -> Result<u64, StoreError> {
        let rows = self.rows.read().map_err(|_| StoreError::Poisoned)?;
        Ok(rows.iter().filter(|row| filter(row)).count() as u64)
    }

    fn insert(&self, record: E) -> Result<E, StoreError> {
        let mut rows = self.rows.write().map_err(|_| StoreError::Poisoned)?;
        if rows.iter().any(|row| row.id() == record.id()) {
            return Err(StoreError::DuplicateId {
                kind: E::KIND,
                id: record.id().to_string(),
            });
        }
        check_unique(&rows, &record)?;
        rows.push(record.clone());
        Ok(record)
    }

    fn update(&self, record: E) -> Result<E, StoreError> {
        self.update_if(record, &|_| true)
    }

    fn update_if(&self, record: E, expected: Filter<'_, E>) -> Result<E, StoreError> {
        let mut rows = self.rows.write().map_err(|_| StoreError::Poisoned)?;
        check_unique(&rows, &record)?;
        let slot = rows
            .iter_mut()
            .find(|row| row.id() == record.id())
            .ok_or_else(|| StoreError::Missing {
                kind: E::KIND,
                id: record.id().to_string(),
            })?;
        if !expected(&*slot) {
            return Err(StoreError::Stale {
                kind: E::KIND,
                id: record.id().to_string(),
            });
        }
        *slot = record.clone();
        Ok(record)
    }

    fn delete(&self, id: &E::Id) -> Result<E, StoreError> {
        let mut rows = self.rows.write().map_err(|_| StoreError::Poisoned)?;
        let index = rows
            .iter()
            .position(|row| row.id() == id)
            .ok_or_else(|| StoreError::Missing {
                kind: E::KIND,
                id: id.to_string(),
            })?;
        Ok(rows.remove(index))
    }
}
