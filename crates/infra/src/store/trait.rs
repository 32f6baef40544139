use std::sync::Arc;

use thiserror::Error;

use shelfkeep_core::{DomainError, Entity};

/// Storage failures. Converted into [`DomainError`] at the service boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("{kind} {id} already exists")]
    DuplicateId { kind: &'static str, id: String },

    #[error("{kind} with {key} '{value}' already exists")]
    UniqueViolation {
        kind: &'static str,
        key: &'static str,
        value: String,
    },

    #[error("{kind} {id} not found")]
    Missing { kind: &'static str, id: String },

    #[error("{kind} {id} changed since it was read")]
    Stale { kind: &'static str, id: String },

    #[error("store lock poisoned")]
    Poisoned,
}

impl From<StoreError> for DomainError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Missing { kind, id } => DomainError::NotFound { entity: kind, id },
            StoreError::DuplicateId { .. } | StoreError::UniqueViolation { .. } => {
                DomainError::Validation(err.to_string())
            }
            StoreError::Stale { .. } | StoreError::Poisoned => DomainError::conflict(err.to_string()),
        }
    }
}

/// Predicate passed to the query methods.
pub type Filter<'a, E> = &'a dyn Fn(&E) -> bool;

/// Row storage for one record type.
///
/// Unique constraints are declared by [`Entity::unique_keys`] and enforced on
/// `insert` and `update`. Children are counted with `count_where`; records keep
/// no back-pointers to their dependents.
pub trait Repository<E>: Send + Sync
where
    E: Entity + Clone + Send + Sync,
{
    fn find_by_id(&self, id: &E::Id) -> Result<Option<E>, StoreError>;

    /// All rows in insertion order.
    fn find_all(&self) -> Result<Vec<E>, StoreError>;

    fn find_where(&self, filter: Filter<'_, E>) -> Result<Vec<E>, StoreError>;

    fn count_where(&self, filter: Filter<'_, E>) -> Result<u64, StoreError>;

    fn insert(&self, record: E) -> Result<E, StoreError>;

    /// Replace the row with the same id.
    fn update(&self, record: E) -> Result<E, StoreError>;

    /// Replace the row only while the stored copy still satisfies `expected`;
    /// otherwise [`StoreError::Stale`]. The check and the write are one step.
    fn update_if(&self, record: E, expected: Filter<'_, E>) -> Result<E, StoreError>;

    fn delete(&self, id: &E::Id) -> Result<E, StoreError>;

    /// Row or [`StoreError::Missing`].
    fn get(&self, id: &E::Id) -> Result<E, StoreError> {
        self.find_by_id(id)?.ok_or_else(|| StoreError::Missing {
            kind: E::KIND,
            id: id.to_string(),
        })
    }

    fn exists(&self, id: &E::Id) -> Result<bool, StoreError> {
        Ok(self.find_by_id(id)?.is_some())
    }
}

impl<E, R> Repository<E> for Arc<R>
where
    E: Entity + Clone + Send + Sync,
    R: Repository<E> + ?Sized,
{
    fn find_by_id(&self, id: &E::Id) -> Result<Option<E>, StoreError> {
        (**self).find_by_id(id)
    }

    fn find_all(&self) -> Result<Vec<E>, StoreError> {
        (**self).find_all()
    }

    fn find_where(&self, filter: Filter<'_, E>) -> Result<Vec<E>, StoreError> {
        (**self).find_where(filter)
    }

    fn count_where(&self, filter: Filter<'_, E>) -> Result<u64, StoreError> {
        (**self).count_where(filter)
    }

    fn insert(&self, record: E) -> Result<E, StoreError> {
        (**self).insert(record)
    }

    fn update(&self, record: E) -> Result<E, StoreError> {
        (**self).update(record)
    }

    fn update_if(&self, record: E, expected: Filter<'_, E>) -> Result<E, StoreError> {
        (**self).update_if(record, expected)
    }

    fn delete(&self, id: &E::Id) -> Result<E, StoreError> {
        (**self).delete(id)
    }
}
