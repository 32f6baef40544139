//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// stock shortages, conflicts). Infrastructure concerns belong elsewhere and are
/// converted at the boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed input, duplicate unique key).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A reservation asked for more units than are on hand.
    ///
    /// This is a specialisation of [`DomainError::Validation`]; see
    /// [`DomainError::is_validation`].
    #[error("insufficient stock for '{label}': requested {requested}, available {available}")]
    InsufficientStock {
        label: String,
        requested: u32,
        available: u32,
    },

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A requested entity does not exist.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    /// A deletion or state transition is blocked by existing data.
    ///
    /// `blocking` carries the number of dependent rows when the conflict comes
    /// from a referential check.
    #[error("conflict: {message}")]
    Conflict {
        message: String,
        blocking: Option<u64>,
    },

    /// Authorization failure at the domain boundary.
    #[error("unauthorized")]
    Unauthorized,
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn insufficient_stock(label: impl Into<String>, requested: u32, available: u32) -> Self {
        Self::InsufficientStock {
            label: label.into(),
            requested,
            available,
        }
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn not_found(entity: &'static str, id: impl core::fmt::Display) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict {
            message: msg.into(),
            blocking: None,
        }
    }

    /// Conflict raised by a referential check, carrying the dependent count.
    pub fn blocked(msg: impl Into<String>, blocking: u64) -> Self {
        Self::Conflict {
            message: msg.into(),
            blocking: Some(blocking),
        }
    }

    /// `true` for plain validation failures and for stock shortages.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::InsufficientStock { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    /// Number of dependents reported by a referential conflict.
    pub fn blocking_count(&self) -> Option<u64> {
        match self {
            Self::Conflict { blocking, .. } => *blocking,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_stock_counts_as_validation() {
        let err = DomainError::insufficient_stock("Dune", 6, 5);
        assert!(err.is_validation());
        assert!(!err.is_conflict());
        assert_eq!(
            err.to_string(),
            "insufficient stock for 'Dune': requested 6, available 5"
        );
    }

    #[test]
    fn blocked_conflict_carries_count() {
        let err = DomainError::blocked("author has books", 2);
        assert!(err.is_conflict());
        assert_eq!(err.blocking_count(), Some(2));
        assert_eq!(DomainError::conflict("nope").blocking_count(), None);
    }

    #[test]
    fn not_found_message_names_entity() {
        let err = DomainError::not_found("book", 42);
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "book 42 not found");
    }
}
