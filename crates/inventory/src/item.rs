use serde::{Deserialize, Serialize};

use shelfkeep_core::{DomainError, DomainResult, Entity, EntityId};

shelfkeep_core::entity_id!(
    /// Tracked item identifier (one per counted resource: a book's stock, a book's copies).
    TrackedItemId
);

/// A countable resource whose quantity must never go negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedItem {
    id: TrackedItemId,
    owner: EntityId,
    label: String,
    quantity_on_hand: u32,
    min_threshold: Option<u32>,
}

impl TrackedItem {
    /// Register a new item for `owner` (the parent entity, e.g. a book).
    pub fn new(
        owner: EntityId,
        label: impl Into<String>,
        quantity_on_hand: u32,
        min_threshold: Option<u32>,
    ) -> DomainResult<Self> {
        let label = label.into();
        if label.trim().is_empty() {
            return Err(DomainError::validation("label cannot be empty"));
        }
        Ok(Self {
            id: TrackedItemId::new(),
            owner,
            label,
            quantity_on_hand,
            min_threshold,
        })
    }

    pub fn id_typed(&self) -> TrackedItemId {
        self.id
    }

    pub fn owner(&self) -> EntityId {
        self.owner
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn quantity_on_hand(&self) -> u32 {
        self.quantity_on_hand
    }

    pub fn min_threshold(&self) -> Option<u32> {
        self.min_threshold
    }

    /// At or below the item's own minimum threshold.
    pub fn is_low_stock(&self) -> bool {
        self.min_threshold
            .is_some_and(|threshold| self.quantity_on_hand <= threshold)
    }

    /// Take `quantity` units. All-or-nothing: on failure nothing changes.
    pub fn reserve(&mut self, quantity: u32) -> DomainResult<()> {
        if quantity == 0 {
            return Err(DomainError::validation("quantity must be positive"));
        }
        let remaining = self.quantity_on_hand.checked_sub(quantity).ok_or_else(|| {
            DomainError::insufficient_stock(&self.label, quantity, self.quantity_on_hand)
        })?;
        self.quantity_on_hand = remaining;
        Ok(())
    }

    /// Put `quantity` units back.
    ///
    /// The item keeps no record of outstanding reservations; pairing a release
    /// with an earlier reserve is the caller's job.
    pub fn release(&mut self, quantity: u32) -> DomainResult<()> {
        self.quantity_on_hand = self
            .quantity_on_hand
            .checked_add(quantity)
            .ok_or_else(|| DomainError::validation("quantity overflow"))?;
        Ok(())
    }

    /// Overwrite the counters (manual stock correction).
    pub fn set_levels(&mut self, quantity_on_hand: u32, min_threshold: Option<u32>) {
        self.quantity_on_hand = quantity_on_hand;
        self.min_threshold = min_threshold;
    }

    pub fn relabel(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }
}

impl Entity for TrackedItem {
    type Id = TrackedItemId;
    const KIND: &'static str = "tracked item";

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn unique_keys(&self) -> Vec<(&'static str, String)> {
        vec![("owner", self.owner.to_string())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(quantity: u32, threshold: Option<u32>) -> TrackedItem {
        TrackedItem::new(EntityId::new(), "War and Peace", quantity, threshold).unwrap()
    }

    #[test]
    fn reserve_exact_quantity_empties_item() {
        let mut it = item(5, None);
        it.reserve(5).unwrap();
        assert_eq!(it.quantity_on_hand(), 0);
    }

    #[test]
    fn over_reserve_fails_and_leaves_quantity() {
        let mut it = item(5, None);
        let err = it.reserve(6).unwrap_err();
        assert_eq!(err, DomainError::insufficient_stock("War and Peace", 6, 5));
        assert_eq!(it.quantity_on_hand(), 5);
    }

    #[test]
    fn zero_reservation_is_rejected() {
        let mut it = item(5, None);
        assert!(matches!(it.reserve(0), Err(DomainError::Validation(_))));
    }

    #[test]
    fn low_stock_is_inclusive_of_threshold() {
        let mut it = item(11, Some(10));
        assert!(!it.is_low_stock());
        it.reserve(1).unwrap();
        assert!(it.is_low_stock());
        assert!(!item(0, None).is_low_stock());
    }

    #[test]
    fn blank_label_is_rejected() {
        assert!(TrackedItem::new(EntityId::new(), " ", 1, None).is_err());
    }
}
