//! Quantity ledger: the authoritative on-hand counters and their mutations.

use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};

use shelfkeep_core::{DomainError, DomainResult, EntityId};

use crate::item::{TrackedItem, TrackedItemId};

/// Storage of tracked items.
///
/// `reserve` must be a single conditional update: two callers racing for the
/// same item can never both succeed when their sum exceeds what is on hand.
pub trait QuantityLedger: Send + Sync {
    /// Add a new item. Fails if its id or its owner is already registered.
    fn register(&self, item: TrackedItem) -> DomainResult<TrackedItem>;

    fn get(&self, id: TrackedItemId) -> Option<TrackedItem>;

    fn find_by_owner(&self, owner: EntityId) -> Option<TrackedItem>;

    fn list(&self) -> Vec<TrackedItem>;

    /// Decrement by `quantity` or fail with `InsufficientStock`, leaving the item untouched.
    fn reserve(&self, id: TrackedItemId, quantity: u32) -> DomainResult<TrackedItem>;

    /// Increment by `quantity`. Not deduplicated.
    fn release(&self, id: TrackedItemId, quantity: u32) -> DomainResult<TrackedItem>;

    /// Overwrite quantity and threshold (manual correction).
    fn update_levels(
        &self,
        id: TrackedItemId,
        quantity_on_hand: u32,
        min_threshold: Option<u32>,
    ) -> DomainResult<TrackedItem>;

    /// Rename the item; reservation errors report this label.
    fn relabel(&self, id: TrackedItemId, label: &str) -> DomainResult<TrackedItem>;

    fn remove(&self, id: TrackedItemId) -> DomainResult<TrackedItem>;

    /// Items at or below `threshold`, or at or below their own minimum when `None`.
    fn low_stock(&self, threshold: Option<u32>) -> Vec<TrackedItem> {
        self.list()
            .into_iter()
            .filter(|item| match threshold {
                Some(t) => item.quantity_on_hand() <= t,
                None => item.is_low_stock(),
            })
            .collect()
    }
}

impl<L> QuantityLedger for Arc<L>
where
    L: QuantityLedger + ?Sized,
{
    fn register(&self, item: TrackedItem) -> DomainResult<TrackedItem> {
        (**self).register(item)
    }

    fn get(&self, id: TrackedItemId) -> Option<TrackedItem> {
        (**self).get(id)
    }

    fn find_by_owner(&self, owner: EntityId) -> Option<TrackedItem> {
        (**self).find_by_owner(owner)
    }

    fn list(&self) -> Vec<TrackedItem> {
        (**self).list()
    }

    fn reserve(&self, id: TrackedItemId, quantity: u32) -> DomainResult<TrackedItem> {
        (**self).reserve(id, quantity)
    }

    fn release(&self, id: TrackedItemId, quantity: u32) -> DomainResult<TrackedItem> {
        (**self).release(id, quantity)
    }

    fn update_levels(
        &self,
        id: TrackedItemId,
        quantity_on_hand: u32,
        min_threshold: Option<u32>,
    ) -> DomainResult<TrackedItem> {
        (**self).update_levels(id, quantity_on_hand, min_threshold)
    }

    fn relabel(&self, id: TrackedItemId, label: &str) -> DomainResult<TrackedItem> {
        (**self).relabel(id, label)
    }

    fn remove(&self, id: TrackedItemId) -> DomainResult<TrackedItem> {
        (**self).remove(id)
    }

    fn low_stock(&self, threshold: Option<u32>) -> Vec<TrackedItem> {
        (**self).low_stock(threshold)
    }
}

/// In-memory ledger.
///
/// Every mutation runs under one write lock, so the read-check-write of
/// `reserve` is atomic with respect to other callers.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    items: RwLock<BTreeMap<TrackedItemId, TrackedItem>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn mutate<F>(&self, id: TrackedItemId, f: F) -> DomainResult<TrackedItem>
    where
        F: FnOnce(&mut TrackedItem) -> DomainResult<()>,
    {
        // A poisoned lock still holds consistent counters: every mutation
        // validates before it assigns.
        let mut items = self.items.write().unwrap_or_else(PoisonError::into_inner);
        let item = items
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found("tracked item", id))?;
        f(item)?;
        Ok(item.clone())
    }
}

impl QuantityLedger for InMemoryLedger {
    fn register(&self, item: TrackedItem) -> DomainResult<TrackedItem> {
        let mut items = self.items.write().unwrap_or_else(PoisonError::into_inner);
        if items.contains_key(&item.id_typed()) {
            return Err(DomainError::validation(format!(
                "tracked item {} already exists",
                item.id_typed()
            )));
        }
        if items.values().any(|existing| existing.owner() == item.owner()) {
            return Err(DomainError::validation(format!(
                "'{}' is already tracked",
                item.label()
            )));
        }
        items.insert(item.id_typed(), item.clone());
        tracing::debug!(item_id = %item.id_typed(), quantity = item.quantity_on_hand(), "tracked item registered");
        Ok(item)
    }

    fn get(&self, id: TrackedItemId) -> Option<TrackedItem> {
        let items = self.items.read().unwrap_or_else(PoisonError::into_inner);
        items.get(&id).cloned()
    }

    fn find_by_owner(&self, owner: EntityId) -> Option<TrackedItem> {
        let items = self.items.read().unwrap_or_else(PoisonError::into_inner);
        items.values().find(|item| item.owner() == owner).cloned()
    }

    fn list(&self) -> Vec<TrackedItem> {
        let items = self.items.read().unwrap_or_else(PoisonError::into_inner);
        items.values().cloned().collect()
    }

    fn reserve(&self, id: TrackedItemId, quantity: u32) -> DomainResult<TrackedItem> {
        let item = self.mutate(id, |item| item.reserve(quantity))?;
        tracing::debug!(item_id = %id, quantity, remaining = item.quantity_on_hand(), "reserved");
        Ok(item)
    }

    fn release(&self, id: TrackedItemId, quantity: u32) -> DomainResult<TrackedItem> {
        let item = self.mutate(id, |item| item.release(quantity))?;
        tracing::debug!(item_id = %id, quantity, remaining = item.quantity_on_hand(), "released");
        Ok(item)
    }

    fn update_levels(
        &self,
        id: TrackedItemId,
        quantity_on_hand: u32,
        min_threshold: Option<u32>,
    ) -> DomainResult<TrackedItem> {
        self.mutate(id, |item| {
            item.set_levels(quantity_on_hand, min_threshold);
            Ok(())
        })
    }

    fn relabel(&self, id: TrackedItemId, label: &str) -> DomainResult<TrackedItem> {
        if label.trim().is_empty() {
            return Err(DomainError::validation("label cannot be empty"));
        }
        self.mutate(id, |item| {
            item.relabel(label);
            Ok(())
        })
    }

    fn remove(&self, id: TrackedItemId) -> DomainResult<TrackedItem> {
        let mut items = self.items.write().unwrap_or_else(PoisonError::into_inner);
        items
            .remove(&id)
            .ok_or_else(|| DomainError::not_found("tracked item", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn ledger_with(quantity: u32, threshold: Option<u32>) -> (InMemoryLedger, TrackedItemId) {
        let ledger = InMemoryLedger::new();
        let item = TrackedItem::new(EntityId::new(), "Anna Karenina", quantity, threshold).unwrap();
        let id = ledger.register(item).unwrap().id_typed();
        (ledger, id)
    }

    #[test]
    fn small_reservation_stays_above_threshold() {
        let (ledger, id) = ledger_with(50, Some(10));

        let item = ledger.reserve(id, 3).unwrap();
        assert_eq!(item.quantity_on_hand(), 47);
        assert!(!item.is_low_stock());
        assert!(ledger.low_stock(None).is_empty());
    }

    #[test]
    fn large_reservation_reports_low_stock_then_shortage() {
        let (ledger, id) = ledger_with(50, Some(10));

        let item = ledger.reserve(id, 45).unwrap();
        assert_eq!(item.quantity_on_hand(), 5);
        let low = ledger.low_stock(None);
        assert_eq!(low.len(), 1);
        assert_eq!(low[0].id_typed(), id);

        let err = ledger.reserve(id, 6).unwrap_err();
        assert!(matches!(err, DomainError::InsufficientStock { requested: 6, available: 5, .. }));
        assert_eq!(ledger.get(id).unwrap().quantity_on_hand(), 5);
    }

    #[test]
    fn explicit_threshold_overrides_item_threshold() {
        let (ledger, id) = ledger_with(7, None);
        assert!(ledger.low_stock(None).is_empty());
        assert_eq!(ledger.low_stock(Some(7))[0].id_typed(), id);
        assert!(ledger.low_stock(Some(6)).is_empty());
    }

    #[test]
    fn shortage_names_the_current_label() {
        let (ledger, id) = ledger_with(1, None);
        ledger.relabel(id, "Anna Karenina (2nd ed.)").unwrap();
        assert!(ledger.relabel(id, "  ").unwrap_err().is_validation());

        let err = ledger.reserve(id, 2).unwrap_err();
        assert_eq!(err, DomainError::insufficient_stock("Anna Karenina (2nd ed.)", 2, 1));
    }

    #[test]
    fn owner_can_be_tracked_once() {
        let ledger = InMemoryLedger::new();
        let owner = EntityId::new();
        ledger
            .register(TrackedItem::new(owner, "Dune", 1, None).unwrap())
            .unwrap();
        let err = ledger
            .register(TrackedItem::new(owner, "Dune", 1, None).unwrap())
            .unwrap_err();
        assert!(err.is_validation());
        assert!(ledger.find_by_owner(owner).is_some());
    }

    #[test]
    fn unknown_item_is_not_found() {
        let ledger = InMemoryLedger::new();
        assert!(ledger.reserve(TrackedItemId::new(), 1).unwrap_err().is_not_found());
        assert!(ledger.release(TrackedItemId::new(), 1).unwrap_err().is_not_found());
    }

    #[test]
    fn concurrent_reservations_never_oversell() {
        let (ledger, id) = ledger_with(100, None);
        let ledger = Arc::new(ledger);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let ledger = ledger.clone();
                thread::spawn(move || {
                    (0..50).filter(|_| ledger.reserve(id, 1).is_ok()).count()
                })
            })
            .collect();

        let granted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(granted, 100);
        assert_eq!(ledger.get(id).unwrap().quantity_on_hand(), 0);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: reserve then release restores the original quantity.
            #[test]
            fn reserve_release_round_trip(start in 0u32..10_000, take in 1u32..10_000) {
                let (ledger, id) = ledger_with(start, None);
                match ledger.reserve(id, take) {
                    Ok(_) => {
                        ledger.release(id, take).unwrap();
                    }
                    Err(err) => prop_assert!(err.is_validation()),
                }
                prop_assert_eq!(ledger.get(id).unwrap().quantity_on_hand(), start);
            }

            /// Property: quantity never exceeds its starting capacity while
            /// callers pair releases with successful reserves.
            #[test]
            fn paired_operations_stay_within_capacity(
                start in 0u32..500,
                ops in proptest::collection::vec((any::<bool>(), 1u32..50), 0..64)
            ) {
                let (ledger, id) = ledger_with(start, None);
                let mut outstanding: Vec<u32> = Vec::new();
                for (is_reserve, qty) in ops {
                    if is_reserve {
                        if ledger.reserve(id, qty).is_ok() {
                            outstanding.push(qty);
                        }
                    } else if let Some(qty) = outstanding.pop() {
                        ledger.release(id, qty).unwrap();
                    }
                    let on_hand = ledger.get(id).unwrap().quantity_on_hand();
                    prop_assert!(on_hand <= start);
                    prop_assert_eq!(on_hand + outstanding.iter().sum::<u32>(), start);
                }
            }
        }
    }
}
