//! Reservation guard: reserve several items for one logical transaction.

use serde::{Deserialize, Serialize};

use shelfkeep_core::DomainResult;

use crate::item::TrackedItemId;
use crate::ledger::QuantityLedger;

/// What happens to earlier reservations when a later one in the same call fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationMode {
    /// Earlier reservations stay in place. Stock taken before the failing
    /// line is not returned.
    #[default]
    BestEffort,
    /// Earlier reservations are released before the error is returned.
    AllOrNothing,
}

impl core::str::FromStr for ReservationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "best_effort" | "best-effort" => Ok(Self::BestEffort),
            "all_or_nothing" | "all-or-nothing" => Ok(Self::AllOrNothing),
            other => Err(format!("unknown reservation mode '{other}'")),
        }
    }
}

/// One (item, quantity) pair of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationRequest {
    pub item_id: TrackedItemId,
    pub quantity: u32,
}

impl ReservationRequest {
    pub fn new(item_id: TrackedItemId, quantity: u32) -> Self {
        Self { item_id, quantity }
    }
}

/// Reservations that succeeded, in request order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReservationReceipt {
    pub reserved: Vec<ReservationRequest>,
}

impl ReservationReceipt {
    pub fn total_units(&self) -> u64 {
        self.reserved.iter().map(|r| u64::from(r.quantity)).sum()
    }
}

/// Applies a batch of reservations against a ledger.
#[derive(Debug, Clone)]
pub struct ReservationGuard<L> {
    ledger: L,
    mode: ReservationMode,
}

impl<L> ReservationGuard<L>
where
    L: QuantityLedger,
{
    pub fn new(ledger: L, mode: ReservationMode) -> Self {
        Self { ledger, mode }
    }

    pub fn mode(&self) -> ReservationMode {
        self.mode
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Reserve every request in the order given.
    ///
    /// The first failure aborts the loop and is returned as-is, so an
    /// `InsufficientStock` names the first short item.
    pub fn reserve_all(&self, requests: &[ReservationRequest]) -> DomainResult<ReservationReceipt> {
        let mut receipt = ReservationReceipt::default();

        for request in requests {
            if let Err(err) = self.ledger.reserve(request.item_id, request.quantity) {
                tracing::warn!(
                    item_id = %request.item_id,
                    requested = request.quantity,
                    already_reserved = receipt.reserved.len(),
                    mode = ?self.mode,
                    error = %err,
                    "reservation rejected"
                );
                if self.mode == ReservationMode::AllOrNothing {
                    self.release_all(&receipt);
                }
                return Err(err);
            }
            receipt.reserved.push(*request);
        }

        Ok(receipt)
    }

    /// Return every unit listed in `receipt` to the ledger.
    pub fn release_all(&self, receipt: &ReservationReceipt) {
        for reservation in receipt.reserved.iter().rev() {
            if let Err(err) = self.ledger.release(reservation.item_id, reservation.quantity) {
                // Only possible when the item was removed in the meantime.
                tracing::error!(item_id = %reservation.item_id, error = %err, "release failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::TrackedItem;
    use crate::ledger::InMemoryLedger;
    use shelfkeep_core::{DomainError, EntityId};
    use std::sync::Arc;

    fn setup(mode: ReservationMode) -> (ReservationGuard<Arc<InMemoryLedger>>, TrackedItemId, TrackedItemId) {
        let ledger = Arc::new(InMemoryLedger::new());
        let a = ledger
            .register(TrackedItem::new(EntityId::new(), "Dune", 10, None).unwrap())
            .unwrap()
            .id_typed();
        let b = ledger
            .register(TrackedItem::new(EntityId::new(), "Emma", 1, None).unwrap())
            .unwrap()
            .id_typed();
        (ReservationGuard::new(ledger, mode), a, b)
    }

    #[test]
    fn all_requests_succeed() {
        let (guard, a, b) = setup(ReservationMode::BestEffort);
        let receipt = guard
            .reserve_all(&[ReservationRequest::new(a, 4), ReservationRequest::new(b, 1)])
            .unwrap();
        assert_eq!(receipt.reserved.len(), 2);
        assert_eq!(receipt.total_units(), 5);
        assert_eq!(guard.ledger().get(a).unwrap().quantity_on_hand(), 6);
        assert_eq!(guard.ledger().get(b).unwrap().quantity_on_hand(), 0);
    }

    #[test]
    fn best_effort_leaves_earlier_reservations_in_place() {
        let (guard, a, b) = setup(ReservationMode::BestEffort);
        let err = guard
            .reserve_all(&[ReservationRequest::new(a, 4), ReservationRequest::new(b, 2)])
            .unwrap_err();
        assert!(matches!(err, DomainError::InsufficientStock { ref label, .. } if label == "Emma"));
        assert_eq!(guard.ledger().get(a).unwrap().quantity_on_hand(), 6);
        assert_eq!(guard.ledger().get(b).unwrap().quantity_on_hand(), 1);
    }

    #[test]
    fn all_or_nothing_compensates_earlier_reservations() {
        let (guard, a, b) = setup(ReservationMode::AllOrNothing);
        let err = guard
            .reserve_all(&[ReservationRequest::new(a, 4), ReservationRequest::new(b, 2)])
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(guard.ledger().get(a).unwrap().quantity_on_hand(), 10);
        assert_eq!(guard.ledger().get(b).unwrap().quantity_on_hand(), 1);
    }

    #[test]
    fn first_failing_item_is_reported() {
        let (guard, a, b) = setup(ReservationMode::BestEffort);
        let err = guard
            .reserve_all(&[ReservationRequest::new(b, 5), ReservationRequest::new(a, 50)])
            .unwrap_err();
        assert!(matches!(err, DomainError::InsufficientStock { ref label, .. } if label == "Emma"));
    }

    #[test]
    fn mode_parses_from_config_strings() {
        assert_eq!("all_or_nothing".parse(), Ok(ReservationMode::AllOrNothing));
        assert_eq!("Best-Effort".parse(), Ok(ReservationMode::BestEffort));
        assert!("sometimes".parse::<ReservationMode>().is_err());
    }
}
