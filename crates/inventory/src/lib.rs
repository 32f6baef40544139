//! Inventory module: quantity ledger and reservation guard.
//!
//! Tracked items are plain non-negative counters; the ledger owns their
//! mutations and the guard reserves several of them for one transaction.

pub mod guard;
pub mod item;
pub mod ledger;

pub use guard::{ReservationGuard, ReservationMode, ReservationReceipt, ReservationRequest};
pub use item::{TrackedItem, TrackedItemId};
pub use ledger::{InMemoryLedger, QuantityLedger};
