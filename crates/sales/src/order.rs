use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shelfkeep_catalog::BookId;
use shelfkeep_core::text::limit_text;
use shelfkeep_core::{DomainError, DomainResult, Entity, Money, UserId};

shelfkeep_core::entity_id!(
    /// Sales order identifier.
    OrderId
);

/// Order status lifecycle.
///
/// `Created → Processing → Shipped → Delivered`; `Cancelled` from any
/// non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Created,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        match (self, next) {
            (Created, Processing) | (Processing, Shipped) | (Shipped, Delivered) => true,
            (from, Cancelled) => !from.is_terminal(),
            _ => false,
        }
    }
}

impl core::str::FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "CREATED" => Ok(OrderStatus::Created),
            "PROCESSING" => Ok(OrderStatus::Processing),
            "SHIPPED" => Ok(OrderStatus::Shipped),
            "DELIVERED" => Ok(OrderStatus::Delivered),
            "CANCELLED" => Ok(OrderStatus::Cancelled),
            other => Err(DomainError::validation(format!("unknown order status '{other}'"))),
        }
    }
}

/// Requested line: which book and how many.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrderLine {
    pub book: BookId,
    pub quantity: u32,
}

/// Order placement input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrder {
    pub user: UserId,
    pub lines: Vec<NewOrderLine>,
    pub shipping_address: Option<String>,
}

impl NewOrder {
    /// Build from two parallel arrays as submitted by an order form.
    ///
    /// Lines with a zero quantity are skipped; arrays of different length are rejected.
    pub fn from_parallel(
        user: UserId,
        books: &[BookId],
        quantities: &[u32],
        shipping_address: Option<String>,
    ) -> DomainResult<Self> {
        if books.len() != quantities.len() {
            return Err(DomainError::validation(format!(
                "{} books but {} quantities",
                books.len(),
                quantities.len()
            )));
        }
        let lines = books
            .iter()
            .zip(quantities)
            .filter(|&(_, &quantity)| quantity > 0)
            .map(|(&book, &quantity)| NewOrderLine { book, quantity })
            .collect();
        Ok(Self {
            user,
            lines,
            shipping_address,
        })
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.lines.is_empty() {
            return Err(DomainError::validation("order must contain at least one line"));
        }
        if self.lines.iter().any(|line| line.quantity == 0) {
            return Err(DomainError::validation("quantity must be positive"));
        }
        limit_text("shipping_address", self.shipping_address.as_deref(), 500)
    }
}

/// Placed line with the unit price captured at placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub book: BookId,
    /// Book title at placement time.
    pub title: String,
    pub quantity: u32,
    pub unit_price: Money,
}

impl OrderItem {
    pub fn subtotal(&self) -> DomainResult<Money> {
        self.unit_price.times(self.quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    user: UserId,
    items: Vec<OrderItem>,
    status: OrderStatus,
    total: Money,
    shipping_address: Option<String>,
    placed_at: DateTime<Utc>,
}

impl Order {
    /// Assemble a placed order from priced items; the total is derived here.
    pub fn place(
        user: UserId,
        items: Vec<OrderItem>,
        shipping_address: Option<String>,
        placed_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if items.is_empty() {
            return Err(DomainError::validation("order must contain at least one line"));
        }
        let total = items
            .iter()
            .try_fold(Money::ZERO, |acc, item| acc.plus(item.subtotal()?))?;
        Ok(Self {
            id: OrderId::new(),
            user,
            items,
            status: OrderStatus::Created,
            total,
            shipping_address,
            placed_at,
        })
    }

    pub fn id_typed(&self) -> OrderId {
        self.id
    }

    pub fn user(&self) -> UserId {
        self.user
    }

    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn total(&self) -> Money {
        self.total
    }

    pub fn shipping_address(&self) -> Option<&str> {
        self.shipping_address.as_deref()
    }

    pub fn placed_at(&self) -> DateTime<Utc> {
        self.placed_at
    }

    pub fn contains_book(&self, book: BookId) -> bool {
        self.items.iter().any(|item| item.book == book)
    }

    pub fn transition_to(&mut self, next: OrderStatus) -> DomainResult<()> {
        if !self.status.can_transition_to(next) {
            return Err(DomainError::conflict(format!(
                "order {} cannot move from {:?} to {:?}",
                self.id, self.status, next
            )));
        }
        self.status = next;
        Ok(())
    }

    /// Delivered orders are kept as a record.
    pub fn ensure_deletable(&self) -> DomainResult<()> {
        if self.status == OrderStatus::Delivered {
            return Err(DomainError::conflict(format!(
                "order {} has been delivered and cannot be deleted",
                self.id
            )));
        }
        Ok(())
    }
}

impl Entity for Order {
    type Id = OrderId;
    const KIND: &'static str = "order";

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(price: u64, quantity: u32) -> OrderItem {
        OrderItem {
            book: BookId::new(),
            title: "Dune".into(),
            quantity,
            unit_price: Money::from_minor(price),
        }
    }

    fn placed() -> Order {
        Order::place(UserId::new(), vec![item(1_000, 2), item(250, 3)], None, Utc::now()).unwrap()
    }

    #[test]
    fn total_is_sum_of_subtotals() {
        let order = placed();
        assert_eq!(order.total(), Money::from_minor(2_750));
        assert_eq!(order.status(), OrderStatus::Created);
    }

    #[test]
    fn full_lifecycle_created_to_delivered() {
        let mut order = placed();
        for next in [OrderStatus::Processing, OrderStatus::Shipped, OrderStatus::Delivered] {
            order.transition_to(next).unwrap();
        }
        assert_eq!(order.status(), OrderStatus::Delivered);
        assert!(order.transition_to(OrderStatus::Cancelled).unwrap_err().is_conflict());
        assert!(order.ensure_deletable().unwrap_err().is_conflict());
    }

    #[test]
    fn cancel_from_any_non_terminal_state() {
        for steps in 0..3 {
            let mut order = placed();
            for next in [OrderStatus::Processing, OrderStatus::Shipped].iter().take(steps) {
                order.transition_to(*next).unwrap();
            }
            order.transition_to(OrderStatus::Cancelled).unwrap();
            assert!(order.status().is_terminal());
            assert!(order.ensure_deletable().is_ok());
        }
    }

    #[test]
    fn skipping_states_is_rejected() {
        let mut order = placed();
        let err = order.transition_to(OrderStatus::Shipped).unwrap_err();
        assert!(err.is_conflict());
        assert_eq!(order.status(), OrderStatus::Created);
    }

    #[test]
    fn parallel_arrays_must_match() {
        let user = UserId::new();
        let books = [BookId::new(), BookId::new()];
        let err = NewOrder::from_parallel(user, &books, &[1], None).unwrap_err();
        assert!(err.is_validation());

        let order = NewOrder::from_parallel(user, &books, &[0, 4], None).unwrap();
        assert_eq!(order.lines, vec![NewOrderLine { book: books[1], quantity: 4 }]);
        assert!(order.validate().is_ok());

        let empty = NewOrder::from_parallel(user, &books, &[0, 0], None).unwrap();
        assert!(empty.validate().is_err());
    }

    #[test]
    fn status_parses_case_insensitively_and_serializes_upper() {
        assert_eq!("shipped".parse::<OrderStatus>().unwrap(), OrderStatus::Shipped);
        assert!("lost".parse::<OrderStatus>().is_err());
        assert_eq!(serde_json::to_string(&OrderStatus::Cancelled).unwrap(), "\"CANCELLED\"");
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: the stored total equals Σ unit_price × quantity.
            #[test]
            fn total_matches_lines(lines in proptest::collection::vec((1u64..100_000, 1u32..1_000), 1..20)) {
                let items: Vec<_> = lines.iter().map(|&(p, q)| item(p, q)).collect();
                let expected: u64 = lines.iter().map(|&(p, q)| p * u64::from(q)).sum();
                let order = Order::place(UserId::new(), items, None, Utc::now()).unwrap();
                prop_assert_eq!(order.total().minor(), expected);
            }
        }
    }
}
