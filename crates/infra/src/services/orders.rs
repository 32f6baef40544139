//! Order lifecycle: placement reserves stock, cancellation returns it.

use std::sync::Arc;

use chrono::Utc;

use shelfkeep_auth::{ensure_can_act_for, Principal, User};
use shelfkeep_catalog::Book;
use shelfkeep_core::{DomainError, DomainResult, UserId};
use shelfkeep_inventory::{QuantityLedger, ReservationGuard, ReservationReceipt, ReservationRequest};
use shelfkeep_sales::{NewOrder, Order, OrderId, OrderItem, OrderStatus};

use crate::store::Repository;

pub struct OrderService {
    orders: Arc<dyn Repository<Order>>,
    users: Arc<dyn Repository<User>>,
    books: Arc<dyn Repository<Book>>,
    guard: ReservationGuard<Arc<dyn QuantityLedger>>,
}

impl OrderService {
    pub fn new(
        orders: Arc<dyn Repository<Order>>,
        users: Arc<dyn Repository<User>>,
        books: Arc<dyn Repository<Book>>,
        guard: ReservationGuard<Arc<dyn QuantityLedger>>,
    ) -> Self {
        Self {
            orders,
            users,
            books,
            guard,
        }
    }

    /// Place an order: reserve every line in the order given, snapshot prices, persist.
    ///
    /// Under `BestEffort` a shortage on a later line leaves the earlier lines
    /// reserved; under `AllOrNothing` they are released before the error returns.
    #[tracing::instrument(skip(self, principal, input), fields(user_id = %input.user, lines = input.lines.len()))]
    pub fn create(&self, principal: &Principal, input: NewOrder) -> DomainResult<Order> {
        input.validate()?;
        self.users.get(&input.user)?;
        ensure_can_act_for(principal, input.user)?;

        let mut items = Vec::with_capacity(input.lines.len());
        let mut requests = Vec::with_capacity(input.lines.len());
        for line in &input.lines {
            let book = self.books.get(&line.book)?;
            let stock = self
                .guard
                .ledger()
                .find_by_owner(line.book.entity_id())
                .ok_or_else(|| DomainError::not_found("stock for book", line.book))?;
            requests.push(ReservationRequest::new(stock.id_typed(), line.quantity));
            items.push(OrderItem {
                book: line.book,
                title: book.title().to_string(),
                quantity: line.quantity,
                unit_price: book.price(),
            });
        }

        let receipt = self.guard.reserve_all(&requests)?;
        let order = Order::place(input.user, items, input.shipping_address, Utc::now())
            .and_then(|order| self.orders.insert(order).map_err(DomainError::from));
        match order {
            Ok(order) => {
                tracing::info!(order_id = %order.id_typed(), total = %order.total(), "order created");
                Ok(order)
            }
            Err(err) => {
                self.guard.release_all(&receipt);
                Err(err)
            }
        }
    }

    pub fn get(&self, id: OrderId) -> DomainResult<Order> {
        Ok(self.orders.get(&id)?)
    }

    pub fn list(&self) -> DomainResult<Vec<Order>> {
        Ok(self.orders.find_all()?)
    }

    pub fn list_by_user(&self, user: UserId) -> DomainResult<Vec<Order>> {
        self.users.get(&user)?;
        Ok(self.orders.find_where(&|order: &Order| order.user() == user)?)
    }

    pub fn list_by_status(&self, status: OrderStatus) -> DomainResult<Vec<Order>> {
        Ok(self.orders.find_where(&|order: &Order| order.status() == status)?)
    }

    /// Move the order along its lifecycle. Cancelling goes through [`Self::cancel`].
    #[tracing::instrument(skip(self))]
    pub fn update_status(&self, id: OrderId, status: OrderStatus) -> DomainResult<Order> {
        if status == OrderStatus::Cancelled {
            return self.cancel(id);
        }
        let order = self.transition(id, status)?;
        tracing::info!(order_id = %id, status = ?order.status(), "order status updated");
        Ok(order)
    }

    /// Apply `next` and persist it only if no one moved the order in between.
    fn transition(&self, id: OrderId, next: OrderStatus) -> DomainResult<Order> {
        let mut order = self.orders.get(&id)?;
        let read = order.status();
        order.transition_to(next)?;
        Ok(self
            .orders
            .update_if(order, &|stored: &Order| stored.status() == read)?)
    }

    /// Cancel and return every line's stock.
    ///
    /// Only the caller whose transition into `Cancelled` lands releases, so
    /// stock goes back at most once. A line that cannot be released is logged
    /// and the remaining lines are still returned.
    #[tracing::instrument(skip(self))]
    pub fn cancel(&self, id: OrderId) -> DomainResult<Order> {
        let order = self.transition(id, OrderStatus::Cancelled)?;

        let ledger = self.guard.ledger();
        let mut receipt = ReservationReceipt::default();
        for item in order.items() {
            match ledger.find_by_owner(item.book.entity_id()) {
                Some(stock) => receipt
                    .reserved
                    .push(ReservationRequest::new(stock.id_typed(), item.quantity)),
                None => {
                    tracing::warn!(order_id = %id, book_id = %item.book, "no stock record to release into");
                }
            }
        }
        self.guard.release_all(&receipt);
        tracing::info!(order_id = %id, units = receipt.total_units(), "order cancelled");
        Ok(order)
    }

    /// Remove an order that has not been delivered.
    ///
    /// Stock is not returned here; callers that want it back cancel first.
    #[tracing::instrument(skip(self))]
    pub fn delete(&self, id: OrderId) -> DomainResult<()> {
        let order = self.orders.get(&id)?;
        order.ensure_deletable()?;
        self.orders.delete(&id)?;
        tracing::info!(order_id = %id, status = ?order.status(), "order deleted");
        Ok(())
    }
}
