//! Sales orders: line items priced at placement time and a shipping lifecycle.
//!
//! Pure domain logic; stock reservation is orchestrated by the service layer.

pub mod order;

pub use order::{NewOrder, NewOrderLine, Order, OrderId, OrderItem, OrderStatus};
