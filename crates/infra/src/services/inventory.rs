//! Warehouse stock: one tracked counter per book.

use std::sync::Arc;

use shelfkeep_catalog::{Book, BookId};
use shelfkeep_core::{DomainError, DomainResult};
use shelfkeep_inventory::{QuantityLedger, TrackedItem, TrackedItemId};

use crate::store::Repository;

pub struct InventoryService {
    books: Arc<dyn Repository<Book>>,
    stock: Arc<dyn QuantityLedger>,
    default_threshold: Option<u32>,
}

impl InventoryService {
    pub fn new(
        books: Arc<dyn Repository<Book>>,
        stock: Arc<dyn QuantityLedger>,
        default_threshold: Option<u32>,
    ) -> Self {
        Self {
            books,
            stock,
            default_threshold,
        }
    }

    /// Put a book into the warehouse. A book has at most one stock record.
    ///
    /// Without an explicit `min_threshold` the configured default applies.
    pub fn register_stock(
        &self,
        book: BookId,
        quantity: u32,
        min_threshold: Option<u32>,
    ) -> DomainResult<TrackedItem> {
        let book = self.books.get(&book)?;
        let item = TrackedItem::new(
            book.id_typed().entity_id(),
            book.title(),
            quantity,
            min_threshold.or(self.default_threshold),
        )?;
        let item = self.stock.register(item)?;
        tracing::info!(book_id = %book.id_typed(), item_id = %item.id_typed(), quantity, "stock registered");
        Ok(item)
    }

    pub fn get(&self, id: TrackedItemId) -> DomainResult<TrackedItem> {
        self.stock
            .get(id)
            .ok_or_else(|| DomainError::not_found("tracked item", id))
    }

    pub fn get_by_book(&self, book: BookId) -> DomainResult<TrackedItem> {
        self.stock
            .find_by_owner(book.entity_id())
            .ok_or_else(|| DomainError::not_found("stock for book", book))
    }

    pub fn list(&self) -> Vec<TrackedItem> {
        self.stock.list()
    }

    /// Manual correction of quantity and threshold.
    pub fn update_levels(
        &self,
        id: TrackedItemId,
        quantity: u32,
        min_threshold: Option<u32>,
    ) -> DomainResult<TrackedItem> {
        let item = self.stock.update_levels(id, quantity, min_threshold)?;
        tracing::info!(item_id = %id, quantity, ?min_threshold, "stock levels updated");
        Ok(item)
    }

    /// Items at or below `threshold`, or at or below their own minimum when `None`.
    pub fn low_stock(&self, threshold: Option<u32>) -> Vec<TrackedItem> {
        self.stock.low_stock(threshold)
    }

    pub fn delete(&self, id: TrackedItemId) -> DomainResult<()> {
        self.stock.remove(id)?;
        tracing::info!(item_id = %id, "stock record deleted");
        Ok(())
    }
}
