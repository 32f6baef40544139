use std::cmp::Ordering;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use shelfkeep_catalog::{Author, AuthorId, Book, BookDetails, BookId, Genre, GenreId, Publisher, PublisherId};
use shelfkeep_core::guard::ensure_deletable;
use shelfkeep_core::text::contains_ignore_case;
use shelfkeep_core::{BatchDeletion, DomainResult};
use shelfkeep_inventory::QuantityLedger;
use shelfkeep_lending::Loan;
use shelfkeep_sales::Order;

use crate::query::{cmp_ignore_case, sort_rows, SortDir};
use crate::store::Repository;

/// Book search criteria; unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookFilter {
    pub title: Option<String>,
    pub author: Option<AuthorId>,
    pub publisher: Option<PublisherId>,
    pub genre: Option<GenreId>,
    pub year_from: Option<i32>,
    pub year_to: Option<i32>,
}

impl BookFilter {
    pub fn matches(&self, book: &Book) -> bool {
        let year = book.publication_year();
        self.title
            .as_deref()
            .is_none_or(|title| contains_ignore_case(book.title(), title))
            && self.author.is_none_or(|a| book.has_author(a))
            && self.publisher.is_none_or(|p| book.publisher() == p)
            && self.genre.is_none_or(|g| book.has_genre(g))
            && self.year_from.is_none_or(|from| year >= from)
            && self.year_to.is_none_or(|to| year <= to)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookSort {
    #[default]
    Title,
    Price,
    PublicationYear,
    Pages,
}

impl BookSort {
    fn compare(self, a: &Book, b: &Book) -> Ordering {
        match self {
            BookSort::Title => cmp_ignore_case(a.title(), b.title()),
            BookSort::Price => a.price().cmp(&b.price()),
            BookSort::PublicationYear => a.publication_year().cmp(&b.publication_year()),
            BookSort::Pages => a.details().pages.cmp(&b.details().pages),
        }
    }
}

/// Repositories and ledgers the book service reads or cleans up.
pub struct BookStores {
    pub books: Arc<dyn Repository<Book>>,
    pub authors: Arc<dyn Repository<Author>>,
    pub genres: Arc<dyn Repository<Genre>>,
    pub publishers: Arc<dyn Repository<Publisher>>,
    pub orders: Arc<dyn Repository<Order>>,
    pub loans: Arc<dyn Repository<Loan>>,
    pub stock: Arc<dyn QuantityLedger>,
    pub copies: Arc<dyn QuantityLedger>,
}

pub struct BookService {
    stores: BookStores,
}

impl BookService {
    pub fn new(stores: BookStores) -> Self {
        Self { stores }
    }

    fn check_references(&self, details: &BookDetails) -> DomainResult<()> {
        self.stores.publishers.get(&details.publisher)?;
        for author in &details.authors {
            self.stores.authors.get(author)?;
        }
        for genre in &details.genres {
            self.stores.genres.get(genre)?;
        }
        Ok(())
    }

    pub fn create(&self, details: BookDetails) -> DomainResult<Book> {
        self.check_references(&details)?;
        let book = self.stores.books.insert(Book::new(details)?)?;
        tracing::info!(book_id = %book.id_typed(), isbn = book.isbn(), "book created");
        Ok(book)
    }

    pub fn get(&self, id: BookId) -> DomainResult<Book> {
        Ok(self.stores.books.get(&id)?)
    }

    pub fn list(&self) -> DomainResult<Vec<Book>> {
        Ok(self.stores.books.find_all()?)
    }

    /// Replace the book's fields. ISBN uniqueness is checked against other books.
    ///
    /// A new title is carried over to the book's stock and copy counters.
    pub fn update(&self, id: BookId, details: BookDetails) -> DomainResult<Book> {
        let mut book = self.stores.books.get(&id)?;
        self.check_references(&details)?;
        let previous = book.title().to_string();
        book.update(details)?;
        let book = self.stores.books.update(book)?;
        if book.title() != previous {
            for ledger in [&self.stores.stock, &self.stores.copies] {
                if let Some(item) = ledger.find_by_owner(id.entity_id()) {
                    ledger.relabel(item.id_typed(), book.title())?;
                }
            }
            tracing::info!(book_id = %id, from = %previous, to = book.title(), "book renamed");
        }
        Ok(book)
    }

    pub fn search(&self, title: &str) -> DomainResult<Vec<Book>> {
        let title = title.trim();
        Ok(self
            .stores
            .books
            .find_where(&|book: &Book| contains_ignore_case(book.title(), title))?)
    }

    pub fn by_author(&self, author: AuthorId) -> DomainResult<Vec<Book>> {
        self.stores.authors.get(&author)?;
        Ok(self.stores.books.find_where(&|book: &Book| book.has_author(author))?)
    }

    pub fn by_genre(&self, genre: GenreId) -> DomainResult<Vec<Book>> {
        self.stores.genres.get(&genre)?;
        Ok(self.stores.books.find_where(&|book: &Book| book.has_genre(genre))?)
    }

    pub fn by_publisher(&self, publisher: PublisherId) -> DomainResult<Vec<Book>> {
        self.stores.publishers.get(&publisher)?;
        Ok(self
            .stores
            .books
            .find_where(&|book: &Book| book.publisher() == publisher)?)
    }

    pub fn filter(&self, filter: &BookFilter) -> DomainResult<Vec<Book>> {
        Ok(self.stores.books.find_where(&|book: &Book| filter.matches(book))?)
    }

    pub fn sorted(&self, sort: BookSort, dir: SortDir) -> DomainResult<Vec<Book>> {
        let mut rows = self.stores.books.find_all()?;
        sort_rows(&mut rows, dir, |a, b| sort.compare(a, b));
        Ok(rows)
    }

    /// Order lines that name `id`, across all orders.
    fn order_items(&self, id: BookId) -> DomainResult<u64> {
        let orders = self.stores.orders.find_where(&|order: &Order| order.contains_book(id))?;
        Ok(orders
            .iter()
            .flat_map(|order| order.items())
            .filter(|item| item.book == id)
            .count() as u64)
    }

    fn active_loans(&self, id: BookId) -> DomainResult<u64> {
        Ok(self
            .stores
            .loans
            .count_where(&|loan: &Loan| loan.book() == id && loan.is_active())?)
    }

    /// Delete a book nothing references, together with its stock and copy counters.
    pub fn delete(&self, id: BookId) -> DomainResult<()> {
        let book = self.stores.books.get(&id)?;
        let what = format!("book '{}'", book.title());
        let checks = [
            ("order items", self.order_items(id)?),
            ("active loans", self.active_loans(id)?),
        ];
        for (dependents, blocking) in checks {
            if let Err(err) = ensure_deletable(&what, dependents, blocking) {
                tracing::warn!(book_id = %id, dependents, blocking, "book deletion blocked");
                return Err(err);
            }
        }
        self.remove(id)
    }

    pub fn delete_many(&self, ids: &[BookId]) -> DomainResult<BatchDeletion<BookId>> {
        let mut report = BatchDeletion::new();
        for &id in ids {
            let Some(book) = self.stores.books.find_by_id(&id)? else {
                report.record_missing(id);
                continue;
            };
            let blocking = self.order_items(id)? + self.active_loans(id)?;
            if blocking > 0 {
                report.record_blocked(id, book.title(), blocking);
                continue;
            }
            report.record_outcome(id, self.remove(id));
        }
        Ok(report)
    }

    fn remove(&self, id: BookId) -> DomainResult<()> {
        for ledger in [&self.stores.stock, &self.stores.copies] {
            if let Some(item) = ledger.find_by_owner(id.entity_id()) {
                ledger.remove(item.id_typed())?;
            }
        }
        self.stores.books.delete(&id)?;
        tracing::info!(book_id = %id, "book deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_year_range_is_inclusive() {
        let book = Book::new(BookDetails {
            title: "The Master and Margarita".into(),
            isbn: "978-0-14-118014".into(),
            price: shelfkeep_core::Money::from_minor(45_000),
            pages: 480,
            publication_year: 1967,
            description: None,
            publisher: PublisherId::new(),
            authors: Vec::new(),
            genres: Vec::new(),
        })
        .unwrap();

        let filter = BookFilter {
            title: Some("master".into()),
            year_from: Some(1967),
            year_to: Some(1967),
            ..BookFilter::default()
        };
        assert!(filter.matches(&book));
        assert!(!BookFilter { year_from: Some(1968), ..filter }.matches(&book));
    }
}
