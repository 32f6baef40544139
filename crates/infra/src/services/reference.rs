//! Authors, genres and publishers.
//!
//! The three share one service: CRUD, search, sorting, and deletion guarded by
//! the books that reference them.

use std::cmp::Ordering;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use shelfkeep_catalog::{
    Author, AuthorDetails, Book, Genre, GenreDetails, Publisher, PublisherDetails,
};
use shelfkeep_core::guard::ensure_deletable;
use shelfkeep_core::text::contains_ignore_case;
use shelfkeep_core::{BatchDeletion, DomainError, DomainResult, Entity};

use crate::query::{cmp_ignore_case, sort_rows, SortDir};
use crate::store::Repository;

/// A record books point at.
pub trait ReferenceData: Entity + Clone + Send + Sync + 'static {
    type Details;
    type Sort: Copy + Default;

    fn create(details: Self::Details) -> DomainResult<Self>;

    fn revise(&mut self, details: Self::Details) -> DomainResult<()>;

    /// Display name used in logs and blocked-deletion reports.
    fn label(&self) -> String;

    /// Case-insensitive search on the record's name fields.
    fn matches(&self, query: &str) -> bool;

    fn compare(sort: Self::Sort, a: &Self, b: &Self) -> Ordering;

    fn is_referenced_by(id: &Self::Id, book: &Book) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorSort {
    #[default]
    LastName,
    FirstName,
    BirthDate,
    Country,
}

impl ReferenceData for Author {
    type Details = AuthorDetails;
    type Sort = AuthorSort;

    fn create(details: AuthorDetails) -> DomainResult<Self> {
        Author::new(details)
    }

    fn revise(&mut self, details: AuthorDetails) -> DomainResult<()> {
        self.update(details)
    }

    fn label(&self) -> String {
        self.full_name()
    }

    fn matches(&self, query: &str) -> bool {
        let d = self.details();
        contains_ignore_case(&d.first_name, query) || contains_ignore_case(&d.last_name, query)
    }

    fn compare(sort: AuthorSort, a: &Self, b: &Self) -> Ordering {
        let (a, b) = (a.details(), b.details());
        match sort {
            AuthorSort::LastName => cmp_ignore_case(&a.last_name, &b.last_name)
                .then_with(|| cmp_ignore_case(&a.first_name, &b.first_name)),
            AuthorSort::FirstName => cmp_ignore_case(&a.first_name, &b.first_name),
            AuthorSort::BirthDate => a.birth_date.cmp(&b.birth_date),
            AuthorSort::Country => a.country.cmp(&b.country),
        }
    }

    fn is_referenced_by(id: &Self::Id, book: &Book) -> bool {
        book.has_author(*id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenreSort {
    #[default]
    Name,
}

impl ReferenceData for Genre {
    type Details = GenreDetails;
    type Sort = GenreSort;

    fn create(details: GenreDetails) -> DomainResult<Self> {
        Genre::new(details)
    }

    fn revise(&mut self, details: GenreDetails) -> DomainResult<()> {
        self.update(details)
    }

    fn label(&self) -> String {
        self.name().to_string()
    }

    fn matches(&self, query: &str) -> bool {
        contains_ignore_case(self.name(), query)
    }

    fn compare(_sort: GenreSort, a: &Self, b: &Self) -> Ordering {
        cmp_ignore_case(a.name(), b.name())
    }

    fn is_referenced_by(id: &Self::Id, book: &Book) -> bool {
        book.has_genre(*id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublisherSort {
    #[default]
    Name,
    City,
    Country,
}

impl ReferenceData for Publisher {
    type Details = PublisherDetails;
    type Sort = PublisherSort;

    fn create(details: PublisherDetails) -> DomainResult<Self> {
        Publisher::new(details)
    }

    fn revise(&mut self, details: PublisherDetails) -> DomainResult<()> {
        self.update(details)
    }

    fn label(&self) -> String {
        self.name().to_string()
    }

    fn matches(&self, query: &str) -> bool {
        contains_ignore_case(self.name(), query)
    }

    fn compare(sort: PublisherSort, a: &Self, b: &Self) -> Ordering {
        let (a, b) = (a.details(), b.details());
        match sort {
            PublisherSort::Name => cmp_ignore_case(&a.name, &b.name),
            PublisherSort::City => a.city.cmp(&b.city),
            PublisherSort::Country => a.country.cmp(&b.country),
        }
    }

    fn is_referenced_by(id: &Self::Id, book: &Book) -> bool {
        book.publisher() == *id
    }
}

pub struct ReferenceService<E: ReferenceData> {
    records: Arc<dyn Repository<E>>,
    books: Arc<dyn Repository<Book>>,
}

pub type AuthorService = ReferenceService<Author>;
pub type GenreService = ReferenceService<Genre>;
pub type PublisherService = ReferenceService<Publisher>;

impl<E: ReferenceData> ReferenceService<E> {
    pub fn new(records: Arc<dyn Repository<E>>, books: Arc<dyn Repository<Book>>) -> Self {
        Self { records, books }
    }

    pub fn create(&self, details: E::Details) -> DomainResult<E> {
        let record = self.records.insert(E::create(details)?)?;
        tracing::info!(kind = E::KIND, id = %record.id(), label = %record.label(), "created");
        Ok(record)
    }

    pub fn get(&self, id: E::Id) -> DomainResult<E> {
        Ok(self.records.get(&id)?)
    }

    pub fn list(&self) -> DomainResult<Vec<E>> {
        Ok(self.records.find_all()?)
    }

    pub fn update(&self, id: E::Id, details: E::Details) -> DomainResult<E> {
        let mut record = self.records.get(&id)?;
        record.revise(details)?;
        Ok(self.records.update(record)?)
    }

    /// Case-insensitive substring search; an empty query lists everything.
    pub fn search(&self, query: &str) -> DomainResult<Vec<E>> {
        let query = query.trim();
        Ok(self.records.find_where(&|record: &E| record.matches(query))?)
    }

    pub fn sorted(&self, sort: E::Sort, dir: SortDir) -> DomainResult<Vec<E>> {
        let mut rows = self.records.find_all()?;
        sort_rows(&mut rows, dir, |a, b| E::compare(sort, a, b));
        Ok(rows)
    }

    /// Books referencing `id`. Counted on every call.
    pub fn count_books(&self, id: E::Id) -> DomainResult<u64> {
        self.records.get(&id)?;
        self.blocking_books(&id)
    }

    fn blocking_books(&self, id: &E::Id) -> DomainResult<u64> {
        Ok(self.books.count_where(&|book: &Book| E::is_referenced_by(id, book))?)
    }

    /// Delete a record no book references; otherwise `Conflict` with the book count.
    pub fn delete(&self, id: E::Id) -> DomainResult<()> {
        let record = self.records.get(&id)?;
        let blocking = self.blocking_books(&id)?;
        if let Err(err) = ensure_deletable(&format!("{} '{}'", E::KIND, record.label()), "books", blocking) {
            tracing::warn!(kind = E::KIND, %id, blocking, "deletion blocked");
            return Err(err);
        }
        self.records.delete(&id)?;
        tracing::info!(kind = E::KIND, %id, "deleted");
        Ok(())
    }

    /// Delete every id that is unreferenced; blocked and unknown ids are reported, not failed.
    pub fn delete_many(&self, ids: &[E::Id]) -> DomainResult<BatchDeletion<E::Id>> {
        let mut report = BatchDeletion::new();
        for &id in ids {
            let Some(record) = self.records.find_by_id(&id)? else {
                report.record_missing(id);
                continue;
            };
            let blocking = self.blocking_books(&id)?;
            if blocking > 0 {
                report.record_blocked(id, record.label(), blocking);
                continue;
            }
            let removed = self.records.delete(&id).map(drop).map_err(DomainError::from);
            report.record_outcome(id, removed);
        }
        if !report.blocked.is_empty() {
            tracing::warn!(
                kind = E::KIND,
                deleted = report.deleted.len(),
                blocked = %report.blocked_summary(),
                "batch deletion partially blocked"
            );
        }
        Ok(report)
    }
}
