//! Library loans: each active loan holds one copy of its book.

use std::cmp::Ordering;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use shelfkeep_catalog::{Book, BookId};
use shelfkeep_core::text::contains_ignore_case;
use shelfkeep_core::{BatchDeletion, DomainError, DomainResult};
use shelfkeep_inventory::{QuantityLedger, TrackedItem};
use shelfkeep_lending::{Loan, LoanId, LoanStatus, LoanUpdate, NewLoan};

use crate::query::{cmp_ignore_case, sort_rows, SortDir};
use crate::store::Repository;

/// Loan search criteria; unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanFilter {
    pub reader_name: Option<String>,
    pub book: Option<BookId>,
    /// Compared against the status on the query date, so `Overdue` works here.
    pub status: Option<LoanStatus>,
    pub loan_date_from: Option<NaiveDate>,
    pub loan_date_to: Option<NaiveDate>,
}

impl LoanFilter {
    pub fn matches(&self, loan: &Loan, today: NaiveDate) -> bool {
        self.reader_name
            .as_deref()
            .is_none_or(|name| contains_ignore_case(&loan.reader().name, name))
            && self.book.is_none_or(|b| loan.book() == b)
            && self.status.is_none_or(|s| loan.status_on(today) == s)
            && self.loan_date_from.is_none_or(|from| loan.loan_date() >= from)
            && self.loan_date_to.is_none_or(|to| loan.loan_date() <= to)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanSort {
    #[default]
    LoanDate,
    DueDate,
    ReturnDate,
    ReaderName,
}

impl LoanSort {
    fn compare(self, a: &Loan, b: &Loan) -> Ordering {
        match self {
            LoanSort::LoanDate => a.loan_date().cmp(&b.loan_date()),
            LoanSort::DueDate => a.due_date().cmp(&b.due_date()),
            LoanSort::ReturnDate => a.return_date().cmp(&b.return_date()),
            LoanSort::ReaderName => cmp_ignore_case(&a.reader().name, &b.reader().name),
        }
    }
}

pub struct LoanService {
    loans: Arc<dyn Repository<Loan>>,
    books: Arc<dyn Repository<Book>>,
    copies: Arc<dyn QuantityLedger>,
}

impl LoanService {
    pub fn new(
        loans: Arc<dyn Repository<Loan>>,
        books: Arc<dyn Repository<Book>>,
        copies: Arc<dyn QuantityLedger>,
    ) -> Self {
        Self {
            loans,
            books,
            copies,
        }
    }

    fn copies_of(&self, book: BookId) -> Option<TrackedItem> {
        self.copies.find_by_owner(book.entity_id())
    }

    /// Set the number of copies on the shelf, registering the counter on first use.
    pub fn register_copies(&self, book: BookId, available: u32) -> DomainResult<TrackedItem> {
        let record = self.books.get(&book)?;
        let item = match self.copies_of(book) {
            Some(existing) => self.copies.update_levels(existing.id_typed(), available, None)?,
            None => self
                .copies
                .register(TrackedItem::new(book.entity_id(), record.title(), available, None)?)?,
        };
        tracing::info!(book_id = %book, available, "copies registered");
        Ok(item)
    }

    /// Copies on the shelf; zero when none were ever registered.
    pub fn available(&self, book: BookId) -> DomainResult<u32> {
        self.books.get(&book)?;
        Ok(self.copies_of(book).map_or(0, |item| item.quantity_on_hand()))
    }

    pub fn available_books(&self) -> DomainResult<Vec<Book>> {
        Ok(self.books.find_where(&|book: &Book| {
            self.copies_of(book.id_typed())
                .is_some_and(|item| item.quantity_on_hand() > 0)
        })?)
    }

    /// Lend one copy. Fails with `InsufficientStock` when none is on the shelf.
    #[tracing::instrument(skip(self, input), fields(book_id = %input.book))]
    pub fn create(&self, input: NewLoan) -> DomainResult<Loan> {
        self.books.get(&input.book)?;
        let copies = self
            .copies_of(input.book)
            .ok_or_else(|| DomainError::not_found("copies for book", input.book))?;
        let loan = Loan::open(input)?;

        self.copies.reserve(copies.id_typed(), 1)?;
        match self.loans.insert(loan) {
            Ok(loan) => {
                tracing::info!(loan_id = %loan.id_typed(), due = %loan.due_date(), "loan created");
                Ok(loan)
            }
            Err(err) => {
                self.copies.release(copies.id_typed(), 1)?;
                Err(err.into())
            }
        }
    }

    fn release_copy(&self, loan: &Loan) -> DomainResult<()> {
        match self.copies_of(loan.book()) {
            Some(copies) => {
                self.copies.release(copies.id_typed(), 1)?;
            }
            None => {
                tracing::warn!(loan_id = %loan.id_typed(), book_id = %loan.book(), "no copy counter to release into");
            }
        }
        Ok(())
    }

    /// Close an active loan on `today` and put the copy back.
    #[tracing::instrument(skip(self))]
    pub fn return_book(&self, id: LoanId, today: NaiveDate) -> DomainResult<Loan> {
        let mut loan = self.loans.get(&id)?;
        loan.mark_returned(today)?;
        let loan = self
            .loans
            .update_if(loan, &|stored: &Loan| stored.is_active())?;
        self.release_copy(&loan)?;
        tracing::info!(loan_id = %id, "book returned");
        Ok(loan)
    }

    /// Remove a loan. An active loan gives its copy back; if that fails the
    /// loan is put back and the error returned.
    #[tracing::instrument(skip(self))]
    pub fn delete(&self, id: LoanId) -> DomainResult<()> {
        let loan = self.loans.delete(&id)?;
        if loan.is_active() {
            if let Err(err) = self.release_copy(&loan) {
                tracing::error!(loan_id = %id, error = %err, "copy not returned, loan kept");
                self.loans.insert(loan)?;
                return Err(err);
            }
        }
        tracing::info!(loan_id = %id, was_active = loan.is_active(), "loan deleted");
        Ok(())
    }

    /// Delete each id on its own; a failure is reported and the batch goes on.
    pub fn delete_many(&self, ids: &[LoanId]) -> DomainResult<BatchDeletion<LoanId>> {
        let mut report = BatchDeletion::new();
        for &id in ids {
            report.record_outcome(id, self.delete(id));
        }
        if !report.failed.is_empty() {
            tracing::warn!(deleted = report.deleted.len(), failed = report.failed.len(), "batch loan deletion incomplete");
        }
        Ok(report)
    }

    pub fn update(&self, id: LoanId, update: LoanUpdate) -> DomainResult<Loan> {
        let mut loan = self.loans.get(&id)?;
        loan.update(update)?;
        Ok(self.loans.update(loan)?)
    }

    pub fn get(&self, id: LoanId) -> DomainResult<Loan> {
        Ok(self.loans.get(&id)?)
    }

    pub fn list(&self) -> DomainResult<Vec<Loan>> {
        Ok(self.loans.find_all()?)
    }

    pub fn active(&self) -> DomainResult<Vec<Loan>> {
        Ok(self.loans.find_where(&|loan: &Loan| loan.is_active())?)
    }

    pub fn overdue(&self, today: NaiveDate) -> DomainResult<Vec<Loan>> {
        Ok(self.loans.find_where(&|loan: &Loan| loan.is_overdue(today))?)
    }

    pub fn filter(&self, filter: &LoanFilter, today: NaiveDate) -> DomainResult<Vec<Loan>> {
        Ok(self.loans.find_where(&|loan: &Loan| filter.matches(loan, today))?)
    }

    pub fn sorted(&self, sort: LoanSort, dir: SortDir) -> DomainResult<Vec<Loan>> {
        let mut rows = self.loans.find_all()?;
        sort_rows(&mut rows, dir, |a, b| sort.compare(a, b));
        Ok(rows)
    }
}
