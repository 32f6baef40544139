use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use shelfkeep_catalog::BookId;
use shelfkeep_core::text::{limit_text, require_len};
use shelfkeep_core::{DomainError, DomainResult, Entity};

shelfkeep_core::entity_id!(
    /// Loan identifier.
    LoanId
);

/// Loan status.
///
/// Only `Active` and `Returned` are ever stored. `Overdue` is computed from
/// the due date by [`Loan::status_on`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoanStatus {
    Active,
    Returned,
    Overdue,
}

impl LoanStatus {
    pub fn display_name(self) -> &'static str {
        match self {
            LoanStatus::Active => "Active",
            LoanStatus::Returned => "Returned",
            LoanStatus::Overdue => "Overdue",
        }
    }
}

/// Who borrowed the book.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Reader {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl Reader {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    fn validate(&self) -> DomainResult<()> {
        require_len("reader_name", &self.name, 2, 200)?;
        if let Some(email) = &self.email {
            limit_text("reader_email", Some(email), 100)?;
            if !email.contains('@') {
                return Err(DomainError::validation("reader_email is malformed"));
            }
        }
        if let Some(phone) = &self.phone {
            limit_text("reader_phone", Some(phone), 20)?;
            let digits = phone.strip_prefix('+').unwrap_or(phone);
            let allowed = |c: char| c.is_ascii_digit() || matches!(c, '-' | ' ' | '(' | ')');
            if !digits.chars().all(allowed) {
                return Err(DomainError::validation("reader_phone is malformed"));
            }
        }
        Ok(())
    }
}

fn validate_dates(loan_date: NaiveDate, due_date: NaiveDate) -> DomainResult<()> {
    if due_date < loan_date {
        return Err(DomainError::validation("due_date cannot be before loan_date"));
    }
    Ok(())
}

/// Loan creation input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLoan {
    pub book: BookId,
    pub reader: Reader,
    pub loan_date: NaiveDate,
    pub due_date: NaiveDate,
    pub notes: Option<String>,
}

/// Fields editable on an existing loan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanUpdate {
    pub reader: Reader,
    pub due_date: NaiveDate,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loan {
    id: LoanId,
    book: BookId,
    reader: Reader,
    loan_date: NaiveDate,
    due_date: NaiveDate,
    return_date: Option<NaiveDate>,
    status: LoanStatus,
    notes: Option<String>,
}

impl Loan {
    pub fn open(input: NewLoan) -> DomainResult<Self> {
        input.reader.validate()?;
        validate_dates(input.loan_date, input.due_date)?;
        limit_text("notes", input.notes.as_deref(), 500)?;
        Ok(Self {
            id: LoanId::new(),
            book: input.book,
            reader: input.reader,
            loan_date: input.loan_date,
            due_date: input.due_date,
            return_date: None,
            status: LoanStatus::Active,
            notes: input.notes,
        })
    }

    pub fn id_typed(&self) -> LoanId {
        self.id
    }

    pub fn book(&self) -> BookId {
        self.book
    }

    pub fn reader(&self) -> &Reader {
        &self.reader
    }

    pub fn loan_date(&self) -> NaiveDate {
        self.loan_date
    }

    pub fn due_date(&self) -> NaiveDate {
        self.due_date
    }

    pub fn return_date(&self) -> Option<NaiveDate> {
        self.return_date
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// Stored status (`Active` or `Returned`).
    pub fn status(&self) -> LoanStatus {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.status == LoanStatus::Active
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.is_active() && today > self.due_date
    }

    /// Status as seen on `today`, including the derived `Overdue`.
    pub fn status_on(&self, today: NaiveDate) -> LoanStatus {
        if self.is_overdue(today) {
            LoanStatus::Overdue
        } else {
            self.status
        }
    }

    pub fn update(&mut self, update: LoanUpdate) -> DomainResult<()> {
        update.reader.validate()?;
        validate_dates(self.loan_date, update.due_date)?;
        limit_text("notes", update.notes.as_deref(), 500)?;
        self.reader = update.reader;
        self.due_date = update.due_date;
        self.notes = update.notes;
        Ok(())
    }

    /// Close the loan. A loan can only be returned once.
    pub fn mark_returned(&mut self, on: NaiveDate) -> DomainResult<()> {
        if !self.is_active() {
            return Err(DomainError::conflict(format!(
                "loan {} has already been returned",
                self.id
            )));
        }
        self.status = LoanStatus::Returned;
        self.return_date = Some(on);
        Ok(())
    }
}

impl Entity for Loan {
    type Id = LoanId;
    const KIND: &'static str = "loan";

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn new_loan() -> NewLoan {
        NewLoan {
            book: BookId::new(),
            reader: Reader::named("Ivan Petrov"),
            loan_date: date(2026, 3, 1),
            due_date: date(2026, 3, 15),
            notes: None,
        }
    }

    #[test]
    fn overdue_is_derived_while_active() {
        let mut loan = Loan::open(new_loan()).unwrap();
        assert_eq!(loan.status_on(date(2026, 3, 15)), LoanStatus::Active);
        assert_eq!(loan.status_on(date(2026, 3, 16)), LoanStatus::Overdue);
        assert_eq!(loan.status(), LoanStatus::Active);

        loan.mark_returned(date(2026, 3, 20)).unwrap();
        assert_eq!(loan.status_on(date(2026, 4, 1)), LoanStatus::Returned);
        assert_eq!(loan.return_date(), Some(date(2026, 3, 20)));
    }

    #[test]
    fn second_return_is_a_conflict() {
        let mut loan = Loan::open(new_loan()).unwrap();
        loan.mark_returned(date(2026, 3, 2)).unwrap();
        assert!(loan.mark_returned(date(2026, 3, 3)).unwrap_err().is_conflict());
        assert_eq!(loan.return_date(), Some(date(2026, 3, 2)));
    }

    #[test]
    fn reader_and_dates_are_validated() {
        let mut input = new_loan();
        input.reader.phone = Some("+7 (900) 123-45-67".into());
        assert!(Loan::open(input.clone()).is_ok());

        input.reader.phone = Some("call me".into());
        assert!(Loan::open(input).is_err());

        let mut input = new_loan();
        input.due_date = date(2026, 2, 1);
        assert!(Loan::open(input).is_err());

        let mut input = new_loan();
        input.reader = Reader::named("I");
        assert!(Loan::open(input).is_err());
    }
}
