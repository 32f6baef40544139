//! Library lending: one loan reserves one copy of a book until it is returned.

pub mod loan;

pub use loan::{Loan, LoanId, LoanStatus, LoanUpdate, NewLoan, Reader};
