//! Stateless arithmetic and fixed-rate currency conversion.

pub mod arithmetic;
pub mod currency;
pub mod error;

pub use arithmetic::{calculate, Operation};
pub use currency::{convert, currencies, Currency};
pub use error::CalcError;
